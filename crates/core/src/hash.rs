//! Hash display helpers.
//!
//! Hashes are opaque hex strings produced by the ledger service. The client
//! never recomputes or verifies them; it only shortens them for display.

/// Number of characters kept on each side of a truncated hash.
pub const HASH_DISPLAY_CHARS: usize = 10;

/// Shorten a hash to `first 10 + "..." + last 10` characters.
///
/// An empty hash renders as an empty string. Hashes shorter than the
/// combined prefix and suffix are shown with overlapping halves, the same way
/// slicing from both ends would.
pub fn truncate_hash(hash: &str) -> String {
    if hash.is_empty() {
        return String::new();
    }

    let chars: Vec<char> = hash.chars().collect();
    let head: String = chars.iter().take(HASH_DISPLAY_CHARS).collect();
    let tail_start = chars.len().saturating_sub(HASH_DISPLAY_CHARS);
    let tail: String = chars[tail_start..].iter().collect();

    format!("{}...{}", head, tail)
}
