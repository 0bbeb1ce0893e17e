//! Session wallet identity.

use crate::store::Store;
use blockvision_core::WalletAddress;
use tokio::sync::watch;

/// The wallet address the session is looking at.
///
/// An address is generated once when the session starts. The user may
/// override the active address to inspect another wallet; the generated one
/// is kept so it can be restored. Every write is published to subscribers,
/// which is how the balance follows the wallet.
#[derive(Debug)]
pub struct WalletIdentity {
    own: WalletAddress,
    active: Store<WalletAddress>,
}

impl WalletIdentity {
    /// Start a session identity with a freshly generated address.
    pub fn generate() -> Self {
        Self::with_address(WalletAddress::generate())
    }

    /// Start a session identity with a known address.
    pub fn with_address(address: WalletAddress) -> Self {
        Self {
            active: Store::new(address.clone()),
            own: address,
        }
    }

    /// The address generated for this session.
    pub fn own_address(&self) -> &WalletAddress {
        &self.own
    }

    /// The currently active address.
    pub fn active(&self) -> WalletAddress {
        self.active.get()
    }

    /// Check whether the user replaced the generated address.
    pub fn is_overridden(&self) -> bool {
        self.active.with(|active| *active != self.own)
    }

    /// Replace the active address with user input (trimmed, otherwise unchecked).
    pub fn set_override(&self, input: &str) -> WalletAddress {
        let address = WalletAddress::from_input(input);
        tracing::debug!(%address, "wallet override");
        self.active.set(address.clone());
        address
    }

    /// Restore the generated address.
    pub fn reset(&self) -> WalletAddress {
        self.active.set(self.own.clone());
        self.own.clone()
    }

    /// Subscribe to active address changes.
    pub fn subscribe(&self) -> watch::Receiver<WalletAddress> {
        self.active.subscribe()
    }
}
