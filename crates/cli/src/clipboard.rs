//! System clipboard through the platform's copy utility.

use blockvision_sync::{ClipboardError, ClipboardHandle, ClipboardProvider};
use std::io::Write;
use std::process::{Child, Command, Stdio};

/// Copies through `pbcopy`, `clip`, `wl-copy`, `xclip` or `xsel`, whichever
/// the platform provides.
pub struct SystemClipboard;

/// A running copy utility waiting for input on stdin.
pub struct SystemClipboardHandle {
    child: Option<Child>,
}

type Tool = (&'static str, &'static [&'static str]);

fn candidates() -> Vec<Tool> {
    let mut tools: Vec<Tool> = Vec::new();
    if cfg!(target_os = "macos") {
        tools.push(("pbcopy", &[]));
    } else if cfg!(target_os = "windows") {
        tools.push(("clip", &[]));
    } else {
        if std::env::var_os("WAYLAND_DISPLAY").is_some() {
            tools.push(("wl-copy", &[]));
        }
        tools.push(("xclip", &["-selection", "clipboard"]));
        tools.push(("xsel", &["--clipboard", "--input"]));
    }
    tools
}

impl ClipboardProvider for SystemClipboard {
    type Handle = SystemClipboardHandle;

    fn acquire(&self) -> Result<SystemClipboardHandle, ClipboardError> {
        let mut last_error = None;
        for (program, args) in candidates() {
            match Command::new(program)
                .args(args)
                .stdin(Stdio::piped())
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .spawn()
            {
                Ok(child) => {
                    tracing::debug!(program, "clipboard acquired");
                    return Ok(SystemClipboardHandle { child: Some(child) });
                }
                Err(e) => last_error = Some(format!("{program}: {e}")),
            }
        }
        Err(ClipboardError::Unavailable(
            last_error.unwrap_or_else(|| "no copy utility found".to_string()),
        ))
    }
}

impl ClipboardHandle for SystemClipboardHandle {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        let mut child = self
            .child
            .take()
            .ok_or_else(|| ClipboardError::Write("clipboard already written".to_string()))?;

        let written = match child.stdin.take() {
            Some(mut stdin) => stdin.write_all(text.as_bytes()),
            None => Err(std::io::Error::other("stdin not captured")),
        };
        // stdin is closed here so the utility sees EOF.
        if let Err(e) = written {
            let _ = child.kill();
            let _ = child.wait();
            return Err(ClipboardError::Write(e.to_string()));
        }

        let status = child
            .wait()
            .map_err(|e| ClipboardError::Write(e.to_string()))?;
        if status.success() {
            Ok(())
        } else {
            Err(ClipboardError::Write(format!("copy utility exited with {status}")))
        }
    }
}

impl Drop for SystemClipboardHandle {
    fn drop(&mut self) {
        if let Some(mut child) = self.child.take() {
            let _ = child.kill();
            let _ = child.wait();
        }
    }
}
