//! Clipboard collaborator for the code-block copy affordance.
//!
//! Copying is fire-and-forget: failures are logged and otherwise ignored.

use arboard::Clipboard as ArboardClipboard;
use tracing::debug;

pub trait Clipboard {
    fn copy(&mut self, text: &str);
}

/// System clipboard via `arboard`, opened on first use.
#[derive(Default)]
pub struct SystemClipboard {
    inner: Option<ArboardClipboard>,
}

impl SystemClipboard {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Clipboard for SystemClipboard {
    fn copy(&mut self, text: &str) {
        if self.inner.is_none() {
            match ArboardClipboard::new() {
                Ok(clipboard) => self.inner = Some(clipboard),
                Err(err) => {
                    debug!(error = %err, "Clipboard unavailable");
                    return;
                }
            }
        }
        if let Some(clipboard) = self.inner.as_mut()
            && let Err(err) = clipboard.set_text(text.to_owned())
        {
            debug!(error = %err, "Clipboard write failed");
        }
    }
}

/// Discards everything, for sessions with the clipboard turned off.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopClipboard;

impl Clipboard for NoopClipboard {
    fn copy(&mut self, _text: &str) {}
}

/// Remembers what was copied.
#[derive(Debug, Default, Clone)]
pub struct RecordingClipboard {
    pub copied: Vec<String>,
}

impl Clipboard for RecordingClipboard {
    fn copy(&mut self, text: &str) {
        self.copied.push(text.to_owned());
    }
}
