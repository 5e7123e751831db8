//! Copy-link sharing with a manual fallback

use tracing::warn;

use crate::error::ClipboardError;

/// Host clipboard access.
pub trait Clipboard {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError>;
}

/// What the user is told after a share attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShareFeedback {
    Copied,
    /// Clipboard refused; show the URL for manual copying
    ManualCopy(String),
}

impl ShareFeedback {
    pub fn message(&self) -> &str {
        match self {
            ShareFeedback::Copied => "Link copied!",
            ShareFeedback::ManualCopy(_) => "Copy this link:",
        }
    }
}

/// Copy `url`; a clipboard failure is recovered here and never reaches the caller.
pub fn share_view(clipboard: &mut dyn Clipboard, url: &str) -> ShareFeedback {
    match clipboard.write_text(url) {
        Ok(()) => ShareFeedback::Copied,
        Err(e) => {
            warn!(error = %e, "Clipboard write failed, falling back to manual copy");
            ShareFeedback::ManualCopy(url.to_string())
        }
    }
}

/// Clipboard kept in memory, for the CLI and tests.
#[derive(Debug, Default)]
pub struct MemoryClipboard {
    pub contents: Option<String>,
    pub deny: bool,
}

impl Clipboard for MemoryClipboard {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        if self.deny {
            return Err(ClipboardError("permission denied".to_string()));
        }
        self.contents = Some(text.to_string());
        Ok(())
    }
}
