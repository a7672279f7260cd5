//! User-facing status line.

/// Message shown when microphone access is refused.
pub const PERMISSION_PROMPT: &str = "Please grant permission to app to access microphone";

/// Single overwrite-only message displayed under the title.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct StatusReporter {
    message: String,
}

impl StatusReporter {
    /// Replaces the current message.
    pub fn set(&mut self, message: impl Into<String>) {
        self.message = message.into();
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}
