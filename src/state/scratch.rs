//! Scratch pad buffer and timestamp insertion

use super::stopwatch::format_elapsed;

/// Free-text note buffer backing the scratch pad
#[derive(Debug, Clone, Default)]
pub struct ScratchBuffer {
    pub text: String,
}

impl ScratchBuffer {
    /// Create an empty buffer
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a buffer holding persisted text
    pub fn with_text(text: String) -> Self {
        Self { text }
    }

    /// Replace the entire buffer contents
    pub fn set_text(&mut self, text: String) {
        self.text = text;
    }

    /// Empty the buffer
    pub fn clear(&mut self) {
        self.text.clear();
    }

    /// Insert a `[HH:MM:SS] ` token at the given cursor offset.
    ///
    /// The offset counts characters, not bytes; offsets past the end clamp to
    /// the end of the buffer. Text before and after the cursor is preserved.
    /// Returns the cursor position immediately after the inserted token.
    pub fn insert_timestamp(&mut self, elapsed_seconds: u64, cursor: usize) -> usize {
        let token = format!("[{}] ", format_elapsed(elapsed_seconds));

        let char_count = self.text.chars().count();
        let cursor = cursor.min(char_count);
        let byte_offset = self
            .text
            .char_indices()
            .nth(cursor)
            .map(|(offset, _)| offset)
            .unwrap_or(self.text.len());

        self.text.insert_str(byte_offset, &token);
        cursor + token.chars().count()
    }
}
