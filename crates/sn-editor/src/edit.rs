//! In-place text editing mode.
//!
//! Orthogonal to the pointer gesture state: a text note can be in edit mode
//! while the state machine is `Idle`. The buffer holds the working text;
//! the note's stored content is only touched on save.

use sn_core::NoteId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditBuffer {
    pub note: NoteId,
    pub text: String,
    original: String,
}

impl EditBuffer {
    pub fn open(note: NoteId, content: &str) -> Self {
        Self {
            note,
            text: content.to_owned(),
            original: content.to_owned(),
        }
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn is_dirty(&self) -> bool {
        self.text != self.original
    }

    /// Close the buffer. Returns the new content if it differs from what
    /// the note held when editing began.
    pub fn finish(self) -> Option<String> {
        self.is_dirty().then_some(self.text)
    }
}
