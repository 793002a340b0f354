use crate::queue::{MutationQueue, SyncMutation};
use serde::{Deserialize, Serialize};

/// Cursor location as a byte offset into the editor text
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CursorPosition {
    pub offset: usize,
}

impl CursorPosition {
    pub fn new(offset: usize) -> Self {
        Self { offset }
    }

    /// Clamp to `text`, backing up to a character boundary
    pub fn clamp_to(self, text: &str) -> Self {
        let mut offset = self.offset.min(text.len());
        while !text.is_char_boundary(offset) {
            offset -= 1;
        }
        Self { offset }
    }
}

/// The source-text editing widget
pub trait TextEditor {
    fn text(&self) -> String;

    /// Replace the whole buffer. Widgets typically reset the cursor and
    /// report the change like any other edit.
    fn set_text(&mut self, text: &str);

    fn cursor(&self) -> CursorPosition;

    fn set_cursor(&mut self, position: CursorPosition);

    fn has_focus(&self) -> bool;
}

/// In-memory [`TextEditor`].
///
/// When connected to a queue it reports every buffer change as a
/// [`SyncMutation::TextEdit`], including the ones caused by `set_text`.
#[derive(Debug, Clone, Default)]
pub struct BufferEditor {
    text: String,
    cursor: CursorPosition,
    focused: bool,
    changes: Option<MutationQueue>,
    set_text_calls: usize,
}

impl BufferEditor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Report buffer changes to `queue`
    pub fn connect(&mut self, queue: MutationQueue) {
        self.changes = Some(queue);
    }

    pub fn focus(&mut self, focused: bool) {
        self.focused = focused;
    }

    /// Simulate the user replacing the buffer and leaving the cursor at `cursor`
    pub fn type_text(&mut self, text: &str, cursor: usize) {
        self.text = text.to_string();
        self.cursor = CursorPosition::new(cursor).clamp_to(text);
        self.notify();
    }

    /// How many times the buffer was overwritten through [`TextEditor::set_text`]
    pub fn set_text_calls(&self) -> usize {
        self.set_text_calls
    }

    fn notify(&self) {
        if let Some(queue) = &self.changes {
            queue.push(SyncMutation::TextEdit(self.text.clone()));
        }
    }
}

impl TextEditor for BufferEditor {
    fn text(&self) -> String {
        self.text.clone()
    }

    fn set_text(&mut self, text: &str) {
        self.text = text.to_string();
        self.cursor = CursorPosition::default();
        self.set_text_calls += 1;
        self.notify();
    }

    fn cursor(&self) -> CursorPosition {
        self.cursor
    }

    fn set_cursor(&mut self, position: CursorPosition) {
        self.cursor = position.clamp_to(&self.text);
    }

    fn has_focus(&self) -> bool {
        self.focused
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_to_char_boundary() {
        assert_eq!(CursorPosition::new(99).clamp_to("abc").offset, 3);
        // "é" is two bytes
        assert_eq!(CursorPosition::new(2).clamp_to("aé").offset, 1);
    }

    #[test]
    fn test_set_text_resets_cursor_and_notifies() {
        let queue = MutationQueue::new();
        let mut editor = BufferEditor::new();
        editor.connect(queue.clone());

        editor.type_text("hello", 3);
        assert_eq!(editor.cursor().offset, 3);

        editor.set_text("bye");
        assert_eq!(editor.cursor().offset, 0);
        assert_eq!(editor.set_text_calls(), 1);
        assert_eq!(queue.len(), 2);
    }
}
