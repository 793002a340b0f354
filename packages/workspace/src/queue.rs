use crate::toolbox::DropPayload;
use screenweave_editor::PropValue;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

/// A change requested by one of the views
#[derive(Debug, Clone, PartialEq)]
pub enum SyncMutation {
    /// A toolbox item was dropped on the canvas
    CanvasAdd(DropPayload),
    /// The property grid changed a property of the selected component
    PropertyEdit { name: String, value: PropValue },
    /// The text editor's buffer changed
    TextEdit(String),
    /// Another screen was opened
    ActivateScreen(String),
}

/// Shared FIFO of pending mutations.
///
/// Clones share one queue, so a producer can hold a handle while the
/// coordinator drains it; a mutation pushed during an apply waits its turn.
#[derive(Debug, Clone, Default)]
pub struct MutationQueue {
    inner: Rc<RefCell<VecDeque<SyncMutation>>>,
}

impl MutationQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, mutation: SyncMutation) {
        self.inner.borrow_mut().push_back(mutation);
    }

    pub fn pop(&self) -> Option<SyncMutation> {
        self.inner.borrow_mut().pop_front()
    }

    pub fn len(&self) -> usize {
        self.inner.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.borrow().is_empty()
    }
}
