//! In-memory view state rendered by the UI layer.

use serde::Serialize;

use crate::types::{TodoId, TodoItem};

/// Everything the UI needs to draw the current screen.
///
/// `input` is a single buffer shared by "compose new" and "edit existing".
/// `pending_double_click` is true while the disambiguation window armed by a
/// double-click is open; `arm_generation` identifies the most recent arming so
/// that a disarm scheduled for an older one can be told apart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ViewState {
    pub input: String,
    pub todos: Vec<TodoItem>,
    pub editing_todo_id: Option<TodoId>,
    pub pending_double_click: bool,
    #[serde(skip)]
    pub(crate) arm_generation: u64,
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Identifies the most recent double-click arming.
    pub fn arm_generation(&self) -> u64 {
        self.arm_generation
    }

    pub fn todo(&self, id: TodoId) -> Option<&TodoItem> {
        self.todos.iter().find(|todo| todo.id == id)
    }

    pub(crate) fn todo_mut(&mut self, id: TodoId) -> Option<&mut TodoItem> {
        self.todos.iter_mut().find(|todo| todo.id == id)
    }

    /// Oldest-updated first. Stable, so equal timestamps keep their order.
    pub fn sort_by_last_update(&mut self) {
        self.todos.sort_by(|a, b| a.last_update.cmp(&b.last_update));
    }
}
