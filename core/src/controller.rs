//! View-state controller.
//!
//! `update` is the only function that mutates a `ViewState`. It applies one
//! `Event` and returns the `Effect`s the caller must carry out: store
//! requests, notifications and the disarm timer. Store and timer results come
//! back in as further events, so every transition can be exercised without a
//! network or a clock.
//!
//! # Click routing
//! The UI reports a plain click on every press and a separate double-click
//! once two presses resolve. A double-click only arms a window of
//! `DOUBLE_CLICK_WINDOW`; the *next* click inside that window opens the item
//! for editing instead of toggling it. The first press of a real double-click
//! therefore still toggles. Every click re-sorts the list by `last_update`
//! using the timestamps present when the click is handled.

use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::{debug, error, warn};

use crate::error::StoreError;
use crate::notify::Notification;
use crate::state::ViewState;
use crate::types::{CreatedTodo, TodoId, TodoItem};

pub const DOUBLE_CLICK_WINDOW: Duration = Duration::from_millis(300);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    // --- user intents ---
    LoadRequested,
    InputChanged(String),
    CreateRequested,
    EditRequested(TodoId),
    UpdateRequested { id: TodoId, task: String },
    EditCancelled,
    DeleteRequested(TodoId),
    ToggleRequested(TodoId),
    ItemClicked(TodoId),
    ItemDoubleClicked(TodoId),

    // --- completions ---
    Loaded(Result<Vec<TodoItem>, StoreError>),
    Created {
        task: String,
        result: Result<CreatedTodo, StoreError>,
    },
    Edited {
        id: TodoId,
        task: String,
        result: Result<(), StoreError>,
    },
    Toggled {
        id: TodoId,
        completed: bool,
        result: Result<(), StoreError>,
    },
    Deleted {
        id: TodoId,
        result: Result<(), StoreError>,
    },
    DoubleClickWindowElapsed { generation: u64 },
}

/// A call the remote store adapter must make on the controller's behalf.
///
/// `Edit` and `Toggle` hit the same endpoint but complete differently.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreRequest {
    Load,
    Create { task: String },
    Edit { id: TodoId, task: String, completed: bool },
    Toggle { id: TodoId, task: String, completed: bool },
    Delete { id: TodoId },
}

impl StoreRequest {
    pub fn kind(&self) -> &'static str {
        match self {
            StoreRequest::Load => "load",
            StoreRequest::Create { .. } => "create",
            StoreRequest::Edit { .. } => "edit",
            StoreRequest::Toggle { .. } => "toggle",
            StoreRequest::Delete { .. } => "delete",
        }
    }

    /// Turns the store's answer into the completion event for this request.
    pub(crate) fn completion_event(self, outcome: Outcome) -> Event {
        match (self, outcome) {
            (StoreRequest::Load, Outcome::Listed(result)) => Event::Loaded(result),
            (StoreRequest::Create { task }, Outcome::Created(result)) => Event::Created { task, result },
            (StoreRequest::Edit { id, task, .. }, Outcome::Done(result)) => Event::Edited { id, task, result },
            (StoreRequest::Toggle { id, completed, .. }, Outcome::Done(result)) => {
                Event::Toggled { id, completed, result }
            }
            (StoreRequest::Delete { id }, Outcome::Done(result)) => Event::Deleted { id, result },
            (request, outcome) => {
                let reason = format!("{} request answered with {} outcome", request.kind(), outcome.kind());
                request.failed(StoreError::Decode(reason))
            }
        }
    }

    /// The completion event for a request that never got an answer.
    pub fn failed(self, err: StoreError) -> Event {
        match self {
            StoreRequest::Load => Event::Loaded(Err(err)),
            StoreRequest::Create { task } => Event::Created { task, result: Err(err) },
            StoreRequest::Edit { id, task, .. } => Event::Edited { id, task, result: Err(err) },
            StoreRequest::Toggle { id, completed, .. } => Event::Toggled { id, completed, result: Err(err) },
            StoreRequest::Delete { id } => Event::Deleted { id, result: Err(err) },
        }
    }
}

/// Typed result of executing a `StoreRequest`.
#[derive(Debug)]
pub(crate) enum Outcome {
    Listed(Result<Vec<TodoItem>, StoreError>),
    Created(Result<CreatedTodo, StoreError>),
    Done(Result<(), StoreError>),
}

impl Outcome {
    fn kind(&self) -> &'static str {
        match self {
            Outcome::Listed(_) => "list",
            Outcome::Created(_) => "create",
            Outcome::Done(_) => "write",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Store(StoreRequest),
    Notify(Notification),
    /// Post `DoubleClickWindowElapsed { generation }` after `after`.
    ScheduleDisarm { generation: u64, after: Duration },
}

/// Apply one event. `now` stamps items changed by a successful toggle or edit.
pub fn update(state: &mut ViewState, event: Event, now: DateTime<Utc>) -> Vec<Effect> {
    match event {
        Event::LoadRequested => vec![Effect::Store(StoreRequest::Load)],
        Event::InputChanged(text) => {
            state.input = text;
            Vec::new()
        }
        Event::CreateRequested => request_create(state),
        Event::EditRequested(id) => {
            begin_edit(state, id);
            Vec::new()
        }
        Event::UpdateRequested { id, task } => request_update(state, id, task),
        Event::EditCancelled => {
            state.editing_todo_id = None;
            Vec::new()
        }
        Event::DeleteRequested(id) => vec![Effect::Store(StoreRequest::Delete { id })],
        Event::ToggleRequested(id) => request_toggle(state, id),
        Event::ItemClicked(id) => {
            let effects = if state.pending_double_click {
                begin_edit(state, id);
                Vec::new()
            } else {
                request_toggle(state, id)
            };
            state.sort_by_last_update();
            effects
        }
        Event::ItemDoubleClicked(id) => {
            state.pending_double_click = true;
            state.arm_generation += 1;
            debug!(%id, generation = state.arm_generation, "double-click window armed");
            vec![Effect::ScheduleDisarm {
                generation: state.arm_generation,
                after: DOUBLE_CLICK_WINDOW,
            }]
        }
        Event::DoubleClickWindowElapsed { generation } => {
            if generation == state.arm_generation {
                state.pending_double_click = false;
            } else {
                debug!(generation, current = state.arm_generation, "stale disarm ignored");
            }
            Vec::new()
        }
        Event::Loaded(result) => {
            match result {
                Ok(todos) => state.todos = todos,
                Err(err) => error!(%err, rejected = err.is_rejection(), "error fetching todos"),
            }
            Vec::new()
        }
        Event::Created { task, result } => match result {
            Ok(created) => {
                state.todos.push(TodoItem {
                    id: created.id,
                    task,
                    completed: false,
                    last_update: created.updated_at,
                });
                state.input.clear();
                vec![Effect::Notify(Notification::created())]
            }
            Err(err) => {
                error!(%err, rejected = err.is_rejection(), "error creating todo");
                Vec::new()
            }
        },
        Event::Edited { id, task, result } => {
            match result {
                Ok(()) => {
                    if let Some(todo) = state.todo_mut(id) {
                        todo.task = task;
                        todo.last_update = now;
                    }
                    state.editing_todo_id = None;
                }
                Err(err) => error!(%err, %id, rejected = err.is_rejection(), "error updating todo"),
            }
            Vec::new()
        }
        Event::Toggled { id, completed, result } => {
            match result {
                Ok(()) => {
                    if let Some(todo) = state.todo_mut(id) {
                        todo.completed = completed;
                        todo.last_update = now;
                    }
                }
                Err(err) => error!(%err, %id, rejected = err.is_rejection(), "error toggling todo"),
            }
            Vec::new()
        }
        Event::Deleted { id, result } => match result {
            Ok(()) => {
                state.todos.retain(|todo| todo.id != id);
                vec![Effect::Notify(Notification::deleted())]
            }
            Err(err) => {
                error!(%err, %id, rejected = err.is_rejection(), "error deleting todo");
                Vec::new()
            }
        },
    }
}

fn request_create(state: &ViewState) -> Vec<Effect> {
    if state.input.trim().is_empty() {
        debug!("empty input, nothing to create");
        return Vec::new();
    }
    vec![Effect::Store(StoreRequest::Create {
        task: state.input.clone(),
    })]
}

fn begin_edit(state: &mut ViewState, id: TodoId) {
    let Some(task) = state.todo(id).map(|todo| todo.task.clone()) else {
        warn!(%id, "edit requested for unknown todo");
        return;
    };
    state.editing_todo_id = Some(id);
    state.input = task;
}

fn request_update(state: &ViewState, id: TodoId, task: String) -> Vec<Effect> {
    let Some(todo) = state.todo(id) else {
        warn!(%id, "update requested for unknown todo");
        return Vec::new();
    };
    vec![Effect::Store(StoreRequest::Edit {
        id,
        task,
        completed: todo.completed,
    })]
}

fn request_toggle(state: &ViewState, id: TodoId) -> Vec<Effect> {
    let Some(todo) = state.todo(id) else {
        warn!(%id, "toggle requested for unknown todo");
        return Vec::new();
    };
    vec![Effect::Store(StoreRequest::Toggle {
        id,
        task: todo.task.clone(),
        completed: !todo.completed,
    })]
}
