//! Domain items and the wire DTOs of the remote store.
//!
//! The store wraps every payload in `{ "data": ... }` and keeps the todo text
//! and completion flag under the attribute names `data` and `status`. The
//! serde renames below are the only place that vocabulary leaks in; the rest
//! of the crate speaks `task` and `completed`.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier assigned by the remote store. Never minted client-side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TodoId(pub u64);

impl fmt::Display for TodoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A todo as held by the view state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoItem {
    pub id: TodoId,
    pub task: String,
    pub completed: bool,
    pub last_update: DateTime<Utc>,
}

/// `{ "data": T }` wrapper used for request bodies and response bodies.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub data: T,
}

/// Writable fields of a todo, as sent on create and update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoFields {
    #[serde(rename = "data")]
    pub task: String,
    #[serde(rename = "status")]
    pub completed: bool,
}

/// A stored todo as returned by the list endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct Record {
    pub id: TodoId,
    pub attributes: RecordAttributes,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RecordAttributes {
    // The store allows both fields to be null.
    #[serde(rename = "data", default)]
    pub task: Option<String>,
    #[serde(rename = "status", default)]
    pub completed: Option<bool>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

impl From<Record> for TodoItem {
    fn from(record: Record) -> Self {
        TodoItem {
            id: record.id,
            task: record.attributes.task.unwrap_or_default(),
            completed: record.attributes.completed.unwrap_or(false),
            last_update: record.attributes.updated_at,
        }
    }
}

/// The parts of a create response the client consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CreatedTodo {
    pub id: TodoId,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CreatedRecord {
    pub id: TodoId,
    pub attributes: CreatedAttributes,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CreatedAttributes {
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

impl From<CreatedRecord> for CreatedTodo {
    fn from(record: CreatedRecord) -> Self {
        CreatedTodo {
            id: record.id,
            updated_at: record.attributes.updated_at,
        }
    }
}
