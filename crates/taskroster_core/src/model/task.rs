//! Task record.
//!
//! A task always belongs to exactly one person. The owning relation lives on
//! the server and is set at creation time; the client only keeps the list it
//! last loaded for a given person.

use crate::model::person::PersonId;
use serde::{Deserialize, Serialize};

/// Server-assigned task identifier.
pub type TaskId = String;

/// One task as listed by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub name: String,
}

impl Task {
    pub fn new(id: impl Into<TaskId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Task list for one person, in server order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskList {
    /// Owner the list was requested for.
    pub person_id: PersonId,
    /// Total reported by the server, when present in the response.
    pub count: Option<u64>,
    /// Items sorted by `updatedAt DESC` as returned by the server.
    pub items: Vec<Task>,
}
