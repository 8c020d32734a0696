//! Person record.

use serde::{Deserialize, Serialize};

/// Server-assigned person identifier.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type PersonId = String;

/// One person as listed by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub id: PersonId,
    pub name: String,
}

impl Person {
    pub fn new(id: impl Into<PersonId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}
