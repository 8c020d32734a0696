//! Name validation for person and task writes.
//!
//! # Invariants
//! - A name is valid when it has at least one non-whitespace character.
//! - Valid names are passed through verbatim; validation never trims or
//!   rewrites the text that is sent to the server.

use thiserror::Error;

/// Which form field a name belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameField {
    Person,
    Task,
}

impl NameField {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Person => "person",
            Self::Task => "task",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NameValidationError {
    #[error("{} name is required", .0.as_str())]
    Empty(NameField),
}

/// Checks a user-entered name and returns it unchanged when valid.
pub fn validate_name(field: NameField, name: &str) -> Result<&str, NameValidationError> {
    if name.trim().is_empty() {
        return Err(NameValidationError::Empty(field));
    }
    Ok(name)
}
