//! Repository error taxonomy.

use crate::graphql::error::TransportError;
use crate::graphql::wire::GraphQlError;
use thiserror::Error;

pub type RepoResult<T> = Result<T, RepoError>;

#[derive(Debug, Error)]
pub enum RepoError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// GraphQL errors rejected by the active error policy.
    #[error("GraphQL error: {}", join_errors(.0))]
    GraphQl(Vec<GraphQlError>),

    /// `data` did not match the typed shape of the operation.
    #[error("invalid {operation} response: {message}")]
    Decode {
        operation: &'static str,
        message: String,
    },

    /// An expected field was absent or `null`.
    #[error("response is missing `{0}`")]
    MissingData(&'static str),
}

impl RepoError {
    /// Stable code used in log events.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Transport(err) => err.code(),
            Self::GraphQl(_) => "graphql_error",
            Self::Decode { .. } => "bad_data",
            Self::MissingData(_) => "missing_data",
        }
    }
}

fn join_errors(errors: &[GraphQlError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
