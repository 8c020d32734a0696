//! Core client logic for TaskRoster.
//! This crate is the single source of truth for the people/task sync rules.

pub mod config;
pub mod graphql;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::{ClientConfig, ConfigError, ErrorPolicy};
pub use graphql::{GraphQlTransport, HttpTransport, TransportError};
pub use logging::{
    default_log_level, init_logging, logging_status, LoggingError, LoggingOptions, LoggingStatus,
};
pub use model::name::{validate_name, NameField, NameValidationError};
pub use model::person::{Person, PersonId};
pub use model::task::{Task, TaskId, TaskList};
pub use repo::error::{RepoError, RepoResult};
pub use repo::graphql_repo::GraphQlRepository;
pub use repo::person_repo::PersonRepository;
pub use repo::task_repo::TaskRepository;
pub use service::sync_controller::{
    HttpSyncController, LoadOutcome, MutationOutcome, SyncController, SyncError, SyncFailure,
    SyncOperation, SyncResult, SyncState,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
