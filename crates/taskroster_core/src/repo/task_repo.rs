//! Task repository contract.

use crate::model::task::{TaskId, TaskList};
use crate::repo::error::RepoResult;
use async_trait::async_trait;

/// Data access for tasks.
///
/// # Invariants
/// - `list_tasks` returns only tasks owned by `person_id`, most recently
///   updated first.
/// - `create_task` links the new task to exactly one person.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    async fn list_tasks(&self, person_id: &str) -> RepoResult<TaskList>;
    async fn create_task(&self, person_id: &str, name: &str) -> RepoResult<TaskId>;
    async fn update_task(&self, id: &str, name: &str) -> RepoResult<TaskId>;
    async fn delete_task(&self, id: &str) -> RepoResult<TaskId>;
}

