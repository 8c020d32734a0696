//! Person repository contract.

use crate::model::person::{Person, PersonId};
use crate::repo::error::RepoResult;
use async_trait::async_trait;

/// Data access for people.
///
/// Writes return the id echoed back by the server.
#[async_trait]
pub trait PersonRepository: Send + Sync {
    /// All people, most recently updated first.
    async fn list_people(&self) -> RepoResult<Vec<Person>>;
    async fn create_person(&self, name: &str) -> RepoResult<PersonId>;
    async fn update_person(&self, id: &str, name: &str) -> RepoResult<PersonId>;
    async fn delete_person(&self, id: &str) -> RepoResult<PersonId>;
}
