//! GraphQL-backed person and task repositories.
//!
//! # Responsibility
//! - Build the fixed documents with their variables.
//! - Apply the configured error policy to each response envelope.
//! - Decode `data` into typed records at this boundary.
//!
//! # Invariants
//! - A `null` root field is reported as `MissingData`, never unwrapped.
//! - Mutations succeed only when the server echoes back an id.

use crate::config::{ClientConfig, ErrorPolicy};
use crate::graphql::documents::{
    CREATE_PERSON_MUTATION, CREATE_TASK_MUTATION, DELETE_PERSON_MUTATION, DELETE_TASK_MUTATION,
    PEOPLE_QUERY, TASKS_QUERY, UPDATE_PERSON_MUTATION, UPDATE_TASK_MUTATION,
};
use crate::graphql::transport::GraphQlTransport;
use crate::graphql::wire::{
    decode_data, CreatePersonData, CreateTaskData, DeletePersonData, DeleteTaskData,
    GraphQlRequest, GraphQlResponse, MutationData, PeopleData, TasksData, UpdatePersonData,
    UpdateTaskData,
};
use crate::model::person::{Person, PersonId};
use crate::model::task::{Task, TaskId, TaskList};
use crate::repo::error::{RepoError, RepoResult};
use crate::repo::person_repo::PersonRepository;
use crate::repo::task_repo::TaskRepository;
use async_trait::async_trait;
use log::warn;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Repository implementation over any [`GraphQlTransport`].
pub struct GraphQlRepository<T: GraphQlTransport> {
    transport: T,
    query_policy: ErrorPolicy,
    mutation_policy: ErrorPolicy,
}

impl<T: GraphQlTransport> GraphQlRepository<T> {
    /// Uses the default policies: `all` for queries, `none` for mutations.
    pub fn new(transport: T) -> Self {
        Self::with_policies(transport, ErrorPolicy::All, ErrorPolicy::None)
    }

    pub fn with_policies(
        transport: T,
        query_policy: ErrorPolicy,
        mutation_policy: ErrorPolicy,
    ) -> Self {
        Self {
            transport,
            query_policy,
            mutation_policy,
        }
    }

    pub fn from_config(transport: T, config: &ClientConfig) -> Self {
        Self::with_policies(
            transport,
            config.query_error_policy,
            config.mutation_error_policy,
        )
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    async fn query<D: DeserializeOwned>(
        &self,
        operation: &'static str,
        request: GraphQlRequest,
    ) -> RepoResult<D> {
        let response = self.transport.execute(&request).await?;
        let data = accept_response(response, self.query_policy, operation)?;
        decode_data(data).map_err(|err| RepoError::Decode {
            operation,
            message: err.to_string(),
        })
    }

    async fn mutate<D: MutationData>(&self, request: GraphQlRequest) -> RepoResult<String> {
        let response = self.transport.execute(&request).await?;
        let data = accept_response(response, self.mutation_policy, D::FIELD)?;
        let payload: D = decode_data(data).map_err(|err| RepoError::Decode {
            operation: D::FIELD,
            message: err.to_string(),
        })?;
        payload.into_id().ok_or(RepoError::MissingData(D::FIELD))
    }
}

/// Applies `policy` to a response envelope and returns its `data`.
///
/// - No data and no errors: `MissingData("data")`.
/// - No data with errors: `GraphQl` regardless of policy.
/// - Data with errors: `none` fails; `ignore` drops the errors; `all` logs
///   them and keeps the data.
pub fn accept_response(
    response: GraphQlResponse,
    policy: ErrorPolicy,
    operation: &str,
) -> RepoResult<Value> {
    let GraphQlResponse { data, errors } = response;
    match data {
        None if errors.is_empty() => Err(RepoError::MissingData("data")),
        None => Err(RepoError::GraphQl(errors)),
        Some(_) if !errors.is_empty() && policy == ErrorPolicy::None => {
            Err(RepoError::GraphQl(errors))
        }
        Some(data) => {
            if !errors.is_empty() && policy == ErrorPolicy::All {
                warn!(
                    "event=graphql_partial module=repo status=ok operation={} policy={} error_count={}",
                    operation,
                    policy.as_str(),
                    errors.len()
                );
            }
            Ok(data)
        }
    }
}

#[async_trait]
impl<T: GraphQlTransport> PersonRepository for GraphQlRepository<T> {
    async fn list_people(&self) -> RepoResult<Vec<Person>> {
        let request = GraphQlRequest::new(PEOPLE_QUERY).operation("getPeople");
        let data: PeopleData = self.query("people", request).await?;
        let people = data.people.ok_or(RepoError::MissingData("people"))?;
        Ok(people.into_nodes().into_iter().map(Person::from).collect())
    }

    async fn create_person(&self, name: &str) -> RepoResult<PersonId> {
        let request = GraphQlRequest::new(CREATE_PERSON_MUTATION)
            .operation("createPerson")
            .variable("name", name);
        self.mutate::<CreatePersonData>(request).await
    }

    async fn update_person(&self, id: &str, name: &str) -> RepoResult<PersonId> {
        let request = GraphQlRequest::new(UPDATE_PERSON_MUTATION)
            .operation("updatePerson")
            .variable("name", name)
            .variable("id", id);
        self.mutate::<UpdatePersonData>(request).await
    }

    async fn delete_person(&self, id: &str) -> RepoResult<PersonId> {
        let request = GraphQlRequest::new(DELETE_PERSON_MUTATION)
            .operation("deletePerson")
            .variable("personId", id);
        self.mutate::<DeletePersonData>(request).await
    }
}

#[async_trait]
impl<T: GraphQlTransport> TaskRepository for GraphQlRepository<T> {
    async fn list_tasks(&self, person_id: &str) -> RepoResult<TaskList> {
        let request = GraphQlRequest::new(TASKS_QUERY)
            .operation("getTasks")
            .variable("personId", person_id);
        let data: TasksData = self.query("tasks", request).await?;
        let tasks = data.tasks.ok_or(RepoError::MissingData("tasks"))?;
        let count = tasks.count;
        Ok(TaskList {
            person_id: person_id.to_string(),
            count,
            items: tasks.into_nodes().into_iter().map(Task::from).collect(),
        })
    }

    async fn create_task(&self, person_id: &str, name: &str) -> RepoResult<TaskId> {
        let request = GraphQlRequest::new(CREATE_TASK_MUTATION)
            .operation("createTask")
            .variable("name", name)
            .variable("personId", person_id);
        self.mutate::<CreateTaskData>(request).await
    }

    async fn update_task(&self, id: &str, name: &str) -> RepoResult<TaskId> {
        let request = GraphQlRequest::new(UPDATE_TASK_MUTATION)
            .operation("updateTask")
            .variable("name", name)
            .variable("id", id);
        self.mutate::<UpdateTaskData>(request).await
    }

    async fn delete_task(&self, id: &str) -> RepoResult<TaskId> {
        let request = GraphQlRequest::new(DELETE_TASK_MUTATION)
            .operation("deleteTask")
            .variable("taskId", id);
        self.mutate::<DeleteTaskData>(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graphql::wire::GraphQlError;
    use serde_json::json;

    fn error(message: &str) -> GraphQlError {
        GraphQlError {
            message: message.into(),
            path: None,
            locations: None,
            extensions: None,
        }
    }

    #[test]
    fn data_without_errors_is_accepted_under_every_policy() {
        for policy in [ErrorPolicy::None, ErrorPolicy::Ignore, ErrorPolicy::All] {
            let response = GraphQlResponse {
                data: Some(json!({"people": null})),
                errors: vec![],
            };
            assert!(accept_response(response, policy, "people").is_ok());
        }
    }

    #[test]
    fn partial_data_follows_policy() {
        let partial = || GraphQlResponse {
            data: Some(json!({"tasks": {"edges": []}})),
            errors: vec![error("permission denied on one edge")],
        };
        assert!(matches!(
            accept_response(partial(), ErrorPolicy::None, "tasks"),
            Err(RepoError::GraphQl(_))
        ));
        assert!(accept_response(partial(), ErrorPolicy::Ignore, "tasks").is_ok());
        assert!(accept_response(partial(), ErrorPolicy::All, "tasks").is_ok());
    }

    #[test]
    fn missing_data_is_reported_not_dereferenced() {
        let empty = GraphQlResponse::default();
        assert!(matches!(
            accept_response(empty, ErrorPolicy::All, "people"),
            Err(RepoError::MissingData("data"))
        ));

        let only_errors = GraphQlResponse {
            data: None,
            errors: vec![error("syntax error")],
        };
        assert!(matches!(
            accept_response(only_errors, ErrorPolicy::Ignore, "people"),
            Err(RepoError::GraphQl(errors)) if errors.len() == 1
        ));
    }
}
