//! Request and response envelopes for the GraphQL backend.
//!
//! # Responsibility
//! - Serialise requests as the standard `{query, variables, operationName}`
//!   JSON body.
//! - Give every operation an explicit typed `data` shape, including the
//!   `edges { node }` connection envelope used by list queries.
//!
//! # Invariants
//! - `null` lists decode as empty; `null` objects decode as `None`.

use crate::model::person::Person;
use crate::model::task::Task;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt::{Display, Formatter};

/// One GraphQL operation ready to be sent.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphQlRequest {
    pub query: String,
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub variables: Map<String, Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation_name: Option<String>,
}

impl GraphQlRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            variables: Map::new(),
            operation_name: None,
        }
    }

    pub fn operation(mut self, name: impl Into<String>) -> Self {
        self.operation_name = Some(name.into());
        self
    }

    pub fn variable(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.variables.insert(name.into(), value.into());
        self
    }

    /// Operation name for log events.
    pub fn label(&self) -> &str {
        self.operation_name.as_deref().unwrap_or("anonymous")
    }
}

/// One entry of the top-level `errors` array.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GraphQlError {
    pub message: String,
    #[serde(default)]
    pub path: Option<Vec<Value>>,
    #[serde(default)]
    pub locations: Option<Vec<ErrorLocation>>,
    #[serde(default)]
    pub extensions: Option<Value>,
}

/// Position in the query document an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct ErrorLocation {
    pub line: u32,
    pub column: u32,
}

impl Display for GraphQlError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.path {
            Some(path) if !path.is_empty() => {
                let joined = path
                    .iter()
                    .map(|segment| match segment {
                        Value::String(text) => text.clone(),
                        other => other.to_string(),
                    })
                    .collect::<Vec<_>>()
                    .join(".");
                write!(f, "{} (at {joined})", self.message)
            }
            _ => write!(f, "{}", self.message),
        }
    }
}

/// Raw response envelope; `data` is decoded per operation afterwards.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct GraphQlResponse {
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub errors: Vec<GraphQlError>,
}

impl GraphQlResponse {
    /// Whether the body carried anything GraphQL-shaped at all.
    pub fn has_payload(&self) -> bool {
        self.data.is_some() || !self.errors.is_empty()
    }

    pub fn error_summary(&self) -> String {
        self.errors
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Decodes a `data` value into the typed shape of one operation.
pub fn decode_data<D: DeserializeOwned>(data: Value) -> Result<D, serde_json::Error> {
    serde_json::from_value(data)
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Relay-style `{ count, edges { node } }` envelope.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(bound(deserialize = "N: Deserialize<'de>"))]
pub struct Connection<N> {
    #[serde(default)]
    pub count: Option<u64>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub edges: Vec<Edge<N>>,
}

impl<N> Connection<N> {
    /// Nodes in server order; `null` nodes are skipped.
    pub fn into_nodes(self) -> Vec<N> {
        self.edges.into_iter().filter_map(|edge| edge.node).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Edge<N> {
    pub node: Option<N>,
}

/// `{ id, name }` node shared by person and task listings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RecordNode {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
}

impl From<RecordNode> for Person {
    fn from(node: RecordNode) -> Self {
        Person::new(node.id, node.name.unwrap_or_default())
    }
}

impl From<RecordNode> for Task {
    fn from(node: RecordNode) -> Self {
        Task::new(node.id, node.name.unwrap_or_default())
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PeopleData {
    #[serde(default)]
    pub people: Option<Connection<RecordNode>>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TasksData {
    #[serde(default)]
    pub tasks: Option<Connection<RecordNode>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct IdNode {
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PersonPayload {
    #[serde(default)]
    pub person: Option<IdNode>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TaskPayload {
    #[serde(default)]
    pub task: Option<IdNode>,
}

/// Typed `data` of a mutation that echoes back the affected id.
pub trait MutationData: DeserializeOwned {
    /// Root field name, used in `MissingData` errors.
    const FIELD: &'static str;

    fn into_id(self) -> Option<String>;
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePersonData {
    #[serde(default)]
    pub create_person: Option<PersonPayload>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePersonData {
    #[serde(default)]
    pub update_person: Option<PersonPayload>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletePersonData {
    #[serde(default)]
    pub delete_person: Option<PersonPayload>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskData {
    #[serde(default)]
    pub create_task: Option<TaskPayload>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskData {
    #[serde(default)]
    pub update_task: Option<TaskPayload>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteTaskData {
    #[serde(default)]
    pub delete_task: Option<TaskPayload>,
}

impl MutationData for CreatePersonData {
    const FIELD: &'static str = "createPerson";

    fn into_id(self) -> Option<String> {
        self.create_person.and_then(|p| p.person).map(|n| n.id)
    }
}

impl MutationData for UpdatePersonData {
    const FIELD: &'static str = "updatePerson";

    fn into_id(self) -> Option<String> {
        self.update_person.and_then(|p| p.person).map(|n| n.id)
    }
}

impl MutationData for DeletePersonData {
    const FIELD: &'static str = "deletePerson";

    fn into_id(self) -> Option<String> {
        self.delete_person.and_then(|p| p.person).map(|n| n.id)
    }
}

impl MutationData for CreateTaskData {
    const FIELD: &'static str = "createTask";

    fn into_id(self) -> Option<String> {
        self.create_task.and_then(|p| p.task).map(|n| n.id)
    }
}

impl MutationData for UpdateTaskData {
    const FIELD: &'static str = "updateTask";

    fn into_id(self) -> Option<String> {
        self.update_task.and_then(|p| p.task).map(|n| n.id)
    }
}

impl MutationData for DeleteTaskData {
    const FIELD: &'static str = "deleteTask";

    fn into_id(self) -> Option<String> {
        self.delete_task.and_then(|p| p.task).map(|n| n.id)
    }
}
