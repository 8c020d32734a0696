//! People/task sync controller.
//!
//! # Responsibility
//! - Own the in-memory lists, the selection, the edit targets and the form
//!   inputs.
//! - Funnel every create/update/delete through the repository and reload the
//!   affected list afterwards.
//!
//! # Invariants
//! - Lists are only ever replaced by a reload; a write never patches them.
//! - Every successful mutation triggers exactly one reload of its list.
//! - Each list carries a monotonic request sequence; a response older than
//!   the last applied one is discarded.
//! - The state mutex is never held across an await point.
//! - Log events carry ids and counts only, never names.

use crate::config::ClientConfig;
use crate::graphql::error::TransportResult;
use crate::graphql::transport::HttpTransport;
use crate::model::name::{validate_name, NameField, NameValidationError};
use crate::model::person::{Person, PersonId};
use crate::model::task::Task;
use crate::repo::error::RepoError;
use crate::repo::graphql_repo::GraphQlRepository;
use crate::repo::person_repo::PersonRepository;
use crate::repo::task_repo::TaskRepository;
use log::{debug, error, info};
use std::fmt::{Display, Formatter};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Instant;
use thiserror::Error;
use tokio::sync::broadcast;

const FAILURE_CHANNEL_CAPACITY: usize = 32;

/// Controller operations, used for failure reporting and logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOperation {
    LoadPeople,
    LoadTasks,
    CreatePerson,
    CreateTask,
    UpdatePerson,
    UpdateTask,
    DeletePerson,
    DeleteTask,
}

impl SyncOperation {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::LoadPeople => "load_people",
            Self::LoadTasks => "load_tasks",
            Self::CreatePerson => "create_person",
            Self::CreateTask => "create_task",
            Self::UpdatePerson => "update_person",
            Self::UpdateTask => "update_task",
            Self::DeletePerson => "delete_person",
            Self::DeleteTask => "delete_task",
        }
    }
}

impl Display for SyncOperation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum SyncError {
    /// Rejected before dispatch; no request was sent.
    #[error(transparent)]
    Validation(#[from] NameValidationError),

    /// Task creation needs a selected person; no request was sent.
    #[error("no person selected")]
    NoPersonSelected,

    /// Save requested with no edit target; no request was sent.
    #[error("no {0} is being edited")]
    NotEditing(&'static str),

    #[error("{operation} failed: {source}")]
    Repo {
        operation: SyncOperation,
        #[source]
        source: RepoError,
    },

    /// The mutation went through but the follow-up reload did not.
    #[error("{operation} succeeded for `{id}` but reload failed: {source}")]
    Reload {
        operation: SyncOperation,
        id: String,
        #[source]
        source: RepoError,
    },
}

impl SyncError {
    /// Whether the operation was rejected locally without a request.
    pub fn is_rejected_before_dispatch(&self) -> bool {
        matches!(
            self,
            Self::Validation(_) | Self::NoPersonSelected | Self::NotEditing(_)
        )
    }
}

pub type SyncResult<T> = Result<T, SyncError>;

/// Failure published to subscribers of [`SyncController::subscribe`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncFailure {
    pub operation: SyncOperation,
    pub code: &'static str,
    pub message: String,
}

/// Result of a list load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The list was replaced with `count` items.
    Applied { count: usize },
    /// A newer load was already applied; this response was dropped.
    Superseded,
    /// Preconditions not met; nothing was requested.
    Skipped,
}

/// Result of a successful mutation and its follow-up reload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationOutcome {
    /// Id echoed back by the server.
    pub id: String,
    pub reload: LoadOutcome,
}

/// Renderable controller state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncState {
    /// Most recently updated first, as returned by the server.
    pub people: Vec<Person>,
    /// Tasks of `tasks_owner` as of the last applied load.
    pub tasks: Vec<Task>,
    pub task_count: Option<u64>,
    pub tasks_owner: Option<PersonId>,
    pub selected_person: Option<Person>,
    pub edit_person: Option<Person>,
    pub edit_task: Option<Task>,
    pub new_person_input: String,
    pub new_task_input: String,
    pub edit_person_input: String,
    pub edit_task_input: String,
}

#[derive(Default)]
struct Inner {
    view: SyncState,
    people_applied: u64,
    tasks_applied: u64,
}

/// Single source of truth for the people and task lists.
///
/// Operations take `&self`, so several may be in flight at once; each list
/// load is tagged so that only the newest response wins.
pub struct SyncController<R> {
    repo: R,
    inner: Mutex<Inner>,
    people_issued: AtomicU64,
    tasks_issued: AtomicU64,
    failures: broadcast::Sender<SyncFailure>,
}

/// Controller wired to the HTTP GraphQL backend.
pub type HttpSyncController = SyncController<GraphQlRepository<HttpTransport>>;

impl HttpSyncController {
    /// Builds the HTTP transport and repository from `config`.
    pub fn connect(config: &ClientConfig) -> TransportResult<Self> {
        let transport = HttpTransport::new(config)?;
        Ok(Self::new(GraphQlRepository::from_config(transport, config)))
    }
}

impl<R> SyncController<R>
where
    R: PersonRepository + TaskRepository,
{
    /// Wraps `repo` with empty lists, no selection and no edit target.
    pub fn new(repo: R) -> Self {
        let (failures, _) = broadcast::channel(FAILURE_CHANNEL_CAPACITY);
        Self {
            repo,
            inner: Mutex::new(Inner::default()),
            people_issued: AtomicU64::new(0),
            tasks_issued: AtomicU64::new(0),
            failures,
        }
    }

    /// Backend the controller reads from and writes to.
    pub fn repository(&self) -> &R {
        &self.repo
    }

    /// Subscribes to repository failures of every later operation.
    pub fn subscribe(&self) -> broadcast::Receiver<SyncFailure> {
        self.failures.subscribe()
    }

    /// Clones the whole state for rendering.
    pub fn snapshot(&self) -> SyncState {
        self.lock().view.clone()
    }

    /// People as of the last applied load.
    pub fn people(&self) -> Vec<Person> {
        self.lock().view.people.clone()
    }

    /// Tasks as of the last applied load, possibly of a previous selection.
    pub fn tasks(&self) -> Vec<Task> {
        self.lock().view.tasks.clone()
    }

    /// Currently selected person, if any.
    pub fn selected_person(&self) -> Option<Person> {
        self.lock().view.selected_person.clone()
    }

    /// Replaces the people list with a fresh server read.
    ///
    /// On failure the current list is kept and the failure is published.
    pub async fn load_people(&self) -> SyncResult<LoadOutcome> {
        let seq = self.people_issued.fetch_add(1, Ordering::SeqCst) + 1;
        let started_at = Instant::now();
        debug!("event=load_people module=sync status=start seq={seq}");

        let people = self
            .repo
            .list_people()
            .await
            .map_err(|err| self.fail(SyncOperation::LoadPeople, err, started_at))?;
        let count = people.len();

        let applied = {
            let mut inner = self.lock();
            if seq > inner.people_applied {
                inner.people_applied = seq;
                inner.view.people = people;
                true
            } else {
                false
            }
        };

        Ok(self.load_finished(SyncOperation::LoadPeople, seq, applied, count, started_at))
    }

    /// Replaces the task list with the tasks owned by `person_id`.
    ///
    /// A no-op returning [`LoadOutcome::Skipped`] while no person is selected.
    pub async fn load_tasks(&self, person_id: &str) -> SyncResult<LoadOutcome> {
        if self.lock().view.selected_person.is_none() {
            debug!("event=load_tasks module=sync status=skipped reason=no_selection");
            return Ok(LoadOutcome::Skipped);
        }

        let seq = self.tasks_issued.fetch_add(1, Ordering::SeqCst) + 1;
        let started_at = Instant::now();
        debug!("event=load_tasks module=sync status=start seq={seq} person_id={person_id}");

        let list = self
            .repo
            .list_tasks(person_id)
            .await
            .map_err(|err| self.fail(SyncOperation::LoadTasks, err, started_at))?;
        let count = list.items.len();

        let applied = {
            let mut inner = self.lock();
            if seq > inner.tasks_applied {
                inner.tasks_applied = seq;
                inner.view.tasks = list.items;
                inner.view.task_count = list.count;
                inner.view.tasks_owner = Some(list.person_id);
                true
            } else {
                false
            }
        };

        Ok(self.load_finished(SyncOperation::LoadTasks, seq, applied, count, started_at))
    }

    /// Creates a person and reloads the people list.
    ///
    /// The new-person input is cleared once the request is dispatched,
    /// whatever its outcome.
    pub async fn create_person(&self, name: &str) -> SyncResult<MutationOutcome> {
        let name = validate_name(NameField::Person, name)?;
        self.lock().view.new_person_input.clear();

        let started_at = Instant::now();
        let id = self
            .repo
            .create_person(name)
            .await
            .map_err(|err| self.fail(SyncOperation::CreatePerson, err, started_at))?;
        self.mutation_finished(SyncOperation::CreatePerson, &id, started_at);

        let reload = self.reload_people(SyncOperation::CreatePerson, &id).await?;
        Ok(MutationOutcome { id, reload })
    }

    /// Creates a task for `person_id` and reloads that person's tasks.
    ///
    /// Requires a valid name and a selected person.
    pub async fn create_task(&self, name: &str, person_id: &str) -> SyncResult<MutationOutcome> {
        let name = validate_name(NameField::Task, name)?;
        if self.lock().view.selected_person.is_none() {
            return Err(SyncError::NoPersonSelected);
        }
        self.lock().view.new_task_input.clear();

        let started_at = Instant::now();
        let id = self
            .repo
            .create_task(person_id, name)
            .await
            .map_err(|err| self.fail(SyncOperation::CreateTask, err, started_at))?;
        self.mutation_finished(SyncOperation::CreateTask, &id, started_at);

        let reload = self
            .reload_tasks_for(SyncOperation::CreateTask, &id, Some(person_id.to_string()))
            .await?;
        Ok(MutationOutcome { id, reload })
    }

    /// Renames a person, clears the person edit state and reloads people.
    pub async fn update_person(&self, id: &str, name: &str) -> SyncResult<MutationOutcome> {
        let name = validate_name(NameField::Person, name)?;
        self.cancel_edit_person();

        let started_at = Instant::now();
        let id = self
            .repo
            .update_person(id, name)
            .await
            .map_err(|err| self.fail(SyncOperation::UpdatePerson, err, started_at))?;
        self.mutation_finished(SyncOperation::UpdatePerson, &id, started_at);

        let reload = self.reload_people(SyncOperation::UpdatePerson, &id).await?;
        Ok(MutationOutcome { id, reload })
    }

    /// Renames a task, clears the task edit state and reloads the tasks of
    /// the selected person.
    pub async fn update_task(&self, id: &str, name: &str) -> SyncResult<MutationOutcome> {
        let name = validate_name(NameField::Task, name)?;
        self.cancel_edit_task();

        let started_at = Instant::now();
        let id = self
            .repo
            .update_task(id, name)
            .await
            .map_err(|err| self.fail(SyncOperation::UpdateTask, err, started_at))?;
        self.mutation_finished(SyncOperation::UpdateTask, &id, started_at);

        let owner = self.selected_person_id();
        let reload = self
            .reload_tasks_for(SyncOperation::UpdateTask, &id, owner)
            .await?;
        Ok(MutationOutcome { id, reload })
    }

    /// Deletes a person immediately and reloads people.
    pub async fn delete_person(&self, id: &str) -> SyncResult<MutationOutcome> {
        let started_at = Instant::now();
        let id = self
            .repo
            .delete_person(id)
            .await
            .map_err(|err| self.fail(SyncOperation::DeletePerson, err, started_at))?;
        self.mutation_finished(SyncOperation::DeletePerson, &id, started_at);

        let reload = self.reload_people(SyncOperation::DeletePerson, &id).await?;
        Ok(MutationOutcome { id, reload })
    }

    /// Deletes a task immediately and reloads the tasks of the selected
    /// person.
    pub async fn delete_task(&self, id: &str) -> SyncResult<MutationOutcome> {
        let started_at = Instant::now();
        let id = self
            .repo
            .delete_task(id)
            .await
            .map_err(|err| self.fail(SyncOperation::DeleteTask, err, started_at))?;
        self.mutation_finished(SyncOperation::DeleteTask, &id, started_at);

        let owner = self.selected_person_id();
        let reload = self
            .reload_tasks_for(SyncOperation::DeleteTask, &id, owner)
            .await?;
        Ok(MutationOutcome { id, reload })
    }

    /// Creates a person from the new-person input.
    pub async fn submit_new_person(&self) -> SyncResult<MutationOutcome> {
        let name = self.lock().view.new_person_input.clone();
        self.create_person(&name).await
    }

    /// Creates a task for the selected person from the new-task input.
    pub async fn submit_new_task(&self) -> SyncResult<MutationOutcome> {
        let (name, person_id) = {
            let inner = self.lock();
            (
                inner.view.new_task_input.clone(),
                inner.view.selected_person.as_ref().map(|p| p.id.clone()),
            )
        };
        validate_name(NameField::Task, &name)?;
        let person_id = person_id.ok_or(SyncError::NoPersonSelected)?;
        self.create_task(&name, &person_id).await
    }

    /// Saves the person edit field onto the person being edited.
    pub async fn save_edit_person(&self) -> SyncResult<MutationOutcome> {
        let (target, name) = {
            let inner = self.lock();
            (
                inner.view.edit_person.as_ref().map(|p| p.id.clone()),
                inner.view.edit_person_input.clone(),
            )
        };
        let target = target.ok_or(SyncError::NotEditing("person"))?;
        self.update_person(&target, &name).await
    }

    /// Saves the task edit field onto the task being edited.
    pub async fn save_edit_task(&self) -> SyncResult<MutationOutcome> {
        let (target, name) = {
            let inner = self.lock();
            (
                inner.view.edit_task.as_ref().map(|t| t.id.clone()),
                inner.view.edit_task_input.clone(),
            )
        };
        let target = target.ok_or(SyncError::NotEditing("task"))?;
        self.update_task(&target, &name).await
    }

    /// Sets the selection. Tasks are not reloaded and task edit state is
    /// left as is; call [`Self::load_tasks`] explicitly.
    pub fn select_person(&self, person: Person) {
        debug!("event=select_person module=sync status=ok person_id={}", person.id);
        self.lock().view.selected_person = Some(person);
    }

    /// Drops the selection. Loaded tasks are kept.
    pub fn clear_selection(&self) {
        self.lock().view.selected_person = None;
    }

    /// Marks `person` as edited and pre-fills the edit field with its name.
    pub fn begin_edit_person(&self, person: Person) {
        let mut inner = self.lock();
        inner.view.edit_person_input = person.name.clone();
        inner.view.edit_person = Some(person);
    }

    /// Marks `task` as edited and pre-fills the edit field with its name.
    pub fn begin_edit_task(&self, task: Task) {
        let mut inner = self.lock();
        inner.view.edit_task_input = task.name.clone();
        inner.view.edit_task = Some(task);
    }

    /// Leaves person edit mode and empties its field.
    pub fn cancel_edit_person(&self) {
        let mut inner = self.lock();
        inner.view.edit_person = None;
        inner.view.edit_person_input.clear();
    }

    /// Leaves task edit mode and empties its field.
    pub fn cancel_edit_task(&self) {
        let mut inner = self.lock();
        inner.view.edit_task = None;
        inner.view.edit_task_input.clear();
    }

    /// Replaces the new-person field.
    pub fn set_new_person_input(&self, text: impl Into<String>) {
        self.lock().view.new_person_input = text.into();
    }

    /// Replaces the new-task field.
    pub fn set_new_task_input(&self, text: impl Into<String>) {
        self.lock().view.new_task_input = text.into();
    }

    /// Replaces the person edit field.
    pub fn set_edit_person_input(&self, text: impl Into<String>) {
        self.lock().view.edit_person_input = text.into();
    }

    /// Replaces the task edit field.
    pub fn set_edit_task_input(&self, text: impl Into<String>) {
        self.lock().view.edit_task_input = text.into();
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // State stays consistent on panic: every write is a single assignment.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn selected_person_id(&self) -> Option<PersonId> {
        self.lock()
            .view
            .selected_person
            .as_ref()
            .map(|p| p.id.clone())
    }

    async fn reload_people(&self, operation: SyncOperation, id: &str) -> SyncResult<LoadOutcome> {
        self.load_people()
            .await
            .map_err(|err| into_reload_error(err, operation, id))
    }

    async fn reload_tasks_for(
        &self,
        operation: SyncOperation,
        id: &str,
        owner: Option<PersonId>,
    ) -> SyncResult<LoadOutcome> {
        let Some(owner) = owner else {
            debug!(
                "event=reload_tasks module=sync status=skipped operation={operation} reason=no_selection"
            );
            return Ok(LoadOutcome::Skipped);
        };
        self.load_tasks(&owner)
            .await
            .map_err(|err| into_reload_error(err, operation, id))
    }

    fn load_finished(
        &self,
        operation: SyncOperation,
        seq: u64,
        applied: bool,
        count: usize,
        started_at: Instant,
    ) -> LoadOutcome {
        if applied {
            info!(
                "event={} module=sync status=ok seq={} count={} duration_ms={}",
                operation,
                seq,
                count,
                started_at.elapsed().as_millis()
            );
            LoadOutcome::Applied { count }
        } else {
            info!(
                "event={} module=sync status=superseded seq={} duration_ms={}",
                operation,
                seq,
                started_at.elapsed().as_millis()
            );
            LoadOutcome::Superseded
        }
    }

    fn mutation_finished(&self, operation: SyncOperation, id: &str, started_at: Instant) {
        info!(
            "event={} module=sync status=ok id={} duration_ms={}",
            operation,
            id,
            started_at.elapsed().as_millis()
        );
    }

    fn fail(&self, operation: SyncOperation, err: RepoError, started_at: Instant) -> SyncError {
        error!(
            "event={} module=sync status=error duration_ms={} error_code={} error={}",
            operation,
            started_at.elapsed().as_millis(),
            err.code(),
            err
        );
        // No subscribers is fine; the error is still returned.
        let _ = self.failures.send(SyncFailure {
            operation,
            code: err.code(),
            message: err.to_string(),
        });
        SyncError::Repo {
            operation,
            source: err,
        }
    }
}

fn into_reload_error(err: SyncError, operation: SyncOperation, id: &str) -> SyncError {
    match err {
        SyncError::Repo { source, .. } => SyncError::Reload {
            operation,
            id: id.to_string(),
            source,
        },
        other => other,
    }
}
