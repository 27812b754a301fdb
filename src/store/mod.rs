pub mod memory;

use chrono::NaiveDate;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;

use crate::core::project::Project;
use crate::core::task::{NewTask, Task};
use crate::core::validation::ValidationError;

pub use memory::MemoryStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("task {0} not found")]
    TaskNotFound(String),
    #[error("project {0} not found")]
    ProjectNotFound(String),
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    #[error("store call timed out after {0:?}")]
    Timeout(Duration),
    #[error("store I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("store data is malformed: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("{0}")]
    Backend(String),
}

/// The persistence operations the lifecycle coordinator relies on.
///
/// Implementations own ids, creation timestamps and storage; the core only
/// hands them values to write.
pub trait TaskStore {
    fn get_task(&self, id: &str) -> impl Future<Output = Result<Option<Task>, StoreError>> + Send;

    /// Store a new task and return its id.
    fn create_task(&self, fields: NewTask) -> impl Future<Output = Result<String, StoreError>> + Send;

    /// Replace a task's content. Callers validate before calling.
    fn update_task_content(&self, id: &str, content: &str) -> impl Future<Output = Result<(), StoreError>> + Send;

    fn update_task_description(
        &self,
        id: &str,
        description: Option<String>,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    fn update_task_completion(
        &self,
        id: &str,
        completed: bool,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    fn update_task_schedule(
        &self,
        id: &str,
        due_date: Option<NaiveDate>,
        recurrence_anchor: Option<NaiveDate>,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    fn list_projects(&self) -> impl Future<Output = Result<Vec<Project>, StoreError>> + Send;
}
