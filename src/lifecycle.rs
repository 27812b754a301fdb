use chrono::{NaiveDate, NaiveDateTime};
use std::future::Future;
use std::time::Duration;
use thiserror::Error;

use crate::core::project::Project;
use crate::core::recurrence::RecurrenceRule;
use crate::core::task::{NewTask, Priority, Task};
use crate::core::validation::{ValidationError, validate_description, validate_new_task, validate_task_input};
use crate::input::parser::{ParsedTaskInput, parse_task_input};
use crate::store::{StoreError, TaskStore};

#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("task {0} not found")]
    TaskNotFound(String),
}

/// What the user asked for when adding a task, before defaults are applied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskDraft {
    pub content: String,
    pub description: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub recurrence: Option<RecurrenceRule>,
    /// Explicit anchor; when absent the due date is used.
    pub recurrence_anchor: Option<NaiveDate>,
    pub project_id: Option<String>,
    pub priority: Option<Priority>,
    pub order: Option<i64>,
}

impl TaskDraft {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Self::default()
        }
    }

    pub fn from_parsed(parsed: ParsedTaskInput) -> Self {
        Self {
            due_date: parsed.due_date(),
            priority: parsed.priority,
            project_id: parsed.project_id,
            content: parsed.content,
            ..Self::default()
        }
    }

    pub fn due(mut self, date: NaiveDate) -> Self {
        self.due_date = Some(date);
        self
    }

    pub fn every(mut self, rule: RecurrenceRule) -> Self {
        self.recurrence = Some(rule);
        self
    }

    /// Apply creation defaults and validate.
    pub fn into_new_task(self, default_order: i64) -> Result<NewTask, ValidationError> {
        let task = NewTask {
            content: self.content.trim().to_string(),
            description: self.description.filter(|d| !d.trim().is_empty()),
            due_date: self.due_date,
            is_recurring: false,
            recurrence: None,
            recurrence_anchor: self.recurrence_anchor.or(self.due_date),
            project_id: self.project_id,
            order: self.order.unwrap_or(default_order),
            priority: self.priority,
        }
        .with_recurrence(self.recurrence);
        validate_new_task(&task)?;
        Ok(task)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompletionOutcome {
    /// The task already had the requested state; nothing was written.
    Unchanged,
    Reopened,
    Completed { successor_id: Option<String> },
}

/// The date a recurring task's next occurrence is computed from: its anchor,
/// else its due date, else `today`.
pub fn resolve_anchor(task: &Task, today: NaiveDate) -> NaiveDate {
    task.recurrence_anchor.or(task.due_date).unwrap_or(today)
}

/// Fields for the task that replaces `task` once it is completed, or `None`
/// when it does not recur.
///
/// The successor's due date and anchor are both the computed next
/// occurrence, so each completion chains from the previous successor rather
/// than from the original date or from the day it was ticked off.
pub fn complete_recurring_task(task: &Task, today: NaiveDate) -> Option<NewTask> {
    let parsed = task.recurrence_parse()?;
    let phrase = task.recurrence.clone()?;
    if parsed.is_fallback() {
        log::warn!("Unrecognized recurrence {:?} on task {}, repeating weekly", phrase, task.id);
    }
    let next = parsed.rule().next_after(resolve_anchor(task, today));

    Some(NewTask {
        content: task.content.clone(),
        description: task.description.clone(),
        due_date: Some(next),
        is_recurring: true,
        recurrence: Some(phrase),
        recurrence_anchor: Some(next),
        project_id: task.project_id.clone(),
        order: task.order,
        priority: task.priority,
    })
}

/// Drives task creation and completion against a store.
pub struct TaskLifecycle<S> {
    store: S,
    timeout: Option<Duration>,
}

impl<S: TaskStore> TaskLifecycle<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            timeout: None,
        }
    }

    /// Bound every store call; an expired call fails with `StoreError::Timeout`.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    async fn call<T>(&self, op: impl Future<Output = Result<T, StoreError>>) -> Result<T, StoreError> {
        match self.timeout {
            Some(limit) => tokio::time::timeout(limit, op)
                .await
                .map_err(|_| StoreError::Timeout(limit))?,
            None => op.await,
        }
    }

    pub async fn create_task(&self, draft: TaskDraft) -> Result<String, LifecycleError> {
        let fields = draft.into_new_task(chrono::Utc::now().timestamp_millis())?;
        let id = self.call(self.store.create_task(fields)).await?;
        log::debug!("Created task {}", id);
        Ok(id)
    }

    /// Parse quick-add text against the given projects and create the task.
    pub async fn create_from_input(
        &self,
        text: &str,
        projects: &[Project],
        now: NaiveDateTime,
        recurrence: Option<RecurrenceRule>,
    ) -> Result<String, LifecycleError> {
        let mut draft = TaskDraft::from_parsed(parse_task_input(text, projects, now));
        draft.recurrence = recurrence;
        self.create_task(draft).await
    }

    /// Set a task's completion flag.
    ///
    /// Completing a recurring task first creates its successor and only then
    /// flips the flag. If the successor cannot be created the task stays open,
    /// so toggling it again retries cleanly. The two writes are not atomic:
    /// a failure after the successor exists leaves both tasks open.
    pub async fn set_completion(
        &self,
        id: &str,
        completed: bool,
        today: NaiveDate,
    ) -> Result<CompletionOutcome, LifecycleError> {
        let task = self
            .call(self.store.get_task(id))
            .await?
            .ok_or_else(|| LifecycleError::TaskNotFound(id.to_string()))?;

        if task.is_completed == completed {
            return Ok(CompletionOutcome::Unchanged);
        }

        if !completed {
            self.call(self.store.update_task_completion(id, false)).await?;
            log::debug!("Reopened task {}", id);
            return Ok(CompletionOutcome::Reopened);
        }

        let successor_id = match complete_recurring_task(&task, today) {
            Some(successor) => {
                let due = successor.due_date;
                let successor_id = self
                    .call(self.store.create_task(successor))
                    .await
                    .inspect_err(|e| log::warn!("Could not create successor of task {}: {}", id, e))?;
                log::info!("Task {} recurs as {} due {:?}", id, successor_id, due);
                Some(successor_id)
            }
            None => None,
        };

        self.call(self.store.update_task_completion(id, true)).await?;
        Ok(CompletionOutcome::Completed { successor_id })
    }

    pub async fn toggle_completion(&self, id: &str, today: NaiveDate) -> Result<CompletionOutcome, LifecycleError> {
        let task = self
            .call(self.store.get_task(id))
            .await?
            .ok_or_else(|| LifecycleError::TaskNotFound(id.to_string()))?;
        self.set_completion(id, !task.is_completed, today).await
    }

    /// Replace a task's content; blank or over-length text is rejected
    /// before the store is touched.
    pub async fn edit_content(&self, id: &str, content: &str) -> Result<(), LifecycleError> {
        let content = content.trim();
        validate_task_input(content, None)?;
        self.call(self.store.update_task_content(id, content)).await?;
        Ok(())
    }

    /// Set or clear a task's description. Blank text clears it.
    pub async fn edit_description(&self, id: &str, description: Option<&str>) -> Result<(), LifecycleError> {
        let description = description.map(str::trim).filter(|d| !d.is_empty());
        if let Some(description) = description {
            validate_description(description)?;
        }
        self.call(self.store.update_task_description(id, description.map(str::to_string)))
            .await?;
        Ok(())
    }

    /// Move a task to a new due date. The anchor moves with it, so a
    /// recurring task rescheduled by hand continues its chain from the new
    /// date.
    pub async fn reschedule(&self, id: &str, due_date: Option<NaiveDate>) -> Result<(), LifecycleError> {
        if self.call(self.store.get_task(id)).await?.is_none() {
            return Err(LifecycleError::TaskNotFound(id.to_string()));
        }
        self.call(self.store.update_task_schedule(id, due_date, due_date)).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::recurrence::RecurrenceUnit;
    use crate::store::MemoryStore;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn today() -> NaiveDate {
        date(2024, 6, 20)
    }

    fn weekly() -> RecurrenceRule {
        RecurrenceRule::new(1, RecurrenceUnit::Week)
    }

    /// Delegates to a `MemoryStore` but refuses to create tasks.
    struct RejectingCreates(MemoryStore);

    impl TaskStore for RejectingCreates {
        async fn get_task(&self, id: &str) -> Result<Option<Task>, StoreError> {
            self.0.get_task(id).await
        }
        async fn create_task(&self, _fields: NewTask) -> Result<String, StoreError> {
            Err(StoreError::Backend("disk full".into()))
        }
        async fn update_task_content(&self, id: &str, content: &str) -> Result<(), StoreError> {
            self.0.update_task_content(id, content).await
        }
        async fn update_task_description(&self, id: &str, description: Option<String>) -> Result<(), StoreError> {
            self.0.update_task_description(id, description).await
        }
        async fn update_task_completion(&self, id: &str, completed: bool) -> Result<(), StoreError> {
            self.0.update_task_completion(id, completed).await
        }
        async fn update_task_schedule(
            &self,
            id: &str,
            due_date: Option<NaiveDate>,
            recurrence_anchor: Option<NaiveDate>,
        ) -> Result<(), StoreError> {
            self.0.update_task_schedule(id, due_date, recurrence_anchor).await
        }
        async fn list_projects(&self) -> Result<Vec<Project>, StoreError> {
            self.0.list_projects().await
        }
    }

    /// Delegates to a `MemoryStore` but refuses to change completion flags.
    struct RejectingCompletion(MemoryStore);

    impl TaskStore for RejectingCompletion {
        async fn get_task(&self, id: &str) -> Result<Option<Task>, StoreError> {
            self.0.get_task(id).await
        }
        async fn create_task(&self, fields: NewTask) -> Result<String, StoreError> {
            self.0.create_task(fields).await
        }
        async fn update_task_content(&self, id: &str, content: &str) -> Result<(), StoreError> {
            self.0.update_task_content(id, content).await
        }
        async fn update_task_description(&self, id: &str, description: Option<String>) -> Result<(), StoreError> {
            self.0.update_task_description(id, description).await
        }
        async fn update_task_completion(&self, _id: &str, _completed: bool) -> Result<(), StoreError> {
            Err(StoreError::Backend("write rejected".into()))
        }
        async fn update_task_schedule(
            &self,
            id: &str,
            due_date: Option<NaiveDate>,
            recurrence_anchor: Option<NaiveDate>,
        ) -> Result<(), StoreError> {
            self.0.update_task_schedule(id, due_date, recurrence_anchor).await
        }
        async fn list_projects(&self) -> Result<Vec<Project>, StoreError> {
            self.0.list_projects().await
        }
    }

    /// Never answers reads in time.
    struct Stalled;

    impl TaskStore for Stalled {
        async fn get_task(&self, _id: &str) -> Result<Option<Task>, StoreError> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(None)
        }
        async fn create_task(&self, _fields: NewTask) -> Result<String, StoreError> {
            Ok("never".into())
        }
        async fn update_task_content(&self, _id: &str, _content: &str) -> Result<(), StoreError> {
            Ok(())
        }
        async fn update_task_description(&self, _id: &str, _description: Option<String>) -> Result<(), StoreError> {
            Ok(())
        }
        async fn update_task_completion(&self, _id: &str, _completed: bool) -> Result<(), StoreError> {
            Ok(())
        }
        async fn update_task_schedule(
            &self,
            _id: &str,
            _due_date: Option<NaiveDate>,
            _recurrence_anchor: Option<NaiveDate>,
        ) -> Result<(), StoreError> {
            Ok(())
        }
        async fn list_projects(&self) -> Result<Vec<Project>, StoreError> {
            Ok(Vec::new())
        }
    }

    #[tokio::test]
    async fn creation_defaults_anchor_to_due_date() {
        let lifecycle = TaskLifecycle::new(MemoryStore::new());
        let id = lifecycle
            .create_task(TaskDraft::new("Water plants").due(date(2024, 3, 1)).every(weekly()))
            .await
            .unwrap();
        let task = lifecycle.store().get_task(&id).await.unwrap().unwrap();
        assert_eq!(task.recurrence_anchor, Some(date(2024, 3, 1)));
        assert!(task.is_recurring);
        assert_eq!(task.recurrence.as_deref(), Some("Every 1 Week"));

        let undated = lifecycle.create_task(TaskDraft::new("Someday")).await.unwrap();
        let task = lifecycle.store().get_task(&undated).await.unwrap().unwrap();
        assert_eq!(task.recurrence_anchor, None);
        assert!(!task.is_recurring);
    }

    #[tokio::test]
    async fn explicit_anchor_is_kept() {
        let lifecycle = TaskLifecycle::new(MemoryStore::new());
        let mut draft = TaskDraft::new("Pay rent").due(date(2024, 3, 5)).every(weekly());
        draft.recurrence_anchor = Some(date(2024, 3, 1));
        let id = lifecycle.create_task(draft).await.unwrap();
        let task = lifecycle.store().get_task(&id).await.unwrap().unwrap();
        assert_eq!(task.recurrence_anchor, Some(date(2024, 3, 1)));
    }

    #[tokio::test]
    async fn invalid_input_never_reaches_the_store() {
        let lifecycle = TaskLifecycle::new(MemoryStore::new());
        let err = lifecycle.create_task(TaskDraft::new("   ")).await.unwrap_err();
        assert!(matches!(err, LifecycleError::Invalid(ValidationError::EmptyContent)));
        assert!(lifecycle.store().list_tasks().unwrap().is_empty());
    }

    #[tokio::test]
    async fn weekly_chain_advances_from_each_successor() {
        let lifecycle = TaskLifecycle::new(MemoryStore::new());
        let first = lifecycle
            .create_task(TaskDraft::new("Review budget").due(date(2024, 3, 1)).every(weekly()))
            .await
            .unwrap();

        let CompletionOutcome::Completed { successor_id: Some(second) } =
            lifecycle.set_completion(&first, true, today()).await.unwrap()
        else {
            panic!("expected a successor");
        };
        let successor = lifecycle.store().get_task(&second).await.unwrap().unwrap();
        assert_eq!(successor.due_date, Some(date(2024, 3, 8)));
        assert_eq!(successor.recurrence_anchor, Some(date(2024, 3, 8)));
        assert_eq!(successor.content, "Review budget");
        assert_eq!(successor.recurrence.as_deref(), Some("Every 1 Week"));
        assert!(!successor.is_completed);

        let original = lifecycle.store().get_task(&first).await.unwrap().unwrap();
        assert!(original.is_completed);
        assert_eq!(original.recurrence_anchor, Some(date(2024, 3, 1)));

        let CompletionOutcome::Completed { successor_id: Some(third) } =
            lifecycle.set_completion(&second, true, today()).await.unwrap()
        else {
            panic!("expected a successor");
        };
        let third = lifecycle.store().get_task(&third).await.unwrap().unwrap();
        assert_eq!(third.due_date, Some(date(2024, 3, 15)));
    }

    #[tokio::test]
    async fn reopening_never_spawns_a_successor() {
        let lifecycle = TaskLifecycle::new(MemoryStore::new());
        let id = lifecycle
            .create_task(TaskDraft::new("Stretch").due(date(2024, 3, 1)).every(weekly()))
            .await
            .unwrap();
        lifecycle.set_completion(&id, true, today()).await.unwrap();
        assert_eq!(lifecycle.store().list_tasks().unwrap().len(), 2);

        let outcome = lifecycle.toggle_completion(&id, today()).await.unwrap();
        assert_eq!(outcome, CompletionOutcome::Reopened);
        assert_eq!(lifecycle.store().list_tasks().unwrap().len(), 2);
        assert!(!lifecycle.store().get_task(&id).await.unwrap().unwrap().is_completed);
    }

    #[tokio::test]
    async fn repeated_completion_is_a_no_op() {
        let lifecycle = TaskLifecycle::new(MemoryStore::new());
        let id = lifecycle
            .create_task(TaskDraft::new("Stretch").due(date(2024, 3, 1)).every(weekly()))
            .await
            .unwrap();
        lifecycle.set_completion(&id, true, today()).await.unwrap();
        let again = lifecycle.set_completion(&id, true, today()).await.unwrap();
        assert_eq!(again, CompletionOutcome::Unchanged);
        assert_eq!(lifecycle.store().list_tasks().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn plain_task_completes_without_successor() {
        let lifecycle = TaskLifecycle::new(MemoryStore::new());
        let id = lifecycle.create_task(TaskDraft::new("Buy milk")).await.unwrap();
        let outcome = lifecycle.toggle_completion(&id, today()).await.unwrap();
        assert_eq!(outcome, CompletionOutcome::Completed { successor_id: None });
    }

    #[tokio::test]
    async fn failed_successor_leaves_task_open() {
        let inner = MemoryStore::new();
        let mut fields = NewTask::new("Backup laptop").with_recurrence(Some(weekly()));
        fields.due_date = Some(date(2024, 3, 1));
        let id = inner.create_task(fields).await.unwrap();

        let lifecycle = TaskLifecycle::new(RejectingCreates(inner));
        let err = lifecycle.set_completion(&id, true, today()).await.unwrap_err();
        assert!(matches!(err, LifecycleError::Store(StoreError::Backend(_))));
        let task = lifecycle.store().get_task(&id).await.unwrap().unwrap();
        assert!(!task.is_completed);
    }

    #[tokio::test]
    async fn failed_flip_leaves_both_tasks_open() {
        let inner = MemoryStore::new();
        let mut fields = NewTask::new("Rotate keys").with_recurrence(Some(weekly()));
        fields.due_date = Some(date(2024, 3, 1));
        let id = inner.create_task(fields).await.unwrap();

        let lifecycle = TaskLifecycle::new(RejectingCompletion(inner));
        let err = lifecycle.set_completion(&id, true, today()).await.unwrap_err();
        assert!(matches!(err, LifecycleError::Store(StoreError::Backend(_))));

        let tasks = lifecycle.store().0.list_tasks().unwrap();
        assert_eq!(tasks.len(), 2);
        assert!(tasks.iter().all(|t| !t.is_completed));
        assert!(tasks.iter().any(|t| t.id != id && t.due_date == Some(date(2024, 3, 8))));
    }

    #[tokio::test]
    async fn retry_after_failed_write_creates_one_successor() {
        let dir = tempfile::tempdir().unwrap();
        let lifecycle = TaskLifecycle::new(MemoryStore::open(dir.path()).unwrap());
        let id = lifecycle
            .create_task(TaskDraft::new("Water ferns").due(date(2024, 3, 1)).every(weekly()))
            .await
            .unwrap();

        let tasks_file = dir.path().join(crate::store::memory::TASKS_FILE);
        std::fs::remove_file(&tasks_file).unwrap();
        std::fs::create_dir(&tasks_file).unwrap();
        let err = lifecycle.set_completion(&id, true, today()).await.unwrap_err();
        assert!(matches!(err, LifecycleError::Store(StoreError::Io(_))));
        assert_eq!(lifecycle.store().list_tasks().unwrap().len(), 1);

        std::fs::remove_dir(&tasks_file).unwrap();
        let outcome = lifecycle.set_completion(&id, true, today()).await.unwrap();
        assert!(matches!(outcome, CompletionOutcome::Completed { successor_id: Some(_) }));
        let successors = lifecycle
            .store()
            .list_tasks()
            .unwrap()
            .into_iter()
            .filter(|t| t.id != id)
            .count();
        assert_eq!(successors, 1);
    }

    #[tokio::test]
    async fn edits_are_validated_before_writing() {
        let lifecycle = TaskLifecycle::new(MemoryStore::new());
        let id = lifecycle.create_task(TaskDraft::new("Draft agenda")).await.unwrap();

        let err = lifecycle.edit_content(&id, "  ").await.unwrap_err();
        assert!(matches!(err, LifecycleError::Invalid(ValidationError::EmptyContent)));
        let long = "a".repeat(crate::core::validation::MAX_TASK_CONTENT_LENGTH + 1);
        let err = lifecycle.edit_content(&id, &long).await.unwrap_err();
        assert!(matches!(err, LifecycleError::Invalid(ValidationError::ContentTooLong)));
        let long = "a".repeat(crate::core::validation::MAX_DESCRIPTION_LENGTH + 1);
        let err = lifecycle.edit_description(&id, Some(&long)).await.unwrap_err();
        assert!(matches!(err, LifecycleError::Invalid(ValidationError::DescriptionTooLong)));

        let task = lifecycle.store().get_task(&id).await.unwrap().unwrap();
        assert_eq!(task.content, "Draft agenda");
        assert_eq!(task.description, None);

        lifecycle.edit_content(&id, " Final agenda ").await.unwrap();
        lifecycle.edit_description(&id, Some("Share by Friday")).await.unwrap();
        let task = lifecycle.store().get_task(&id).await.unwrap().unwrap();
        assert_eq!(task.content, "Final agenda");
        assert_eq!(task.description.as_deref(), Some("Share by Friday"));

        lifecycle.edit_description(&id, Some("   ")).await.unwrap();
        assert_eq!(lifecycle.store().get_task(&id).await.unwrap().unwrap().description, None);

        let err = lifecycle.edit_content("ghost", "anything").await.unwrap_err();
        assert!(matches!(err, LifecycleError::Store(StoreError::TaskNotFound(_))));
    }

    #[tokio::test]
    async fn unknown_task_is_reported() {
        let lifecycle = TaskLifecycle::new(MemoryStore::new());
        let err = lifecycle.toggle_completion("ghost", today()).await.unwrap_err();
        assert!(matches!(err, LifecycleError::TaskNotFound(id) if id == "ghost"));
    }

    #[tokio::test]
    async fn slow_store_times_out() {
        let lifecycle = TaskLifecycle::new(Stalled).with_timeout(Duration::from_millis(20));
        let err = lifecycle.toggle_completion("any", today()).await.unwrap_err();
        assert!(matches!(err, LifecycleError::Store(StoreError::Timeout(_))));
    }

    #[tokio::test]
    async fn quick_add_creates_structured_task() {
        let lifecycle = TaskLifecycle::new(MemoryStore::new());
        let projects = vec![Project::new("p7", "work")];
        let now = date(2024, 3, 1).and_hms_opt(9, 0, 0).unwrap();
        let id = lifecycle
            .create_from_input("Submit report tomorrow p1 #work", &projects, now, Some(weekly()))
            .await
            .unwrap();
        let task = lifecycle.store().get_task(&id).await.unwrap().unwrap();
        assert_eq!(task.content, "Submit report");
        assert_eq!(task.due_date, Some(date(2024, 3, 2)));
        assert_eq!(task.recurrence_anchor, Some(date(2024, 3, 2)));
        assert_eq!(task.priority, Some(Priority::P1));
        assert_eq!(task.project_id.as_deref(), Some("p7"));

        let err = lifecycle
            .create_from_input("tomorrow", &projects, now, None)
            .await
            .unwrap_err();
        assert!(matches!(err, LifecycleError::Invalid(ValidationError::EmptyContent)));
    }

    #[tokio::test]
    async fn reschedule_moves_the_anchor() {
        let lifecycle = TaskLifecycle::new(MemoryStore::new());
        let id = lifecycle
            .create_task(TaskDraft::new("Team sync").due(date(2024, 3, 1)).every(weekly()))
            .await
            .unwrap();
        lifecycle.reschedule(&id, Some(date(2024, 3, 4))).await.unwrap();
        let task = lifecycle.store().get_task(&id).await.unwrap().unwrap();
        assert_eq!(task.recurrence_anchor, Some(date(2024, 3, 4)));
        assert_eq!(complete_recurring_task(&task, today()).unwrap().due_date, Some(date(2024, 3, 11)));
    }

    fn stored(fields: NewTask) -> Task {
        Task::from_new("t1", fields, date(2024, 1, 1).and_hms_opt(0, 0, 0).unwrap())
    }

    #[test]
    fn anchor_beats_due_date_and_today() {
        let mut fields = NewTask::new("Rent").with_recurrence(Some(RecurrenceRule::new(1, RecurrenceUnit::Month)));
        fields.due_date = Some(date(2024, 2, 10));
        fields.recurrence_anchor = Some(date(2024, 1, 31));
        let successor = complete_recurring_task(&stored(fields.clone()), today()).unwrap();
        assert_eq!(successor.due_date, Some(date(2024, 2, 29)));

        fields.recurrence_anchor = None;
        let successor = complete_recurring_task(&stored(fields.clone()), today()).unwrap();
        assert_eq!(successor.due_date, Some(date(2024, 3, 10)));

        fields.due_date = None;
        let successor = complete_recurring_task(&stored(fields), today()).unwrap();
        assert_eq!(successor.due_date, Some(date(2024, 7, 20)));
    }

    #[test]
    fn successor_copies_task_fields() {
        let mut fields = NewTask::new("Call grandma").with_recurrence(Some(weekly()));
        fields.description = Some("Sunday evening".into());
        fields.project_id = Some("family".into());
        fields.priority = Some(Priority::P2);
        fields.due_date = Some(date(2024, 3, 3));
        let successor = complete_recurring_task(&stored(fields), today()).unwrap();
        assert_eq!(successor.description.as_deref(), Some("Sunday evening"));
        assert_eq!(successor.project_id.as_deref(), Some("family"));
        assert_eq!(successor.priority, Some(Priority::P2));
        assert!(successor.is_recurring);
    }

    #[test]
    fn non_recurring_task_has_no_successor() {
        assert_eq!(complete_recurring_task(&stored(NewTask::new("Once")), today()), None);
    }

    #[test]
    fn garbled_phrase_still_recurs_weekly() {
        let mut fields = NewTask::new("Mystery");
        fields.is_recurring = true;
        fields.recurrence = Some("every so often".into());
        fields.due_date = Some(date(2024, 3, 1));
        let successor = complete_recurring_task(&stored(fields), today()).unwrap();
        assert_eq!(successor.due_date, Some(date(2024, 3, 8)));
        assert_eq!(successor.recurrence.as_deref(), Some("every so often"));
    }
}
