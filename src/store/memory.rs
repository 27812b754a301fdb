use chrono::NaiveDate;
use serde::{Serialize, de::DeserializeOwned};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use uuid::Uuid;

use super::{StoreError, TaskStore};
use crate::core::project::{NewProject, Project};
use crate::core::task::{NewTask, Task};
use crate::core::temporal;
use crate::core::validation::validate_project_icon;

pub const TASKS_FILE: &str = "tasks.json";
pub const PROJECTS_FILE: &str = "projects.json";

#[derive(Debug, Default)]
struct Snapshot {
    tasks: Vec<Task>,
    projects: Vec<Project>,
}

/// Tasks and projects held in memory, optionally mirrored to JSON files.
///
/// With a data directory every mutation rewrites the affected file before
/// returning, so a successful call means the change is on disk.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<Snapshot>,
    data_dir: Option<PathBuf>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load `tasks.json` and `projects.json` from `data_dir`. Missing files
    /// start empty; malformed files are an error rather than silently dropped.
    pub fn open(data_dir: &Path) -> Result<Self, StoreError> {
        let tasks: Vec<Task> = load_json(&data_dir.join(TASKS_FILE))?;
        let projects: Vec<Project> = load_json(&data_dir.join(PROJECTS_FILE))?;
        log::debug!(
            "Loaded {} tasks and {} projects from {}",
            tasks.len(),
            projects.len(),
            data_dir.display()
        );
        Ok(Self {
            state: Mutex::new(Snapshot { tasks, projects }),
            data_dir: Some(data_dir.to_path_buf()),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Snapshot>, StoreError> {
        self.state
            .lock()
            .map_err(|_| StoreError::Backend("store lock poisoned".into()))
    }

    /// Write `tasks` out and only then make them the live list, so a failed
    /// write leaves memory matching what is on disk.
    fn commit_tasks(&self, state: &mut Snapshot, tasks: Vec<Task>) -> Result<(), StoreError> {
        if let Some(dir) = &self.data_dir {
            save_json(&dir.join(TASKS_FILE), &tasks)?;
        }
        state.tasks = tasks;
        Ok(())
    }

    fn commit_projects(&self, state: &mut Snapshot, projects: Vec<Project>) -> Result<(), StoreError> {
        if let Some(dir) = &self.data_dir {
            save_json(&dir.join(PROJECTS_FILE), &projects)?;
        }
        state.projects = projects;
        Ok(())
    }

    /// Apply `edit` to a copy of one task and commit it.
    fn edit_task(&self, id: &str, edit: impl FnOnce(&mut Task)) -> Result<(), StoreError> {
        let mut state = self.lock()?;
        let mut tasks = state.tasks.clone();
        let task = tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| StoreError::TaskNotFound(id.to_string()))?;
        edit(task);
        self.commit_tasks(&mut state, tasks)
    }

    fn edit_project(&self, id: &str, edit: impl FnOnce(&mut Project)) -> Result<(), StoreError> {
        let mut state = self.lock()?;
        let mut projects = state.projects.clone();
        let project = projects
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| StoreError::ProjectNotFound(id.to_string()))?;
        edit(project);
        self.commit_projects(&mut state, projects)
    }

    /// All tasks in manual order.
    pub fn list_tasks(&self) -> Result<Vec<Task>, StoreError> {
        let mut tasks = self.lock()?.tasks.clone();
        temporal::sort_tasks(&mut tasks);
        Ok(tasks)
    }

    /// Projects sorted by name.
    pub fn projects(&self) -> Result<Vec<Project>, StoreError> {
        let mut projects = self.lock()?.projects.clone();
        projects.sort_by_key(|p| p.name.to_lowercase());
        Ok(projects)
    }

    pub fn add_project(&self, project: NewProject) -> Result<String, StoreError> {
        project.validate()?;
        let id = Uuid::new_v4().to_string();
        let mut state = self.lock()?;
        let mut projects = state.projects.clone();
        projects.push(project.into_project(id.clone()));
        self.commit_projects(&mut state, projects)?;
        log::info!("Created project {}", id);
        Ok(id)
    }

    /// Set or clear a project's icon; a new icon must be a single emoji.
    pub fn update_project_icon(&self, id: &str, icon: Option<String>) -> Result<(), StoreError> {
        if let Some(icon) = &icon {
            validate_project_icon(icon)?;
        }
        self.edit_project(id, |project| project.icon = icon)
    }

    /// Removes the project only; its tasks keep the now-dangling id and show
    /// up in the Inbox.
    pub fn delete_project(&self, id: &str) -> Result<(), StoreError> {
        let mut state = self.lock()?;
        let mut projects = state.projects.clone();
        projects.retain(|p| p.id != id);
        if projects.len() == state.projects.len() {
            return Err(StoreError::ProjectNotFound(id.to_string()));
        }
        self.commit_projects(&mut state, projects)
    }

    pub fn delete_task(&self, id: &str) -> Result<(), StoreError> {
        let mut state = self.lock()?;
        let mut tasks = state.tasks.clone();
        tasks.retain(|t| t.id != id);
        if tasks.len() == state.tasks.len() {
            return Err(StoreError::TaskNotFound(id.to_string()));
        }
        self.commit_tasks(&mut state, tasks)
    }

    /// Moving a task puts it at the top of its new list.
    pub fn update_task_project(&self, id: &str, project_id: Option<String>) -> Result<(), StoreError> {
        self.edit_task(id, |task| {
            task.project_id = project_id;
            task.order = 0;
        })
    }

    /// Persist a user-arranged ordering; ids not in the store are skipped.
    pub fn reorder_tasks(&self, ids: &[String]) -> Result<(), StoreError> {
        let mut state = self.lock()?;
        let mut tasks = state.tasks.clone();
        for (id, order) in temporal::reorder(ids) {
            if let Some(task) = tasks.iter_mut().find(|t| t.id == id) {
                task.order = order;
            }
        }
        self.commit_tasks(&mut state, tasks)
    }
}

impl TaskStore for MemoryStore {
    async fn get_task(&self, id: &str) -> Result<Option<Task>, StoreError> {
        Ok(self.lock()?.tasks.iter().find(|t| t.id == id).cloned())
    }

    async fn create_task(&self, fields: NewTask) -> Result<String, StoreError> {
        let id = Uuid::new_v4().to_string();
        let created = chrono::Local::now().naive_local();
        let mut state = self.lock()?;
        let mut tasks = state.tasks.clone();
        tasks.push(Task::from_new(id.clone(), fields, created));
        self.commit_tasks(&mut state, tasks)?;
        Ok(id)
    }

    async fn update_task_content(&self, id: &str, content: &str) -> Result<(), StoreError> {
        self.edit_task(id, |task| task.content = content.to_string())
    }

    async fn update_task_description(&self, id: &str, description: Option<String>) -> Result<(), StoreError> {
        self.edit_task(id, |task| task.description = description)
    }

    async fn update_task_completion(&self, id: &str, completed: bool) -> Result<(), StoreError> {
        self.edit_task(id, |task| task.is_completed = completed)
    }

    async fn update_task_schedule(
        &self,
        id: &str,
        due_date: Option<NaiveDate>,
        recurrence_anchor: Option<NaiveDate>,
    ) -> Result<(), StoreError> {
        self.edit_task(id, |task| {
            task.due_date = due_date;
            task.recurrence_anchor = recurrence_anchor;
        })
    }

    async fn list_projects(&self) -> Result<Vec<Project>, StoreError> {
        self.projects()
    }
}

fn load_json<T: DeserializeOwned + Default>(path: &Path) -> Result<T, StoreError> {
    match std::fs::read_to_string(path) {
        Ok(content) if content.trim().is_empty() => Ok(T::default()),
        Ok(content) => Ok(serde_json::from_str(&content)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(T::default()),
        Err(e) => Err(e.into()),
    }
}

fn save_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), StoreError> {
    let json = serde_json::to_string_pretty(value)?;
    std::fs::write(path, json)?;
    Ok(())
}
