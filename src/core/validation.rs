use thiserror::Error;
use unicode_segmentation::UnicodeSegmentation;

use super::task::NewTask;

pub const MAX_TASK_CONTENT_LENGTH: usize = 2000;
pub const MAX_DESCRIPTION_LENGTH: usize = 5000;
pub const MAX_PROJECT_NAME_LENGTH: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Task content cannot be empty")]
    EmptyContent,
    #[error("Task content exceeds maximum length of {} characters", MAX_TASK_CONTENT_LENGTH)]
    ContentTooLong,
    #[error("Task description exceeds maximum length of {} characters", MAX_DESCRIPTION_LENGTH)]
    DescriptionTooLong,
    #[error("Project name cannot be empty")]
    EmptyProjectName,
    #[error("Project name exceeds maximum length of {} characters", MAX_PROJECT_NAME_LENGTH)]
    ProjectNameTooLong,
    #[error("Project icon must be a single emoji")]
    InvalidIcon,
    #[error("Recurring tasks need a recurrence phrase, and only recurring tasks may have one")]
    RecurrenceMismatch,
}

/// Lengths are counted in characters, not bytes.
pub fn validate_task_input(content: &str, description: Option<&str>) -> Result<(), ValidationError> {
    if content.trim().is_empty() {
        return Err(ValidationError::EmptyContent);
    }
    if content.chars().count() > MAX_TASK_CONTENT_LENGTH {
        return Err(ValidationError::ContentTooLong);
    }
    if let Some(description) = description {
        validate_description(description)?;
    }
    Ok(())
}

pub fn validate_description(description: &str) -> Result<(), ValidationError> {
    if description.chars().count() > MAX_DESCRIPTION_LENGTH {
        return Err(ValidationError::DescriptionTooLong);
    }
    Ok(())
}

pub fn validate_project_input(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::EmptyProjectName);
    }
    if name.chars().count() > MAX_PROJECT_NAME_LENGTH {
        return Err(ValidationError::ProjectNameTooLong);
    }
    Ok(())
}

/// An icon is exactly one non-ASCII grapheme cluster, e.g. "🛒" or "👩‍💻".
pub fn validate_project_icon(icon: &str) -> Result<(), ValidationError> {
    let mut graphemes = icon.graphemes(true);
    match (graphemes.next(), graphemes.next()) {
        (Some(g), None) if !g.is_ascii() => Ok(()),
        _ => Err(ValidationError::InvalidIcon),
    }
}

/// Full check of the fields about to be written for a new task.
pub fn validate_new_task(task: &NewTask) -> Result<(), ValidationError> {
    validate_task_input(&task.content, task.description.as_deref())?;
    if task.is_recurring != task.recurrence.is_some() {
        return Err(ValidationError::RecurrenceMismatch);
    }
    Ok(())
}
