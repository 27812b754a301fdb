use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::recurrence::{RecurrenceParse, RecurrenceRule};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Priority {
    P1,
    P2,
    P3,
    P4,
}

impl Priority {
    /// 1 (most urgent) through 4.
    pub fn level(&self) -> u8 {
        match self {
            Self::P1 => 1,
            Self::P2 => 2,
            Self::P3 => 3,
            Self::P4 => 4,
        }
    }

    pub fn from_level(level: u8) -> Option<Self> {
        match level {
            1 => Some(Self::P1),
            2 => Some(Self::P2),
            3 => Some(Self::P3),
            4 => Some(Self::P4),
            _ => None,
        }
    }
}

/// A task record as held by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub content: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub is_completed: bool,
    #[serde(default)]
    pub is_recurring: bool,
    #[serde(default)]
    pub recurrence: Option<String>,
    #[serde(default)]
    pub recurrence_anchor: Option<NaiveDate>,
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default)]
    pub order: i64,
    #[serde(default)]
    pub priority: Option<Priority>,
    pub created: NaiveDateTime,
}

impl Task {
    /// Materialize a stored record from the fields handed to `create_task`.
    pub fn from_new(id: impl Into<String>, fields: NewTask, created: NaiveDateTime) -> Self {
        Self {
            id: id.into(),
            content: fields.content,
            description: fields.description,
            due_date: fields.due_date,
            is_completed: false,
            is_recurring: fields.is_recurring,
            recurrence: fields.recurrence,
            recurrence_anchor: fields.recurrence_anchor,
            project_id: fields.project_id,
            order: fields.order,
            priority: fields.priority,
            created,
        }
    }

    /// The decoded recurrence phrase, if this task repeats.
    pub fn recurrence_parse(&self) -> Option<RecurrenceParse> {
        if !self.is_recurring {
            return None;
        }
        self.recurrence.as_deref().map(RecurrenceRule::parse)
    }

    /// True when the task belongs to no project the caller knows about.
    pub fn is_in_inbox<'a>(&self, mut known_project_ids: impl Iterator<Item = &'a str>) -> bool {
        match self.project_id.as_deref() {
            None => true,
            Some(id) => !known_project_ids.any(|known| known == id),
        }
    }

    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        !self.is_completed && self.due_date.is_some_and(|due| due < today)
    }
}

/// Fields written when a task is created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTask {
    pub content: String,
    pub description: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub is_recurring: bool,
    pub recurrence: Option<String>,
    pub recurrence_anchor: Option<NaiveDate>,
    pub project_id: Option<String>,
    pub order: i64,
    pub priority: Option<Priority>,
}

impl NewTask {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            description: None,
            due_date: None,
            is_recurring: false,
            recurrence: None,
            recurrence_anchor: None,
            project_id: None,
            order: 0,
            priority: None,
        }
    }

    /// Set `is_recurring` and the phrase together so they never disagree.
    pub fn with_recurrence(mut self, rule: Option<RecurrenceRule>) -> Self {
        self.is_recurring = rule.is_some();
        self.recurrence = rule.map(|r| r.to_string());
        self
    }
}
