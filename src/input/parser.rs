use chrono::{NaiveDate, NaiveDateTime};
use regex::Regex;
use std::sync::LazyLock;

use super::dates::{self, DueMoment};
use crate::core::project::Project;
use crate::core::task::Priority;

static PRIORITY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(?:^|\s)p(?P<level>[1-4])(?:\s|$)").unwrap());

static PROJECT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:^|\s)#(?P<name>\w+)(?:\s|$)").unwrap());

static WHITESPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Structured fields pulled out of a line of quick-add text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedTaskInput {
    pub content: String,
    pub date: Option<DueMoment>,
    pub priority: Option<Priority>,
    pub project_id: Option<String>,
}

impl ParsedTaskInput {
    pub fn due_date(&self) -> Option<NaiveDate> {
        self.date.map(|m| m.date)
    }
}

/// Parse quick-add text such as "Submit report tomorrow p1 #work".
///
/// Stages run in a fixed order and each one cuts its match out of the
/// working text before the next runs, so digits and words inside a date
/// phrase never reach the priority or project stages:
///
/// 1. date/time expression (earliest in the text)
/// 2. first standalone `p1`..`p4`
/// 3. first standalone `#name`, kept in the text when no project matches
/// 4. whitespace collapsed and trimmed
///
/// Content may come back empty; rejecting that is up to the caller.
pub fn parse_task_input(text: &str, projects: &[Project], now: NaiveDateTime) -> ParsedTaskInput {
    let mut working = text.to_string();

    let date = take_date(&mut working, now);
    let priority = take_priority(&mut working);
    let project_id = take_project(&mut working, projects);
    let content = normalize_whitespace(&working);

    ParsedTaskInput {
        content,
        date,
        priority,
        project_id,
    }
}

fn take_date(working: &mut String, now: NaiveDateTime) -> Option<DueMoment> {
    let found = dates::extract(working, now)?;
    working.replace_range(found.span, " ");
    Some(found.moment)
}

fn take_priority(working: &mut String) -> Option<Priority> {
    let caps = PRIORITY_RE.captures(working)?;
    let priority = caps["level"].parse().ok().and_then(Priority::from_level)?;
    let span = caps.get(0)?.range();
    working.replace_range(span, " ");
    Some(priority)
}

/// Only the first `#name` is considered; a later one is never tried even if
/// the first names no known project.
fn take_project(working: &mut String, projects: &[Project]) -> Option<String> {
    let caps = PROJECT_RE.captures(working)?;
    let name = &caps["name"];
    let project = projects.iter().find(|p| p.name_matches(name))?;
    let span = caps.get(0)?.range();
    let id = project.id.clone();
    working.replace_range(span, " ");
    Some(id)
}

fn normalize_whitespace(s: &str) -> String {
    WHITESPACE_RE.replace_all(s, " ").trim().to_string()
}
