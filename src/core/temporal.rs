use chrono::NaiveDate;

use super::project::Project;
use super::task::Task;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateRange {
    Today,
    Tomorrow,
    ThisWeek,
    Upcoming,
}

/// Open tasks bucketed relative to a given day.
pub struct TemporalView {
    pub overdue: Vec<Task>,
    pub due: Vec<Task>,
}

impl TemporalView {
    pub fn build(tasks: &[Task], today: NaiveDate, range: DateRange) -> Self {
        let (start, end) = match range {
            DateRange::Today => (today, today.succ_opt()),
            DateRange::Tomorrow => {
                let tomorrow = today.succ_opt().unwrap_or(today);
                (tomorrow, tomorrow.succ_opt())
            }
            DateRange::ThisWeek => (today, Some(today + chrono::Duration::days(7))),
            DateRange::Upcoming => (today, None),
        };
        let show_overdue = range != DateRange::Tomorrow;

        let mut overdue = Vec::new();
        let mut due = Vec::new();

        for task in tasks {
            if task.is_completed {
                continue;
            }
            let Some(date) = task.due_date else { continue };
            if task.is_overdue(today) {
                if show_overdue {
                    overdue.push(task.clone());
                }
            } else if date >= start && end.is_none_or(|end| date < end) {
                due.push(task.clone());
            }
        }

        sort_by_due(&mut overdue);
        sort_by_due(&mut due);

        Self { overdue, due }
    }

    pub fn total_count(&self) -> usize {
        self.overdue.len() + self.due.len()
    }

    /// Consecutive runs of `due` sharing a date, for day-by-day listings.
    pub fn group_by_day(&self) -> Vec<(NaiveDate, Vec<&Task>)> {
        let mut groups: Vec<(NaiveDate, Vec<&Task>)> = Vec::new();
        for task in &self.due {
            let Some(date) = task.due_date else { continue };
            match groups.last_mut() {
                Some((day, bucket)) if *day == date => bucket.push(task),
                _ => groups.push((date, vec![task])),
            }
        }
        groups
    }
}

fn sort_by_due(tasks: &mut [Task]) {
    tasks.sort_by(|a, b| a.due_date.cmp(&b.due_date).then(a.order.cmp(&b.order)));
}

/// Manual ordering: ascending `order`, ties broken newest first.
pub fn sort_tasks(tasks: &mut [Task]) {
    tasks.sort_by(|a, b| a.order.cmp(&b.order).then(b.created.cmp(&a.created)));
}

/// Open tasks with no project, or whose project no longer exists.
pub fn inbox(tasks: &[Task], projects: &[Project]) -> Vec<Task> {
    let mut inbox: Vec<Task> = tasks
        .iter()
        .filter(|t| !t.is_completed && t.is_in_inbox(projects.iter().map(|p| p.id.as_str())))
        .cloned()
        .collect();
    sort_tasks(&mut inbox);
    inbox
}

pub fn project_tasks(tasks: &[Task], project_id: &str) -> Vec<Task> {
    let mut found: Vec<Task> = tasks
        .iter()
        .filter(|t| !t.is_completed && t.project_id.as_deref() == Some(project_id))
        .cloned()
        .collect();
    sort_tasks(&mut found);
    found
}

/// Case-insensitive substring search over content and description of open tasks.
pub fn search(tasks: &[Task], query: &str) -> Vec<Task> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }
    tasks
        .iter()
        .filter(|t| !t.is_completed)
        .filter(|t| {
            t.content.to_lowercase().contains(&needle)
                || t
                    .description
                    .as_deref()
                    .is_some_and(|d| d.to_lowercase().contains(&needle))
        })
        .cloned()
        .collect()
}

/// New `order` keys for a list the user has rearranged: each id gets its index.
pub fn reorder(ids: &[String]) -> Vec<(String, i64)> {
    ids.iter()
        .enumerate()
        .map(|(index, id)| (id.clone(), index as i64))
        .collect()
}
