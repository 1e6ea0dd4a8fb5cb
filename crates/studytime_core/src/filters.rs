//! crates/studytime_core/src/filters.rs
//!
//! Stateless list queries over tasks and activities: filter predicates,
//! comparators and the dashboard projections. Every time-dependent query takes
//! `now` as an argument.

use chrono::{DateTime, Utc};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::domain::{Activity, ActivityType, ParseEnumError, Task};

/// Number of entries shown in each dashboard list.
pub const DASHBOARD_LIMIT: usize = 5;

//=========================================================================================
// Tasks
//=========================================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TaskFilter {
    #[default]
    All,
    Completed,
    Pending,
    /// Pending and due strictly before `now`.
    Overdue,
}

impl TaskFilter {
    pub fn matches(self, task: &Task, now: DateTime<Utc>) -> bool {
        match self {
            TaskFilter::All => true,
            TaskFilter::Completed => task.completed,
            TaskFilter::Pending => !task.completed,
            TaskFilter::Overdue => is_overdue(task, now),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TaskSort {
    #[default]
    DueDate,
    Priority,
    Title,
}

impl TaskSort {
    pub fn compare(self, a: &Task, b: &Task) -> Ordering {
        match self {
            TaskSort::DueDate => by_timestamp(a.due().ok(), b.due().ok()),
            TaskSort::Priority => b.priority.rank().cmp(&a.priority.rank()),
            TaskSort::Title => compare_titles(&a.title, &b.title),
        }
    }
}

pub fn is_overdue(task: &Task, now: DateTime<Utc>) -> bool {
    !task.completed && task.due().map(|due| due < now).unwrap_or(false)
}

/// Filters then sorts; the input order breaks ties.
pub fn query_tasks(
    tasks: &[Task],
    filter: TaskFilter,
    sort: TaskSort,
    now: DateTime<Utc>,
) -> Vec<Task> {
    let mut selected: Vec<Task> =
        tasks.iter().filter(|t| filter.matches(t, now)).cloned().collect();
    selected.sort_by(|a, b| sort.compare(a, b));
    selected
}

//=========================================================================================
// Activities
//=========================================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActivityFilter {
    #[default]
    All,
    /// Starts after `now`.
    Upcoming,
    /// Ended before `now`.
    Past,
    OfType(ActivityType),
}

impl ActivityFilter {
    pub fn matches(self, activity: &Activity, now: DateTime<Utc>) -> bool {
        match self {
            ActivityFilter::All => true,
            ActivityFilter::Upcoming => activity.start().map(|s| s > now).unwrap_or(false),
            ActivityFilter::Past => activity.end().map(|e| e < now).unwrap_or(false),
            ActivityFilter::OfType(kind) => activity.activity_type == kind,
        }
    }
}

/// Filters, then orders by ascending start regardless of the filter.
pub fn query_activities(
    activities: &[Activity],
    filter: ActivityFilter,
    now: DateTime<Utc>,
) -> Vec<Activity> {
    let mut selected: Vec<Activity> =
        activities.iter().filter(|a| filter.matches(a, now)).cloned().collect();
    selected.sort_by(compare_starts);
    selected
}

fn compare_starts(a: &Activity, b: &Activity) -> Ordering {
    by_timestamp(a.start().ok(), b.start().ok())
}

//=========================================================================================
// Dashboard
//=========================================================================================

/// The next pending tasks by ascending due date.
pub fn upcoming_tasks(tasks: &[Task], now: DateTime<Utc>) -> Vec<Task> {
    let mut pending = query_tasks(tasks, TaskFilter::Pending, TaskSort::DueDate, now);
    pending.truncate(DASHBOARD_LIMIT);
    pending
}

/// The next activities that have not started yet, by ascending start.
pub fn upcoming_activities(activities: &[Activity], now: DateTime<Utc>) -> Vec<Activity> {
    let mut future = query_activities(activities, ActivityFilter::Upcoming, now);
    future.truncate(DASHBOARD_LIMIT);
    future
}

//=========================================================================================
// Helpers
//=========================================================================================

// Unparseable timestamps sort after every valid one.
fn by_timestamp(a: Option<DateTime<Utc>>, b: Option<DateTime<Utc>>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn compare_titles(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase()).then_with(|| a.cmp(b))
}

impl fmt::Display for TaskFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TaskFilter::All => "all",
            TaskFilter::Completed => "completed",
            TaskFilter::Pending => "pending",
            TaskFilter::Overdue => "overdue",
        })
    }
}

impl FromStr for TaskFilter {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(TaskFilter::All),
            "completed" => Ok(TaskFilter::Completed),
            "pending" => Ok(TaskFilter::Pending),
            "overdue" => Ok(TaskFilter::Overdue),
            _ => Err(ParseEnumError { kind: "task filter", value: s.to_string() }),
        }
    }
}

impl FromStr for TaskSort {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "due_date" | "due" => Ok(TaskSort::DueDate),
            "priority" => Ok(TaskSort::Priority),
            "title" => Ok(TaskSort::Title),
            _ => Err(ParseEnumError { kind: "task sort", value: s.to_string() }),
        }
    }
}

impl FromStr for ActivityFilter {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(ActivityFilter::All),
            "upcoming" => Ok(ActivityFilter::Upcoming),
            "past" => Ok(ActivityFilter::Past),
            other => other
                .parse::<ActivityType>()
                .map(ActivityFilter::OfType)
                .map_err(|_| ParseEnumError { kind: "activity filter", value: s.to_string() }),
        }
    }
}
