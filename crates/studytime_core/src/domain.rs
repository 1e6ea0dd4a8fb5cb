//! crates/studytime_core/src/domain.rs
//!
//! Defines the core data structures for the planner: users, school tasks,
//! activities and the aggregate stats snapshot.
//!
//! Timestamps are kept in the wire representation (ISO-8601 strings) and parsed
//! on demand through [`crate::timestamp`], so one malformed record never prevents
//! the rest of a collection from loading.

use crate::timestamp::{parse_timestamp, TimestampError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Year level assigned to every account created through the login flow.
pub const DEFAULT_YEAR_LEVEL: u8 = 11;

/// Subjects assigned to every account created through the login flow.
pub const DEFAULT_SUBJECTS: [&str; 5] =
    ["Mathematics", "Physics", "Chemistry", "English", "History"];

pub const DEFAULT_TASK_COLOR: &str = "#6366f1";
pub const DEFAULT_ACTIVITY_COLOR: &str = "#10b981";

//=========================================================================================
// Users
//=========================================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewType {
    #[default]
    Month,
    Week,
    Day,
}

/// A student account as returned by the remote store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub year_level: u8,
    #[serde(default)]
    pub subjects: Vec<String>,
    #[serde(default)]
    pub theme: Theme,
    #[serde(default)]
    pub default_view: ViewType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

/// The payload submitted to create a user.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub year_level: u8,
    pub subjects: Vec<String>,
}

impl NewUser {
    /// Builds the account for a login attempt. The display name is the local
    /// part of the email; year level and subjects are the fixed defaults.
    pub fn from_email(email: &str) -> Self {
        let name = email.split('@').next().unwrap_or_default().to_string();
        Self {
            name,
            email: email.to_string(),
            year_level: DEFAULT_YEAR_LEVEL,
            subjects: DEFAULT_SUBJECTS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

//=========================================================================================
// Tasks
//=========================================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskType {
    Assignment,
    Test,
    Project,
    Homework,
    Study,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    /// Fixed ordering rank used by the priority comparator.
    pub fn rank(self) -> u8 {
        match self {
            Priority::High => 3,
            Priority::Medium => 2,
            Priority::Low => 1,
        }
    }
}

/// A deadline-oriented school task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub subject: String,
    pub task_type: TaskType,
    #[serde(default)]
    pub priority: Priority,
    pub due_date: String,
    #[serde(default)]
    pub estimated_duration: Option<u32>,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub completed_at: Option<String>,
    #[serde(default = "default_task_color", deserialize_with = "task_color")]
    pub color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl Task {
    pub fn due(&self) -> Result<DateTime<Utc>, TimestampError> {
        parse_timestamp(&self.due_date)
    }
}

/// The fields submitted to create a task. Identity and ownership are assigned
/// by the remote store.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
    pub subject: String,
    pub task_type: TaskType,
    pub priority: Priority,
    pub due_date: String,
    pub estimated_duration: Option<u32>,
    pub color: String,
}

impl NewTask {
    pub fn new(
        title: impl Into<String>,
        subject: impl Into<String>,
        task_type: TaskType,
        due_date: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            description: None,
            subject: subject.into(),
            task_type,
            priority: Priority::default(),
            due_date: due_date.into(),
            estimated_duration: None,
            color: DEFAULT_TASK_COLOR.to_string(),
        }
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }
}

//=========================================================================================
// Activities
//=========================================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityType {
    Sports,
    Club,
    Meeting,
    Practice,
    Competition,
    Event,
}

/// Optional repeat rule attached to an activity. Stored and echoed back, never
/// expanded client-side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecurrencePattern {
    pub frequency: String,
    #[serde(default = "default_interval")]
    pub interval: u32,
    #[serde(default)]
    pub days_of_week: Option<Vec<u8>>,
    #[serde(default)]
    pub end_date: Option<String>,
}

/// An interval-oriented extracurricular activity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub activity_type: ActivityType,
    pub start_datetime: String,
    pub end_datetime: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub recurrence: Option<RecurrencePattern>,
    #[serde(default = "default_activity_color", deserialize_with = "activity_color")]
    pub color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl Activity {
    pub fn start(&self) -> Result<DateTime<Utc>, TimestampError> {
        parse_timestamp(&self.start_datetime)
    }

    pub fn end(&self) -> Result<DateTime<Utc>, TimestampError> {
        parse_timestamp(&self.end_datetime)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewActivity {
    pub title: String,
    pub description: Option<String>,
    pub activity_type: ActivityType,
    pub start_datetime: String,
    pub end_datetime: String,
    pub location: Option<String>,
    pub recurrence: Option<RecurrencePattern>,
    pub color: String,
}

impl NewActivity {
    pub fn new(
        title: impl Into<String>,
        activity_type: ActivityType,
        start_datetime: impl Into<String>,
        end_datetime: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            description: None,
            activity_type,
            start_datetime: start_datetime.into(),
            end_datetime: end_datetime.into(),
            location: None,
            recurrence: None,
            color: DEFAULT_ACTIVITY_COLOR.to_string(),
        }
    }
}

//=========================================================================================
// Stats
//=========================================================================================

/// Server-computed aggregate counts. Missing fields and "never fetched" both
/// read as zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Stats {
    pub total_tasks: u32,
    pub completed_tasks: u32,
    pub pending_tasks: u32,
    pub overdue_tasks: u32,
    pub upcoming_tasks: u32,
    pub total_activities: u32,
}

//=========================================================================================
// Calendar items
//=========================================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    Task,
    Activity,
}

/// A record placed on a calendar cell.
#[derive(Debug, Clone, PartialEq)]
pub enum CalendarItem {
    Task(Task),
    Activity(Activity),
}

impl CalendarItem {
    pub fn kind(&self) -> ItemKind {
        match self {
            CalendarItem::Task(_) => ItemKind::Task,
            CalendarItem::Activity(_) => ItemKind::Activity,
        }
    }

    pub fn id(&self) -> Uuid {
        match self {
            CalendarItem::Task(t) => t.id,
            CalendarItem::Activity(a) => a.id,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            CalendarItem::Task(t) => &t.title,
            CalendarItem::Activity(a) => &a.title,
        }
    }

    pub fn color(&self) -> &str {
        match self {
            CalendarItem::Task(t) => &t.color,
            CalendarItem::Activity(a) => &a.color,
        }
    }
}

//=========================================================================================
// Text conversions
//=========================================================================================

/// Error returned when parsing one of the domain enums from text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} '{value}'")]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
}

macro_rules! text_enum {
    ($ty:ident, $kind:literal, { $($variant:ident => $text:literal),+ $(,)? }) => {
        impl $ty {
            pub fn as_str(self) -> &'static str {
                match self {
                    $($ty::$variant => $text),+
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = ParseEnumError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_ascii_lowercase().as_str() {
                    $($text => Ok($ty::$variant),)+
                    _ => Err(ParseEnumError { kind: $kind, value: s.to_string() }),
                }
            }
        }
    };
}

text_enum!(TaskType, "task type", {
    Assignment => "assignment",
    Test => "test",
    Project => "project",
    Homework => "homework",
    Study => "study",
});

text_enum!(Priority, "priority", {
    Low => "low",
    Medium => "medium",
    High => "high",
});

text_enum!(ActivityType, "activity type", {
    Sports => "sports",
    Club => "club",
    Meeting => "meeting",
    Practice => "practice",
    Competition => "competition",
    Event => "event",
});

fn default_task_color() -> String {
    DEFAULT_TASK_COLOR.to_string()
}

fn default_activity_color() -> String {
    DEFAULT_ACTIVITY_COLOR.to_string()
}

// The store may send `"color": null`; both null and absent mean the default.
fn task_color<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_else(default_task_color))
}

fn activity_color<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_else(default_activity_color))
}

fn default_interval() -> u32 {
    1
}
