//! Task types for the kanban board.
//!
//! A [`Task`] is a single work item living in exactly one column. Its
//! provenance fields (`created_at`, `created_by`) are written once at
//! creation; `last_edited` tracks content edits only and a recolor clears it.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a task, based on UUID v7 for time-ordering.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaskId(Uuid);

impl TaskId {
    /// Creates a new time-ordered task identifier (UUID v7).
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Creates a `TaskId` from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the inner UUID value.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for TaskId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TaskId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// Cosmetic color tag from the board's closed palette.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskColor {
    /// Neutral card color, applied to every new task.
    #[default]
    White,
    /// Light green.
    Green,
    /// Light blue.
    Blue,
    /// Light red.
    Red,
    /// Light yellow.
    Yellow,
    /// Light purple.
    Purple,
}

impl TaskColor {
    /// Every palette entry, in picker order.
    pub const ALL: [Self; 6] = [
        Self::White,
        Self::Green,
        Self::Blue,
        Self::Red,
        Self::Yellow,
        Self::Purple,
    ];

    /// Lowercase palette name, as used in storage and on the command line.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::White => "white",
            Self::Green => "green",
            Self::Blue => "blue",
            Self::Red => "red",
            Self::Yellow => "yellow",
            Self::Purple => "purple",
        }
    }
}

impl std::fmt::Display for TaskColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown palette name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown task color: {0} (expected one of white, green, blue, red, yellow, purple)")]
pub struct UnknownColor(pub String);

impl FromStr for TaskColor {
    type Err = UnknownColor;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownColor(s.to_string()))
    }
}

/// A single work item on the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique task identifier (UUID v7), stable for the task's lifetime.
    pub id: TaskId,
    /// Display title.
    pub title: String,
    /// Optional free-form description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// When the task was created. Never changes afterwards.
    pub created_at: DateTime<Utc>,
    /// Identifier of the user who created the task. Never changes afterwards.
    pub created_by: String,
    /// When the title or description last changed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_edited: Option<DateTime<Utc>>,
    /// Cosmetic color tag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<TaskColor>,
}

impl Task {
    /// Creates a fresh task with a new id and the default palette color.
    #[must_use]
    pub fn new(
        title: String,
        description: Option<String>,
        created_by: String,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: TaskId::new(),
            title,
            description,
            created_at,
            created_by,
            last_edited: None,
            color: Some(TaskColor::default()),
        }
    }
}

/// A partial update to a task, merged shallowly onto the existing value.
///
/// Only fields that are `Some` are applied. `description` is doubly optional
/// so that an update can explicitly clear it (`Some(None)`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskUpdate {
    /// Replacement title.
    pub title: Option<String>,
    /// Replacement description; `Some(None)` clears it.
    pub description: Option<Option<String>>,
    /// Replacement color.
    pub color: Option<TaskColor>,
}

impl TaskUpdate {
    /// An update that only changes the color.
    #[must_use]
    pub const fn recolor(color: TaskColor) -> Self {
        Self {
            title: None,
            description: None,
            color: Some(color),
        }
    }

    /// An update that replaces the title and description together.
    #[must_use]
    pub const fn edit(title: String, description: Option<String>) -> Self {
        Self {
            title: Some(title),
            description: Some(description),
            color: None,
        }
    }

    /// Whether this update carries a color change.
    ///
    /// Updates carrying a color are not content edits and clear
    /// `last_edited`.
    #[must_use]
    pub const fn is_recolor(&self) -> bool {
        self.color.is_some()
    }
}
