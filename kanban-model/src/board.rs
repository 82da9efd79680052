//! Board and column types.
//!
//! A [`Board`] is an ordered list of [`Column`]s, each holding an ordered
//! list of tasks. Order is meaningful at both levels: column order is the
//! lane layout, task order is priority within a lane.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::task::{Task, TaskId};

/// Column id of the "to do" lane.
pub const TODO: &str = "todo";

/// Column id of the "in progress" lane.
pub const IN_PROGRESS: &str = "in-progress";

/// Column id of the "done" lane.
pub const DONE: &str = "done";

/// The fixed column set every new board starts with: `(id, title)`.
pub const DEFAULT_COLUMNS: [(&str, &str); 3] = [
    (TODO, "To do"),
    (IN_PROGRESS, "In progress"),
    (DONE, "Done"),
];

/// A named, ordered lane of tasks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    /// Unique column identifier.
    pub id: String,
    /// Display label.
    pub title: String,
    /// Tasks in lane order.
    #[serde(default)]
    pub tasks: Vec<Task>,
}

impl Column {
    /// Creates an empty column.
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            tasks: Vec::new(),
        }
    }

    /// Returns the position of a task within this column.
    #[must_use]
    pub fn position_of(&self, task_id: &TaskId) -> Option<usize> {
        self.tasks.iter().position(|t| t.id == *task_id)
    }

    /// Returns a task in this column by id.
    #[must_use]
    pub fn task(&self, task_id: &TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == *task_id)
    }
}

/// Reasons a board fails its structural invariants.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BoardError {
    /// Two columns share an id.
    #[error("duplicate column id: {0}")]
    DuplicateColumn(String),
    /// The same task id appears more than once on the board.
    #[error("duplicate task id: {0}")]
    DuplicateTask(TaskId),
}

/// The full ordered collection of columns and their tasks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    /// Columns in display order.
    pub columns: Vec<Column>,
}

impl Default for Board {
    fn default() -> Self {
        Self::seed()
    }
}

impl Board {
    /// The initial board: the three default columns, all empty.
    #[must_use]
    pub fn seed() -> Self {
        Self {
            columns: DEFAULT_COLUMNS
                .iter()
                .map(|(id, title)| Column::new(*id, *title))
                .collect(),
        }
    }

    /// Returns a column by id.
    #[must_use]
    pub fn column(&self, column_id: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.id == column_id)
    }

    /// Returns the position of a column by id.
    #[must_use]
    pub fn column_index(&self, column_id: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.id == column_id)
    }

    /// Total number of tasks across all columns.
    #[must_use]
    pub fn task_count(&self) -> usize {
        self.columns.iter().map(|c| c.tasks.len()).sum()
    }

    /// Checks column-id uniqueness and board-wide task-id uniqueness.
    ///
    /// # Errors
    ///
    /// Returns the first [`BoardError`] found.
    pub fn validate(&self) -> Result<(), BoardError> {
        let mut column_ids = HashSet::new();
        let mut task_ids = HashSet::new();
        for column in &self.columns {
            if !column_ids.insert(column.id.as_str()) {
                return Err(BoardError::DuplicateColumn(column.id.clone()));
            }
            for task in &column.tasks {
                if !task_ids.insert(&task.id) {
                    return Err(BoardError::DuplicateTask(task.id.clone()));
                }
            }
        }
        Ok(())
    }
}
