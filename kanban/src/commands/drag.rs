//! Translation of drag-and-drop outcomes into board commands.
//!
//! A drag gesture resolves to a source position, an optional destination
//! position and the dragged task's id. Dropping inside the same column is a
//! reorder; dropping on another column is a move to that column's end.

use kanban_model::TaskId;
use serde::{Deserialize, Serialize};

use super::BoardCommand;

/// A position on the board: a column and an index within it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DragLocation {
    /// Column the position is in.
    pub column_id: String,
    /// Zero-based index within the column.
    pub index: usize,
}

impl DragLocation {
    /// Creates a location.
    pub fn new(column_id: impl Into<String>, index: usize) -> Self {
        Self {
            column_id: column_id.into(),
            index,
        }
    }
}

/// The resolved result of a drag gesture.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DragOutcome {
    /// The dragged task.
    pub task_id: TaskId,
    /// Where the drag started.
    pub source: DragLocation,
    /// Where it was dropped, or `None` if it was dropped outside any column.
    pub destination: Option<DragLocation>,
}

/// Converts a drag outcome into at most one board command.
///
/// The destination index of a cross-column drop is ignored: the task is
/// always appended to the destination column.
#[must_use]
pub fn translate_drag(outcome: &DragOutcome) -> Option<BoardCommand> {
    let destination = outcome.destination.as_ref()?;
    let source = &outcome.source;

    if source.column_id == destination.column_id {
        if source.index == destination.index {
            return None;
        }
        return Some(BoardCommand::ReorderTasks {
            column_id: source.column_id.clone(),
            start_index: source.index,
            end_index: destination.index,
        });
    }

    Some(BoardCommand::MoveTask {
        from_column_id: source.column_id.clone(),
        to_column_id: destination.column_id.clone(),
        task_id: outcome.task_id.clone(),
    })
}
