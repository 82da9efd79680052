//! Pure copy-on-write board transforms.
//!
//! Every function takes the current board by reference and returns the next
//! board, or `None` when a referenced column or task does not exist. The
//! input board is never mutated, so a snapshot handed to a reader stays
//! valid forever. Indices and titles are not validated here; that happens at
//! the command boundary.

use chrono::{DateTime, Utc};
use kanban_model::{Board, Task, TaskId, TaskUpdate};

/// Appends `task` to the end of the named column.
#[must_use]
pub fn add_task(board: &Board, column_id: &str, task: Task) -> Option<Board> {
    let col = board.column_index(column_id)?;
    let mut next = board.clone();
    next.columns[col].tasks.push(task);
    Some(next)
}

/// Moves a task from one column to the end of another, unchanged.
///
/// The task is looked up only in `from_column_id`. Moving within the same
/// column relocates the task to the end of that column.
#[must_use]
pub fn move_task(
    board: &Board,
    from_column_id: &str,
    to_column_id: &str,
    task_id: &TaskId,
) -> Option<Board> {
    let from = board.column_index(from_column_id)?;
    let to = board.column_index(to_column_id)?;
    let pos = board.columns[from].position_of(task_id)?;

    let mut next = board.clone();
    let task = next.columns[from].tasks.remove(pos);
    next.columns[to].tasks.push(task);
    Some(next)
}

/// Removes the task at `start_index` and reinserts it at `end_index`.
///
/// This is a single-element reposition, not a swap. `end_index` past the
/// end is clamped to the last position. An out-of-range `start_index` or
/// `start_index == end_index` is a no-op.
#[must_use]
pub fn reorder_tasks(
    board: &Board,
    column_id: &str,
    start_index: usize,
    end_index: usize,
) -> Option<Board> {
    let col = board.column_index(column_id)?;
    let len = board.columns[col].tasks.len();
    if start_index >= len {
        return None;
    }
    let end_index = end_index.min(len - 1);
    if start_index == end_index {
        return None;
    }

    let mut next = board.clone();
    let tasks = &mut next.columns[col].tasks;
    let task = tasks.remove(start_index);
    tasks.insert(end_index, task);
    Some(next)
}

/// Shallow-merges `update` onto the matching task.
///
/// A color-carrying update clears `last_edited`, since recoloring is not an
/// edit. Any other update stamps it with `now`, never moving it backwards.
#[must_use]
pub fn update_task(
    board: &Board,
    column_id: &str,
    task_id: &TaskId,
    update: &TaskUpdate,
    now: DateTime<Utc>,
) -> Option<Board> {
    let col = board.column_index(column_id)?;
    let pos = board.columns[col].position_of(task_id)?;

    let mut next = board.clone();
    let task = &mut next.columns[col].tasks[pos];
    apply_update(task, update, now);
    Some(next)
}

/// Removes the task with the matching id from the named column.
#[must_use]
pub fn delete_task(board: &Board, column_id: &str, task_id: &TaskId) -> Option<Board> {
    let col = board.column_index(column_id)?;
    let pos = board.columns[col].position_of(task_id)?;

    let mut next = board.clone();
    next.columns[col].tasks.remove(pos);
    Some(next)
}

/// Applies a [`TaskUpdate`] to a task in place.
///
/// `id`, `created_at` and `created_by` are never touched.
pub fn apply_update(task: &mut Task, update: &TaskUpdate, now: DateTime<Utc>) {
    if let Some(title) = &update.title {
        task.title.clone_from(title);
    }
    if let Some(description) = &update.description {
        task.description.clone_from(description);
    }
    if let Some(color) = update.color {
        task.color = Some(color);
        task.last_edited = None;
    } else {
        task.last_edited = Some(task.last_edited.map_or(now, |prev| prev.max(now)));
    }
}
