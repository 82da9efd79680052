//! User intents and their translation into board commands.
//!
//! [`Command`] is what a user asks for; [`BoardCommand`] is what the
//! [`BoardStore`] applies. [`CommandTranslator`] sits between the two and
//! owns input validation, so the store itself can stay permissive.

pub mod drag;

pub use drag::{DragLocation, DragOutcome, translate_drag};

use kanban_model::{TaskColor, TaskId, TaskUpdate};
use thiserror::Error;

use crate::board::BoardStore;
use crate::storage::BoardStorage;

/// Default upper bound on task title length, in characters.
pub const DEFAULT_MAX_TITLE_LEN: usize = 256;

/// Errors raised while validating a user command.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// Task title is empty after trimming.
    #[error("task title cannot be empty")]
    TitleEmpty,
    /// Task title exceeds the maximum length.
    #[error("task title too long (max {0} characters)")]
    TitleTooLong(usize),
}

/// An operation the board store can apply directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardCommand {
    /// Append a new task to a column.
    AddTask {
        /// Target column.
        column_id: String,
        /// Task title.
        title: String,
        /// Optional description.
        description: Option<String>,
    },
    /// Move a task to the end of another column.
    MoveTask {
        /// Column the task is currently in.
        from_column_id: String,
        /// Column to append it to.
        to_column_id: String,
        /// Task to move.
        task_id: TaskId,
    },
    /// Reposition a task within one column.
    ReorderTasks {
        /// Column to reorder.
        column_id: String,
        /// Current index of the task.
        start_index: usize,
        /// Index it should end up at.
        end_index: usize,
    },
    /// Merge a partial update onto a task.
    UpdateTask {
        /// Column holding the task.
        column_id: String,
        /// Task to update.
        task_id: TaskId,
        /// Fields to change.
        update: TaskUpdate,
    },
    /// Remove a task.
    DeleteTask {
        /// Column holding the task.
        column_id: String,
        /// Task to remove.
        task_id: TaskId,
    },
}

/// A user intent, before validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Create a task from the add form.
    AddTask {
        column_id: String,
        title: String,
        description: Option<String>,
    },
    /// Save the edit form of a task.
    EditTask {
        column_id: String,
        task_id: TaskId,
        title: String,
        description: Option<String>,
    },
    /// Pick a palette color for a task.
    RecolorTask {
        column_id: String,
        task_id: TaskId,
        color: TaskColor,
    },
    /// Delete a task.
    DeleteTask { column_id: String, task_id: TaskId },
    /// Move a task to another column.
    MoveTask {
        from_column_id: String,
        to_column_id: String,
        task_id: TaskId,
    },
    /// Reposition a task within its column.
    ReorderTask {
        column_id: String,
        start_index: usize,
        end_index: usize,
    },
    /// A completed drag gesture.
    Drag(DragOutcome),
}

/// Validates user commands and turns them into [`BoardCommand`]s.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandTranslator {
    max_title_len: usize,
}

impl Default for CommandTranslator {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_TITLE_LEN)
    }
}

impl CommandTranslator {
    /// Creates a translator that accepts titles up to `max_title_len` characters.
    #[must_use]
    pub const fn new(max_title_len: usize) -> Self {
        Self { max_title_len }
    }

    /// Maximum accepted title length, in characters.
    #[must_use]
    pub const fn max_title_len(&self) -> usize {
        self.max_title_len
    }

    /// Validates `command` and returns the board command it stands for.
    ///
    /// `Ok(None)` means the command is valid but would change nothing.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::TitleEmpty`] or [`CommandError::TitleTooLong`]
    /// for add and edit commands with an unacceptable title.
    pub fn translate(&self, command: Command) -> Result<Option<BoardCommand>, CommandError> {
        let translated = match command {
            Command::AddTask {
                column_id,
                title,
                description,
            } => Some(BoardCommand::AddTask {
                column_id,
                title: self.validate_title(&title)?,
                description: normalize_description(description),
            }),
            Command::EditTask {
                column_id,
                task_id,
                title,
                description,
            } => Some(BoardCommand::UpdateTask {
                column_id,
                task_id,
                update: TaskUpdate::edit(
                    self.validate_title(&title)?,
                    normalize_description(description),
                ),
            }),
            Command::RecolorTask {
                column_id,
                task_id,
                color,
            } => Some(BoardCommand::UpdateTask {
                column_id,
                task_id,
                update: TaskUpdate::recolor(color),
            }),
            Command::DeleteTask { column_id, task_id } => {
                Some(BoardCommand::DeleteTask { column_id, task_id })
            }
            Command::MoveTask {
                from_column_id,
                to_column_id,
                task_id,
            } => (from_column_id != to_column_id).then_some(BoardCommand::MoveTask {
                from_column_id,
                to_column_id,
                task_id,
            }),
            Command::ReorderTask {
                column_id,
                start_index,
                end_index,
            } => (start_index != end_index).then_some(BoardCommand::ReorderTasks {
                column_id,
                start_index,
                end_index,
            }),
            Command::Drag(outcome) => translate_drag(&outcome),
        };
        Ok(translated)
    }

    /// Translates `command` and applies it to `store`.
    ///
    /// Returns whether the board changed.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError`] if validation fails; the store is untouched.
    pub fn dispatch<S: BoardStorage>(
        &self,
        store: &BoardStore<S>,
        command: Command,
    ) -> Result<bool, CommandError> {
        match self.translate(command)? {
            Some(board_command) => Ok(store.apply(board_command)),
            None => {
                tracing::debug!("command translated to nothing");
                Ok(false)
            }
        }
    }

    fn validate_title(&self, title: &str) -> Result<String, CommandError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(CommandError::TitleEmpty);
        }
        if title.chars().count() > self.max_title_len {
            return Err(CommandError::TitleTooLong(self.max_title_len));
        }
        Ok(title.to_string())
    }
}

/// Blank descriptions from a form mean "no description".
fn normalize_description(description: Option<String>) -> Option<String> {
    description.filter(|d| !d.trim().is_empty())
}
