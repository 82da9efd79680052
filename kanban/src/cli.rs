//! Command-line surface: subcommands, task lookup and board rendering.
//!
//! Every mutating subcommand is turned into a [`Command`] and dispatched
//! through the [`CommandTranslator`], so the CLI gets exactly the same
//! validation as any other front end.

use std::io::Write;

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Local, Utc};
use kanban_model::{Board, Column, Task, TaskColor, TaskId};

use crate::board::BoardStore;
use crate::commands::{
    BoardCommand, Command, CommandError, CommandTranslator, DragLocation, DragOutcome,
};
use crate::storage::BoardStorage;

/// Number of id characters shown in the text view.
const SHORT_ID_LEN: usize = 8;

/// Errors surfaced to the user by the CLI.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// The command failed validation.
    #[error(transparent)]
    Command(#[from] CommandError),

    /// No column with the given id.
    #[error("no column named {0:?}")]
    UnknownColumn(String),

    /// No task in the column matches the given id or prefix.
    #[error("no task matching {query:?} in column {column:?}")]
    TaskNotFound {
        /// Column that was searched.
        column: String,
        /// The id or prefix given.
        query: String,
    },

    /// More than one task in the column matches the given prefix.
    #[error("{matches} tasks match {query:?}; use a longer prefix")]
    AmbiguousTask {
        /// The prefix given.
        query: String,
        /// How many tasks matched.
        matches: usize,
    },

    /// A `COLUMN:INDEX` location could not be parsed.
    #[error("invalid location {0:?} (expected COLUMN:INDEX)")]
    InvalidLocation(String),

    /// The timestamp format string is not a valid chrono format.
    #[error("invalid timestamp format {0:?}")]
    InvalidTimestampFormat(String),

    /// Rendering JSON failed.
    #[error("failed to render board: {0}")]
    Render(#[from] serde_json::Error),

    /// Writing output failed.
    #[error("failed to write output: {0}")]
    Output(#[from] std::io::Error),
}

/// Subcommands of the `kanban` binary.
#[derive(clap::Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum CliCommand {
    /// Print the board.
    Show {
        /// Print the raw board as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Add a task to the end of a column.
    Add {
        /// Column id (todo, in-progress, done).
        column: String,
        /// Task title.
        title: String,
        /// Task description.
        #[arg(short, long)]
        description: Option<String>,
    },
    /// Change a task's title or description.
    Edit {
        /// Column holding the task.
        column: String,
        /// Task id or unique id prefix.
        task: String,
        /// New title.
        #[arg(long)]
        title: Option<String>,
        /// New description; an empty string clears it.
        #[arg(short, long)]
        description: Option<String>,
    },
    /// Set a task's color.
    Color {
        /// Column holding the task.
        column: String,
        /// Task id or unique id prefix.
        task: String,
        /// One of white, green, blue, red, yellow, purple.
        color: TaskColor,
    },
    /// Delete a task.
    Delete {
        /// Column holding the task.
        column: String,
        /// Task id or unique id prefix.
        task: String,
    },
    /// Move a task to the end of another column.
    Move {
        /// Column the task is in.
        from: String,
        /// Column to move it to.
        to: String,
        /// Task id or unique id prefix.
        task: String,
    },
    /// Move the task at one index of a column to another index.
    Reorder {
        /// Column to reorder.
        column: String,
        /// Current index of the task.
        start: usize,
        /// Index it should end up at.
        end: usize,
    },
    /// Replay a drag-and-drop gesture.
    Drag {
        /// Task id or unique id prefix, looked up in the source column.
        task: String,
        /// Where the drag started, as COLUMN:INDEX.
        #[arg(long, value_parser = parse_location)]
        from: DragLocation,
        /// Where it was dropped, as COLUMN:INDEX. Omit for a cancelled drag.
        #[arg(long, value_parser = parse_location)]
        to: Option<DragLocation>,
    },
}

/// Parses `COLUMN:INDEX`.
///
/// # Errors
///
/// Returns [`CliError::InvalidLocation`] if there is no `:` or the index is
/// not a number.
pub fn parse_location(s: &str) -> Result<DragLocation, CliError> {
    let (column, index) = s
        .rsplit_once(':')
        .ok_or_else(|| CliError::InvalidLocation(s.to_string()))?;
    if column.is_empty() {
        return Err(CliError::InvalidLocation(s.to_string()));
    }
    let index = index
        .parse()
        .map_err(|_| CliError::InvalidLocation(s.to_string()))?;
    Ok(DragLocation::new(column, index))
}

/// Finds a task in `column_id` by full id or unique id prefix.
///
/// # Errors
///
/// Returns [`CliError::UnknownColumn`], [`CliError::TaskNotFound`] or
/// [`CliError::AmbiguousTask`].
pub fn resolve_task(board: &Board, column_id: &str, query: &str) -> Result<TaskId, CliError> {
    let column = board
        .column(column_id)
        .ok_or_else(|| CliError::UnknownColumn(column_id.to_string()))?;

    if let Some(id) = query
        .parse::<TaskId>()
        .ok()
        .filter(|id| column.task(id).is_some())
    {
        return Ok(id);
    }

    let query_lower = query.to_ascii_lowercase();
    let mut matches = column
        .tasks
        .iter()
        .filter(|t| !query.is_empty() && t.id.to_string().starts_with(&query_lower));
    match (matches.next(), matches.next()) {
        (Some(task), None) => Ok(task.id.clone()),
        (None, _) => Err(CliError::TaskNotFound {
            column: column_id.to_string(),
            query: query.to_string(),
        }),
        (Some(_), Some(_)) => Err(CliError::AmbiguousTask {
            query: query.to_string(),
            matches: 2 + matches.count(),
        }),
    }
}

/// Runs one subcommand against `store`, writing human output to `out`.
///
/// # Errors
///
/// Returns [`CliError`] for validation failures, unresolvable tasks and
/// output failures. Lookups that the store treats as no-ops are reported
/// as "nothing changed" rather than as errors.
pub fn execute<S: BoardStorage, W: Write>(
    store: &BoardStore<S>,
    translator: &CommandTranslator,
    timestamp_format: &str,
    command: CliCommand,
    out: &mut W,
) -> Result<(), CliError> {
    let board = store.snapshot();
    let command = match command {
        CliCommand::Show { json } => {
            if json {
                writeln!(out, "{}", serde_json::to_string_pretty(&*board)?)?;
            } else {
                render_board(&board, timestamp_format, out)?;
            }
            return Ok(());
        }
        CliCommand::Add {
            column,
            title,
            description,
        } => {
            let translated = translator.translate(Command::AddTask {
                column_id: column,
                title,
                description,
            })?;
            if let Some(BoardCommand::AddTask {
                column_id,
                title,
                description,
            }) = translated
            {
                match store.add_task(&column_id, title, description) {
                    Some(id) => writeln!(out, "added {id}")?,
                    None => return Err(CliError::UnknownColumn(column_id)),
                }
            }
            return Ok(());
        }
        CliCommand::Edit {
            column,
            task,
            title,
            description,
        } => {
            let task_id = resolve_task(&board, &column, &task)?;
            let current = board
                .column(&column)
                .and_then(|c| c.task(&task_id))
                .ok_or_else(|| CliError::TaskNotFound {
                    column: column.clone(),
                    query: task.clone(),
                })?;
            Command::EditTask {
                title: title.unwrap_or_else(|| current.title.clone()),
                description: description.or_else(|| current.description.clone()),
                column_id: column,
                task_id,
            }
        }
        CliCommand::Color {
            column,
            task,
            color,
        } => Command::RecolorTask {
            task_id: resolve_task(&board, &column, &task)?,
            column_id: column,
            color,
        },
        CliCommand::Delete { column, task } => Command::DeleteTask {
            task_id: resolve_task(&board, &column, &task)?,
            column_id: column,
        },
        CliCommand::Move { from, to, task } => Command::MoveTask {
            task_id: resolve_task(&board, &from, &task)?,
            from_column_id: from,
            to_column_id: to,
        },
        CliCommand::Reorder { column, start, end } => Command::ReorderTask {
            column_id: column,
            start_index: start,
            end_index: end,
        },
        CliCommand::Drag { task, from, to } => Command::Drag(DragOutcome {
            task_id: resolve_task(&board, &from.column_id, &task)?,
            source: from,
            destination: to,
        }),
    };

    if translator.dispatch(store, command)? {
        writeln!(out, "ok")?;
    } else {
        writeln!(out, "nothing changed")?;
    }
    Ok(())
}

/// Writes a plain-text view of the board.
///
/// # Errors
///
/// Returns [`CliError::InvalidTimestampFormat`] for a bad format string, or
/// [`CliError::Output`] if writing fails.
pub fn render_board<W: Write>(
    board: &Board,
    timestamp_format: &str,
    out: &mut W,
) -> Result<(), CliError> {
    if StrftimeItems::new(timestamp_format).any(|item| item == Item::Error) {
        return Err(CliError::InvalidTimestampFormat(timestamp_format.to_string()));
    }

    for (i, column) in board.columns.iter().enumerate() {
        if i > 0 {
            writeln!(out)?;
        }
        render_column(column, timestamp_format, out)?;
    }
    Ok(())
}

fn render_column<W: Write>(column: &Column, fmt: &str, out: &mut W) -> std::io::Result<()> {
    writeln!(out, "{} ({})", column.title, column.tasks.len())?;
    if column.tasks.is_empty() {
        writeln!(out, "  (empty)")?;
    }
    for (index, task) in column.tasks.iter().enumerate() {
        render_task(index, task, fmt, out)?;
    }
    Ok(())
}

fn render_task<W: Write>(index: usize, task: &Task, fmt: &str, out: &mut W) -> std::io::Result<()> {
    let id = task.id.to_string();
    let short_id = id.get(..SHORT_ID_LEN).unwrap_or(&id);
    let color = task.color.unwrap_or_default();

    write!(
        out,
        "  {index:>2}  {short_id}  {title}  [{color}]  by {author}, {created}",
        title = task.title,
        author = task.created_by,
        created = format_timestamp(task.created_at, fmt),
    )?;
    if let Some(edited) = task.last_edited {
        write!(out, " (edited {})", format_timestamp(edited, fmt))?;
    }
    writeln!(out)?;

    if let Some(description) = &task.description {
        for line in description.lines() {
            writeln!(out, "        {line}")?;
        }
    }
    Ok(())
}

fn format_timestamp(ts: DateTime<Utc>, fmt: &str) -> String {
    ts.with_timezone(&Local).format(fmt).to_string()
}
