//! The board store: sole owner of the current board snapshot.
//!
//! [`BoardStore`] serializes every mutation behind one lock, persists the
//! resulting board to a [`BoardStorage`] slot, and publishes the new
//! snapshot to subscribers. Operations never fail: a missing column or task
//! leaves the board untouched, and a failed write is reported as a
//! [`PersistWarning`] while the in-memory transition still stands.

use std::sync::Arc;

use chrono::Utc;
use kanban_model::{Board, Task, TaskId, TaskUpdate};
use parking_lot::Mutex;
use tokio::sync::{mpsc, watch};

use super::ops;
use crate::auth::AuthContext;
use crate::commands::BoardCommand;
use crate::storage::{self, BoardStorage};

/// `created_by` stamped on tasks added while nobody is signed in.
pub const ANONYMOUS_USER: &str = "anonymous";

/// Warning emitted when a board transition could not be persisted.
///
/// The change is still visible in memory; only durability was lost.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistWarning {
    /// Description of the storage error.
    pub reason: String,
}

/// Owns the board, applies operations and keeps storage in step.
pub struct BoardStore<S: BoardStorage> {
    /// Durable slot the board is written to after each transition.
    storage: S,
    /// Storage key of the slot.
    key: String,
    /// The current snapshot. Held for the whole of compute, persist and publish.
    state: Mutex<Arc<Board>>,
    /// Publishes each new snapshot.
    notify: watch::Sender<Arc<Board>>,
    /// Source of the acting user id.
    auth: AuthContext,
    /// Optional channel for persistence warnings.
    warning_tx: Option<mpsc::Sender<PersistWarning>>,
}

impl<S: BoardStorage> BoardStore<S> {
    /// Opens the store, loading the board saved under `key`.
    ///
    /// Anything unusable in storage yields the seed board.
    pub fn open(storage: S, key: impl Into<String>, auth: AuthContext) -> Self {
        let key = key.into();
        let board = Arc::new(storage::load_board(&storage, &key));
        let (notify, _) = watch::channel(Arc::clone(&board));
        Self {
            storage,
            key,
            state: Mutex::new(board),
            notify,
            auth,
            warning_tx: None,
        }
    }

    /// Like [`open`](Self::open), also returning a receiver of
    /// [`PersistWarning`]s with room for `warning_buffer` pending warnings.
    pub fn open_with_warnings(
        storage: S,
        key: impl Into<String>,
        auth: AuthContext,
        warning_buffer: usize,
    ) -> (Self, mpsc::Receiver<PersistWarning>) {
        let (tx, rx) = mpsc::channel(warning_buffer.max(1));
        let mut store = Self::open(storage, key, auth);
        store.warning_tx = Some(tx);
        (store, rx)
    }

    /// The current board snapshot.
    #[must_use]
    pub fn snapshot(&self) -> Arc<Board> {
        Arc::clone(&self.state.lock())
    }

    /// Subscribes to snapshot changes.
    ///
    /// The receiver's current value is the snapshot at subscription time.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Arc<Board>> {
        self.notify.subscribe()
    }

    /// The id new tasks are attributed to.
    #[must_use]
    pub fn user_id(&self) -> String {
        self.auth
            .current_user_id()
            .unwrap_or_else(|| ANONYMOUS_USER.to_string())
    }

    /// Storage key this store persists under.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The underlying storage.
    #[must_use]
    pub const fn storage(&self) -> &S {
        &self.storage
    }

    /// Appends a new task to the end of a column.
    ///
    /// Returns the new task's id, or `None` if the column does not exist.
    pub fn add_task(
        &self,
        column_id: &str,
        title: impl Into<String>,
        description: Option<String>,
    ) -> Option<TaskId> {
        let task = Task::new(title.into(), description, self.user_id(), Utc::now());
        let id = task.id.clone();
        self.commit("add_task", |board| ops::add_task(board, column_id, task))
            .then_some(id)
    }

    /// Moves a task to the end of another column. Returns whether the board changed.
    pub fn move_task(&self, from_column_id: &str, to_column_id: &str, task_id: &TaskId) -> bool {
        self.commit("move_task", |board| {
            ops::move_task(board, from_column_id, to_column_id, task_id)
        })
    }

    /// Repositions one task within a column. Returns whether the board changed.
    pub fn reorder_tasks(&self, column_id: &str, start_index: usize, end_index: usize) -> bool {
        self.commit("reorder_tasks", |board| {
            ops::reorder_tasks(board, column_id, start_index, end_index)
        })
    }

    /// Merges `update` onto a task. Returns whether the board changed.
    pub fn update_task(&self, column_id: &str, task_id: &TaskId, update: &TaskUpdate) -> bool {
        let now = Utc::now();
        self.commit("update_task", |board| {
            ops::update_task(board, column_id, task_id, update, now)
        })
    }

    /// Removes a task. Returns whether the board changed.
    pub fn delete_task(&self, column_id: &str, task_id: &TaskId) -> bool {
        self.commit("delete_task", |board| {
            ops::delete_task(board, column_id, task_id)
        })
    }

    /// Applies a translated command. Returns whether the board changed.
    pub fn apply(&self, command: BoardCommand) -> bool {
        match command {
            BoardCommand::AddTask {
                column_id,
                title,
                description,
            } => self.add_task(&column_id, title, description).is_some(),
            BoardCommand::MoveTask {
                from_column_id,
                to_column_id,
                task_id,
            } => self.move_task(&from_column_id, &to_column_id, &task_id),
            BoardCommand::ReorderTasks {
                column_id,
                start_index,
                end_index,
            } => self.reorder_tasks(&column_id, start_index, end_index),
            BoardCommand::UpdateTask {
                column_id,
                task_id,
                update,
            } => self.update_task(&column_id, &task_id, &update),
            BoardCommand::DeleteTask { column_id, task_id } => {
                self.delete_task(&column_id, &task_id)
            }
        }
    }

    /// Runs `transform` against the current board and, if it produced a new
    /// board, persists and publishes it.
    fn commit<F>(&self, op: &'static str, transform: F) -> bool
    where
        F: FnOnce(&Board) -> Option<Board>,
    {
        let mut state = self.state.lock();
        let Some(next) = transform(&**state) else {
            tracing::debug!(op, "operation did not match the board, nothing changed");
            return false;
        };

        let next = Arc::new(next);
        *state = Arc::clone(&next);
        self.persist(op, &next);
        self.notify.send_replace(next);
        true
    }

    fn persist(&self, op: &'static str, board: &Board) {
        if let Err(err) = storage::save_board(&self.storage, &self.key, board) {
            tracing::error!(
                op,
                key = %self.key,
                error = %err,
                "board changed but could not be persisted"
            );
            if let Some(tx) = &self.warning_tx {
                // Best-effort; a full channel drops the warning.
                let _ = tx.try_send(PersistWarning {
                    reason: err.to_string(),
                });
            }
        } else {
            tracing::trace!(op, key = %self.key, tasks = board.task_count(), "persisted board");
        }
    }
}

impl<S: BoardStorage + std::fmt::Debug> std::fmt::Debug for BoardStore<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoardStore")
            .field("storage", &self.storage)
            .field("key", &self.key)
            .field("tasks", &self.state.lock().task_count())
            .finish_non_exhaustive()
    }
}
