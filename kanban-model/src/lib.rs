//! Shared data model for the kanban board: tasks, columns, boards, and the
//! JSON envelope they are persisted in.

pub mod board;
pub mod codec;
pub mod task;

pub use board::{Board, BoardError, Column};
pub use task::{Task, TaskColor, TaskId, TaskUpdate};
