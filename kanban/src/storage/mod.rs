//! Durable key-value slots for the persisted board.
//!
//! Defines the [`BoardStorage`] trait plus two implementations:
//! - [`memory::MemoryStorage`]: in-memory slots for tests and ephemeral runs
//! - [`file::FileStorage`]: one JSON file per key under a data directory
//!
//! [`load_board`] and [`save_board`] layer the board codec on top of a slot.
//! Loading never fails: anything unreadable falls back to the seed board.

pub mod file;
pub mod memory;

pub use file::FileStorage;
pub use memory::MemoryStorage;

use kanban_model::{Board, codec};

/// Default key the board is stored under.
pub const DEFAULT_STORAGE_KEY: &str = "board-storage";

/// Errors that can occur while reading or writing a storage slot.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The key cannot be used as a slot name.
    #[error("invalid storage key: {0:?}")]
    InvalidKey(String),

    /// Reading the slot failed.
    #[error("read failed: {0}")]
    ReadFailed(String),

    /// Writing the slot failed.
    #[error("write failed: {0}")]
    WriteFailed(String),

    /// The board could not be encoded.
    #[error("encode failed: {0}")]
    Encode(#[from] codec::CodecError),
}

/// A synchronous string key-value slot.
///
/// Implementations must be safe to share across threads; the board store
/// only ever writes under its own lock, so no concurrent writers to the
/// same key are expected.
pub trait BoardStorage: Send + Sync {
    /// Read the value stored under `key`, or `None` if nothing is stored.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the slot exists but cannot be read.
    fn read(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replace the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the value cannot be written.
    fn write(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Load the board stored under `key`, falling back to [`Board::seed`].
///
/// A missing slot, an unreadable slot, corrupt JSON, a foreign schema version
/// and a board that breaks its invariants all yield the seed board.
pub fn load_board<S: BoardStorage + ?Sized>(storage: &S, key: &str) -> Board {
    let raw = match storage.read(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => {
            tracing::debug!(key, "no stored board, starting from seed");
            return Board::seed();
        }
        Err(err) => {
            tracing::warn!(key, error = %err, "could not read stored board, starting from seed");
            return Board::seed();
        }
    };

    match codec::decode(&raw) {
        Ok(board) => {
            tracing::debug!(key, tasks = board.task_count(), "loaded stored board");
            board
        }
        Err(err) => {
            tracing::warn!(key, error = %err, "stored board is unusable, starting from seed");
            Board::seed()
        }
    }
}

/// Encode `board` and write it under `key`.
///
/// # Errors
///
/// Returns [`StorageError::Encode`] if encoding fails, or the slot's own
/// error if the write fails.
pub fn save_board<S: BoardStorage + ?Sized>(
    storage: &S,
    key: &str,
    board: &Board,
) -> Result<(), StorageError> {
    let encoded = codec::encode(board)?;
    storage.write(key, &encoded)
}
