//! JSON codec for the persisted board envelope.
//!
//! The stored value wraps the board in a versioned envelope:
//!
//! ```json
//! { "version": 1, "state": { "board": { "columns": [ ... ] } } }
//! ```
//!
//! Timestamps are RFC 3339 strings. A decoded board must also pass
//! [`Board::validate`]; anything else is reported as an error so the caller
//! can fall back to a fresh board.

use serde::{Deserialize, Serialize};

use crate::board::{Board, BoardError};

/// Envelope schema version written by [`encode`] and accepted by [`decode`].
pub const SCHEMA_VERSION: u32 = 1;

/// Error type for codec encode/decode operations.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// Serialization or deserialization failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    /// The envelope was written by an incompatible schema version.
    #[error("unsupported board schema version {found}")]
    UnsupportedVersion {
        /// Version found in the stored envelope.
        found: u32,
    },
    /// The board decoded but breaks a structural invariant.
    #[error("invalid board: {0}")]
    Invalid(#[from] BoardError),
}

#[derive(Serialize)]
struct EnvelopeRef<'a> {
    version: u32,
    state: StateRef<'a>,
}

#[derive(Serialize)]
struct StateRef<'a> {
    board: &'a Board,
}

#[derive(Deserialize)]
struct Envelope {
    version: u32,
    state: serde_json::Value,
}

#[derive(Deserialize)]
struct State {
    board: Board,
}

/// Encodes a [`Board`] into its persisted JSON envelope.
///
/// # Errors
///
/// Returns `CodecError::Serialization` if the board cannot be serialized.
pub fn encode(board: &Board) -> Result<String, CodecError> {
    let envelope = EnvelopeRef {
        version: SCHEMA_VERSION,
        state: StateRef { board },
    };
    Ok(serde_json::to_string(&envelope)?)
}

/// Decodes a [`Board`] from its persisted JSON envelope.
///
/// # Errors
///
/// Returns `CodecError::Serialization` for malformed JSON or a mismatched
/// shape, `CodecError::UnsupportedVersion` for a foreign schema version, and
/// `CodecError::Invalid` when the board breaks its invariants.
pub fn decode(value: &str) -> Result<Board, CodecError> {
    let envelope: Envelope = serde_json::from_str(value)?;
    if envelope.version != SCHEMA_VERSION {
        return Err(CodecError::UnsupportedVersion {
            found: envelope.version,
        });
    }
    let state: State = serde_json::from_value(envelope.state)?;
    state.board.validate()?;
    Ok(state.board)
}
