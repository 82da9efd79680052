//! Property-based tests for the persisted board codec.
//!
//! Uses proptest to verify:
//! 1. Any valid `Board` survives an encode → decode round-trip.
//! 2. Arbitrary text never causes a panic in `decode` (returns `Err` gracefully).
//! 3. Envelopes carrying a foreign schema version are always rejected.

use chrono::{DateTime, Utc};
use kanban_model::codec::{self, CodecError};
use kanban_model::{Board, Column, Task, TaskColor, TaskId};
use proptest::prelude::*;
use uuid::Uuid;

// --- Strategies for board types ---

/// Strategy for timestamps between 1970 and 2100, millisecond precision.
fn arb_timestamp() -> impl Strategy<Value = DateTime<Utc>> {
    (0i64..4_102_444_800_000).prop_filter_map("in range", DateTime::from_timestamp_millis)
}

fn arb_color() -> impl Strategy<Value = Option<TaskColor>> {
    prop::option::of(prop::sample::select(TaskColor::ALL.to_vec()))
}

/// Strategy for a task. The id is a placeholder, replaced by [`arb_board`]
/// to keep ids unique.
fn arb_task() -> impl Strategy<Value = Task> {
    (
        ".{0,40}",
        prop::option::of(".{0,80}"),
        arb_timestamp(),
        "[a-z0-9-]{1,16}",
        prop::option::of(arb_timestamp()),
        arb_color(),
    )
        .prop_map(
            |(title, description, created_at, created_by, last_edited, color)| Task {
                id: TaskId::from_uuid(Uuid::nil()),
                title,
                description,
                created_at,
                created_by,
                last_edited,
                color,
            },
        )
}

/// Strategy for a board of up to five uniquely-named columns.
fn arb_board() -> impl Strategy<Value = Board> {
    prop::collection::vec(
        (".{0,20}", prop::collection::vec(arb_task(), 0..6)),
        0..5,
    )
    .prop_map(|columns| {
        let mut next_id: u128 = 1;
        Board {
            columns: columns
                .into_iter()
                .enumerate()
                .map(|(i, (title, mut tasks))| {
                    for task in &mut tasks {
                        task.id = TaskId::from_uuid(Uuid::from_u128(next_id));
                        next_id += 1;
                    }
                    Column {
                        id: format!("col-{i}"),
                        title,
                        tasks,
                    }
                })
                .collect(),
        }
    })
}

// --- Property tests ---

proptest! {
    /// Any valid board survives an encode → decode round-trip.
    #[test]
    fn board_round_trip(board in arb_board()) {
        let json = codec::encode(&board).expect("encode should succeed");
        let decoded = codec::decode(&json).expect("decode should succeed");
        prop_assert_eq!(board, decoded);
    }

    /// Arbitrary text never causes a panic when decoded.
    #[test]
    fn random_text_decode_no_panic(text in ".{0,512}") {
        // We don't care if it returns Ok or Err, just that it doesn't panic.
        let _ = codec::decode(&text);
    }

    /// An envelope with any version other than the current one is rejected.
    #[test]
    fn foreign_version_rejected(version in any::<u32>().prop_filter("not current", |v| *v != codec::SCHEMA_VERSION)) {
        let json = format!(r#"{{"version":{version},"state":{{"board":{{"columns":[]}}}}}}"#);
        let result = codec::decode(&json);
        prop_assert!(
            matches!(result, Err(CodecError::UnsupportedVersion { found }) if found == version),
            "unexpected result: {:?}",
            result
        );
    }
}
