//! Property-based tests for the copy-on-write board transforms.
//!
//! Uses proptest to verify, for arbitrary boards:
//! 1. Adding appends to exactly one column and leaves the rest untouched.
//! 2. Moving keeps the task count, appends the unchanged task to the
//!    destination and removes it from the source.
//! 3. Reordering is a single-element reposition that keeps every task.
//! 4. Deleting removes exactly the matching task.
//! 5. Lookups that miss return `None` and never change the input.

use chrono::{DateTime, Utc};
use kanban::board::ops;
use kanban_model::board::DEFAULT_COLUMNS;
use kanban_model::{Board, Task, TaskId, TaskUpdate};
use proptest::prelude::*;

// --- Strategies ---

fn fixed_time() -> DateTime<Utc> {
    DateTime::from_timestamp(1_700_000_000, 0).unwrap_or_default()
}

/// Strategy for a seeded board with up to 8 tasks per column.
fn arb_board() -> impl Strategy<Value = Board> {
    prop::collection::vec(prop::collection::vec("[a-z]{1,8}", 0..8), 3).prop_map(|columns| {
        let mut board = Board::seed();
        for (column, titles) in board.columns.iter_mut().zip(columns) {
            column.tasks = titles
                .into_iter()
                .map(|t| Task::new(t, None, "prop".to_string(), fixed_time()))
                .collect();
        }
        board
    })
}

fn column_id(index: usize) -> &'static str {
    DEFAULT_COLUMNS[index % DEFAULT_COLUMNS.len()].0
}

fn ids(board: &Board, column: &str) -> Vec<TaskId> {
    board
        .column(column)
        .map(|c| c.tasks.iter().map(|t| t.id.clone()).collect())
        .unwrap_or_default()
}

// --- Property tests ---

proptest! {
    /// Adding appends to the target column only.
    #[test]
    fn add_appends_to_one_column(board in arb_board(), col in 0usize..3, title in "[a-z]{1,8}") {
        let target = column_id(col);
        let task = Task::new(title, None, "prop".to_string(), fixed_time());
        let next = ops::add_task(&board, target, task.clone()).unwrap();

        let mut expected = ids(&board, target);
        expected.push(task.id);
        prop_assert_eq!(ids(&next, target), expected);
        for other in (0..3).map(column_id).filter(|c| *c != target) {
            prop_assert_eq!(next.column(other), board.column(other));
        }
        prop_assert_eq!(next.task_count(), board.task_count() + 1);
    }

    /// Moving across columns preserves the task and the total count.
    #[test]
    fn move_integrity(board in arb_board(), from in 0usize..3, to in 0usize..3, pick in any::<prop::sample::Index>()) {
        let (from, to) = (column_id(from), column_id(to));
        let source = board.column(from).unwrap();
        prop_assume!(!source.tasks.is_empty());
        let task = source.tasks[pick.index(source.tasks.len())].clone();

        let next = ops::move_task(&board, from, to, &task.id).unwrap();

        prop_assert_eq!(next.task_count(), board.task_count());
        prop_assert_eq!(next.column(to).unwrap().tasks.last(), Some(&task));
        prop_assert!(next.validate().is_ok());
        if from != to {
            prop_assert!(next.column(from).unwrap().task(&task.id).is_none());
            let third = (0..3).map(column_id).find(|c| *c != from && *c != to).unwrap();
            prop_assert_eq!(next.column(third), board.column(third));
        }
    }

    /// Reordering matches a remove-then-insert on the id list.
    #[test]
    fn reorder_is_reposition(board in arb_board(), col in 0usize..3, start in 0usize..10, end in 0usize..10) {
        let target = column_id(col);
        let before = ids(&board, target);
        let result = ops::reorder_tasks(&board, target, start, end);

        if start >= before.len() || start == end.min(before.len().saturating_sub(1)) {
            prop_assert!(result.is_none());
        } else {
            let mut expected = before.clone();
            let moved = expected.remove(start);
            expected.insert(end.min(before.len() - 1), moved);

            let next = result.unwrap();
            prop_assert_eq!(ids(&next, target), expected);
            prop_assert_eq!(next.task_count(), board.task_count());
        }
    }

    /// Deleting removes exactly the matching task.
    #[test]
    fn delete_is_exact(board in arb_board(), col in 0usize..3, pick in any::<prop::sample::Index>()) {
        let target = column_id(col);
        let before = ids(&board, target);
        prop_assume!(!before.is_empty());
        let victim = before[pick.index(before.len())].clone();

        let next = ops::delete_task(&board, target, &victim).unwrap();
        let expected: Vec<TaskId> = before.into_iter().filter(|id| *id != victim).collect();
        prop_assert_eq!(ids(&next, target), expected);
        prop_assert_eq!(next.task_count(), board.task_count() - 1);
    }

    /// Unknown columns and tasks never produce a new board.
    #[test]
    fn misses_are_noops(board in arb_board(), col in 0usize..3) {
        let target = column_id(col);
        let stranger = TaskId::new();
        let original = board.clone();

        prop_assert!(ops::add_task(&board, "archive", Task::new("x".to_string(), None, "p".to_string(), fixed_time())).is_none());
        prop_assert!(ops::move_task(&board, target, "archive", &stranger).is_none());
        prop_assert!(ops::move_task(&board, target, target, &stranger).is_none());
        prop_assert!(ops::reorder_tasks(&board, "archive", 0, 1).is_none());
        prop_assert!(ops::update_task(&board, target, &stranger, &TaskUpdate::default(), Utc::now()).is_none());
        prop_assert!(ops::delete_task(&board, target, &stranger).is_none());
        prop_assert_eq!(board, original);
    }
}
