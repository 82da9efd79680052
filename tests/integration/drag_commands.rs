//! Integration tests for command translation and dispatch.
//!
//! Drives `CommandTranslator` against a live `BoardStore`, covering drag
//! outcomes (cancelled, in place, reorder, cross-column) and the validation
//! of form-style commands.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use kanban::auth::AuthContext;
use kanban::board::BoardStore;
use kanban::commands::{
    BoardCommand, Command, CommandError, CommandTranslator, DragLocation, DragOutcome,
    translate_drag,
};
use kanban::storage::{DEFAULT_STORAGE_KEY, MemoryStorage};
use kanban_model::board::{DONE, IN_PROGRESS, TODO};
use kanban_model::{Board, TaskColor, TaskId};

// ---------------------------------------------------------------------------
// Helper functions
// ---------------------------------------------------------------------------

/// A store with tasks A, B, C in `todo` and X in `in-progress`.
fn make_store() -> (BoardStore<MemoryStorage>, Vec<TaskId>) {
    let store = BoardStore::open(
        MemoryStorage::new(),
        DEFAULT_STORAGE_KEY,
        AuthContext::signed_in("alice"),
    );
    let ids = ["A", "B", "C"]
        .iter()
        .map(|t| store.add_task(TODO, *t, None).unwrap())
        .collect();
    store.add_task(IN_PROGRESS, "X", None).unwrap();
    (store, ids)
}

fn titles(board: &Board, column: &str) -> Vec<String> {
    board
        .column(column)
        .unwrap()
        .tasks
        .iter()
        .map(|t| t.title.clone())
        .collect()
}

fn drag(task_id: &TaskId, from: (&str, usize), to: Option<(&str, usize)>) -> Command {
    Command::Drag(DragOutcome {
        task_id: task_id.clone(),
        source: DragLocation::new(from.0, from.1),
        destination: to.map(|(c, i)| DragLocation::new(c, i)),
    })
}

// ===========================================================================
// Drag outcomes
// ===========================================================================

#[test]
fn cancelled_drag_changes_nothing() {
    let (store, ids) = make_store();
    let before = store.snapshot();
    let changed = CommandTranslator::default()
        .dispatch(&store, drag(&ids[0], (TODO, 0), None))
        .unwrap();
    assert!(!changed);
    assert_eq!(*store.snapshot(), *before);
}

#[test]
fn drop_in_place_changes_nothing() {
    let (store, ids) = make_store();
    let changed = CommandTranslator::default()
        .dispatch(&store, drag(&ids[1], (TODO, 1), Some((TODO, 1))))
        .unwrap();
    assert!(!changed);
    assert_eq!(titles(&store.snapshot(), TODO), vec!["A", "B", "C"]);
}

#[test]
fn drag_within_column_repositions() {
    let (store, ids) = make_store();
    let translator = CommandTranslator::default();

    assert!(
        translator
            .dispatch(&store, drag(&ids[0], (TODO, 0), Some((TODO, 2))))
            .unwrap()
    );
    assert_eq!(titles(&store.snapshot(), TODO), vec!["B", "C", "A"]);

    assert!(
        translator
            .dispatch(&store, drag(&ids[0], (TODO, 2), Some((TODO, 0))))
            .unwrap()
    );
    assert_eq!(titles(&store.snapshot(), TODO), vec!["A", "B", "C"]);
}

#[test]
fn drag_across_columns_appends_ignoring_index() {
    let (store, ids) = make_store();
    assert!(
        CommandTranslator::default()
            .dispatch(&store, drag(&ids[1], (TODO, 1), Some((IN_PROGRESS, 0))))
            .unwrap()
    );

    let board = store.snapshot();
    assert_eq!(titles(&board, TODO), vec!["A", "C"]);
    assert_eq!(titles(&board, IN_PROGRESS), vec!["X", "B"]);
}

#[test]
fn drag_to_empty_column() {
    let (store, ids) = make_store();
    let cmd = translate_drag(&DragOutcome {
        task_id: ids[2].clone(),
        source: DragLocation::new(TODO, 2),
        destination: Some(DragLocation::new(DONE, 0)),
    });
    assert!(matches!(cmd, Some(BoardCommand::MoveTask { .. })));
    assert!(store.apply(cmd.unwrap()));
    assert_eq!(titles(&store.snapshot(), DONE), vec!["C"]);
}

#[test]
fn drag_with_stale_task_id_is_noop() {
    let (store, _) = make_store();
    let before = store.snapshot();
    let changed = CommandTranslator::default()
        .dispatch(&store, drag(&TaskId::new(), (TODO, 0), Some((DONE, 0))))
        .unwrap();
    assert!(!changed);
    assert_eq!(*store.snapshot(), *before);
}

// ===========================================================================
// Form commands
// ===========================================================================

#[test]
fn add_validates_before_touching_store() {
    let (store, _) = make_store();
    let translator = CommandTranslator::new(10);

    let err = translator
        .dispatch(
            &store,
            Command::AddTask {
                column_id: DONE.to_string(),
                title: "this title is far too long".to_string(),
                description: None,
            },
        )
        .unwrap_err();
    assert_eq!(err, CommandError::TitleTooLong(10));

    let err = translator
        .dispatch(
            &store,
            Command::AddTask {
                column_id: DONE.to_string(),
                title: String::new(),
                description: None,
            },
        )
        .unwrap_err();
    assert_eq!(err, CommandError::TitleEmpty);
    assert!(store.snapshot().column(DONE).unwrap().tasks.is_empty());
}

#[test]
fn edit_then_recolor() {
    let (store, ids) = make_store();
    let translator = CommandTranslator::default();

    translator
        .dispatch(
            &store,
            Command::EditTask {
                column_id: TODO.to_string(),
                task_id: ids[0].clone(),
                title: " A (renamed) ".to_string(),
                description: Some("now with notes".to_string()),
            },
        )
        .unwrap();
    {
        let board = store.snapshot();
        let task = board.column(TODO).unwrap().task(&ids[0]).unwrap();
        assert_eq!(task.title, "A (renamed)");
        assert_eq!(task.description.as_deref(), Some("now with notes"));
        assert!(task.last_edited.is_some());
    }

    translator
        .dispatch(
            &store,
            Command::RecolorTask {
                column_id: TODO.to_string(),
                task_id: ids[0].clone(),
                color: TaskColor::Purple,
            },
        )
        .unwrap();
    let board = store.snapshot();
    let task = board.column(TODO).unwrap().task(&ids[0]).unwrap();
    assert_eq!(task.color, Some(TaskColor::Purple));
    assert_eq!(task.title, "A (renamed)");
    assert!(task.last_edited.is_none());
}

#[test]
fn delete_and_move_commands() {
    let (store, ids) = make_store();
    let translator = CommandTranslator::default();

    assert!(
        translator
            .dispatch(
                &store,
                Command::MoveTask {
                    from_column_id: TODO.to_string(),
                    to_column_id: DONE.to_string(),
                    task_id: ids[0].clone(),
                },
            )
            .unwrap()
    );
    assert!(
        translator
            .dispatch(
                &store,
                Command::DeleteTask {
                    column_id: DONE.to_string(),
                    task_id: ids[0].clone(),
                },
            )
            .unwrap()
    );
    assert!(
        !translator
            .dispatch(
                &store,
                Command::MoveTask {
                    from_column_id: TODO.to_string(),
                    to_column_id: TODO.to_string(),
                    task_id: ids[1].clone(),
                },
            )
            .unwrap()
    );
    assert_eq!(titles(&store.snapshot(), TODO), vec!["B", "C"]);
    assert!(store.snapshot().column(DONE).unwrap().tasks.is_empty());
}
