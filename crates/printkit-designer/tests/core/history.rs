use printkit_core::{Point, ViewId};
use printkit_designer::{
    DesignSession, HistoryEntry, HistoryStack, TextSpec, TransformPatch, ViewState,
    MAX_HISTORY_DEPTH,
};

fn entry(view: ViewId) -> HistoryEntry {
    HistoryEntry::new(ViewState::new(view), ViewState::new(view))
}

#[test]
fn test_new_stack_has_nothing_to_undo() {
    let stack = HistoryStack::new();
    assert!(!stack.can_undo());
    assert!(!stack.can_redo());
    assert_eq!(stack.undo_depth(), 0);
    assert_eq!(stack.redo_depth(), 0);
}

#[test]
fn test_record_then_undo_then_redo() {
    let mut stack = HistoryStack::new();
    stack.record(entry(ViewId::Front));
    assert!(stack.can_undo());
    assert!(!stack.can_redo());

    stack.undo().unwrap();
    assert!(!stack.can_undo());
    assert!(stack.can_redo());

    stack.redo().unwrap();
    assert!(stack.can_undo());
    assert!(!stack.can_redo());
}

#[test]
fn test_undo_on_empty_stack_is_nonfatal() {
    let mut stack = HistoryStack::new();
    let err = stack.undo().unwrap_err();
    assert!(err.is_history_noop());
    let err = stack.redo().unwrap_err();
    assert!(err.is_history_noop());
}

#[test]
fn test_new_record_clears_redo() {
    let mut stack = HistoryStack::new();
    stack.record(entry(ViewId::Front));
    stack.record(entry(ViewId::Front));
    stack.undo().unwrap();
    assert_eq!(stack.redo_depth(), 1);

    stack.record(entry(ViewId::Front));
    assert_eq!(stack.redo_depth(), 0);
}

#[test]
fn test_depth_cap_drops_oldest() {
    let mut stack = HistoryStack::new();
    for _ in 0..(MAX_HISTORY_DEPTH + 20) {
        stack.record(entry(ViewId::Front));
    }
    assert_eq!(stack.undo_depth(), MAX_HISTORY_DEPTH);
}

#[test]
fn test_undo_inverse_law_over_session() {
    let mut session = DesignSession::with_defaults("tshirt");
    let initial: Vec<_> = session.objects(ViewId::Front).to_vec();

    let id = session
        .create_text(ViewId::Front, &TextSpec::new("HELLO"))
        .unwrap();
    session
        .update_transform(ViewId::Front, id, &TransformPatch::move_to(Point::new(9.0, 9.0)))
        .unwrap();
    session.remove(ViewId::Front, id).unwrap();

    let after: Vec<_> = session.objects(ViewId::Front).to_vec();

    for _ in 0..3 {
        session.undo().unwrap();
    }
    assert_eq!(session.objects(ViewId::Front), initial.as_slice());

    for _ in 0..3 {
        session.redo().unwrap();
    }
    assert_eq!(session.objects(ViewId::Front), after.as_slice());
}

#[test]
fn test_history_is_isolated_per_view() {
    let mut session = DesignSession::with_defaults("tshirt");
    session
        .create_text(ViewId::Front, &TextSpec::new("front text"))
        .unwrap();

    session.set_active_view(ViewId::Back);
    assert!(!session.can_undo());
    let err = session.undo().unwrap_err();
    assert!(err.is_history_noop());

    // The front view kept its object and its undoable entry.
    assert_eq!(session.objects(ViewId::Front).len(), 1);
    assert_eq!(session.undo_depth(ViewId::Front), 1);

    session.set_active_view(ViewId::Front);
    assert!(session.can_undo());
    session.undo().unwrap();
    assert!(session.objects(ViewId::Front).is_empty());
}

#[test]
fn test_switching_views_preserves_object_sets() {
    let mut session = DesignSession::with_defaults("tshirt");
    session
        .create_text(ViewId::Front, &TextSpec::new("front"))
        .unwrap();
    session.set_active_view(ViewId::Back);
    session
        .create_text(ViewId::Back, &TextSpec::new("back"))
        .unwrap();
    session.set_active_view(ViewId::Front);
    session.set_active_view(ViewId::Back);

    assert_eq!(session.objects(ViewId::Front).len(), 1);
    assert_eq!(session.objects(ViewId::Back).len(), 1);
}

#[test]
fn test_can_undo_reflects_stack_synchronously() {
    let mut session = DesignSession::with_defaults("tshirt");
    assert!(!session.can_undo());
    session
        .create_text(ViewId::Front, &TextSpec::new("x"))
        .unwrap();
    assert!(session.can_undo());
    session.undo().unwrap();
    assert!(!session.can_undo());
    assert!(session.can_redo());
}
