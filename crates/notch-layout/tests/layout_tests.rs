use notch_layout::*;
use notch_types::{default_notches, Notch};

// ── Helpers ──────────────────────────────────────────────────────────────

fn seeded() -> NotchLayout {
    NotchLayout::initialize(&default_notches())
}

// ── Commit isolation ─────────────────────────────────────────────────────

#[test]
fn edits_do_not_touch_committed_until_applied() {
    let mut layout = seeded();
    let before = layout.committed().to_vec();

    layout.update_draft_end(0, "0.90").unwrap();
    layout.update_draft_end(3, "3.3").unwrap();
    layout.update_draft_end(9, "7.6").unwrap();

    assert_eq!(layout.committed(), before.as_slice());
    assert_eq!(layout.draft()[0].end, 0.90);
    assert_eq!(layout.state(), LayoutState::Dirty);

    let committed = layout.apply_changes().unwrap().to_vec();
    assert_eq!(committed[0].end, 0.90);
    assert_eq!(committed[3].end, 3.3);
    assert_eq!(committed[9].end, 7.6);
    assert_eq!(layout.state(), LayoutState::Clean);
}

#[test]
fn edits_only_change_end() {
    let mut layout = seeded();
    layout.update_draft_end(4, "4.5").unwrap();

    for (draft, committed) in layout.draft().iter().zip(layout.committed()) {
        assert_eq!(draft.name, committed.name);
        assert_eq!(draft.start, committed.start);
    }
    assert_eq!(layout.draft().len(), layout.committed().len());
}

// ── Cancel ───────────────────────────────────────────────────────────────

#[test]
fn cancel_restores_draft_and_clears_dirty() {
    let mut layout = seeded();
    layout.update_draft_end(1, "2.0").unwrap();
    layout.update_draft_end(2, "junk").unwrap();

    assert!(layout.cancel_changes());
    assert_eq!(layout.draft(), layout.committed());
    assert!(!layout.is_dirty());
    assert_eq!(layout.committed(), default_notches().as_slice());
}

#[test]
fn cancel_when_clean_is_noop() {
    let mut layout = seeded();
    assert!(!layout.cancel_changes());
    assert_eq!(layout.state(), LayoutState::Clean);
}

// ── Apply ────────────────────────────────────────────────────────────────

#[test]
fn apply_is_idempotent() {
    let mut layout = seeded();
    layout.update_draft_end(0, "0.9").unwrap();

    let first = layout.apply_changes().map(|c| c.to_vec());
    assert!(first.is_some());
    let second = layout.apply_changes();
    assert!(second.is_none(), "second apply must not request a rebuild");
    assert_eq!(Some(layout.committed().to_vec()), first);
}

#[test]
fn edit_restoring_committed_value_still_marks_dirty() {
    let mut layout = seeded();
    layout.update_draft_end(0, "0.86").unwrap();
    assert!(layout.is_dirty());
    assert!(layout.apply_changes().is_some());
}

#[test]
fn apply_after_cancel_has_nothing_to_commit() {
    let mut layout = seeded();
    layout.update_draft_end(0, "1.0").unwrap();
    layout.cancel_changes();
    assert!(layout.apply_changes().is_none());
    assert_eq!(layout.committed()[0].end, 0.86);
}

// ── Input coercion ───────────────────────────────────────────────────────

#[test]
fn non_numeric_input_becomes_zero_and_marks_dirty() {
    let mut layout = seeded();
    let stored = layout.update_draft_end(0, "abc").unwrap();
    assert_eq!(stored, 0.0);
    assert_eq!(layout.draft()[0].end, 0.0);
    assert!(layout.is_dirty());
}

#[test]
fn empty_layout_applies_to_empty() {
    let mut layout = NotchLayout::initialize(&[]);
    assert!(layout.is_empty());
    assert!(layout.update_draft_end(0, "1").is_err());
    assert!(layout.apply_changes().is_none());
    assert_eq!(layout.committed(), &[] as &[Notch]);
}
