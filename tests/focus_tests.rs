// Host-side tests for the exclusive focus state machine.

#![allow(dead_code)]
mod constants {
    include!("../src/constants.rs");
}
mod focus {
    include!("../src/focus.rs");
}

use constants::FOCUS_TRANSITION_SEC;
use focus::{FocusAction, FocusTracker};

type Key = (u64, usize);

const A: Key = (1, 0);
const B: Key = (1, 3);

#[test]
fn toggle_enters_then_exits() {
    let mut tracker = FocusTracker::new();
    assert_eq!(tracker.toggle(A), FocusAction::Enter(A));
    assert_eq!(tracker.focused(), Some(A));
    assert_eq!(tracker.toggle(A), FocusAction::Exit(A));
    assert_eq!(tracker.focused(), None);
}

#[test]
fn toggling_another_cell_replaces() {
    let mut tracker = FocusTracker::new();
    tracker.toggle(A);
    assert_eq!(
        tracker.toggle(B),
        FocusAction::Replace { exit: A, enter: B }
    );
    assert_eq!(tracker.focused(), Some(B));
    // Both the new focus and the exiting cell are protected.
    let pinned: Vec<Key> = tracker.pinned().collect();
    assert!(pinned.contains(&A));
    assert!(pinned.contains(&B));
}

#[test]
fn escape_exits_only_when_focused() {
    let mut tracker: FocusTracker<Key> = FocusTracker::new();
    assert_eq!(tracker.escape(), None);
    tracker.toggle(A);
    assert_eq!(tracker.escape(), Some(A));
    assert_eq!(tracker.focused(), None);
    // A second escape is a no-op even while A is still exiting.
    assert_eq!(tracker.escape(), None);
}

#[test]
fn exiting_cell_stays_pinned_for_the_full_transition() {
    let mut tracker = FocusTracker::new();
    tracker.toggle(A);
    tracker.toggle(A);

    let step = FOCUS_TRANSITION_SEC / 4.0;
    for _ in 0..3 {
        assert!(tracker.step(step).is_empty());
        assert!(tracker.pinned().any(|k| k == A));
    }
    // Final step retires the transition and reports the key once.
    assert_eq!(tracker.step(step + 1e-3), vec![A]);
    assert_eq!(tracker.pinned().count(), 0);
    assert!(tracker.step(step).is_empty());
}

#[test]
fn refocusing_an_exiting_cell_cancels_the_exit() {
    let mut tracker = FocusTracker::new();
    tracker.toggle(A);
    tracker.toggle(A);
    tracker.step(FOCUS_TRANSITION_SEC / 2.0);

    // Click it again mid-exit: the pending exit must not retire the slot
    // out from under the restored focus.
    tracker.toggle(A);
    assert_eq!(tracker.focused(), Some(A));
    assert!(tracker.step(FOCUS_TRANSITION_SEC).is_empty());
    assert!(tracker.pinned().any(|k| k == A));
}

#[test]
fn replacing_back_to_an_exiting_cell_cancels_its_exit() {
    let mut tracker = FocusTracker::new();
    tracker.toggle(A);
    // A → B puts A into its exit transition while B holds focus.
    tracker.toggle(B);
    tracker.step(FOCUS_TRANSITION_SEC / 2.0);

    // B → A: A is still mid-exit; the replace must cancel that exit so the
    // stale countdown cannot release the newly focused slot.
    assert_eq!(
        tracker.toggle(A),
        FocusAction::Replace { exit: B, enter: A }
    );
    assert_eq!(tracker.focused(), Some(A));

    // Only B's exit retires; A stays pinned as the focused cell.
    assert_eq!(tracker.step(FOCUS_TRANSITION_SEC + 1e-3), vec![B]);
    assert!(tracker.pinned().any(|k| k == A));
    assert!(!tracker.pinned().any(|k| k == B));
}
