// Exclusive single-item focus state.
//
// Pure state machine: it decides what should happen on a toggle and tracks
// exit transitions; all DOM and scene side effects live with the caller.
// At most one element is ever in the focused overlay state.

use crate::constants::FOCUS_TRANSITION_SEC;

/// What the caller must perform in response to a toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusAction<K> {
    Enter(K),
    Exit(K),
    /// The previously focused element fully exits before the new one
    /// enters; both effects belong to the same frame.
    Replace {
        exit: K,
        enter: K,
    },
}

/// Tracks the focused element and elements still playing their exit
/// transition. Exiting elements stay pinned (reported by
/// [`pinned`](Self::pinned)) until [`step`](Self::step) retires them, so
/// virtualization cannot reassign their slot mid-transition.
#[derive(Debug, Clone, Default)]
pub struct FocusTracker<K: Copy + PartialEq> {
    focused: Option<K>,
    exiting: Vec<(K, f32)>,
}

impl<K: Copy + PartialEq> FocusTracker<K> {
    pub fn new() -> Self {
        Self {
            focused: None,
            exiting: Vec::new(),
        }
    }

    pub fn focused(&self) -> Option<K> {
        self.focused
    }

    /// Click semantics: re-toggling the focused element exits, toggling
    /// another element replaces.
    pub fn toggle(&mut self, key: K) -> FocusAction<K> {
        match self.focused {
            Some(current) if current == key => {
                self.begin_exit(current);
                FocusAction::Exit(current)
            }
            Some(current) => {
                self.begin_exit(current);
                // The incoming element may itself be mid-exit; cancel that
                // so its slot is not released from under the new focus.
                self.exiting.retain(|(k, _)| *k != key);
                self.focused = Some(key);
                FocusAction::Replace {
                    exit: current,
                    enter: key,
                }
            }
            None => {
                // Re-entering a cell that is mid-exit cancels the exit, so
                // its slot is not released from under the new focus.
                self.exiting.retain(|(k, _)| *k != key);
                self.focused = Some(key);
                FocusAction::Enter(key)
            }
        }
    }

    /// Escape key: exit the focused element, if any.
    pub fn escape(&mut self) -> Option<K> {
        let current = self.focused?;
        self.begin_exit(current);
        Some(current)
    }

    fn begin_exit(&mut self, key: K) {
        self.focused = None;
        if !self.exiting.iter().any(|(k, _)| *k == key) {
            self.exiting.push((key, FOCUS_TRANSITION_SEC));
        }
    }

    /// Advance exit transitions; returns the keys whose transition just
    /// completed (their slot may be released back to the pool).
    pub fn step(&mut self, dt: f32) -> Vec<K> {
        let mut finished = Vec::new();
        for entry in &mut self.exiting {
            entry.1 -= dt;
            if entry.1 <= 0.0 {
                finished.push(entry.0);
            }
        }
        self.exiting.retain(|(_, remaining)| *remaining > 0.0);
        finished
    }

    /// Keys that must not be reassigned: the focused element plus any
    /// element still exiting.
    pub fn pinned(&self) -> impl Iterator<Item = K> + '_ {
        self.focused
            .into_iter()
            .chain(self.exiting.iter().map(|(k, _)| *k))
    }
}
