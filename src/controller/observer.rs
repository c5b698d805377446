//! Change notification.

use super::snapshot::MatchSnapshot;

/// Receives a snapshot after every state-changing controller call.
///
/// Any `FnMut(&MatchSnapshot)` closure is an observer.
pub trait MatchObserver {
    fn on_change(&mut self, snapshot: &MatchSnapshot);
}

impl<F> MatchObserver for F
where
    F: FnMut(&MatchSnapshot),
{
    fn on_change(&mut self, snapshot: &MatchSnapshot) {
        self(snapshot)
    }
}
