//! One-shot wait for a fixed set of participants to each decide once.
//!
//! The barrier itself never blocks: the room actor records signals as
//! commands arrive and checks [`DecisionBarrier::is_complete`] between
//! them. A fresh barrier is built for every negotiation round.

use std::collections::{BTreeMap, BTreeSet};

use magnifico_protocol::PlayerId;

/// Outcome of recording one signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    /// The first decision from an expected participant.
    Accepted,
    /// The participant already decided in this round.
    Duplicate,
    /// The participant is not part of this round.
    Unexpected,
}

/// Collects exactly one decision from each expected participant.
///
/// Completes when every expected participant has either signalled or
/// been forfeited.
#[derive(Debug, Clone)]
pub struct DecisionBarrier<T> {
    waiting: BTreeSet<PlayerId>,
    decisions: BTreeMap<PlayerId, T>,
    forfeited: BTreeSet<PlayerId>,
}

impl<T> DecisionBarrier<T> {
    pub fn new(expected: impl IntoIterator<Item = PlayerId>) -> Self {
        Self {
            waiting: expected.into_iter().collect(),
            decisions: BTreeMap::new(),
            forfeited: BTreeSet::new(),
        }
    }

    /// Records `player`'s decision.
    pub fn signal(&mut self, player: &PlayerId, value: T) -> Signal {
        if self.waiting.remove(player) {
            self.decisions.insert(player.clone(), value);
            Signal::Accepted
        } else if self.decisions.contains_key(player) {
            Signal::Duplicate
        } else {
            Signal::Unexpected
        }
    }

    /// Stops waiting for `player`. Returns `false` if they were not
    /// outstanding.
    pub fn forfeit(&mut self, player: &PlayerId) -> bool {
        if self.waiting.remove(player) {
            self.forfeited.insert(player.clone());
            true
        } else {
            false
        }
    }

    pub fn is_complete(&self) -> bool {
        self.waiting.is_empty()
    }

    /// Participants who have neither decided nor forfeited.
    pub fn outstanding(&self) -> impl Iterator<Item = &PlayerId> {
        self.waiting.iter()
    }

    pub fn is_waiting_for(&self, player: &PlayerId) -> bool {
        self.waiting.contains(player)
    }

    pub fn decision(&self, player: &PlayerId) -> Option<&T> {
        self.decisions.get(player)
    }

    pub fn forfeited(&self) -> impl Iterator<Item = &PlayerId> {
        self.forfeited.iter()
    }

    pub fn into_decisions(self) -> BTreeMap<PlayerId, T> {
        self.decisions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pid(name: &str) -> PlayerId {
        PlayerId::from(name)
    }

    #[test]
    fn test_completes_after_every_expected_signal() {
        let mut barrier = DecisionBarrier::new([pid("a"), pid("b")]);
        assert!(!barrier.is_complete());

        assert_eq!(barrier.signal(&pid("a"), 1), Signal::Accepted);
        assert!(!barrier.is_complete());
        assert_eq!(barrier.signal(&pid("b"), 2), Signal::Accepted);

        assert!(barrier.is_complete());
        let decisions = barrier.into_decisions();
        assert_eq!(decisions[&pid("a")], 1);
        assert_eq!(decisions[&pid("b")], 2);
    }

    #[test]
    fn test_second_signal_does_not_overwrite() {
        let mut barrier = DecisionBarrier::new([pid("a"), pid("b")]);
        barrier.signal(&pid("a"), 1);

        assert_eq!(barrier.signal(&pid("a"), 9), Signal::Duplicate);
        assert_eq!(barrier.decision(&pid("a")), Some(&1));
        assert!(!barrier.is_complete());
    }

    #[test]
    fn test_unexpected_signal_ignored() {
        let mut barrier = DecisionBarrier::new([pid("a")]);
        assert_eq!(barrier.signal(&pid("z"), 1), Signal::Unexpected);
        assert!(!barrier.is_complete());
    }

    #[test]
    fn test_forfeit_removes_from_expected_set() {
        let mut barrier = DecisionBarrier::<u32>::new([pid("a"), pid("b")]);
        barrier.signal(&pid("a"), 3);

        assert!(barrier.forfeit(&pid("b")));
        assert!(!barrier.forfeit(&pid("b")));
        assert!(!barrier.forfeit(&pid("a")));

        assert!(barrier.is_complete());
        assert_eq!(barrier.forfeited().collect::<Vec<_>>(), vec![&pid("b")]);
        assert_eq!(barrier.signal(&pid("b"), 4), Signal::Unexpected);
    }

    #[test]
    fn test_empty_barrier_is_complete() {
        let barrier = DecisionBarrier::<u32>::new([]);
        assert!(barrier.is_complete());
        assert_eq!(barrier.outstanding().count(), 0);
    }
}
