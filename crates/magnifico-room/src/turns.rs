//! The round × sub-round × player iteration.

/// One turn: who plays, and in which round and sub-round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct TurnSlot {
    /// 1-based.
    pub round: u32,
    /// 1-based.
    pub sub_round: u32,
    /// Seat index into the turn order, 0-based.
    pub player_index: usize,
}

impl TurnSlot {
    /// Returns `true` for the first turn of a sub-round, when the board is
    /// dealt and the dice rolled.
    pub fn opens_sub_round(&self) -> bool {
        self.player_index == 0
    }
}

/// Where the scheduler stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TurnPhase {
    /// Nothing handed out yet.
    NotStarted,
    /// Waiting for the slot's player to end the turn or time out.
    AwaitingMove(TurnSlot),
    /// Every slot has been visited.
    SessionComplete,
}

/// Hands out every (round, sub-round, player) slot exactly once, in
/// lexicographic order.
#[derive(Debug, Clone)]
pub struct TurnScheduler {
    rounds: u32,
    sub_rounds: u32,
    players: usize,
    phase: TurnPhase,
}

impl TurnScheduler {
    pub fn new(rounds: u32, sub_rounds: u32, players: usize) -> Self {
        Self {
            rounds,
            sub_rounds,
            players,
            phase: TurnPhase::NotStarted,
        }
    }

    /// Total number of slots in the session.
    pub fn total_turns(&self) -> usize {
        self.rounds as usize * self.sub_rounds as usize * self.players
    }

    fn first(&self) -> Option<TurnSlot> {
        (self.total_turns() > 0).then_some(TurnSlot {
            round: 1,
            sub_round: 1,
            player_index: 0,
        })
    }

    fn after(&self, slot: TurnSlot) -> Option<TurnSlot> {
        if slot.player_index + 1 < self.players {
            return Some(TurnSlot {
                player_index: slot.player_index + 1,
                ..slot
            });
        }
        if slot.sub_round < self.sub_rounds {
            return Some(TurnSlot {
                sub_round: slot.sub_round + 1,
                player_index: 0,
                ..slot
            });
        }
        if slot.round < self.rounds {
            return Some(TurnSlot {
                round: slot.round + 1,
                sub_round: 1,
                player_index: 0,
            });
        }
        None
    }
}

impl Iterator for TurnScheduler {
    type Item = TurnSlot;

    /// Moves to the next slot, or to `SessionComplete` after the last one.
    fn next(&mut self) -> Option<TurnSlot> {
        let next = match self.phase {
            TurnPhase::NotStarted => self.first(),
            TurnPhase::AwaitingMove(slot) => self.after(slot),
            TurnPhase::SessionComplete => None,
        };
        self.phase = match next {
            Some(slot) => TurnPhase::AwaitingMove(slot),
            None => TurnPhase::SessionComplete,
        };
        next
    }
}
