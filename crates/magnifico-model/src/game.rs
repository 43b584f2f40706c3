//! The game snapshot shared with every participant.

use std::collections::BTreeMap;

use magnifico_protocol::PlayerId;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{Board, Dice, PersonalBoard};

/// The full state of one session, as seen by the players.
///
/// The room owns the only mutable copy; participants receive clones.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
    pub board: Board,
    pub dice: Dice,
    /// Seating order fixed at onboarding.
    pub order: Vec<PlayerId>,
    pub boards: BTreeMap<PlayerId, PersonalBoard>,
    pub round: u32,
    pub sub_round: u32,
}

impl Game {
    /// The personal board of one player.
    pub fn board_of(&self, player: &PlayerId) -> Option<&PersonalBoard> {
        self.boards.get(player)
    }

    /// The personal board of one player, mutably.
    pub fn board_of_mut(&mut self, player: &PlayerId) -> Option<&mut PersonalBoard> {
        self.boards.get_mut(player)
    }

    /// Rolls the dice and refreshes every player's family members.
    pub fn roll_dice(&mut self, rng: &mut impl Rng) {
        self.dice = Dice::roll(rng);
        for board in self.boards.values_mut() {
            board.refresh_family(&self.dice);
        }
    }
}
