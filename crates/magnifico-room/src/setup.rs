//! Deck construction and board dealing.

use magnifico_model::{
    BOARD_COLUMNS, Board, CARDS_PER_COLUMN, CardColor, DevelopmentCard,
};
use rand::Rng;
use rand::seq::SliceRandom;

use crate::SetupError;

/// Four independently shuffled development decks, one per card color.
///
/// Built once when a session starts. Dealing never consumes cards: every
/// (round, sub-round) addresses its own disjoint block of each deck.
#[derive(Debug, Clone, Default)]
pub struct DeckSet {
    decks: [Vec<DevelopmentCard>; BOARD_COLUMNS],
}

impl DeckSet {
    /// Groups `cards` by color and shuffles each deck.
    pub fn build(cards: impl IntoIterator<Item = DevelopmentCard>, rng: &mut impl Rng) -> Self {
        let mut decks: [Vec<DevelopmentCard>; BOARD_COLUMNS] = Default::default();
        for card in cards {
            decks[card.color.column()].push(card);
        }
        for deck in &mut decks {
            deck.shuffle(rng);
        }
        Self { decks }
    }

    /// The whole shuffled deck of one color.
    pub fn deck(&self, color: CardColor) -> &[DevelopmentCard] {
        &self.decks[color.column()]
    }

    /// The block of `color` cards dealt for (`round`, `sub_round`).
    ///
    /// Sub-round `k` (1-based) takes offsets `4(k-1)..4k` of the deck
    /// filtered to `round`.
    pub fn slice(
        &self,
        color: CardColor,
        round: u32,
        sub_round: u32,
    ) -> Result<Vec<DevelopmentCard>, SetupError> {
        let in_round: Vec<&DevelopmentCard> = self
            .deck(color)
            .iter()
            .filter(|card| card.round == round)
            .collect();
        let insufficient = || SetupError::InsufficientCards {
            color,
            round,
            sub_round,
            available: in_round.len(),
            needed: CARDS_PER_COLUMN * sub_round.max(1) as usize,
        };

        let block = sub_round.checked_sub(1).ok_or_else(insufficient)? as usize;
        let start = block * CARDS_PER_COLUMN;
        let end = start + CARDS_PER_COLUMN;
        let cards = in_round.get(start..end).ok_or_else(insufficient)?;
        Ok(cards.iter().map(|card| (*card).clone()).collect())
    }

    /// One block per board column, in column order.
    pub fn slice_for_board(
        &self,
        round: u32,
        sub_round: u32,
    ) -> Result<[Vec<DevelopmentCard>; BOARD_COLUMNS], SetupError> {
        let mut columns: [Vec<DevelopmentCard>; BOARD_COLUMNS] = Default::default();
        for color in CardColor::COLUMNS {
            columns[color.column()] = self.slice(color, round, sub_round)?;
        }
        Ok(columns)
    }

    /// Deals the (`round`, `sub_round`) blocks onto `board`.
    pub fn deal(&self, board: &mut Board, round: u32, sub_round: u32) -> Result<(), SetupError> {
        for (index, cards) in self.slice_for_board(round, sub_round)?.into_iter().enumerate() {
            board.set_column(index, cards)?;
        }
        Ok(())
    }

    /// Checks that every block of a `rounds` × `sub_rounds` session is
    /// available, so a short deck fails before anyone drafts.
    pub fn validate(&self, rounds: u32, sub_rounds: u32) -> Result<(), SetupError> {
        for round in 1..=rounds {
            for sub_round in 1..=sub_rounds {
                self.slice_for_board(round, sub_round)?;
            }
        }
        Ok(())
    }
}
