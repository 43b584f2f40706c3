//! The shared board and the dice rolled at the start of every sub-round.

use magnifico_protocol::FamilyMemberColor;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{DevelopmentCard, ModelError};

/// Number of card columns (towers) on the shared board.
pub const BOARD_COLUMNS: usize = 4;

/// Number of cards dealt to each column per sub-round.
pub const CARDS_PER_COLUMN: usize = 4;

/// The shared board: four columns of face-up development cards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    columns: [Vec<DevelopmentCard>; BOARD_COLUMNS],
}

impl Board {
    /// Replaces the cards in one column.
    pub fn set_column(
        &mut self,
        index: usize,
        cards: Vec<DevelopmentCard>,
    ) -> Result<(), ModelError> {
        let column = self
            .columns
            .get_mut(index)
            .ok_or(ModelError::NoSuchColumn(index))?;
        *column = cards;
        Ok(())
    }

    /// Returns the cards currently in one column.
    pub fn column(&self, index: usize) -> Option<&[DevelopmentCard]> {
        self.columns.get(index).map(Vec::as_slice)
    }
}

/// The three colored dice. Each family member except the neutral one takes
/// its strength from the die of its color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dice {
    pub black: u32,
    pub white: u32,
    pub orange: u32,
}

impl Default for Dice {
    fn default() -> Self {
        Self { black: 1, white: 1, orange: 1 }
    }
}

impl Dice {
    /// Rolls all three dice.
    pub fn roll(rng: &mut impl Rng) -> Self {
        Self {
            black: rng.random_range(1..=6),
            white: rng.random_range(1..=6),
            orange: rng.random_range(1..=6),
        }
    }

    /// The base strength of a family member under this roll.
    pub fn value_for(&self, member: FamilyMemberColor) -> u32 {
        match member {
            FamilyMemberColor::Black => self.black,
            FamilyMemberColor::White => self.white,
            FamilyMemberColor::Orange => self.orange,
            FamilyMemberColor::Neutral => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::CardColor;

    fn card(id: u32) -> DevelopmentCard {
        DevelopmentCard {
            id,
            name: format!("card-{id}"),
            round: 1,
            color: CardColor::Green,
            cost: Default::default(),
        }
    }

    #[test]
    fn test_set_column_replaces_cards() {
        let mut board = Board::default();
        board.set_column(0, vec![card(1), card(2)]).unwrap();
        board.set_column(0, vec![card(3)]).unwrap();
        assert_eq!(board.column(0).unwrap(), &[card(3)]);
        assert!(board.column(1).unwrap().is_empty());
    }

    #[test]
    fn test_set_column_out_of_range() {
        let mut board = Board::default();
        let result = board.set_column(BOARD_COLUMNS, vec![card(1)]);
        assert!(matches!(result, Err(ModelError::NoSuchColumn(4))));
    }

    #[test]
    fn test_dice_roll_within_faces() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..100 {
            let dice = Dice::roll(&mut rng);
            for v in [dice.black, dice.white, dice.orange] {
                assert!((1..=6).contains(&v), "die out of range: {v}");
            }
        }
    }

    #[test]
    fn test_neutral_member_is_always_zero() {
        let dice = Dice { black: 6, white: 5, orange: 4 };
        assert_eq!(dice.value_for(FamilyMemberColor::Neutral), 0);
        assert_eq!(dice.value_for(FamilyMemberColor::White), 5);
    }
}
