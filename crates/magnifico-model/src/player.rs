//! Per-player state: identity color, personal board, family members.

use std::collections::BTreeMap;
use std::fmt;

use magnifico_protocol::FamilyMemberColor;
use serde::{Deserialize, Serialize};

use crate::{Dice, DevelopmentCard, LeaderCard, PersonalTile, Resources};

/// The identity color assigned to each seat. Its size bounds the room
/// capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayerColor {
    Green,
    Blue,
    Yellow,
    Red,
}

impl PlayerColor {
    /// All colors, in the order they are handed out.
    pub const ALL: [Self; 4] = [Self::Green, Self::Blue, Self::Yellow, Self::Red];
}

impl fmt::Display for PlayerColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Green => "green",
            Self::Blue => "blue",
            Self::Yellow => "yellow",
            Self::Red => "red",
        };
        f.write_str(name)
    }
}

/// Strength of each family member for the current sub-round.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FamilyMembers {
    values: BTreeMap<FamilyMemberColor, u32>,
}

impl FamilyMembers {
    /// Family members whose strength comes from `dice`.
    pub fn from_dice(dice: &Dice) -> Self {
        let values = FamilyMemberColor::ALL
            .iter()
            .map(|member| (*member, dice.value_for(*member)))
            .collect();
        Self { values }
    }

    /// The strength of one family member.
    pub fn value(&self, member: FamilyMemberColor) -> u32 {
        self.values.get(&member).copied().unwrap_or(0)
    }
}

/// Everything one player owns during a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonalBoard {
    pub color: PlayerColor,
    pub resources: Resources,
    /// Chosen during the tile draft. `None` if the player never answered.
    pub tile: Option<PersonalTile>,
    /// Claimed during the leader draft, in pick order.
    pub leader_cards: Vec<LeaderCard>,
    pub active_leaders: Vec<LeaderCard>,
    pub development_cards: Vec<DevelopmentCard>,
    pub family: FamilyMembers,
    /// Family members already placed this sub-round.
    pub members_used: Vec<FamilyMemberColor>,
}

impl PersonalBoard {
    /// A fresh board with the given color and starting resources.
    pub fn new(color: PlayerColor, resources: Resources) -> Self {
        Self {
            color,
            resources,
            tile: None,
            leader_cards: Vec::new(),
            active_leaders: Vec::new(),
            development_cards: Vec::new(),
            family: FamilyMembers::default(),
            members_used: Vec::new(),
        }
    }

    /// Refreshes family member strengths from a new roll and makes every
    /// member available again.
    pub fn refresh_family(&mut self, dice: &Dice) {
        self.family = FamilyMembers::from_dice(dice);
        self.members_used.clear();
    }

    /// Returns `true` if `member` was already placed this sub-round.
    pub fn has_used(&self, member: FamilyMemberColor) -> bool {
        self.members_used.contains(&member)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_family_from_dice() {
        let dice = Dice { black: 3, white: 4, orange: 6 };
        let family = FamilyMembers::from_dice(&dice);
        assert_eq!(family.value(FamilyMemberColor::Black), 3);
        assert_eq!(family.value(FamilyMemberColor::White), 4);
        assert_eq!(family.value(FamilyMemberColor::Orange), 6);
        assert_eq!(family.value(FamilyMemberColor::Neutral), 0);
    }

    #[test]
    fn test_refresh_family_clears_used_members() {
        let mut board = PersonalBoard::new(PlayerColor::Red, Resources::default());
        board.members_used.push(FamilyMemberColor::Black);
        assert!(board.has_used(FamilyMemberColor::Black));

        board.refresh_family(&Dice { black: 2, white: 2, orange: 2 });

        assert!(!board.has_used(FamilyMemberColor::Black));
        assert_eq!(board.family.value(FamilyMemberColor::Orange), 2);
    }
}
