//! Resource and point ledgers.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Every kind of resource or point tracked on a personal board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceKind {
    Coin,
    Wood,
    Stone,
    Servant,
    MilitaryPoint,
    FaithPoint,
    VictoryPoint,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Coin => "coin",
            Self::Wood => "wood",
            Self::Stone => "stone",
            Self::Servant => "servant",
            Self::MilitaryPoint => "military point",
            Self::FaithPoint => "faith point",
            Self::VictoryPoint => "victory point",
        };
        f.write_str(name)
    }
}

/// A bundle of resources and points.
///
/// Used both as a player's ledger and as a cost or bonus attached to
/// cards and tiles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Resources {
    pub coins: u32,
    pub wood: u32,
    pub stone: u32,
    pub servants: u32,
    pub military_points: u32,
    pub faith_points: u32,
    pub victory_points: u32,
}

impl Resources {
    /// The bundle every player starts with before the seat bonus.
    pub fn starting_bundle() -> Self {
        Self {
            coins: 5,
            wood: 2,
            stone: 2,
            servants: 3,
            ..Self::default()
        }
    }

    /// Returns the amount held of one kind.
    pub fn get(&self, kind: ResourceKind) -> u32 {
        match kind {
            ResourceKind::Coin => self.coins,
            ResourceKind::Wood => self.wood,
            ResourceKind::Stone => self.stone,
            ResourceKind::Servant => self.servants,
            ResourceKind::MilitaryPoint => self.military_points,
            ResourceKind::FaithPoint => self.faith_points,
            ResourceKind::VictoryPoint => self.victory_points,
        }
    }

    fn slot_mut(&mut self, kind: ResourceKind) -> &mut u32 {
        match kind {
            ResourceKind::Coin => &mut self.coins,
            ResourceKind::Wood => &mut self.wood,
            ResourceKind::Stone => &mut self.stone,
            ResourceKind::Servant => &mut self.servants,
            ResourceKind::MilitaryPoint => &mut self.military_points,
            ResourceKind::FaithPoint => &mut self.faith_points,
            ResourceKind::VictoryPoint => &mut self.victory_points,
        }
    }

    /// Adds `amount` of one kind.
    pub fn increase(&mut self, kind: ResourceKind, amount: u32) {
        let slot = self.slot_mut(kind);
        *slot = slot.saturating_add(amount);
    }

    /// Removes `amount` of one kind.
    ///
    /// Returns `false` (and leaves the ledger untouched) if the player
    /// does not hold enough.
    pub fn decrease(&mut self, kind: ResourceKind, amount: u32) -> bool {
        let slot = self.slot_mut(kind);
        match slot.checked_sub(amount) {
            Some(rest) => {
                *slot = rest;
                true
            }
            None => false,
        }
    }

    /// Adds every field of `other` to this bundle.
    pub fn add(&mut self, other: &Resources) {
        self.coins += other.coins;
        self.wood += other.wood;
        self.stone += other.stone;
        self.servants += other.servants;
        self.military_points += other.military_points;
        self.faith_points += other.faith_points;
        self.victory_points += other.victory_points;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starting_bundle() {
        let r = Resources::starting_bundle();
        assert_eq!(r.get(ResourceKind::Coin), 5);
        assert_eq!(r.get(ResourceKind::Wood), 2);
        assert_eq!(r.get(ResourceKind::Stone), 2);
        assert_eq!(r.get(ResourceKind::Servant), 3);
        assert_eq!(r.get(ResourceKind::VictoryPoint), 0);
    }

    #[test]
    fn test_decrease_refuses_overdraft() {
        let mut r = Resources::starting_bundle();
        assert!(!r.decrease(ResourceKind::Servant, 4));
        assert_eq!(r.servants, 3);
        assert!(r.decrease(ResourceKind::Servant, 3));
        assert_eq!(r.servants, 0);
    }

    #[test]
    fn test_add_bundles() {
        let mut r = Resources::default();
        r.add(&Resources { wood: 1, faith_points: 2, ..Resources::default() });
        r.increase(ResourceKind::Wood, 1);
        assert_eq!(r.wood, 2);
        assert_eq!(r.faith_points, 2);
    }

    #[test]
    fn test_missing_fields_deserialize_as_zero() {
        let r: Resources = serde_json::from_str(r#"{"coins": 3}"#).unwrap();
        assert_eq!(r, Resources { coins: 3, ..Resources::default() });
    }
}
