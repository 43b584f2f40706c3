//! Cards, tiles, and the catalog they are loaded from.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{ModelError, Resources};

/// The four development card colors. The color also decides which board
/// column a card is dealt to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CardColor {
    Green,
    Blue,
    Yellow,
    Purple,
}

impl CardColor {
    /// Colors in board column order: column `i` holds `COLUMNS[i]` cards.
    pub const COLUMNS: [Self; 4] = [Self::Green, Self::Blue, Self::Yellow, Self::Purple];

    /// The board column this color is dealt to.
    pub fn column(self) -> usize {
        match self {
            Self::Green => 0,
            Self::Blue => 1,
            Self::Yellow => 2,
            Self::Purple => 3,
        }
    }
}

impl fmt::Display for CardColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Green => "green",
            Self::Blue => "blue",
            Self::Yellow => "yellow",
            Self::Purple => "purple",
        };
        f.write_str(name)
    }
}

/// A development card. Effects belong to the rule engine and are not
/// modelled here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DevelopmentCard {
    pub id: u32,
    pub name: String,
    /// The round (era) the card belongs to, starting at 1.
    pub round: u32,
    pub color: CardColor,
    #[serde(default)]
    pub cost: Resources,
}

/// A leader card. Its name is its identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderCard {
    pub name: String,
    #[serde(default)]
    pub requirement: Resources,
}

/// A personal board tile, granting harvest and production bonuses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonalTile {
    pub id: u32,
    #[serde(default)]
    pub harvest_bonus: Resources,
    #[serde(default)]
    pub production_bonus: Resources,
}

/// Every card and tile a game draws from.
///
/// Built once by the caller and handed to each room; rooms never mutate
/// it, they copy what they need into their own decks and pools.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Catalog {
    pub development_cards: Vec<DevelopmentCard>,
    pub leader_cards: Vec<LeaderCard>,
    pub personal_tiles: Vec<PersonalTile>,
}

impl Catalog {
    /// Parses a catalog from JSON.
    pub fn from_json(json: &str) -> Result<Self, ModelError> {
        serde_json::from_str(json).map_err(ModelError::Catalog)
    }
}
