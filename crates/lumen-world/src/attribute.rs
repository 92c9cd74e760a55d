//! Named character attributes.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::WorldError;

/// An attribute the server can report for any character.
///
/// The wire carries the name as text; [`FromStr`] accepts exactly the
/// names the server uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CharacterAttribute {
    Hitpoints,
    Mana,
    FoodLevel,
    Strength,
    Dexterity,
    Constitution,
    Agility,
    Intelligence,
    Perception,
    Willpower,
    Essence,
    CarryLoad,
    MaxCarryLoad,
}

impl CharacterAttribute {
    pub const ALL: [CharacterAttribute; 13] = [
        Self::Hitpoints,
        Self::Mana,
        Self::FoodLevel,
        Self::Strength,
        Self::Dexterity,
        Self::Constitution,
        Self::Agility,
        Self::Intelligence,
        Self::Perception,
        Self::Willpower,
        Self::Essence,
        Self::CarryLoad,
        Self::MaxCarryLoad,
    ];

    /// The name as the server sends it.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Hitpoints => "hitpoints",
            Self::Mana => "mana",
            Self::FoodLevel => "foodlevel",
            Self::Strength => "strength",
            Self::Dexterity => "dexterity",
            Self::Constitution => "constitution",
            Self::Agility => "agility",
            Self::Intelligence => "intelligence",
            Self::Perception => "perception",
            Self::Willpower => "willpower",
            Self::Essence => "essence",
            Self::CarryLoad => "carryload",
            Self::MaxCarryLoad => "maxcarryload",
        }
    }
}

impl FromStr for CharacterAttribute {
    type Err = WorldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|a| a.name() == s)
            .ok_or_else(|| WorldError::UnknownAttribute(s.to_owned()))
    }
}

impl fmt::Display for CharacterAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Latest known value of each attribute.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attributes(BTreeMap<CharacterAttribute, u16>);

impl Attributes {
    pub fn get(&self, attribute: CharacterAttribute) -> Option<u16> {
        self.0.get(&attribute).copied()
    }

    pub fn set(&mut self, attribute: CharacterAttribute, value: u16) {
        self.0.insert(attribute, value);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
