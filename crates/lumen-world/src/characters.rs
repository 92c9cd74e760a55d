//! Other characters in view of the player.

use std::collections::BTreeMap;

use lumen_protocol::{CharacterId, Direction, Location, MoveMode};
use serde::{Deserialize, Serialize};

use crate::Attributes;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Character {
    id: CharacterId,
    location: Location,
    direction: Option<Direction>,
    pub attributes: Attributes,
    /// Text from the last look-at on this character.
    look_at: Option<String>,
}

impl Character {
    pub fn new(id: CharacterId, location: Location) -> Self {
        Self {
            id,
            location,
            direction: None,
            attributes: Attributes::default(),
            look_at: None,
        }
    }

    pub fn id(&self) -> CharacterId {
        self.id
    }

    pub fn location(&self) -> Location {
        self.location
    }

    pub fn direction(&self) -> Option<Direction> {
        self.direction
    }

    pub fn set_direction(&mut self, direction: Direction) {
        self.direction = Some(direction);
    }

    /// Applies a server move. `NoMove` only confirms the position.
    pub fn move_to(&mut self, destination: Location, mode: MoveMode) {
        if mode != MoveMode::NoMove {
            tracing::trace!(id = %self.id, from = %self.location, to = %destination, ?mode, "character moved");
        }
        self.location = destination;
    }

    pub fn look_at(&self) -> Option<&str> {
        self.look_at.as_deref()
    }

    pub fn set_look_at(&mut self, text: String) {
        self.look_at = Some(text);
    }
}

/// Registry of characters currently in view, keyed by id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Characters {
    by_id: BTreeMap<CharacterId, Character>,
}

impl Characters {
    pub fn get(&self, id: CharacterId) -> Option<&Character> {
        self.by_id.get(&id)
    }

    pub fn get_mut(&mut self, id: CharacterId) -> Option<&mut Character> {
        self.by_id.get_mut(&id)
    }

    pub fn contains(&self, id: CharacterId) -> bool {
        self.by_id.contains_key(&id)
    }

    /// Adds a character, or moves it if it's already known. Returns the
    /// stored entry.
    pub fn upsert(&mut self, id: CharacterId, location: Location) -> &mut Character {
        let entry = self
            .by_id
            .entry(id)
            .or_insert_with(|| Character::new(id, location));
        entry.location = location;
        entry
    }

    pub fn remove(&mut self, id: CharacterId) -> Option<Character> {
        self.by_id.remove(&id)
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Character> {
        self.by_id.values()
    }

    pub fn clear(&mut self) {
        self.by_id.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upsert_moves_existing_character() {
        let mut chars = Characters::default();
        chars.upsert(CharacterId(5), Location::new(1, 1, 0)).set_direction(Direction::West);
        chars.upsert(CharacterId(5), Location::new(2, 1, 0));

        let c = chars.get(CharacterId(5)).unwrap();
        assert_eq!(c.location(), Location::new(2, 1, 0));
        assert_eq!(c.direction(), Some(Direction::West));
        assert_eq!(chars.len(), 1);
    }

    #[test]
    fn test_remove_unknown_is_none() {
        let mut chars = Characters::default();
        assert!(chars.remove(CharacterId(1)).is_none());
    }
}
