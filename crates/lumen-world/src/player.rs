//! The player's own character.

use std::collections::{BTreeMap, VecDeque};

use lumen_protocol::{CharacterId, Direction, ItemStack, Location, MoveMode};
use serde::{Deserialize, Serialize};

use crate::interface::push_bounded;
use crate::{Attributes, DEFAULT_LOG_CAPACITY};

/// One skill value as reported by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillValue {
    pub value: u16,
    pub minor: u16,
}

/// A movement the server confirmed for the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MovementResponse {
    Turn(Direction),
    Move {
        mode: MoveMode,
        destination: Location,
        duration_ms: u16,
    },
}

/// Collects the server's answers to the player's movement requests.
///
/// Whatever animates the player pulls these with
/// [`take_responses`](Self::take_responses). Unclaimed answers are capped at
/// [`DEFAULT_LOG_CAPACITY`]; the oldest go first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovementHandler {
    facing: Option<Direction>,
    responses: VecDeque<MovementResponse>,
}

impl MovementHandler {
    pub fn server_turn_response(&mut self, direction: Direction) {
        self.facing = Some(direction);
        push_bounded(
            &mut self.responses,
            DEFAULT_LOG_CAPACITY,
            MovementResponse::Turn(direction),
        );
    }

    pub fn server_move_response(&mut self, mode: MoveMode, destination: Location, duration_ms: u16) {
        push_bounded(
            &mut self.responses,
            DEFAULT_LOG_CAPACITY,
            MovementResponse::Move {
                mode,
                destination,
                duration_ms,
            },
        );
    }

    pub fn facing(&self) -> Option<Direction> {
        self.facing
    }

    pub fn take_responses(&mut self) -> Vec<MovementResponse> {
        self.responses.drain(..).collect()
    }

    pub fn pending(&self) -> usize {
        self.responses.len()
    }
}

/// Whether the player is fighting something.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatState {
    pub in_combat: bool,
    /// Attacks the server acknowledged since the last target loss.
    pub confirmed_attacks: u32,
}

/// Everything the client knows about the player.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    id: Option<CharacterId>,
    location: Option<Location>,
    pub attributes: Attributes,
    skills: BTreeMap<u8, SkillValue>,
    inventory: BTreeMap<u8, ItemStack>,
    magic_flags: BTreeMap<u8, i32>,
    movement: MovementHandler,
    combat: CombatState,
}

impl Player {
    /// The player's character id, once the server has sent it.
    pub fn id(&self) -> Option<CharacterId> {
        self.id
    }

    pub fn set_id(&mut self, id: CharacterId) {
        self.id = Some(id);
    }

    pub fn is_player(&self, id: CharacterId) -> bool {
        self.id == Some(id)
    }

    pub fn location(&self) -> Option<Location> {
        self.location
    }

    pub fn set_location(&mut self, location: Location) {
        self.location = Some(location);
    }

    pub fn skill(&self, skill: u8) -> Option<SkillValue> {
        self.skills.get(&skill).copied()
    }

    pub fn set_skill(&mut self, skill: u8, value: u16, minor: u16) {
        self.skills.insert(skill, SkillValue { value, minor });
    }

    pub fn inventory_slot(&self, slot: u8) -> Option<ItemStack> {
        self.inventory.get(&slot).copied()
    }

    /// Stores `item` in `slot`; a zero count empties the slot.
    pub fn set_inventory_slot(&mut self, slot: u8, item: ItemStack) {
        if item.count.0 == 0 {
            self.inventory.remove(&slot);
        } else {
            self.inventory.insert(slot, item);
        }
    }

    pub fn magic_flags(&self, school: u8) -> i32 {
        self.magic_flags.get(&school).copied().unwrap_or(0)
    }

    pub fn set_magic_flags(&mut self, school: u8, flags: i32) {
        self.magic_flags.insert(school, flags);
    }

    pub fn movement(&self) -> &MovementHandler {
        &self.movement
    }

    pub fn movement_mut(&mut self) -> &mut MovementHandler {
        &mut self.movement
    }

    pub fn combat(&self) -> CombatState {
        self.combat
    }

    pub fn confirm_attack(&mut self) {
        self.combat.in_combat = true;
        self.combat.confirmed_attacks += 1;
    }

    pub fn lose_target(&mut self) {
        self.combat = CombatState::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unclaimed_movement_answers_are_capped() {
        let mut movement = MovementHandler::default();
        for _ in 0..DEFAULT_LOG_CAPACITY {
            movement.server_turn_response(Direction::North);
        }
        movement.server_turn_response(Direction::West);
        assert_eq!(movement.pending(), DEFAULT_LOG_CAPACITY);

        let responses = movement.take_responses();
        assert_eq!(responses.last(), Some(&MovementResponse::Turn(Direction::West)));
        assert_eq!(movement.pending(), 0);
    }

    #[test]
    fn test_empty_inventory_slot_is_removed() {
        let mut player = Player::default();
        player.set_inventory_slot(3, ItemStack::new(100, 5));
        assert_eq!(player.inventory_slot(3), Some(ItemStack::new(100, 5)));
        player.set_inventory_slot(3, ItemStack::new(0, 0));
        assert_eq!(player.inventory_slot(3), None);
    }

    #[test]
    fn test_movement_responses_are_taken_in_order() {
        let mut handler = MovementHandler::default();
        handler.server_turn_response(Direction::East);
        handler.server_move_response(MoveMode::Walk, Location::new(1, 0, 0), 300);
        assert_eq!(handler.facing(), Some(Direction::East));

        let taken = handler.take_responses();
        assert_eq!(taken.len(), 2);
        assert_eq!(taken[0], MovementResponse::Turn(Direction::East));
        assert_eq!(handler.pending(), 0);
    }

    #[test]
    fn test_losing_target_resets_combat() {
        let mut player = Player::default();
        player.confirm_attack();
        player.confirm_attack();
        assert_eq!(player.combat().confirmed_attacks, 2);
        player.lose_target();
        assert!(!player.combat().in_combat);
    }
}
