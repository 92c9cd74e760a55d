//! Integration tests for the world facade.

use lumen_protocol::{CharacterId, Direction, ItemStack, Location, TileUpdate};
use lumen_world::{CharacterAttribute, GameWorld, World};

// =========================================================================
// Provided lookups
// =========================================================================

#[test]
fn test_fresh_world_knows_nothing() {
    let world = GameWorld::new();
    assert_eq!(world.player_id(), None);
    assert!(world.character(CharacterId(1)).is_none());
    assert!(world.tile(Location::default()).is_none());
    assert!(!world.is_gui_ready());
}

#[test]
fn test_lookups_see_state_through_the_trait() {
    let mut world = GameWorld::new();
    world.player_mut().set_id(CharacterId(9));
    world
        .characters_mut()
        .upsert(CharacterId(3), Location::new(4, 4, 0))
        .set_direction(Direction::South);
    world.map_mut().apply_stripe(&[TileUpdate {
        location: Location::new(4, 5, 0),
        tile_id: 12,
        music_id: 0,
        items: vec![ItemStack::new(300, 1)],
    }]);
    world.interface_mut().set_ready(true);

    assert_eq!(world.player_id(), Some(CharacterId(9)));
    assert_eq!(
        world.character(CharacterId(3)).and_then(|c| c.direction()),
        Some(Direction::South)
    );
    assert_eq!(world.tile(Location::new(4, 5, 0)).map(|t| t.tile_id), Some(12));
    assert!(world.is_gui_ready());
}

// =========================================================================
// Reset
// =========================================================================

#[test]
fn test_reset_keeps_gui_ready_flag() {
    let mut world = GameWorld::new();
    world.interface_mut().set_ready(true);
    world.player_mut().set_id(CharacterId(1));
    world
        .player_mut()
        .attributes
        .set(CharacterAttribute::Hitpoints, 10_000);

    world.reset();
    assert_eq!(world.player_id(), None);
    assert!(world.player().attributes.is_empty());
    assert!(world.is_gui_ready());
}

// =========================================================================
// Snapshots
// =========================================================================

#[test]
fn test_player_snapshot_serializes() {
    let mut world = GameWorld::new();
    world.player_mut().set_id(CharacterId(77));
    world.player_mut().set_location(Location::new(1, 2, 3));
    world
        .player_mut()
        .attributes
        .set(CharacterAttribute::FoodLevel, 5_000);

    let json = serde_json::to_value(world.player()).unwrap();
    assert_eq!(json["id"], 77);
    assert_eq!(json["location"]["z"], 3);
    assert_eq!(json["attributes"]["foodlevel"], 5_000);
}
