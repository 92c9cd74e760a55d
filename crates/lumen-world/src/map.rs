//! The client's copy of the map around the player.
//!
//! Tiles arrive in stripes and are keyed by their absolute location. A
//! tile that was never sent doesn't exist here; item updates aimed at it
//! are rejected.

use std::collections::HashMap;

use lumen_protocol::{ItemStack, Location, TileUpdate};

use crate::WorldError;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MapTile {
    pub tile_id: i16,
    pub music_id: u16,
    /// Bottom to top.
    pub items: Vec<ItemStack>,
}

impl MapTile {
    pub fn top_item(&self) -> Option<ItemStack> {
        self.items.last().copied()
    }
}

#[derive(Debug, Clone, Default)]
pub struct GameMap {
    tiles: HashMap<Location, MapTile>,
    complete: bool,
    stripes_applied: u64,
}

impl GameMap {
    pub fn tile(&self, location: Location) -> Option<&MapTile> {
        self.tiles.get(&location)
    }

    /// Replaces the tile at `update.location`.
    ///
    /// A zero tile id clears the location: the server is saying there is
    /// nothing there any more.
    pub fn apply_tile(&mut self, update: &TileUpdate) {
        if update.tile_id == 0 && update.items.is_empty() {
            self.tiles.remove(&update.location);
            return;
        }
        self.tiles.insert(
            update.location,
            MapTile {
                tile_id: update.tile_id,
                music_id: update.music_id,
                items: update.items.clone(),
            },
        );
    }

    pub fn apply_stripe(&mut self, tiles: &[TileUpdate]) {
        for tile in tiles {
            self.apply_tile(tile);
        }
        self.stripes_applied += 1;
    }

    /// Puts `item` on top of the stack at `location`.
    pub fn put_item(&mut self, location: Location, item: ItemStack) -> Result<(), WorldError> {
        let tile = self
            .tiles
            .get_mut(&location)
            .ok_or(WorldError::TileNotLoaded(location))?;
        tile.items.push(item);
        Ok(())
    }

    /// Removes the top item at `location`, returning it.
    pub fn remove_top_item(&mut self, location: Location) -> Result<Option<ItemStack>, WorldError> {
        let tile = self
            .tiles
            .get_mut(&location)
            .ok_or(WorldError::TileNotLoaded(location))?;
        Ok(tile.items.pop())
    }

    pub fn mark_complete(&mut self) {
        self.complete = true;
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    pub fn stripes_applied(&self) -> u64 {
        self.stripes_applied
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn clear(&mut self) {
        self.tiles.clear();
        self.complete = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tile_at(x: i16, tile_id: i16) -> TileUpdate {
        TileUpdate {
            location: Location::new(x, 0, 0),
            tile_id,
            music_id: 0,
            items: Vec::new(),
        }
    }

    #[test]
    fn test_zero_tile_clears_location() {
        let mut map = GameMap::default();
        map.apply_tile(&tile_at(1, 7));
        assert!(map.tile(Location::new(1, 0, 0)).is_some());
        map.apply_tile(&tile_at(1, 0));
        assert!(map.tile(Location::new(1, 0, 0)).is_none());
    }

    #[test]
    fn test_items_stack_on_loaded_tiles_only() {
        let mut map = GameMap::default();
        let here = Location::new(1, 0, 0);
        assert_eq!(
            map.put_item(here, ItemStack::new(1, 1)),
            Err(WorldError::TileNotLoaded(here))
        );

        map.apply_tile(&tile_at(1, 7));
        map.put_item(here, ItemStack::new(1, 1)).unwrap();
        map.put_item(here, ItemStack::new(2, 3)).unwrap();
        assert_eq!(map.tile(here).unwrap().top_item(), Some(ItemStack::new(2, 3)));
        assert_eq!(map.remove_top_item(here), Ok(Some(ItemStack::new(2, 3))));
    }
}
