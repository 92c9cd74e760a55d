//! Map contents: stripes of tiles, single item changes, tile descriptions.

use crate::messages::ServerMessage;
use crate::types::{ItemStack, Location, StripeDirection, TileUpdate};
use crate::{opcode, ProtocolError, WireReader, WireWriter};

/// A run of consecutive tiles starting at `origin`.
///
/// Only the origin travels on the wire; every following tile is one step
/// further along the stripe (`SouthEast` for horizontal stripes,
/// `SouthWest` for vertical ones). The decoded [`TileUpdate`]s carry their
/// computed locations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapStripeMsg {
    pub origin: Location,
    pub direction: StripeDirection,
    pub tiles: Vec<TileUpdate>,
}

impl MapStripeMsg {
    fn decode_tile(
        reader: &mut WireReader,
        location: Location,
    ) -> Result<TileUpdate, ProtocolError> {
        let tile_id = reader.read_i16()?;
        let music_id = reader.read_u16()?;
        let item_count = reader.read_u8()?;
        let mut items = Vec::with_capacity(usize::from(item_count));
        for _ in 0..item_count {
            let id = reader.read_u16()?;
            let count = reader.read_u16()?;
            items.push(ItemStack::new(id, count));
        }
        Ok(TileUpdate {
            location,
            tile_id,
            music_id,
            items,
        })
    }
}

impl ServerMessage for MapStripeMsg {
    const OPCODE: u8 = opcode::MAP_STRIPE;
    const NAME: &'static str = "MapStripe";

    fn decode(reader: &mut WireReader) -> Result<Self, ProtocolError> {
        let origin = reader.read_location()?;
        let direction = StripeDirection::try_from(reader.read_u8()?)?;
        let count = reader.read_u8()?;

        let step = direction.step();
        let mut tiles = Vec::with_capacity(usize::from(count));
        let mut location = origin;
        for _ in 0..count {
            tiles.push(Self::decode_tile(reader, location)?);
            location = location.step(step);
        }

        Ok(Self {
            origin,
            direction,
            tiles,
        })
    }

    /// Tile locations are implied by `origin` and `direction`; the
    /// `location` stored in each [`TileUpdate`] is not written.
    fn encode(&self, writer: &mut WireWriter) -> Result<(), ProtocolError> {
        writer.write_location(self.origin);
        writer.write_u8(self.direction as u8);
        writer.write_count("map stripe tiles", self.tiles.len())?;
        for tile in &self.tiles {
            writer.write_i16(tile.tile_id);
            writer.write_u16(tile.music_id);
            writer.write_count("tile items", tile.items.len())?;
            for item in &tile.items {
                writer.write_u16(item.id.0);
                writer.write_u16(item.count.0);
            }
        }
        Ok(())
    }
}

/// The server finished sending the map around the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MapCompleteMsg;

impl ServerMessage for MapCompleteMsg {
    const OPCODE: u8 = opcode::MAP_COMPLETE;
    const NAME: &'static str = "MapComplete";

    fn decode(_reader: &mut WireReader) -> Result<Self, ProtocolError> {
        Ok(Self)
    }

    fn encode(&self, _writer: &mut WireWriter) -> Result<(), ProtocolError> {
        Ok(())
    }
}

/// An item was placed on top of a tile's pile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemPutMsg {
    pub location: Location,
    pub item: ItemStack,
}

impl ServerMessage for ItemPutMsg {
    const OPCODE: u8 = opcode::ITEM_PUT;
    const NAME: &'static str = "ItemPut";

    fn decode(reader: &mut WireReader) -> Result<Self, ProtocolError> {
        let location = reader.read_location()?;
        let id = reader.read_u16()?;
        let count = reader.read_u16()?;
        Ok(Self {
            location,
            item: ItemStack::new(id, count),
        })
    }

    fn encode(&self, writer: &mut WireWriter) -> Result<(), ProtocolError> {
        writer.write_location(self.location);
        writer.write_u16(self.item.id.0);
        writer.write_u16(self.item.count.0);
        Ok(())
    }
}

/// The top item of a tile's pile was taken away.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemRemoveMsg {
    pub location: Location,
}

impl ServerMessage for ItemRemoveMsg {
    const OPCODE: u8 = opcode::ITEM_REMOVE;
    const NAME: &'static str = "ItemRemove";

    fn decode(reader: &mut WireReader) -> Result<Self, ProtocolError> {
        Ok(Self {
            location: reader.read_location()?,
        })
    }

    fn encode(&self, writer: &mut WireWriter) -> Result<(), ProtocolError> {
        writer.write_location(self.location);
        Ok(())
    }
}

/// Description of a tile the player looked at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookAtTileMsg {
    pub location: Location,
    pub text: String,
}

impl ServerMessage for LookAtTileMsg {
    const OPCODE: u8 = opcode::LOOK_AT_TILE;
    const NAME: &'static str = "LookAtTile";

    fn decode(reader: &mut WireReader) -> Result<Self, ProtocolError> {
        let location = reader.read_location()?;
        let text = reader.read_string()?;
        Ok(Self { location, text })
    }

    fn encode(&self, writer: &mut WireWriter) -> Result<(), ProtocolError> {
        writer.write_location(self.location);
        writer.write_string(&self.text)
    }
}
