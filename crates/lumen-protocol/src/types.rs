//! Domain value types that appear inside server replies.
//!
//! These are small, `Copy`-where-possible values: ids, map coordinates,
//! directions, and the handful of one-byte enums the server uses. Each
//! enum knows its wire value and converts from a raw byte with
//! `TryFrom<u8>`, reporting [`ProtocolError::InvalidValue`] for bytes it
//! doesn't recognise.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ProtocolError;

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// Server-assigned id of a character (players, NPCs and monsters alike).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CharacterId(pub u32);

impl fmt::Display for CharacterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "C-{}", self.0)
    }
}

/// Item type id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub u16);

/// Stack size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemCount(pub u16);

/// An item and how many of it lie on a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemStack {
    pub id: ItemId,
    pub count: ItemCount,
}

impl ItemStack {
    pub fn new(id: u16, count: u16) -> Self {
        Self {
            id: ItemId(id),
            count: ItemCount(count),
        }
    }
}

// ---------------------------------------------------------------------------
// Location and Direction
// ---------------------------------------------------------------------------

/// A position on the server map. `z` is the floor level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Location {
    pub x: i16,
    pub y: i16,
    pub z: i16,
}

impl Location {
    pub const fn new(x: i16, y: i16, z: i16) -> Self {
        Self { x, y, z }
    }

    /// The neighbouring location one step in `direction`, on the same floor.
    ///
    /// Wraps on overflow; the server never sends coordinates near the
    /// i16 limits.
    pub fn step(self, direction: Direction) -> Self {
        let (dx, dy) = direction.offset();
        Self {
            x: self.x.wrapping_add(dx),
            y: self.y.wrapping_add(dy),
            z: self.z,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// The eight compass directions, in wire order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Direction {
    North = 0,
    NorthEast = 1,
    East = 2,
    SouthEast = 3,
    South = 4,
    SouthWest = 5,
    West = 6,
    NorthWest = 7,
}

impl Direction {
    pub const ALL: [Direction; 8] = [
        Self::North,
        Self::NorthEast,
        Self::East,
        Self::SouthEast,
        Self::South,
        Self::SouthWest,
        Self::West,
        Self::NorthWest,
    ];

    /// Unit offset `(dx, dy)` on the server map. North is negative y.
    pub const fn offset(self) -> (i16, i16) {
        match self {
            Self::North => (0, -1),
            Self::NorthEast => (1, -1),
            Self::East => (1, 0),
            Self::SouthEast => (1, 1),
            Self::South => (0, 1),
            Self::SouthWest => (-1, 1),
            Self::West => (-1, 0),
            Self::NorthWest => (-1, -1),
        }
    }
}

impl TryFrom<u8> for Direction {
    type Error = ProtocolError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::ALL
            .get(usize::from(value))
            .copied()
            .ok_or(ProtocolError::InvalidValue {
                field: "direction",
                value: i64::from(value),
            })
    }
}

// ---------------------------------------------------------------------------
// Map tiles
// ---------------------------------------------------------------------------

/// New contents of one map tile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileUpdate {
    pub location: Location,
    pub tile_id: i16,
    pub music_id: u16,
    /// Items on the tile, bottom of the pile first.
    pub items: Vec<ItemStack>,
}

/// Orientation of a map stripe and the direction its tiles advance in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum StripeDirection {
    /// A row of tiles running to the right of the screen.
    Horizontal = 0,
    /// A column of tiles running down the screen.
    Vertical = 1,
}

impl StripeDirection {
    /// The map direction that moves one tile along the stripe.
    pub const fn step(self) -> Direction {
        match self {
            Self::Horizontal => Direction::SouthEast,
            Self::Vertical => Direction::SouthWest,
        }
    }
}

impl TryFrom<u8> for StripeDirection {
    type Error = ProtocolError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Horizontal),
            1 => Ok(Self::Vertical),
            _ => Err(ProtocolError::InvalidValue {
                field: "stripe direction",
                value: i64::from(value),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// Small wire enums
// ---------------------------------------------------------------------------

/// How a character moved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum MoveMode {
    /// Position confirmed without an animation.
    NoMove = 0,
    Walk = 1,
    Run = 2,
    /// Pushed by someone else.
    Push = 3,
    /// Teleported.
    Warp = 4,
}

impl TryFrom<u8> for MoveMode {
    type Error = ProtocolError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::NoMove),
            1 => Ok(Self::Walk),
            2 => Ok(Self::Run),
            3 => Ok(Self::Push),
            4 => Ok(Self::Warp),
            _ => Err(ProtocolError::InvalidValue {
                field: "move mode",
                value: i64::from(value),
            }),
        }
    }
}

/// Volume of spoken text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum TalkMode {
    Say = 0,
    Shout = 1,
    Whisper = 2,
}

impl TryFrom<u8> for TalkMode {
    type Error = ProtocolError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Say),
            1 => Ok(Self::Shout),
            2 => Ok(Self::Whisper),
            _ => Err(ProtocolError::InvalidValue {
                field: "talk mode",
                value: i64::from(value),
            }),
        }
    }
}

/// Origin of an inform notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum InformKind {
    Server = 0,
    Broadcast = 1,
    GameMaster = 2,
    Script = 3,
}

impl TryFrom<u8> for InformKind {
    type Error = ProtocolError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Server),
            1 => Ok(Self::Broadcast),
            2 => Ok(Self::GameMaster),
            3 => Ok(Self::Script),
            _ => Err(ProtocolError::InvalidValue {
                field: "inform kind",
                value: i64::from(value),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_character_id_display() {
        assert_eq!(CharacterId(42).to_string(), "C-42");
    }

    #[test]
    fn test_character_id_serializes_as_plain_number() {
        assert_eq!(serde_json::to_string(&CharacterId(7)).unwrap(), "7");
    }

    #[test]
    fn test_direction_wire_values_round_trip() {
        for (raw, dir) in Direction::ALL.iter().enumerate() {
            assert_eq!(*dir as u8, raw as u8);
            assert_eq!(Direction::try_from(raw as u8).unwrap(), *dir);
        }
        assert!(Direction::try_from(8).is_err());
    }

    #[test]
    fn test_opposite_directions_cancel_out() {
        let origin = Location::new(5, 5, 0);
        let back = origin.step(Direction::SouthEast).step(Direction::NorthWest);
        assert_eq!(back, origin);
        let back = origin.step(Direction::North).step(Direction::South);
        assert_eq!(back, origin);
    }

    #[test]
    fn test_step_keeps_floor() {
        let loc = Location::new(0, 0, 3).step(Direction::SouthWest);
        assert_eq!(loc, Location::new(-1, 1, 3));
    }

    #[test]
    fn test_stripe_steps() {
        assert_eq!(StripeDirection::Horizontal.step(), Direction::SouthEast);
        assert_eq!(StripeDirection::Vertical.step(), Direction::SouthWest);
        assert!(StripeDirection::try_from(2).is_err());
    }

    #[test]
    fn test_small_enums_reject_unknown_bytes() {
        assert!(MoveMode::try_from(5).is_err());
        assert!(TalkMode::try_from(3).is_err());
        assert_eq!(InformKind::try_from(2).unwrap(), InformKind::GameMaster);
        assert!(InformKind::try_from(4).is_err());
    }
}
