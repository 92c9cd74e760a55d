//! Error types for world state updates.

use lumen_protocol::{CharacterId, Location};

/// Errors raised when an update can't be applied to the world.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WorldError {
    /// The server named an attribute this client doesn't know.
    #[error("unknown character attribute {0:?}")]
    UnknownAttribute(String),

    /// The update targets a map tile that hasn't been received yet.
    #[error("no tile loaded at {0}")]
    TileNotLoaded(Location),

    /// The update targets a character that isn't in view.
    #[error("character {0} not in view")]
    UnknownCharacter(CharacterId),
}
