//! Messages about the local player's session: identity, position, logout.

use crate::messages::ServerMessage;
use crate::types::{CharacterId, Location};
use crate::{opcode, ProtocolError, WireReader, WireWriter};

/// Tells the client which character it is playing.
///
/// Until this arrives, anything that needs to tell "the player" apart from
/// other characters has to wait.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerIdMsg {
    pub id: CharacterId,
}

impl ServerMessage for PlayerIdMsg {
    const OPCODE: u8 = opcode::PLAYER_ID;
    const NAME: &'static str = "PlayerId";

    fn decode(reader: &mut WireReader) -> Result<Self, ProtocolError> {
        Ok(Self {
            id: reader.read_character_id()?,
        })
    }

    fn encode(&self, writer: &mut WireWriter) -> Result<(), ProtocolError> {
        writer.write_character_id(self.id);
        Ok(())
    }
}

/// Authoritative position of the local player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationMsg {
    pub location: Location,
}

impl ServerMessage for LocationMsg {
    const OPCODE: u8 = opcode::LOCATION;
    const NAME: &'static str = "Location";

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

/// The server is ending the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogoutMsg {
    /// Server-defined reason code (0 = normal logout).
    pub reason: u8,
}

impl ServerMessage for LogoutMsg {
    const OPCODE: u8 = opcode::LOGOUT;
    const NAME: &'static str = "Logout";

    fn decode(reader: &mut WireReader) -> Result<Self, ProtocolError> {
        Ok(Self {
            reason: reader.read_u8()?,
        })
    }

    fn encode(&self, writer: &mut WireWriter) -> Result<(), ProtocolError> {
        writer.write_u8(self.reason);
        Ok(())
    }
}
