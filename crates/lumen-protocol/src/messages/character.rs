//! Messages about characters in view: attributes, facing, movement.

use crate::messages::ServerMessage;
use crate::types::{CharacterId, Direction, Location, MoveMode};
use crate::{opcode, ProtocolError, WireReader, WireWriter};

/// One named attribute of a character changed.
///
/// The name is sent as text; whether the client knows it is decided at
/// execution time, not while decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeMsg {
    pub character: CharacterId,
    pub attribute: String,
    pub value: u16,
}

impl ServerMessage for AttributeMsg {
    const OPCODE: u8 = opcode::ATTRIBUTE;
    const NAME: &'static str = "Attribute";

    fn decode(reader: &mut WireReader) -> Result<Self, ProtocolError> {
        let character = reader.read_character_id()?;
        let attribute = reader.read_string()?;
        let value = reader.read_u16()?;
        Ok(Self {
            character,
            attribute,
            value,
        })
    }

    fn encode(&self, writer: &mut WireWriter) -> Result<(), ProtocolError> {
        writer.write_character_id(self.character);
        writer.write_string(&self.attribute)?;
        writer.write_u16(self.value);
        Ok(())
    }
}

/// A character turned on the spot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnCharMsg {
    pub location: Location,
    pub direction: Direction,
    pub character: CharacterId,
}

impl ServerMessage for TurnCharMsg {
    const OPCODE: u8 = opcode::TURN_CHAR;
    const NAME: &'static str = "TurnChar";

    fn decode(reader: &mut WireReader) -> Result<Self, ProtocolError> {
        let location = reader.read_location()?;
        let direction = reader.read_direction()?;
        let character = reader.read_character_id()?;
        Ok(Self {
            location,
            direction,
            character,
        })
    }

    fn encode(&self, writer: &mut WireWriter) -> Result<(), ProtocolError> {
        writer.write_location(self.location);
        writer.write_direction(self.direction);
        writer.write_character_id(self.character);
        Ok(())
    }
}

/// A character moved to a new location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveCharMsg {
    pub character: CharacterId,
    pub destination: Location,
    pub mode: MoveMode,
    /// Animation length in milliseconds.
    pub duration_ms: u16,
}

impl ServerMessage for MoveCharMsg {
    const OPCODE: u8 = opcode::MOVE_CHAR;
    const NAME: &'static str = "MoveChar";

    fn decode(reader: &mut WireReader) -> Result<Self, ProtocolError> {
        let character = reader.read_character_id()?;
        let destination = reader.read_location()?;
        let mode = MoveMode::try_from(reader.read_u8()?)?;
        let duration_ms = reader.read_u16()?;
        Ok(Self {
            character,
            destination,
            mode,
            duration_ms,
        })
    }

    fn encode(&self, writer: &mut WireWriter) -> Result<(), ProtocolError> {
        writer.write_character_id(self.character);
        writer.write_location(self.destination);
        writer.write_u8(self.mode as u8);
        writer.write_u16(self.duration_ms);
        Ok(())
    }
}

/// A character left the client's view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoveCharMsg {
    pub character: CharacterId,
}

impl ServerMessage for RemoveCharMsg {
    const OPCODE: u8 = opcode::REMOVE_CHAR;
    const NAME: &'static str = "RemoveChar";

    fn decode(reader: &mut WireReader) -> Result<Self, ProtocolError> {
        Ok(Self {
            character: reader.read_character_id()?,
        })
    }

    fn encode(&self, writer: &mut WireWriter) -> Result<(), ProtocolError> {
        writer.write_character_id(self.character);
        Ok(())
    }
}

/// Description of a character the player looked at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookAtCharMsg {
    pub character: CharacterId,
    pub text: String,
}

impl ServerMessage for LookAtCharMsg {
    const OPCODE: u8 = opcode::LOOK_AT_CHAR;
    const NAME: &'static str = "LookAtChar";

    fn decode(reader: &mut WireReader) -> Result<Self, ProtocolError> {
        let character = reader.read_character_id()?;
        let text = reader.read_string()?;
        Ok(Self { character, text })
    }

    fn encode(&self, writer: &mut WireWriter) -> Result<(), ProtocolError> {
        writer.write_character_id(self.character);
        writer.write_string(&self.text)
    }
}
