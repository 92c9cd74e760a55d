//! Combat acknowledgements. Both messages are their opcode alone.

use crate::messages::ServerMessage;
use crate::{opcode, ProtocolError, WireReader, WireWriter};

/// The server accepted the player's attack on the selected target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AttackMsg;

impl ServerMessage for AttackMsg {
    const OPCODE: u8 = opcode::ATTACK;
    const NAME: &'static str = "Attack";

    fn decode(_reader: &mut WireReader) -> Result<Self, ProtocolError> {
        Ok(Self)
    }

    fn encode(&self, _writer: &mut WireWriter) -> Result<(), ProtocolError> {
        Ok(())
    }
}

/// The attack target is gone (dead, out of range, logged off).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TargetLostMsg;

impl ServerMessage for TargetLostMsg {
    const OPCODE: u8 = opcode::TARGET_LOST;
    const NAME: &'static str = "TargetLost";

    fn decode(_reader: &mut WireReader) -> Result<Self, ProtocolError> {
        Ok(Self)
    }

    fn encode(&self, _writer: &mut WireWriter) -> Result<(), ProtocolError> {
        Ok(())
    }
}
