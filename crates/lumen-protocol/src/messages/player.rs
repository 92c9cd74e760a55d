//! State that belongs to the local player only: skills, inventory, magic.

use crate::messages::ServerMessage;
use crate::types::ItemStack;
use crate::{opcode, ProtocolError, WireReader, WireWriter};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkillMsg {
    pub skill: u8,
    pub value: u16,
    /// Progress towards the next point of `value`.
    pub minor: u16,
}

impl ServerMessage for SkillMsg {
    const OPCODE: u8 = opcode::SKILL;
    const NAME: &'static str = "Skill";

    fn decode(reader: &mut WireReader) -> Result<Self, ProtocolError> {
        let skill = reader.read_u8()?;
        let value = reader.read_u16()?;
        let minor = reader.read_u16()?;
        Ok(Self {
            skill,
            value,
            minor,
        })
    }

    fn encode(&self, writer: &mut WireWriter) -> Result<(), ProtocolError> {
        writer.write_u8(self.skill);
        writer.write_u16(self.value);
        writer.write_u16(self.minor);
        Ok(())
    }
}

/// Contents of one inventory slot. A count of 0 empties the slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryMsg {
    pub slot: u8,
    pub item: ItemStack,
}

impl ServerMessage for InventoryMsg {
    const OPCODE: u8 = opcode::INVENTORY;
    const NAME: &'static str = "Inventory";

    fn decode(reader: &mut WireReader) -> Result<Self, ProtocolError> {
        let slot = reader.read_u8()?;
        let id = reader.read_u16()?;
        let count = reader.read_u16()?;
        Ok(Self {
            slot,
            item: ItemStack::new(id, count),
        })
    }

    fn encode(&self, writer: &mut WireWriter) -> Result<(), ProtocolError> {
        writer.write_u8(self.slot);
        writer.write_u16(self.item.id.0);
        writer.write_u16(self.item.count.0);
        Ok(())
    }
}

/// Spell runes known in one school of magic, as a bit set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MagicFlagMsg {
    pub school: u8,
    pub flags: i32,
}

impl ServerMessage for MagicFlagMsg {
    const OPCODE: u8 = opcode::MAGIC_FLAG;
    const NAME: &'static str = "MagicFlag";

    fn decode(reader: &mut WireReader) -> Result<Self, ProtocolError> {
        let school = reader.read_u8()?;
        let flags = reader.read_i32()?;
        Ok(Self { school, flags })
    }

    fn encode(&self, writer: &mut WireWriter) -> Result<(), ProtocolError> {
        writer.write_u8(self.school);
        writer.write_i32(self.flags);
        Ok(())
    }
}
