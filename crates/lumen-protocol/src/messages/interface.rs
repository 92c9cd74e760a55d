//! Messages whose only destination is the game interface: chat, notices,
//! the quest log, and dialogs.

use crate::messages::ServerMessage;
use crate::types::{InformKind, Location, TalkMode};
use crate::{opcode, ProtocolError, WireReader, WireWriter};

/// Something was said near `location`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TalkMsg {
    pub location: Location,
    pub mode: TalkMode,
    pub text: String,
}

impl ServerMessage for TalkMsg {
    const OPCODE: u8 = opcode::TALK;
    const NAME: &'static str = "Talk";

    fn decode(reader: &mut WireReader) -> Result<Self, ProtocolError> {
        let location = reader.read_location()?;
        let mode = TalkMode::try_from(reader.read_u8()?)?;
        let text = reader.read_string()?;
        Ok(Self {
            location,
            mode,
            text,
        })
    }

    fn encode(&self, writer: &mut WireWriter) -> Result<(), ProtocolError> {
        writer.write_location(self.location);
        writer.write_u8(self.mode as u8);
        writer.write_string(&self.text)
    }
}

/// A notice for the player that isn't spoken by anyone in the world.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InformMsg {
    pub kind: InformKind,
    pub text: String,
}

impl ServerMessage for InformMsg {
    const OPCODE: u8 = opcode::INFORM;
    const NAME: &'static str = "Inform";

    fn decode(reader: &mut WireReader) -> Result<Self, ProtocolError> {
        let kind = InformKind::try_from(reader.read_u8()?)?;
        let text = reader.read_string()?;
        Ok(Self { kind, text })
    }

    fn encode(&self, writer: &mut WireWriter) -> Result<(), ProtocolError> {
        writer.write_u8(self.kind as u8);
        writer.write_string(&self.text)
    }
}

/// New or updated quest log entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestProgressMsg {
    pub quest: u16,
    pub title: String,
    pub description: String,
    pub finished: bool,
    /// Where the quest wants the player to go next.
    pub targets: Vec<Location>,
}

impl ServerMessage for QuestProgressMsg {
    const OPCODE: u8 = opcode::QUEST_PROGRESS;
    const NAME: &'static str = "QuestProgress";

    fn decode(reader: &mut WireReader) -> Result<Self, ProtocolError> {
        let quest = reader.read_u16()?;
        let title = reader.read_string()?;
        let description = reader.read_string()?;
        let finished = reader.read_bool()?;
        let count = reader.read_u8()?;
        let mut targets = Vec::with_capacity(usize::from(count));
        for _ in 0..count {
            targets.push(reader.read_location()?);
        }
        Ok(Self {
            quest,
            title,
            description,
            finished,
            targets,
        })
    }

    fn encode(&self, writer: &mut WireWriter) -> Result<(), ProtocolError> {
        writer.write_u16(self.quest);
        writer.write_string(&self.title)?;
        writer.write_string(&self.description)?;
        writer.write_bool(self.finished);
        writer.write_count("quest targets", self.targets.len())?;
        for target in &self.targets {
            writer.write_location(*target);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestAbandonMsg {
    pub quest: u16,
}

impl ServerMessage for QuestAbandonMsg {
    const OPCODE: u8 = opcode::QUEST_ABANDON;
    const NAME: &'static str = "QuestAbandon";

    fn decode(reader: &mut WireReader) -> Result<Self, ProtocolError> {
        Ok(Self {
            quest: reader.read_u16()?,
        })
    }

    fn encode(&self, writer: &mut WireWriter) -> Result<(), ProtocolError> {
        writer.write_u16(self.quest);
        Ok(())
    }
}

/// Asks the player to type a reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogInputMsg {
    pub dialog: i32,
    pub title: String,
    pub description: String,
    pub max_chars: u16,
    pub multiline: bool,
}

impl ServerMessage for DialogInputMsg {
    const OPCODE: u8 = opcode::DIALOG_INPUT;
    const NAME: &'static str = "DialogInput";

    fn decode(reader: &mut WireReader) -> Result<Self, ProtocolError> {
        let dialog = reader.read_i32()?;
        let title = reader.read_string()?;
        let description = reader.read_string()?;
        let max_chars = reader.read_u16()?;
        let multiline = reader.read_bool()?;
        Ok(Self {
            dialog,
            title,
            description,
            max_chars,
            multiline,
        })
    }

    fn encode(&self, writer: &mut WireWriter) -> Result<(), ProtocolError> {
        writer.write_i32(self.dialog);
        writer.write_string(&self.title)?;
        writer.write_string(&self.description)?;
        writer.write_u16(self.max_chars);
        writer.write_bool(self.multiline);
        Ok(())
    }
}

/// A plain message box.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogMessageMsg {
    pub dialog: i32,
    pub title: String,
    pub text: String,
}

impl ServerMessage for DialogMessageMsg {
    const OPCODE: u8 = opcode::DIALOG_MESSAGE;
    const NAME: &'static str = "DialogMessage";

    fn decode(reader: &mut WireReader) -> Result<Self, ProtocolError> {
        let dialog = reader.read_i32()?;
        let title = reader.read_string()?;
        let text = reader.read_string()?;
        Ok(Self {
            dialog,
            title,
            text,
        })
    }

    fn encode(&self, writer: &mut WireWriter) -> Result<(), ProtocolError> {
        writer.write_i32(self.dialog);
        writer.write_string(&self.title)?;
        writer.write_string(&self.text)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloseDialogMsg {
    pub dialog: i32,
}

impl ServerMessage for CloseDialogMsg {
    const OPCODE: u8 = opcode::CLOSE_DIALOG;
    const NAME: &'static str = "CloseDialog";

    fn decode(reader: &mut WireReader) -> Result<Self, ProtocolError> {
        Ok(Self {
            dialog: reader.read_i32()?,
        })
    }

    fn encode(&self, writer: &mut WireWriter) -> Result<(), ProtocolError> {
        writer.write_i32(self.dialog);
        Ok(())
    }
}
