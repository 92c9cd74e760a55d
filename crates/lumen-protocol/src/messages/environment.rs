//! Weather, game clock, music, and one-shot effects.

use crate::messages::ServerMessage;
use crate::types::Location;
use crate::{opcode, ProtocolError, WireReader, WireWriter};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeatherMsg {
    pub cloud_density: u8,
    pub fog_density: u8,
    /// Negative values blow west.
    pub wind: i8,
    pub gust_strength: u8,
    pub precipitation_strength: u8,
    pub precipitation_type: u8,
    /// Degrees Celsius.
    pub temperature: i8,
}

impl ServerMessage for WeatherMsg {
    const OPCODE: u8 = opcode::WEATHER;
    const NAME: &'static str = "Weather";

    fn decode(reader: &mut WireReader) -> Result<Self, ProtocolError> {
        Ok(Self {
            cloud_density: reader.read_u8()?,
            fog_density: reader.read_u8()?,
            wind: reader.read_i8()?,
            gust_strength: reader.read_u8()?,
            precipitation_strength: reader.read_u8()?,
            precipitation_type: reader.read_u8()?,
            temperature: reader.read_i8()?,
        })
    }

    fn encode(&self, writer: &mut WireWriter) -> Result<(), ProtocolError> {
        writer.write_u8(self.cloud_density);
        writer.write_u8(self.fog_density);
        writer.write_i8(self.wind);
        writer.write_u8(self.gust_strength);
        writer.write_u8(self.precipitation_strength);
        writer.write_u8(self.precipitation_type);
        writer.write_i8(self.temperature);
        Ok(())
    }
}

/// In-game calendar time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateTimeMsg {
    pub year: u16,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
}

impl ServerMessage for DateTimeMsg {
    const OPCODE: u8 = opcode::DATE_TIME;
    const NAME: &'static str = "DateTime";

    fn decode(reader: &mut WireReader) -> Result<Self, ProtocolError> {
        Ok(Self {
            year: reader.read_u16()?,
            month: reader.read_u8()?,
            day: reader.read_u8()?,
            hour: reader.read_u8()?,
            minute: reader.read_u8()?,
        })
    }

    fn encode(&self, writer: &mut WireWriter) -> Result<(), ProtocolError> {
        writer.write_u16(self.year);
        writer.write_u8(self.month);
        writer.write_u8(self.day);
        writer.write_u8(self.hour);
        writer.write_u8(self.minute);
        Ok(())
    }
}

/// Background music to play. Song 0 means silence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MusicMsg {
    pub song: u16,
}

impl ServerMessage for MusicMsg {
    const OPCODE: u8 = opcode::MUSIC;
    const NAME: &'static str = "Music";

    fn decode(reader: &mut WireReader) -> Result<Self, ProtocolError> {
        Ok(Self {
            song: reader.read_u16()?,
        })
    }

    fn encode(&self, writer: &mut WireWriter) -> Result<(), ProtocolError> {
        writer.write_u16(self.song);
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoundEffectMsg {
    pub location: Location,
    pub sound: u16,
}

impl ServerMessage for SoundEffectMsg {
    const OPCODE: u8 = opcode::SOUND_EFFECT;
    const NAME: &'static str = "SoundEffect";

    fn decode(reader: &mut WireReader) -> Result<Self, ProtocolError> {
        let location = reader.read_location()?;
        let sound = reader.read_u16()?;
        Ok(Self { location, sound })
    }

    fn encode(&self, writer: &mut WireWriter) -> Result<(), ProtocolError> {
        writer.write_location(self.location);
        writer.write_u16(self.sound);
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphicEffectMsg {
    pub location: Location,
    pub effect: u16,
}

impl ServerMessage for GraphicEffectMsg {
    const OPCODE: u8 = opcode::GRAPHIC_EFFECT;
    const NAME: &'static str = "GraphicEffect";

    fn decode(reader: &mut WireReader) -> Result<Self, ProtocolError> {
        let location = reader.read_location()?;
        let effect = reader.read_u16()?;
        Ok(Self { location, effect })
    }

    fn encode(&self, writer: &mut WireWriter) -> Result<(), ProtocolError> {
        writer.write_location(self.location);
        writer.write_u16(self.effect);
        Ok(())
    }
}
