//! Mirror image of [`WireReader`](crate::WireReader).
//!
//! The client never sends server replies, but test servers and the
//! framing layer need to produce them byte-for-byte.

use bytes::{BufMut, Bytes, BytesMut};

use crate::types::{CharacterId, Direction, Location};
use crate::ProtocolError;

/// Big-endian writer that appends to a growable buffer.
#[derive(Debug, Default)]
pub struct WireWriter {
    buf: BytesMut,
}

impl WireWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn write_u8(&mut self, value: u8) {
        self.buf.put_u8(value);
    }

    pub fn write_i8(&mut self, value: i8) {
        self.buf.put_i8(value);
    }

    pub fn write_u16(&mut self, value: u16) {
        self.buf.put_u16(value);
    }

    pub fn write_i16(&mut self, value: i16) {
        self.buf.put_i16(value);
    }

    pub fn write_u32(&mut self, value: u32) {
        self.buf.put_u32(value);
    }

    pub fn write_i32(&mut self, value: i32) {
        self.buf.put_i32(value);
    }

    pub fn write_bool(&mut self, value: bool) {
        self.buf.put_u8(u8::from(value));
    }

    /// Writes a u16 length prefix followed by the UTF-8 bytes.
    ///
    /// # Errors
    /// [`ProtocolError::StringTooLong`] if the string does not fit the prefix.
    pub fn write_string(&mut self, value: &str) -> Result<(), ProtocolError> {
        let len = u16::try_from(value.len())
            .map_err(|_| ProtocolError::StringTooLong(value.len()))?;
        self.buf.put_u16(len);
        self.buf.put_slice(value.as_bytes());
        Ok(())
    }

    pub fn write_location(&mut self, location: Location) {
        self.buf.put_i16(location.x);
        self.buf.put_i16(location.y);
        self.buf.put_i16(location.z);
    }

    pub fn write_character_id(&mut self, id: CharacterId) {
        self.buf.put_u32(id.0);
    }

    pub fn write_direction(&mut self, direction: Direction) {
        self.buf.put_u8(direction as u8);
    }

    /// Writes a u8 count prefix for a repeated field.
    ///
    /// # Errors
    /// [`ProtocolError::TooManyEntries`] if `len` exceeds 255.
    pub fn write_count(
        &mut self,
        field: &'static str,
        len: usize,
    ) -> Result<(), ProtocolError> {
        let count = u8::try_from(len)
            .map_err(|_| ProtocolError::TooManyEntries { field, len })?;
        self.buf.put_u8(count);
        Ok(())
    }

    /// Consumes the writer and returns the encoded bytes.
    pub fn finish(self) -> Bytes {
        self.buf.freeze()
    }
}
