//! Forward-only cursor over a frame payload.
//!
//! Every read either consumes exactly the bytes it needs and returns the
//! value, or fails with [`ProtocolError::UnexpectedEof`] and leaves the
//! cursor where it was. There is no seeking and no peeking: messages read
//! their fields strictly in wire order.

use bytes::{Buf, Bytes};

use crate::types::{CharacterId, Direction, Location};
use crate::ProtocolError;

/// Sequential big-endian reader over one message payload.
#[derive(Debug, Clone)]
pub struct WireReader {
    buf: Bytes,
}

impl WireReader {
    /// Creates a reader positioned at the start of `payload`.
    pub fn new(payload: impl Into<Bytes>) -> Self {
        Self {
            buf: payload.into(),
        }
    }

    /// Number of bytes not consumed yet.
    pub fn remaining(&self) -> usize {
        self.buf.remaining()
    }

    /// `true` once every byte has been consumed.
    pub fn is_empty(&self) -> bool {
        !self.buf.has_remaining()
    }

    fn ensure(&self, needed: usize) -> Result<(), ProtocolError> {
        let remaining = self.buf.remaining();
        if remaining < needed {
            return Err(ProtocolError::UnexpectedEof { needed, remaining });
        }
        Ok(())
    }

    pub fn read_u8(&mut self) -> Result<u8, ProtocolError> {
        self.ensure(1)?;
        Ok(self.buf.get_u8())
    }

    pub fn read_i8(&mut self) -> Result<i8, ProtocolError> {
        self.ensure(1)?;
        Ok(self.buf.get_i8())
    }

    pub fn read_u16(&mut self) -> Result<u16, ProtocolError> {
        self.ensure(2)?;
        Ok(self.buf.get_u16())
    }

    pub fn read_i16(&mut self) -> Result<i16, ProtocolError> {
        self.ensure(2)?;
        Ok(self.buf.get_i16())
    }

    pub fn read_u32(&mut self) -> Result<u32, ProtocolError> {
        self.ensure(4)?;
        Ok(self.buf.get_u32())
    }

    pub fn read_i32(&mut self) -> Result<i32, ProtocolError> {
        self.ensure(4)?;
        Ok(self.buf.get_i32())
    }

    /// A single byte; any non-zero value is `true`.
    pub fn read_bool(&mut self) -> Result<bool, ProtocolError> {
        Ok(self.read_u8()? != 0)
    }

    /// A u16 byte length followed by that many bytes of UTF-8.
    ///
    /// If the string body is truncated, the length prefix is not consumed
    /// either.
    pub fn read_string(&mut self) -> Result<String, ProtocolError> {
        self.ensure(2)?;
        let len = usize::from(u16::from_be_bytes([self.buf[0], self.buf[1]]));
        let remaining = self.buf.remaining() - 2;
        if remaining < len {
            return Err(ProtocolError::UnexpectedEof {
                needed: len,
                remaining,
            });
        }
        self.buf.advance(2);
        let raw = self.buf.split_to(len);
        String::from_utf8(raw.to_vec()).map_err(|_| ProtocolError::InvalidUtf8)
    }

    /// Three signed 16-bit components: x, y, z.
    pub fn read_location(&mut self) -> Result<Location, ProtocolError> {
        self.ensure(6)?;
        let x = self.buf.get_i16();
        let y = self.buf.get_i16();
        let z = self.buf.get_i16();
        Ok(Location::new(x, y, z))
    }

    pub fn read_character_id(&mut self) -> Result<CharacterId, ProtocolError> {
        self.read_u32().map(CharacterId)
    }

    /// One byte in `0..=7`.
    pub fn read_direction(&mut self) -> Result<Direction, ProtocolError> {
        self.ensure(1)?;
        let raw = self.buf[0];
        let direction = Direction::try_from(raw)?;
        self.buf.advance(1);
        Ok(direction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_big_endian_integers_in_order() {
        let mut r = WireReader::new(vec![
            0x01, // u8
            0xFF, // i8 -1
            0x12, 0x34, // u16
            0xFF, 0xFE, // i16 -2
            0x00, 0x00, 0x01, 0x00, // u32 256
            0xFF, 0xFF, 0xFF, 0x9C, // i32 -100
        ]);
        assert_eq!(r.read_u8().unwrap(), 1);
        assert_eq!(r.read_i8().unwrap(), -1);
        assert_eq!(r.read_u16().unwrap(), 0x1234);
        assert_eq!(r.read_i16().unwrap(), -2);
        assert_eq!(r.read_u32().unwrap(), 256);
        assert_eq!(r.read_i32().unwrap(), -100);
        assert!(r.is_empty());
    }

    #[test]
    fn test_short_read_reports_eof_and_keeps_position() {
        let mut r = WireReader::new(vec![0xAB]);
        let err = r.read_u16().unwrap_err();
        assert_eq!(
            err,
            ProtocolError::UnexpectedEof {
                needed: 2,
                remaining: 1
            }
        );
        // The failed read consumed nothing.
        assert_eq!(r.remaining(), 1);
        assert_eq!(r.read_u8().unwrap(), 0xAB);
    }

    #[test]
    fn test_read_string() {
        let mut r = WireReader::new(vec![0x00, 0x05, b'h', b'e', b'l', b'l', b'o']);
        assert_eq!(r.read_string().unwrap(), "hello");
        assert!(r.is_empty());
    }

    #[test]
    fn test_read_empty_string() {
        let mut r = WireReader::new(vec![0x00, 0x00]);
        assert_eq!(r.read_string().unwrap(), "");
    }

    #[test]
    fn test_truncated_string_body_does_not_consume_prefix() {
        let mut r = WireReader::new(vec![0x00, 0x04, b'a', b'b']);
        let err = r.read_string().unwrap_err();
        assert_eq!(
            err,
            ProtocolError::UnexpectedEof {
                needed: 4,
                remaining: 2
            }
        );
        assert_eq!(r.remaining(), 4);
    }

    #[test]
    fn test_invalid_utf8_string() {
        let mut r = WireReader::new(vec![0x00, 0x02, 0xC3, 0x28]);
        assert_eq!(r.read_string().unwrap_err(), ProtocolError::InvalidUtf8);
    }

    #[test]
    fn test_read_location() {
        let mut r = WireReader::new(vec![0x00, 0x0A, 0xFF, 0xF6, 0x00, 0x02]);
        assert_eq!(r.read_location().unwrap(), Location::new(10, -10, 2));
    }

    #[test]
    fn test_read_direction_rejects_out_of_range() {
        let mut r = WireReader::new(vec![8]);
        assert_eq!(
            r.read_direction().unwrap_err(),
            ProtocolError::InvalidValue {
                field: "direction",
                value: 8
            }
        );
        assert_eq!(r.remaining(), 1);
    }

    #[test]
    fn test_read_bool_treats_nonzero_as_true() {
        let mut r = WireReader::new(vec![0, 1, 7]);
        assert!(!r.read_bool().unwrap());
        assert!(r.read_bool().unwrap());
        assert!(r.read_bool().unwrap());
    }
}
