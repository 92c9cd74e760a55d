//! Frame layout shared by every transport.
//!
//! ```text
//! ┌────────┬──────────────┬────────────┬────────────┬──────────────┐
//! │ opcode │ opcode ^ 0xFF │ length u16 │ crc u16    │ payload …    │
//! └────────┴──────────────┴────────────┴────────────┴──────────────┘
//! ```
//!
//! The length field frames each message independently of its contents,
//! so a payload the protocol layer can't decode never misaligns the
//! stream. The check byte catches a misaligned stream; the checksum
//! catches a corrupted payload.

use bytes::{BufMut, Bytes, BytesMut};

use crate::TransportError;

/// Size of the fixed frame header in bytes.
pub const HEADER_LEN: usize = 6;

/// Largest payload a frame can carry.
pub const MAX_PAYLOAD: usize = u16::MAX as usize;

/// One opcode and its raw payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub opcode: u8,
    pub payload: Bytes,
}

/// A parsed frame header, before the payload has been read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHeader {
    pub opcode: u8,
    pub length: u16,
    pub checksum: u16,
}

/// Sum of all payload bytes modulo 0xFFFF.
pub fn checksum(payload: &[u8]) -> u16 {
    let sum: u32 = payload.iter().map(|b| u32::from(*b)).sum();
    (sum % 0xFFFF) as u16
}

impl FrameHeader {
    /// Parses and validates the six header bytes.
    ///
    /// # Errors
    /// [`TransportError::Desync`] if the check byte doesn't match.
    pub fn parse(raw: [u8; HEADER_LEN]) -> Result<Self, TransportError> {
        let opcode = raw[0];
        let check = raw[1];
        if check != opcode ^ 0xFF {
            return Err(TransportError::Desync { opcode, check });
        }
        Ok(Self {
            opcode,
            length: u16::from_be_bytes([raw[2], raw[3]]),
            checksum: u16::from_be_bytes([raw[4], raw[5]]),
        })
    }

    /// Checks a payload read for this header.
    ///
    /// # Errors
    /// [`TransportError::Checksum`] if the payload doesn't sum to the
    /// header's checksum.
    pub fn verify(&self, payload: &[u8]) -> Result<(), TransportError> {
        let actual = checksum(payload);
        if actual != self.checksum {
            return Err(TransportError::Checksum {
                opcode: self.opcode,
                expected: self.checksum,
                actual,
            });
        }
        Ok(())
    }
}

impl Frame {
    pub fn new(opcode: u8, payload: impl Into<Bytes>) -> Self {
        Self {
            opcode,
            payload: payload.into(),
        }
    }

    /// Header plus payload, ready to write to a stream.
    ///
    /// # Errors
    /// [`TransportError::FrameTooLarge`] if the payload exceeds
    /// [`MAX_PAYLOAD`].
    pub fn to_bytes(&self) -> Result<Bytes, TransportError> {
        let length = u16::try_from(self.payload.len())
            .map_err(|_| TransportError::FrameTooLarge(self.payload.len()))?;
        let mut out = BytesMut::with_capacity(HEADER_LEN + self.payload.len());
        out.put_u8(self.opcode);
        out.put_u8(self.opcode ^ 0xFF);
        out.put_u16(length);
        out.put_u16(checksum(&self.payload));
        out.put_slice(&self.payload);
        Ok(out.freeze())
    }

    /// Parses a complete frame from one buffer, as delivered by
    /// message-oriented transports.
    ///
    /// # Errors
    /// `ReceiveFailed` for a buffer shorter than a header, `Desync` for a
    /// bad header or a length that disagrees with the buffer, `Checksum`
    /// for a corrupted payload.
    pub fn from_bytes(raw: &[u8]) -> Result<Self, TransportError> {
        let Some((head, payload)) = raw.split_first_chunk::<HEADER_LEN>() else {
            return Err(TransportError::ReceiveFailed(std::io::Error::new(
                std::io::ErrorKind::UnexpectedEof,
                format!("short frame of {} bytes", raw.len()),
            )));
        };
        let header = FrameHeader::parse(*head)?;
        if usize::from(header.length) != payload.len() {
            return Err(TransportError::Desync {
                opcode: header.opcode,
                check: head[1],
            });
        }
        header.verify(payload)?;
        Ok(Self::new(header.opcode, Bytes::copy_from_slice(payload)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_layout() {
        let frame = Frame::new(0xCA, vec![0, 0, 0, 42]);
        let bytes = frame.to_bytes().unwrap();
        assert_eq!(&bytes[..HEADER_LEN], &[0xCA, 0x35, 0x00, 0x04, 0x00, 42]);
        assert_eq!(&bytes[HEADER_LEN..], &[0, 0, 0, 42]);
    }

    #[test]
    fn test_bad_check_byte_is_desync() {
        let err = FrameHeader::parse([0xCA, 0x00, 0, 0, 0, 0]).unwrap_err();
        assert!(matches!(err, TransportError::Desync { opcode: 0xCA, .. }));
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_checksum_mismatch_is_recoverable() {
        let header = FrameHeader::parse([0xBB, 0x44, 0, 1, 0, 9]).unwrap();
        let err = header.verify(&[8]).unwrap_err();
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_checksum_wraps_modulo_ffff() {
        let payload = vec![0xFF; 258];
        // 258 * 255 = 65790 = 0xFFFF + 255
        assert_eq!(checksum(&payload), 255);
    }

    #[test]
    fn test_from_bytes_parses_whole_frame() {
        let frame = Frame::new(0xA2, Bytes::new());
        let parsed = Frame::from_bytes(&frame.to_bytes().unwrap()).unwrap();
        assert_eq!(parsed, frame);
    }

    #[test]
    fn test_from_bytes_rejects_length_mismatch() {
        let mut raw = Frame::new(0xB2, vec![0, 4]).to_bytes().unwrap().to_vec();
        raw.push(0);
        assert!(matches!(
            Frame::from_bytes(&raw),
            Err(TransportError::Desync { .. })
        ));
    }

    #[test]
    fn test_oversized_payload_is_rejected() {
        let frame = Frame::new(0x01, vec![0; MAX_PAYLOAD + 1]);
        assert!(matches!(
            frame.to_bytes(),
            Err(TransportError::FrameTooLarge(_))
        ));
    }
}
