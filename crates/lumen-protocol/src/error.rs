//! Error types for the protocol layer.
//!
//! Everything that can go wrong while turning a frame payload into a
//! [`ServerReply`](crate::ServerReply) (or back) ends up here. None of these
//! errors are fatal to a connection on their own: the transport frames
//! every message with its length, so a bad payload only costs that one
//! message.

/// Errors that can occur while reading or writing the wire format.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProtocolError {
    /// The payload ended before a read completed.
    ///
    /// `needed` is the size of the read that was attempted, `remaining` is
    /// how many bytes were left in the payload at that point.
    #[error("unexpected end of payload: needed {needed} bytes, {remaining} remaining")]
    UnexpectedEof { needed: usize, remaining: usize },

    /// A length-prefixed string did not contain valid UTF-8.
    #[error("string field is not valid UTF-8")]
    InvalidUtf8,

    /// A byte that should select an enum value was out of range.
    #[error("invalid value {value} for {field}")]
    InvalidValue { field: &'static str, value: i64 },

    /// No message is registered for this opcode.
    ///
    /// Usually means client and server speak different protocol versions.
    /// Callers skip the frame and carry on.
    #[error("unknown opcode 0x{0:02X}")]
    UnknownOpcode(u8),

    /// A message decoded successfully but left bytes unread.
    ///
    /// The server's encoder and our decoder disagree on the layout, so the
    /// decoded values can't be trusted.
    #[error("{message} left {remaining} trailing bytes")]
    TrailingBytes {
        message: &'static str,
        remaining: usize,
    },

    /// A string is too long for its u16 length prefix.
    #[error("string of {0} bytes exceeds the u16 length prefix")]
    StringTooLong(usize),

    /// A repeated field holds more entries than its u8 count prefix allows.
    #[error("{field} has {len} entries, at most 255 fit on the wire")]
    TooManyEntries { field: &'static str, len: usize },
}
