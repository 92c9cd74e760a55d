/// Errors that can occur in the transport layer.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The connection was closed.
    #[error("connection closed: {0}")]
    ConnectionClosed(String),

    /// Sending data failed.
    #[error("send failed: {0}")]
    SendFailed(#[source] std::io::Error),

    /// Receiving data failed.
    #[error("receive failed: {0}")]
    ReceiveFailed(#[source] std::io::Error),

    /// Binding or accepting connections failed.
    #[error("accept failed: {0}")]
    AcceptFailed(#[source] std::io::Error),

    /// Opening an outgoing connection failed.
    #[error("connect failed: {0}")]
    ConnectFailed(#[source] std::io::Error),

    /// A frame header failed its opcode check byte.
    ///
    /// The reader no longer knows where frames start. Not recoverable:
    /// the connection has to be torn down.
    #[error("stream desynchronised: opcode 0x{opcode:02X} with check byte 0x{check:02X}")]
    Desync { opcode: u8, check: u8 },

    /// A frame arrived intact but its payload checksum is wrong.
    ///
    /// The stream is still aligned, so only this frame is lost.
    #[error("checksum mismatch on opcode 0x{opcode:02X}: header says {expected:#06X}, payload sums to {actual:#06X}")]
    Checksum {
        opcode: u8,
        expected: u16,
        actual: u16,
    },

    /// A payload does not fit the u16 length field.
    #[error("payload of {0} bytes exceeds the frame limit")]
    FrameTooLarge(usize),

    /// The transport was shut down.
    #[error("transport shut down")]
    Shutdown,
}

impl TransportError {
    /// `true` if reading may continue on the same connection.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Checksum { .. })
    }
}
