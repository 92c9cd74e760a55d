//! The network reader task.
//!
//! One task per connection reads frames, decodes them, and hands the
//! replies to the update loop over a bounded channel. Arrival order is
//! preserved end to end.
//!
//! | What arrives                | What happens                              |
//! |-----------------------------|-------------------------------------------|
//! | decodable frame             | `Inbound::Reply` sent                     |
//! | unknown opcode / bad layout | `warn`, frame skipped                     |
//! | checksum mismatch           | `warn`, frame skipped                     |
//! | desync / I/O error / close  | `Inbound::Disconnected` sent, task ends   |

use std::sync::Arc;

use lumen_protocol::{ProtocolError, ServerReply, registry};
use lumen_transport::{
    Connection, ConnectionId, Frame, TcpConnection, TransportError, WebSocketConnection,
};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, trace, warn};

use crate::config::{ClientConfig, TransportKind};

/// What the reader task hands to the update loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inbound {
    Reply(ServerReply),
    /// The connection is gone; no more replies will follow.
    Disconnected { reason: String },
}

/// A client connection over either supported transport.
pub enum ServerConnection {
    Tcp(TcpConnection),
    WebSocket(WebSocketConnection),
}

impl ServerConnection {
    /// Opens the connection described by `config`.
    pub async fn open(config: &ClientConfig) -> Result<Self, TransportError> {
        match config.transport {
            TransportKind::Tcp => TcpConnection::connect(config.server.as_str())
                .await
                .map(Self::Tcp),
            TransportKind::WebSocket => WebSocketConnection::connect(&config.server)
                .await
                .map(Self::WebSocket),
        }
    }
}

impl Connection for ServerConnection {
    type Error = TransportError;

    async fn send_frame(&self, frame: &Frame) -> Result<(), Self::Error> {
        match self {
            Self::Tcp(conn) => conn.send_frame(frame).await,
            Self::WebSocket(conn) => conn.send_frame(frame).await,
        }
    }

    async fn recv_frame(&self) -> Result<Option<Frame>, Self::Error> {
        match self {
            Self::Tcp(conn) => conn.recv_frame().await,
            Self::WebSocket(conn) => conn.recv_frame().await,
        }
    }

    async fn close(&self) -> Result<(), Self::Error> {
        match self {
            Self::Tcp(conn) => conn.close().await,
            Self::WebSocket(conn) => conn.close().await,
        }
    }

    fn id(&self) -> ConnectionId {
        match self {
            Self::Tcp(conn) => conn.id(),
            Self::WebSocket(conn) => conn.id(),
        }
    }
}

/// Spawns the reader task for `conn`.
pub fn spawn_reader(conn: Arc<ServerConnection>, sender: mpsc::Sender<Inbound>) -> JoinHandle<()> {
    tokio::spawn(async move { read_frames(conn.as_ref(), sender).await })
}

/// Reads frames from `conn` until it closes or breaks, forwarding decoded
/// replies to `sender`.
pub async fn read_frames<C>(conn: &C, sender: mpsc::Sender<Inbound>)
where
    C: Connection<Error = TransportError>,
{
    let conn_id = conn.id();
    debug!(%conn_id, "reader started");

    let reason = loop {
        let frame = match conn.recv_frame().await {
            Ok(Some(frame)) => frame,
            Ok(None) => {
                info!(%conn_id, "server closed the connection");
                break "connection closed by server".to_string();
            }
            Err(e) if e.is_recoverable() => {
                warn!(%conn_id, error = %e, "dropping corrupted frame");
                continue;
            }
            Err(e @ TransportError::Desync { .. }) => {
                error!(%conn_id, error = %e, "frame stream out of sync");
                break e.to_string();
            }
            Err(e) => {
                info!(%conn_id, error = %e, "connection lost");
                break e.to_string();
            }
        };

        let opcode = frame.opcode;
        match registry().decode(opcode, frame.payload) {
            Ok(reply) => {
                trace!(%conn_id, message = reply.name(), "reply decoded");
                if sender.send(Inbound::Reply(reply)).await.is_err() {
                    debug!(%conn_id, "update loop gone, stopping reader");
                    return;
                }
            }
            Err(ProtocolError::UnknownOpcode(_)) => {
                warn!(%conn_id, opcode = format!("0x{opcode:02X}"), "unknown opcode, skipping frame");
            }
            Err(e) => {
                warn!(
                    %conn_id,
                    opcode = format!("0x{opcode:02X}"),
                    message = registry().name(opcode).unwrap_or("?"),
                    error = %e,
                    "failed to decode frame, skipping"
                );
            }
        }
    };

    let _ = sender.send(Inbound::Disconnected { reason }).await;
}
