//! Unified error type for Lumen.

use std::path::PathBuf;

use lumen_protocol::ProtocolError;
use lumen_transport::TransportError;
use lumen_world::WorldError;

/// Top-level error that wraps all crate-specific errors.
///
/// The `#[from]` attribute on each variant generates a `From` impl, so `?`
/// converts sub-crate errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum LumenError {
    /// Connection, framing, send or receive failure.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A payload that doesn't match its message layout.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// An update that doesn't fit the current world state.
    #[error(transparent)]
    World(#[from] WorldError),

    /// The config file couldn't be read.
    #[error("failed to read config {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The config file isn't valid JSON for [`ClientConfig`](crate::ClientConfig).
    #[error("invalid config: {0}")]
    ConfigParse(#[from] serde_json::Error),
}
