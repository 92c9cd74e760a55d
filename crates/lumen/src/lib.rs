//! # Lumen
//!
//! Server-reply decoding and dispatch for an MMO client.
//!
//! Frames come off a TCP or WebSocket connection, get decoded into typed
//! [`ServerReply`](lumen_protocol::ServerReply) values on a reader task,
//! and are applied to the client's [`World`](lumen_world::World) once per
//! frame by the update loop. Replies that arrive before the world is ready
//! for them are retried on later frames.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use lumen::prelude::*;
//!
//! # async fn example() -> Result<(), LumenError> {
//! let config = ClientConfig::load("lumen.json")?;
//! lumen::logging::init(&config.log_filter);
//!
//! let mut client = ClientRuntime::connect(&config, GameWorld::new()).await?;
//! client.run().await;
//! # Ok(())
//! # }
//! ```

mod client;
mod config;
mod dispatch;
mod error;
mod execute;
pub mod logging;
mod network;

pub use client::{ClientRuntime, FrameReport};
pub use config::{ClientConfig, TransportKind};
pub use dispatch::{DispatchOutcome, DispatchStats, Dispatcher, RetryPolicy, RetryReport};
pub use error::LumenError;
pub use execute::{ExecContext, Execute, ExecutionResult};
pub use network::{Inbound, ServerConnection, read_frames, spawn_reader};

pub mod prelude {
    pub use crate::{
        ClientConfig, ClientRuntime, DispatchOutcome, Dispatcher, ExecContext, Execute,
        ExecutionResult, FrameReport, Inbound, LumenError, RetryPolicy, TransportKind,
    };
    pub use lumen_protocol::ServerReply;
    pub use lumen_update::{FrameConfig, UpdateConfig, UpdateTaskManager};
    pub use lumen_world::{GameWorld, World};
}
