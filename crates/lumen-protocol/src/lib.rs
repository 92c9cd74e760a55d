//! Server-reply wire format for Lumen.
//!
//! This crate turns frame payloads into typed messages:
//!
//! - **Reader/Writer** ([`WireReader`], [`WireWriter`]): a forward-only
//!   big-endian cursor and its mirror image.
//! - **Types** ([`Location`], [`CharacterId`], [`Direction`], …): the
//!   domain values that appear inside messages.
//! - **Messages** ([`ServerReply`] and one struct per opcode): each knows
//!   how to decode itself.
//! - **Registry** ([`registry()`]): opcode → decoder, built once.
//!
//! # Architecture
//!
//! ```text
//! Transport (frames) → Protocol (ServerReply) → Dispatcher (world state)
//! ```
//!
//! Decoding is pure: nothing in this crate knows about world state.

mod error;
pub mod messages;
pub mod opcode;
mod reader;
mod registry;
mod types;
mod writer;

pub use error::ProtocolError;
pub use messages::{ServerMessage, ServerReply};
pub use reader::WireReader;
pub use registry::{registry, Registry};
pub use types::{
    CharacterId, Direction, InformKind, ItemCount, ItemId, ItemStack, Location, MoveMode,
    StripeDirection, TalkMode, TileUpdate,
};
pub use writer::WireWriter;
