//! Opcode → decoder lookup.
//!
//! The registry is a 256-slot table filled once, the first time anyone
//! asks for it, by registering every [`ServerMessage`] type. After that it
//! is never written again, so concurrent lookups need no locking.

use std::sync::LazyLock;

use bytes::Bytes;

use crate::messages::{self, ServerMessage, ServerReply};
use crate::{ProtocolError, WireReader};

type DecodeFn = fn(&mut WireReader) -> Result<ServerReply, ProtocolError>;

#[derive(Clone, Copy)]
struct Entry {
    name: &'static str,
    decode: DecodeFn,
}

/// Maps each opcode to the decoder of its message type.
pub struct Registry {
    entries: [Option<Entry>; 256],
}

static REGISTRY: LazyLock<Registry> = LazyLock::new(Registry::with_all_messages);

/// The process-wide registry holding every known message.
pub fn registry() -> &'static Registry {
    &REGISTRY
}

fn decode_as<M: ServerMessage>(reader: &mut WireReader) -> Result<ServerReply, ProtocolError> {
    M::decode(reader).map(Into::into)
}

impl Registry {
    fn empty() -> Self {
        Self {
            entries: [None; 256],
        }
    }

    fn with_all_messages() -> Self {
        let mut registry = Self::empty();
        messages::register_all(&mut registry);
        registry
    }

    /// Adds `M` under its opcode.
    ///
    /// # Panics
    /// If another message already claimed the opcode. That is a bug in the
    /// message list, caught the first time the registry is built.
    pub(crate) fn register<M: ServerMessage>(&mut self) {
        let slot = &mut self.entries[usize::from(M::OPCODE)];
        if let Some(existing) = slot {
            panic!(
                "opcode 0x{:02X} registered twice ({} and {})",
                M::OPCODE,
                existing.name,
                M::NAME
            );
        }
        *slot = Some(Entry {
            name: M::NAME,
            decode: decode_as::<M>,
        });
    }

    /// `true` if a decoder exists for `opcode`.
    pub fn contains(&self, opcode: u8) -> bool {
        self.entries[usize::from(opcode)].is_some()
    }

    /// Name of the message registered for `opcode`.
    pub fn name(&self, opcode: u8) -> Option<&'static str> {
        self.entries[usize::from(opcode)].map(|e| e.name)
    }

    /// All registered opcodes in ascending order.
    pub fn opcodes(&self) -> impl Iterator<Item = u8> + '_ {
        (0..=u8::MAX).filter(|op| self.contains(*op))
    }

    /// Number of registered messages.
    pub fn len(&self) -> usize {
        self.entries.iter().flatten().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Decodes one frame payload.
    ///
    /// The whole payload must be consumed: leftover bytes mean our layout
    /// and the server's disagree.
    ///
    /// # Errors
    /// - [`ProtocolError::UnknownOpcode`] if nothing is registered for
    ///   `opcode`. Recoverable; skip the frame.
    /// - Any decode error from the message, or
    ///   [`ProtocolError::TrailingBytes`].
    pub fn decode(&self, opcode: u8, payload: impl Into<Bytes>) -> Result<ServerReply, ProtocolError> {
        let entry = self.entries[usize::from(opcode)].ok_or(ProtocolError::UnknownOpcode(opcode))?;
        let mut reader = WireReader::new(payload);
        let reply = (entry.decode)(&mut reader)?;
        if !reader.is_empty() {
            return Err(ProtocolError::TrailingBytes {
                message: entry.name,
                remaining: reader.remaining(),
            });
        }
        Ok(reply)
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map()
            .entries(
                self.entries
                    .iter()
                    .enumerate()
                    .filter_map(|(op, e)| e.map(|e| (format!("0x{op:02X}"), e.name))),
            )
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::{AttackMsg, PlayerIdMsg};
    use crate::{opcode, CharacterId};

    #[test]
    fn test_every_message_is_registered() {
        assert_eq!(registry().len(), 30);
        assert_eq!(registry().name(opcode::MAP_STRIPE), Some("MapStripe"));
        assert!(registry().contains(opcode::ATTACK));
    }

    #[test]
    fn test_opcodes_are_ascending() {
        let ops: Vec<u8> = registry().opcodes().collect();
        let mut sorted = ops.clone();
        sorted.sort_unstable();
        assert_eq!(ops, sorted);
        assert_eq!(ops.len(), registry().len());
    }

    #[test]
    fn test_unknown_opcode_is_reported() {
        assert!(!registry().contains(0x00));
        assert_eq!(
            registry().decode(0x00, Bytes::new()).unwrap_err(),
            ProtocolError::UnknownOpcode(0x00)
        );
    }

    #[test]
    fn test_decode_selects_message_by_opcode() {
        let reply = registry()
            .decode(opcode::PLAYER_ID, vec![0, 0, 0, 42])
            .unwrap();
        assert_eq!(
            reply,
            ServerReply::PlayerId(PlayerIdMsg { id: CharacterId(42) })
        );
    }

    #[test]
    fn test_trailing_bytes_are_rejected() {
        let err = registry().decode(opcode::ATTACK, vec![1]).unwrap_err();
        assert_eq!(
            err,
            ProtocolError::TrailingBytes {
                message: "Attack",
                remaining: 1
            }
        );
    }

    #[test]
    #[should_panic(expected = "registered twice")]
    fn test_duplicate_registration_panics() {
        let mut registry = Registry::empty();
        registry.register::<AttackMsg>();
        registry.register::<AttackMsg>();
    }
}
