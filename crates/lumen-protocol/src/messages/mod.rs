//! Every server reply the client understands.
//!
//! Each message is its own struct implementing [`ServerMessage`]: it knows
//! its opcode and reads (or writes) its fields in wire order. The sum type
//! [`ServerReply`] wraps all of them so the dispatcher can hold any decoded
//! message in one queue.
//!
//! A message value only comes into existence through a successful
//! `decode` (or explicit construction), so there is no "not decoded yet"
//! state to guard against at runtime.

use bytes::Bytes;

use crate::{ProtocolError, WireReader, WireWriter};

mod character;
mod combat;
mod environment;
mod interface;
mod map;
mod player;
mod session;

pub use character::{AttributeMsg, LookAtCharMsg, MoveCharMsg, RemoveCharMsg, TurnCharMsg};
pub use combat::{AttackMsg, TargetLostMsg};
pub use environment::{DateTimeMsg, GraphicEffectMsg, MusicMsg, SoundEffectMsg, WeatherMsg};
pub use interface::{
    CloseDialogMsg, DialogInputMsg, DialogMessageMsg, InformMsg, QuestAbandonMsg,
    QuestProgressMsg, TalkMsg,
};
pub use map::{ItemPutMsg, ItemRemoveMsg, LookAtTileMsg, MapCompleteMsg, MapStripeMsg};
pub use player::{InventoryMsg, MagicFlagMsg, SkillMsg};
pub use session::{LocationMsg, LogoutMsg, PlayerIdMsg};

/// A message the server sends, identified by a fixed opcode.
///
/// `decode` must read exactly the fields `encode` writes, in the same
/// order. It must not look at anything except the reader.
pub trait ServerMessage: Sized + Into<ServerReply> {
    /// Frame opcode selecting this message.
    const OPCODE: u8;
    /// Short name used in logs.
    const NAME: &'static str;

    /// Reads the message's fields from the payload.
    ///
    /// # Errors
    /// Any [`ProtocolError`] from the reader, or `InvalidValue` for
    /// out-of-range enum bytes.
    fn decode(reader: &mut WireReader) -> Result<Self, ProtocolError>;

    /// Writes the message's fields in wire order.
    ///
    /// # Errors
    /// `StringTooLong` / `TooManyEntries` if a field can't be represented.
    fn encode(&self, writer: &mut WireWriter) -> Result<(), ProtocolError>;
}

/// Declares [`ServerReply`] and the per-variant plumbing from one list, so
/// adding a message is a single line here plus its struct.
macro_rules! server_replies {
    ($($variant:ident($msg:ty)),+ $(,)?) => {
        /// Any decoded server reply.
        #[derive(Debug, Clone, PartialEq, Eq)]
        pub enum ServerReply {
            $($variant($msg),)+
        }

        impl ServerReply {
            /// Opcode this reply is framed with.
            pub fn opcode(&self) -> u8 {
                match self {
                    $(Self::$variant(_) => <$msg as ServerMessage>::OPCODE,)+
                }
            }

            /// Short name for logs.
            pub fn name(&self) -> &'static str {
                match self {
                    $(Self::$variant(_) => <$msg as ServerMessage>::NAME,)+
                }
            }

            /// Encodes the reply into `(opcode, payload)`.
            ///
            /// # Errors
            /// See [`ServerMessage::encode`].
            pub fn encode(&self) -> Result<(u8, Bytes), ProtocolError> {
                let mut writer = WireWriter::new();
                match self {
                    $(Self::$variant(msg) => msg.encode(&mut writer)?,)+
                }
                Ok((self.opcode(), writer.finish()))
            }
        }

        $(
            impl From<$msg> for ServerReply {
                fn from(msg: $msg) -> Self {
                    Self::$variant(msg)
                }
            }
        )+

        /// Registers every message type listed above.
        pub(crate) fn register_all(registry: &mut crate::registry::Registry) {
            $(registry.register::<$msg>();)+
        }
    };
}

server_replies! {
    PlayerId(PlayerIdMsg),
    Location(LocationMsg),
    Logout(LogoutMsg),
    Attack(AttackMsg),
    TargetLost(TargetLostMsg),
    Attribute(AttributeMsg),
    TurnChar(TurnCharMsg),
    MoveChar(MoveCharMsg),
    RemoveChar(RemoveCharMsg),
    LookAtChar(LookAtCharMsg),
    MapStripe(MapStripeMsg),
    MapComplete(MapCompleteMsg),
    ItemPut(ItemPutMsg),
    ItemRemove(ItemRemoveMsg),
    LookAtTile(LookAtTileMsg),
    Skill(SkillMsg),
    Inventory(InventoryMsg),
    MagicFlag(MagicFlagMsg),
    Talk(TalkMsg),
    Inform(InformMsg),
    QuestProgress(QuestProgressMsg),
    QuestAbandon(QuestAbandonMsg),
    DialogInput(DialogInputMsg),
    DialogMessage(DialogMessageMsg),
    CloseDialog(CloseDialogMsg),
    Weather(WeatherMsg),
    DateTime(DateTimeMsg),
    Music(MusicMsg),
    SoundEffect(SoundEffectMsg),
    GraphicEffect(GraphicEffectMsg),
}
