//! Opcodes of every server reply the client understands.
//!
//! The value is the first byte of a frame header. Changing a value here
//! is a protocol break, not a refactor.

pub const PLAYER_ID: u8 = 0xCA;
pub const LOCATION: u8 = 0xBD;
pub const LOGOUT: u8 = 0xCC;

pub const ATTACK: u8 = 0xBB;
pub const TARGET_LOST: u8 = 0xBE;

pub const ATTRIBUTE: u8 = 0xBA;
pub const TURN_CHAR: u8 = 0xE0;
pub const MOVE_CHAR: u8 = 0xDF;
pub const REMOVE_CHAR: u8 = 0xE2;
pub const LOOK_AT_CHAR: u8 = 0xD8;

pub const MAP_STRIPE: u8 = 0xA1;
pub const MAP_COMPLETE: u8 = 0xA2;
pub const ITEM_PUT: u8 = 0xC4;
pub const ITEM_REMOVE: u8 = 0xC5;
pub const LOOK_AT_TILE: u8 = 0xD9;

pub const SKILL: u8 = 0xC1;
pub const INVENTORY: u8 = 0xC2;
pub const MAGIC_FLAG: u8 = 0xC3;

pub const TALK: u8 = 0xD7;
pub const INFORM: u8 = 0xB5;
pub const QUEST_PROGRESS: u8 = 0xB6;
pub const QUEST_ABANDON: u8 = 0xB7;
pub const DIALOG_INPUT: u8 = 0xB8;
pub const DIALOG_MESSAGE: u8 = 0xB9;
pub const CLOSE_DIALOG: u8 = 0xBC;

pub const WEATHER: u8 = 0xB0;
pub const DATE_TIME: u8 = 0xB1;
pub const MUSIC: u8 = 0xB2;
pub const SOUND_EFFECT: u8 = 0xB3;
pub const GRAPHIC_EFFECT: u8 = 0xB4;
