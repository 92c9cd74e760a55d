//! State behind the GUI: chat, notices, quests and dialogs.
//!
//! Only the update loop writes here, and only once the GUI reports ready.

use std::collections::{BTreeMap, VecDeque};

use lumen_protocol::{CharacterId, InformKind, Location, TalkMode};
use serde::{Deserialize, Serialize};

/// Default number of chat lines, notices, movement answers and effects
/// kept before the oldest is dropped.
pub const DEFAULT_LOG_CAPACITY: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatLine {
    pub location: Location,
    pub mode: TalkMode,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inform {
    pub kind: InformKind,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quest {
    pub title: String,
    pub description: String,
    pub finished: bool,
    pub targets: Vec<Location>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Dialog {
    Input {
        title: String,
        description: String,
        max_chars: u16,
        multiline: bool,
    },
    Message {
        title: String,
        text: String,
    },
}

/// The most recent look-at answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LookAt {
    Character { id: CharacterId, text: String },
    Tile { location: Location, text: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interface {
    ready: bool,
    capacity: usize,
    chat: VecDeque<ChatLine>,
    informs: VecDeque<Inform>,
    quests: BTreeMap<u16, Quest>,
    dialogs: BTreeMap<i32, Dialog>,
    look_at: Option<LookAt>,
}

impl Default for Interface {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_LOG_CAPACITY)
    }
}

pub(crate) fn push_bounded<T>(log: &mut VecDeque<T>, capacity: usize, item: T) {
    if log.len() == capacity {
        log.pop_front();
    }
    log.push_back(item);
}

impl Interface {
    /// An interface keeping at most `capacity` chat lines and notices.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            ready: false,
            capacity,
            chat: VecDeque::with_capacity(capacity),
            informs: VecDeque::new(),
            quests: BTreeMap::new(),
            dialogs: BTreeMap::new(),
            look_at: None,
        }
    }

    /// `true` once the GUI can take updates.
    pub fn is_ready(&self) -> bool {
        self.ready
    }

    pub fn set_ready(&mut self, ready: bool) {
        self.ready = ready;
    }

    pub fn push_chat(&mut self, line: ChatLine) {
        push_bounded(&mut self.chat, self.capacity, line);
    }

    pub fn chat(&self) -> impl Iterator<Item = &ChatLine> {
        self.chat.iter()
    }

    pub fn push_inform(&mut self, inform: Inform) {
        push_bounded(&mut self.informs, self.capacity, inform);
    }

    pub fn informs(&self) -> impl Iterator<Item = &Inform> {
        self.informs.iter()
    }

    pub fn update_quest(&mut self, id: u16, quest: Quest) {
        self.quests.insert(id, quest);
    }

    pub fn abandon_quest(&mut self, id: u16) -> Option<Quest> {
        self.quests.remove(&id)
    }

    pub fn quest(&self, id: u16) -> Option<&Quest> {
        self.quests.get(&id)
    }

    pub fn open_dialog(&mut self, id: i32, dialog: Dialog) {
        self.dialogs.insert(id, dialog);
    }

    pub fn close_dialog(&mut self, id: i32) -> Option<Dialog> {
        self.dialogs.remove(&id)
    }

    pub fn dialog(&self, id: i32) -> Option<&Dialog> {
        self.dialogs.get(&id)
    }

    pub fn open_dialogs(&self) -> usize {
        self.dialogs.len()
    }

    pub fn set_look_at(&mut self, look_at: LookAt) {
        self.look_at = Some(look_at);
    }

    pub fn look_at(&self) -> Option<&LookAt> {
        self.look_at.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_log_is_bounded() {
        let mut ui = Interface::with_capacity(2);
        for text in ["one", "two", "three"] {
            ui.push_chat(ChatLine {
                location: Location::default(),
                mode: TalkMode::Say,
                text: text.into(),
            });
        }
        let kept: Vec<_> = ui.chat().map(|l| l.text.as_str()).collect();
        assert_eq!(kept, ["two", "three"]);
    }

    #[test]
    fn test_zero_capacity_keeps_one_line() {
        let mut ui = Interface::with_capacity(0);
        ui.push_inform(Inform {
            kind: InformKind::Server,
            text: "hi".into(),
        });
        assert_eq!(ui.informs().count(), 1);
    }
}
