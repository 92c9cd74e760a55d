//! Applying decoded replies to the world.
//!
//! Every reply either takes effect, fails for good, or asks to be tried
//! again later because the world isn't ready for it yet:
//!
//! ```text
//!              ┌──────────► Success      (done)
//!   execute ───┼──────────► Failed       (logged, dropped)
//!              └──────────► Reschedule   (queued by the dispatcher)
//! ```
//!
//! `execute` checks all of its preconditions before it touches anything,
//! so a `Reschedule` never leaves half an update behind and a retried
//! reply applies exactly once.
//!
//! Replies that feed the GUI don't write to the interface directly. They
//! hand a task to the [`UpdateTaskManager`], which runs it on the update
//! context later in the same frame.

use lumen_protocol::messages::*;
use lumen_protocol::{CharacterId, MoveMode, ServerReply};
use lumen_update::UpdateTaskManager;
use lumen_world::{
    CharacterAttribute, ChatLine, Dialog, Effect, GameDate, Inform, LookAt, Quest, Weather, World,
};
use tracing::{debug, trace, warn};

/// What happened when a reply was executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionResult {
    Success,
    Failed,
    Reschedule,
}

/// What `execute` works with: the world and the update task queue.
pub struct ExecContext<'a, W: World> {
    world: &'a mut W,
    tasks: &'a UpdateTaskManager<W>,
    disconnect_requested: bool,
}

impl<'a, W: World> ExecContext<'a, W> {
    pub fn new(world: &'a mut W, tasks: &'a UpdateTaskManager<W>) -> Self {
        Self {
            world,
            tasks,
            disconnect_requested: false,
        }
    }

    pub fn world(&self) -> &W {
        &*self.world
    }

    pub fn world_mut(&mut self) -> &mut W {
        &mut *self.world
    }

    pub fn tasks(&self) -> &UpdateTaskManager<W> {
        self.tasks
    }

    /// Asks the runtime to drop the connection after this reply.
    pub fn request_disconnect(&mut self) {
        self.disconnect_requested = true;
    }

    pub fn disconnect_requested(&self) -> bool {
        self.disconnect_requested
    }
}

/// A reply that can be applied to a [`World`].
pub trait Execute<W: World> {
    fn execute(&self, cx: &mut ExecContext<'_, W>) -> ExecutionResult;
}

// ---------------------------------------------------------------------------
// Dispatch over the sum type
// ---------------------------------------------------------------------------

macro_rules! execute_variants {
    ($reply:expr, $cx:expr; $($variant:ident),+ $(,)?) => {
        match $reply {
            $(ServerReply::$variant(msg) => msg.execute($cx),)+
        }
    };
}

impl<W: World> Execute<W> for ServerReply {
    fn execute(&self, cx: &mut ExecContext<'_, W>) -> ExecutionResult {
        execute_variants!(self, cx;
            PlayerId, Location, Logout, Attack, TargetLost,
            Attribute, TurnChar, MoveChar, RemoveChar, LookAtChar,
            MapStripe, MapComplete, ItemPut, ItemRemove, LookAtTile,
            Skill, Inventory, MagicFlag,
            Talk, Inform, QuestProgress, QuestAbandon, DialogInput, DialogMessage, CloseDialog,
            Weather, DateTime, Music, SoundEffect, GraphicEffect,
        )
    }
}

/// Evaluates to the player's id, or bails out with `Reschedule` until the
/// server has sent it.
macro_rules! require_player {
    ($cx:expr) => {
        match $cx.world().player_id() {
            Some(id) => id,
            None => return ExecutionResult::Reschedule,
        }
    };
}

/// Bails out with `Reschedule` until the GUI can take updates.
macro_rules! require_gui {
    ($cx:expr) => {
        if !$cx.world().is_gui_ready() {
            return ExecutionResult::Reschedule;
        }
    };
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

impl<W: World> Execute<W> for PlayerIdMsg {
    fn execute(&self, cx: &mut ExecContext<'_, W>) -> ExecutionResult {
        debug!(id = %self.id, "player identity received");
        cx.world_mut().player_mut().set_id(self.id);
        ExecutionResult::Success
    }
}

impl<W: World> Execute<W> for LocationMsg {
    fn execute(&self, cx: &mut ExecContext<'_, W>) -> ExecutionResult {
        require_player!(cx);
        cx.world_mut().player_mut().set_location(self.location);
        ExecutionResult::Success
    }
}

impl<W: World> Execute<W> for LogoutMsg {
    fn execute(&self, cx: &mut ExecContext<'_, W>) -> ExecutionResult {
        tracing::info!(reason = self.reason, "server requested logout");
        cx.world_mut().environment_mut().set_logout_reason(self.reason);
        cx.request_disconnect();
        ExecutionResult::Success
    }
}

// ---------------------------------------------------------------------------
// Combat
// ---------------------------------------------------------------------------

impl<W: World> Execute<W> for AttackMsg {
    fn execute(&self, cx: &mut ExecContext<'_, W>) -> ExecutionResult {
        cx.world_mut().player_mut().confirm_attack();
        ExecutionResult::Success
    }
}

impl<W: World> Execute<W> for TargetLostMsg {
    fn execute(&self, cx: &mut ExecContext<'_, W>) -> ExecutionResult {
        cx.world_mut().player_mut().lose_target();
        ExecutionResult::Success
    }
}

// ---------------------------------------------------------------------------
// Characters
// ---------------------------------------------------------------------------

impl<W: World> Execute<W> for AttributeMsg {
    fn execute(&self, cx: &mut ExecContext<'_, W>) -> ExecutionResult {
        let player = require_player!(cx);
        let attribute: CharacterAttribute = match self.attribute.parse() {
            Ok(attribute) => attribute,
            Err(e) => {
                warn!(character = %self.character, error = %e, "dropping attribute update");
                return ExecutionResult::Failed;
            }
        };

        let world = cx.world_mut();
        if self.character == player {
            world.player_mut().attributes.set(attribute, self.value);
        } else if let Some(character) = world.characters_mut().get_mut(self.character) {
            character.attributes.set(attribute, self.value);
        } else {
            debug!(character = %self.character, %attribute, "attribute for a character not in view");
            return ExecutionResult::Failed;
        }
        ExecutionResult::Success
    }
}

impl<W: World> Execute<W> for TurnCharMsg {
    fn execute(&self, cx: &mut ExecContext<'_, W>) -> ExecutionResult {
        let player = require_player!(cx);
        let world = cx.world_mut();
        if self.character == player {
            world.player_mut().movement_mut().server_turn_response(self.direction);
        } else if let Some(character) = world.characters_mut().get_mut(self.character) {
            character.set_direction(self.direction);
        } else {
            trace!(character = %self.character, "turn for a character not in view");
        }
        ExecutionResult::Success
    }
}

impl<W: World> Execute<W> for MoveCharMsg {
    fn execute(&self, cx: &mut ExecContext<'_, W>) -> ExecutionResult {
        let player = require_player!(cx);
        let world = cx.world_mut();
        if self.character == player {
            let p = world.player_mut();
            p.movement_mut()
                .server_move_response(self.mode, self.destination, self.duration_ms);
            if self.mode != MoveMode::NoMove {
                p.set_location(self.destination);
            }
        } else if let Some(character) = world.characters_mut().get_mut(self.character) {
            character.move_to(self.destination, self.mode);
        } else {
            trace!(character = %self.character, "move for a character not in view");
        }
        ExecutionResult::Success
    }
}

impl<W: World> Execute<W> for RemoveCharMsg {
    fn execute(&self, cx: &mut ExecContext<'_, W>) -> ExecutionResult {
        if cx.world_mut().characters_mut().remove(self.character).is_some() {
            trace!(character = %self.character, "character left view");
        }
        ExecutionResult::Success
    }
}

impl<W: World> Execute<W> for LookAtCharMsg {
    fn execute(&self, cx: &mut ExecContext<'_, W>) -> ExecutionResult {
        require_gui!(cx);
        let id: CharacterId = self.character;
        let text = self.text.clone();
        cx.tasks().add_task(move |tc| {
            let world = tc.state();
            if let Some(character) = world.characters_mut().get_mut(id) {
                character.set_look_at(text.clone());
            }
            world.interface_mut().set_look_at(LookAt::Character { id, text });
        });
        ExecutionResult::Success
    }
}

// ---------------------------------------------------------------------------
// Map
// ---------------------------------------------------------------------------

impl<W: World> Execute<W> for MapStripeMsg {
    fn execute(&self, cx: &mut ExecContext<'_, W>) -> ExecutionResult {
        trace!(origin = %self.origin, tiles = self.tiles.len(), "map stripe");
        cx.world_mut().map_mut().apply_stripe(&self.tiles);
        ExecutionResult::Success
    }
}

impl<W: World> Execute<W> for MapCompleteMsg {
    fn execute(&self, cx: &mut ExecContext<'_, W>) -> ExecutionResult {
        cx.world_mut().map_mut().mark_complete();
        debug!("map complete");
        ExecutionResult::Success
    }
}

impl<W: World> Execute<W> for ItemPutMsg {
    fn execute(&self, cx: &mut ExecContext<'_, W>) -> ExecutionResult {
        match cx.world_mut().map_mut().put_item(self.location, self.item) {
            Ok(()) => ExecutionResult::Success,
            Err(e) => {
                debug!(error = %e, "item put on a missing tile");
                ExecutionResult::Failed
            }
        }
    }
}

impl<W: World> Execute<W> for ItemRemoveMsg {
    fn execute(&self, cx: &mut ExecContext<'_, W>) -> ExecutionResult {
        match cx.world_mut().map_mut().remove_top_item(self.location) {
            Ok(_) => ExecutionResult::Success,
            Err(e) => {
                debug!(error = %e, "item removed from a missing tile");
                ExecutionResult::Failed
            }
        }
    }
}

impl<W: World> Execute<W> for LookAtTileMsg {
    fn execute(&self, cx: &mut ExecContext<'_, W>) -> ExecutionResult {
        require_gui!(cx);
        let location = self.location;
        let text = self.text.clone();
        cx.tasks().add_task(move |tc| {
            tc.state()
                .interface_mut()
                .set_look_at(LookAt::Tile { location, text });
        });
        ExecutionResult::Success
    }
}

// ---------------------------------------------------------------------------
// Player sheet
// ---------------------------------------------------------------------------

impl<W: World> Execute<W> for SkillMsg {
    fn execute(&self, cx: &mut ExecContext<'_, W>) -> ExecutionResult {
        require_player!(cx);
        let (skill, value, minor) = (self.skill, self.value, self.minor);
        cx.tasks()
            .add_task(move |tc| tc.state().player_mut().set_skill(skill, value, minor));
        ExecutionResult::Success
    }
}

impl<W: World> Execute<W> for InventoryMsg {
    fn execute(&self, cx: &mut ExecContext<'_, W>) -> ExecutionResult {
        require_player!(cx);
        let (slot, item) = (self.slot, self.item);
        cx.tasks()
            .add_task(move |tc| tc.state().player_mut().set_inventory_slot(slot, item));
        ExecutionResult::Success
    }
}

impl<W: World> Execute<W> for MagicFlagMsg {
    fn execute(&self, cx: &mut ExecContext<'_, W>) -> ExecutionResult {
        require_player!(cx);
        let (school, flags) = (self.school, self.flags);
        cx.tasks()
            .add_task(move |tc| tc.state().player_mut().set_magic_flags(school, flags));
        ExecutionResult::Success
    }
}

// ---------------------------------------------------------------------------
// Interface
// ---------------------------------------------------------------------------

impl<W: World> Execute<W> for TalkMsg {
    fn execute(&self, cx: &mut ExecContext<'_, W>) -> ExecutionResult {
        require_gui!(cx);
        let line = ChatLine {
            location: self.location,
            mode: self.mode,
            text: self.text.clone(),
        };
        cx.tasks()
            .add_task(move |tc| tc.state().interface_mut().push_chat(line));
        ExecutionResult::Success
    }
}

impl<W: World> Execute<W> for InformMsg {
    fn execute(&self, cx: &mut ExecContext<'_, W>) -> ExecutionResult {
        require_gui!(cx);
        let inform = Inform {
            kind: self.kind,
            text: self.text.clone(),
        };
        cx.tasks()
            .add_task(move |tc| tc.state().interface_mut().push_inform(inform));
        ExecutionResult::Success
    }
}

impl<W: World> Execute<W> for QuestProgressMsg {
    fn execute(&self, cx: &mut ExecContext<'_, W>) -> ExecutionResult {
        require_gui!(cx);
        let id = self.quest;
        let quest = Quest {
            title: self.title.clone(),
            description: self.description.clone(),
            finished: self.finished,
            targets: self.targets.clone(),
        };
        cx.tasks()
            .add_task(move |tc| tc.state().interface_mut().update_quest(id, quest));
        ExecutionResult::Success
    }
}

impl<W: World> Execute<W> for QuestAbandonMsg {
    fn execute(&self, cx: &mut ExecContext<'_, W>) -> ExecutionResult {
        require_gui!(cx);
        let id = self.quest;
        cx.tasks().add_task(move |tc| {
            tc.state().interface_mut().abandon_quest(id);
        });
        ExecutionResult::Success
    }
}

impl<W: World> Execute<W> for DialogInputMsg {
    fn execute(&self, cx: &mut ExecContext<'_, W>) -> ExecutionResult {
        require_gui!(cx);
        let id = self.dialog;
        let dialog = Dialog::Input {
            title: self.title.clone(),
            description: self.description.clone(),
            max_chars: self.max_chars,
            multiline: self.multiline,
        };
        // Never joins a drain already in progress.
        cx.tasks()
            .add_task_for_later(move |tc| tc.state().interface_mut().open_dialog(id, dialog));
        ExecutionResult::Success
    }
}

impl<W: World> Execute<W> for DialogMessageMsg {
    fn execute(&self, cx: &mut ExecContext<'_, W>) -> ExecutionResult {
        require_gui!(cx);
        let id = self.dialog;
        let dialog = Dialog::Message {
            title: self.title.clone(),
            text: self.text.clone(),
        };
        cx.tasks()
            .add_task(move |tc| tc.state().interface_mut().open_dialog(id, dialog));
        ExecutionResult::Success
    }
}

impl<W: World> Execute<W> for CloseDialogMsg {
    fn execute(&self, cx: &mut ExecContext<'_, W>) -> ExecutionResult {
        require_gui!(cx);
        let id = self.dialog;
        cx.tasks().add_task(move |tc| {
            tc.state().interface_mut().close_dialog(id);
        });
        ExecutionResult::Success
    }
}

// ---------------------------------------------------------------------------
// Environment
// ---------------------------------------------------------------------------

impl<W: World> Execute<W> for WeatherMsg {
    fn execute(&self, cx: &mut ExecContext<'_, W>) -> ExecutionResult {
        cx.world_mut().environment_mut().set_weather(Weather {
            cloud_density: self.cloud_density,
            fog_density: self.fog_density,
            wind: self.wind,
            gust_strength: self.gust_strength,
            precipitation_strength: self.precipitation_strength,
            precipitation_type: self.precipitation_type,
            temperature: self.temperature,
        });
        ExecutionResult::Success
    }
}

impl<W: World> Execute<W> for DateTimeMsg {
    fn execute(&self, cx: &mut ExecContext<'_, W>) -> ExecutionResult {
        cx.world_mut().environment_mut().set_date(GameDate {
            year: self.year,
            month: self.month,
            day: self.day,
            hour: self.hour,
            minute: self.minute,
        });
        ExecutionResult::Success
    }
}

impl<W: World> Execute<W> for MusicMsg {
    fn execute(&self, cx: &mut ExecContext<'_, W>) -> ExecutionResult {
        cx.world_mut().environment_mut().set_music(self.song);
        ExecutionResult::Success
    }
}

impl<W: World> Execute<W> for SoundEffectMsg {
    fn execute(&self, cx: &mut ExecContext<'_, W>) -> ExecutionResult {
        cx.world_mut().environment_mut().push_effect(Effect::Sound {
            location: self.location,
            id: self.sound,
        });
        ExecutionResult::Success
    }
}

impl<W: World> Execute<W> for GraphicEffectMsg {
    fn execute(&self, cx: &mut ExecContext<'_, W>) -> ExecutionResult {
        cx.world_mut().environment_mut().push_effect(Effect::Graphic {
            location: self.location,
            id: self.effect,
        });
        ExecutionResult::Success
    }
}
