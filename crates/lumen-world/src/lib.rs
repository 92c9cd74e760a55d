//! Client-side world state for Lumen.
//!
//! Server replies are applied through the [`World`] trait, which exposes
//! the five parts of the world a reply can touch:
//!
//! - [`Player`]: identity, location, skills, inventory, movement answers
//! - [`Characters`]: everyone else in view
//! - [`GameMap`]: tiles and the items on them
//! - [`Interface`]: chat, notices, quests and dialogs behind the GUI
//! - [`Environment`]: weather, clock, music, effects
//!
//! [`GameWorld`] is the in-memory implementation. Embedders with their own
//! scene graph implement [`World`] over it instead.

mod attribute;
mod characters;
mod environment;
mod error;
mod interface;
mod map;
mod player;

pub use attribute::{Attributes, CharacterAttribute};
pub use characters::{Character, Characters};
pub use environment::{Effect, Environment, GameDate, Weather};
pub use error::WorldError;
pub use interface::{ChatLine, DEFAULT_LOG_CAPACITY, Dialog, Inform, Interface, LookAt, Quest};
pub use map::{GameMap, MapTile};
pub use player::{CombatState, MovementHandler, MovementResponse, Player, SkillValue};

use lumen_protocol::{CharacterId, Location};

/// Access to world state for executing server replies.
///
/// Implementors provide the accessors; the lookups the reply handlers
/// check their preconditions with come for free.
pub trait World: Send + 'static {
    fn player(&self) -> &Player;
    fn player_mut(&mut self) -> &mut Player;

    fn characters(&self) -> &Characters;
    fn characters_mut(&mut self) -> &mut Characters;

    fn map(&self) -> &GameMap;
    fn map_mut(&mut self) -> &mut GameMap;

    fn interface(&self) -> &Interface;
    fn interface_mut(&mut self) -> &mut Interface;

    fn environment(&self) -> &Environment;
    fn environment_mut(&mut self) -> &mut Environment;

    /// The player's character id, if the server has sent it yet.
    fn player_id(&self) -> Option<CharacterId> {
        self.player().id()
    }

    fn character(&self, id: CharacterId) -> Option<&Character> {
        self.characters().get(id)
    }

    fn tile(&self, location: Location) -> Option<&MapTile> {
        self.map().tile(location)
    }

    fn is_gui_ready(&self) -> bool {
        self.interface().is_ready()
    }
}

/// In-memory world.
#[derive(Debug, Clone, Default)]
pub struct GameWorld {
    pub player: Player,
    pub characters: Characters,
    pub map: GameMap,
    pub interface: Interface,
    pub environment: Environment,
}

impl GameWorld {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops everything learned from the server.
    ///
    /// Used after a disconnect; the GUI ready flag survives since the GUI
    /// itself does.
    pub fn reset(&mut self) {
        let ready = self.interface.is_ready();
        *self = Self::default();
        self.interface.set_ready(ready);
    }
}

impl World for GameWorld {
    fn player(&self) -> &Player {
        &self.player
    }

    fn player_mut(&mut self) -> &mut Player {
        &mut self.player
    }

    fn characters(&self) -> &Characters {
        &self.characters
    }

    fn characters_mut(&mut self) -> &mut Characters {
        &mut self.characters
    }

    fn map(&self) -> &GameMap {
        &self.map
    }

    fn map_mut(&mut self) -> &mut GameMap {
        &mut self.map
    }

    fn interface(&self) -> &Interface {
        &self.interface
    }

    fn interface_mut(&mut self) -> &mut Interface {
        &mut self.interface
    }

    fn environment(&self) -> &Environment {
        &self.environment
    }

    fn environment_mut(&mut self) -> &mut Environment {
        &mut self.environment
    }
}
