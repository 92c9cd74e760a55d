//! Weather, game clock, music and one-shot effects.

use std::collections::VecDeque;

use lumen_protocol::Location;
use serde::{Deserialize, Serialize};

use crate::DEFAULT_LOG_CAPACITY;
use crate::interface::push_bounded;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Weather {
    pub cloud_density: u8,
    pub fog_density: u8,
    /// Negative blows west.
    pub wind: i8,
    pub gust_strength: u8,
    pub precipitation_strength: u8,
    pub precipitation_type: u8,
    /// Degrees Celsius.
    pub temperature: i8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameDate {
    pub year: u16,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
}

/// A sound or graphic to play once at a location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Effect {
    Sound { location: Location, id: u16 },
    Graphic { location: Location, id: u16 },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Environment {
    weather: Option<Weather>,
    date: Option<GameDate>,
    /// 0 means silence.
    music: u16,
    /// Unplayed effects, oldest dropped past [`DEFAULT_LOG_CAPACITY`].
    effects: VecDeque<Effect>,
    logout_reason: Option<u8>,
}

impl Environment {
    pub fn weather(&self) -> Option<Weather> {
        self.weather
    }

    pub fn set_weather(&mut self, weather: Weather) {
        self.weather = Some(weather);
    }

    pub fn date(&self) -> Option<GameDate> {
        self.date
    }

    pub fn set_date(&mut self, date: GameDate) {
        self.date = Some(date);
    }

    pub fn music(&self) -> u16 {
        self.music
    }

    pub fn set_music(&mut self, song: u16) {
        self.music = song;
    }

    pub fn push_effect(&mut self, effect: Effect) {
        push_bounded(&mut self.effects, DEFAULT_LOG_CAPACITY, effect);
    }

    /// Effects queued since the last call.
    pub fn take_effects(&mut self) -> Vec<Effect> {
        self.effects.drain(..).collect()
    }

    pub fn logout_reason(&self) -> Option<u8> {
        self.logout_reason
    }

    pub fn set_logout_reason(&mut self, reason: u8) {
        self.logout_reason = Some(reason);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unplayed_effects_are_capped() {
        let mut env = Environment::default();
        for id in 0..=DEFAULT_LOG_CAPACITY as u16 {
            env.push_effect(Effect::Sound {
                location: Location::default(),
                id,
            });
        }

        let effects = env.take_effects();
        assert_eq!(effects.len(), DEFAULT_LOG_CAPACITY);
        assert_eq!(
            effects.first(),
            Some(&Effect::Sound {
                location: Location::default(),
                id: 1
            })
        );
        assert!(env.take_effects().is_empty());
    }
}
