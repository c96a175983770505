//! Avoid Boxes - an arcade avoidance game
//!
//! Core modules:
//! - `sim`: Simulation (entities, spawning, collisions, session state machine)
//! - `game`: Frame driver that connects the simulation to its collaborators
//! - `platform`: Collaborator traits (rendering, audio, HUD, storage)
//! - `renderer`: Canvas 2D rendering
//! - `highscores`: Survival-time leaderboard
//! - `difficulty`: Spawn cadence and speed profiles
//! - `language`: Korean/English label tables

#[cfg(target_arch = "wasm32")]
pub mod audio;
pub mod difficulty;
pub mod game;
pub mod highscores;
pub mod language;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use difficulty::{Difficulty, DifficultyProfile};
pub use game::Game;
pub use highscores::HighScores;
pub use language::Language;
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Largest frame delta the simulation will accept (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Canvas dimension limits (pixels)
    pub const CANVAS_MIN_WIDTH: f32 = 800.0;
    pub const CANVAS_MAX_WIDTH: f32 = 1400.0;
    pub const CANVAS_MIN_HEIGHT: f32 = 600.0;
    pub const CANVAS_MAX_HEIGHT: f32 = 1000.0;

    /// Player defaults
    pub const PLAYER_SIZE: f32 = 40.0;
    pub const PLAYER_MAX_HEALTH: u8 = 3;
    /// Movement speeds in pixels/s (6, 2 and 14 px per frame at 60fps)
    pub const PLAYER_BASE_SPEED: f32 = 360.0;
    pub const PLAYER_MIN_SPEED: f32 = 120.0;
    pub const PLAYER_MAX_SPEED: f32 = 840.0;
    /// Speed change applied by speed pickups
    pub const SPEED_PICKUP_DELTA: f32 = 120.0;

    /// Effect durations (ms)
    pub const HIT_INVINCIBILITY_MS: f64 = 1000.0;
    pub const GODMODE_MS: f64 = 3000.0;
    pub const SPEED_BOOST_MS: f64 = 5000.0;

    /// Entity sizes
    pub const HAZARD_WIDTH: f32 = 40.0;
    pub const HAZARD_HEIGHT: f32 = 20.0;
    pub const ITEM_SIZE: f32 = 30.0;

    /// Entities further than this outside the canvas are culled
    pub const CULL_MARGIN: f32 = 50.0;

    /// Background scroll speed (pixels/s)
    pub const BACKGROUND_SCROLL_SPEED: f32 = 120.0;

    /// Delay between game over and the leaderboard name prompt (ms)
    pub const NAME_PROMPT_DELAY_MS: f64 = 500.0;

    /// Player blinks while immune: hidden for the first half of each period
    pub const BLINK_PERIOD_FRAMES: u64 = 10;
}

/// Round to one decimal, halves away from zero
#[inline]
pub fn round_tenths(secs: f64) -> f64 {
    (secs * 10.0).round() / 10.0
}

/// Format seconds the way the time readout shows them (one decimal)
#[inline]
pub fn format_seconds(secs: f64) -> String {
    format!("{:.1}", round_tenths(secs))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_readout_rounds_halves_up() {
        assert_eq!(format_seconds(0.0), "0.0");
        assert_eq!(format_seconds(8.25), "8.3");
        assert_eq!(format_seconds(12.349), "12.3");
        assert_eq!(round_tenths(8.25), 8.3);
    }
}
