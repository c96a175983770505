//! Platform abstraction layer
//!
//! The simulation never calls the outside world directly. These traits are
//! the seams the frame driver talks through:
//! - [`Renderer`]: drawing the scene
//! - [`AudioOut`]: background loop and one-shot effects
//! - [`Hud`]: DOM text, overlay and buttons
//! - [`ScoreStore`]: leaderboard persistence
//!
//! Every method must tolerate being called before its assets are ready.

pub mod headless;
pub mod storage;

pub use headless::Headless;
#[cfg(not(target_arch = "wasm32"))]
pub use storage::JsonFileStore;
#[cfg(target_arch = "wasm32")]
pub use storage::LocalStorageStore;
pub use storage::{MemoryStore, StorageError};

use crate::highscores::ScoreEntry;
use crate::language::Strings;
use crate::sim::{EntityKind, GamePhase, Rect};

/// One-shot sound effects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Player took damage
    Hit,
    /// Heal or speed pickup collected
    Item,
    /// Invincibility pickup collected
    Powerup,
    /// Run ended
    GameOver,
}

/// Scene drawing
pub trait Renderer {
    fn draw_background(&mut self, scroll_offset: f32);
    fn draw_entity(&mut self, kind: &EntityKind, rect: Rect);
    /// `blinking` means the sprite is in its hidden half of the blink cycle
    fn draw_player(&mut self, rect: Rect, blinking: bool);
    /// Localized time readout in the canvas corner
    fn draw_time(&mut self, readout: &str);
    /// Dimmed overlay with the final time (unit included)
    fn draw_game_over(&mut self, survival: &str);
}

/// Sound output
pub trait AudioOut {
    fn play_one_shot(&mut self, effect: SoundEffect);
    fn play_loop(&mut self);
    fn pause(&mut self);
    fn resume(&mut self);
    fn stop(&mut self);
}

/// DOM-side status display
pub trait Hud {
    fn set_health(&mut self, health: u8);
    fn set_elapsed_time(&mut self, seconds: &str);
    fn show_overlay(&mut self, title: &str, message: &str);
    fn hide_overlay(&mut self);
    /// Enable/disable the control buttons and relabel them in `strings`
    fn set_buttons_for_state(&mut self, phase: GamePhase, strings: &Strings);
}

/// Leaderboard persistence
pub trait ScoreStore {
    /// Stored entries, or empty if missing or unreadable
    fn load_top_scores(&self) -> Vec<ScoreEntry>;
    fn save_top_scores(&mut self, entries: &[ScoreEntry]);
}
