//! Display-less collaborators
//!
//! Used by the native driver and by tests: every call just updates the
//! visible state a real display would show. [`drive`] runs a whole session
//! against a [`ManualClock`].

use super::{AudioOut, Hud, Renderer, SoundEffect};
use crate::game::{Command, Game};
use crate::language::Strings;
use crate::round_tenths;
use crate::sim::{Clock, EntityKind, GamePhase, ManualClock, Rect};

/// Background music state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MusicState {
    #[default]
    Stopped,
    Playing,
    Paused,
}

/// Renderer, audio and HUD in one, without any output device
#[derive(Debug, Default)]
pub struct Headless {
    // HUD
    pub health: Option<u8>,
    pub elapsed: String,
    pub overlay: Option<(String, String)>,
    pub buttons: Option<GamePhase>,
    pub pause_label: String,
    // Audio
    pub music: MusicState,
    pub sounds: Vec<SoundEffect>,
    // Renderer (last frame)
    pub scroll_offset: f32,
    pub entities_drawn: usize,
    pub player_visible: bool,
    pub time_readout: String,
    /// Final time drawn on the game-over screen this frame
    pub game_over_shown: Option<String>,
    pub frames_drawn: u64,
}

impl Renderer for Headless {
    fn draw_background(&mut self, scroll_offset: f32) {
        self.scroll_offset = scroll_offset;
        self.entities_drawn = 0;
        self.game_over_shown = None;
        self.frames_drawn += 1;
    }

    fn draw_entity(&mut self, _kind: &EntityKind, _rect: Rect) {
        self.entities_drawn += 1;
    }

    fn draw_player(&mut self, _rect: Rect, blinking: bool) {
        self.player_visible = !blinking;
    }

    fn draw_time(&mut self, readout: &str) {
        if self.time_readout != readout {
            self.time_readout = readout.to_string();
        }
    }

    fn draw_game_over(&mut self, survival: &str) {
        self.game_over_shown = Some(survival.to_string());
    }
}

impl AudioOut for Headless {
    fn play_one_shot(&mut self, effect: SoundEffect) {
        self.sounds.push(effect);
    }

    fn play_loop(&mut self) {
        self.music = MusicState::Playing;
    }

    fn pause(&mut self) {
        if self.music == MusicState::Playing {
            self.music = MusicState::Paused;
        }
    }

    fn resume(&mut self) {
        if self.music == MusicState::Paused {
            self.music = MusicState::Playing;
        }
    }

    fn stop(&mut self) {
        self.music = MusicState::Stopped;
    }
}

impl Hud for Headless {
    fn set_health(&mut self, health: u8) {
        self.health = Some(health);
    }

    fn set_elapsed_time(&mut self, seconds: &str) {
        if self.elapsed != seconds {
            self.elapsed = seconds.to_string();
        }
    }

    fn show_overlay(&mut self, title: &str, message: &str) {
        self.overlay = Some((title.to_string(), message.to_string()));
    }

    fn hide_overlay(&mut self) {
        self.overlay = None;
    }

    fn set_buttons_for_state(&mut self, phase: GamePhase, strings: &Strings) {
        self.buttons = Some(phase);
        self.pause_label = strings.pause_button(phase).to_string();
    }
}

/// Simulation rate of the headless driver
pub const HEADLESS_FRAME_MS: f64 = 1000.0 / 60.0;

/// How a headless run ended
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HeadlessOutcome {
    /// Health reached zero; survival time as recorded
    GameOver(f64),
    /// Still alive when the time limit ran out
    TimeLimit(f64),
}

impl HeadlessOutcome {
    pub fn survival_secs(&self) -> f64 {
        match *self {
            HeadlessOutcome::GameOver(secs) | HeadlessOutcome::TimeLimit(secs) => secs,
        }
    }
}

/// Start a run and step it at 60 Hz with whatever keys `game.input` holds,
/// until the leaderboard prompt comes due or `limit_ms` of wall time passes
pub fn drive(
    game: &mut Game,
    clock: &ManualClock,
    host: &mut Headless,
    limit_ms: f64,
) -> HeadlessOutcome {
    let started = clock.now();
    game.command(Command::Start, started, host);

    while clock.now() - started < limit_ms {
        clock.advance(HEADLESS_FRAME_MS);
        if let Some(secs) = game.frame(clock.now(), host) {
            return HeadlessOutcome::GameOver(secs);
        }
    }

    HeadlessOutcome::TimeLimit(round_tenths(game.session.elapsed_secs()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::difficulty::Difficulty;
    use crate::highscores::HighScores;
    use crate::sim::{Canvas, Session};

    fn game(difficulty: Difficulty, seed: u64) -> Game {
        Game::new(
            Session::new(Canvas::default(), difficulty, seed),
            HighScores::new(),
        )
    }

    #[test]
    fn test_time_limit_stops_the_run() {
        let mut g = game(Difficulty::Easy, 5);
        let clock = ManualClock::new(1_000.0);
        let mut host = Headless::default();
        let outcome = drive(&mut g, &clock, &mut host, 500.0);
        match outcome {
            HeadlessOutcome::TimeLimit(secs) => assert!((0.4..=0.6).contains(&secs)),
            HeadlessOutcome::GameOver(_) => panic!("no run ends in half a second"),
        }
        assert!(host.frames_drawn >= 30);
        assert_eq!(host.music, MusicState::Playing);
    }

    #[test]
    fn test_idle_player_eventually_loses() {
        let mut g = game(Difficulty::Hard, 11);
        let clock = ManualClock::new(0.0);
        let mut host = Headless::default();
        let outcome = drive(&mut g, &clock, &mut host, 10.0 * 60.0 * 1000.0);
        let HeadlessOutcome::GameOver(secs) = outcome else {
            panic!("idle run outlived the limit: {outcome:?}");
        };
        assert!(secs > 0.0);
        assert_eq!(host.health, Some(0));
        assert_eq!(host.music, MusicState::Stopped);
        assert_eq!(g.session.elapsed_display(), crate::format_seconds(secs));
        assert_eq!(g.session.phase(), GamePhase::GameOver);
    }
}
