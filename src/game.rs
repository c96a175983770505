//! Frame driver
//!
//! Owns the session and the held-key state, turns host commands into
//! session transitions, and fans the resulting [`GameEvent`]s out to the
//! collaborators. The host calls [`Game::frame`] once per display refresh.

use crate::difficulty::Difficulty;
use crate::format_seconds;
use crate::highscores::HighScores;
use crate::language::{Language, Strings};
use crate::platform::{AudioOut, Hud, Renderer, ScoreStore, SoundEffect};
use crate::sim::{Direction, EntityKind, GameEvent, GamePhase, Session, TickInput, WallMs};

/// Host-issued commands (buttons, keyboard shortcuts)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    TogglePause,
    Reset,
}

/// Session plus everything the host feeds into it
#[derive(Debug)]
pub struct Game {
    pub session: Session,
    pub input: TickInput,
    pub scores: HighScores,
    pub language: Language,
}

impl Game {
    pub fn new(session: Session, scores: HighScores) -> Self {
        Self {
            session,
            input: TickInput::default(),
            scores,
            language: Language::default(),
        }
    }

    pub fn with_language(mut self, language: Language) -> Self {
        self.language = language;
        self
    }

    pub fn strings(&self) -> &'static Strings {
        self.language.strings()
    }

    /// Bring the HUD in line with a fresh, not-yet-started session
    pub fn attach<H: AudioOut + Hud>(&self, host: &mut H) {
        host.set_health(self.session.state.player.health);
        host.set_elapsed_time(&self.session.elapsed_display());
        self.relabel(host);
    }

    /// Switch language and redo the overlay and button labels
    pub fn set_language<H: Hud>(&mut self, language: Language, host: &mut H) {
        self.language = language;
        self.relabel(host);
    }

    fn relabel<H: Hud>(&self, host: &mut H) {
        let phase = self.session.phase();
        match self.strings().overlay(phase, self.session.elapsed_secs()) {
            Some((title, message)) => host.show_overlay(title, &message),
            None => host.hide_overlay(),
        }
        host.set_buttons_for_state(phase, self.strings());
    }

    /// Record a key transition; returns false for keys the game ignores
    pub fn key(&mut self, key: &str, pressed: bool) -> bool {
        match Direction::from_key(key) {
            Some(dir) => {
                self.input.set(dir, pressed);
                true
            }
            None => false,
        }
    }

    pub fn command<H: AudioOut + Hud>(&mut self, command: Command, now: WallMs, host: &mut H) {
        let events = match command {
            Command::Start => self.session.start(now),
            Command::TogglePause => self.session.toggle_pause(now),
            Command::Reset => self.session.reset(now),
        };
        self.dispatch(&events, host);
    }

    /// Host reports the page/window became hidden
    pub fn visibility_hidden<H: AudioOut + Hud>(&mut self, now: WallMs, host: &mut H) {
        let events = self.session.visibility_hidden(now);
        self.dispatch(&events, host);
    }

    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        self.session.set_difficulty(difficulty);
    }

    /// One display refresh: simulate (if playing), then draw.
    ///
    /// Returns the survival time once the leaderboard prompt is due.
    pub fn frame<H: Renderer + AudioOut + Hud>(&mut self, now: WallMs, host: &mut H) -> Option<f64> {
        let events = self.session.frame(now, &self.input);
        self.dispatch(&events, host);
        self.render(host);
        self.session.take_name_prompt(now)
    }

    /// Add a named run to the leaderboard and persist it
    pub fn record_score(
        &mut self,
        store: &mut dyn ScoreStore,
        name: &str,
        time: f64,
    ) -> Option<usize> {
        self.scores.record(store, name, time)
    }

    fn render<R: Renderer + Hud>(&self, host: &mut R) {
        let state = &self.session.state;
        let strings = self.strings();
        let elapsed = self.session.elapsed_display();

        host.draw_background(state.bg_scroll);
        host.draw_player(state.player.rect(), state.player_blinking());
        for entity in &state.entities {
            host.draw_entity(&entity.kind, entity.rect());
        }
        host.draw_time(&strings.time_readout(&elapsed));
        host.set_elapsed_time(&elapsed);

        if self.session.phase() == GamePhase::GameOver {
            host.draw_game_over(&strings.with_unit(&elapsed));
        }
    }

    fn dispatch<H: AudioOut + Hud>(&self, events: &[GameEvent], host: &mut H) {
        let strings = self.strings();
        for event in events {
            match *event {
                GameEvent::Started => {
                    host.set_health(self.session.state.player.health);
                    host.set_elapsed_time(&format_seconds(0.0));
                    host.hide_overlay();
                    host.set_buttons_for_state(GamePhase::Playing, strings);
                    host.play_loop();
                }
                GameEvent::Paused => {
                    host.pause();
                    host.show_overlay(strings.paused, strings.press_resume);
                    host.set_buttons_for_state(GamePhase::Paused, strings);
                }
                GameEvent::Resumed => {
                    host.resume();
                    host.hide_overlay();
                    host.set_buttons_for_state(GamePhase::Playing, strings);
                }
                GameEvent::Reset => {
                    host.stop();
                    host.set_health(self.session.state.player.health);
                    host.set_elapsed_time(&format_seconds(0.0));
                    host.show_overlay(strings.game_start, strings.press_start);
                    host.set_buttons_for_state(GamePhase::NotStarted, strings);
                }
                GameEvent::HazardHit { health } => {
                    host.set_health(health);
                    host.play_one_shot(SoundEffect::Hit);
                }
                GameEvent::PickupCollected { kind, health } => {
                    let effect = match kind {
                        EntityKind::InvincibilityPickup => SoundEffect::Powerup,
                        _ => SoundEffect::Item,
                    };
                    if kind == EntityKind::HealPickup {
                        host.set_health(health);
                    }
                    host.play_one_shot(effect);
                }
                GameEvent::GameOver { survival_secs } => {
                    host.stop();
                    host.play_one_shot(SoundEffect::GameOver);
                    let message = strings.survival_message(survival_secs);
                    host.show_overlay(strings.game_over, &message);
                    host.set_buttons_for_state(GamePhase::GameOver, strings);
                }
            }
        }
    }
}
