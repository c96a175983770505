//! Session state machine
//!
//! `NotStarted -> Playing <-> Paused -> GameOver -> (reset) -> NotStarted`
//!
//! The session owns the game state, the pause bookkeeping that turns wall
//! time into game time, and the RNG. Every timeout (effects, the name prompt)
//! is a stored timestamp compared each frame, never a scheduled callback, so
//! nothing can fire after a reset.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::state::{Canvas, GameEvent, GamePhase, GameState};
use super::tick::{TickInput, frame_delta, tick};
use super::time::{GameMs, Instant, WallMs};
use crate::consts::*;
use crate::difficulty::{Difficulty, DifficultyProfile};
use crate::{format_seconds, round_tenths};

/// One play session and its clocks
#[derive(Debug, Clone)]
pub struct Session {
    pub state: GameState,
    phase: GamePhase,
    difficulty: Difficulty,
    profile: DifficultyProfile,
    rng: Pcg32,
    /// Wall time the current run started
    start_time: WallMs,
    /// Sum of completed pauses (ms)
    paused_total_ms: f64,
    /// Wall time the current pause began
    pause_started: Option<WallMs>,
    /// Survival time readout (seconds), refreshed only while playing
    elapsed_secs: f64,
    last_frame: Option<WallMs>,
    /// When to ask for a leaderboard name, and the time to record
    name_prompt: Option<(WallMs, f64)>,
}

impl Session {
    pub fn new(canvas: Canvas, difficulty: Difficulty, seed: u64) -> Self {
        Self {
            state: GameState::new(canvas),
            phase: GamePhase::NotStarted,
            difficulty,
            profile: difficulty.profile(),
            rng: Pcg32::seed_from_u64(seed),
            start_time: WallMs::default(),
            paused_total_ms: 0.0,
            pause_started: None,
            elapsed_secs: 0.0,
            last_frame: None,
            name_prompt: None,
        }
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn profile(&self) -> &DifficultyProfile {
        &self.profile
    }

    /// Switch difficulty; only entities spawned from now on are affected
    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        if difficulty != self.difficulty {
            log::info!("Difficulty: {}", difficulty.as_str());
        }
        self.difficulty = difficulty;
        self.profile = difficulty.profile();
    }

    /// Game time at wall time `now`; frozen while paused
    pub fn game_time(&self, now: WallMs) -> GameMs {
        let current_pause = self.pause_started.map_or(0.0, |started| now - started);
        GameMs(now - self.start_time - self.paused_total_ms - current_pause)
    }

    pub fn instant(&self, now: WallMs) -> Instant {
        Instant {
            wall: now,
            game: self.game_time(now),
        }
    }

    pub fn elapsed_secs(&self) -> f64 {
        self.elapsed_secs
    }

    /// Time readout text, e.g. "12.3"
    pub fn elapsed_display(&self) -> String {
        format_seconds(self.elapsed_secs)
    }

    /// Begin a run. From GameOver this resets first; otherwise a no-op
    /// unless the session has not started.
    pub fn start(&mut self, now: WallMs) -> Vec<GameEvent> {
        let mut events = Vec::new();
        if self.phase == GamePhase::GameOver {
            events.extend(self.reset(now));
        }
        if self.phase != GamePhase::NotStarted {
            return events;
        }

        self.state.reset();
        self.phase = GamePhase::Playing;
        self.start_time = now;
        self.paused_total_ms = 0.0;
        self.pause_started = None;
        self.elapsed_secs = 0.0;
        self.name_prompt = None;
        log::info!("Game started ({})", self.difficulty.as_str());
        events.push(GameEvent::Started);
        events
    }

    /// Playing <-> Paused. Ignored before start and after game over.
    pub fn toggle_pause(&mut self, now: WallMs) -> Vec<GameEvent> {
        match self.phase {
            GamePhase::Playing => {
                self.phase = GamePhase::Paused;
                self.pause_started = Some(now);
                log::info!("Paused at {}s", self.elapsed_display());
                vec![GameEvent::Paused]
            }
            GamePhase::Paused => {
                let span = self.pause_started.take().map_or(0.0, |started| now - started);
                self.paused_total_ms += span;
                // Hit-invincibility runs on the wall clock; push it past the pause
                let player = &mut self.state.player;
                player.invincible_until = player.invincible_until.map(|until| until.plus(span));
                self.phase = GamePhase::Playing;
                log::info!("Resumed after {:.0}ms", span);
                vec![GameEvent::Resumed]
            }
            GamePhase::NotStarted | GamePhase::GameOver => Vec::new(),
        }
    }

    /// Host lost visibility: pause if playing, never resume
    pub fn visibility_hidden(&mut self, now: WallMs) -> Vec<GameEvent> {
        if self.phase != GamePhase::Playing {
            return Vec::new();
        }
        log::info!("Auto-paused (hidden)");
        self.toggle_pause(now)
    }

    /// Back to NotStarted with a fresh player and no entities
    pub fn reset(&mut self, now: WallMs) -> Vec<GameEvent> {
        self.phase = GamePhase::NotStarted;
        self.state.reset();
        self.start_time = now;
        self.paused_total_ms = 0.0;
        self.pause_started = None;
        self.elapsed_secs = 0.0;
        self.name_prompt = None;
        log::info!("Game reset");
        vec![GameEvent::Reset]
    }

    /// Host window resized: clamp the canvas and recenter the player
    pub fn resize(&mut self, width: f32, height: f32) {
        let canvas = Canvas::clamped(width, height);
        self.state.resize(canvas);
        self.state.bg_scroll %= canvas.height;
        log::debug!("Canvas resized to {}x{}", canvas.width, canvas.height);
    }

    /// Run one animation frame. Simulation only advances while Playing.
    pub fn frame(&mut self, now: WallMs, input: &TickInput) -> Vec<GameEvent> {
        let dt = frame_delta(self.last_frame, now);
        self.last_frame = Some(now);

        if self.phase != GamePhase::Playing {
            return Vec::new();
        }

        let instant = self.instant(now);
        self.elapsed_secs = instant.game.as_secs();
        let mut events = tick(&mut self.state, input, instant, dt, &self.profile, &mut self.rng);

        if self.state.player.health == 0 {
            events.push(self.game_over(now));
        }
        events
    }

    fn game_over(&mut self, now: WallMs) -> GameEvent {
        self.phase = GamePhase::GameOver;
        let survival_secs = round_tenths(self.elapsed_secs);
        self.name_prompt = Some((now.plus(NAME_PROMPT_DELAY_MS), survival_secs));
        log::info!("Game over after {}s", format_seconds(survival_secs));
        GameEvent::GameOver { survival_secs }
    }

    /// Survival time to record, once the prompt delay has passed
    pub fn take_name_prompt(&mut self, now: WallMs) -> Option<f64> {
        match self.name_prompt {
            Some((due, secs)) if self.phase == GamePhase::GameOver && now >= due => {
                self.name_prompt = None;
                Some(secs)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{EntityKind, Rgb};
    use glam::Vec2;

    const FRAME_MS: f64 = 1000.0 / 60.0;

    fn session() -> Session {
        let mut s = Session::new(Canvas::clamped(800.0, 600.0), Difficulty::Normal, 42);
        // Keep spawns out of the way unless a test wants them
        s.profile.obstacle_spawn_every_n_frames = 0;
        s.profile.item_spawn_every_n_frames = 0;
        s
    }

    fn drop_hazard_on_player(s: &mut Session) -> u32 {
        let pos = s.state.player.pos;
        s.state.insert(
            EntityKind::Hazard {
                color: Rgb::new(255, 150, 100),
            },
            pos,
            Vec2::new(HAZARD_WIDTH, HAZARD_HEIGHT),
            Vec2::ZERO,
        )
    }

    fn idle() -> TickInput {
        TickInput::default()
    }

    #[test]
    fn test_start_only_from_not_started() {
        let mut s = session();
        assert_eq!(s.phase(), GamePhase::NotStarted);
        assert_eq!(s.start(WallMs(0.0)), vec![GameEvent::Started]);
        assert_eq!(s.phase(), GamePhase::Playing);
        assert!(s.start(WallMs(10.0)).is_empty());
        s.toggle_pause(WallMs(20.0));
        assert!(s.start(WallMs(30.0)).is_empty());
        assert_eq!(s.phase(), GamePhase::Paused);
    }

    #[test]
    fn test_no_simulation_before_start() {
        let mut s = Session::new(Canvas::default(), Difficulty::Hard, 1);
        for i in 0..100 {
            assert!(s.frame(WallMs(i as f64 * FRAME_MS), &idle()).is_empty());
        }
        assert_eq!(s.state.frame_count, 0);
        assert!(s.state.entities.is_empty());
    }

    #[test]
    fn test_hit_then_invincible_scenario() {
        let mut s = session();
        s.start(WallMs(0.0));
        s.frame(WallMs(50.0), &idle());

        drop_hazard_on_player(&mut s);
        let events = s.frame(WallMs(100.0), &idle());
        assert_eq!(events, vec![GameEvent::HazardHit { health: 2 }]);
        assert_eq!(s.state.player.invincible_until, Some(WallMs(1_100.0)));

        let second = drop_hazard_on_player(&mut s);
        assert!(s.frame(WallMs(500.0), &idle()).is_empty());
        assert_eq!(s.state.player.health, 2);
        assert!(s.state.get(second).is_some());

        // Invincibility over: the same hazard now connects
        let events = s.frame(WallMs(1_100.0), &idle());
        assert_eq!(events, vec![GameEvent::HazardHit { health: 1 }]);
    }

    #[test]
    fn test_game_over_fires_exactly_once() {
        let mut s = session();
        s.start(WallMs(0.0));
        s.state.player.health = 1;
        drop_hazard_on_player(&mut s);
        let events = s.frame(WallMs(12_340.0), &idle());
        assert_eq!(
            events,
            vec![
                GameEvent::HazardHit { health: 0 },
                GameEvent::GameOver {
                    survival_secs: 12.3
                }
            ]
        );
        assert_eq!(s.phase(), GamePhase::GameOver);

        drop_hazard_on_player(&mut s);
        for i in 1..=120 {
            assert!(s.frame(WallMs(12_340.0 + i as f64 * FRAME_MS), &idle()).is_empty());
        }
        assert_eq!(s.state.player.health, 0);
        assert_eq!(s.elapsed_display(), "12.3");
        assert!(s.toggle_pause(WallMs(20_000.0)).is_empty());
    }

    #[test]
    fn test_pause_freezes_timers_and_readout() {
        let mut s = session();
        s.start(WallMs(0.0));
        s.frame(WallMs(1_000.0), &idle());
        let now = s.instant(WallMs(1_000.0));
        s.state.player.godmode_until = Some(now.game.plus(500.0));
        s.state.player.speed_boost_until = Some(now.game.plus(500.0));
        s.state.player.speed = PLAYER_BASE_SPEED + SPEED_PICKUP_DELTA;
        s.state.player.invincible_until = Some(now.wall.plus(500.0));

        s.toggle_pause(WallMs(1_000.0));
        let mut t = 1_000.0;
        while t < 3_000.0 {
            t += FRAME_MS;
            s.frame(WallMs(t), &idle());
        }
        assert_eq!(s.elapsed_display(), "1.0");
        assert_eq!(s.game_time(WallMs(3_000.0)), GameMs(1_000.0));
        assert!(s.state.player.is_godmode());
        assert!(s.state.player.is_invincible());
        assert!(s.state.player.speed_boost_until.is_some());

        // Resume: 2000ms of pause leaves every timer with 500ms to go
        s.toggle_pause(WallMs(3_000.0));
        assert_eq!(s.state.player.invincible_until, Some(WallMs(3_500.0)));
        s.frame(WallMs(3_400.0), &idle());
        assert!(s.state.player.is_godmode());
        assert!(s.state.player.is_invincible());
        assert_eq!(s.elapsed_display(), "1.4");
        s.frame(WallMs(3_500.0), &idle());
        assert!(!s.state.player.is_godmode());
        assert!(!s.state.player.is_invincible());
        assert_eq!(s.state.player.speed, PLAYER_BASE_SPEED);
    }

    #[test]
    fn test_pause_halts_frame_counter() {
        let mut s = session();
        s.start(WallMs(0.0));
        for i in 1..=10 {
            s.frame(WallMs(i as f64 * FRAME_MS), &idle());
        }
        s.toggle_pause(WallMs(200.0));
        for i in 0..600 {
            s.frame(WallMs(200.0 + i as f64 * FRAME_MS), &idle());
        }
        assert_eq!(s.state.frame_count, 10);
    }

    #[test]
    fn test_visibility_only_pauses() {
        let mut s = session();
        assert!(s.visibility_hidden(WallMs(0.0)).is_empty());
        s.start(WallMs(0.0));
        assert_eq!(s.visibility_hidden(WallMs(10.0)), vec![GameEvent::Paused]);
        // Already paused: hiding again must not resume
        assert!(s.visibility_hidden(WallMs(20.0)).is_empty());
        assert_eq!(s.phase(), GamePhase::Paused);
    }

    #[test]
    fn test_start_after_game_over_resets() {
        let mut s = session();
        s.start(WallMs(0.0));
        s.state.player.health = 1;
        drop_hazard_on_player(&mut s);
        s.frame(WallMs(5_000.0), &idle());
        assert_eq!(s.phase(), GamePhase::GameOver);

        let events = s.start(WallMs(9_000.0));
        assert_eq!(events, vec![GameEvent::Reset, GameEvent::Started]);
        assert_eq!(s.phase(), GamePhase::Playing);
        assert_eq!(s.state.player.health, PLAYER_MAX_HEALTH);
        assert!(s.state.entities.is_empty());
        assert_eq!(s.elapsed_display(), "0.0");
        assert_eq!(s.game_time(WallMs(9_500.0)), GameMs(500.0));
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut s = session();
        s.start(WallMs(0.0));
        s.frame(WallMs(2_000.0), &idle());
        s.state.player.speed = PLAYER_MAX_SPEED;
        s.state.player.godmode_until = Some(GameMs(99_999.0));
        drop_hazard_on_player(&mut s);
        s.toggle_pause(WallMs(2_100.0));

        assert_eq!(s.reset(WallMs(3_000.0)), vec![GameEvent::Reset]);
        assert_eq!(s.phase(), GamePhase::NotStarted);
        assert!(s.state.entities.is_empty());
        assert_eq!(s.state.frame_count, 0);
        assert_eq!(s.state.player.speed, PLAYER_BASE_SPEED);
        assert!(!s.state.player.is_godmode());
        assert_eq!(s.elapsed_display(), "0.0");
        assert!(s.toggle_pause(WallMs(3_100.0)).is_empty());
    }

    #[test]
    fn test_name_prompt_after_delay_once() {
        let mut s = session();
        s.start(WallMs(0.0));
        s.state.player.health = 1;
        drop_hazard_on_player(&mut s);
        s.frame(WallMs(7_000.0), &idle());

        assert_eq!(s.take_name_prompt(WallMs(7_499.0)), None);
        assert_eq!(s.take_name_prompt(WallMs(7_500.0)), Some(7.0));
        assert_eq!(s.take_name_prompt(WallMs(9_000.0)), None);
    }

    #[test]
    fn test_reset_cancels_pending_prompt() {
        let mut s = session();
        s.start(WallMs(0.0));
        s.state.player.health = 1;
        drop_hazard_on_player(&mut s);
        s.frame(WallMs(1_000.0), &idle());
        s.reset(WallMs(1_100.0));
        assert_eq!(s.take_name_prompt(WallMs(5_000.0)), None);
    }

    #[test]
    fn test_resize_clamps_and_recenters() {
        let mut s = session();
        s.resize(2_000.0, 300.0);
        assert_eq!(s.state.canvas, Canvas { width: 1_400.0, height: 600.0 });
        assert_eq!(s.state.player.pos, Vec2::new(680.0, 280.0));
    }

    #[test]
    fn test_difficulty_change_applies_to_new_spawns() {
        let mut s = Session::new(Canvas::default(), Difficulty::Easy, 3);
        s.start(WallMs(0.0));
        for i in 1..=35 {
            s.frame(WallMs(i as f64), &idle());
        }
        let easy_hazard = s.state.entities.iter().find(|e| e.kind.is_hazard()).map(|e| e.vel);

        s.set_difficulty(Difficulty::Hard);
        assert_eq!(s.profile().base_speed, 270.0);
        // Existing entity keeps its velocity
        let same = s.state.entities.iter().find(|e| e.kind.is_hazard()).map(|e| e.vel);
        assert_eq!(easy_hazard, same);
        let speed = easy_hazard.map(|v| v.length()).unwrap_or_default();
        assert!((150.0..=270.0 + 1e-3).contains(&speed));
    }
}
