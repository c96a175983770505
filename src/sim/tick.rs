//! Variable timestep simulation tick
//!
//! One call advances a Playing session by `dt` seconds. Phase gating (not
//! started, paused, game over) happens in the session before this runs.

use glam::Vec2;
use rand::Rng;

use super::collision::{expire_timers, resolve_collisions};
use super::spawner::{spawn_due, spawn_hazard, spawn_item};
use super::state::{GameEvent, GameState};
use super::time::{Instant, WallMs};
use crate::consts::*;
use crate::difficulty::DifficultyProfile;

/// Movement keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    /// Map a DOM `KeyboardEvent.key` value
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "ArrowLeft" => Some(Direction::Left),
            "ArrowRight" => Some(Direction::Right),
            "ArrowUp" => Some(Direction::Up),
            "ArrowDown" => Some(Direction::Down),
            _ => None,
        }
    }

    pub fn unit(&self) -> Vec2 {
        match self {
            Direction::Left => Vec2::NEG_X,
            Direction::Right => Vec2::X,
            Direction::Up => Vec2::NEG_Y,
            Direction::Down => Vec2::Y,
        }
    }
}

/// Raw key state for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
}

impl TickInput {
    pub fn set(&mut self, dir: Direction, pressed: bool) {
        match dir {
            Direction::Left => self.left = pressed,
            Direction::Right => self.right = pressed,
            Direction::Up => self.up = pressed,
            Direction::Down => self.down = pressed,
        }
    }

    /// Held directions
    pub fn held(&self) -> impl Iterator<Item = Direction> + '_ {
        [
            (Direction::Left, self.left),
            (Direction::Right, self.right),
            (Direction::Up, self.up),
            (Direction::Down, self.down),
        ]
        .into_iter()
        .filter_map(|(dir, held)| held.then_some(dir))
    }
}

/// Seconds since the previous frame, clamped so a long stall (background
/// tab, debugger) cannot teleport entities
pub fn frame_delta(last_frame: Option<WallMs>, now: WallMs) -> f32 {
    match last_frame {
        Some(last) => (((now - last) / 1000.0) as f32).clamp(0.0, MAX_FRAME_DT),
        None => 0.0,
    }
}

/// Advance a Playing session by `dt` seconds
pub fn tick<R: Rng + ?Sized>(
    state: &mut GameState,
    input: &TickInput,
    now: Instant,
    dt: f32,
    profile: &DifficultyProfile,
    rng: &mut R,
) -> Vec<GameEvent> {
    expire_timers(&mut state.player, now);

    // Each held key moves the full step; each axis is clamped on its own
    let step = state.player.speed * dt;
    let canvas = state.canvas;
    for dir in input.held() {
        state.player.move_clamped(dir.unit(), step, &canvas);
    }

    for entity in &mut state.entities {
        entity.advance(dt);
    }

    let events = resolve_collisions(state, now);
    if state.player.health == 0 {
        return events;
    }

    state.cull_offscreen();

    state.frame_count += 1;
    if spawn_due(state.frame_count, profile.obstacle_spawn_every_n_frames) {
        spawn_hazard(state, profile, rng);
    }
    if spawn_due(state.frame_count, profile.item_spawn_every_n_frames) {
        spawn_item(state, profile, rng);
    }

    state.bg_scroll = (state.bg_scroll + BACKGROUND_SCROLL_SPEED * dt) % state.canvas.height;

    events
}
