//! Game state and core simulation types
//!
//! [`GameState`] is the entity store: the player plus every obstacle and item
//! on screen. Entities are owned here only and looked up by id each tick.

use glam::Vec2;

use super::time::{GameMs, WallMs};
use crate::consts::*;

/// Session phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GamePhase {
    /// Waiting for the start command
    #[default]
    NotStarted,
    /// Active gameplay
    Playing,
    /// Game is paused
    Paused,
    /// Health reached zero
    GameOver,
}

/// Axis-aligned rectangle (top-left origin, y grows downward)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            size: Vec2::new(width, height),
        }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.pos.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }
}

/// Hazard fill color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// CSS color string
    pub fn css(&self) -> String {
        format!("rgb({}, {}, {})", self.r, self.g, self.b)
    }

    /// Mean of the three channels
    pub fn average(&self) -> f32 {
        (self.r as f32 + self.g as f32 + self.b as f32) / 3.0
    }

    /// Largest difference between any two channels
    pub fn max_channel_diff(&self) -> u8 {
        let (r, g, b) = (self.r, self.g, self.b);
        r.abs_diff(g).max(g.abs_diff(b)).max(b.abs_diff(r))
    }
}

/// Obstacle and item kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    /// Damages the player on non-immune contact
    Hazard { color: Rgb },
    /// Grants godmode
    InvincibilityPickup,
    /// Restores one health point
    HealPickup,
    /// Temporary speed increase
    SpeedUpPickup,
    /// Permanent speed decrease
    SpeedDownPickup,
}

impl EntityKind {
    /// The four pickup kinds, in spawn-roll order
    pub const PICKUPS: [EntityKind; 4] = [
        EntityKind::InvincibilityPickup,
        EntityKind::HealPickup,
        EntityKind::SpeedUpPickup,
        EntityKind::SpeedDownPickup,
    ];

    pub fn is_hazard(&self) -> bool {
        matches!(self, EntityKind::Hazard { .. })
    }
}

/// An obstacle or item moving across the canvas
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    pub id: u32,
    pub kind: EntityKind,
    pub pos: Vec2,
    pub size: Vec2,
    /// Velocity in pixels/s
    pub vel: Vec2,
}

impl Entity {
    pub fn rect(&self) -> Rect {
        Rect {
            pos: self.pos,
            size: self.size,
        }
    }

    /// Move along the velocity vector
    pub fn advance(&mut self, dt: f32) {
        self.pos += self.vel * dt;
    }

    /// True while the entity is close enough to the canvas to keep
    pub fn in_bounds(&self, canvas: &Canvas) -> bool {
        self.pos.y < canvas.height + CULL_MARGIN
            && self.pos.x > -CULL_MARGIN
            && self.pos.x < canvas.width + CULL_MARGIN
    }
}

/// Canvas dimensions in pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Canvas {
    pub width: f32,
    pub height: f32,
}

impl Default for Canvas {
    fn default() -> Self {
        Self {
            width: CANVAS_MIN_WIDTH,
            height: CANVAS_MIN_HEIGHT,
        }
    }
}

impl Canvas {
    /// Canvas clamped to the supported size range
    pub fn clamped(width: f32, height: f32) -> Self {
        Self {
            width: width.clamp(CANVAS_MIN_WIDTH, CANVAS_MAX_WIDTH),
            height: height.clamp(CANVAS_MIN_HEIGHT, CANVAS_MAX_HEIGHT),
        }
    }
}

/// The player sprite
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub pos: Vec2,
    pub size: Vec2,
    /// Remaining health (0..=3)
    pub health: u8,
    /// Movement speed in pixels/s, kept within [min_speed, max_speed]
    pub speed: f32,
    pub min_speed: f32,
    pub max_speed: f32,
    /// Godmode expiry, if active (game time)
    pub godmode_until: Option<GameMs>,
    /// Hit-invincibility expiry, if active (wall clock)
    pub invincible_until: Option<WallMs>,
    /// Speed-boost expiry, if a boost is pending revert (game time)
    pub speed_boost_until: Option<GameMs>,
}

impl Player {
    /// Fresh player centered on the canvas
    pub fn new(canvas: &Canvas) -> Self {
        let mut player = Self {
            pos: Vec2::ZERO,
            size: Vec2::splat(PLAYER_SIZE),
            health: PLAYER_MAX_HEALTH,
            speed: PLAYER_BASE_SPEED,
            min_speed: PLAYER_MIN_SPEED,
            max_speed: PLAYER_MAX_SPEED,
            godmode_until: None,
            invincible_until: None,
            speed_boost_until: None,
        };
        player.center_on(canvas);
        player
    }

    pub fn center_on(&mut self, canvas: &Canvas) {
        self.pos = Vec2::new(
            canvas.width / 2.0 - self.size.x / 2.0,
            canvas.height / 2.0 - self.size.y / 2.0,
        );
    }

    pub fn rect(&self) -> Rect {
        Rect {
            pos: self.pos,
            size: self.size,
        }
    }

    #[inline]
    pub fn is_godmode(&self) -> bool {
        self.godmode_until.is_some()
    }

    #[inline]
    pub fn is_invincible(&self) -> bool {
        self.invincible_until.is_some()
    }

    /// Hazards pass through the player while either immunity is active
    #[inline]
    pub fn is_immune(&self) -> bool {
        self.is_godmode() || self.is_invincible()
    }

    /// Move by `step` pixels, keeping the whole sprite on the canvas
    pub fn move_clamped(&mut self, dir: Vec2, step: f32, canvas: &Canvas) {
        let max = Vec2::new(
            (canvas.width - self.size.x).max(0.0),
            (canvas.height - self.size.y).max(0.0),
        );
        self.pos = (self.pos + dir * step).clamp(Vec2::ZERO, max);
    }
}

/// Notifications produced by the simulation for the outside world
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    Started,
    Paused,
    Resumed,
    Reset,
    /// Unprotected hazard contact
    HazardHit { health: u8 },
    /// A pickup was consumed
    PickupCollected { kind: EntityKind, health: u8 },
    /// Health reached zero
    GameOver { survival_secs: f64 },
}

/// Player, entities and per-session counters
#[derive(Debug, Clone)]
pub struct GameState {
    pub canvas: Canvas,
    pub player: Player,
    /// Obstacles and items in insertion (render) order
    pub entities: Vec<Entity>,
    /// Simulation ticks since start; drives spawn cadence
    pub frame_count: u64,
    /// Background scroll offset (pixels, wraps at canvas height)
    pub bg_scroll: f32,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    pub fn new(canvas: Canvas) -> Self {
        Self {
            canvas,
            player: Player::new(&canvas),
            entities: Vec::new(),
            frame_count: 0,
            bg_scroll: 0.0,
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);
        id
    }

    /// Insert a new entity, returning its id
    pub fn insert(&mut self, kind: EntityKind, pos: Vec2, size: Vec2, vel: Vec2) -> u32 {
        let id = self.next_entity_id();
        self.entities.push(Entity {
            id,
            kind,
            pos,
            size,
            vel,
        });
        id
    }

    pub fn get(&self, id: u32) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id == id)
    }

    /// Remove every entity matching the predicate; returns how many went
    pub fn remove_where(&mut self, mut pred: impl FnMut(&Entity) -> bool) -> usize {
        let before = self.entities.len();
        self.entities.retain(|e| !pred(e));
        before - self.entities.len()
    }

    /// Remove exactly one entity by id
    pub fn remove_one(&mut self, id: u32) -> Option<Entity> {
        let idx = self.entities.iter().position(|e| e.id == id)?;
        Some(self.entities.remove(idx))
    }

    /// Drop entities that have left the canvas
    pub fn cull_offscreen(&mut self) -> usize {
        let canvas = self.canvas;
        self.remove_where(|e| !e.in_bounds(&canvas))
    }

    /// Whether the player should be drawn hidden this frame
    pub fn player_blinking(&self) -> bool {
        self.player.is_immune() && self.frame_count % BLINK_PERIOD_FRAMES < BLINK_PERIOD_FRAMES / 2
    }

    /// Back to a fresh session: default player, no entities, counters zeroed
    pub fn reset(&mut self) {
        self.player = Player::new(&self.canvas);
        self.entities.clear();
        self.frame_count = 0;
        self.bg_scroll = 0.0;
    }

    /// Apply a new canvas size and recenter the player
    pub fn resize(&mut self, canvas: Canvas) {
        self.canvas = canvas;
        self.player.center_on(&canvas);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> GameState {
        GameState::new(Canvas::clamped(800.0, 600.0))
    }

    fn hazard() -> EntityKind {
        EntityKind::Hazard {
            color: Rgb::new(255, 200, 100),
        }
    }

    #[test]
    fn test_new_player_is_centered_with_full_health() {
        let s = state();
        assert_eq!(s.player.pos, Vec2::new(380.0, 280.0));
        assert_eq!(s.player.health, PLAYER_MAX_HEALTH);
        assert_eq!(s.player.speed, PLAYER_BASE_SPEED);
        assert!(!s.player.is_immune());
    }

    #[test]
    fn test_insert_keeps_order_and_unique_ids() {
        let mut s = state();
        let a = s.insert(hazard(), Vec2::ZERO, Vec2::ONE, Vec2::ZERO);
        let b = s.insert(EntityKind::HealPickup, Vec2::ZERO, Vec2::ONE, Vec2::ZERO);
        let c = s.insert(hazard(), Vec2::ZERO, Vec2::ONE, Vec2::ZERO);
        assert!(a != b && b != c && a != c);
        let ids: Vec<u32> = s.entities.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![a, b, c]);
    }

    #[test]
    fn test_remove_one_is_exactly_once() {
        let mut s = state();
        let a = s.insert(hazard(), Vec2::ZERO, Vec2::ONE, Vec2::ZERO);
        let b = s.insert(hazard(), Vec2::ZERO, Vec2::ONE, Vec2::ZERO);
        assert_eq!(s.remove_one(a).map(|e| e.id), Some(a));
        assert!(s.remove_one(a).is_none());
        assert_eq!(s.entities.len(), 1);
        assert!(s.get(b).is_some());
    }

    #[test]
    fn test_remove_where_counts() {
        let mut s = state();
        s.insert(hazard(), Vec2::ZERO, Vec2::ONE, Vec2::ZERO);
        s.insert(EntityKind::HealPickup, Vec2::ZERO, Vec2::ONE, Vec2::ZERO);
        s.insert(hazard(), Vec2::ZERO, Vec2::ONE, Vec2::ZERO);
        assert_eq!(s.remove_where(|e| e.kind.is_hazard()), 2);
        assert_eq!(s.entities.len(), 1);
        assert_eq!(s.entities[0].kind, EntityKind::HealPickup);
    }

    #[test]
    fn test_cull_margin_edges() {
        let mut s = state();
        let gone = s.insert(hazard(), Vec2::new(-51.0, 100.0), Vec2::ONE, Vec2::ZERO);
        let kept = s.insert(hazard(), Vec2::new(-49.0, 100.0), Vec2::ONE, Vec2::ZERO);
        let right_gone = s.insert(hazard(), Vec2::new(851.0, 100.0), Vec2::ONE, Vec2::ZERO);
        let below_gone = s.insert(hazard(), Vec2::new(100.0, 651.0), Vec2::ONE, Vec2::ZERO);
        let below_kept = s.insert(hazard(), Vec2::new(100.0, 649.0), Vec2::ONE, Vec2::ZERO);

        assert_eq!(s.cull_offscreen(), 3);
        assert!(s.get(gone).is_none());
        assert!(s.get(right_gone).is_none());
        assert!(s.get(below_gone).is_none());
        assert!(s.get(kept).is_some());
        assert!(s.get(below_kept).is_some());
    }

    #[test]
    fn test_move_clamped_stays_on_canvas() {
        let canvas = Canvas::clamped(800.0, 600.0);
        let mut p = Player::new(&canvas);
        p.move_clamped(Vec2::new(-1.0, 0.0), 10_000.0, &canvas);
        assert_eq!(p.pos.x, 0.0);
        p.move_clamped(Vec2::new(1.0, 1.0), 10_000.0, &canvas);
        assert_eq!(p.pos, Vec2::new(760.0, 560.0));
        p.move_clamped(Vec2::new(0.0, -1.0), 10_000.0, &canvas);
        assert_eq!(p.pos, Vec2::new(760.0, 0.0));
    }

    #[test]
    fn test_canvas_clamping() {
        assert_eq!(Canvas::clamped(300.0, 5000.0), Canvas { width: 800.0, height: 1000.0 });
        assert_eq!(Canvas::clamped(1000.0, 700.0), Canvas { width: 1000.0, height: 700.0 });
        assert_eq!(Canvas::clamped(9999.0, 0.0), Canvas { width: 1400.0, height: 600.0 });
    }

    #[test]
    fn test_blink_only_while_immune() {
        let mut s = state();
        s.frame_count = 2;
        assert!(!s.player_blinking());
        s.player.invincible_until = Some(WallMs(1_000.0));
        assert!(s.player_blinking());
        s.frame_count = 7;
        assert!(!s.player_blinking());
        s.player.invincible_until = None;
        s.player.godmode_until = Some(GameMs(3_000.0));
        s.frame_count = 11;
        assert!(s.player_blinking());
    }

    #[test]
    fn test_color_metrics() {
        let c = Rgb::new(250, 150, 200);
        assert!((c.average() - 200.0).abs() < 1e-4);
        assert_eq!(c.max_channel_diff(), 100);
        assert_eq!(c.css(), "rgb(250, 150, 200)");
    }

    #[test]
    fn test_reset_restores_defaults() {
        let mut s = state();
        s.player.health = 1;
        s.player.speed = PLAYER_MAX_SPEED;
        s.player.godmode_until = Some(GameMs(10.0));
        s.frame_count = 99;
        s.bg_scroll = 42.0;
        s.insert(hazard(), Vec2::ZERO, Vec2::ONE, Vec2::ZERO);
        s.reset();
        assert_eq!(s.player, Player::new(&s.canvas));
        assert!(s.entities.is_empty());
        assert_eq!(s.frame_count, 0);
        assert_eq!(s.bg_scroll, 0.0);
    }
}
