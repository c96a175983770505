//! Simulation module
//!
//! All gameplay logic lives here. Nothing in this module touches the DOM,
//! audio or storage:
//! - Time comes in as explicit wall-clock timestamps
//! - Randomness comes from the session's seeded RNG
//! - Side effects leave as [`GameEvent`]s for the frame driver to dispatch

pub mod collision;
pub mod session;
pub mod spawner;
pub mod state;
pub mod tick;
pub mod time;

pub use collision::{apply_pickup, expire_timers, overlaps, resolve_collisions};
pub use session::Session;
pub use spawner::{Trajectory, random_hazard_color, spawn_hazard, spawn_item};
pub use state::{Canvas, Entity, EntityKind, GameEvent, GamePhase, GameState, Player, Rect, Rgb};
pub use tick::{Direction, TickInput, frame_delta, tick};
pub use time::{Clock, GameMs, Instant, ManualClock, SystemClock, WallMs};
