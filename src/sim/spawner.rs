//! Obstacle and item spawning
//!
//! Every entity enters from the top edge, either falling straight down or
//! crossing the canvas diagonally from one side to the far bottom corner.

use glam::Vec2;
use rand::Rng;

use super::state::{Canvas, EntityKind, GameState, Rgb};
use crate::consts::*;
use crate::difficulty::DifficultyProfile;

/// Rejection-sampling budget for hazard colors
pub const MAX_COLOR_ATTEMPTS: u32 = 64;
/// Used when every sampled color was rejected
pub const FALLBACK_HAZARD_COLOR: Rgb = Rgb::new(255, 200, 100);

/// Hazard colors must be bright...
pub const MIN_COLOR_AVERAGE: f32 = 150.0;
/// ...and clearly not gray
pub const MIN_COLOR_SPREAD: u8 = 50;

/// Path an entity follows across the canvas
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trajectory {
    /// Straight down from a random point on the top edge
    Vertical,
    /// From just outside one side edge toward the opposite bottom corner
    Diagonal { from_left: bool },
}

impl Trajectory {
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        if rng.random_bool(0.5) {
            Trajectory::Vertical
        } else {
            Trajectory::Diagonal {
                from_left: rng.random_bool(0.5),
            }
        }
    }
}

/// True on ticks where an `every`-frame spawner fires
#[inline]
pub fn spawn_due(frame_count: u64, every: u64) -> bool {
    every > 0 && frame_count % every == 0
}

/// Entity speed: base plus a uniform random share of the variation
pub fn sample_speed<R: Rng + ?Sized>(profile: &DifficultyProfile, rng: &mut R) -> f32 {
    profile.base_speed + rng.random::<f32>() * profile.speed_variation
}

/// Starting position and velocity for an entity of `size`
pub fn launch<R: Rng + ?Sized>(
    canvas: &Canvas,
    size: Vec2,
    trajectory: Trajectory,
    speed: f32,
    rng: &mut R,
) -> (Vec2, Vec2) {
    match trajectory {
        Trajectory::Vertical => {
            let x = rng.random::<f32>() * (canvas.width - size.x).max(0.0);
            (Vec2::new(x, 0.0), Vec2::new(0.0, speed))
        }
        Trajectory::Diagonal { from_left } => {
            let (start_x, target_x) = if from_left {
                (-size.x, canvas.width + size.x)
            } else {
                (canvas.width, -size.x)
            };
            let start = Vec2::new(start_x, 0.0);
            let target = Vec2::new(target_x, canvas.height);
            (start, (target - start).normalize_or_zero() * speed)
        }
    }
}

/// Random bright, saturated hazard color
///
/// Channels are drawn from [100, 255] and redrawn until the average is at
/// least 150 and some pair of channels differs by at least 50.
pub fn random_hazard_color<R: Rng + ?Sized>(rng: &mut R) -> Rgb {
    for _ in 0..MAX_COLOR_ATTEMPTS {
        let color = Rgb::new(
            rng.random_range(100..=255),
            rng.random_range(100..=255),
            rng.random_range(100..=255),
        );
        if color.average() >= MIN_COLOR_AVERAGE && color.max_channel_diff() >= MIN_COLOR_SPREAD {
            return color;
        }
    }
    FALLBACK_HAZARD_COLOR
}

fn spawn<R: Rng + ?Sized>(
    state: &mut GameState,
    kind: EntityKind,
    size: Vec2,
    profile: &DifficultyProfile,
    rng: &mut R,
) -> u32 {
    let trajectory = Trajectory::random(rng);
    let speed = sample_speed(profile, rng);
    let (pos, vel) = launch(&state.canvas, size, trajectory, speed, rng);
    let id = state.insert(kind, pos, size, vel);
    log::trace!("Spawned {:?} #{} {:?} at {:?}", kind, id, trajectory, pos);
    id
}

/// Insert a new hazard
pub fn spawn_hazard<R: Rng + ?Sized>(
    state: &mut GameState,
    profile: &DifficultyProfile,
    rng: &mut R,
) -> u32 {
    let color = random_hazard_color(rng);
    spawn(
        state,
        EntityKind::Hazard { color },
        Vec2::new(HAZARD_WIDTH, HAZARD_HEIGHT),
        profile,
        rng,
    )
}

/// Insert a new pickup of a uniformly random kind
pub fn spawn_item<R: Rng + ?Sized>(
    state: &mut GameState,
    profile: &DifficultyProfile,
    rng: &mut R,
) -> u32 {
    let kind = EntityKind::PICKUPS[rng.random_range(0..EntityKind::PICKUPS.len())];
    spawn(state, kind, Vec2::splat(ITEM_SIZE), profile, rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::difficulty::Difficulty;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn canvas() -> Canvas {
        Canvas::clamped(800.0, 600.0)
    }

    #[test]
    fn test_spawn_due_cadence() {
        assert!(spawn_due(22, 22));
        assert!(spawn_due(44, 22));
        assert!(!spawn_due(23, 22));
        assert!(!spawn_due(5, 0));
    }

    #[test]
    fn test_vertical_launch_starts_on_top_edge() {
        let mut rng = Pcg32::seed_from_u64(1);
        let size = Vec2::new(HAZARD_WIDTH, HAZARD_HEIGHT);
        for _ in 0..100 {
            let (pos, vel) = launch(&canvas(), size, Trajectory::Vertical, 200.0, &mut rng);
            assert_eq!(pos.y, 0.0);
            assert!(pos.x >= 0.0 && pos.x <= 800.0 - HAZARD_WIDTH);
            assert_eq!(vel, Vec2::new(0.0, 200.0));
        }
    }

    #[test]
    fn test_diagonal_launch_heads_for_opposite_corner() {
        let mut rng = Pcg32::seed_from_u64(2);
        let size = Vec2::splat(ITEM_SIZE);
        let (pos, vel) = launch(
            &canvas(),
            size,
            Trajectory::Diagonal { from_left: true },
            250.0,
            &mut rng,
        );
        assert_eq!(pos, Vec2::new(-ITEM_SIZE, 0.0));
        assert!(vel.x > 0.0 && vel.y > 0.0);

        let (pos, vel) = launch(
            &canvas(),
            size,
            Trajectory::Diagonal { from_left: false },
            250.0,
            &mut rng,
        );
        assert_eq!(pos, Vec2::new(800.0, 0.0));
        assert!(vel.x < 0.0 && vel.y > 0.0);
        // Direction matches (target - start)
        let dir = Vec2::new(-ITEM_SIZE - 800.0, 600.0).normalize();
        assert!((vel.normalize() - dir).length() < 1e-5);
    }

    #[test]
    fn test_speed_within_profile_range() {
        let mut rng = Pcg32::seed_from_u64(3);
        for difficulty in Difficulty::ALL {
            let profile = difficulty.profile();
            for _ in 0..200 {
                let speed = sample_speed(&profile, &mut rng);
                assert!(speed >= profile.base_speed);
                assert!(speed <= profile.base_speed + profile.speed_variation);
            }
        }
    }

    #[test]
    fn test_spawned_entities_start_in_bounds() {
        let mut rng = Pcg32::seed_from_u64(4);
        let mut state = GameState::new(canvas());
        let profile = Difficulty::Hard.profile();
        for _ in 0..50 {
            spawn_hazard(&mut state, &profile, &mut rng);
            spawn_item(&mut state, &profile, &mut rng);
        }
        assert_eq!(state.entities.len(), 100);
        assert_eq!(state.cull_offscreen(), 0);
        assert_eq!(state.entities.iter().filter(|e| e.kind.is_hazard()).count(), 50);
    }

    #[test]
    fn test_items_cover_every_pickup_kind() {
        let mut rng = Pcg32::seed_from_u64(5);
        let mut state = GameState::new(canvas());
        let profile = Difficulty::Normal.profile();
        for _ in 0..200 {
            spawn_item(&mut state, &profile, &mut rng);
        }
        for kind in EntityKind::PICKUPS {
            assert!(state.entities.iter().any(|e| e.kind == kind), "{kind:?} never spawned");
        }
        assert!(state.entities.iter().all(|e| !e.kind.is_hazard()));
        assert!(state.entities.iter().all(|e| e.size == Vec2::splat(ITEM_SIZE)));
    }

    proptest! {
        #[test]
        fn prop_diagonal_speed_matches_sample(
            width in 1.0f32..4000.0,
            height in 1.0f32..4000.0,
            speed in 1.0f32..1000.0,
            from_left in any::<bool>(),
            seed in any::<u64>(),
        ) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let canvas = Canvas { width, height };
            let size = Vec2::new(HAZARD_WIDTH, HAZARD_HEIGHT);
            let (_, vel) = launch(&canvas, size, Trajectory::Diagonal { from_left }, speed, &mut rng);
            prop_assert!((vel.length() - speed).abs() <= speed * 1e-4);
        }

        #[test]
        fn prop_hazard_colors_are_bright_and_saturated(seed in any::<u64>()) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let color = random_hazard_color(&mut rng);
            prop_assert!(color.average() >= MIN_COLOR_AVERAGE);
            prop_assert!(color.max_channel_diff() >= MIN_COLOR_SPREAD);
            prop_assert!(color.r >= 100 && color.g >= 100 && color.b >= 100);
        }
    }
}
