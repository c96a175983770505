//! Collision detection and effect resolution
//!
//! Overlap is a strict axis-aligned box test. Hazards hurt unless the player
//! is immune; pickups are always consumed and always apply their effect.

use super::state::{EntityKind, GameEvent, GameState, Player, Rect};
use super::time::Instant;
use crate::consts::*;

/// Strict AABB intersection; rectangles that only touch do not overlap
#[inline]
pub fn overlaps(a: &Rect, b: &Rect) -> bool {
    a.left() < b.right() && a.right() > b.left() && a.top() < b.bottom() && a.bottom() > b.top()
}

/// Clear effects whose expiry has passed
///
/// Godmode and speed boost compare against game time, hit-invincibility
/// against the wall clock.
pub fn expire_timers(player: &mut Player, now: Instant) {
    if player.godmode_until.is_some_and(|until| now.game >= until) {
        player.godmode_until = None;
        log::debug!("Godmode expired");
    }

    if player.invincible_until.is_some_and(|until| now.wall >= until) {
        player.invincible_until = None;
    }

    if player.speed_boost_until.is_some_and(|until| now.game >= until) {
        player.speed = (player.speed - SPEED_PICKUP_DELTA).max(player.min_speed);
        player.speed_boost_until = None;
        log::debug!("Speed boost expired, speed {}", player.speed);
    }
}

/// Apply a pickup's effect to the player
pub fn apply_pickup(player: &mut Player, kind: EntityKind, now: Instant) {
    match kind {
        EntityKind::InvincibilityPickup => {
            player.godmode_until = Some(now.game.plus(GODMODE_MS));
        }
        EntityKind::HealPickup => {
            if player.health < PLAYER_MAX_HEALTH {
                player.health += 1;
            }
        }
        EntityKind::SpeedUpPickup => {
            player.speed = (player.speed + SPEED_PICKUP_DELTA).min(player.max_speed);
            player.speed_boost_until = Some(now.game.plus(SPEED_BOOST_MS));
        }
        // No timer: a slowdown lasts until a speed-up or reset undoes it
        EntityKind::SpeedDownPickup => {
            player.speed = (player.speed - SPEED_PICKUP_DELTA).max(player.min_speed);
        }
        EntityKind::Hazard { .. } => {}
    }
}

/// Resolve every player/entity overlap for this tick
///
/// Overlaps are collected up front and each consumed entity is removed by id,
/// so nothing is removed twice. Stops at the first fatal hit.
pub fn resolve_collisions(state: &mut GameState, now: Instant) -> Vec<GameEvent> {
    let player_rect = state.player.rect();
    let touching: Vec<(u32, EntityKind)> = state
        .entities
        .iter()
        .filter(|e| overlaps(&player_rect, &e.rect()))
        .map(|e| (e.id, e.kind))
        .collect();

    let mut events = Vec::new();
    for (id, kind) in touching {
        if kind.is_hazard() {
            // Immune: the hazard keeps flying
            if state.player.is_immune() {
                continue;
            }
            state.remove_one(id);
            let player = &mut state.player;
            player.health = player.health.saturating_sub(1);
            player.invincible_until = Some(now.wall.plus(HIT_INVINCIBILITY_MS));
            log::debug!("Hit by hazard #{}, health {}", id, player.health);
            events.push(GameEvent::HazardHit {
                health: player.health,
            });
            if player.health == 0 {
                break;
            }
        } else {
            state.remove_one(id);
            apply_pickup(&mut state.player, kind, now);
            log::debug!("Collected {:?} #{}", kind, id);
            events.push(GameEvent::PickupCollected {
                kind,
                health: state.player.health,
            });
        }
    }
    events
}
