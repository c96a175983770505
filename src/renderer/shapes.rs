//! Shape generation for 2D primitives
//!
//! Pure geometry: each entity kind maps to a [`Shape`] in canvas pixels,
//! which the Canvas 2D backend turns into path calls.

use glam::Vec2;
use std::f32::consts::PI;

use crate::sim::{EntityKind, Rect};

/// Item colors
pub const STAR_FILL: &str = "yellow";
pub const STAR_STROKE: &str = "orange";
pub const HEART_FILL: &str = "red";
pub const SPEED_UP_FILL: &str = "blue";
pub const SPEED_DOWN_FILL: &str = "#FF6B35";
pub const SPEED_DOWN_STROKE: &str = "#FFFFFF";
pub const OUTLINE_WIDTH: f64 = 2.0;

/// Number of spikes on the invincibility star
pub const STAR_SPIKES: u32 = 5;

/// One cubic Bezier segment: two control points and the end point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cubic {
    pub c1: Vec2,
    pub c2: Vec2,
    pub end: Vec2,
}

/// A drawable outline with its paint
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// Axis-aligned filled rectangle
    Box { rect: Rect, fill: String },
    /// Closed polygon, filled then optionally stroked
    Polygon {
        points: Vec<Vec2>,
        fill: &'static str,
        stroke: Option<&'static str>,
    },
    /// Closed Bezier path starting at `start`
    Curves {
        start: Vec2,
        segments: [Cubic; 4],
        fill: &'static str,
    },
    Circle {
        center: Vec2,
        radius: f32,
        fill: &'static str,
        stroke: Option<&'static str>,
    },
}

/// Shape for an entity occupying `rect`
pub fn entity_shape(kind: &EntityKind, rect: Rect) -> Shape {
    let center = rect.center();
    let half = rect.size.x / 2.0;
    match kind {
        EntityKind::Hazard { color } => Shape::Box {
            rect,
            fill: color.css(),
        },
        EntityKind::InvincibilityPickup => Shape::Polygon {
            points: star(center, STAR_SPIKES, half, half / 2.0),
            fill: STAR_FILL,
            stroke: Some(STAR_STROKE),
        },
        EntityKind::HealPickup => {
            let (start, segments) = heart(center, half);
            Shape::Curves {
                start,
                segments,
                fill: HEART_FILL,
            }
        }
        EntityKind::SpeedUpPickup => Shape::Circle {
            center,
            radius: half,
            fill: SPEED_UP_FILL,
            stroke: None,
        },
        EntityKind::SpeedDownPickup => Shape::Circle {
            center,
            radius: half,
            fill: SPEED_DOWN_FILL,
            stroke: Some(SPEED_DOWN_STROKE),
        },
    }
}

/// Star outline, starting at the top spike and alternating outer/inner
/// vertices (`2 * spikes` points)
pub fn star(center: Vec2, spikes: u32, outer_radius: f32, inner_radius: f32) -> Vec<Vec2> {
    let step = PI / spikes as f32;
    let mut rot = PI * 1.5;
    let mut points = Vec::with_capacity((spikes * 2) as usize);

    for _ in 0..spikes {
        points.push(center + Vec2::new(rot.cos(), rot.sin()) * outer_radius);
        rot += step;
        points.push(center + Vec2::new(rot.cos(), rot.sin()) * inner_radius);
        rot += step;
    }

    points
}

/// Heart made of four cubic curves; returns the start point (bottom tip
/// of the notch) and the segments. `size` is half the heart's width.
pub fn heart(center: Vec2, size: f32) -> (Vec2, [Cubic; 4]) {
    let Vec2 { x: cx, y: cy } = center;
    let tip = Vec2::new(cx, cy + size / 4.0);
    let left = Vec2::new(cx - size, cy - size / 2.0);
    let right = Vec2::new(cx + size, cy - size / 2.0);

    let segments = [
        Cubic {
            c1: Vec2::new(cx, cy),
            c2: Vec2::new(cx - size, cy),
            end: left,
        },
        Cubic {
            c1: Vec2::new(cx - size, cy - size),
            c2: Vec2::new(cx, cy - size / 1.5),
            end: tip,
        },
        Cubic {
            c1: Vec2::new(cx, cy - size / 1.5),
            c2: Vec2::new(cx + size, cy - size),
            end: right,
        },
        Cubic {
            c1: Vec2::new(cx + size, cy),
            c2: Vec2::new(cx, cy),
            end: tip,
        },
    ];

    (tip, segments)
}
