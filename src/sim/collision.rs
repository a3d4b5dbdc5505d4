//! Hazard vs player hit-testing
//!
//! Contact is binary: there is no bounce or displacement, only damage.
//! Point-like hazards are circles; line hazards are a thick segment trailing
//! behind their head.

use glam::Vec2;

use super::geometry::{circle_distance, point_segment_distance};
use super::state::{Hazard, Player};

/// Collision representation of a hazard
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HitShape {
    Circle { center: Vec2, radius: f32 },
    Segment { head: Vec2, tail: Vec2, half_width: f32 },
}

impl HitShape {
    pub fn of(hazard: &Hazard) -> Self {
        match hazard.segment() {
            Some((head, tail, line_width)) => HitShape::Segment {
                head,
                tail,
                half_width: line_width / 2.0,
            },
            None => HitShape::Circle {
                center: hazard.pos,
                radius: hazard.size,
            },
        }
    }

    /// Gap between the shape and a circle at `pos` (negative when overlapping)
    pub fn clearance(&self, pos: Vec2, radius: f32) -> f32 {
        match *self {
            HitShape::Circle { center, radius: r } => circle_distance(center, pos) - (r + radius),
            HitShape::Segment {
                head,
                tail,
                half_width,
            } => point_segment_distance(pos, head, tail) - (radius + half_width),
        }
    }
}

/// Check whether a hazard currently overlaps the player
pub fn hazard_hits_player(hazard: &Hazard, player: &Player) -> bool {
    HitShape::of(hazard).clearance(player.pos, player.radius) < 0.0
}
