//! Distance helpers used for hit-testing and culling
//!
//! Everything works in logical coordinates. Degenerate input must still
//! produce a finite distance.

use glam::Vec2;

/// Euclidean distance between two points
#[inline]
pub fn circle_distance(p: Vec2, q: Vec2) -> f32 {
    (p - q).length()
}

/// Distance from `p` to the closest point on segment `a`-`b`
///
/// The projection parameter is clamped to [0, 1]. A zero-length segment
/// falls back to the point-to-point distance.
pub fn point_segment_distance(p: Vec2, a: Vec2, b: Vec2) -> f32 {
    let seg = b - a;
    let len_sq = seg.length_squared();
    if len_sq < f32::EPSILON {
        return circle_distance(p, a);
    }

    let t = ((p - a).dot(seg) / len_sq).clamp(0.0, 1.0);
    let closest = a + seg * t;
    circle_distance(p, closest)
}

/// Unit heading for a velocity; a zero velocity heads along +x
#[inline]
pub fn heading(vel: Vec2) -> Vec2 {
    let angle = vel.y.atan2(vel.x);
    Vec2::new(angle.cos(), angle.sin())
}
