//! Pointer input normalization
//!
//! Two pointer models feed the same contract, a new logical player position:
//! - Mouse: absolute placement under the cursor
//! - Touch: relative drag, like a trackpad, accumulated from the previous
//!   raw coordinate
//!
//! Events without coordinates, or a surface with no displayed size, are
//! ignored.

use glam::Vec2;

use crate::consts::{LOGICAL_HEIGHT, LOGICAL_WIDTH};
use crate::sim::Player;

/// Pointer events the game understands, in client (CSS pixel) coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    /// Cursor moved to an absolute client position
    MouseMove { x: f32, y: f32 },
    /// A gesture began; `touch` is the first contact point, if any
    TouchStart { touch: Option<Vec2> },
    /// A gesture moved; `touch` is the first contact point, if any
    TouchMove { touch: Option<Vec2> },
    /// All contacts lifted
    TouchEnd,
}

/// Where the rendering surface sits on screen and how big it is logically
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceMetrics {
    /// Client-space origin of the surface
    pub left: f32,
    pub top: f32,
    /// Displayed size in client pixels
    pub width: f32,
    pub height: f32,
    /// Logical coordinate extent
    pub logical: Vec2,
}

impl SurfaceMetrics {
    /// Surface displayed at `(left, top)` with the given client size
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
            logical: Vec2::new(LOGICAL_WIDTH, LOGICAL_HEIGHT),
        }
    }

    /// Logical units per client pixel on each axis
    ///
    /// `None` when the surface has no usable displayed size.
    pub fn scale(&self) -> Option<Vec2> {
        let valid = |v: f32| v.is_finite() && v > 0.0;
        if !valid(self.width) || !valid(self.height) {
            return None;
        }
        Some(self.logical / Vec2::new(self.width, self.height))
    }

    /// Map a client position to logical coordinates (unclamped)
    pub fn to_logical(&self, client: Vec2) -> Option<Vec2> {
        let scale = self.scale()?;
        Some((client - Vec2::new(self.left, self.top)) * scale)
    }
}

/// Turns pointer events into player positions
#[derive(Debug, Clone)]
pub struct PointerNormalizer {
    /// Last raw touch coordinate of the active gesture
    baseline: Option<Vec2>,
    /// Multiplier on relative drag distance
    sensitivity: f32,
}

impl Default for PointerNormalizer {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl PointerNormalizer {
    pub fn new(sensitivity: f32) -> Self {
        Self {
            baseline: None,
            sensitivity,
        }
    }

    /// Forget any in-progress gesture
    pub fn reset(&mut self) {
        self.baseline = None;
    }

    /// Apply one event; returns true if the player moved
    pub fn handle(&mut self, event: PointerEvent, surface: &SurfaceMetrics, player: &mut Player) -> bool {
        match event {
            PointerEvent::MouseMove { x, y } => {
                let Some(logical) = surface.to_logical(Vec2::new(x, y)) else {
                    return false;
                };
                self.place(player, logical, surface)
            }
            PointerEvent::TouchStart { touch } => {
                if let Some(raw) = touch {
                    self.baseline = Some(raw);
                }
                false
            }
            PointerEvent::TouchMove { touch } => {
                let Some(raw) = touch else {
                    return false;
                };
                let Some(previous) = self.baseline.replace(raw) else {
                    // No gesture start seen; this point becomes the baseline
                    return false;
                };
                let Some(scale) = surface.scale() else {
                    return false;
                };
                let delta = (raw - previous) * scale * self.sensitivity;
                self.place(player, player.pos + delta, surface)
            }
            PointerEvent::TouchEnd => {
                self.baseline = None;
                false
            }
        }
    }

    fn place(&self, player: &mut Player, target: Vec2, surface: &SurfaceMetrics) -> bool {
        if !target.is_finite() {
            return false;
        }
        let clamped = player.clamp_to_surface(target, surface.logical);
        let moved = clamped != player.pos;
        player.pos = clamped;
        moved
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player_at(x: f32, y: f32) -> Player {
        Player {
            pos: Vec2::new(x, y),
            radius: 6.0,
        }
    }

    fn touch_move(x: f32, y: f32) -> PointerEvent {
        PointerEvent::TouchMove {
            touch: Some(Vec2::new(x, y)),
        }
    }

    #[test]
    fn test_mouse_maps_through_scale() {
        // 400x400 logical shown at 200x200, offset by (50, 20)
        let surface = SurfaceMetrics::new(50.0, 20.0, 200.0, 200.0);
        let mut input = PointerNormalizer::default();
        let mut player = player_at(200.0, 200.0);

        assert!(input.handle(PointerEvent::MouseMove { x: 100.0, y: 70.0 }, &surface, &mut player));
        assert_eq!(player.pos, Vec2::new(100.0, 100.0));
    }

    #[test]
    fn test_mouse_clamps_to_bounds() {
        let surface = SurfaceMetrics::new(0.0, 0.0, 400.0, 400.0);
        let mut input = PointerNormalizer::default();
        let mut player = player_at(200.0, 200.0);

        input.handle(PointerEvent::MouseMove { x: -30.0, y: 900.0 }, &surface, &mut player);
        assert_eq!(player.pos, Vec2::new(6.0, 394.0));
    }

    #[test]
    fn test_touch_drags_relative_to_previous_point() {
        let surface = SurfaceMetrics::new(0.0, 0.0, 400.0, 400.0);
        let mut input = PointerNormalizer::default();
        let mut player = player_at(100.0, 100.0);

        input.handle(PointerEvent::TouchStart { touch: Some(Vec2::new(300.0, 300.0)) }, &surface, &mut player);
        assert_eq!(player.pos, Vec2::new(100.0, 100.0));

        input.handle(touch_move(310.0, 300.0), &surface, &mut player);
        input.handle(touch_move(320.0, 300.0), &surface, &mut player);
        assert_eq!(player.pos, Vec2::new(120.0, 100.0));
    }

    #[test]
    fn test_touch_scales_deltas() {
        // Displayed at half size: one client pixel is two logical units
        let surface = SurfaceMetrics::new(0.0, 0.0, 200.0, 200.0);
        let mut input = PointerNormalizer::default();
        let mut player = player_at(100.0, 100.0);

        input.handle(PointerEvent::TouchStart { touch: Some(Vec2::new(10.0, 10.0)) }, &surface, &mut player);
        input.handle(touch_move(15.0, 7.0), &surface, &mut player);
        assert_eq!(player.pos, Vec2::new(110.0, 94.0));
    }

    #[test]
    fn test_touch_clamps_at_edge() {
        let surface = SurfaceMetrics::new(0.0, 0.0, 400.0, 400.0);
        let mut input = PointerNormalizer::default();
        let mut player = player_at(390.0, 200.0);

        input.handle(PointerEvent::TouchStart { touch: Some(Vec2::ZERO) }, &surface, &mut player);
        input.handle(touch_move(50.0, 0.0), &surface, &mut player);
        assert_eq!(player.pos, Vec2::new(394.0, 200.0));
    }

    #[test]
    fn test_sensitivity_multiplies_drag() {
        let surface = SurfaceMetrics::new(0.0, 0.0, 400.0, 400.0);
        let mut input = PointerNormalizer::new(2.0);
        let mut player = player_at(100.0, 100.0);

        input.handle(PointerEvent::TouchStart { touch: Some(Vec2::ZERO) }, &surface, &mut player);
        input.handle(touch_move(5.0, 0.0), &surface, &mut player);
        assert_eq!(player.pos, Vec2::new(110.0, 100.0));
    }

    #[test]
    fn test_empty_touch_list_is_a_no_op() {
        let surface = SurfaceMetrics::new(0.0, 0.0, 400.0, 400.0);
        let mut input = PointerNormalizer::default();
        let mut player = player_at(150.0, 150.0);

        assert!(!input.handle(PointerEvent::TouchStart { touch: None }, &surface, &mut player));
        assert!(!input.handle(PointerEvent::TouchMove { touch: None }, &surface, &mut player));
        assert_eq!(player.pos, Vec2::new(150.0, 150.0));
    }

    #[test]
    fn test_move_without_start_seeds_baseline() {
        let surface = SurfaceMetrics::new(0.0, 0.0, 400.0, 400.0);
        let mut input = PointerNormalizer::default();
        let mut player = player_at(150.0, 150.0);

        assert!(!input.handle(touch_move(80.0, 80.0), &surface, &mut player));
        assert_eq!(player.pos, Vec2::new(150.0, 150.0));
        assert!(input.handle(touch_move(90.0, 80.0), &surface, &mut player));
        assert_eq!(player.pos, Vec2::new(160.0, 150.0));
    }

    #[test]
    fn test_touch_end_clears_gesture() {
        let surface = SurfaceMetrics::new(0.0, 0.0, 400.0, 400.0);
        let mut input = PointerNormalizer::default();
        let mut player = player_at(150.0, 150.0);

        input.handle(PointerEvent::TouchStart { touch: Some(Vec2::ZERO) }, &surface, &mut player);
        input.handle(PointerEvent::TouchEnd, &surface, &mut player);
        // A fresh gesture elsewhere must not jump by the distance between gestures
        assert!(!input.handle(touch_move(300.0, 300.0), &surface, &mut player));
        assert_eq!(player.pos, Vec2::new(150.0, 150.0));
    }

    #[test]
    fn test_zero_sized_surface_is_ignored() {
        let surface = SurfaceMetrics::new(0.0, 0.0, 0.0, 400.0);
        let mut input = PointerNormalizer::default();
        let mut player = player_at(150.0, 150.0);

        assert!(!input.handle(PointerEvent::MouseMove { x: 10.0, y: 10.0 }, &surface, &mut player));
        assert_eq!(player.pos, Vec2::new(150.0, 150.0));
    }
}
