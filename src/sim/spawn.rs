//! Time-keyed difficulty and hazard spawning
//!
//! Difficulty is derived purely from survival time: the set of unlocked
//! kinds grows every ten seconds and the spawn probability ramps up.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;

use super::state::{GameState, Hazard, HazardKind, LineShape, Motion, Trail};
use crate::consts::*;

static UNLOCK_ORDER: [HazardKind; 11] = HazardKind::ALL;

/// Kinds available at `seconds` of survival, in unlock order
///
/// Always contains at least `Horizontal`.
pub fn unlocked_kinds(seconds: f64) -> &'static [HazardKind] {
    let count = UNLOCK_ORDER
        .iter()
        .take_while(|k| seconds >= k.unlock_seconds())
        .count();
    &UNLOCK_ORDER[..count.max(1)]
}

/// Deepest unlocked kind; drives the stage label
pub fn current_stage(seconds: f64) -> HazardKind {
    unlocked_kinds(seconds)
        .last()
        .copied()
        .unwrap_or(HazardKind::Horizontal)
}

/// Display label for the stage reached at `seconds`
pub fn stage_label(seconds: f64) -> String {
    let stage = current_stage(seconds);
    format!("Stage {} - {}", stage.stage_number(), stage)
}

/// Per-tick probability from the ramp formula (saturates at 1.0)
pub fn spawn_chance(seconds: f64) -> f64 {
    ((SPAWN_BASE + seconds * SPAWN_RAMP) * SPAWN_SCALE).clamp(0.0, 1.0)
}

/// Roll the spawn gate for this tick
fn should_spawn<R: Rng>(seconds: f64, rng: &mut R) -> bool {
    if rng.random::<f64>() < spawn_chance(seconds) {
        return true;
    }
    seconds > LATE_GAME_SECONDS && rng.random::<f64>() < LATE_GAME_CHANCE
}

/// Update the stage and possibly append one new hazard
///
/// Returns the kind that was spawned, if any.
pub fn maybe_spawn<R: Rng>(state: &mut GameState, rng: &mut R) -> Option<HazardKind> {
    let seconds = state.elapsed_seconds();

    let stage = current_stage(seconds);
    if stage != state.stage {
        log::info!("Stage {} reached: {} unlocked", stage.stage_number(), stage);
        state.stage = stage;
    }

    if !should_spawn(seconds, rng) {
        return None;
    }

    let kinds = unlocked_kinds(seconds);
    let kind = kinds[rng.random_range(0..kinds.len())];
    let id = state.next_entity_id();
    let hazard = spawn_hazard(kind, id, rng);
    log::debug!("Spawned {} #{} at ({:.0}, {:.0})", kind, id, hazard.pos.x, hazard.pos.y);
    state.hazards.push(hazard);
    Some(kind)
}

/// Build a hazard of `kind` with its initial kinematics
pub fn spawn_hazard<R: Rng>(kind: HazardKind, id: u32, rng: &mut R) -> Hazard {
    match kind {
        HazardKind::Horizontal => {
            let size = rng.random_range(5.0..9.0);
            let (pos, vel) = from_side(rng, size);
            Hazard::new(id, pos, vel, size, Motion::Horizontal)
        }
        HazardKind::Vertical => {
            let size = rng.random_range(5.0..9.0);
            let (pos, vel) = from_top_or_bottom(rng, size);
            Hazard::new(id, pos, vel, size, Motion::Vertical)
        }
        HazardKind::Diagonal => {
            let size = rng.random_range(5.0..8.0);
            let (pos, vel) = diagonal_entry(rng, size);
            Hazard::new(id, pos, vel, size, Motion::Diagonal)
        }
        HazardKind::Parabola => {
            let size = rng.random_range(6.0..9.0);
            let (pos, vel, gravity) = launch_from_bottom(rng, size);
            Hazard::new(id, pos, vel, size, Motion::Parabola { gravity })
        }
        HazardKind::Snowflake => {
            let size = rng.random_range(4.0..7.0);
            let pos = Vec2::new(rng.random_range(0.0..LOGICAL_WIDTH), -size);
            let vel = Vec2::new(0.0, rng.random_range(0.5..1.5));
            let motion = Motion::Snowflake {
                sway: rng.random_range(0.5..1.5),
                phase: rng.random_range(0.0..TAU),
            };
            Hazard::new(id, pos, vel, size, motion)
        }
        HazardKind::HLine => {
            let line = line_shape(rng);
            let (pos, vel) = from_side(rng, 0.0);
            Hazard::new(id, pos, vel, line.line_width, Motion::HLine(line))
        }
        HazardKind::VLine => {
            let line = line_shape(rng);
            let (pos, vel) = from_top_or_bottom(rng, 0.0);
            Hazard::new(id, pos, vel, line.line_width, Motion::VLine(line))
        }
        HazardKind::DLine => {
            let line = line_shape(rng);
            let (pos, vel) = diagonal_entry(rng, 0.0);
            Hazard::new(id, pos, vel, line.line_width, Motion::DLine(line))
        }
        HazardKind::PLine => {
            let line = LineShape {
                length: rng.random_range(30.0..60.0),
                line_width: LINE_WIDTH,
            };
            let (pos, vel, gravity) = launch_from_bottom(rng, 0.0);
            Hazard::new(id, pos, vel, line.line_width, Motion::PLine { line, gravity })
        }
        HazardKind::Snake => {
            let size = 6.0;
            let pos = random_edge_point(rng, size);
            let center = Vec2::new(LOGICAL_WIDTH / 2.0, LOGICAL_HEIGHT / 2.0);
            let vel = (center - pos).normalize_or_zero() * MIN_SPEED;
            let motion = Motion::Snake { trail: Trail::new() };
            Hazard::new(id, pos, vel, size, motion)
        }
        HazardKind::Surface => {
            let inset = 40.0;
            let pos = Vec2::new(
                rng.random_range(inset..LOGICAL_WIDTH - inset),
                rng.random_range(inset..LOGICAL_HEIGHT - inset),
            );
            let angle = rng.random_range(0.0..TAU);
            let drift: f32 = rng.random_range(0.1..0.4);
            let vel = Vec2::new(angle.cos(), angle.sin()) * drift;
            let motion = Motion::Surface {
                max_size: rng.random_range(25.0..45.0),
                growth_rate: rng.random_range(0.05..0.15),
            };
            Hazard::new(id, pos, vel, 4.0, motion)
        }
    }
}

fn speed<R: Rng>(rng: &mut R) -> f32 {
    rng.random_range(MIN_SPEED..MAX_SPEED)
}

fn line_shape<R: Rng>(rng: &mut R) -> LineShape {
    LineShape {
        length: rng.random_range(40.0..90.0),
        line_width: LINE_WIDTH,
    }
}

/// Enter from the left or right edge, moving horizontally inward
fn from_side<R: Rng>(rng: &mut R, inset: f32) -> (Vec2, Vec2) {
    let y = rng.random_range(0.0..LOGICAL_HEIGHT);
    let speed = speed(rng);
    if rng.random_bool(0.5) {
        (Vec2::new(-inset, y), Vec2::new(speed, 0.0))
    } else {
        (Vec2::new(LOGICAL_WIDTH + inset, y), Vec2::new(-speed, 0.0))
    }
}

/// Enter from the top or bottom edge, moving vertically inward
fn from_top_or_bottom<R: Rng>(rng: &mut R, inset: f32) -> (Vec2, Vec2) {
    let x = rng.random_range(0.0..LOGICAL_WIDTH);
    let speed = speed(rng);
    if rng.random_bool(0.5) {
        (Vec2::new(x, -inset), Vec2::new(0.0, speed))
    } else {
        (Vec2::new(x, LOGICAL_HEIGHT + inset), Vec2::new(0.0, -speed))
    }
}

/// Enter from any edge with drift along the perpendicular axis
fn diagonal_entry<R: Rng>(rng: &mut R, inset: f32) -> (Vec2, Vec2) {
    let (pos, inward) = if rng.random_bool(0.5) {
        from_side(rng, inset)
    } else {
        from_top_or_bottom(rng, inset)
    };
    let drift_limit = inward.length();
    let drift = rng.random_range(-drift_limit..drift_limit);
    let perpendicular = inward.perp().normalize_or_zero() * drift;
    (pos, inward + perpendicular)
}

/// Thrown upward from below the surface; returns (pos, vel, gravity)
fn launch_from_bottom<R: Rng>(rng: &mut R, inset: f32) -> (Vec2, Vec2, f32) {
    let x = rng.random_range(LOGICAL_WIDTH * 0.1..LOGICAL_WIDTH * 0.9);
    let pos = Vec2::new(x, LOGICAL_HEIGHT + inset);
    let vel = Vec2::new(rng.random_range(-2.0..2.0), rng.random_range(-8.5..-6.0));
    let gravity = rng.random_range(0.1..0.15);
    (pos, vel, gravity)
}

fn random_edge_point<R: Rng>(rng: &mut R, inset: f32) -> Vec2 {
    match rng.random_range(0..4) {
        0 => Vec2::new(-inset, rng.random_range(0.0..LOGICAL_HEIGHT)),
        1 => Vec2::new(LOGICAL_WIDTH + inset, rng.random_range(0.0..LOGICAL_HEIGHT)),
        2 => Vec2::new(rng.random_range(0.0..LOGICAL_WIDTH), -inset),
        _ => Vec2::new(rng.random_range(0.0..LOGICAL_WIDTH), LOGICAL_HEIGHT + inset),
    }
}
