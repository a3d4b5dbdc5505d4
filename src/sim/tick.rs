//! Per-frame simulation step
//!
//! Hazard kinematics are expressed in units per tick; damage is measured in
//! wall time so one second of contact is lethal at any frame rate.

use glam::Vec2;

use super::collision::hazard_hits_player;
use super::state::{GameState, Hazard, Motion};
use crate::consts::*;

/// What happened during one step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepReport {
    /// Life after this step
    pub life: f64,
    /// Hazards overlapping the player this step
    pub hits: usize,
    /// Hazards removed for leaving the culling margin
    pub culled: usize,
}

/// Advance every hazard, apply contact damage, then cull
///
/// Any number of simultaneous hits costs exactly `dt_ms / 1000` life.
pub fn tick(state: &mut GameState, dt_ms: f64) -> StepReport {
    let target = state.player.pos;
    for hazard in &mut state.hazards {
        advance(hazard, target);
    }

    let hits = state
        .hazards
        .iter()
        .filter(|h| hazard_hits_player(h, &state.player))
        .count();
    if hits > 0 {
        state.life.drain(dt_ms);
    }

    let culled = prune(&mut state.hazards);

    StepReport {
        life: state.life.value(),
        hits,
        culled,
    }
}

/// Variant-specific velocity update followed by integration
fn advance(hazard: &mut Hazard, player_pos: Vec2) {
    match &mut hazard.motion {
        Motion::Parabola { gravity } | Motion::PLine { gravity, .. } => {
            hazard.vel.y += *gravity;
        }
        Motion::Snowflake { sway, phase } => {
            *phase += SNOWFLAKE_PHASE_STEP;
            hazard.vel.x = phase.sin() * *sway;
        }
        Motion::Snake { trail } => {
            trail.push(hazard.pos);
            let toward = (player_pos - hazard.pos).normalize_or_zero();
            hazard.vel = hazard.vel * SNAKE_DAMPING + toward * SNAKE_STEER;
        }
        Motion::Surface {
            max_size,
            growth_rate,
        } => {
            hazard.size = (hazard.size + *growth_rate).min(*max_size);
        }
        Motion::Horizontal
        | Motion::Vertical
        | Motion::Diagonal
        | Motion::HLine(_)
        | Motion::VLine(_)
        | Motion::DLine(_) => {}
    }

    hazard.pos += hazard.vel;
}

/// Drop hazards beyond the culling margin; returns how many were removed
pub fn prune(hazards: &mut Vec<Hazard>) -> usize {
    let before = hazards.len();
    hazards.retain(Hazard::within_margin);
    before - hazards.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{HazardKind, LineShape, Player, Trail};
    use proptest::prelude::*;

    fn parked(id: u32, pos: Vec2, motion: Motion) -> Hazard {
        Hazard::new(id, pos, Vec2::ZERO, 5.0, motion)
    }

    #[test]
    fn test_single_hit_drains_by_elapsed_time() {
        let mut state = GameState::new();
        let at = state.player.pos;
        state.hazards.push(parked(1, at, Motion::Horizontal));

        let report = tick(&mut state, 250.0);
        assert_eq!(report.hits, 1);
        assert_eq!(report.life, 0.75);
        assert_eq!(state.life.value(), 0.75);
    }

    #[test]
    fn test_multiple_hits_are_not_additive() {
        let mut state = GameState::new();
        let at = state.player.pos;
        for id in 0..3 {
            state.hazards.push(parked(id, at, Motion::Horizontal));
        }

        let report = tick(&mut state, 100.0);
        assert_eq!(report.hits, 3);
        assert_eq!(report.life, 1.0 - 100.0 / 1000.0);
    }

    #[test]
    fn test_no_contact_no_damage() {
        let mut state = GameState::new();
        state.hazards.push(parked(1, Vec2::new(10.0, 10.0), Motion::Horizontal));
        let report = tick(&mut state, 500.0);
        assert_eq!(report.hits, 0);
        assert_eq!(report.life, MAX_LIFE);
    }

    #[test]
    fn test_linear_integration() {
        let mut state = GameState::new();
        state.hazards.push(Hazard::new(1, Vec2::new(0.0, 50.0), Vec2::new(3.0, 1.0), 5.0, Motion::Diagonal));
        tick(&mut state, 16.0);
        tick(&mut state, 16.0);
        assert_eq!(state.hazards[0].pos, Vec2::new(6.0, 52.0));
        assert_eq!(state.hazards[0].vel, Vec2::new(3.0, 1.0));
    }

    #[test]
    fn test_parabola_applies_gravity_before_integrating() {
        let mut state = GameState::new();
        state.hazards.push(Hazard::new(
            1,
            Vec2::new(50.0, 300.0),
            Vec2::new(0.0, -2.0),
            5.0,
            Motion::Parabola { gravity: 0.5 },
        ));
        tick(&mut state, 16.0);
        assert_eq!(state.hazards[0].vel.y, -1.5);
        assert_eq!(state.hazards[0].pos.y, 298.5);

        let line = LineShape {
            length: 40.0,
            line_width: LINE_WIDTH,
        };
        let mut h = Hazard::new(2, Vec2::new(50.0, 300.0), Vec2::ZERO, 3.0, Motion::PLine { line, gravity: 0.25 });
        advance(&mut h, Vec2::ZERO);
        assert_eq!(h.vel.y, 0.25);
        assert_eq!(h.pos.y, 300.25);
    }

    #[test]
    fn test_snowflake_sways() {
        let mut h = Hazard::new(1, Vec2::new(100.0, 0.0), Vec2::new(0.0, 1.0), 5.0, Motion::Snowflake { sway: 2.0, phase: 0.0 });
        advance(&mut h, Vec2::ZERO);
        let expected = SNOWFLAKE_PHASE_STEP.sin() * 2.0;
        assert!((h.vel.x - expected).abs() < 1e-6);
        assert_eq!(h.vel.y, 1.0);
        match h.motion {
            Motion::Snowflake { phase, .. } => assert_eq!(phase, SNOWFLAKE_PHASE_STEP),
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_snake_steers_and_bounds_trail() {
        let mut h = Hazard::new(1, Vec2::new(0.0, 0.0), Vec2::ZERO, 6.0, Motion::Snake { trail: Trail::new() });
        let player = Vec2::new(1.0e6, 0.0);

        advance(&mut h, player);
        assert!((h.vel - Vec2::new(SNAKE_STEER, 0.0)).length() < 1e-6);

        for _ in 0..100 {
            advance(&mut h, player);
        }
        match &h.motion {
            Motion::Snake { trail } => {
                assert_eq!(trail.len(), SNAKE_TRAIL_LENGTH);
                let newest = trail.iter().last().unwrap_or_default();
                assert!(newest.x < h.pos.x);
            }
            _ => unreachable!(),
        }
        // Damped seek never exceeds steer / (1 - damping)
        assert!(h.vel.length() <= SNAKE_STEER / (1.0 - SNAKE_DAMPING) + 1e-3);
    }

    #[test]
    fn test_surface_growth_caps() {
        let mut h = Hazard::new(
            1,
            Vec2::new(200.0, 200.0),
            Vec2::ZERO,
            4.0,
            Motion::Surface {
                max_size: 5.0,
                growth_rate: 0.4,
            },
        );
        advance(&mut h, Vec2::ZERO);
        assert!((h.size - 4.4).abs() < 1e-6);
        for _ in 0..10 {
            advance(&mut h, Vec2::ZERO);
        }
        assert_eq!(h.size, 5.0);
        assert_eq!(h.kind(), HazardKind::Surface);
    }

    #[test]
    fn test_prune_uses_margin() {
        let mut hazards = vec![
            parked(1, Vec2::new(-CULL_MARGIN, 0.0), Motion::Horizontal),
            parked(2, Vec2::new(-CULL_MARGIN - 0.5, 0.0), Motion::Horizontal),
            parked(3, Vec2::new(200.0, LOGICAL_HEIGHT + CULL_MARGIN + 1.0), Motion::Vertical),
            parked(4, Vec2::new(200.0, 200.0), Motion::Vertical),
        ];
        assert_eq!(prune(&mut hazards), 2);
        let ids: Vec<u32> = hazards.iter().map(|h| h.id).collect();
        assert_eq!(ids, vec![1, 4]);
    }

    #[test]
    fn test_tick_culls_after_moving() {
        let mut state = GameState::new();
        state.player = Player {
            pos: Vec2::new(200.0, 200.0),
            radius: PLAYER_RADIUS,
        };
        state.hazards.push(Hazard::new(
            1,
            Vec2::new(LOGICAL_WIDTH + CULL_MARGIN - 1.0, 10.0),
            Vec2::new(5.0, 0.0),
            5.0,
            Motion::Horizontal,
        ));
        let report = tick(&mut state, 16.0);
        assert_eq!(report.culled, 1);
        assert!(state.hazards.is_empty());
    }

    fn arb_positions() -> impl Strategy<Value = Vec<(f32, f32)>> {
        prop::collection::vec((-800.0f32..1200.0, -800.0f32..1200.0), 0..40)
    }

    proptest! {
        #[test]
        fn damage_is_exact_and_non_additive(dt in 0.0f64..1000.0, extra in 0usize..5) {
            let mut state = GameState::new();
            let at = state.player.pos;
            for id in 0..=extra {
                state.hazards.push(parked(id as u32, at, Motion::Horizontal));
            }
            let report = tick(&mut state, dt);
            prop_assert_eq!(report.hits, extra + 1);
            prop_assert_eq!(report.life, MAX_LIFE - dt / 1000.0);
        }

        #[test]
        fn prune_is_idempotent_and_order_independent(points in arb_positions()) {
            let hazards: Vec<Hazard> = points
                .iter()
                .enumerate()
                .map(|(i, &(x, y))| parked(i as u32, Vec2::new(x, y), Motion::Horizontal))
                .collect();

            let mut once = hazards.clone();
            prune(&mut once);
            let mut twice = once.clone();
            prop_assert_eq!(prune(&mut twice), 0);

            let mut reversed: Vec<Hazard> = hazards.iter().rev().cloned().collect();
            prune(&mut reversed);

            let mut ids_once: Vec<u32> = once.iter().map(|h| h.id).collect();
            let ids_twice: Vec<u32> = twice.iter().map(|h| h.id).collect();
            let mut ids_reversed: Vec<u32> = reversed.iter().map(|h| h.id).collect();
            prop_assert_eq!(&ids_once, &ids_twice);
            ids_once.sort_unstable();
            ids_reversed.sort_unstable();
            prop_assert_eq!(ids_once, ids_reversed);
        }
    }
}
