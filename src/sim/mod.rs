//! Simulation module
//!
//! All gameplay logic lives here. No rendering or platform dependencies:
//! - Logical coordinates only
//! - Randomness is passed in by the caller
//! - One `tick` per displayed frame, damage scaled by measured delta time

pub mod collision;
pub mod geometry;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::{HitShape, hazard_hits_player};
pub use geometry::{circle_distance, point_segment_distance};
pub use spawn::{current_stage, maybe_spawn, spawn_chance, spawn_hazard, stage_label, unlocked_kinds};
pub use state::{GameState, Hazard, HazardKind, LifeMeter, LineShape, Motion, Player, Rgb, Trail};
pub use tick::{StepReport, prune, tick};
