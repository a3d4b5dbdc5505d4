//! Survival Dodge - a real-time hazard-dodging mini-game
//!
//! Core modules:
//! - `sim`: Simulation (hazards, spawning, collisions, life meter)
//! - `platform`: Pointer input normalization
//! - `game`: Frame loop controller and run lifecycle
//! - `render`: Draw list in logical coordinates (canvas backend on web)
//! - `highscores`: Score hand-off and local leaderboard

pub mod error;
pub mod game;
pub mod highscores;
pub mod platform;
pub mod render;
pub mod settings;
pub mod sim;

pub use error::{ConfigError, SubmitError};
pub use game::{FrameHandle, FrameOutcome, FrameScheduler, GameLoop, GamePhase, QueuedFrames, RunId};
pub use highscores::{HighScores, ScoreRecord, ScoreSubmitter};
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Logical surface size (all simulation and hit-testing happens here)
    pub const LOGICAL_WIDTH: f32 = 400.0;
    pub const LOGICAL_HEIGHT: f32 = 400.0;

    /// Hazards are culled once their anchor leaves the surface by more than this
    pub const CULL_MARGIN: f32 = 200.0;

    /// Player defaults
    pub const PLAYER_RADIUS: f32 = 6.0;

    /// Life meter
    pub const MAX_LIFE: f64 = 1.0;
    /// Slack for float error when deltas sum to exactly one second of contact
    pub const LIFE_EPSILON: f64 = 1e-9;

    /// Spawn probability: min(1, (BASE + seconds * RAMP) * SCALE)
    pub const SPAWN_BASE: f64 = 0.2;
    pub const SPAWN_RAMP: f64 = 0.01;
    pub const SPAWN_SCALE: f64 = 0.2;
    /// Past this many seconds an extra gate keeps late-game density high
    pub const LATE_GAME_SECONDS: f64 = 100.0;
    pub const LATE_GAME_CHANCE: f64 = 0.7;

    /// Speed band for edge-spawned hazards (units per tick)
    pub const MIN_SPEED: f32 = 2.0;
    pub const MAX_SPEED: f32 = 5.0;

    /// Snake steering: v = v * DAMPING + dir_to_player * STEER
    pub const SNAKE_DAMPING: f32 = 0.96;
    pub const SNAKE_STEER: f32 = 0.2;
    /// Number of past head positions kept for the snake trail
    pub const SNAKE_TRAIL_LENGTH: usize = 20;

    /// Snowflake sway phase advance per tick (radians)
    pub const SNOWFLAKE_PHASE_STEP: f32 = 0.05;

    /// Line hazards
    pub const LINE_WIDTH: f32 = 3.0;
}

/// Round a survival time in milliseconds to seconds with two decimals
#[inline]
pub fn survival_seconds(elapsed_ms: f64) -> f64 {
    (elapsed_ms / 10.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_survival_seconds_rounds_to_hundredths() {
        assert_eq!(survival_seconds(0.0), 0.0);
        assert_eq!(survival_seconds(12_345.0), 12.35);
        assert_eq!(survival_seconds(999.4), 1.0);
        assert_eq!(survival_seconds(61_004.0), 61.0);
    }
}
