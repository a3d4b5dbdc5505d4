//! Platform abstraction layer
//!
//! Handles browser/native differences for pointer input. The web front end
//! in `main.rs` translates DOM events into [`PointerEvent`]s.

pub mod input;

pub use input::{PointerEvent, PointerNormalizer, SurfaceMetrics};
