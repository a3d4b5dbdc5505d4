//! Game state and core simulation types
//!
//! The hazard model is a closed sum type: common kinematics live on
//! [`Hazard`], everything variant-specific lives in its [`Motion`] payload.

use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geometry::heading;
use crate::consts::*;

/// The eleven hazard behaviours, in unlock order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HazardKind {
    Horizontal,
    Vertical,
    Diagonal,
    Parabola,
    Snowflake,
    HLine,
    VLine,
    DLine,
    PLine,
    Snake,
    Surface,
}

impl HazardKind {
    /// Every kind, sorted by unlock threshold
    pub const ALL: [HazardKind; 11] = [
        HazardKind::Horizontal,
        HazardKind::Vertical,
        HazardKind::Diagonal,
        HazardKind::Parabola,
        HazardKind::Snowflake,
        HazardKind::HLine,
        HazardKind::VLine,
        HazardKind::DLine,
        HazardKind::PLine,
        HazardKind::Snake,
        HazardKind::Surface,
    ];

    /// Survival time (seconds) at which this kind starts spawning
    pub fn unlock_seconds(&self) -> f64 {
        match self {
            HazardKind::Horizontal => 0.0,
            HazardKind::Vertical => 10.0,
            HazardKind::Diagonal => 20.0,
            HazardKind::Parabola => 30.0,
            HazardKind::Snowflake => 40.0,
            HazardKind::HLine => 50.0,
            HazardKind::VLine => 60.0,
            HazardKind::DLine => 70.0,
            HazardKind::PLine => 80.0,
            HazardKind::Snake => 90.0,
            HazardKind::Surface => 100.0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HazardKind::Horizontal => "horizontal",
            HazardKind::Vertical => "vertical",
            HazardKind::Diagonal => "diagonal",
            HazardKind::Parabola => "parabola",
            HazardKind::Snowflake => "snowflake",
            HazardKind::HLine => "h-line",
            HazardKind::VLine => "v-line",
            HazardKind::DLine => "d-line",
            HazardKind::PLine => "p-line",
            HazardKind::Snake => "snake",
            HazardKind::Surface => "surface",
        }
    }

    /// 1-based stage number when this is the deepest unlocked kind
    pub fn stage_number(&self) -> usize {
        HazardKind::ALL
            .iter()
            .position(|k| k == self)
            .map(|i| i + 1)
            .unwrap_or(1)
    }

    /// Line hazards collide as a trailing segment instead of a point
    pub fn is_line(&self) -> bool {
        matches!(
            self,
            HazardKind::HLine | HazardKind::VLine | HazardKind::DLine | HazardKind::PLine
        )
    }

    /// Palette entry used for rendering
    pub fn color(&self) -> Rgb {
        match self {
            HazardKind::Horizontal => Rgb(0xe7, 0x4c, 0x3c),
            HazardKind::Vertical => Rgb(0xe6, 0x7e, 0x22),
            HazardKind::Diagonal => Rgb(0xf1, 0xc4, 0x0f),
            HazardKind::Parabola => Rgb(0x2e, 0xcc, 0x71),
            HazardKind::Snowflake => Rgb(0xec, 0xf0, 0xf1),
            HazardKind::HLine => Rgb(0x34, 0x98, 0xdb),
            HazardKind::VLine => Rgb(0x1a, 0xbc, 0x9c),
            HazardKind::DLine => Rgb(0x9b, 0x59, 0xb6),
            HazardKind::PLine => Rgb(0xfd, 0x79, 0xa8),
            HazardKind::Snake => Rgb(0x00, 0xb8, 0x94),
            HazardKind::Surface => Rgb(0x63, 0x6e, 0x72),
        }
    }
}

impl fmt::Display for HazardKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Color tag carried by each hazard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// CSS hex form, e.g. `#e74c3c`
    pub fn to_css(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

/// The player's dot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub radius: f32,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            pos: Self::center(),
            radius: PLAYER_RADIUS,
        }
    }
}

impl Player {
    /// Starting position (middle of the logical surface)
    pub fn center() -> Vec2 {
        Vec2::new(LOGICAL_WIDTH / 2.0, LOGICAL_HEIGHT / 2.0)
    }

    /// Clamp a position so the whole dot stays on a surface of `extent`
    pub fn clamp_to_surface(&self, pos: Vec2, extent: Vec2) -> Vec2 {
        Vec2::new(
            pos.x.clamp(self.radius, (extent.x - self.radius).max(self.radius)),
            pos.y.clamp(self.radius, (extent.y - self.radius).max(self.radius)),
        )
    }
}

/// Geometry of a line hazard trailing behind its head
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LineShape {
    pub length: f32,
    pub line_width: f32,
}

/// Bounded history of snake head positions (ring buffer, oldest overwritten)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trail {
    points: [Vec2; SNAKE_TRAIL_LENGTH],
    start: usize,
    len: usize,
}

impl Default for Trail {
    fn default() -> Self {
        Self {
            points: [Vec2::ZERO; SNAKE_TRAIL_LENGTH],
            start: 0,
            len: 0,
        }
    }
}

impl Trail {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a head position, dropping the oldest once full
    pub fn push(&mut self, pos: Vec2) {
        if self.len < SNAKE_TRAIL_LENGTH {
            self.points[(self.start + self.len) % SNAKE_TRAIL_LENGTH] = pos;
            self.len += 1;
        } else {
            self.points[self.start] = pos;
            self.start = (self.start + 1) % SNAKE_TRAIL_LENGTH;
        }
    }

    /// Positions from oldest to newest
    pub fn iter(&self) -> impl Iterator<Item = Vec2> + '_ {
        (0..self.len).map(move |i| self.points[(self.start + i) % SNAKE_TRAIL_LENGTH])
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn clear(&mut self) {
        self.start = 0;
        self.len = 0;
    }
}

/// Variant-specific state of a hazard
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Motion {
    Horizontal,
    Vertical,
    /// Travels inward with drift on the perpendicular axis
    Diagonal,
    Parabola { gravity: f32 },
    /// Falls slowly while swaying side to side
    Snowflake { sway: f32, phase: f32 },
    HLine(LineShape),
    VLine(LineShape),
    DLine(LineShape),
    PLine { line: LineShape, gravity: f32 },
    /// Steers toward the player; the trail is drawn but never collides
    Snake { trail: Trail },
    /// Grows in place toward `max_size`
    Surface { max_size: f32, growth_rate: f32 },
}

impl Motion {
    pub fn kind(&self) -> HazardKind {
        match self {
            Motion::Horizontal => HazardKind::Horizontal,
            Motion::Vertical => HazardKind::Vertical,
            Motion::Diagonal => HazardKind::Diagonal,
            Motion::Parabola { .. } => HazardKind::Parabola,
            Motion::Snowflake { .. } => HazardKind::Snowflake,
            Motion::HLine(_) => HazardKind::HLine,
            Motion::VLine(_) => HazardKind::VLine,
            Motion::DLine(_) => HazardKind::DLine,
            Motion::PLine { .. } => HazardKind::PLine,
            Motion::Snake { .. } => HazardKind::Snake,
            Motion::Surface { .. } => HazardKind::Surface,
        }
    }

    /// Line geometry, for the four line variants
    pub fn line(&self) -> Option<LineShape> {
        match self {
            Motion::HLine(line) | Motion::VLine(line) | Motion::DLine(line) => Some(*line),
            Motion::PLine { line, .. } => Some(*line),
            _ => None,
        }
    }
}

/// A hazard entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hazard {
    pub id: u32,
    pub pos: Vec2,
    /// Velocity in units per tick
    pub vel: Vec2,
    /// Collision/render radius (head radius for lines and snakes)
    pub size: f32,
    pub color: Rgb,
    pub motion: Motion,
}

impl Hazard {
    pub fn new(id: u32, pos: Vec2, vel: Vec2, size: f32, motion: Motion) -> Self {
        Self {
            id,
            pos,
            vel,
            size,
            color: motion.kind().color(),
            motion,
        }
    }

    pub fn kind(&self) -> HazardKind {
        self.motion.kind()
    }

    /// Head and tail of a line hazard plus its stroke width
    ///
    /// The tail trails behind the head along the current heading.
    pub fn segment(&self) -> Option<(Vec2, Vec2, f32)> {
        let line = self.motion.line()?;
        let tail = self.pos - heading(self.vel) * line.length;
        Some((self.pos, tail, line.line_width))
    }

    /// Whether the anchor is still within the culling margin
    pub fn within_margin(&self) -> bool {
        self.pos.x >= -CULL_MARGIN
            && self.pos.x <= LOGICAL_WIDTH + CULL_MARGIN
            && self.pos.y >= -CULL_MARGIN
            && self.pos.y <= LOGICAL_HEIGHT + CULL_MARGIN
    }
}

/// Remaining life; one second of total contact is lethal
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LifeMeter {
    value: f64,
}

impl Default for LifeMeter {
    fn default() -> Self {
        Self { value: MAX_LIFE }
    }
}

impl LifeMeter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    /// Drain by wall time in contact (`dt_ms / 1000`)
    pub fn drain(&mut self, dt_ms: f64) {
        self.value -= dt_ms.max(0.0) / 1000.0;
    }

    pub fn is_depleted(&self) -> bool {
        self.value <= LIFE_EPSILON
    }

    /// Fraction for display, in [0, 1]
    pub fn fraction(&self) -> f32 {
        self.value.clamp(0.0, MAX_LIFE) as f32
    }

    pub fn reset(&mut self) {
        self.value = MAX_LIFE;
    }
}

/// All mutable simulation state for one run
///
/// Reset in place between runs so the hazard buffer keeps its allocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub player: Player,
    /// Active hazards, in spawn order
    pub hazards: Vec<Hazard>,
    pub life: LifeMeter,
    /// Survival time of the current run
    pub elapsed_ms: f64,
    /// Deepest unlocked hazard kind
    pub stage: HazardKind,
    next_id: u32,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    pub fn new() -> Self {
        Self {
            player: Player::default(),
            hazards: Vec::with_capacity(128),
            life: LifeMeter::new(),
            elapsed_ms: 0.0,
            stage: HazardKind::Horizontal,
            next_id: 1,
        }
    }

    /// Back to a fresh run without reallocating the hazard buffer
    pub fn reset(&mut self) {
        self.hazards.clear();
        self.player.pos = Player::center();
        self.life.reset();
        self.elapsed_ms = 0.0;
        self.stage = HazardKind::Horizontal;
        self.next_id = 1;
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn elapsed_seconds(&self) -> f64 {
        self.elapsed_ms / 1000.0
    }
}
