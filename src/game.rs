//! Frame loop controller
//!
//! Owns everything that must survive between frames and across restarts:
//! simulation state, RNG, input state, the pending frame request and the
//! liveness token of the current run. The host (requestAnimationFrame on the
//! web, a queue in headless runs) calls [`GameLoop::on_frame`] with the run
//! id the frame was requested for; frames from an older run are dropped.

use std::collections::VecDeque;

use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::consts::{LOGICAL_HEIGHT, LOGICAL_WIDTH};
use crate::highscores::{ScoreRecord, ScoreSubmitter};
use crate::platform::{PointerEvent, PointerNormalizer, SurfaceMetrics};
use crate::settings::Settings;
use crate::sim::{GameState, StepReport, maybe_spawn, tick};

/// Lifecycle of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Idle, waiting for the first start
    Ready,
    /// Frames are being scheduled and simulated
    Playing,
    /// Run ended, score frozen
    GameOver,
}

/// Identifies one run; bumped by every start
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RunId(pub u64);

/// Host-issued id of a requested frame callback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(pub i32);

/// Something that can call back into the loop on the next refresh
pub trait FrameScheduler {
    /// Arrange for `on_frame(run, timestamp)` to be invoked once
    fn request_frame(&mut self, run: RunId) -> FrameHandle;
    /// Withdraw a request that has not fired yet
    fn cancel_frame(&mut self, handle: FrameHandle);
}

/// Result of one frame callback
#[derive(Debug, Clone, PartialEq)]
pub enum FrameOutcome {
    /// Simulated one step; the next frame is scheduled
    Continue(StepReport),
    /// Life ran out on this frame; the record was handed to the submitter
    GameOver(ScoreRecord),
    /// Frame belonged to a dead or superseded run and was ignored
    Stale,
}

/// The game loop context
pub struct GameLoop<S, C> {
    state: GameState,
    phase: GamePhase,
    run: RunId,
    /// Cleared on death or stop; checked first thing in every frame
    alive: bool,
    /// Timestamp of the first frame of the run
    origin_ms: Option<f64>,
    last_ms: f64,
    pending: Option<FrameHandle>,
    rng: Pcg32,
    input: PointerNormalizer,
    surface: SurfaceMetrics,
    settings: Settings,
    final_score: Option<ScoreRecord>,
    scheduler: S,
    submitter: C,
}

impl<S: FrameScheduler, C: ScoreSubmitter> GameLoop<S, C> {
    pub fn new(settings: Settings, seed: u64, scheduler: S, submitter: C) -> Self {
        Self {
            state: GameState::new(),
            phase: GamePhase::Ready,
            run: RunId(0),
            alive: false,
            origin_ms: None,
            last_ms: 0.0,
            pending: None,
            rng: Pcg32::seed_from_u64(seed),
            input: PointerNormalizer::new(settings.touch_sensitivity),
            surface: SurfaceMetrics::new(0.0, 0.0, LOGICAL_WIDTH, LOGICAL_HEIGHT),
            settings,
            final_score: None,
            scheduler,
            submitter,
        }
    }

    /// Reset everything and begin a new run
    ///
    /// Any frame still pending from an earlier run is cancelled first.
    pub fn start(&mut self) {
        if let Some(handle) = self.pending.take() {
            self.scheduler.cancel_frame(handle);
        }

        self.run = RunId(self.run.0 + 1);
        self.state.reset();
        self.input.reset();
        self.origin_ms = None;
        self.last_ms = 0.0;
        self.final_score = None;
        self.phase = GamePhase::Playing;
        self.alive = true;

        self.pending = Some(self.scheduler.request_frame(self.run));
        log::info!("Run {} started", self.run.0);
    }

    /// Stop the loop without recording a score (e.g. navigating away)
    ///
    /// A live run ends in `GameOver` with no final score; `start` begins afresh.
    pub fn stop(&mut self) {
        if let Some(handle) = self.pending.take() {
            self.scheduler.cancel_frame(handle);
        }
        if self.alive {
            log::info!("Run {} stopped at {:.2}s", self.run.0, self.state.elapsed_seconds());
            self.phase = GamePhase::GameOver;
        }
        self.alive = false;
    }

    /// Frame callback: spawn, simulate, then continue or end the run
    pub fn on_frame(&mut self, run: RunId, timestamp_ms: f64) -> FrameOutcome {
        if !self.alive || run != self.run || self.phase != GamePhase::Playing {
            log::debug!("Dropping stale frame for run {} (current {})", run.0, self.run.0);
            return FrameOutcome::Stale;
        }
        self.pending = None;

        let first = self.origin_ms.is_none();
        let origin = *self.origin_ms.get_or_insert(timestamp_ms);
        let dt_ms = if first {
            0.0
        } else {
            (timestamp_ms - self.last_ms).max(0.0)
        };
        self.last_ms = if first {
            timestamp_ms
        } else {
            self.last_ms.max(timestamp_ms)
        };
        self.state.elapsed_ms = self.state.elapsed_ms.max(timestamp_ms - origin);

        maybe_spawn(&mut self.state, &mut self.rng);
        let report = tick(&mut self.state, dt_ms);

        if self.state.life.is_depleted() {
            return FrameOutcome::GameOver(self.finish());
        }

        self.pending = Some(self.scheduler.request_frame(self.run));
        FrameOutcome::Continue(report)
    }

    /// Freeze the score and hand it off once
    fn finish(&mut self) -> ScoreRecord {
        self.phase = GamePhase::GameOver;
        self.alive = false;

        let record = ScoreRecord::new(self.settings.nickname.clone(), self.state.elapsed_ms);
        log::info!("Run {} over: survived {:.2}s", self.run.0, record.score);

        if let Err(err) = self.submitter.submit(&record) {
            log::warn!("Score not submitted: {err}");
        }
        self.final_score = Some(record.clone());
        record
    }

    /// Route a pointer event to the player (ignored once the run is over)
    pub fn on_pointer(&mut self, event: PointerEvent) -> bool {
        if self.phase == GamePhase::GameOver {
            return false;
        }
        self.input.handle(event, &self.surface, &mut self.state.player)
    }

    /// Update where the surface is displayed (on resize/scroll)
    pub fn set_surface(&mut self, surface: SurfaceMetrics) {
        self.surface = surface;
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn run(&self) -> RunId {
        self.run
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    pub fn pending_frame(&self) -> Option<FrameHandle> {
        self.pending
    }

    /// Score of the last finished run
    pub fn final_score(&self) -> Option<&ScoreRecord> {
        self.final_score.as_ref()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Edit settings between runs (nickname, visuals)
    pub fn settings_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    pub fn submitter(&self) -> &C {
        &self.submitter
    }

    /// Mutable access to the simulation, for hosts that stage scenarios
    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }
}

/// In-memory frame queue for headless runs and tests
#[derive(Debug, Default)]
pub struct QueuedFrames {
    next: i32,
    queue: VecDeque<(FrameHandle, RunId)>,
}

impl QueuedFrames {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the oldest outstanding request
    pub fn pop(&mut self) -> Option<(FrameHandle, RunId)> {
        self.queue.pop_front()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

impl FrameScheduler for QueuedFrames {
    fn request_frame(&mut self, run: RunId) -> FrameHandle {
        self.next += 1;
        let handle = FrameHandle(self.next);
        self.queue.push_back((handle, run));
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        self.queue.retain(|(h, _)| *h != handle);
    }
}
