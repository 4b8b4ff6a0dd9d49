//! Simulation observer trait for progress reporting and frame capture.

use cs_core::{AgentId, ClusterId, Tick};
use cs_vehicle::AgentTransform;

// ── Per-tick records ──────────────────────────────────────────────────────────

/// Counters for one completed tick.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct TickStats {
    pub tick:       Tick,
    /// Vehicles in the population after the tick (driving and crashed).
    pub agents:     usize,
    pub driving:    usize,
    pub crashed:    usize,
    pub spawned:    usize,
    /// Vehicles that hit a dead end this tick.
    pub despawned:  usize,
    /// Vehicles held by a brake, signal, or traffic this tick.
    pub held:       usize,
    /// Stall reports raised this tick.
    pub stuck:      usize,
    /// New colliding pairs this tick.
    pub collisions: usize,
    /// Vehicles that drove into an existing wreck this tick.
    pub joined:     usize,
    /// Live crash clusters after the tick.
    pub clusters:   usize,
}

/// Renderer-facing pose of one wrecked vehicle.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct WreckTransform {
    pub cluster:   ClusterId,
    pub agent:     AgentId,
    pub transform: AgentTransform,
}

/// Everything a renderer needs for one frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrameView {
    pub tick:   Tick,
    /// Driving vehicles, ascending id.
    pub agents: Vec<(AgentId, AgentTransform)>,
    /// Wrecked vehicles grouped by cluster, ascending cluster id.
    pub wrecks: Vec<WreckTransform>,
}

// ── Observer ──────────────────────────────────────────────────────────────────

/// Callbacks invoked by [`Simulation::run`][crate::Simulation::run] at key
/// points in the tick loop.
///
/// All methods have default no-op implementations so implementors only need to
/// override what they care about.
///
/// # Example: progress printer
///
/// ```rust,ignore
/// struct ProgressPrinter { interval: u64 }
///
/// impl SimObserver for ProgressPrinter {
///     fn on_tick_end(&mut self, stats: &TickStats) {
///         if stats.tick.0 % self.interval == 0 {
///             println!("tick {}: {} driving, {} crashed", stats.tick, stats.driving, stats.crashed);
///         }
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called at the very start of each tick, before any processing.
    fn on_tick_start(&mut self, _tick: Tick) {}

    /// Called at the end of each tick with that tick's counters.
    fn on_tick_end(&mut self, _stats: &TickStats) {}

    /// Called at frame intervals (every `frame_interval` ticks, set on the
    /// builder) after the tick completes.
    fn on_frame(&mut self, _frame: &FrameView) {}

    /// Called once after the final tick completes.
    fn on_sim_end(&mut self, _final_tick: Tick) {}
}

/// A [`SimObserver`] that does nothing.  Use when you need to call `run` but
/// don't want progress callbacks.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}
