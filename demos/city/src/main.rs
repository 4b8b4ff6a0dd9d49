//! city: generate a procedural city and drive traffic through it.
//!
//! Builds a 400 × 400 city from a fixed seed, runs two simulated minutes of
//! traffic at 60 Hz, and writes a CSV frame trace under `output/city`.
//! Every ten simulated seconds the road crews clear all wrecks.
//!
//! Pass a seed as the first argument to get a different city.  Log
//! verbosity follows `RUST_LOG` (default `city=info,cs_sim=info`).

use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use cs_core::{SimConfig, TrafficConfig};
use cs_output::{CsvWriter, OutputWriter, SimOutputObserver};
use cs_sim::{FrameView, SimBuilder, SimObserver, TickStats};

// ── Constants ─────────────────────────────────────────────────────────────────

const DEFAULT_SEED:     u64 = 42;
const SIM_SECS:         u64 = 120;
const TICKS_PER_SEC:    u64 = 60;
const CLEAR_EVERY_SECS: u64 = 10;
const FRAME_INTERVAL:   u64 = 6; // 10 frames per simulated second
const OUTPUT_DIR:       &str = "output/city";

// ── Observer wrapper to tally the run ─────────────────────────────────────────

struct TallyObserver<W: OutputWriter> {
    inner:      SimOutputObserver<W>,
    frames:     usize,
    spawned:    usize,
    despawned:  usize,
    collisions: usize,
    stuck:      usize,
}

impl<W: OutputWriter> TallyObserver<W> {
    fn new(inner: SimOutputObserver<W>) -> Self {
        Self { inner, frames: 0, spawned: 0, despawned: 0, collisions: 0, stuck: 0 }
    }
}

impl<W: OutputWriter> SimObserver for TallyObserver<W> {
    fn on_tick_end(&mut self, stats: &TickStats) {
        self.spawned += stats.spawned;
        self.despawned += stats.despawned;
        self.collisions += stats.collisions;
        self.stuck += stats.stuck;
        if stats.tick.0 % (TICKS_PER_SEC * 10) == 0 {
            tracing::info!(
                tick     = stats.tick.0,
                driving  = stats.driving,
                crashed  = stats.crashed,
                clusters = stats.clusters,
                "progress"
            );
        }
        self.inner.on_tick_end(stats);
    }

    fn on_frame(&mut self, frame: &FrameView) {
        self.frames += 1;
        self.inner.on_frame(frame);
    }

    fn on_sim_end(&mut self, final_tick: cs_core::Tick) {
        self.inner.on_sim_end(final_tick);
    }
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("city=info,cs_sim=info")),
        )
        .init();

    let seed = match std::env::args().nth(1) {
        Some(arg) => arg.parse::<u64>().with_context(|| format!("seed must be an integer, got {arg:?}"))?,
        None => DEFAULT_SEED,
    };

    // 1. Configure and build.
    let config = SimConfig {
        seed,
        tick_secs: 1.0 / TICKS_PER_SEC as f32,
        total_ticks: SIM_SECS * TICKS_PER_SEC,
        traffic: TrafficConfig { target_population: 80, ..TrafficConfig::default() },
        ..SimConfig::default()
    };
    let mut sim = SimBuilder::new(config.clone()).frame_interval(FRAME_INTERVAL).build()?;

    let audit = sim.world.graph.audit();
    tracing::info!(
        seed,
        blocks     = sim.world.layout.blocks.len(),
        footprints = sim.world.layout.footprints.len(),
        nodes      = audit.nodes,
        lanes      = audit.lanes,
        dead_ends  = audit.dead_end_lanes.len(),
        "city ready"
    );

    // 2. Set up output.
    std::fs::create_dir_all(OUTPUT_DIR)?;
    let writer = CsvWriter::new(Path::new(OUTPUT_DIR))?;
    let mut inner = SimOutputObserver::new(writer, &config);
    inner.write_world(&sim.world)?;
    let mut obs = TallyObserver::new(inner);

    // 3. Run in stretches, clearing wrecks between them.
    let t0 = Instant::now();
    let stretch = CLEAR_EVERY_SECS * TICKS_PER_SEC;
    let mut cleared = 0;
    while sim.clock.current_tick.0 < config.total_ticks {
        let n = stretch.min(config.total_ticks - sim.clock.current_tick.0);
        sim.run_ticks(n, &mut obs)?;

        let ids: Vec<_> = sim.clusters().iter().map(|c| c.id).collect();
        for id in ids {
            if let Some(removed) = sim.clear_cluster(id) {
                cleared += removed.len();
            }
        }
    }
    obs.on_sim_end(sim.clock.current_tick);
    let elapsed = t0.elapsed();

    if let Some(e) = obs.inner.take_error() {
        tracing::error!(error = %e, "output error");
    }

    // 4. Summary.
    tracing::info!(
        secs       = elapsed.as_secs_f64(),
        frames     = obs.frames,
        spawned    = obs.spawned,
        despawned  = obs.despawned,
        collisions = obs.collisions,
        cleared,
        stuck      = obs.stuck,
        out        = OUTPUT_DIR,
        "simulation complete"
    );

    Ok(())
}
