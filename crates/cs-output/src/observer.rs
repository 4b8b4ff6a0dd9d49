//! `SimOutputObserver<W>`: bridges `SimObserver` to an `OutputWriter`.

use cs_core::{SimConfig, Tick};
use cs_geometry::Polygon;
use cs_sim::{FrameView, SimObserver, TickStats, World};

use crate::row::{AgentTransformRow, PolygonRow, TickSummaryRow, WreckRow};
use crate::writer::OutputWriter;
use crate::{OutputError, OutputResult};

/// A [`SimObserver`] that writes frames and tick summaries to any
/// [`OutputWriter`] backend.
///
/// Errors from the writer are stored internally because `SimObserver` methods
/// have no return value.  After `sim.run()` returns, check for errors with
/// [`take_error`][Self::take_error].
pub struct SimOutputObserver<W: OutputWriter> {
    writer:     W,
    tick_secs:  f64,
    last_error: Option<OutputError>,
}

impl<W: OutputWriter> SimOutputObserver<W> {
    /// Create an observer backed by `writer`, using `config` for elapsed-time
    /// conversion.
    pub fn new(writer: W, config: &SimConfig) -> Self {
        Self {
            writer,
            tick_secs:  config.dt() as f64,
            last_error: None,
        }
    }

    /// Write the static polygons of `world`.  Call once before running.
    pub fn write_world(&mut self, world: &World) -> OutputResult<()> {
        self.writer.write_polygons(&polygon_rows(world))
    }

    /// Take the stored write error (if any) after `sim.run()` returns.
    ///
    /// Returns `None` if all writes succeeded.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Unwrap the inner writer (e.g. to inspect files after the sim).
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: OutputWriter> SimObserver for SimOutputObserver<W> {
    fn on_tick_end(&mut self, stats: &TickStats) {
        let row = TickSummaryRow {
            tick:         stats.tick.0,
            elapsed_secs: stats.tick.0 as f64 * self.tick_secs,
            driving:      stats.driving as u64,
            crashed:      stats.crashed as u64,
            spawned:      stats.spawned as u64,
            despawned:    stats.despawned as u64,
            collisions:   stats.collisions as u64,
            clusters:     stats.clusters as u64,
        };
        let result = self.writer.write_tick_summary(&row);
        self.store_err(result);
    }

    fn on_frame(&mut self, frame: &FrameView) {
        let tick = frame.tick.0;
        let agents: Vec<AgentTransformRow> = frame
            .agents
            .iter()
            .map(|(id, t)| AgentTransformRow {
                tick,
                agent_id: id.0,
                x:        t.position.x,
                y:        t.position.y,
                z:        t.position.z,
                yaw:      t.yaw,
                scale:    t.scale,
            })
            .collect();
        if !agents.is_empty() {
            let result = self.writer.write_agents(&agents);
            self.store_err(result);
        }

        let wrecks: Vec<WreckRow> = frame
            .wrecks
            .iter()
            .map(|w| WreckRow {
                tick,
                cluster_id: w.cluster.0,
                agent_id:   w.agent.0,
                x:          w.transform.position.x,
                y:          w.transform.position.y,
                yaw:        w.transform.yaw,
            })
            .collect();
        if !wrecks.is_empty() {
            let result = self.writer.write_wrecks(&wrecks);
            self.store_err(result);
        }
    }

    fn on_sim_end(&mut self, _final_tick: Tick) {
        let result = self.writer.finish();
        self.store_err(result);
    }
}

// ── City polygons ─────────────────────────────────────────────────────────────

/// Every vertex of every surface polygon in `world`, grouped by kind.
pub fn polygon_rows(world: &World) -> Vec<PolygonRow> {
    let layout = &world.layout;
    let mut rows = Vec::new();
    push_kind(&mut rows, "junction", world.mesh.junctions.iter().flatten());
    push_kind(&mut rows, "road", world.mesh.roads.iter().flatten());
    push_kind(&mut rows, "block", &layout.blocks);
    push_kind(&mut rows, "sidewalk", &layout.sidewalks);
    push_kind(&mut rows, "lot", &layout.lots);
    push_kind(&mut rows, "footprint", &layout.footprints);
    rows
}

fn push_kind<'a, I>(rows: &mut Vec<PolygonRow>, kind: &'static str, polygons: I)
where
    I: IntoIterator<Item = &'a Polygon>,
{
    for (p, poly) in polygons.into_iter().enumerate() {
        for (v, pt) in poly.points().iter().enumerate() {
            rows.push(PolygonRow {
                kind,
                polygon: p as u32,
                vertex:  v as u32,
                x:       pt.x,
                y:       pt.y,
            });
        }
    }
}
