//! CSV output backend.
//!
//! Creates four files in the configured output directory:
//! - `agent_transforms.csv`
//! - `wrecks.csv`
//! - `tick_summaries.csv`
//! - `polygons.csv`

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::writer::OutputWriter;
use crate::{AgentTransformRow, OutputResult, PolygonRow, TickSummaryRow, WreckRow};

/// Writes frame traces to four CSV files.
pub struct CsvWriter {
    agents:    Writer<File>,
    wrecks:    Writer<File>,
    summaries: Writer<File>,
    polygons:  Writer<File>,
    finished:  bool,
}

impl CsvWriter {
    /// Open (or create) the CSV files in `dir` and write the header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let mut agents = Writer::from_path(dir.join("agent_transforms.csv"))?;
        agents.write_record(["tick", "agent_id", "x", "y", "z", "yaw", "scale"])?;

        let mut wrecks = Writer::from_path(dir.join("wrecks.csv"))?;
        wrecks.write_record(["tick", "cluster_id", "agent_id", "x", "y", "yaw"])?;

        let mut summaries = Writer::from_path(dir.join("tick_summaries.csv"))?;
        summaries.write_record([
            "tick",
            "elapsed_secs",
            "driving",
            "crashed",
            "spawned",
            "despawned",
            "collisions",
            "clusters",
        ])?;

        let mut polygons = Writer::from_path(dir.join("polygons.csv"))?;
        polygons.write_record(["kind", "polygon", "vertex", "x", "y"])?;

        Ok(Self {
            agents,
            wrecks,
            summaries,
            polygons,
            finished: false,
        })
    }
}

impl OutputWriter for CsvWriter {
    fn write_agents(&mut self, rows: &[AgentTransformRow]) -> OutputResult<()> {
        for row in rows {
            self.agents.write_record(&[
                row.tick.to_string(),
                row.agent_id.to_string(),
                row.x.to_string(),
                row.y.to_string(),
                row.z.to_string(),
                row.yaw.to_string(),
                row.scale.to_string(),
            ])?;
        }
        Ok(())
    }

    fn write_wrecks(&mut self, rows: &[WreckRow]) -> OutputResult<()> {
        for row in rows {
            self.wrecks.write_record(&[
                row.tick.to_string(),
                row.cluster_id.to_string(),
                row.agent_id.to_string(),
                row.x.to_string(),
                row.y.to_string(),
                row.yaw.to_string(),
            ])?;
        }
        Ok(())
    }

    fn write_tick_summary(&mut self, row: &TickSummaryRow) -> OutputResult<()> {
        self.summaries.write_record(&[
            row.tick.to_string(),
            row.elapsed_secs.to_string(),
            row.driving.to_string(),
            row.crashed.to_string(),
            row.spawned.to_string(),
            row.despawned.to_string(),
            row.collisions.to_string(),
            row.clusters.to_string(),
        ])?;
        Ok(())
    }

    fn write_polygons(&mut self, rows: &[PolygonRow]) -> OutputResult<()> {
        for row in rows {
            self.polygons.write_record(&[
                row.kind.to_string(),
                row.polygon.to_string(),
                row.vertex.to_string(),
                row.x.to_string(),
                row.y.to_string(),
            ])?;
        }
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.agents.flush()?;
        self.wrecks.flush()?;
        self.summaries.flush()?;
        self.polygons.flush()?;
        Ok(())
    }
}
