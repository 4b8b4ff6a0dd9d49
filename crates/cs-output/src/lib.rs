//! `cs-output`: frame traces of a simulation run for external tools.
//!
//! One backend is provided:
//!
//! | Backend | Files created                                                          |
//! |---------|------------------------------------------------------------------------|
//! | CSV     | `agent_transforms.csv`, `wrecks.csv`, `tick_summaries.csv`, `polygons.csv` |
//!
//! Backends implement [`OutputWriter`] and are driven by
//! [`SimOutputObserver`], which implements `cs_sim::SimObserver`.  This is a
//! trace of what happened, not a saved world: nothing here can be loaded
//! back into a simulation.
//!
//! # Usage
//!
//! ```rust,ignore
//! use cs_output::{CsvWriter, SimOutputObserver};
//!
//! let writer = CsvWriter::new(Path::new("./output"))?;
//! let mut obs = SimOutputObserver::new(writer, &sim.config);
//! obs.write_world(&sim.world)?;
//! sim.run(&mut obs)?;
//! obs.take_error().map(|e| eprintln!("output error: {e}"));
//! ```

pub mod csv;
pub mod error;
pub mod observer;
pub mod row;
pub mod writer;

#[cfg(test)]
mod tests;

pub use self::csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use observer::{SimOutputObserver, polygon_rows};
pub use row::{AgentTransformRow, PolygonRow, TickSummaryRow, WreckRow};
pub use writer::OutputWriter;
