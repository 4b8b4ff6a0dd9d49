//! The `OutputWriter` trait implemented by all backend writers.

use crate::{AgentTransformRow, OutputResult, PolygonRow, TickSummaryRow, WreckRow};

/// Sink for frame traces.
///
/// All methods are infallible from the observer's perspective; errors are
/// stored internally and retrieved with
/// [`SimOutputObserver::take_error`](crate::SimOutputObserver::take_error).
pub trait OutputWriter {
    /// Write the driving vehicles of one frame.
    fn write_agents(&mut self, rows: &[AgentTransformRow]) -> OutputResult<()>;

    /// Write the wrecked vehicles of one frame.
    fn write_wrecks(&mut self, rows: &[WreckRow]) -> OutputResult<()>;

    /// Write one tick summary row.
    fn write_tick_summary(&mut self, row: &TickSummaryRow) -> OutputResult<()>;

    /// Write the static city polygons.  Called once, before the run.
    fn write_polygons(&mut self, rows: &[PolygonRow]) -> OutputResult<()>;

    /// Flush and close all underlying file handles.
    ///
    /// Idempotent: safe to call more than once.
    fn finish(&mut self) -> OutputResult<()>;
}
