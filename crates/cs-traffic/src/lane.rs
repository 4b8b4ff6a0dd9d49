//! Edges, lanes, and waypoint polylines.

use std::collections::BTreeSet;

use glam::{Vec2, Vec3};

use cs_core::{AgentId, EdgeId, LaneId, NodeId};

/// A bidirectional road between two nodes.
#[derive(Clone, Debug, PartialEq)]
pub struct Edge {
    pub id: EdgeId,
    pub from: NodeId,
    pub to: NodeId,
    pub width: f32,
    /// Marked lanes on the source road; informational.
    pub marked_lanes: u8,
    pub length: f32,
    /// `[forward, backward]`, or empty for degenerate edges.
    pub lanes: Vec<LaneId>,
}

impl Edge {
    pub fn is_degenerate(&self) -> bool {
        self.lanes.is_empty()
    }

    #[inline]
    pub fn other(&self, node: NodeId) -> NodeId {
        if self.from == node { self.to } else { self.from }
    }
}

/// A directional travel path along one side of an edge.
#[derive(Clone, Debug, PartialEq)]
pub struct Lane {
    pub id: LaneId,
    pub edge: EdgeId,
    /// Node the lane leaves.
    pub origin: NodeId,
    /// Node the lane arrives at.
    pub destination: NodeId,
    pub width: f32,
    /// Travel order; at least two points.
    pub waypoints: Vec<Vec3>,
    pub length: f32,
    /// Agents currently on this lane.
    pub occupants: BTreeSet<AgentId>,
}

impl Lane {
    /// Unit travel direction in the ground plane.
    pub fn direction(&self) -> Vec2 {
        match (self.waypoints.first(), self.waypoints.last()) {
            (Some(a), Some(b)) => (*b - *a).truncate().normalize_or_zero(),
            _ => Vec2::ZERO,
        }
    }

    pub fn start(&self) -> Vec3 {
        self.waypoints.first().copied().unwrap_or(Vec3::ZERO)
    }

    pub fn end(&self) -> Vec3 {
        self.waypoints.last().copied().unwrap_or(Vec3::ZERO)
    }
}

/// Points from `start` to `end` inclusive, spaced at most `spacing` apart.
pub(crate) fn sample_line(start: Vec3, end: Vec3, spacing: f32) -> Vec<Vec3> {
    let len = start.distance(end);
    let steps = ((len / spacing).ceil() as usize).max(1);
    (0..=steps).map(|i| start.lerp(end, i as f32 / steps as f32)).collect()
}

/// Polyline length.
pub fn path_length(path: &[Vec3]) -> f32 {
    path.windows(2).map(|w| w[0].distance(w[1])).sum()
}

/// Distance still to travel from `pos`, heading for `path[target]`, to the
/// end of `path`.
pub fn path_remaining(path: &[Vec3], target: usize, pos: Vec3) -> f32 {
    let Some(&next) = path.get(target) else { return 0.0 };
    pos.distance(next) + path_length(&path[target..])
}
