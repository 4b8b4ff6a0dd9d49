//! Junction nodes: turn curves and signal phases.

use std::collections::BTreeMap;

use glam::{Vec2, Vec3};

use cs_core::{EdgeId, GraphConfig, LaneId, NodeId, SimRng};
use cs_geometry::sample_cubic;

use crate::lane::{Edge, Lane};
use crate::signal::{Phase, SignalController, SignalState};

/// Turn curves through a node, keyed by `(incoming lane, outgoing lane)`.
pub type ConnectionMap = BTreeMap<(LaneId, LaneId), Vec<Vec3>>;

#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    pub id: NodeId,
    pub position: Vec2,
    pub edges: Vec<EdgeId>,
    pub connections: ConnectionMap,
    pub signal: SignalController,
}

impl Node {
    pub fn new(id: NodeId, position: Vec2, config: &GraphConfig) -> Self {
        Self {
            id,
            position,
            edges: Vec::new(),
            connections: BTreeMap::new(),
            signal: SignalController::unsignalled(config),
        }
    }

    pub fn degree(&self) -> usize {
        self.edges.len()
    }

    /// Lanes on incident edges split into `(incoming, outgoing)`.
    ///
    /// A lane is incoming when its travel direction opposes the edge vector
    /// pointing away from this node.
    fn classify(&self, edges: &[Edge], lanes: &[Lane], node_pos: &[Vec2]) -> (Vec<LaneId>, Vec<LaneId>) {
        let mut incoming = Vec::new();
        let mut outgoing = Vec::new();
        for &e in &self.edges {
            let edge = &edges[e.index()];
            let away = node_pos[edge.other(self.id).index()] - self.position;
            for &l in &edge.lanes {
                if lanes[l.index()].direction().dot(away) < 0.0 {
                    incoming.push(l);
                } else {
                    outgoing.push(l);
                }
            }
        }
        incoming.sort_unstable();
        outgoing.sort_unstable();
        (incoming, outgoing)
    }

    /// Synthesize a cubic turn curve for every incoming → outgoing pair on
    /// different edges.  Replaces any previous connections.
    pub fn generate_connections(&mut self, edges: &[Edge], lanes: &[Lane], node_pos: &[Vec2], segments: usize) {
        let (incoming, outgoing) = self.classify(edges, lanes, node_pos);
        self.connections.clear();
        for &i in &incoming {
            let lane_in = &lanes[i.index()];
            for &o in &outgoing {
                let lane_out = &lanes[o.index()];
                if lane_in.edge == lane_out.edge {
                    continue;
                }
                self.connections.insert((i, o), turn_curve(lane_in, lane_out, segments));
            }
        }
    }

    /// Group incoming lanes into phases and start the controller at a random
    /// phase and offset.
    ///
    /// Each unassigned lane is paired with the most opposite unassigned lane
    /// whose direction dot product is below `phase_opposite_dot`; lanes left
    /// without a partner get a phase of their own.  Nodes joining fewer than
    /// three edges are left unsignalled.
    pub fn calculate_phases(
        &mut self,
        edges: &[Edge],
        lanes: &[Lane],
        node_pos: &[Vec2],
        config: &GraphConfig,
        rng: &mut SimRng,
    ) {
        if self.degree() < 3 {
            self.signal = SignalController::unsignalled(config);
            return;
        }
        let (incoming, _) = self.classify(edges, lanes, node_pos);
        let dirs: Vec<Vec2> = incoming.iter().map(|l| lanes[l.index()].direction()).collect();

        let mut assigned = vec![false; incoming.len()];
        let mut phases: Vec<Phase> = Vec::new();
        for i in 0..incoming.len() {
            if assigned[i] {
                continue;
            }
            assigned[i] = true;
            let partner = (0..incoming.len())
                .filter(|&j| !assigned[j])
                .map(|j| (j, dirs[i].dot(dirs[j])))
                .filter(|&(_, dot)| dot < config.phase_opposite_dot)
                .min_by(|a, b| a.1.total_cmp(&b.1));
            match partner {
                Some((j, _)) => {
                    assigned[j] = true;
                    phases.push(vec![incoming[i], incoming[j]]);
                }
                None => phases.push(vec![incoming[i]]),
            }
        }

        if phases.is_empty() {
            self.signal = SignalController::unsignalled(config);
            return;
        }
        let start = rng.gen_range(0..phases.len());
        let offset = rng.gen_range(0.0..config.green_secs);
        self.signal = SignalController::new(phases, start, offset, config);
    }

    /// Signal seen by an agent arriving on `lane`.
    #[inline]
    pub fn get_signal(&self, lane: LaneId) -> SignalState {
        self.signal.signal_for(lane)
    }

    /// Turn curves leaving incoming `lane`, in outgoing-lane order.
    pub fn curves_from(&self, lane: LaneId) -> impl Iterator<Item = (LaneId, &[Vec3])> + '_ {
        self.connections
            .range((lane, LaneId(0))..=(lane, LaneId(u32::MAX)))
            .map(|(&(_, out), pts)| (out, pts.as_slice()))
    }
}

/// Cubic curve from the end of `lane_in` to the start of `lane_out`, with
/// control points pushed along each end tangent by half the gap.
fn turn_curve(lane_in: &Lane, lane_out: &Lane, segments: usize) -> Vec<Vec3> {
    let p0 = lane_in.end();
    let p3 = lane_out.start();
    let reach = p0.distance(p3) * 0.5;
    let t_in = end_tangent(&lane_in.waypoints);
    let t_out = start_tangent(&lane_out.waypoints);
    sample_cubic(p0, p0 + t_in * reach, p3 - t_out * reach, p3, segments)
}

fn end_tangent(points: &[Vec3]) -> Vec3 {
    match points {
        [.., a, b] => (*b - *a).normalize_or_zero(),
        _ => Vec3::ZERO,
    }
}

fn start_tangent(points: &[Vec3]) -> Vec3 {
    match points {
        [a, b, ..] => (*b - *a).normalize_or_zero(),
        _ => Vec3::ZERO,
    }
}
