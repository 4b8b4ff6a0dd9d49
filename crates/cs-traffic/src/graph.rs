//! The traffic graph: arenas of nodes, edges, and lanes.
//!
//! # Id layout
//!
//! Nodes, edges, and lanes live in `Vec` arenas and their ids are minted by
//! per-graph [`IdAllocator`]s in push order, so `id.index()` is always the
//! arena position.  A fresh graph numbers from zero.

use glam::{Vec2, Vec3};

use cs_core::{
    AgentId, CityError, CityResult, EdgeId, GraphConfig, IdAllocator, LaneId, NodeId, SimRng,
};
use cs_roads::RoadNetwork;

use crate::lane::{Edge, Lane, path_length, path_remaining, sample_line};
use crate::node::Node;
use crate::signal::SignalState;

/// Largest share of an edge that the setback at one end may take.
const MAX_SETBACK_FRACTION: f32 = 0.45;

/// Setback at each end of an edge of `length`, shrunk on short edges.
fn lane_setback(junction_setback: f32, length: f32) -> f32 {
    junction_setback.min(length * MAX_SETBACK_FRACTION)
}

/// Startup diagnostics.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GraphAudit {
    pub nodes: usize,
    pub edges: usize,
    pub lanes: usize,
    pub connections: usize,
    pub signalled_nodes: usize,
    /// Edges too short to carry lanes.
    pub degenerate_edges: Vec<EdgeId>,
    /// Lanes with no turn curve out of their destination.
    pub dead_end_lanes: Vec<LaneId>,
}

pub struct TrafficGraph {
    config: GraphConfig,
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    lanes: Vec<Lane>,
    node_ids: IdAllocator<NodeId>,
    edge_ids: IdAllocator<EdgeId>,
    lane_ids: IdAllocator<LaneId>,
}

impl TrafficGraph {
    /// Build nodes, edges, lanes, turn curves, and signal phases from a
    /// resolved road network.
    pub fn build(network: &RoadNetwork, config: &GraphConfig, rng: &mut SimRng) -> Self {
        let mut graph = Self {
            config:   config.clone(),
            nodes:    Vec::with_capacity(network.node_count()),
            edges:    Vec::with_capacity(network.segment_count()),
            lanes:    Vec::with_capacity(network.segment_count() * 2),
            node_ids: IdAllocator::new(),
            edge_ids: IdAllocator::new(),
            lane_ids: IdAllocator::new(),
        };

        for &pos in &network.node_pos {
            let id = graph.node_ids.next_id();
            debug_assert_eq!(id.index(), graph.nodes.len());
            graph.nodes.push(Node::new(id, pos, config));
        }
        for seg in &network.segments {
            graph.add_edge(NodeId(seg.from as u32), NodeId(seg.to as u32), seg.width, seg.lanes);
        }

        let node_pos: Vec<Vec2> = graph.nodes.iter().map(|n| n.position).collect();
        for node in &mut graph.nodes {
            node.generate_connections(&graph.edges, &graph.lanes, &node_pos, config.curve_segments);
            node.calculate_phases(&graph.edges, &graph.lanes, &node_pos, config, rng);
        }

        let audit = graph.audit();
        tracing::info!(
            nodes       = audit.nodes,
            edges       = audit.edges,
            lanes       = audit.lanes,
            connections = audit.connections,
            signalled   = audit.signalled_nodes,
            degenerate  = audit.degenerate_edges.len(),
            dead_ends   = audit.dead_end_lanes.len(),
            "traffic graph built",
        );
        for lane in &audit.dead_end_lanes {
            tracing::debug!(%lane, "dead-end lane");
        }
        graph
    }

    /// Add an edge and, unless it is too short, its two lanes.
    fn add_edge(&mut self, from: NodeId, to: NodeId, width: f32, marked_lanes: u8) {
        let id = self.edge_ids.next_id();
        debug_assert_eq!(id.index(), self.edges.len());
        let a = self.nodes[from.index()].position;
        let b = self.nodes[to.index()].position;
        let length = a.distance(b);

        let setback = lane_setback(self.config.junction_setback, length);
        let mut lanes = Vec::new();
        if length - 2.0 * setback >= self.config.min_lane_length {
            let dir = (b - a) / length;
            let right = Vec2::new(dir.y, -dir.x) * (width * 0.25);
            let fwd_start = (a + dir * setback + right).extend(0.0);
            let fwd_end = (b - dir * setback + right).extend(0.0);
            let back_start = (b - dir * setback - right).extend(0.0);
            let back_end = (a + dir * setback - right).extend(0.0);
            lanes.push(self.add_lane(id, from, to, width * 0.5, fwd_start, fwd_end));
            lanes.push(self.add_lane(id, to, from, width * 0.5, back_start, back_end));
        }

        self.edges.push(Edge { id, from, to, width, marked_lanes, length, lanes });
        self.nodes[from.index()].edges.push(id);
        self.nodes[to.index()].edges.push(id);
    }

    fn add_lane(&mut self, edge: EdgeId, origin: NodeId, destination: NodeId, width: f32, start: Vec3, end: Vec3) -> LaneId {
        let id = self.lane_ids.next_id();
        debug_assert_eq!(id.index(), self.lanes.len());
        let waypoints = sample_line(start, end, self.config.waypoint_spacing);
        let length = path_length(&waypoints);
        self.lanes.push(Lane {
            id,
            edge,
            origin,
            destination,
            width,
            waypoints,
            length,
            occupants: Default::default(),
        });
        id
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn config(&self) -> &GraphConfig {
        &self.config
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn lanes(&self) -> &[Lane] {
        &self.lanes
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.index())
    }

    pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
        self.edges.get(id.index())
    }

    pub fn lane(&self, id: LaneId) -> Option<&Lane> {
        self.lanes.get(id.index())
    }

    pub fn try_lane(&self, id: LaneId) -> CityResult<&Lane> {
        self.lane(id).ok_or(CityError::LaneNotFound(id))
    }

    pub fn try_node(&self, id: NodeId) -> CityResult<&Node> {
        self.node(id).ok_or(CityError::NodeNotFound(id))
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn lane_count(&self) -> usize {
        self.lanes.len()
    }

    // ── Signals ───────────────────────────────────────────────────────────

    /// Advance every node's signal controller.
    pub fn advance_signals(&mut self, dt: f32) {
        for node in &mut self.nodes {
            node.signal.advance(dt);
        }
    }

    /// Signal at the destination of `lane` as seen from that lane.
    pub fn get_signal(&self, lane: LaneId) -> SignalState {
        self.lane(lane)
            .and_then(|l| self.node(l.destination))
            .map_or(SignalState::Green, |n| n.get_signal(lane))
    }

    // ── Connections ───────────────────────────────────────────────────────

    /// Turn curves out of the destination node of `lane`.
    pub fn curves_from(&self, lane: LaneId) -> Vec<(LaneId, &[Vec3])> {
        self.lane(lane)
            .and_then(|l| self.node(l.destination))
            .map(|n| n.curves_from(lane).collect())
            .unwrap_or_default()
    }

    pub fn curve(&self, from: LaneId, to: LaneId) -> Option<&[Vec3]> {
        let node = self.node(self.lane(from)?.destination)?;
        node.connections.get(&(from, to)).map(Vec::as_slice)
    }

    // ── Lane occupancy ────────────────────────────────────────────────────

    /// Record `agent` on `lane`.  Returns `false` if it was already there.
    pub fn register(&mut self, lane: LaneId, agent: AgentId) -> CityResult<bool> {
        let l = self.lanes.get_mut(lane.index()).ok_or(CityError::LaneNotFound(lane))?;
        Ok(l.occupants.insert(agent))
    }

    /// Remove `agent` from `lane`.  Returns `false` if it was not there.
    pub fn deregister(&mut self, lane: LaneId, agent: AgentId) -> CityResult<bool> {
        let l = self.lanes.get_mut(lane.index()).ok_or(CityError::LaneNotFound(lane))?;
        Ok(l.occupants.remove(&agent))
    }

    /// Agents on `lane`, ascending by id.
    pub fn occupants(&self, lane: LaneId) -> impl Iterator<Item = AgentId> + '_ {
        self.lane(lane).into_iter().flat_map(|l| l.occupants.iter().copied())
    }

    /// Drop every lane registration.
    pub fn clear_occupancy(&mut self) {
        for lane in &mut self.lanes {
            lane.occupants.clear();
        }
    }

    // ── Measures ──────────────────────────────────────────────────────────

    pub fn lane_length(&self, lane: LaneId) -> Option<f32> {
        self.lane(lane).map(|l| l.length)
    }

    /// Distance from `pos`, heading for waypoint `target`, to the end of `lane`.
    pub fn remaining_distance(&self, lane: LaneId, target: usize, pos: Vec3) -> Option<f32> {
        self.lane(lane).map(|l| path_remaining(&l.waypoints, target, pos))
    }

    // ── Diagnostics ───────────────────────────────────────────────────────

    pub fn audit(&self) -> GraphAudit {
        let degenerate_edges = self.edges.iter().filter(|e| e.is_degenerate()).map(|e| e.id).collect();
        let dead_end_lanes = self
            .lanes
            .iter()
            .filter(|l| self.nodes[l.destination.index()].curves_from(l.id).next().is_none())
            .map(|l| l.id)
            .collect();
        GraphAudit {
            nodes: self.nodes.len(),
            edges: self.edges.len(),
            lanes: self.lanes.len(),
            connections: self.nodes.iter().map(|n| n.connections.len()).sum(),
            signalled_nodes: self.nodes.iter().filter(|n| n.signal.is_signalled()).count(),
            degenerate_edges,
            dead_end_lanes,
        }
    }
}
