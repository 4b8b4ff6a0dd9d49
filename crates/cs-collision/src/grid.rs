//! Uniform-grid broad phase and the pairwise collision test.

use glam::Vec2;
use rustc_hash::FxHashMap;

use cs_core::{AgentId, CollisionConfig};
use cs_traffic::TrafficGraph;
use cs_vehicle::{AgentView, BlockingZones, DriveState, TrafficSnapshot, Track};

/// Cell coordinates: floor-divided position.
type Cell = (i32, i32);

/// Agent buckets keyed by grid cell.
///
/// Rebuilt every tick; buckets keep their allocations across [`clear`](Self::clear).
#[derive(Clone, Debug)]
pub struct SpatialGrid {
    cell_size: f32,
    cells: FxHashMap<Cell, Vec<AgentId>>,
}

impl SpatialGrid {
    pub fn new(cell_size: f32) -> Self {
        Self { cell_size, cells: FxHashMap::default() }
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    #[inline]
    pub fn cell_of(&self, pos: Vec2) -> Cell {
        (
            (pos.x / self.cell_size).floor() as i32,
            (pos.y / self.cell_size).floor() as i32,
        )
    }

    pub fn insert(&mut self, id: AgentId, pos: Vec2) {
        let cell = self.cell_of(pos);
        self.cells.entry(cell).or_default().push(id);
    }

    /// Empty every bucket.
    pub fn clear(&mut self) {
        for bucket in self.cells.values_mut() {
            bucket.clear();
        }
    }

    /// Number of agents currently bucketed.
    pub fn len(&self) -> usize {
        self.cells.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every same-cell pair once, as `(lower, higher)`, sorted.
    pub fn candidate_pairs(&self) -> Vec<(AgentId, AgentId)> {
        let mut pairs = Vec::new();
        for bucket in self.cells.values().filter(|b| b.len() > 1) {
            let mut ids = bucket.clone();
            ids.sort_unstable();
            ids.dedup();
            for (i, &a) in ids.iter().enumerate() {
                for &b in &ids[i + 1..] {
                    pairs.push((a, b));
                }
            }
        }
        pairs.sort_unstable();
        pairs
    }
}

/// Whether two vehicles overlap.
///
/// Vehicles on opposite lanes of the same road never collide, however close
/// their bounding circles are.
pub fn collides(a: &AgentView, b: &AgentView, graph: &TrafficGraph, overlap_factor: f32) -> bool {
    if let (Track::Lane(la), Track::Lane(lb)) = (a.track, b.track) {
        if la != lb {
            let edge_a = graph.lane(la).map(|l| l.edge);
            if edge_a.is_some() && edge_a == graph.lane(lb).map(|l| l.edge) {
                return false;
            }
        }
    }
    let reach = (a.radius + b.radius) * overlap_factor;
    a.position.truncate().distance(b.position.truncate()) < reach
}

/// New collisions among driving vehicles, in ascending `(lower, higher)` id
/// order, each pair at most once.
///
/// Vehicles already inside a wreck zone are left to the zone and not bucketed.
pub fn detect_collisions<Z: BlockingZones>(
    snapshot: &TrafficSnapshot,
    graph: &TrafficGraph,
    zones: &Z,
    grid: &mut SpatialGrid,
    config: &CollisionConfig,
) -> Vec<(AgentId, AgentId)> {
    grid.clear();
    for view in snapshot.iter().filter(|v| v.state == DriveState::Driving) {
        let pos = view.position.truncate();
        if zones.covering(pos).is_some() {
            continue;
        }
        grid.insert(view.id, pos);
    }

    grid.candidate_pairs()
        .into_iter()
        .filter(|&(a, b)| match (snapshot.get(a), snapshot.get(b)) {
            (Some(va), Some(vb)) => collides(va, vb, graph, config.overlap_factor),
            _ => false,
        })
        .collect()
}
