//! Live crash clusters and their spatial index.
//!
//! Cluster centroids sit in an R-tree (via `rstar`) so both "which cluster
//! does this crash belong to" and "is this point inside a wreck zone" are
//! nearest-first walks rather than scans over every cluster.

use std::collections::BTreeMap;

use glam::Vec2;
use rstar::{AABB, PointDistance, RTree, RTreeObject};
use rustc_hash::FxHashMap;

use cs_core::{AgentId, ClusterId, CollisionConfig, IdAllocator};
use cs_vehicle::BlockingZones;

use crate::cluster::CrashCluster;

// ── R-tree entry ──────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
struct ClusterEntry {
    point: [f32; 2],
    id: ClusterId,
}

impl ClusterEntry {
    fn new(id: ClusterId, centroid: Vec2) -> Self {
        Self { point: centroid.to_array(), id }
    }
}

impl RTreeObject for ClusterEntry {
    type Envelope = AABB<[f32; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for ClusterEntry {
    fn distance_2(&self, point: &[f32; 2]) -> f32 {
        let dx = self.point[0] - point[0];
        let dy = self.point[1] - point[1];
        dx * dx + dy * dy
    }
}

// ── ClusterRegistry ───────────────────────────────────────────────────────────

/// Owner of every live [`CrashCluster`].
pub struct ClusterRegistry {
    config: CollisionConfig,
    clusters: BTreeMap<ClusterId, CrashCluster>,
    index: RTree<ClusterEntry>,
    ids: IdAllocator<ClusterId>,
    by_agent: FxHashMap<AgentId, ClusterId>,
    /// Upper bound on any live blocking radius; bounds `covering` walks.
    max_radius: f32,
}

impl ClusterRegistry {
    pub fn new(config: CollisionConfig) -> Self {
        Self {
            config,
            clusters: BTreeMap::new(),
            index: RTree::new(),
            ids: IdAllocator::new(),
            by_agent: FxHashMap::default(),
            max_radius: 0.0,
        }
    }

    pub fn config(&self) -> &CollisionConfig {
        &self.config
    }

    pub fn get(&self, id: ClusterId) -> Option<&CrashCluster> {
        self.clusters.get(&id)
    }

    /// Clusters in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = &CrashCluster> + '_ {
        self.clusters.values()
    }

    pub fn len(&self) -> usize {
        self.clusters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clusters.is_empty()
    }

    /// The cluster `agent` was wrecked into, if any.
    pub fn cluster_of(&self, agent: AgentId) -> Option<ClusterId> {
        self.by_agent.get(&agent).copied()
    }

    /// Number of wrecked vehicles across all clusters.
    pub fn wrecked_count(&self) -> usize {
        self.by_agent.len()
    }

    // ── Mutation ──────────────────────────────────────────────────────────

    /// The nearest cluster whose centroid lies within the search radius of
    /// `point`, or a new empty cluster anchored there.
    pub fn find_or_create(&mut self, point: Vec2) -> ClusterId {
        let search = self.config.cluster_search_radius;
        if let Some(hit) = self.index.nearest_neighbor(&point.to_array()) {
            if hit.distance_2(&point.to_array()) <= search * search {
                return hit.id;
            }
        }
        let id = self.ids.next_id();
        let cluster = CrashCluster::new(
            id,
            point,
            self.config.cluster_base_radius,
            self.config.cluster_growth_per_car,
        );
        self.index.insert(ClusterEntry::new(id, point));
        self.clusters.insert(id, cluster);
        tracing::debug!(cluster = %id, x = point.x, y = point.y, "crash cluster created");
        id
    }

    /// Add a wrecked vehicle at `pos` to `cluster`.
    ///
    /// Returns `false` when the cluster is unknown or the vehicle already
    /// belongs to a cluster.
    pub fn join(&mut self, cluster: ClusterId, agent: AgentId, pos: Vec2) -> bool {
        if self.by_agent.contains_key(&agent) {
            return false;
        }
        let Some(c) = self.clusters.get_mut(&cluster) else { return false };
        let old = ClusterEntry::new(cluster, c.centroid);
        if !c.add_agent(agent, pos) {
            return false;
        }
        self.index.remove(&old);
        self.index.insert(ClusterEntry::new(cluster, c.centroid));
        self.max_radius = self.max_radius.max(c.blocking_radius);
        self.by_agent.insert(agent, cluster);
        true
    }

    /// Record a fresh two-vehicle crash: both join the cluster nearest their
    /// midpoint.
    pub fn record_crash(&mut self, a: (AgentId, Vec2), b: (AgentId, Vec2)) -> ClusterId {
        let cluster = self.find_or_create((a.1 + b.1) * 0.5);
        self.join(cluster, a.0, a.1);
        self.join(cluster, b.0, b.1);
        cluster
    }

    /// Remove a cluster, returning its members for removal from the
    /// population.  `None` if `id` is not live.
    pub fn clear_cluster(&mut self, id: ClusterId) -> Option<Vec<AgentId>> {
        let cluster = self.clusters.remove(&id)?;
        self.index.remove(&ClusterEntry::new(id, cluster.centroid));
        for agent in &cluster.members {
            self.by_agent.remove(agent);
        }
        self.max_radius = self.clusters.values().map(|c| c.blocking_radius).fold(0.0, f32::max);
        tracing::debug!(cluster = %id, members = cluster.members.len(), "crash cluster cleared");
        Some(cluster.members)
    }

    /// Drop every cluster and restart id allocation.
    pub fn reset(&mut self) {
        self.clusters.clear();
        self.index = RTree::new();
        self.ids.reset();
        self.by_agent.clear();
        self.max_radius = 0.0;
    }
}

impl BlockingZones for ClusterRegistry {
    /// Nearest cluster whose blocking radius contains `pos`.
    fn covering(&self, pos: Vec2) -> Option<ClusterId> {
        if self.clusters.is_empty() {
            return None;
        }
        let reach = self.max_radius * self.max_radius;
        let p = pos.to_array();
        self.index
            .nearest_neighbor_iter(&p)
            .take_while(|e| e.distance_2(&p) <= reach)
            .find(|e| self.clusters.get(&e.id).is_some_and(|c| c.covers(pos)))
            .map(|e| e.id)
    }
}
