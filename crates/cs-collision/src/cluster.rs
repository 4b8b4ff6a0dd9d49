//! A single wreck site.

use glam::Vec2;

use cs_core::{AgentId, ClusterId};

/// Wrecked vehicles merged into one obstacle.
///
/// The blocking radius only ever grows while the cluster lives.
#[derive(Clone, Debug, PartialEq)]
pub struct CrashCluster {
    pub id: ClusterId,
    /// Running mean of the member positions at the time they joined.
    pub centroid: Vec2,
    /// Members in join order.
    pub members: Vec<AgentId>,
    pub blocking_radius: f32,
    base_radius: f32,
    growth_per_car: f32,
}

impl CrashCluster {
    /// An empty cluster anchored at `centroid`.
    pub fn new(id: ClusterId, centroid: Vec2, base_radius: f32, growth_per_car: f32) -> Self {
        Self {
            id,
            centroid,
            members: Vec::new(),
            blocking_radius: 0.0,
            base_radius,
            growth_per_car,
        }
    }

    /// Add a wrecked vehicle at `pos`.  Returns `false`, changing nothing,
    /// when `agent` is already a member.
    pub fn add_agent(&mut self, agent: AgentId, pos: Vec2) -> bool {
        if self.contains(agent) {
            return false;
        }
        self.members.push(agent);
        let n = self.members.len() as f32;
        self.centroid += (pos - self.centroid) / n;
        let grown = self.base_radius + self.growth_per_car * n;
        self.blocking_radius = self.blocking_radius.max(grown);
        true
    }

    pub fn contains(&self, agent: AgentId) -> bool {
        self.members.contains(&agent)
    }

    /// Whether `pos` lies inside the blocking radius.
    #[inline]
    pub fn covers(&self, pos: Vec2) -> bool {
        !self.members.is_empty() && pos.distance_squared(self.centroid) <= self.blocking_radius * self.blocking_radius
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}
