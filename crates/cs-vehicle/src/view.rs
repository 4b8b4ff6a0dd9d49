//! Read-only views a vehicle consults while updating.
//!
//! Every vehicle in a tick sees the same [`TrafficSnapshot`], taken before
//! the first update, so update order never changes what a vehicle observes
//! about its neighbours.

use std::collections::BTreeMap;

use glam::{Vec2, Vec3};

use cs_core::{AgentId, ClusterId, LaneId};

use crate::agent::VehicleAgent;
use crate::state::{DriveState, Track};

/// Wreck zones that stop traffic.
///
/// Implemented by the crash-cluster registry; vehicles only ask whether a
/// point is covered.
pub trait BlockingZones {
    /// The cluster whose blocking radius covers `pos`, if any.
    fn covering(&self, pos: Vec2) -> Option<ClusterId>;
}

/// No wrecks anywhere.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoZones;

impl BlockingZones for NoZones {
    fn covering(&self, _pos: Vec2) -> Option<ClusterId> {
        None
    }
}

/// What one vehicle looked like at snapshot time.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct AgentView {
    pub id: AgentId,
    pub position: Vec3,
    pub track: Track,
    pub target_index: usize,
    /// Distance to the current target waypoint.
    pub to_target: f32,
    pub state: DriveState,
    pub radius: f32,
}

impl AgentView {
    /// Whether this vehicle is strictly ahead of `other` on the same path.
    pub fn is_ahead_of(&self, other: &AgentView) -> bool {
        self.target_index > other.target_index
            || (self.target_index == other.target_index && self.to_target < other.to_target)
    }
}

#[derive(Clone, Debug, Default)]
pub struct TrafficSnapshot {
    views: BTreeMap<AgentId, AgentView>,
    by_lane: BTreeMap<LaneId, Vec<AgentId>>,
}

impl TrafficSnapshot {
    pub fn capture<'a, I>(agents: I) -> Self
    where
        I: IntoIterator<Item = &'a VehicleAgent>,
    {
        let mut snap = Self::default();
        for agent in agents {
            let view = agent.view();
            if let Track::Lane(l) = view.track {
                snap.by_lane.entry(l).or_default().push(view.id);
            }
            snap.views.insert(view.id, view);
        }
        snap
    }

    pub fn get(&self, id: AgentId) -> Option<&AgentView> {
        self.views.get(&id)
    }

    /// Views in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = &AgentView> + '_ {
        self.views.values()
    }

    /// Vehicles following `lane` at snapshot time.
    pub fn on_lane(&self, lane: LaneId) -> impl Iterator<Item = &AgentView> + '_ {
        self.by_lane
            .get(&lane)
            .into_iter()
            .flatten()
            .filter_map(|id| self.views.get(id))
    }

    pub fn len(&self) -> usize {
        self.views.len()
    }

    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }
}
