//! Per-vehicle state enums and update outcomes.

use glam::Vec3;

use cs_core::{ClusterId, LaneId};

/// Driving lifecycle.  `Crashed` is terminal; a crashed vehicle is removed
/// only when its cluster is cleared.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum DriveState {
    Driving,
    Crashed,
}

/// What the vehicle is currently following.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Track {
    /// Registered on this lane.
    Lane(LaneId),
    /// On the turn curve from `from` to `to`; registered on neither.
    Curve { from: LaneId, to: LaneId },
}

impl Track {
    pub fn lane(self) -> Option<LaneId> {
        match self {
            Track::Lane(l) => Some(l),
            Track::Curve { .. } => None,
        }
    }
}

/// Why a vehicle did not move this tick.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum HoldReason {
    /// Manual/debug brake.
    Brake,
    /// Lane peer ahead inside the safety distance.
    Traffic,
    /// Red (or yellow) at the lane end.
    Signal,
    /// Already wrecked.
    Crashed,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum DespawnReason {
    /// The lane ended at a node with no turn curve out.
    DeadEnd,
}

/// Result of one [`VehicleAgent::update`](crate::VehicleAgent::update).
///
/// Cluster joins and despawns are applied by the caller after every vehicle
/// has been updated.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum UpdateOutcome {
    Moved,
    Held(HoldReason),
    /// Moving is intended but nothing has happened for too long; reported
    /// once per stall.
    Stuck,
    /// Drove into a wreck's blocking radius.
    JoinCluster(ClusterId),
    Despawned(DespawnReason),
}

/// Renderer-facing pose.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct AgentTransform {
    pub position: Vec3,
    /// Heading in radians, counter-clockwise from +x.
    pub yaw: f32,
    /// Uniform scale (bounding diameter).
    pub scale: f32,
}
