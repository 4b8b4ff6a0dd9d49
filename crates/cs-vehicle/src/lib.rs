//! `cs-vehicle`: per-vehicle driving.
//!
//! # Crate layout
//!
//! | Module    | Contents                                                         |
//! |-----------|------------------------------------------------------------------|
//! | [`agent`] | `VehicleAgent`: spawn, update, crash, transform                  |
//! | [`state`] | `DriveState`, `Track`, `UpdateOutcome`, `AgentTransform`         |
//! | [`view`]  | `TrafficSnapshot`, `AgentView`, the `BlockingZones` seam         |
//!
//! # Update order within one vehicle
//!
//! 1. Holds, first match wins: manual brake; wreck zone (joins the cluster,
//!    cautious drivers only); lane peer ahead within the safety distance
//!    (cautious only); red or yellow within the stop distance of the lane
//!    end.  Reckless drivers run a red with a chance decided once per
//!    approach and speed up on yellow.
//! 2. Accelerate toward top speed and move `speed × dt` along the path,
//!    snapping to each waypoint passed.
//! 3. At the path end: a curve hands over to its destination lane; a lane
//!    picks one of its outgoing curves at random, or despawns the vehicle
//!    when there are none.
//!
//! A vehicle mutates the lane registry only for itself.  Everything it
//! learns about other vehicles comes from the tick's [`TrafficSnapshot`].

pub mod agent;
pub mod state;
pub mod view;

#[cfg(test)]
mod tests;

pub use agent::VehicleAgent;
pub use state::{AgentTransform, DespawnReason, DriveState, HoldReason, Track, UpdateOutcome};
pub use view::{AgentView, BlockingZones, NoZones, TrafficSnapshot};
