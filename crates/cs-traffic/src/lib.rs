//! `cs-traffic`: the directed lane graph vehicles drive on.
//!
//! # Crate layout
//!
//! | Module     | Contents                                                      |
//! |------------|---------------------------------------------------------------|
//! | [`graph`]  | `TrafficGraph`: arenas, occupancy, queries, `GraphAudit`      |
//! | [`node`]   | `Node`: turn-curve synthesis and phase grouping               |
//! | [`lane`]   | `Edge`, `Lane`, polyline length helpers                       |
//! | [`signal`] | `SignalController`, `SignalState`                             |
//!
//! # Geometry conventions
//!
//! Traffic drives on the right.  Each edge carries a forward lane (from →
//! to) and a backward lane, offset a quarter of the road width to the right
//! of their travel direction and stopped `junction_setback` short of both
//! nodes.  Waypoints are `Vec3` with `z` as elevation (always zero for
//! generated cities).

pub mod graph;
pub mod lane;
pub mod node;
pub mod signal;


pub use graph::{GraphAudit, TrafficGraph};
pub use lane::{Edge, Lane, path_length, path_remaining};
pub use node::{ConnectionMap, Node};
pub use signal::{Phase, SignalController, SignalState};
