//! `cs-collision`: vehicle-vehicle collisions and the wreck sites they leave.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                    |
//! |--------------|-------------------------------------------------------------|
//! | [`grid`]     | `SpatialGrid` broad phase, `collides`, `detect_collisions`  |
//! | [`cluster`]  | `CrashCluster`: members, centroid, blocking radius          |
//! | [`registry`] | `ClusterRegistry`: live clusters, R-tree lookup, zones      |
//!
//! # Per-tick flow
//!
//! After every vehicle has moved, [`detect_collisions`] buckets the driving
//! vehicles that are not already inside a wreck zone and returns each
//! overlapping pair once.  The caller crashes both vehicles and hands the
//! pair to [`ClusterRegistry::record_crash`].  On the next tick the registry
//! acts as the vehicles' [`BlockingZones`](cs_vehicle::BlockingZones), so
//! cautious drivers that reach a wreck join it.

pub mod cluster;
pub mod grid;
pub mod registry;


pub use cluster::CrashCluster;
pub use grid::{SpatialGrid, collides, detect_collisions};
pub use registry::ClusterRegistry;
