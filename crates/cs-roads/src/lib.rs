//! `cs-roads`: segment ingestion, junction resolution, and road meshing.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                    |
//! |-------------|-------------------------------------------------------------|
//! | [`segment`] | `RoadSegment`, `RoadClass`                                  |
//! | [`builder`] | `RoadNetworkBuilder`: snaps, splits, and deduplicates       |
//! | [`network`] | `RoadNetwork`: frozen nodes + segments + CSR incidence      |
//! | [`mesh`]    | junction miter polygons and trimmed road quads              |
//!
//! # Invariant handed to the traffic graph
//!
//! After every `add_segment` call the builder's segment set has no undetected
//! crossings: wherever two roads meet (X crossing, T junction, or shared end)
//! they share a node, and no two segments join the same pair of nodes.

pub mod builder;
pub mod mesh;
pub mod network;
pub mod segment;

#[cfg(test)]
mod tests;

pub use builder::RoadNetworkBuilder;
pub use mesh::{RoadMesh, junction_polygon, road_quad, setback};
pub use network::{NetworkSegment, RoadNetwork};
pub use segment::{RoadClass, RoadSegment};
