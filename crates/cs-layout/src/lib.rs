//! `cs-layout`: procedural city layout.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                  |
//! |---------------|-----------------------------------------------------------|
//! | [`partition`] | generic BSP over a convex polygon with a per-cut callback |
//! | [`city`]      | `CityLayout::generate`: roads, blocks, sidewalks, lots    |
//!
//! # Pipeline
//!
//! ```text
//! footprint ──partition──► blocks ──inset──► sidewalks ──inset──► lots
//!     │            │                                               │
//!     │            └─ each cut ─► RoadNetworkBuilder               └─partition─► footprints
//!     └─ perimeter ring ───────► RoadNetworkBuilder
//! ```
//!
//! Every random draw comes from the caller's `SimRng`, so one seed always
//! produces the same city.

pub mod city;
pub mod partition;


pub use city::CityLayout;
pub use partition::{Leaf, PartitionLimits, partition};
