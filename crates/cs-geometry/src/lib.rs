//! `cs-geometry`: 2D geometry for city layout and road meshing.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                     |
//! |-------------|--------------------------------------------------------------|
//! | [`polygon`] | `Polygon`: split, inset, chamfer, fillet, queries            |
//! | [`line`]    | infinite-line and segment intersection, projection           |
//! | [`curve`]   | quadratic / cubic Bézier evaluation and uniform sampling     |
//!
//! # Degeneracies are not errors
//!
//! Every operation that can become geometrically meaningless (a cut that
//! misses the polygon, an inset that swallows it, parallel lines) returns
//! `None`.  Callers keep the pre-operation shape and move on; nothing in this
//! crate panics on bad geometry.

pub mod curve;
pub mod line;
pub mod polygon;


pub use curve::{cubic_bezier, quadratic_bezier, sample_cubic, sample_quadratic};
pub use line::{SegmentHit, line_intersection, project_onto_segment, segment_intersection};
pub use polygon::Polygon;

pub use glam::{Vec2, Vec3};

/// Distance below which a vertex counts as lying on a cutting line.
pub const EPSILON: f32 = 1e-4;
