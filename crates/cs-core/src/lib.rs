//! `cs-core`: foundational types for the `citysim` workspace.
//!
//! This crate is a dependency of every other `cs-*` crate.  It intentionally
//! has no `cs-*` dependencies and minimal external ones (only `rand` and
//! `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                                  |
//! |-----------------|-----------------------------------------------------------|
//! | [`ids`]         | `NodeId`, `EdgeId`, `LaneId`, `AgentId`, `ClusterId`, `IdAllocator` |
//! | [`time`]        | `Tick`, `SimClock` (fixed-step)                           |
//! | [`rng`]         | `AgentRng` (per-agent), `SimRng` (global)                 |
//! | [`config`]      | `LayoutConfig`, `RoadConfig`, `GraphConfig`, `TrafficConfig`, `CollisionConfig`, `SimConfig` |
//! | [`error`]       | `CityError`, `CityResult`                                 |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to ids and config structs.  |

pub mod config;
pub mod error;
pub mod ids;
pub mod rng;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::{
    CollisionConfig, GraphConfig, LayoutConfig, RoadConfig, SimConfig, TrafficConfig,
};
pub use error::{CityError, CityResult};
pub use ids::{AgentId, ClusterId, EdgeId, IdAllocator, LaneId, NodeId, TypedId};
pub use rng::{AgentRng, SimRng};
pub use time::{SimClock, Tick};
