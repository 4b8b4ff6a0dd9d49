//! `cs-sim`: fixed-step orchestrator for the citysim workspace.
//!
//! # Tick loop
//!
//! ```text
//! for tick in 0..config.total_ticks:
//!   ① Signals:      every junction controller advances by dt.
//!   ② Population:   drop vehicles that left at a dead end; spawn at clear
//!                   lane starts up to the target population.
//!   ③ Vehicles:     snapshot, then update each vehicle in ascending
//!                   AgentId order; apply wreck-zone joins afterwards.
//!   ④ Collisions:   grid broad phase over post-move positions; each new
//!                   pair crashes and merges into the nearest cluster.
//!   ⑤ Wreck sync:   refresh wreck transforms from cluster members.
//! ```
//!
//! `regenerate()` builds a complete new world (layout, graph, id
//! allocators, population, clusters) and swaps it in at once.
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use cs_core::SimConfig;
//! use cs_sim::{NoopObserver, SimBuilder};
//!
//! let mut sim = SimBuilder::new(SimConfig { total_ticks: 600, ..SimConfig::default() })
//!     .build()?;
//! sim.run(&mut NoopObserver)?;
//! ```

pub mod builder;
pub mod error;
pub mod observer;
pub mod sim;
pub mod world;


pub use builder::SimBuilder;
pub use error::{SimError, SimResult};
pub use observer::{FrameView, NoopObserver, SimObserver, TickStats, WreckTransform};
pub use sim::Simulation;
pub use world::World;
