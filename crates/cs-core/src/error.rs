//! Workspace error type.
//!
//! Sub-crates may define their own error enums and convert them into
//! `CityError` via `From` impls, or keep them separate and wrap `CityError` as
//! one variant.  Geometry and agent-level failures are deliberately *not*
//! errors: they return `None` or despawn the agent (see the crate docs of
//! `cs-geometry` and `cs-vehicle`).

use thiserror::Error;

use crate::{AgentId, LaneId, NodeId};

/// The top-level error type for `cs-core` and a common base for sub-crates.
#[derive(Debug, Error)]
pub enum CityError {
    #[error("node {0} not found")]
    NodeNotFound(NodeId),

    #[error("lane {0} not found")]
    LaneNotFound(LaneId),

    #[error("agent {0} not found")]
    AgentNotFound(AgentId),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shorthand result type for all `cs-*` crates.
pub type CityResult<T> = Result<T, CityError>;
