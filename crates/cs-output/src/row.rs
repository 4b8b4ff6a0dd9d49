//! Plain data row types written by output backends.

/// Pose of one driving vehicle at a frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AgentTransformRow {
    pub tick:     u64,
    pub agent_id: u32,
    pub x:        f32,
    pub y:        f32,
    pub z:        f32,
    /// Radians, counter-clockwise from +x.
    pub yaw:      f32,
    pub scale:    f32,
}

/// Pose of one wrecked vehicle at a frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WreckRow {
    pub tick:       u64,
    pub cluster_id: u32,
    pub agent_id:   u32,
    pub x:          f32,
    pub y:          f32,
    pub yaw:        f32,
}

/// Counters for one simulation tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickSummaryRow {
    pub tick:         u64,
    pub elapsed_secs: f64,
    pub driving:      u64,
    pub crashed:      u64,
    pub spawned:      u64,
    pub despawned:    u64,
    pub collisions:   u64,
    pub clusters:     u64,
}

/// One vertex of one city polygon.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolygonRow {
    /// `junction`, `road`, `block`, `sidewalk`, `lot`, or `footprint`.
    pub kind:    &'static str,
    /// Index of the polygon within its kind.
    pub polygon: u32,
    /// Vertex order within the polygon (counter-clockwise).
    pub vertex:  u32,
    pub x:       f32,
    pub y:       f32,
}
