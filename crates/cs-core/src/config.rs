//! Run configuration.
//!
//! One plain struct per subsystem, gathered in [`SimConfig`].  Every struct
//! has a `Default` carrying the tuned values and a `validate()` that rejects
//! settings the subsystems cannot work with.  With the `serde` feature the
//! structs can be loaded from TOML/JSON by the application crate.
//!
//! The safety distance (4.0), collision overlap factor (0.9), and snapping
//! tolerance (0.1) are knobs here rather than constants, but their defaults
//! are the historical values.

use crate::{CityError, CityResult};

fn check(cond: bool, msg: &str) -> CityResult<()> {
    if cond { Ok(()) } else { Err(CityError::Config(msg.to_owned())) }
}

// ── LayoutConfig ──────────────────────────────────────────────────────────────

/// Footprint and block/lot partitioning.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LayoutConfig {
    /// Footprint extent along x.
    pub width: f32,
    /// Footprint extent along y.
    pub depth: f32,
    /// Blocks below this area are not split further.
    pub min_block_area: f32,
    /// Building footprints below this area are not split further.
    pub min_lot_area: f32,
    /// Depth cap for the block partition.
    pub max_depth: u32,
    /// Depth cap for the per-lot footprint partition.
    pub max_lot_depth: u32,
    /// Probability that a cut is axis-aligned.
    pub ortho_chance: f64,
    /// Largest share of the parent area either child may keep before the cut
    /// is re-centred to halve the area.
    pub max_split_fraction: f32,
    /// First inset of a block (road half-width + curb).
    pub curb_inset: f32,
    /// Second inset of a block (sidewalk).
    pub sidewalk_width: f32,
    /// Spacing between neighbouring building footprints.
    pub building_gap: f32,
    /// Register the footprint boundary as a ring road before partitioning.
    pub perimeter_roads: bool,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            width:              400.0,
            depth:              400.0,
            min_block_area:     4_000.0,
            min_lot_area:       600.0,
            max_depth:          6,
            max_lot_depth:      4,
            ortho_chance:       0.8,
            max_split_fraction: 0.54,
            curb_inset:         3.0,
            sidewalk_width:     2.0,
            building_gap:       1.0,
            perimeter_roads:    true,
        }
    }
}

impl LayoutConfig {
    pub fn validate(&self) -> CityResult<()> {
        check(self.width > 0.0 && self.depth > 0.0, "footprint must have positive extent")?;
        check(self.min_block_area > 0.0, "min_block_area must be positive")?;
        check(self.min_lot_area > 0.0, "min_lot_area must be positive")?;
        check((0.0..=1.0).contains(&self.ortho_chance), "ortho_chance must be in [0, 1]")?;
        check(
            self.max_split_fraction > 0.5 && self.max_split_fraction <= 1.0,
            "max_split_fraction must be in (0.5, 1]",
        )?;
        check(self.curb_inset >= 0.0 && self.sidewalk_width >= 0.0, "insets must be non-negative")?;
        check(self.building_gap >= 0.0, "building_gap must be non-negative")
    }
}

// ── RoadConfig ────────────────────────────────────────────────────────────────

/// Segment ingestion and junction resolution.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RoadConfig {
    /// Two coordinates closer than this are the same junction.
    pub snap_tolerance: f32,
    /// Segments shorter than this are discarded while resolving junctions.
    pub min_segment_length: f32,
    /// Recursion cap for the splitting resolver.
    pub max_split_depth: u32,
}

impl Default for RoadConfig {
    fn default() -> Self {
        Self { snap_tolerance: 0.1, min_segment_length: 0.5, max_split_depth: 64 }
    }
}

impl RoadConfig {
    pub fn validate(&self) -> CityResult<()> {
        check(self.snap_tolerance > 0.0, "snap_tolerance must be positive")?;
        check(
            self.min_segment_length > self.snap_tolerance,
            "min_segment_length must exceed snap_tolerance",
        )?;
        check(self.max_split_depth > 0, "max_split_depth must be positive")
    }
}

// ── GraphConfig ───────────────────────────────────────────────────────────────

/// Lane geometry, turn curves, and signal timing.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GraphConfig {
    /// Distance lanes stop short of a junction centre.  Short edges cap it
    /// at 45% of their length.
    pub junction_setback: f32,
    /// Edges whose lanes would be shorter than this after the setback get
    /// no lanes.
    pub min_lane_length: f32,
    /// Maximum spacing between consecutive lane waypoints.
    pub waypoint_spacing: f32,
    /// Segments per synthesized turn curve.
    pub curve_segments: usize,
    /// Incoming lanes whose directions dot below this share a phase.
    pub phase_opposite_dot: f32,
    pub green_secs: f32,
    pub yellow_secs: f32,
    /// All-red clearance before the next phase starts.
    pub red_secs: f32,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            junction_setback:   6.0,
            min_lane_length:    1.0,
            waypoint_spacing:   5.0,
            curve_segments:     8,
            phase_opposite_dot: -0.8,
            green_secs:         5.0,
            yellow_secs:        2.0,
            red_secs:           1.0,
        }
    }
}

impl GraphConfig {
    pub fn validate(&self) -> CityResult<()> {
        check(self.junction_setback >= 0.0, "junction_setback must be non-negative")?;
        check(self.waypoint_spacing > 0.0, "waypoint_spacing must be positive")?;
        check(self.curve_segments >= 1, "curve_segments must be at least 1")?;
        check(
            self.green_secs > 0.0 && self.yellow_secs >= 0.0 && self.red_secs >= 0.0,
            "signal intervals must be non-negative with a positive green",
        )
    }

    /// Length of one full phase slot (green + yellow + clearance).
    #[inline]
    pub fn phase_cycle_secs(&self) -> f32 {
        self.green_secs + self.yellow_secs + self.red_secs
    }
}

// ── TrafficConfig ─────────────────────────────────────────────────────────────

/// Population and per-vehicle driving behaviour.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrafficConfig {
    /// Population maintenance spawns up to this many live agents.
    pub target_population: usize,
    /// Chance a newly spawned agent is reckless.
    pub reckless_probability: f64,
    /// Gap to a lane peer ahead below which an agent holds.
    pub safety_distance: f32,
    /// Distance from the lane end at which signals are obeyed.
    pub stop_distance: f32,
    pub min_speed: f32,
    pub max_speed: f32,
    /// Speed gain per second while unblocked.
    pub acceleration: f32,
    /// Speed multiplier a reckless agent applies when running a yellow.
    pub reckless_yellow_boost: f32,
    /// Chance a reckless agent runs a red, decided once per lane approach.
    pub red_run_probability: f64,
    /// Bounding radius used for collision tests.
    pub vehicle_radius: f32,
    /// Seconds without progress before an agent is reported stuck.
    pub stuck_secs: f32,
    /// Per-tick displacement below which an agent counts as not moving.
    pub stuck_epsilon: f32,
    /// No spawn on a lane whose start has an occupant within this distance.
    pub spawn_clearance: f32,
}

impl Default for TrafficConfig {
    fn default() -> Self {
        Self {
            target_population:     60,
            reckless_probability:  0.1,
            safety_distance:       4.0,
            stop_distance:         15.0,
            min_speed:             8.0,
            max_speed:             14.0,
            acceleration:          6.0,
            reckless_yellow_boost: 1.3,
            red_run_probability:   0.5,
            vehicle_radius:        1.2,
            stuck_secs:            2.0,
            stuck_epsilon:         1e-3,
            spawn_clearance:       6.0,
        }
    }
}

impl TrafficConfig {
    pub fn validate(&self) -> CityResult<()> {
        check(
            (0.0..=1.0).contains(&self.reckless_probability),
            "reckless_probability must be in [0, 1]",
        )?;
        check(
            (0.0..=1.0).contains(&self.red_run_probability),
            "red_run_probability must be in [0, 1]",
        )?;
        check(
            self.min_speed > 0.0 && self.max_speed >= self.min_speed,
            "speeds must satisfy 0 < min_speed <= max_speed",
        )?;
        check(self.acceleration > 0.0, "acceleration must be positive")?;
        check(self.vehicle_radius > 0.0, "vehicle_radius must be positive")?;
        check(self.safety_distance >= 0.0 && self.stop_distance >= 0.0, "distances must be non-negative")
    }
}

// ── CollisionConfig ───────────────────────────────────────────────────────────

/// Broad phase and crash clustering.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CollisionConfig {
    /// Uniform grid cell edge for the broad phase.
    pub cell_size: f32,
    /// Pairs collide when closer than `(r_a + r_b) * overlap_factor`.
    pub overlap_factor: f32,
    pub cluster_base_radius: f32,
    pub cluster_growth_per_car: f32,
    /// A new collision joins an existing cluster within this distance.
    pub cluster_search_radius: f32,
}

impl Default for CollisionConfig {
    fn default() -> Self {
        Self {
            cell_size:              5.0,
            overlap_factor:         0.9,
            cluster_base_radius:    3.0,
            cluster_growth_per_car: 0.75,
            cluster_search_radius:  8.0,
        }
    }
}

impl CollisionConfig {
    pub fn validate(&self) -> CityResult<()> {
        check(self.cell_size > 0.0, "cell_size must be positive")?;
        check(self.overlap_factor > 0.0, "overlap_factor must be positive")?;
        check(
            self.cluster_base_radius >= 0.0 && self.cluster_growth_per_car >= 0.0,
            "cluster radii must be non-negative",
        )?;
        check(self.cluster_search_radius >= 0.0, "cluster_search_radius must be non-negative")
    }
}

// ── SimConfig ─────────────────────────────────────────────────────────────────

/// Top-level simulation configuration.
///
/// Typically built in code or loaded from a TOML/JSON file by the application
/// crate and passed to the simulation builder.
#[derive(Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimConfig {
    /// Master RNG seed.  The same seed always produces identical results.
    pub seed: u64,
    /// Seconds per tick.  Zero means "use the 60 Hz default".
    pub tick_secs: f32,
    /// Ticks `Simulation::run` executes.
    pub total_ticks: u64,
    pub layout: LayoutConfig,
    pub roads: RoadConfig,
    pub graph: GraphConfig,
    pub traffic: TrafficConfig,
    pub collision: CollisionConfig,
}

impl SimConfig {
    /// Default fixed step: 60 ticks per simulated second.
    pub const DEFAULT_TICK_SECS: f32 = 1.0 / 60.0;

    /// Step length actually used by the run.
    #[inline]
    pub fn dt(&self) -> f32 {
        if self.tick_secs > 0.0 { self.tick_secs } else { Self::DEFAULT_TICK_SECS }
    }

    pub fn validate(&self) -> CityResult<()> {
        check(self.tick_secs >= 0.0, "tick_secs must be non-negative")?;
        self.layout.validate()?;
        self.roads.validate()?;
        self.graph.validate()?;
        self.traffic.validate()?;
        self.collision.validate()
    }
}
