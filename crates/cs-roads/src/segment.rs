//! The single segment representation shared by layout and builder.

use glam::Vec2;

/// A straight road between two points.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RoadSegment {
    pub start: Vec2,
    pub end: Vec2,
    /// Full carriageway width.
    pub width: f32,
    /// Marked lane count (both directions).  The traffic graph always builds
    /// one travel lane per direction; this only informs width and rendering.
    pub lanes: u8,
}

impl RoadSegment {
    pub fn new(start: Vec2, end: Vec2, width: f32, lanes: u8) -> Self {
        Self { start, end, width, lanes }
    }

    #[inline]
    pub fn length(&self) -> f32 {
        self.start.distance(self.end)
    }

    /// Unit direction from `start` to `end` (zero for degenerate segments).
    #[inline]
    pub fn direction(&self) -> Vec2 {
        (self.end - self.start).normalize_or_zero()
    }

    #[inline]
    pub fn point_at(&self, t: f32) -> Vec2 {
        self.start.lerp(self.end, t)
    }
}

/// Road hierarchy by partition depth: the first cuts through a footprint
/// become arterials, later cuts progressively narrower streets.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum RoadClass {
    Arterial,
    Collector,
    Local,
}

impl RoadClass {
    pub fn for_depth(depth: u32) -> Self {
        match depth {
            0 => RoadClass::Arterial,
            1 | 2 => RoadClass::Collector,
            _ => RoadClass::Local,
        }
    }

    pub fn width(self) -> f32 {
        match self {
            RoadClass::Arterial  => 14.0,
            RoadClass::Collector => 10.0,
            RoadClass::Local     => 7.0,
        }
    }

    pub fn lanes(self) -> u8 {
        match self {
            RoadClass::Arterial  => 4,
            RoadClass::Collector => 2,
            RoadClass::Local     => 2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RoadClass::Arterial  => "arterial",
            RoadClass::Collector => "collector",
            RoadClass::Local     => "local",
        }
    }
}

impl std::fmt::Display for RoadClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
