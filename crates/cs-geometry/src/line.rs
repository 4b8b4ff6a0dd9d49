//! Line and segment primitives.

use glam::Vec2;

/// Sine of the smallest angle two directions may enclose before they are
/// treated as parallel.
const PARALLEL_SIN: f32 = 1e-6;

/// Intersection of two segments with the parameter along each.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SegmentHit {
    pub point: Vec2,
    /// Parameter along the first segment, in `[0, 1]`.
    pub t: f32,
    /// Parameter along the second segment, in `[0, 1]`.
    pub u: f32,
}

/// Intersection of the infinite lines `p1 + d1·t` and `p2 + d2·s`.
///
/// Returns `None` for (near-)parallel lines or a zero direction.
pub fn line_intersection(p1: Vec2, d1: Vec2, p2: Vec2, d2: Vec2) -> Option<Vec2> {
    let denom = d1.perp_dot(d2);
    if denom.abs() <= PARALLEL_SIN * d1.length() * d2.length() || denom == 0.0 {
        return None;
    }
    let t = (p2 - p1).perp_dot(d2) / denom;
    Some(p1 + d1 * t)
}

/// Intersection of segments `a0→a1` and `b0→b1`.
///
/// Both parameters are inclusive of the endpoints; callers that need a
/// strictly interior crossing check `t` and `u` themselves.
pub fn segment_intersection(a0: Vec2, a1: Vec2, b0: Vec2, b1: Vec2) -> Option<SegmentHit> {
    let r = a1 - a0;
    let s = b1 - b0;
    let denom = r.perp_dot(s);
    if denom.abs() <= PARALLEL_SIN * r.length() * s.length() || denom == 0.0 {
        return None;
    }
    let w = b0 - a0;
    let t = w.perp_dot(s) / denom;
    let u = w.perp_dot(r) / denom;
    if !(0.0..=1.0).contains(&t) || !(0.0..=1.0).contains(&u) {
        return None;
    }
    Some(SegmentHit { point: a0 + r * t, t, u })
}

/// Closest point to `p` on segment `a→b`, with its clamped parameter.
pub fn project_onto_segment(p: Vec2, a: Vec2, b: Vec2) -> (f32, Vec2) {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq <= f32::EPSILON {
        return (0.0, a);
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    (t, a + ab * t)
}
