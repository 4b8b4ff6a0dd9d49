//! Convex polygon with the operations the layout generator needs.
//!
//! Vertices are stored counter-clockwise.  Convexity is assumed everywhere
//! and never verified; concave input gives unspecified (but non-panicking)
//! results.

use glam::Vec2;

use crate::curve::sample_quadratic;
use crate::line::line_intersection;
use crate::EPSILON;

/// Areas at or below this are treated as collapsed.
const AREA_EPSILON: f32 = 1e-6;

/// Corner cuts never reach further than this share of the shorter adjacent
/// edge, so neighbouring cuts cannot overlap.
const CORNER_LIMIT: f32 = 0.45;

/// A convex polygon with at least three counter-clockwise vertices.
#[derive(Clone, Debug, PartialEq)]
pub struct Polygon {
    points: Vec<Vec2>,
}

impl Polygon {
    /// Build from an ordered ring of points.
    ///
    /// Consecutive (and wrap-around) duplicates are dropped.  Returns `None`
    /// if fewer than three distinct vertices remain.
    pub fn from_points(points: Vec<Vec2>) -> Option<Self> {
        let mut ring: Vec<Vec2> = Vec::with_capacity(points.len());
        for p in points {
            if ring.last().is_none_or(|&last| last.distance_squared(p) > EPSILON * EPSILON) {
                ring.push(p);
            }
        }
        while ring.len() > 1 && ring[0].distance_squared(ring[ring.len() - 1]) <= EPSILON * EPSILON {
            ring.pop();
        }
        if ring.len() < 3 {
            return None;
        }
        Some(Self { points: ring })
    }

    /// Axis-aligned rectangle spanning `min..max`.
    pub fn rect(min: Vec2, max: Vec2) -> Self {
        Self {
            points: vec![
                Vec2::new(min.x, min.y),
                Vec2::new(max.x, min.y),
                Vec2::new(max.x, max.y),
                Vec2::new(min.x, max.y),
            ],
        }
    }

    /// Rectangle of the given extent centred on the origin.
    pub fn centered_rect(width: f32, depth: f32) -> Self {
        let half = Vec2::new(width * 0.5, depth * 0.5);
        Self::rect(-half, half)
    }

    #[inline]
    pub fn points(&self) -> &[Vec2] {
        &self.points
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always `false`; present for API symmetry with `len`.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Consume the polygon, returning its vertex ring.
    pub fn into_points(self) -> Vec<Vec2> {
        self.points
    }

    /// Edges as `(start, end)` pairs, closing edge included.
    pub fn edges(&self) -> impl Iterator<Item = (Vec2, Vec2)> + '_ {
        let n = self.points.len();
        (0..n).map(move |i| (self.points[i], self.points[(i + 1) % n]))
    }

    // ── Measures ──────────────────────────────────────────────────────────

    /// Shoelace area; positive for counter-clockwise rings.
    pub fn signed_area(&self) -> f32 {
        self.edges().map(|(a, b)| a.perp_dot(b)).sum::<f32>() * 0.5
    }

    pub fn area(&self) -> f32 {
        self.signed_area().abs()
    }

    pub fn perimeter(&self) -> f32 {
        self.edges().map(|(a, b)| a.distance(b)).sum()
    }

    /// Area-weighted centroid; the vertex mean for degenerate rings.
    pub fn centroid(&self) -> Vec2 {
        let area = self.signed_area();
        if area.abs() <= AREA_EPSILON {
            let sum: Vec2 = self.points.iter().copied().sum();
            return sum / self.points.len() as f32;
        }
        let acc: Vec2 = self.edges().map(|(a, b)| (a + b) * a.perp_dot(b)).sum();
        acc / (6.0 * area)
    }

    /// Axis-aligned bounds as `(min, max)`.
    pub fn bounds(&self) -> (Vec2, Vec2) {
        self.points.iter().fold(
            (Vec2::splat(f32::INFINITY), Vec2::splat(f32::NEG_INFINITY)),
            |(lo, hi), &p| (lo.min(p), hi.max(p)),
        )
    }

    /// Point containment, boundary inclusive.
    pub fn contains(&self, p: Vec2) -> bool {
        self.edges().all(|(a, b)| {
            let e = b - a;
            e.perp_dot(p - a) >= -EPSILON * e.length().max(1.0)
        })
    }

    // ── Split ─────────────────────────────────────────────────────────────

    /// Cut along the infinite line through `point` with `direction`.
    ///
    /// Returns `(left, right)` where `left` lies on the positive side (to the
    /// left of `direction`).  Vertices within [`EPSILON`] of the line belong
    /// to both halves.  Returns `None` if the line does not separate the
    /// vertices or either half would have fewer than three vertices.
    pub fn split(&self, point: Vec2, direction: Vec2) -> Option<(Polygon, Polygon)> {
        let normal = direction.try_normalize()?.perp();
        let dist: Vec<f32> = self.points.iter().map(|&p| (p - point).dot(normal)).collect();

        let has_left = dist.iter().any(|&d| d > EPSILON);
        let has_right = dist.iter().any(|&d| d < -EPSILON);
        if !(has_left && has_right) {
            return None;
        }

        let n = self.points.len();
        let mut left = Vec::with_capacity(n + 2);
        let mut right = Vec::with_capacity(n + 2);
        for i in 0..n {
            let j = (i + 1) % n;
            let (p, dp) = (self.points[i], dist[i]);
            let (q, dq) = (self.points[j], dist[j]);

            if dp >= -EPSILON {
                left.push(p);
            }
            if dp <= EPSILON {
                right.push(p);
            }
            let straddles = (dp > EPSILON && dq < -EPSILON) || (dp < -EPSILON && dq > EPSILON);
            if straddles {
                let x = p + (q - p) * (dp / (dp - dq));
                left.push(x);
                right.push(x);
            }
        }

        Some((Polygon::from_points(left)?, Polygon::from_points(right)?))
    }

    /// Every point where the infinite line through `point` crosses an edge.
    ///
    /// A crossing exactly at a vertex is reported once.
    pub fn intersect_line(&self, point: Vec2, direction: Vec2) -> Vec<Vec2> {
        let mut hits: Vec<Vec2> = Vec::with_capacity(2);
        if direction.length_squared() <= f32::EPSILON {
            return hits;
        }
        for (a, b) in self.edges() {
            let e = b - a;
            let denom = e.perp_dot(direction);
            if denom.abs() <= f32::EPSILON * e.length() * direction.length() || denom == 0.0 {
                continue;
            }
            let s = (point - a).perp_dot(direction) / denom;
            if (-EPSILON..=1.0 + EPSILON).contains(&s) {
                let x = a + e * s.clamp(0.0, 1.0);
                if hits.iter().all(|h| h.distance_squared(x) > EPSILON * EPSILON) {
                    hits.push(x);
                }
            }
        }
        hits
    }

    // ── Offsetting ────────────────────────────────────────────────────────

    /// Move every edge inward by `amount`.
    ///
    /// Each new vertex is the intersection of its two shifted neighbouring
    /// edges, or the vertex shifted along the incoming edge normal when those
    /// edges are parallel.  Returns `None` once the polygon collapses: an edge
    /// flips direction or the area is no longer positive.
    pub fn inset(&self, amount: f32) -> Option<Polygon> {
        let n = self.points.len();
        let mut out = Vec::with_capacity(n);
        for i in 0..n {
            let prev = self.points[(i + n - 1) % n];
            let cur = self.points[i];
            let next = self.points[(i + 1) % n];
            let d0 = (cur - prev).try_normalize()?;
            let d1 = (next - cur).try_normalize()?;
            let shift0 = d0.perp() * amount;
            let shift1 = d1.perp() * amount;
            let p = line_intersection(prev + shift0, d0, cur + shift1, d1).unwrap_or(cur + shift0);
            out.push(p);
        }

        for i in 0..n {
            let j = (i + 1) % n;
            let before = self.points[j] - self.points[i];
            let after = out[j] - out[i];
            if before.dot(after) <= 0.0 {
                return None;
            }
        }
        let inset = Polygon { points: out };
        (inset.signed_area() > AREA_EPSILON).then_some(inset)
    }

    // ── Corner rounding ───────────────────────────────────────────────────

    /// Replace each corner with a straight cut.
    pub fn chamfer(&self, radius: f32) -> Polygon {
        self.round_corners(radius, 0)
    }

    /// Replace each corner with a quadratic arc of `segments` pieces.
    pub fn fillet(&self, radius: f32, segments: usize) -> Polygon {
        self.round_corners(radius, segments)
    }

    /// Shared corner walk; `segments == 0` means a straight cut.
    fn round_corners(&self, radius: f32, segments: usize) -> Polygon {
        if radius <= 0.0 {
            return self.clone();
        }
        let n = self.points.len();
        let mut out = Vec::with_capacity(n * (segments.max(1) + 1));
        for i in 0..n {
            let prev = self.points[(i + n - 1) % n];
            let cur = self.points[i];
            let next = self.points[(i + 1) % n];
            let len_in = cur.distance(prev);
            let len_out = cur.distance(next);
            let r = radius.min(CORNER_LIMIT * len_in.min(len_out));
            if r <= EPSILON {
                out.push(cur);
                continue;
            }
            let a = cur + (prev - cur) / len_in * r;
            let b = cur + (next - cur) / len_out * r;
            if segments == 0 {
                out.push(a);
                out.push(b);
            } else {
                out.extend(sample_quadratic(a, cur, b, segments));
            }
        }
        Polygon::from_points(out).unwrap_or_else(|| self.clone())
    }

    // ── Triangulation ─────────────────────────────────────────────────────

    /// Fan triangulation from vertex 0 as index triples.
    pub fn triangulate(&self) -> Vec<[usize; 3]> {
        (1..self.points.len() - 1).map(|i| [0, i, i + 1]).collect()
    }
}
