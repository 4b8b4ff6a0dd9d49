//! Junction and road surface polygons.
//!
//! Each junction is a polygon whose sides are the mouths of its incident
//! roads; each road is a quad running between the two mouths.  Mouth
//! distances (setbacks) come from the miter corners between angularly
//! adjacent roads, so neighbouring surfaces meet edge to edge.

use glam::Vec2;

use cs_geometry::{Polygon, line_intersection};

use crate::network::RoadNetwork;

/// A mouth never sits further along its road than this share of the length.
const MAX_SETBACK_FRACTION: f32 = 0.45;

/// Drivable surface of a whole network.
#[derive(Clone, Debug, Default)]
pub struct RoadMesh {
    /// One entry per node; `None` where no polygon could be formed.
    pub junctions: Vec<Option<Polygon>>,
    /// One entry per segment; `None` only for degenerate segments.
    pub roads: Vec<Option<Polygon>>,
}

impl RoadMesh {
    pub fn build(network: &RoadNetwork) -> Self {
        Self {
            junctions: (0..network.node_count()).map(|n| junction_polygon(network, n)).collect(),
            roads: (0..network.segment_count()).map(|s| road_quad(network, s)).collect(),
        }
    }

    pub fn polygon_count(&self) -> usize {
        self.junctions.iter().flatten().count() + self.roads.iter().flatten().count()
    }
}

/// One incident road, seen from a node.
struct Arm {
    seg:     usize,
    dir:     Vec2,
    half:    f32,
    setback: f32,
}

/// Incident roads sorted counter-clockwise by angle, with setbacks resolved.
fn arms(network: &RoadNetwork, node: usize) -> Vec<Arm> {
    let mut arms: Vec<Arm> = network
        .incident(node)
        .filter_map(|seg| {
            let dir = network.direction_from(seg, node).try_normalize()?;
            let half = network.segments[seg].width * 0.5;
            Some(Arm { seg, dir, half, setback: half })
        })
        .collect();
    arms.sort_by(|a, b| a.dir.y.atan2(a.dir.x).total_cmp(&b.dir.y.atan2(b.dir.x)));

    let centre = network.node_pos[node];
    let n = arms.len();
    if n >= 2 {
        for i in 0..n {
            let j = (i + 1) % n;
            // Left kerb of arm i meets right kerb of the next arm.
            let left_i = centre + arms[i].dir.perp() * arms[i].half;
            let right_j = centre - arms[j].dir.perp() * arms[j].half;
            if let Some(corner) = line_intersection(left_i, arms[i].dir, right_j, arms[j].dir) {
                let off = corner - centre;
                arms[i].setback = arms[i].setback.max(off.dot(arms[i].dir));
                arms[j].setback = arms[j].setback.max(off.dot(arms[j].dir));
            }
        }
    }
    for arm in &mut arms {
        let limit = network.segment_length(arm.seg) * MAX_SETBACK_FRACTION;
        arm.setback = arm.setback.min(limit);
    }
    arms
}

/// Distance from `node` at which `seg` leaves the junction surface.
pub fn setback(network: &RoadNetwork, node: usize, seg: usize) -> f32 {
    arms(network, node)
        .into_iter()
        .find(|a| a.seg == seg)
        .map_or(0.0, |a| a.setback)
}

/// Counter-clockwise junction polygon for `node`.
///
/// Dead ends get a square cap behind the node.  Returns `None` for isolated
/// nodes or when the ring degenerates.
pub fn junction_polygon(network: &RoadNetwork, node: usize) -> Option<Polygon> {
    let arms = arms(network, node);
    if arms.is_empty() {
        return None;
    }
    let centre = network.node_pos[node];
    let mut ring = Vec::with_capacity(arms.len() * 2 + 2);
    for arm in &arms {
        let mouth = centre + arm.dir * arm.setback;
        let side = arm.dir.perp() * arm.half;
        ring.push(mouth - side);
        ring.push(mouth + side);
    }
    if let [arm] = arms.as_slice() {
        let back = centre - arm.dir * arm.half;
        let side = arm.dir.perp() * arm.half;
        ring.push(back + side);
        ring.push(back - side);
    }

    let mut poly = Polygon::from_points(ring)?;
    if poly.signed_area() < 0.0 {
        let mut pts = poly.into_points();
        pts.reverse();
        poly = Polygon::from_points(pts)?;
    }
    (poly.area() > f32::EPSILON).then_some(poly)
}

/// Counter-clockwise quad covering `seg` between its two junction mouths.
///
/// Mouths are capped at [`MAX_SETBACK_FRACTION`] of the length, so every
/// non-degenerate segment keeps a strip of road between them.
pub fn road_quad(network: &RoadNetwork, seg: usize) -> Option<Polygon> {
    let s = network.segments[seg];
    let a = network.node_pos[s.from];
    let b = network.node_pos[s.to];
    let len = a.distance(b);
    if len <= f32::EPSILON {
        return None;
    }
    let d_from = setback(network, s.from, seg);
    let d_to = setback(network, s.to, seg);
    let dir = (b - a) / len;
    let side = dir.perp() * (s.width * 0.5);
    let start = a + dir * d_from;
    let end = b - dir * d_to;
    Polygon::from_points(vec![start - side, end - side, end + side, start + side])
}
