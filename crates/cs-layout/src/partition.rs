//! Binary space partition of a convex polygon.
//!
//! Each step picks a cut near the bounding-box centre, applies
//! [`Polygon::split`], reports the cut chord to the caller, and recurses on
//! both halves.  A leaf is emitted when the polygon is small enough, the
//! depth cap is reached, or no cut can be made.

use glam::Vec2;

use cs_core::{LayoutConfig, SimRng};
use cs_geometry::Polygon;

/// Jitter of the cut point, as a share of the bounding-box half-extent.
const JITTER: f32 = 0.4;

/// Boxes whose sides differ by less than this share are treated as square.
const SQUARE_TOLERANCE: f32 = 0.1;

/// Bisection steps when re-centring an unbalanced cut.
const BISECT_STEPS: usize = 40;

/// Stop conditions and cut policy for one partition run.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PartitionLimits {
    pub min_area: f32,
    pub max_depth: u32,
    pub ortho_chance: f64,
    pub max_split_fraction: f32,
}

impl PartitionLimits {
    /// City blocks: cuts become roads.
    pub fn blocks(cfg: &LayoutConfig) -> Self {
        Self {
            min_area:           cfg.min_block_area,
            max_depth:          cfg.max_depth,
            ortho_chance:       cfg.ortho_chance,
            max_split_fraction: cfg.max_split_fraction,
        }
    }

    /// Building footprints within one lot.
    pub fn lots(cfg: &LayoutConfig) -> Self {
        Self {
            min_area:           cfg.min_lot_area,
            max_depth:          cfg.max_lot_depth,
            ortho_chance:       cfg.ortho_chance,
            max_split_fraction: cfg.max_split_fraction,
        }
    }
}

/// A polygon the partition did not split further.
#[derive(Clone, Debug, PartialEq)]
pub struct Leaf {
    pub polygon: Polygon,
    pub depth: u32,
}

/// Partition `root`, calling `on_cut(depth, a, b)` with the chord of every
/// successful cut.  Leaves are returned in depth-first order, positive side
/// of each cut first.
pub fn partition<F>(root: Polygon, limits: &PartitionLimits, rng: &mut SimRng, mut on_cut: F) -> Vec<Leaf>
where
    F: FnMut(u32, Vec2, Vec2),
{
    let mut leaves = Vec::new();
    recurse(root, 0, limits, rng, &mut on_cut, &mut leaves);
    leaves
}

fn recurse<F>(
    poly: Polygon,
    depth: u32,
    limits: &PartitionLimits,
    rng: &mut SimRng,
    on_cut: &mut F,
    leaves: &mut Vec<Leaf>,
) where
    F: FnMut(u32, Vec2, Vec2),
{
    if poly.area() < limits.min_area || depth >= limits.max_depth {
        leaves.push(Leaf { polygon: poly, depth });
        return;
    }

    let (point, dir) = choose_cut(&poly, limits, rng);
    let Some((point, left, right)) = balanced_split(&poly, point, dir, limits.max_split_fraction) else {
        tracing::debug!(depth, area = poly.area(), "no usable cut; keeping polygon as a leaf");
        leaves.push(Leaf { polygon: poly, depth });
        return;
    };

    if let Some((a, b)) = chord(&poly, point, dir) {
        on_cut(depth, a, b);
    }
    recurse(left, depth + 1, limits, rng, on_cut, leaves);
    recurse(right, depth + 1, limits, rng, on_cut, leaves);
}

/// Jittered point near the bounding-box centre plus a cut direction.
fn choose_cut(poly: &Polygon, limits: &PartitionLimits, rng: &mut SimRng) -> (Vec2, Vec2) {
    let (lo, hi) = poly.bounds();
    let size = hi - lo;
    let half = size * 0.5;
    let jitter = Vec2::new(
        rng.gen_range(-JITTER..=JITTER) * half.x,
        rng.gen_range(-JITTER..=JITTER) * half.y,
    );
    let point = lo + half + jitter;

    let dir = if rng.gen_bool(limits.ortho_chance) {
        let near_square = (size.x - size.y).abs() <= SQUARE_TOLERANCE * size.x.max(size.y);
        let cut_across_x = if near_square { rng.gen_bool(0.5) } else { size.x > size.y };
        // Cutting across the x extent means a vertical line.
        if cut_across_x { Vec2::Y } else { Vec2::X }
    } else {
        let angle = rng.gen_range(0.0..std::f32::consts::PI);
        Vec2::new(angle.cos(), angle.sin())
    };
    (point, dir)
}

/// Split along `dir` through `point`, sliding the line along its normal to
/// halve the area when the first attempt misses or leaves either side with
/// more than `max_fraction` of the parent.
fn balanced_split(
    poly: &Polygon,
    point: Vec2,
    dir: Vec2,
    max_fraction: f32,
) -> Option<(Vec2, Polygon, Polygon)> {
    let area = poly.area();
    if let Some((l, r)) = poly.split(point, dir) {
        if l.area().max(r.area()) <= area * max_fraction {
            return Some((point, l, r));
        }
    }

    let normal = dir.try_normalize()?.perp();
    let (mut lo, mut hi) = poly
        .points()
        .iter()
        .map(|&p| (p - point).dot(normal))
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), d| (lo.min(d), hi.max(d)));
    let half_area = area * 0.5;
    for _ in 0..BISECT_STEPS {
        let mid = 0.5 * (lo + hi);
        match poly.split(point + normal * mid, dir) {
            // Positive side shrinks as the line moves along the normal.
            Some((l, _)) if l.area() > half_area => lo = mid,
            Some(_) => hi = mid,
            None => break,
        }
    }
    let centred = point + normal * (0.5 * (lo + hi));
    let (l, r) = poly.split(centred, dir)?;
    Some((centred, l, r))
}

/// The longest chord of the cut line across `poly`.
fn chord(poly: &Polygon, point: Vec2, dir: Vec2) -> Option<(Vec2, Vec2)> {
    let hits = poly.intersect_line(point, dir);
    let mut best: Option<(Vec2, Vec2)> = None;
    for (i, &a) in hits.iter().enumerate() {
        for &b in &hits[i + 1..] {
            if best.is_none_or(|(p, q)| a.distance_squared(b) > p.distance_squared(q)) {
                best = Some((a, b));
            }
        }
    }
    best
}
