//! Incremental segment resolver.
//!
//! # Resolution order
//!
//! Every incoming segment is snapped and then checked against the current
//! set, in this order, recursing on the pieces:
//!
//! | Case       | Condition                                        | Action                                  |
//! |------------|--------------------------------------------------|-----------------------------------------|
//! | end-on-new | an existing endpoint lies inside the new one     | split the new segment there             |
//! | new-on-seg | a new endpoint lies within tolerance of an existing interior | move it onto the line, split there, retry |
//! | crossing   | a hit further than tolerance from all four ends  | split both at the hit                   |
//! | append     | none of the above                                | skip if duplicate, else append          |
//!
//! Splits land on the existing line (the projection or the exact hit), so an
//! existing road never bends when it gains a node.  Pieces shorter than
//! `min_segment_length` left over by an overshoot are discarded.
//!
//! Nodes are keyed by their position rounded to `snap_tolerance`; a lookup
//! probes the 3×3 neighbourhood of keys so points that round to adjacent
//! keys but lie within tolerance still merge.

use glam::Vec2;
use rustc_hash::FxHashMap;

use cs_core::RoadConfig;
use cs_geometry::{project_onto_segment, segment_intersection};

use crate::network::{NetworkSegment, RoadNetwork};
use crate::segment::RoadSegment;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
struct SnapKey(i64, i64);

/// Ingests road segments one at a time, keeping the set free of undetected
/// crossings, then freezes into a [`RoadNetwork`].
pub struct RoadNetworkBuilder {
    config:     RoadConfig,
    segments:   Vec<RoadSegment>,
    /// Canonical position of every node, in registration order.
    nodes:      Vec<Vec2>,
    node_index: FxHashMap<SnapKey, usize>,
    /// Undirected neighbour lists, indexed like `nodes`.
    adjacency:  Vec<Vec<usize>>,
}

impl RoadNetworkBuilder {
    pub fn new(config: RoadConfig) -> Self {
        Self {
            config,
            segments:   Vec::new(),
            nodes:      Vec::new(),
            node_index: FxHashMap::default(),
            adjacency:  Vec::new(),
        }
    }

    pub fn config(&self) -> &RoadConfig {
        &self.config
    }

    pub fn segments(&self) -> &[RoadSegment] {
        &self.segments
    }

    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Index of the node within snap tolerance of `p`, if any.
    pub fn node_at(&self, p: Vec2) -> Option<usize> {
        self.lookup(p)
    }

    /// Number of distinct neighbours of the node at `p` (0 if none).
    pub fn degree_at(&self, p: Vec2) -> usize {
        self.lookup(p).map_or(0, |n| self.adjacency[n].len())
    }

    /// Add a road from `start` to `end`.
    ///
    /// Returns the number of segments actually appended; zero when the road
    /// is shorter than `min_segment_length` after snapping or duplicates an
    /// existing connection.
    pub fn add_segment(&mut self, start: Vec2, end: Vec2, width: f32, lanes: u8) -> usize {
        self.insert(start, end, width, lanes, 0)
    }

    /// Freeze into a [`RoadNetwork`].
    pub fn build(self) -> RoadNetwork {
        let segments: Vec<NetworkSegment> = self
            .segments
            .iter()
            .filter_map(|s| {
                let from = self.lookup(s.start)?;
                let to = self.lookup(s.end)?;
                Some(NetworkSegment { from, to, width: s.width, lanes: s.lanes })
            })
            .collect();
        debug_assert_eq!(segments.len(), self.segments.len());
        RoadNetwork::from_parts(self.nodes, segments)
    }

    // ── Resolution ────────────────────────────────────────────────────────

    fn insert(&mut self, a: Vec2, b: Vec2, width: f32, lanes: u8, depth: u32) -> usize {
        let a = self.snap(a);
        let b = self.snap(b);
        if a.distance(b) < self.config.min_segment_length {
            tracing::debug!(?a, ?b, "discarding degenerate road segment");
            return 0;
        }
        if depth >= self.config.max_split_depth {
            tracing::warn!(?a, ?b, depth, "split depth cap reached; appending unresolved");
            return self.append(a, b, width, lanes) as usize;
        }
        let tol = self.config.snap_tolerance;

        // An existing endpoint inside the new segment.
        let endpoint_inside = self
            .segments
            .iter()
            .flat_map(|s| [s.start, s.end])
            .find(|&q| on_interior(q, a, b, tol));
        if let Some(q) = endpoint_inside {
            return self.insert(a, q, width, lanes, depth + 1)
                + self.insert(q, b, width, lanes, depth + 1);
        }

        // A new endpoint inside an existing segment.
        let landing = self.segments.iter().enumerate().find_map(|(i, s)| {
            [a, b].into_iter().find(|&p| on_interior(p, s.start, s.end, tol)).map(|p| (i, p))
        });
        if let Some((i, p)) = landing {
            let seg = self.segments[i];
            let on_line = self.existing_or(project_onto_segment(p, seg.start, seg.end).1);
            self.split_existing(i, on_line);
            let (a, b) = if p == a { (on_line, b) } else { (a, on_line) };
            return self.insert(a, b, width, lanes, depth + 1);
        }

        // A proper crossing: the hit is clear of every endpoint involved.
        let crossing = self.segments.iter().enumerate().find_map(|(i, s)| {
            let hit = segment_intersection(a, b, s.start, s.end)?;
            let clear = [a, b, s.start, s.end].iter().all(|e| e.distance(hit.point) > tol);
            clear.then_some((i, hit.point))
        });
        if let Some((i, x)) = crossing {
            let x = self.existing_or(x);
            self.split_existing(i, x);
            return self.insert(a, x, width, lanes, depth + 1)
                + self.insert(x, b, width, lanes, depth + 1);
        }

        self.append(a, b, width, lanes) as usize
    }

    /// Replace segment `i` by its two halves at `p`.
    fn split_existing(&mut self, i: usize, p: Vec2) {
        let seg = self.segments[i];
        let tol = self.config.snap_tolerance;
        if p.distance(seg.start) <= tol || p.distance(seg.end) <= tol {
            return;
        }
        self.unlink(seg.start, seg.end);
        self.segments[i] = RoadSegment { end: p, ..seg };
        self.segments.push(RoadSegment { start: p, ..seg });
        self.link(seg.start, p);
        self.link(p, seg.end);
    }

    /// Append unless the two nodes are already connected.
    fn append(&mut self, a: Vec2, b: Vec2, width: f32, lanes: u8) -> bool {
        let na = self.register(a);
        let nb = self.register(b);
        if na == nb || self.adjacency[na].contains(&nb) {
            return false;
        }
        self.segments.push(RoadSegment::new(self.nodes[na], self.nodes[nb], width, lanes));
        self.adjacency[na].push(nb);
        self.adjacency[nb].push(na);
        true
    }

    fn link(&mut self, a: Vec2, b: Vec2) {
        let na = self.register(a);
        let nb = self.register(b);
        if na != nb && !self.adjacency[na].contains(&nb) {
            self.adjacency[na].push(nb);
            self.adjacency[nb].push(na);
        }
    }

    fn unlink(&mut self, a: Vec2, b: Vec2) {
        if let (Some(na), Some(nb)) = (self.lookup(a), self.lookup(b)) {
            self.adjacency[na].retain(|&n| n != nb);
            self.adjacency[nb].retain(|&n| n != na);
        }
    }

    // ── Snapping ──────────────────────────────────────────────────────────

    fn key(&self, p: Vec2) -> SnapKey {
        let tol = self.config.snap_tolerance;
        SnapKey((p.x / tol).round() as i64, (p.y / tol).round() as i64)
    }

    /// Closest registered node within tolerance, probing neighbouring keys.
    fn lookup(&self, p: Vec2) -> Option<usize> {
        let SnapKey(kx, ky) = self.key(p);
        let tol = self.config.snap_tolerance;
        let mut best: Option<(usize, f32)> = None;
        for dx in -1..=1 {
            for dy in -1..=1 {
                let Some(&n) = self.node_index.get(&SnapKey(kx + dx, ky + dy)) else { continue };
                let d = self.nodes[n].distance(p);
                if d <= tol && best.is_none_or(|(_, bd)| d < bd) {
                    best = Some((n, d));
                }
            }
        }
        best.map(|(n, _)| n)
    }

    /// An existing node within tolerance of `p`, or `p` itself unrounded.
    fn existing_or(&self, p: Vec2) -> Vec2 {
        self.lookup(p).map_or(p, |n| self.nodes[n])
    }

    /// Canonical position for `p`: an existing node within tolerance, or `p`
    /// rounded to the snap grid.
    fn snap(&self, p: Vec2) -> Vec2 {
        match self.lookup(p) {
            Some(n) => self.nodes[n],
            None => {
                let SnapKey(kx, ky) = self.key(p);
                let tol = self.config.snap_tolerance;
                Vec2::new(kx as f32 * tol, ky as f32 * tol)
            }
        }
    }

    fn register(&mut self, p: Vec2) -> usize {
        if let Some(n) = self.lookup(p) {
            return n;
        }
        let key = self.key(p);
        let n = self.nodes.len();
        self.nodes.push(p);
        self.adjacency.push(Vec::new());
        self.node_index.insert(key, n);
        n
    }
}

/// `q` lies on segment `a→b` within `tol` and is not within `tol` of either end.
fn on_interior(q: Vec2, a: Vec2, b: Vec2, tol: f32) -> bool {
    if q.distance(a) <= tol || q.distance(b) <= tol {
        return false;
    }
    let (t, closest) = project_onto_segment(q, a, b);
    t > 0.0 && t < 1.0 && closest.distance(q) <= tol
}
