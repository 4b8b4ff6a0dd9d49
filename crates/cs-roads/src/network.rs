//! Frozen road network.
//!
//! # Data layout
//!
//! Segments incident to node `n` are stored in **CSR** form:
//!
//! ```text
//! node_segs[ node_seg_start[n] .. node_seg_start[n+1] ]
//! ```
//!
//! Each undirected segment appears once in the list of each of its two
//! nodes.  Within a node the list is in segment order.

use glam::Vec2;

/// An undirected segment between two network nodes.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct NetworkSegment {
    pub from:  usize,
    pub to:    usize,
    pub width: f32,
    pub lanes: u8,
}

impl NetworkSegment {
    /// The endpoint opposite `node`.
    #[inline]
    pub fn other(&self, node: usize) -> usize {
        if self.from == node { self.to } else { self.from }
    }
}

/// Resolved, immutable road network.  Build with
/// [`RoadNetworkBuilder`](crate::RoadNetworkBuilder).
#[derive(Clone, Debug, Default)]
pub struct RoadNetwork {
    /// Position of each node.
    pub node_pos: Vec<Vec2>,

    pub segments: Vec<NetworkSegment>,

    /// CSR row pointer; length = `node_count + 1`.
    pub node_seg_start: Vec<u32>,

    /// Incident segment indices, grouped by node.
    pub node_segs: Vec<u32>,
}

impl RoadNetwork {
    pub(crate) fn from_parts(node_pos: Vec<Vec2>, segments: Vec<NetworkSegment>) -> Self {
        let node_count = node_pos.len();

        let mut node_seg_start = vec![0u32; node_count + 1];
        for s in &segments {
            node_seg_start[s.from + 1] += 1;
            node_seg_start[s.to + 1] += 1;
        }
        for i in 1..=node_count {
            node_seg_start[i] += node_seg_start[i - 1];
        }

        let mut cursor: Vec<u32> = node_seg_start[..node_count].to_vec();
        let mut node_segs = vec![0u32; node_seg_start[node_count] as usize];
        for (i, s) in segments.iter().enumerate() {
            for n in [s.from, s.to] {
                node_segs[cursor[n] as usize] = i as u32;
                cursor[n] += 1;
            }
        }
        debug_assert_eq!(node_segs.len(), segments.len() * 2);

        Self { node_pos, segments, node_seg_start, node_segs }
    }

    pub fn node_count(&self) -> usize {
        self.node_pos.len()
    }

    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.node_pos.is_empty()
    }

    /// Indices of the segments touching `node`.
    #[inline]
    pub fn incident(&self, node: usize) -> impl Iterator<Item = usize> + '_ {
        let start = self.node_seg_start[node] as usize;
        let end   = self.node_seg_start[node + 1] as usize;
        self.node_segs[start..end].iter().map(|&s| s as usize)
    }

    #[inline]
    pub fn degree(&self, node: usize) -> usize {
        (self.node_seg_start[node + 1] - self.node_seg_start[node]) as usize
    }

    pub fn segment_length(&self, seg: usize) -> f32 {
        let s = &self.segments[seg];
        self.node_pos[s.from].distance(self.node_pos[s.to])
    }

    /// Unit direction of `seg` pointing away from `node`.
    pub fn direction_from(&self, seg: usize, node: usize) -> Vec2 {
        let s = &self.segments[seg];
        (self.node_pos[s.other(node)] - self.node_pos[node]).normalize_or_zero()
    }

    /// Total road length.
    pub fn total_length(&self) -> f32 {
        (0..self.segments.len()).map(|i| self.segment_length(i)).sum()
    }
}
