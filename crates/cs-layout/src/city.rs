//! Whole-city generation: roads, blocks, sidewalks, lots, and footprints.

use cs_core::{LayoutConfig, RoadConfig, SimRng};
use cs_geometry::Polygon;
use cs_roads::{RoadClass, RoadNetwork, RoadNetworkBuilder};

use crate::partition::{PartitionLimits, partition};

/// Everything the layout generator produces for one city.
#[derive(Clone, Debug, Default)]
pub struct CityLayout {
    /// Resolved road network (perimeter ring plus one road per block cut).
    pub roads: RoadNetwork,
    /// Leaf polygons of the block partition.
    pub blocks: Vec<Polygon>,
    /// Curb outline of each block whose first inset survived.
    pub sidewalks: Vec<Polygon>,
    /// Buildable area of each block whose second inset survived.
    pub lots: Vec<Polygon>,
    /// Building footprints, already shrunk by half the building gap.
    pub footprints: Vec<Polygon>,
    /// Deepest block leaf.
    pub max_depth_reached: u32,
}

impl CityLayout {
    /// Generate a city for a `width × depth` footprint centred on the origin.
    pub fn generate(layout: &LayoutConfig, roads: &RoadConfig, rng: &mut SimRng) -> Self {
        let footprint = Polygon::centered_rect(layout.width, layout.depth);
        let mut builder = RoadNetworkBuilder::new(roads.clone());

        if layout.perimeter_roads {
            let ring = RoadClass::Local;
            for (a, b) in footprint.edges() {
                builder.add_segment(a, b, ring.width(), ring.lanes());
            }
        }

        let mut cuts = 0usize;
        let leaves = partition(footprint, &PartitionLimits::blocks(layout), rng, |depth, a, b| {
            let class = RoadClass::for_depth(depth);
            tracing::debug!(depth, %class, ?a, ?b, "block cut");
            builder.add_segment(a, b, class.width(), class.lanes());
            cuts += 1;
        });

        let max_depth_reached = leaves.iter().map(|l| l.depth).max().unwrap_or(0);
        let blocks: Vec<Polygon> = leaves.into_iter().map(|l| l.polygon).collect();

        let mut sidewalks = Vec::with_capacity(blocks.len());
        let mut lots = Vec::with_capacity(blocks.len());
        let mut footprints = Vec::new();
        let lot_limits = PartitionLimits::lots(layout);
        for block in &blocks {
            let Some(curb) = block.inset(layout.curb_inset) else { continue };
            let lot = curb.inset(layout.sidewalk_width);
            sidewalks.push(curb);
            let Some(lot) = lot else { continue };

            for leaf in partition(lot.clone(), &lot_limits, rng, |_, _, _| {}) {
                footprints.extend(shrink(leaf.polygon, layout.building_gap * 0.5));
            }
            lots.push(lot);
        }

        let network = builder.build();
        tracing::info!(
            blocks     = blocks.len(),
            lots       = lots.len(),
            footprints = footprints.len(),
            cuts,
            nodes      = network.node_count(),
            segments   = network.segment_count(),
            max_depth  = max_depth_reached,
            "city layout generated",
        );

        Self { roads: network, blocks, sidewalks, lots, footprints, max_depth_reached }
    }

    /// Total area of all blocks.
    pub fn block_area(&self) -> f32 {
        self.blocks.iter().map(Polygon::area).sum()
    }
}

fn shrink(poly: Polygon, amount: f32) -> Option<Polygon> {
    if amount <= 0.0 { Some(poly) } else { poly.inset(amount) }
}
