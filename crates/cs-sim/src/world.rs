//! The static part of a run: city layout, road mesh, and traffic graph.

use cs_core::{GraphConfig, SimConfig, SimRng};
use cs_layout::CityLayout;
use cs_roads::{RoadMesh, RoadNetwork};
use cs_traffic::TrafficGraph;

/// Child-RNG offsets.  Each generation phase draws from its own stream.
pub(crate) const LAYOUT_STREAM: u64 = 1;
pub(crate) const GRAPH_STREAM: u64 = 2;
pub(crate) const SPAWN_STREAM: u64 = 3;

/// Generated city plus the lane graph vehicles drive on.
///
/// Rebuilt wholesale on regeneration; nothing in it outlives one world.
pub struct World {
    pub layout: CityLayout,
    pub mesh:   RoadMesh,
    pub graph:  TrafficGraph,
}

impl World {
    /// Generate a procedural city from `config`.
    pub fn generate(config: &SimConfig, rng: &mut SimRng) -> Self {
        let layout = CityLayout::generate(&config.layout, &config.roads, &mut rng.child(LAYOUT_STREAM));
        let world = Self::assemble(layout, &config.graph, rng);
        tracing::info!(
            blocks     = world.layout.blocks.len(),
            lots       = world.layout.lots.len(),
            footprints = world.layout.footprints.len(),
            polygons   = world.mesh.polygon_count(),
            lanes      = world.graph.lane_count(),
            "world generated"
        );
        world
    }

    /// Wrap a hand-built road network; the layout carries no blocks or lots.
    pub fn from_network(network: RoadNetwork, config: &GraphConfig, rng: &mut SimRng) -> Self {
        let layout = CityLayout { roads: network, ..CityLayout::default() };
        Self::assemble(layout, config, rng)
    }

    fn assemble(layout: CityLayout, config: &GraphConfig, rng: &mut SimRng) -> Self {
        let mesh = RoadMesh::build(&layout.roads);
        let graph = TrafficGraph::build(&layout.roads, config, &mut rng.child(GRAPH_STREAM));
        Self { layout, mesh, graph }
    }
}
