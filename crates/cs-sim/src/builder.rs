//! Fluent builder for constructing a [`Simulation`].

use cs_core::{SimConfig, SimRng};
use cs_roads::RoadNetwork;

use crate::world::World;
use crate::{SimError, SimResult, Simulation};

/// Fluent builder for [`Simulation`].
///
/// # Required inputs
///
/// - [`SimConfig`]: seed, tick length, layout/graph/traffic/collision tuning
///
/// # Optional inputs (have defaults)
///
/// | Method                | Default                                      |
/// |-----------------------|----------------------------------------------|
/// | `.network(n)`         | Procedural city generated from `config`      |
/// | `.frame_interval(n)`  | `1` (a frame every tick; `0` disables)       |
///
/// # Example
///
/// ```rust,ignore
/// let mut sim = SimBuilder::new(SimConfig { seed: 7, total_ticks: 3_600, ..SimConfig::default() })
///     .frame_interval(10)
///     .build()?;
/// sim.run(&mut NoopObserver)?;
/// ```
pub struct SimBuilder {
    config:         SimConfig,
    network:        Option<RoadNetwork>,
    frame_interval: u64,
}

impl SimBuilder {
    pub fn new(config: SimConfig) -> Self {
        Self { config, network: None, frame_interval: 1 }
    }

    /// Drive on a hand-built road network instead of a generated city.
    pub fn network(mut self, network: RoadNetwork) -> Self {
        self.network = Some(network);
        self
    }

    /// Emit [`SimObserver::on_frame`](crate::SimObserver::on_frame) every
    /// `n` ticks.
    pub fn frame_interval(mut self, n: u64) -> Self {
        self.frame_interval = n;
        self
    }

    /// Validate the configuration, build the world, and return a
    /// ready-to-run [`Simulation`].
    pub fn build(self) -> SimResult<Simulation> {
        self.config.validate().map_err(SimError::from_validation)?;

        let mut rng = SimRng::new(self.config.seed);
        let world = match self.network {
            Some(network) => World::from_network(network, &self.config.graph, &mut rng),
            None => World::generate(&self.config, &mut rng),
        };
        Ok(Simulation::new(self.config, world, rng, self.frame_interval))
    }
}
