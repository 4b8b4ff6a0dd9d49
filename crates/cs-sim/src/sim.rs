//! The `Simulation` struct and its tick loop.

use std::collections::BTreeMap;

use glam::Vec2;

use cs_collision::{ClusterRegistry, SpatialGrid, detect_collisions};
use cs_core::{AgentId, CityError, ClusterId, IdAllocator, LaneId, SimClock, SimConfig, SimRng, Tick};
use cs_vehicle::{BlockingZones, HoldReason, TrafficSnapshot, UpdateOutcome, VehicleAgent};

use crate::observer::{FrameView, SimObserver, TickStats, WreckTransform};
use crate::world::{SPAWN_STREAM, World};
use crate::{SimError, SimResult};

/// Spawn attempts per missing vehicle before giving up for the tick.
const SPAWN_ATTEMPTS_PER_SLOT: usize = 4;

// ── Simulation ────────────────────────────────────────────────────────────────

/// The main simulation runner.
///
/// Each tick runs five phases in a fixed order:
///
/// 1. **Signals**: every junction controller advances by `dt`.
/// 2. **Population**: vehicles that left at a dead end are dropped, then new
///    ones spawn at the start of clear lanes until the target is met.
/// 3. **Vehicles**: every vehicle updates in ascending `AgentId` order
///    against one snapshot taken before the first update.  Cluster joins
///    are applied after the last update.
/// 4. **Collisions**: overlapping driving pairs crash and merge into the
///    nearest wreck cluster.
/// 5. **Wreck sync**: wreck transforms are refreshed from cluster members.
///
/// Create via [`SimBuilder`][crate::SimBuilder].
pub struct Simulation {
    /// Global configuration (seed, tick length, sub-system tuning).
    pub config: SimConfig,

    /// Simulation clock.  Its `tick_secs` is the `dt` handed to every system.
    pub clock: SimClock,

    /// Layout, mesh, and traffic graph of the current city.
    pub world: World,

    agents:         BTreeMap<AgentId, VehicleAgent>,
    agent_ids:      IdAllocator<AgentId>,
    clusters:       ClusterRegistry,
    grid:           SpatialGrid,
    spawn_rng:      SimRng,
    wrecks:         Vec<WreckTransform>,
    last_stats:     TickStats,
    frame_interval: u64,
}

impl Simulation {
    /// Assemble a fresh run around `world`.  `rng` is the master stream the
    /// world was generated from.
    pub(crate) fn new(config: SimConfig, world: World, mut rng: SimRng, frame_interval: u64) -> Self {
        Self {
            clock:          SimClock::new(config.dt()),
            clusters:       ClusterRegistry::new(config.collision.clone()),
            grid:           SpatialGrid::new(config.collision.cell_size),
            spawn_rng:      rng.child(SPAWN_STREAM),
            config,
            world,
            agents:         BTreeMap::new(),
            agent_ids:      IdAllocator::new(),
            wrecks:         Vec::new(),
            last_stats:     TickStats::default(),
            frame_interval,
        }
    }

    // ── Queries ───────────────────────────────────────────────────────────

    /// Vehicles in ascending id order, including crashed ones.  Vehicles
    /// that despawned this tick are already excluded.
    pub fn agents(&self) -> impl Iterator<Item = &VehicleAgent> + '_ {
        self.agents.values().filter(|a| a.alive)
    }

    pub fn agent(&self, id: AgentId) -> Option<&VehicleAgent> {
        self.agents.get(&id).filter(|a| a.alive)
    }

    /// Same count as [`TickStats::agents`] of the last tick.
    pub fn agent_count(&self) -> usize {
        self.agents().count()
    }

    pub fn clusters(&self) -> &ClusterRegistry {
        &self.clusters
    }

    /// Counters of the most recent tick.
    pub fn last_stats(&self) -> &TickStats {
        &self.last_stats
    }

    /// Transforms of the current population and wrecks.
    pub fn frame(&self) -> FrameView {
        FrameView {
            tick:   self.last_stats.tick,
            agents: self
                .agents
                .values()
                .filter(|a| a.alive && !a.is_crashed())
                .map(|a| (a.id, a.transform()))
                .collect(),
            wrecks: self.wrecks.clone(),
        }
    }

    // ── Public API ────────────────────────────────────────────────────────

    /// Run the simulation from the current tick to `config.total_ticks`.
    ///
    /// Calls observer hooks at every tick boundary.  Use
    /// [`NoopObserver`][crate::NoopObserver] if you don't need callbacks.
    pub fn run<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<()> {
        let end = Tick(self.config.total_ticks);
        while self.clock.current_tick < end {
            self.observed_step(observer)?;
        }
        observer.on_sim_end(self.clock.current_tick);
        tracing::info!(
            ticks    = self.clock.current_tick.0,
            agents   = self.agent_count(),
            clusters = self.clusters.len(),
            "run complete"
        );
        Ok(())
    }

    /// Run exactly `n` ticks from the current position (ignores
    /// `total_ticks`).
    ///
    /// Useful for tests and incremental stepping.
    pub fn run_ticks<O: SimObserver>(&mut self, n: u64, observer: &mut O) -> SimResult<()> {
        for _ in 0..n {
            self.observed_step(observer)?;
        }
        Ok(())
    }

    /// Execute one tick and advance the clock.
    pub fn step(&mut self) -> SimResult<TickStats> {
        let dt = self.clock.tick_secs;
        let mut stats = TickStats { tick: self.clock.current_tick, ..TickStats::default() };

        // ── Phase 1: signals ──────────────────────────────────────────────
        self.world.graph.advance_signals(dt);

        // ── Phase 2: population ───────────────────────────────────────────
        self.agents.retain(|_, a| a.alive);
        stats.spawned = self.spawn_to_target()?;

        // ── Phase 3: vehicles ─────────────────────────────────────────────
        self.update_vehicles(dt, &mut stats)?;

        // ── Phase 4: collisions ───────────────────────────────────────────
        stats.collisions = self.resolve_collisions()?;

        // ── Phase 5: wreck sync ───────────────────────────────────────────
        self.sync_wrecks();

        let live = self.agents.values().filter(|a| a.alive);
        for a in live {
            stats.agents += 1;
            if a.is_crashed() {
                stats.crashed += 1;
            } else {
                stats.driving += 1;
            }
        }
        stats.clusters = self.clusters.len();

        self.last_stats = stats;
        self.clock.advance();
        Ok(stats)
    }

    /// Place a new vehicle at the start of `lane`.
    pub fn spawn_at(&mut self, lane: LaneId) -> SimResult<AgentId> {
        let id = self.agent_ids.peek();
        let agent = VehicleAgent::spawn_on_lane(
            id,
            lane,
            &mut self.world.graph,
            &self.config.traffic,
            self.config.seed,
        )?;
        self.agent_ids.next_id();
        self.agents.insert(id, agent);
        Ok(id)
    }

    /// Engage or release a vehicle's manual brake.
    pub fn set_brake(&mut self, agent: AgentId, engaged: bool) -> SimResult<()> {
        let a = self.agents.get_mut(&agent).ok_or(CityError::AgentNotFound(agent))?;
        a.manual_brake = engaged;
        Ok(())
    }

    /// Remove a wreck cluster and its vehicles from the run.  Returns the
    /// removed vehicles, or `None` if `id` is not a live cluster.
    pub fn clear_cluster(&mut self, id: ClusterId) -> Option<Vec<AgentId>> {
        let members = self.clusters.clear_cluster(id)?;
        for agent in &members {
            self.agents.remove(agent);
        }
        self.sync_wrecks();
        tracing::info!(cluster = %id, removed = members.len(), "wreck cleared");
        Some(members)
    }

    /// Throw the current world away and generate a new city from `seed`.
    ///
    /// The new world, population, clusters, and id allocators are built
    /// completely before anything is replaced; on error the current run is
    /// untouched.
    pub fn regenerate(&mut self, seed: u64) -> SimResult<()> {
        let config = SimConfig { seed, ..self.config.clone() };
        config.validate().map_err(SimError::from_validation)?;
        let mut rng = SimRng::new(seed);
        let world = World::generate(&config, &mut rng);
        let fresh = Simulation::new(config, world, rng, self.frame_interval);
        *self = fresh;
        tracing::info!(seed, "world regenerated");
        Ok(())
    }

    // ── Tick phases ───────────────────────────────────────────────────────

    fn observed_step<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<()> {
        let now = self.clock.current_tick;
        observer.on_tick_start(now);
        let stats = self.step()?;
        observer.on_tick_end(&stats);
        if self.frame_interval > 0 && now.0.is_multiple_of(self.frame_interval) {
            observer.on_frame(&self.frame());
        }
        Ok(())
    }

    /// Spawn on random clear lanes until the population target is met or
    /// the attempts run out.  Returns the number spawned.
    fn spawn_to_target(&mut self) -> SimResult<usize> {
        let target = self.config.traffic.target_population;
        let missing = target.saturating_sub(self.agents.len());
        if missing == 0 || self.world.graph.lane_count() == 0 {
            return Ok(0);
        }

        let mut spawned = 0;
        for _ in 0..missing * SPAWN_ATTEMPTS_PER_SLOT {
            if spawned == missing {
                break;
            }
            let Some(lane) = self.spawn_rng.choose(self.world.graph.lanes()).map(|l| l.id) else {
                break;
            };
            if self.lane_start_clear(lane) {
                self.spawn_at(lane)?;
                spawned += 1;
            }
        }
        Ok(spawned)
    }

    /// No vehicle or wreck zone within the spawn clearance of the lane start.
    fn lane_start_clear(&self, lane: LaneId) -> bool {
        let Some(l) = self.world.graph.lane(lane) else { return false };
        let start = l.start();
        let clearance = self.config.traffic.spawn_clearance;
        self.clusters.covering(start.truncate()).is_none()
            && self.agents.values().all(|a| a.position.distance(start) >= clearance)
    }

    fn update_vehicles(&mut self, dt: f32, stats: &mut TickStats) -> SimResult<()> {
        let snapshot = TrafficSnapshot::capture(self.agents.values());
        let mut joins: Vec<(ClusterId, AgentId, Vec2)> = Vec::new();

        for agent in self.agents.values_mut() {
            let outcome = agent.update(
                dt,
                &mut self.world.graph,
                &self.clusters,
                &snapshot,
                &self.config.traffic,
            )?;
            match outcome {
                UpdateOutcome::Moved | UpdateOutcome::Held(HoldReason::Crashed) => {}
                UpdateOutcome::Held(_) => stats.held += 1,
                UpdateOutcome::Stuck => stats.stuck += 1,
                UpdateOutcome::JoinCluster(c) => joins.push((c, agent.id, agent.position_2d())),
                UpdateOutcome::Despawned(_) => stats.despawned += 1,
            }
        }

        for (cluster, agent, pos) in joins {
            if self.clusters.join(cluster, agent, pos) {
                stats.joined += 1;
            }
        }
        Ok(())
    }

    /// Crash every newly overlapping pair.  Returns the pair count.
    fn resolve_collisions(&mut self) -> SimResult<usize> {
        let snapshot = TrafficSnapshot::capture(self.agents.values().filter(|a| a.alive));
        let pairs = detect_collisions(
            &snapshot,
            &self.world.graph,
            &self.clusters,
            &mut self.grid,
            &self.config.collision,
        );
        for &(a, b) in &pairs {
            let pa = self.crash_agent(a)?;
            let pb = self.crash_agent(b)?;
            let cluster = self.clusters.record_crash((a, pa), (b, pb));
            tracing::debug!(%a, %b, %cluster, "collision");
        }
        Ok(pairs.len())
    }

    fn crash_agent(&mut self, id: AgentId) -> SimResult<Vec2> {
        let agent = self.agents.get_mut(&id).ok_or(CityError::AgentNotFound(id))?;
        agent.crash(&mut self.world.graph)?;
        Ok(agent.position_2d())
    }

    fn sync_wrecks(&mut self) {
        self.wrecks.clear();
        for cluster in self.clusters.iter() {
            for &member in &cluster.members {
                if let Some(agent) = self.agents.get(&member) {
                    self.wrecks.push(WreckTransform {
                        cluster:   cluster.id,
                        agent:     member,
                        transform: agent.transform(),
                    });
                }
            }
        }
    }
}
