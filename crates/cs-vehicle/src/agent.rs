//! The vehicle state machine.

use glam::{Vec2, Vec3};

use cs_core::{AgentId, AgentRng, CityResult, LaneId, TrafficConfig};
use cs_traffic::{SignalState, TrafficGraph, path_remaining};

use crate::state::{AgentTransform, DespawnReason, DriveState, HoldReason, Track, UpdateOutcome};
use crate::view::{AgentView, BlockingZones, TrafficSnapshot};

#[derive(Clone, Debug)]
pub struct VehicleAgent {
    pub id: AgentId,
    pub position: Vec3,
    /// Unit heading.
    pub forward: Vec3,
    pub speed: f32,
    pub max_speed: f32,
    pub track: Track,
    /// Waypoints of the current lane or curve.
    pub path: Vec<Vec3>,
    /// Index into `path` of the waypoint being driven to.
    pub target_index: usize,
    pub alive: bool,
    pub state: DriveState,
    pub reckless: bool,
    pub manual_brake: bool,
    pub radius: f32,
    rng: AgentRng,
    /// Red-run decision for the current lane approach, made on first sight
    /// of a red.
    red_run: Option<bool>,
    /// Seconds of intended but absent motion.
    stalled_secs: f32,
    stuck_reported: bool,
}

impl VehicleAgent {
    /// Place a new vehicle at the start of `lane` and register it there.
    ///
    /// The reckless flag and top speed are drawn from the vehicle's own RNG,
    /// seeded from `seed` and `id`.
    pub fn spawn_on_lane(
        id: AgentId,
        lane: LaneId,
        graph: &mut TrafficGraph,
        config: &TrafficConfig,
        seed: u64,
    ) -> CityResult<Self> {
        let l = graph.try_lane(lane)?;
        let path = l.waypoints.clone();
        let forward = l.direction().extend(0.0);
        let mut rng = AgentRng::new(seed, id);
        let reckless = rng.gen_bool(config.reckless_probability);
        let max_speed = rng.gen_range(config.min_speed..=config.max_speed);
        graph.register(lane, id)?;
        Ok(Self {
            id,
            position: path.first().copied().unwrap_or(Vec3::ZERO),
            forward,
            speed: 0.0,
            max_speed,
            track: Track::Lane(lane),
            path,
            target_index: 1,
            alive: true,
            state: DriveState::Driving,
            reckless,
            manual_brake: false,
            radius: config.vehicle_radius,
            rng,
            red_run: None,
            stalled_secs: 0.0,
            stuck_reported: false,
        })
    }

    #[inline]
    pub fn position_2d(&self) -> Vec2 {
        self.position.truncate()
    }

    pub fn is_crashed(&self) -> bool {
        self.state == DriveState::Crashed
    }

    /// Distance left on the current lane or curve.
    pub fn remaining(&self) -> f32 {
        path_remaining(&self.path, self.target_index, self.position)
    }

    pub fn view(&self) -> AgentView {
        AgentView {
            id: self.id,
            position: self.position,
            track: self.track,
            target_index: self.target_index,
            to_target: self.path.get(self.target_index).map_or(0.0, |t| t.distance(self.position)),
            state: self.state,
            radius: self.radius,
        }
    }

    pub fn transform(&self) -> AgentTransform {
        AgentTransform {
            position: self.position,
            yaw: self.forward.y.atan2(self.forward.x),
            scale: self.radius * 2.0,
        }
    }

    /// Mark crashed and leave the lane registry.  Idempotent.
    pub fn crash(&mut self, graph: &mut TrafficGraph) -> CityResult<()> {
        if self.state == DriveState::Crashed {
            return Ok(());
        }
        self.state = DriveState::Crashed;
        self.speed = 0.0;
        if let Track::Lane(l) = self.track {
            graph.deregister(l, self.id)?;
        }
        Ok(())
    }

    // ── Update ────────────────────────────────────────────────────────────

    /// Advance one tick: check holds, move, and switch lane/curve at the end
    /// of the path.
    pub fn update<Z: BlockingZones>(
        &mut self,
        dt: f32,
        graph: &mut TrafficGraph,
        zones: &Z,
        snapshot: &TrafficSnapshot,
        config: &TrafficConfig,
    ) -> CityResult<UpdateOutcome> {
        if !self.alive || self.state == DriveState::Crashed {
            return Ok(UpdateOutcome::Held(HoldReason::Crashed));
        }

        if self.manual_brake {
            return Ok(self.hold(HoldReason::Brake));
        }
        if !self.reckless {
            if let Some(cluster) = zones.covering(self.position_2d()) {
                self.crash(graph)?;
                return Ok(UpdateOutcome::JoinCluster(cluster));
            }
            if self.blocked_by_traffic(snapshot, config) {
                return Ok(self.hold(HoldReason::Traffic));
            }
        }
        let mut boost = 1.0;
        match self.signal_ahead(graph, config) {
            SignalState::Red => {
                let runs = self.reckless && *self.red_run.get_or_insert_with(|| {
                    self.rng.gen_bool(config.red_run_probability)
                });
                if !runs {
                    return Ok(self.hold(HoldReason::Signal));
                }
            }
            SignalState::Yellow if !self.reckless => return Ok(self.hold(HoldReason::Signal)),
            SignalState::Yellow => boost = config.reckless_yellow_boost,
            SignalState::Green => {}
        }

        let top = self.max_speed * boost;
        self.speed = (self.speed + config.acceleration * dt).min(top);
        let before = self.position;
        self.advance_along_path(self.speed * dt);

        if self.target_index >= self.path.len() {
            if let Some(outcome) = self.end_of_path(graph)? {
                return Ok(outcome);
            }
        }

        Ok(self.track_progress(before, dt, config))
    }

    fn hold(&mut self, reason: HoldReason) -> UpdateOutcome {
        self.speed = 0.0;
        self.stalled_secs = 0.0;
        UpdateOutcome::Held(reason)
    }

    /// A lane peer strictly ahead inside the safety distance.
    fn blocked_by_traffic(&self, snapshot: &TrafficSnapshot, config: &TrafficConfig) -> bool {
        let Track::Lane(lane) = self.track else { return false };
        let me = self.view();
        snapshot.on_lane(lane).any(|other| {
            other.id != self.id
                && other.is_ahead_of(&me)
                && other.position.distance(self.position) < config.safety_distance
        })
    }

    /// Signal at the lane end when inside the stop distance, else GREEN.
    fn signal_ahead(&self, graph: &TrafficGraph, config: &TrafficConfig) -> SignalState {
        let Track::Lane(lane) = self.track else { return SignalState::Green };
        if self.remaining() > config.stop_distance {
            return SignalState::Green;
        }
        graph.get_signal(lane)
    }

    /// Move `step` along the path, snapping to each waypoint reached.
    fn advance_along_path(&mut self, mut step: f32) {
        while step > 0.0 {
            let Some(&target) = self.path.get(self.target_index) else { break };
            let to = target - self.position;
            let dist = to.length();
            if dist > f32::EPSILON {
                self.forward = to / dist;
            }
            if dist <= step {
                self.position = target;
                self.target_index += 1;
                step -= dist;
            } else {
                self.position += self.forward * step;
                step = 0.0;
            }
        }
    }

    /// Switch onto the next lane or curve.  Returns an outcome only when the
    /// vehicle leaves the simulation.
    fn end_of_path(&mut self, graph: &mut TrafficGraph) -> CityResult<Option<UpdateOutcome>> {
        match self.track {
            Track::Curve { to, .. } => {
                let path = graph.try_lane(to)?.waypoints.clone();
                graph.register(to, self.id)?;
                self.enter(Track::Lane(to), path);
            }
            Track::Lane(lane) => {
                let exits: Vec<(LaneId, Vec<Vec3>)> = graph
                    .curves_from(lane)
                    .into_iter()
                    .map(|(to, pts)| (to, pts.to_vec()))
                    .collect();
                graph.deregister(lane, self.id)?;
                let Some((to, curve)) = self.rng.choose(&exits).cloned() else {
                    tracing::warn!(agent = %self.id, %lane, "dead end; despawning");
                    self.alive = false;
                    return Ok(Some(UpdateOutcome::Despawned(DespawnReason::DeadEnd)));
                };
                self.enter(Track::Curve { from: lane, to }, curve);
            }
        }
        Ok(None)
    }

    fn enter(&mut self, track: Track, path: Vec<Vec3>) {
        self.track = track;
        self.path = path;
        self.target_index = 1;
        self.red_run = None;
    }

    /// Stall bookkeeping for a tick in which motion was intended.
    fn track_progress(&mut self, before: Vec3, dt: f32, config: &TrafficConfig) -> UpdateOutcome {
        if self.position.distance(before) > config.stuck_epsilon {
            self.stalled_secs = 0.0;
            self.stuck_reported = false;
            return UpdateOutcome::Moved;
        }
        self.stalled_secs += dt;
        if self.stalled_secs > config.stuck_secs && !self.stuck_reported {
            self.stuck_reported = true;
            tracing::warn!(agent = %self.id, pos = ?self.position, "vehicle stuck");
            return UpdateOutcome::Stuck;
        }
        UpdateOutcome::Moved
    }
}
