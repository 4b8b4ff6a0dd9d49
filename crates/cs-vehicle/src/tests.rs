//! Unit tests for cs-vehicle.
//!
//! Scenarios run on a hand-built plus-shaped junction: four 50-long arms of
//! width 8 meeting at the origin, so every arm lane is 38 long.

#[cfg(test)]
mod helpers {
    use glam::Vec2;

    use cs_core::{AgentId, ClusterId, GraphConfig, LaneId, NodeId, RoadConfig, SimRng, TrafficConfig};
    use cs_roads::RoadNetworkBuilder;
    use cs_traffic::{SignalController, TrafficGraph};

    use crate::{BlockingZones, NoZones, TrafficSnapshot, UpdateOutcome, VehicleAgent};

    pub const DT: f32 = 1.0 / 60.0;

    pub fn plus() -> TrafficGraph {
        let mut b = RoadNetworkBuilder::new(RoadConfig::default());
        b.add_segment(Vec2::new(-50.0, 0.0), Vec2::new(50.0, 0.0), 8.0, 2);
        b.add_segment(Vec2::new(0.0, -50.0), Vec2::new(0.0, 50.0), 8.0, 2);
        TrafficGraph::build(&b.build(), &GraphConfig::default(), &mut SimRng::new(1))
    }

    pub fn cautious() -> TrafficConfig {
        TrafficConfig { reckless_probability: 0.0, ..TrafficConfig::default() }
    }

    pub fn centre(g: &TrafficGraph) -> NodeId {
        g.nodes().iter().find(|n| n.position.length() < 0.2).map(|n| n.id).unwrap()
    }

    /// Eastbound lane arriving at the junction from the west arm.
    pub fn west_approach(g: &TrafficGraph) -> LaneId {
        let c = centre(g);
        g.lanes().iter().find(|l| l.destination == c && l.direction().x > 0.9).map(|l| l.id).unwrap()
    }

    /// Eastbound lane leaving the junction toward the east leaf.
    pub fn east_exit(g: &TrafficGraph) -> LaneId {
        let c = centre(g);
        g.lanes().iter().find(|l| l.origin == c && l.direction().x > 0.9).map(|l| l.id).unwrap()
    }

    /// Replace the junction controller with one whose only phase is `green`,
    /// pinned at GREEN (or YELLOW) for far longer than any test runs.
    pub fn pin_signal(g: &mut TrafficGraph, green: Vec<LaneId>, yellow: bool) {
        let c = centre(g);
        let cfg = GraphConfig { green_secs: 1_000.0, yellow_secs: 1_000.0, ..GraphConfig::default() };
        let mut ctl = SignalController::new(vec![green], 0, 0.0, &cfg);
        if yellow {
            ctl.advance(1_000.0);
        }
        g.node_mut(c).unwrap().signal = ctl;
    }

    pub fn spawn(g: &mut TrafficGraph, id: u32, lane: LaneId, cfg: &TrafficConfig) -> VehicleAgent {
        VehicleAgent::spawn_on_lane(AgentId(id), lane, g, cfg, 99).unwrap()
    }

    /// Update `agent` alone for `ticks` ticks, returning every outcome.
    pub fn drive(g: &mut TrafficGraph, agent: &mut VehicleAgent, cfg: &TrafficConfig, ticks: usize) -> Vec<UpdateOutcome> {
        let mut out = Vec::with_capacity(ticks);
        for _ in 0..ticks {
            let snap = TrafficSnapshot::capture([&*agent]);
            let o = agent.update(DT, g, &NoZones, &snap, cfg).unwrap();
            out.push(o);
            if matches!(o, UpdateOutcome::Despawned(_)) {
                break;
            }
        }
        out
    }

    /// A single circular wreck zone.
    pub struct Zone(pub Vec2, pub f32, pub ClusterId);

    impl BlockingZones for Zone {
        fn covering(&self, pos: Vec2) -> Option<ClusterId> {
            (pos.distance(self.0) <= self.1).then_some(self.2)
        }
    }
}

// ── Spawning ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod spawn {
    use cs_core::TrafficConfig;

    use super::helpers::{cautious, plus, spawn, west_approach};
    use crate::{DriveState, Track};

    #[test]
    fn spawn_registers_at_lane_start() {
        let mut g = plus();
        let lane = west_approach(&g);
        let a = spawn(&mut g, 0, lane, &cautious());
        assert_eq!(a.track, Track::Lane(lane));
        assert_eq!(a.position, g.lane(lane).unwrap().start());
        assert_eq!(a.target_index, 1);
        assert_eq!(a.state, DriveState::Driving);
        assert!(a.alive && !a.reckless);
        assert!((8.0..=14.0).contains(&a.max_speed));
        assert_eq!(g.occupants(lane).collect::<Vec<_>>(), vec![a.id]);
    }

    #[test]
    fn draws_are_seeded_per_agent() {
        let cfg = TrafficConfig { reckless_probability: 0.5, ..TrafficConfig::default() };
        let mut g1 = plus();
        let mut g2 = plus();
        let lane = west_approach(&g1);
        for id in 0..8 {
            let a = spawn(&mut g1, id, lane, &cfg);
            let b = spawn(&mut g2, id, lane, &cfg);
            assert_eq!(a.max_speed, b.max_speed);
            assert_eq!(a.reckless, b.reckless);
        }
    }

    #[test]
    fn transform_faces_travel_direction() {
        let mut g = plus();
        let lane = west_approach(&g);
        let a = spawn(&mut g, 0, lane, &cautious());
        let t = a.transform();
        assert!(t.yaw.abs() < 1e-4, "eastbound yaw is zero");
        assert!((t.scale - 2.4).abs() < 1e-6);
    }
}

// ── Signals ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod signals {
    use cs_core::{LaneId, TrafficConfig};

    use super::helpers::{cautious, drive, pin_signal, plus, spawn, west_approach};
    use crate::{HoldReason, Track, UpdateOutcome};

    #[test]
    fn red_light_stops_inside_stop_distance() {
        let mut g = plus();
        let lane = west_approach(&g);
        pin_signal(&mut g, vec![LaneId(u32::MAX - 1)], false);
        let cfg = cautious();
        let mut a = spawn(&mut g, 0, lane, &cfg);

        let outcomes = drive(&mut g, &mut a, &cfg, 600);
        assert_eq!(a.track, Track::Lane(lane), "never left the lane");
        let rem = a.remaining();
        assert!(rem <= 15.0 && rem > 14.0, "stopped {rem} from the line");
        assert_eq!(a.speed, 0.0);
        assert_eq!(*outcomes.last().unwrap(), UpdateOutcome::Held(HoldReason::Signal));
    }

    #[test]
    fn green_releases_the_queue() {
        let mut g = plus();
        let lane = west_approach(&g);
        pin_signal(&mut g, vec![LaneId(u32::MAX - 1)], false);
        let cfg = cautious();
        let mut a = spawn(&mut g, 0, lane, &cfg);
        drive(&mut g, &mut a, &cfg, 600);

        pin_signal(&mut g, vec![lane], false);
        drive(&mut g, &mut a, &cfg, 240);
        assert_ne!(a.track, Track::Lane(lane));
        assert!(!g.occupants(lane).any(|id| id == a.id));
    }

    #[test]
    fn cautious_drivers_hold_on_yellow() {
        let mut g = plus();
        let lane = west_approach(&g);
        pin_signal(&mut g, vec![lane], true);
        let cfg = cautious();
        let mut a = spawn(&mut g, 0, lane, &cfg);
        drive(&mut g, &mut a, &cfg, 600);
        assert_eq!(a.track, Track::Lane(lane));
        assert!(a.remaining() <= 15.0);
    }

    #[test]
    fn reckless_drivers_speed_through_yellow() {
        let mut g = plus();
        let lane = west_approach(&g);
        pin_signal(&mut g, vec![lane], true);
        let cfg = cautious();
        let mut a = spawn(&mut g, 0, lane, &cfg);
        a.reckless = true;
        let mut top = 0.0f32;
        for _ in 0..600 {
            drive(&mut g, &mut a, &cfg, 1);
            top = top.max(a.speed);
            if a.track != Track::Lane(lane) {
                break;
            }
        }
        assert_ne!(a.track, Track::Lane(lane));
        assert!(top > a.max_speed, "boosted past {} (saw {top})", a.max_speed);
    }

    #[test]
    fn red_run_follows_the_per_approach_draw() {
        for (p, runs) in [(1.0, true), (0.0, false)] {
            let mut g = plus();
            let lane = west_approach(&g);
            pin_signal(&mut g, vec![LaneId(u32::MAX - 1)], false);
            let cfg = TrafficConfig { red_run_probability: p, ..cautious() };
            let mut a = spawn(&mut g, 0, lane, &cfg);
            a.reckless = true;
            drive(&mut g, &mut a, &cfg, 600);
            assert_eq!(a.track != Track::Lane(lane), runs, "red_run_probability {p}");
        }
    }
}

// ── Path transitions ──────────────────────────────────────────────────────────

#[cfg(test)]
mod transitions {
    use super::helpers::{cautious, drive, east_exit, pin_signal, plus, spawn, west_approach};
    use crate::{DespawnReason, Track, UpdateOutcome};

    #[test]
    fn lane_to_curve_to_lane() {
        let mut g = plus();
        let lane = west_approach(&g);
        pin_signal(&mut g, vec![lane], false);
        let cfg = cautious();
        let mut a = spawn(&mut g, 0, lane, &cfg);

        let mut saw_curve = false;
        for _ in 0..900 {
            drive(&mut g, &mut a, &cfg, 1);
            match a.track {
                Track::Curve { from, to } => {
                    saw_curve = true;
                    assert_eq!(from, lane);
                    assert!(g.curve(from, to).is_some());
                    assert_eq!(g.occupants(lane).count(), 0, "off the lane while turning");
                }
                Track::Lane(l) if l != lane => break,
                Track::Lane(_) => {}
            }
        }
        assert!(saw_curve);
        let Track::Lane(next) = a.track else { panic!("ended on a curve") };
        assert_ne!(next, lane);
        assert_eq!(g.occupants(next).collect::<Vec<_>>(), vec![a.id]);
        assert_eq!(a.target_index, 1);
    }

    #[test]
    fn dead_end_despawns() {
        let mut g = plus();
        let lane = east_exit(&g);
        let cfg = cautious();
        let mut a = spawn(&mut g, 0, lane, &cfg);
        let outcomes = drive(&mut g, &mut a, &cfg, 1_200);
        assert_eq!(*outcomes.last().unwrap(), UpdateOutcome::Despawned(DespawnReason::DeadEnd));
        assert!(!a.alive);
        assert_eq!(g.occupants(lane).count(), 0);
    }

    #[test]
    fn stall_is_reported_once() {
        let mut g = plus();
        let lane = east_exit(&g);
        let cfg = cautious();
        let mut a = spawn(&mut g, 0, lane, &cfg);
        a.max_speed = 0.0;
        let outcomes = drive(&mut g, &mut a, &cfg, 300);
        let stuck = outcomes.iter().filter(|&&o| o == UpdateOutcome::Stuck).count();
        assert_eq!(stuck, 1);
    }
}

// ── Traffic & wrecks ──────────────────────────────────────────────────────────

#[cfg(test)]
mod traffic {
    use cs_core::ClusterId;

    use super::helpers::{DT, Zone, cautious, east_exit, plus, spawn};
    use crate::{DriveState, HoldReason, NoZones, TrafficSnapshot, UpdateOutcome};

    #[test]
    fn follower_holds_behind_a_stopped_leader() {
        let mut g = plus();
        let lane = east_exit(&g);
        let cfg = cautious();
        let mut lead = spawn(&mut g, 0, lane, &cfg);
        lead.position = lead.path[1];
        lead.target_index = 2;
        lead.manual_brake = true;
        let mut follow = spawn(&mut g, 1, lane, &cfg);

        let mut last = UpdateOutcome::Moved;
        for _ in 0..240 {
            let snap = TrafficSnapshot::capture([&lead, &follow]);
            lead.update(DT, &mut g, &NoZones, &snap, &cfg).unwrap();
            last = follow.update(DT, &mut g, &NoZones, &snap, &cfg).unwrap();
        }
        assert_eq!(last, UpdateOutcome::Held(HoldReason::Traffic));
        assert!(follow.position.distance(lead.position) < 4.0);
        assert!(follow.target_index <= lead.target_index);
    }

    #[test]
    fn reckless_followers_ignore_the_gap() {
        let mut g = plus();
        let lane = east_exit(&g);
        let cfg = cautious();
        let mut lead = spawn(&mut g, 0, lane, &cfg);
        lead.position = lead.path[1];
        lead.target_index = 2;
        lead.manual_brake = true;
        let mut follow = spawn(&mut g, 1, lane, &cfg);
        follow.reckless = true;

        for _ in 0..120 {
            let snap = TrafficSnapshot::capture([&lead, &follow]);
            lead.update(DT, &mut g, &NoZones, &snap, &cfg).unwrap();
            follow.update(DT, &mut g, &NoZones, &snap, &cfg).unwrap();
        }
        assert!(follow.target_index > lead.target_index || !follow.alive);
    }

    #[test]
    fn wreck_zone_absorbs_cautious_drivers() {
        let mut g = plus();
        let lane = east_exit(&g);
        let cfg = cautious();
        let mut a = spawn(&mut g, 0, lane, &cfg);
        let zone = Zone(a.position_2d(), 3.0, ClusterId(7));
        let snap = TrafficSnapshot::capture([&a]);
        let o = a.update(DT, &mut g, &zone, &snap, &cfg).unwrap();
        assert_eq!(o, UpdateOutcome::JoinCluster(ClusterId(7)));
        assert_eq!(a.state, DriveState::Crashed);
        assert_eq!(g.occupants(lane).count(), 0);

        // crashed is terminal
        let o = a.update(DT, &mut g, &NoZones, &snap, &cfg).unwrap();
        assert_eq!(o, UpdateOutcome::Held(HoldReason::Crashed));
    }

    #[test]
    fn reckless_drivers_pass_wreck_zones() {
        let mut g = plus();
        let lane = east_exit(&g);
        let cfg = cautious();
        let mut a = spawn(&mut g, 0, lane, &cfg);
        a.reckless = true;
        let zone = Zone(a.position_2d(), 3.0, ClusterId(7));
        let snap = TrafficSnapshot::capture([&a]);
        assert_eq!(a.update(DT, &mut g, &zone, &snap, &cfg).unwrap(), UpdateOutcome::Moved);
        assert_eq!(a.state, DriveState::Driving);
    }

    #[test]
    fn snapshot_indexes_lanes() {
        let mut g = plus();
        let lane = east_exit(&g);
        let cfg = cautious();
        let a = spawn(&mut g, 0, lane, &cfg);
        let b = spawn(&mut g, 1, lane, &cfg);
        let snap = TrafficSnapshot::capture([&a, &b]);
        assert_eq!(snap.len(), 2);
        assert_eq!(snap.on_lane(lane).count(), 2);
        assert!(snap.get(a.id).is_some());
        assert_eq!(snap.on_lane(cs_core::LaneId(9_999)).count(), 0);
    }
}
