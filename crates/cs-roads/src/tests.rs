//! Unit tests for cs-roads.
//!
//! All networks are hand-built; nothing here depends on the layout generator.

#[cfg(test)]
mod helpers {
    use glam::Vec2;

    use cs_core::RoadConfig;

    use crate::RoadNetworkBuilder;

    pub fn builder() -> RoadNetworkBuilder {
        RoadNetworkBuilder::new(RoadConfig::default())
    }

    pub fn v(x: f32, y: f32) -> Vec2 {
        Vec2::new(x, y)
    }

    /// A plus sign: two roads of width 2 crossing at (5, 5).
    pub fn plus() -> RoadNetworkBuilder {
        let mut b = builder();
        b.add_segment(v(0.0, 5.0), v(10.0, 5.0), 2.0, 2);
        b.add_segment(v(5.0, 0.0), v(5.0, 10.0), 2.0, 2);
        b
    }
}

// ── Junction resolution ───────────────────────────────────────────────────────

#[cfg(test)]
mod builder {
    use super::helpers::{builder, plus, v};

    #[test]
    fn shared_endpoint_is_one_node() {
        let mut b = builder();
        b.add_segment(v(0.0, 0.0), v(10.0, 0.0), 7.0, 2);
        b.add_segment(v(10.0, 0.0), v(10.0, 10.0), 7.0, 2);
        assert_eq!(b.segment_count(), 2);
        assert_eq!(b.node_count(), 3);
        assert_eq!(b.degree_at(v(10.0, 0.0)), 2);
    }

    #[test]
    fn crossing_splits_both_roads() {
        let b = plus();
        assert_eq!(b.segment_count(), 4);
        assert_eq!(b.node_count(), 5);
        assert_eq!(b.degree_at(v(5.0, 5.0)), 4);
    }

    #[test]
    fn t_junction_splits_the_through_road() {
        let mut b = builder();
        b.add_segment(v(0.0, 0.0), v(10.0, 0.0), 7.0, 2);
        b.add_segment(v(5.0, 0.0), v(5.0, 5.0), 7.0, 2);
        assert_eq!(b.segment_count(), 3);
        assert_eq!(b.node_count(), 4);
        assert_eq!(b.degree_at(v(5.0, 0.0)), 3);
    }

    #[test]
    fn t_junction_in_reverse_order_splits_the_new_road() {
        let mut b = builder();
        b.add_segment(v(5.0, 0.0), v(5.0, 5.0), 7.0, 2);
        let appended = b.add_segment(v(0.0, 0.0), v(10.0, 0.0), 7.0, 2);
        assert_eq!(appended, 2);
        assert_eq!(b.segment_count(), 3);
        assert_eq!(b.degree_at(v(5.0, 0.0)), 3);
    }

    #[test]
    fn duplicates_are_skipped_in_either_direction() {
        let mut b = builder();
        assert_eq!(b.add_segment(v(0.0, 0.0), v(10.0, 0.0), 7.0, 2), 1);
        assert_eq!(b.add_segment(v(0.0, 0.0), v(10.0, 0.0), 7.0, 2), 0);
        assert_eq!(b.add_segment(v(10.0, 0.0), v(0.0, 0.0), 7.0, 2), 0);
        assert_eq!(b.segment_count(), 1);
    }

    #[test]
    fn nearby_endpoints_snap_together() {
        let mut b = builder();
        b.add_segment(v(0.0, 0.0), v(10.0, 0.0), 7.0, 2);
        b.add_segment(v(10.04, 0.03), v(10.0, 10.0), 7.0, 2);
        assert_eq!(b.node_count(), 3);
        assert_eq!(b.degree_at(v(10.0, 0.0)), 2);
    }

    #[test]
    fn micro_segments_are_discarded() {
        let mut b = builder();
        assert_eq!(b.add_segment(v(0.0, 0.0), v(0.2, 0.0), 7.0, 2), 0);
        assert_eq!(b.segment_count(), 0);
        assert_eq!(b.node_count(), 0);
    }

    #[test]
    fn collinear_overlap_keeps_one_copy() {
        let mut b = builder();
        b.add_segment(v(0.0, 0.0), v(10.0, 0.0), 7.0, 2);
        let appended = b.add_segment(v(5.0, 0.0), v(15.0, 0.0), 7.0, 2);
        assert_eq!(appended, 1, "only the overhang (10,0)-(15,0) is new");
        assert_eq!(b.segment_count(), 3);
        assert_eq!(b.node_count(), 4);
    }

    #[test]
    fn crossing_near_the_far_end_still_splits() {
        // The hit sits at u = 0.995 along the new road but 0.5 from its end.
        let mut b = builder();
        b.add_segment(v(-50.0, 0.0), v(50.0, 0.0), 7.0, 2);
        b.add_segment(v(0.0, -100.0), v(0.0, 0.5), 7.0, 2);
        assert_eq!(b.segment_count(), 4);
        assert_eq!(b.degree_at(v(0.0, 0.0)), 4);
    }

    #[test]
    fn short_overshoot_is_trimmed() {
        let mut b = builder();
        b.add_segment(v(-50.0, 0.0), v(50.0, 0.0), 7.0, 2);
        let appended = b.add_segment(v(0.0, -100.0), v(0.0, 0.3), 7.0, 2);
        assert_eq!(appended, 1);
        assert_eq!(b.segment_count(), 3);
        assert_eq!(b.degree_at(v(0.0, 0.0)), 3);
        assert_eq!(b.node_at(v(0.0, 0.3)), None);
    }

    #[test]
    fn near_miss_end_lands_on_the_line() {
        // (40.5, 4.0) is 0.05 off the road y = x / 10.
        let mut b = builder();
        b.add_segment(v(0.0, 0.0), v(100.0, 10.0), 7.0, 2);
        b.add_segment(v(40.5, 50.0), v(40.5, 4.0), 7.0, 2);
        assert_eq!(b.segment_count(), 3);
        assert_eq!(b.degree_at(v(40.5, 4.05)), 3);
        let n = b.node_at(v(40.5, 4.05)).unwrap();
        // The through road stays straight.
        let net = b.build();
        let p = net.node_pos[n];
        assert!((p.y - p.x / 10.0).abs() < 1e-4, "{p:?}");
    }

    #[test]
    fn hash_grid_resolves_every_crossing() {
        let mut b = builder();
        b.add_segment(v(0.0, 10.0), v(30.0, 10.0), 7.0, 2);
        b.add_segment(v(0.0, 20.0), v(30.0, 20.0), 7.0, 2);
        b.add_segment(v(10.0, 0.0), v(10.0, 30.0), 7.0, 2);
        b.add_segment(v(20.0, 0.0), v(20.0, 30.0), 7.0, 2);
        assert_eq!(b.segment_count(), 12);
        assert_eq!(b.node_count(), 12);
        for p in [v(10.0, 10.0), v(10.0, 20.0), v(20.0, 10.0), v(20.0, 20.0)] {
            assert_eq!(b.degree_at(p), 4, "crossing at {p:?}");
        }
    }
}

// ── Frozen network ────────────────────────────────────────────────────────────

#[cfg(test)]
mod network {
    use super::helpers::{builder, plus, v};

    #[test]
    fn empty_build() {
        let net = builder().build();
        assert!(net.is_empty());
        assert_eq!(net.segment_count(), 0);
        assert_eq!(net.node_seg_start, vec![0]);
    }

    #[test]
    fn csr_incidence_matches_degrees() {
        let net = plus().build();
        assert_eq!(net.node_count(), 5);
        assert_eq!(net.node_segs.len(), 2 * net.segment_count());

        let centre = net.node_pos.iter().position(|&p| p.distance(v(5.0, 5.0)) < 1e-3).unwrap();
        assert_eq!(net.degree(centre), 4);
        for seg in net.incident(centre) {
            let s = net.segments[seg];
            assert!(s.from == centre || s.to == centre);
            assert!((net.segment_length(seg) - 5.0).abs() < 1e-3);
        }
        let leaves = (0..net.node_count()).filter(|&n| net.degree(n) == 1).count();
        assert_eq!(leaves, 4);
    }

    #[test]
    fn direction_points_away_from_node() {
        let net = plus().build();
        for n in 0..net.node_count() {
            for seg in net.incident(n) {
                let dir = net.direction_from(seg, n);
                let far = net.node_pos[net.segments[seg].other(n)];
                assert!((net.node_pos[n] + dir * net.segment_length(seg)).distance(far) < 1e-3);
            }
        }
        assert!((net.total_length() - 20.0).abs() < 1e-3);
    }
}

// ── Meshing ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod mesh {
    use super::helpers::{builder, plus, v};
    use crate::{RoadMesh, junction_polygon, road_quad, setback};

    #[test]
    fn plus_junction_is_a_square() {
        let net = plus().build();
        let centre = net.node_pos.iter().position(|&p| p.distance(v(5.0, 5.0)) < 1e-3).unwrap();
        let poly = junction_polygon(&net, centre).unwrap();
        assert_eq!(poly.len(), 4);
        assert!(poly.signed_area() > 0.0);
        assert!((poly.area() - 4.0).abs() < 1e-3);
    }

    #[test]
    fn road_quads_stop_at_the_mouths() {
        let net = plus().build();
        for seg in 0..net.segment_count() {
            let quad = road_quad(&net, seg).unwrap();
            assert_eq!(quad.len(), 4);
            assert!(quad.signed_area() > 0.0);
            // 5 long, 1 trimmed at each end, 2 wide
            assert!((quad.area() - 6.0).abs() < 1e-3, "seg {seg}: {}", quad.area());
        }
    }

    #[test]
    fn dead_end_has_a_cap() {
        let mut b = builder();
        b.add_segment(v(0.0, 0.0), v(20.0, 0.0), 4.0, 2);
        let net = b.build();
        let cap = junction_polygon(&net, 0).unwrap();
        assert_eq!(cap.len(), 4);
        assert!((cap.area() - 16.0).abs() < 1e-3);
        assert!((setback(&net, 0, 0) - 2.0).abs() < 1e-5);
    }

    #[test]
    fn short_wide_road_keeps_a_strip_between_mouths() {
        let mut b = builder();
        b.add_segment(v(0.0, 0.0), v(3.0, 0.0), 10.0, 2);
        let net = b.build();
        // both caps clamp to 0.45 × 3 = 1.35, leaving 0.3 of a 10-wide road
        let quad = road_quad(&net, 0).unwrap();
        assert!((quad.area() - 3.0).abs() < 1e-3, "{}", quad.area());
    }

    #[test]
    fn mesh_covers_every_element() {
        let net = plus().build();
        let mesh = RoadMesh::build(&net);
        assert_eq!(mesh.junctions.len(), 5);
        assert_eq!(mesh.roads.len(), 4);
        assert_eq!(mesh.polygon_count(), 9);
    }
}

// ── Properties ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod properties {
    use glam::Vec2;
    use proptest::prelude::*;

    use cs_geometry::segment_intersection;

    use super::helpers::builder;

    /// Axis-aligned integer road: `(fixed, from, to, horizontal)`.
    fn road() -> impl Strategy<Value = (i32, i32, i32, bool)> {
        (0i32..20, 0i32..20, 1i32..20, any::<bool>())
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(96))]

        /// After any insertion order of grid roads, no two segments cross
        /// in their interiors and no two join the same pair of nodes.
        #[test]
        fn no_undetected_crossings(roads in prop::collection::vec(road(), 1..10)) {
            let mut b = builder();
            for (fixed, from, len, horizontal) in roads {
                let (a, z) = (from as f32, (from + len) as f32);
                let f = fixed as f32;
                let (p, q) = if horizontal {
                    (Vec2::new(a, f), Vec2::new(z, f))
                } else {
                    (Vec2::new(f, a), Vec2::new(f, z))
                };
                b.add_segment(p, q, 7.0, 2);
            }

            let segs = b.segments().to_vec();
            for (i, s) in segs.iter().enumerate() {
                for t in &segs[i + 1..] {
                    let same = (s.start == t.start && s.end == t.end)
                        || (s.start == t.end && s.end == t.start);
                    prop_assert!(!same, "duplicate {:?}", s);
                    if let Some(hit) = segment_intersection(s.start, s.end, t.start, t.end) {
                        let inside = |x: f32| x > 0.01 && x < 0.99;
                        prop_assert!(!(inside(hit.t) && inside(hit.u)), "{:?} crosses {:?}", s, t);
                    }
                }
            }

            let net = b.build();
            prop_assert_eq!(net.node_segs.len(), 2 * net.segment_count());
        }

        /// Long roads at arbitrary angles: any two segments that touch do
        /// so within the snap tolerance of an endpoint.
        #[test]
        fn long_oblique_roads_share_every_crossing(
            roads in prop::collection::vec(
                (-200.0f32..200.0, -200.0f32..200.0, 0.0f32..std::f32::consts::TAU, 20.0f32..300.0),
                1..8,
            ),
        ) {
            let mut b = builder();
            for (x, y, angle, len) in roads {
                let p = Vec2::new(x, y);
                b.add_segment(p, p + Vec2::from_angle(angle) * len, 7.0, 2);
            }

            let tol = b.config().snap_tolerance;
            let segs = b.segments().to_vec();
            for (i, s) in segs.iter().enumerate() {
                for t in &segs[i + 1..] {
                    let Some(hit) = segment_intersection(s.start, s.end, t.start, t.end) else { continue };
                    let clear = [s.start, s.end, t.start, t.end].iter().all(|e| e.distance(hit.point) > tol);
                    prop_assert!(!clear, "{:?} crosses {:?} at {:?}", s, t, hit.point);
                }
            }
        }
    }
}
