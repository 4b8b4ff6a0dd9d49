//! Integration tests for cs-output.

#[cfg(test)]
mod csv_tests {
    use tempfile::TempDir;

    use crate::csv::CsvWriter;
    use crate::row::{AgentTransformRow, TickSummaryRow, WreckRow};
    use crate::writer::OutputWriter;

    fn tmp() -> TempDir {
        tempfile::tempdir().expect("create temp dir")
    }

    fn agent_row(agent_id: u32, tick: u64) -> AgentTransformRow {
        AgentTransformRow {
            tick,
            agent_id,
            x:     agent_id as f32,
            y:     -1.5,
            z:     0.0,
            yaw:   0.0,
            scale: 2.4,
        }
    }

    fn headers(path: std::path::PathBuf) -> Vec<String> {
        let mut rdr = csv::Reader::from_path(path).unwrap();
        rdr.headers().unwrap().iter().map(str::to_owned).collect()
    }

    #[test]
    fn csv_files_created() {
        let dir = tmp();
        let _w = CsvWriter::new(dir.path()).unwrap();
        for name in ["agent_transforms.csv", "wrecks.csv", "tick_summaries.csv", "polygons.csv"] {
            assert!(dir.path().join(name).exists(), "{name} missing");
        }
    }

    #[test]
    fn csv_headers_correct() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.finish().unwrap();

        assert_eq!(headers(dir.path().join("agent_transforms.csv")), ["tick", "agent_id", "x", "y", "z", "yaw", "scale"]);
        assert_eq!(headers(dir.path().join("wrecks.csv")), ["tick", "cluster_id", "agent_id", "x", "y", "yaw"]);
        assert_eq!(headers(dir.path().join("polygons.csv")), ["kind", "polygon", "vertex", "x", "y"]);
        assert_eq!(headers(dir.path().join("tick_summaries.csv"))[0], "tick");
    }

    #[test]
    fn csv_agent_rows_written() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_agents(&[agent_row(0, 5), agent_row(1, 5), agent_row(2, 5)]).unwrap();
        w.finish().unwrap();

        let mut rdr = csv::Reader::from_path(dir.path().join("agent_transforms.csv")).unwrap();
        let rows: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 3);
        assert_eq!(&rows[0][0], "5");    // tick
        assert_eq!(&rows[2][1], "2");    // agent_id
        assert_eq!(&rows[1][3], "-1.5"); // y
    }

    #[test]
    fn csv_wreck_and_summary_rows_written() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_wrecks(&[WreckRow { tick: 4, cluster_id: 1, agent_id: 9, x: 0.5, y: 0.0, yaw: 0.0 }]).unwrap();
        w.write_tick_summary(&TickSummaryRow {
            tick:         30,
            elapsed_secs: 0.5,
            driving:      12,
            crashed:      2,
            spawned:      0,
            despawned:    1,
            collisions:   1,
            clusters:     1,
        })
        .unwrap();
        w.finish().unwrap();

        let mut rdr = csv::Reader::from_path(dir.path().join("wrecks.csv")).unwrap();
        let wrecks: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(&wrecks[0][1], "1");
        assert_eq!(&wrecks[0][2], "9");

        let mut rdr = csv::Reader::from_path(dir.path().join("tick_summaries.csv")).unwrap();
        let summaries: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(&summaries[0][0], "30");
        assert_eq!(&summaries[0][1], "0.5");
        assert_eq!(&summaries[0][2], "12");
    }

    #[test]
    fn csv_finish_idempotent() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.finish().unwrap();
        w.finish().unwrap();
    }

    #[test]
    fn csv_empty_batch_ok() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_agents(&[]).unwrap();
        w.write_wrecks(&[]).unwrap();
    }
}

#[cfg(test)]
mod observer_tests {
    use glam::Vec2;
    use tempfile::TempDir;

    use cs_core::{RoadConfig, SimConfig, TrafficConfig};
    use cs_roads::{RoadNetwork, RoadNetworkBuilder};
    use cs_sim::SimBuilder;

    use crate::csv::CsvWriter;
    use crate::observer::{SimOutputObserver, polygon_rows};

    fn plus() -> RoadNetwork {
        let mut b = RoadNetworkBuilder::new(RoadConfig::default());
        b.add_segment(Vec2::new(-50.0, 0.0), Vec2::new(50.0, 0.0), 8.0, 2);
        b.add_segment(Vec2::new(0.0, -50.0), Vec2::new(0.0, 50.0), 8.0, 2);
        b.build()
    }

    #[test]
    fn crash_run_writes_wrecks_each_frame() {
        let config = SimConfig {
            total_ticks: 6,
            traffic: TrafficConfig {
                target_population:    0,
                reckless_probability: 0.0,
                ..TrafficConfig::default()
            },
            ..SimConfig::default()
        };
        let mut sim = SimBuilder::new(config.clone()).network(plus()).frame_interval(2).build().unwrap();
        let lane = sim.world.graph.lanes()[0].id;
        sim.spawn_at(lane).unwrap();
        sim.spawn_at(lane).unwrap();

        let dir = TempDir::new().unwrap();
        let mut obs = SimOutputObserver::new(CsvWriter::new(dir.path()).unwrap(), &config);
        obs.write_world(&sim.world).unwrap();
        sim.run(&mut obs).unwrap();
        assert!(obs.take_error().is_none(), "no write errors expected");

        // Frames at ticks 0, 2, 4; both vehicles wrecked on tick 0.
        let mut rdr = csv::Reader::from_path(dir.path().join("wrecks.csv")).unwrap();
        assert_eq!(rdr.records().count(), 6);
        let mut rdr = csv::Reader::from_path(dir.path().join("agent_transforms.csv")).unwrap();
        assert_eq!(rdr.records().count(), 0);

        let mut rdr = csv::Reader::from_path(dir.path().join("tick_summaries.csv")).unwrap();
        let rows: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 6);
        assert_eq!(&rows[0][3], "2"); // crashed
        assert_eq!(&rows[0][6], "1"); // collisions
        assert_eq!(&rows[1][6], "0");

        let mut rdr = csv::Reader::from_path(dir.path().join("polygons.csv")).unwrap();
        assert!(rdr.records().count() > 0);
    }

    #[test]
    fn polygon_rows_cover_mesh_surfaces() {
        let sim = SimBuilder::new(SimConfig::default()).network(plus()).build().unwrap();
        let rows = polygon_rows(&sim.world);
        let roads = rows.iter().filter(|r| r.kind == "road").count();
        assert_eq!(roads, 4 * 4);
        assert!(rows.iter().any(|r| r.kind == "junction"));
        assert!(!rows.iter().any(|r| r.kind == "block"));
        // Vertices are numbered from zero within each polygon.
        assert!(rows.iter().filter(|r| r.vertex == 0).count() >= 5);
    }

    #[test]
    fn generated_city_emits_every_layout_kind() {
        let sim = SimBuilder::new(SimConfig::default()).build().unwrap();
        let rows = polygon_rows(&sim.world);
        for kind in ["junction", "road", "block", "sidewalk", "lot", "footprint"] {
            assert!(rows.iter().any(|r| r.kind == kind), "no {kind} rows");
        }
    }
}
