#[cfg(test)]
mod tests {
    use glam::{Vec2, Vec3};

    use touchdown_core::enums::{RejectReason, SamplingStrategyKind, ScanState};
    use touchdown_core::events::ScanEvent;
    use touchdown_core::obstacles::ObstacleList;
    use touchdown_core::traits::{GroundHeight, ObstacleQuery, SiteProvider};
    use touchdown_core::types::{Aabb, BodyId, ObstacleHit};
    use touchdown_terrain::{TerrainConfig, TerrainHeightField};

    use crate::config::ScannerConfig;
    use crate::evaluation::{evaluate_site, ScanContext};
    use crate::sampling::Sampler;
    use crate::scanner::LandingSiteScanner;

    /// Height field whose ring samples match the center but whose cardinal
    /// slope samples sit on a steep rim.
    struct CraterRim;

    impl GroundHeight for CraterRim {
        fn height_at(&self, x: f32, z: f32) -> f32 {
            let r = (x * x + z * z).sqrt();
            5.0 * (std::f32::consts::PI * r / 3.0).sin()
        }
    }

    /// 45 degree ramp along x.
    struct Ramp;

    impl GroundHeight for Ramp {
        fn height_at(&self, x: f32, _z: f32) -> f32 {
            x
        }
    }

    /// Broad phase that only reports bodies to queries wider than `min_radius`.
    struct WideOnly {
        inner: ObstacleList,
        min_radius: f32,
    }

    impl ObstacleQuery for WideOnly {
        fn overlap_capsule(&self, a: Vec3, b: Vec3, radius: f32, max: usize) -> Vec<ObstacleHit> {
            if radius > self.min_radius {
                self.inner.overlap_capsule(a, b, radius, max)
            } else {
                Vec::new()
            }
        }

        fn overlap_sphere(&self, center: Vec3, radius: f32, max: usize) -> Vec<ObstacleHit> {
            if radius > self.min_radius {
                self.inner.overlap_sphere(center, radius, max)
            } else {
                Vec::new()
            }
        }
    }

    fn rock(name: &str, x: f32, z: f32, height: f32) -> ObstacleHit {
        ObstacleHit::new(
            name,
            Aabb::from_center_half_extents(
                Vec3::new(x, height * 0.5, z),
                Vec3::new(1.0, height * 0.5, 1.0),
            ),
        )
    }

    fn ctx_at<'a>(
        terrain: &'a dyn GroundHeight,
        obstacles: &'a ObstacleList,
        position: Vec3,
    ) -> ScanContext<'a> {
        ScanContext {
            terrain,
            obstacles,
            vehicle_position: position,
            vehicle_body: Some(BodyId(7)),
        }
    }

    fn small_config() -> ScannerConfig {
        ScannerConfig {
            scan_radius: 40.0,
            ..Default::default()
        }
    }

    /// Run updates until the scanner completes a session; returns tick count.
    fn run_to_completion(scanner: &mut LandingSiteScanner, ctx: &ScanContext) -> usize {
        for ticks in 1..=10_000 {
            if scanner.update(ctx, 1.0 / 60.0).completed {
                return ticks;
            }
        }
        panic!("scan did not complete");
    }

    // ---- Scenario A ----

    #[test]
    fn test_flat_terrain_accepts_nearest_point() {
        let terrain = TerrainHeightField::new(TerrainConfig::flat());
        let obstacles = ObstacleList::default();
        let ctx = ctx_at(&terrain, &obstacles, Vec3::new(0.0, 150.0, 0.0));
        let config = ScannerConfig::default();
        assert_eq!(config.scan_radius, 200.0);
        assert_eq!(config.grid_resolution, 5.0);

        let points = Sampler::from_config(&config).generate(&ctx, &config);
        assert_eq!(points[0], Vec2::ZERO, "nearest point first");

        let site = evaluate_site(points[0], &ctx, &config).expect("flat point accepted");
        assert!(site.suitability_score > 0.9, "score {}", site.suitability_score);
        assert!(site.size >= config.min_site_size);
        assert_eq!(site.surface_normal, Vec3::Y);
        assert!(!site.has_obstacles);
        assert!((site.distance_from_ship - 150.0).abs() < 1e-3);
    }

    #[test]
    fn test_flat_terrain_full_scan() {
        let terrain = TerrainHeightField::new(TerrainConfig::flat());
        let obstacles = ObstacleList::default();
        let ctx = ctx_at(&terrain, &obstacles, Vec3::new(0.0, 150.0, 0.0));
        let mut scanner = LandingSiteScanner::default();

        run_to_completion(&mut scanner, &ctx);
        assert_eq!(scanner.reject_counts(), [0; 6]);
        let sites = scanner.sites();
        assert!(!sites.is_empty());
        assert!(sites.len() <= scanner.config().max_results);
        assert!(sites.iter().all(|s| s.suitability_score > 0.9));
        // Equal scores rank nearest first, so the vehicle's own spot leads
        assert_eq!(sites[0].ground_point(), Vec2::ZERO);
    }

    // ---- Rejection pipeline ----

    #[test]
    fn test_rough_and_steep_rejected_as_rough() {
        let obstacles = ObstacleList::default();
        let ctx = ctx_at(&Ramp, &obstacles, Vec3::new(0.0, 50.0, 0.0));
        let result = evaluate_site(Vec2::ZERO, &ctx, &ScannerConfig::default());
        assert_eq!(result, Err(RejectReason::TooRough));
    }

    #[test]
    fn test_flat_ring_on_steep_rim_rejected_as_steep() {
        let obstacles = ObstacleList::default();
        let ctx = ctx_at(&CraterRim, &obstacles, Vec3::new(0.0, 50.0, 0.0));
        let result = evaluate_site(Vec2::ZERO, &ctx, &ScannerConfig::default());
        assert_eq!(result, Err(RejectReason::TooSteep));
    }

    #[test]
    fn test_obstacle_on_point_rejected_early() {
        let terrain = TerrainHeightField::new(TerrainConfig::flat());
        let obstacles = ObstacleList::new(vec![rock("Rock_01", 0.0, 0.0, 3.0)]);
        let ctx = ctx_at(&terrain, &obstacles, Vec3::new(0.0, 50.0, 0.0));
        let config = ScannerConfig::default();
        assert_eq!(
            evaluate_site(Vec2::ZERO, &ctx, &config),
            Err(RejectReason::ObstacleAtCenter)
        );

        // Without the early check, the size step catches it
        let config = ScannerConfig {
            early_obstacle_check: false,
            ..Default::default()
        };
        assert_eq!(
            evaluate_site(Vec2::ZERO, &ctx, &config),
            Err(RejectReason::TooSmall)
        );
    }

    #[test]
    fn test_obstacle_missed_by_growth_rejected_as_inside() {
        let terrain = TerrainHeightField::new(TerrainConfig::flat());
        let config = ScannerConfig::default();
        let obstacles = WideOnly {
            inner: ObstacleList::new(vec![rock("Rock_04", 9.0, 0.0, 2.0)]),
            min_radius: config.max_site_size,
        };
        let ctx = ScanContext {
            terrain: &terrain,
            obstacles: &obstacles,
            vehicle_position: Vec3::new(0.0, 50.0, 0.0),
            vehicle_body: Some(BodyId(7)),
        };
        assert_eq!(
            evaluate_site(Vec2::ZERO, &ctx, &config),
            Err(RejectReason::ObstacleInside)
        );
    }

    #[test]
    fn test_obstacle_too_close() {
        let terrain = TerrainHeightField::new(TerrainConfig::flat());
        // Footprint edge 3.5 m from the candidate
        let obstacles = ObstacleList::new(vec![rock("Rock_02", 4.5, 0.0, 2.0)]);
        let ctx = ctx_at(&terrain, &obstacles, Vec3::new(0.0, 50.0, 0.0));
        let config = ScannerConfig {
            min_site_size: 2.0,
            ..Default::default()
        };
        assert_eq!(
            evaluate_site(Vec2::ZERO, &ctx, &config),
            Err(RejectReason::ObstacleTooClose)
        );
    }

    #[test]
    fn test_nearby_obstacle_lowers_score() {
        let terrain = TerrainHeightField::new(TerrainConfig::flat());
        let obstacles = ObstacleList::new(vec![rock("Rock_03", 9.0, 0.0, 2.0)]);
        let ctx = ctx_at(&terrain, &obstacles, Vec3::new(0.0, 50.0, 0.0));
        let config = ScannerConfig::default();

        let site = evaluate_site(Vec2::ZERO, &ctx, &config).expect("accepted with reduced score");
        assert!(site.has_obstacles);
        assert!((site.distance_to_obstacle - 8.0).abs() < 1e-3);
        assert!(site.size <= 8.0);
        assert!(site.suitability_score < 0.9);

        let clear = evaluate_site(Vec2::new(-60.0, 0.0), &ctx, &config).expect("clear site");
        assert!(clear.suitability_score > site.suitability_score);
    }

    #[test]
    fn test_own_body_and_ground_names_ignored() {
        let terrain = TerrainHeightField::new(TerrainConfig::flat());
        let obstacles = ObstacleList::new(vec![
            rock("landing_leg", 0.0, 0.0, 2.0).with_owner(BodyId(7)),
            rock("GroundPatch", 3.0, 0.0, 2.0),
            rock("platform_edge", -3.0, 0.0, 2.0),
        ]);
        let ctx = ctx_at(&terrain, &obstacles, Vec3::new(0.0, 2.0, 0.0));
        let site = evaluate_site(Vec2::ZERO, &ctx, &ScannerConfig::default());
        assert!(site.is_ok(), "got {site:?}");
    }

    #[test]
    fn test_sites_on_hills_respect_thresholds() {
        let terrain = TerrainHeightField::new(TerrainConfig::default());
        let obstacles = ObstacleList::default();
        let config = ScannerConfig {
            scan_radius: 60.0,
            ..Default::default()
        };
        let ctx = ctx_at(&terrain, &obstacles, Vec3::new(250.0, 400.0, -120.0));
        let points = Sampler::from_config(&config).generate(&ctx, &config);
        for point in points {
            if let Ok(site) = evaluate_site(point, &ctx, &config) {
                assert!(site.flatness <= config.max_flatness_deviation);
                assert!(site.slope_angle <= config.max_slope_deg);
                assert!((0.0..=1.0).contains(&site.suitability_score));
                assert!((site.surface_normal.length() - 1.0).abs() < 1e-4);
                assert!(site.surface_normal.y > 0.0);
                assert!((site.position.y - terrain.height_at(point.x, point.y)).abs() < 1e-4);
            }
        }
    }

    // ---- Sampling ----

    #[test]
    fn test_poisson_minimum_spacing() {
        let terrain = TerrainHeightField::new(TerrainConfig::flat());
        let obstacles = ObstacleList::default();
        let ctx = ctx_at(&terrain, &obstacles, Vec3::new(10.0, 80.0, -4.0));
        let config = ScannerConfig {
            strategy: SamplingStrategyKind::PoissonDisk,
            scan_radius: 60.0,
            ..Default::default()
        };
        let sampler = Sampler::from_config(&config);
        assert_eq!(sampler.kind(), SamplingStrategyKind::PoissonDisk);

        let points = sampler.generate(&ctx, &config);
        assert!(points.len() > 50, "only {} points", points.len());
        let center = ctx.ground_center();
        for (i, a) in points.iter().enumerate() {
            assert!(a.distance(center) <= config.scan_radius + 1e-3);
            for b in &points[i + 1..] {
                assert!(a.distance(*b) >= config.grid_resolution - 1e-3);
            }
        }
        // Sorted nearest first
        for pair in points.windows(2) {
            assert!(pair[0].distance(center) <= pair[1].distance(center));
        }
        // Seeded
        assert_eq!(points, sampler.generate(&ctx, &config));
    }

    #[test]
    fn test_grid_is_world_aligned() {
        let terrain = TerrainHeightField::new(TerrainConfig::flat());
        let obstacles = ObstacleList::default();
        let config = small_config();
        let sampler = Sampler::from_config(&config);

        let a = sampler.generate(&ctx_at(&terrain, &obstacles, Vec3::new(1.3, 50.0, 2.1)), &config);
        let moved = ctx_at(&terrain, &obstacles, Vec3::new(3.9, 50.0, -1.2));
        let b = sampler.generate(&moved, &config);
        for p in a.iter().chain(b.iter()) {
            assert_eq!(p.x % 5.0, 0.0);
            assert_eq!(p.y % 5.0, 0.0);
        }
        assert!(a.iter().filter(|p| b.contains(p)).count() > a.len() / 2);
    }

    #[test]
    fn test_obstacle_aware_grid_skips_blocked_cells() {
        let terrain = TerrainHeightField::new(TerrainConfig::flat());
        let obstacles = ObstacleList::new(vec![rock("Boulder", 50.0, 50.0, 3.0)]);
        let ctx = ctx_at(&terrain, &obstacles, Vec3::new(0.0, 100.0, 0.0));

        let grid_config = ScannerConfig {
            scan_radius: 100.0,
            ..Default::default()
        };
        let aware_config = ScannerConfig {
            strategy: SamplingStrategyKind::ObstacleAwareGrid,
            ..grid_config.clone()
        };
        let grid = Sampler::from_config(&grid_config).generate(&ctx, &grid_config);
        let aware = Sampler::from_config(&aware_config).generate(&ctx, &aware_config);

        assert!(aware.len() < grid.len());
        assert!(aware.iter().all(|p| grid.contains(p)));
        assert!(grid.contains(&Vec2::new(50.0, 50.0)));
        assert!(!aware.contains(&Vec2::new(50.0, 50.0)));
        // Far from the boulder nothing is excluded
        assert!(aware.contains(&Vec2::new(-50.0, -50.0)));
    }

    // ---- Incremental scanning ----

    #[test]
    fn test_per_tick_budget_and_cursor() {
        let terrain = TerrainHeightField::new(TerrainConfig::flat());
        let obstacles = ObstacleList::default();
        let ctx = ctx_at(&terrain, &obstacles, Vec3::new(0.0, 100.0, 0.0));
        let config = small_config();
        let expected = Sampler::from_config(&config).generate(&ctx, &config).len();
        let mut scanner = LandingSiteScanner::new(config.clone());

        let first = scanner.update(&ctx, 1.0 / 60.0);
        assert!(first.started);
        assert_eq!(first.processed, config.max_points_per_frame);
        assert_eq!(scanner.state(), ScanState::Scanning);
        assert!(!scanner.is_presented());

        let mut total = first.processed;
        let mut last_cursor = 0;
        loop {
            if let Some((cursor, len)) = scanner.session_cursor() {
                assert!(cursor >= last_cursor, "cursor moved backwards");
                assert_eq!(len, expected);
                last_cursor = cursor;
            }
            let tick = scanner.update(&ctx, 1.0 / 60.0);
            assert!(tick.processed <= config.max_points_per_frame);
            assert!(!tick.started);
            total += tick.processed;
            if tick.completed {
                break;
            }
        }
        assert_eq!(total, expected, "each point evaluated exactly once");
        assert_eq!(scanner.state(), ScanState::Idle);
        assert_eq!(scanner.progress(), 1.0);
        assert!(scanner.is_presented());

        let events = scanner.take_events();
        assert_eq!(events.first(), Some(&ScanEvent::ScanStarted { points: expected }));
        assert!(events
            .iter()
            .any(|e| matches!(e, ScanEvent::ResultsPresented { .. })));
        assert!(scanner.take_events().is_empty());
    }

    #[test]
    fn test_clustered_results_do_not_overlap() {
        let terrain = TerrainHeightField::new(TerrainConfig::flat());
        let obstacles = ObstacleList::new(vec![
            rock("Rock_a", 12.0, 3.0, 2.0),
            rock("Rock_b", -20.0, 15.0, 4.0),
        ]);
        let ctx = ctx_at(&terrain, &obstacles, Vec3::new(0.0, 100.0, 0.0));
        let mut scanner = LandingSiteScanner::new(ScannerConfig {
            scan_radius: 80.0,
            ..Default::default()
        });
        run_to_completion(&mut scanner, &ctx);

        let margin = scanner.config().min_distance_between_sites;
        let sites = scanner.sites();
        assert!(!sites.is_empty());
        for (i, a) in sites.iter().enumerate() {
            for b in &sites[i + 1..] {
                assert!(a.position.distance(b.position) >= a.size + b.size + margin);
            }
        }
        for pair in sites.windows(2) {
            assert!(pair[0].suitability_score >= pair[1].suitability_score);
        }
    }

    #[test]
    fn test_interval_rescan() {
        let terrain = TerrainHeightField::new(TerrainConfig::flat());
        let obstacles = ObstacleList::default();
        let ctx = ctx_at(&terrain, &obstacles, Vec3::new(0.0, 100.0, 0.0));
        let mut scanner = LandingSiteScanner::new(ScannerConfig {
            max_points_per_frame: 10_000,
            ..small_config()
        });

        let tick = scanner.update(&ctx, 1.0);
        assert!(tick.started && tick.completed);
        for _ in 0..4 {
            assert!(!scanner.update(&ctx, 1.0).started);
        }
        let tick = scanner.update(&ctx, 1.0);
        assert!(tick.started, "rescan after the interval");
        // Still presented; interval rescans only refresh the list
        assert!(scanner.is_presented());
        assert_eq!(scanner.presented_at(), Some(Vec3::new(0.0, 100.0, 0.0)));
    }

    #[test]
    fn test_rescan_after_moving_away() {
        let terrain = TerrainHeightField::new(TerrainConfig::flat());
        let obstacles = ObstacleList::default();
        let mut scanner = LandingSiteScanner::new(small_config());

        let start = ctx_at(&terrain, &obstacles, Vec3::new(0.0, 100.0, 0.0));
        run_to_completion(&mut scanner, &start);
        assert!(scanner.is_presented());
        scanner.take_events();

        // Descending straight down does not trigger a rescan
        let lower = ctx_at(&terrain, &obstacles, Vec3::new(0.0, 20.0, 0.0));
        assert!(!scanner.update(&lower, 0.1).started);

        // Drift past the rescan distance
        let moved = ctx_at(&terrain, &obstacles, Vec3::new(60.0, 100.0, 0.0));
        let tick = scanner.update(&moved, 0.1);
        assert!(tick.started);
        assert!(!scanner.is_presented());
        assert_eq!(scanner.presented_at(), None);
        // Old sites stay live until replaced
        assert!(!scanner.sites().is_empty());

        run_to_completion(&mut scanner, &moved);
        assert!(scanner.is_presented());
        assert_eq!(scanner.presented_at(), Some(Vec3::new(60.0, 100.0, 0.0)));
        let center = Vec2::new(60.0, 0.0);
        assert!(scanner
            .sites()
            .iter()
            .all(|s| s.ground_point().distance(center) <= 40.0));
    }

    #[test]
    fn test_move_cancels_running_session() {
        let terrain = TerrainHeightField::new(TerrainConfig::flat());
        let obstacles = ObstacleList::default();
        let mut scanner = LandingSiteScanner::new(ScannerConfig {
            scan_interval: 0.0,
            ..small_config()
        });

        let start = ctx_at(&terrain, &obstacles, Vec3::new(0.0, 100.0, 0.0));
        run_to_completion(&mut scanner, &start);
        // Interval of zero starts the next session immediately
        assert!(scanner.update(&start, 0.1).started);
        assert_eq!(scanner.state(), ScanState::Scanning);
        scanner.take_events();

        let moved = ctx_at(&terrain, &obstacles, Vec3::new(0.0, 100.0, 75.0));
        scanner.update(&moved, 0.1);
        let events = scanner.take_events();
        assert!(matches!(events[0], ScanEvent::ScanCancelled { processed } if processed > 0));
        assert!(matches!(events[1], ScanEvent::ScanStarted { .. }));
    }

    #[test]
    fn test_site_provider_view() {
        let terrain = TerrainHeightField::new(TerrainConfig::default());
        let obstacles = ObstacleList::default();
        let position = Vec3::new(130.0, 400.0, 75.0);
        let ctx = ctx_at(&terrain, &obstacles, position);
        let mut scanner = LandingSiteScanner::new(small_config());
        scanner.update(&ctx, 0.1);

        let provider: &dyn SiteProvider = &scanner;
        assert_eq!(provider.ground_height_below(), terrain.height_at(130.0, 75.0));
        assert!(!provider.results_presented());
        assert!(provider.ranked_sites().is_empty());
    }

    #[test]
    fn test_snapshot_serializes() {
        let terrain = TerrainHeightField::new(TerrainConfig::flat());
        let obstacles = ObstacleList::new(vec![rock("Rock", 6.0, 6.0, 2.0)]);
        let ctx = ctx_at(&terrain, &obstacles, Vec3::new(0.0, 100.0, 0.0));
        let mut scanner = LandingSiteScanner::new(small_config());
        run_to_completion(&mut scanner, &ctx);

        let snapshot = scanner.snapshot();
        assert!(snapshot.reject_counts.iter().sum::<u32>() > 0);
        let json = serde_json::to_string(&snapshot).unwrap();
        let back: touchdown_core::state::ScannerSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, snapshot);
    }
}
