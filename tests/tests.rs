use balltank::{
    force_line_alpha, repelling_force, Body, InvariantViolation, NVec2, Parameters, Scenario,
    ScenarioConfig, SpatialGrid, Tank,
};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Build the canonical empty tank: 1000x300, effect radius 100, ball size 10
pub fn test_tank() -> Tank {
    Tank::new(1000.0, 300.0, 100.0, 10.0)
}

/// Fill a tank with `n` seeded random bodies at speeds up to `speed`
pub fn random_tank(n: usize, speed: f64, seed: u64) -> Tank {
    let mut tank = test_tank();
    let mut rng = StdRng::seed_from_u64(seed);
    for _ in 0..n {
        let x = NVec2::new(rng.gen::<f64>() * tank.width, rng.gen::<f64>() * tank.height);
        let angle = rng.gen::<f64>() * std::f64::consts::TAU;
        let v = NVec2::new(angle.cos(), angle.sin()) * speed;
        tank.add_body(x, v).unwrap();
    }
    tank
}

/// Every body is in exactly one bucket, and that bucket matches its position
pub fn assert_grid_consistent(tank: &Tank) {
    let n = tank.bodies().len();
    let mut seen = vec![0usize; n];
    for (cell, bucket) in tank.grid().buckets() {
        for &idx in bucket {
            seen[idx] += 1;
            assert_eq!(
                cell,
                tank.grid().cell_of(&tank.bodies()[idx].x),
                "body {idx} bucketed under a stale cell"
            );
        }
    }
    for (idx, count) in seen.iter().enumerate() {
        assert_eq!(*count, 1, "body {idx} appears in {count} buckets");
    }
}

// ==================================================================================
// Spatial grid tests
// ==================================================================================

#[test]
fn cell_of_uses_floor_division() {
    let grid = SpatialGrid::new(100.0); // cell diameter 200

    assert_eq!(grid.cell_diameter(), 200.0);
    assert_eq!(grid.cell_of(&NVec2::new(0.0, 0.0)), (0, 0));
    assert_eq!(grid.cell_of(&NVec2::new(199.9, 199.9)), (0, 0));
    assert_eq!(grid.cell_of(&NVec2::new(200.0, 200.0)), (1, 1));
    assert_eq!(grid.cell_of(&NVec2::new(-0.1, -0.1)), (-1, -1));
}

#[test]
fn double_insert_fails_fast() {
    let mut grid = SpatialGrid::new(100.0);
    let p = NVec2::new(10.0, 10.0);

    grid.insert(0, &p).unwrap();
    let err = grid.insert(0, &p).unwrap_err();

    assert!(matches!(err, InvariantViolation::DoubleInsert { body: 0, .. }));
}

#[test]
fn relocate_of_unindexed_body_fails() {
    let mut grid = SpatialGrid::new(100.0);

    let previous = NVec2::new(900.0, 10.0);
    let current = NVec2::new(10.0, 10.0);
    let err = grid.relocate(5, &previous, &current).unwrap_err();

    assert!(matches!(
        err,
        InvariantViolation::MissingFromBucket { body: 5, cell: (4, 0) }
    ));
}

#[test]
fn relocate_within_same_cell_is_a_noop() {
    let mut grid = SpatialGrid::new(100.0);
    grid.insert(0, &NVec2::new(10.0, 10.0)).unwrap();

    grid.relocate(0, &NVec2::new(10.0, 10.0), &NVec2::new(150.0, 150.0))
        .unwrap();

    let buckets: Vec<_> = grid.buckets().collect();
    assert_eq!(buckets.len(), 1);
    assert_eq!(buckets[0].0, (0, 0));
    assert!(buckets[0].1.contains(&0));
}

#[test]
fn relocate_moves_body_between_buckets() {
    let mut grid = SpatialGrid::new(100.0);
    let previous = NVec2::new(150.0, 150.0);
    let current = NVec2::new(210.0, 150.0);
    grid.insert(0, &previous).unwrap();

    grid.relocate(0, &previous, &current).unwrap();

    let buckets: Vec<_> = grid.buckets().collect();
    assert_eq!(buckets.len(), 1, "old empty bucket should be dropped");
    assert_eq!(buckets[0].0, (1, 0));
    assert!(buckets[0].1.contains(&0));
}

#[test]
fn neighbor_query_requires_indexed_body() {
    let mut grid = SpatialGrid::new(100.0);
    let bodies = vec![
        Body {
            x: NVec2::new(10.0, 10.0),
            v: NVec2::zeros(),
        },
        Body {
            x: NVec2::new(500.0, 150.0),
            v: NVec2::zeros(),
        },
    ];
    // Only body 0 is indexed; querying body 1 must not pretend isolation
    grid.insert(0, &bodies[0].x).unwrap();

    let err = grid.neighbors_within(1, 100.0, &bodies).unwrap_err();

    assert!(matches!(
        err,
        InvariantViolation::MissingFromNeighborhood { body: 1 }
    ));
}

#[test]
fn neighbor_query_rejects_out_of_range_index() {
    let mut tank = test_tank();
    tank.add_body(NVec2::new(500.0, 150.0), NVec2::zeros()).unwrap();

    let err = tank.neighbors_of(5).unwrap_err();

    assert!(matches!(
        err,
        InvariantViolation::MissingFromNeighborhood { body: 5 }
    ));
}

#[test]
fn neighbors_match_brute_force_reference() {
    let tank = random_tank(50, 0.0, 99);
    let bodies = tank.bodies();
    let radius = tank.effect_radius;

    for i in 0..bodies.len() {
        let mut from_grid = tank.neighbors_of(i).unwrap();
        from_grid.sort_unstable();

        let mut reference: Vec<usize> = (0..bodies.len())
            .filter(|&j| j != i && (bodies[j].x - bodies[i].x).norm() <= radius)
            .collect();
        reference.sort_unstable();

        assert_eq!(from_grid, reference, "neighbor mismatch for body {i}");
    }
}

#[test]
fn grid_stays_consistent_across_steps() {
    let mut tank = random_tank(50, 3.0, 7);
    let params = Parameters::classic();

    assert_grid_consistent(&tank);
    for _ in 0..100 {
        tank.step(&params).unwrap();
        assert_grid_consistent(&tank);
    }
}

// ==================================================================================
// Force tests
// ==================================================================================

#[test]
fn repulsion_newton_third_law() {
    let params = Parameters::default();
    let a = NVec2::new(3.0, 4.0);
    let b = NVec2::new(-1.0, 2.0);

    let f_ab = repelling_force(a, b, &params);
    let f_ba = repelling_force(b, a, &params);

    assert!((f_ab + f_ba).norm() < 1e-12, "forces are not equal and opposite");
}

#[test]
fn repulsion_points_away_from_other_body() {
    let params = Parameters::default();
    let a = NVec2::new(10.0, 10.0);
    let b = NVec2::new(40.0, 10.0);

    let f = repelling_force(a, b, &params);

    // Repulsive: force on a points from b toward a
    assert!(f.dot(&(a - b)) > 0.0, "force is not repulsive");
}

#[test]
fn repulsion_inverse_square_law() {
    let params = Parameters::default();
    let origin = NVec2::zeros();

    // Both distances are far enough that the cap does not bite
    let f_near = repelling_force(NVec2::new(50.0, 0.0), origin, &params);
    let f_far = repelling_force(NVec2::new(100.0, 0.0), origin, &params);

    let ratio = f_near.norm() / f_far.norm();
    assert!((ratio - 4.0).abs() < 1e-9, "expected ~4x, got {ratio}");
}

#[test]
fn repulsion_is_clamped() {
    let params = Parameters::default();
    let origin = NVec2::zeros();

    for d in [1e-9, 1e-3, 0.5, 1.0, 5.0, 20.0, 100.0] {
        let f = repelling_force(NVec2::new(d, 0.0), origin, &params);
        assert!(
            f.norm() <= params.max_force + 1e-12,
            "force at d = {d} exceeds the cap: {}",
            f.norm()
        );
    }
}

#[test]
fn repulsion_at_zero_separation_is_zero() {
    let params = Parameters::default();
    let p = NVec2::new(12.0, 34.0);

    let f = repelling_force(p, p, &params);

    assert_eq!(f, NVec2::zeros());
    assert!(f.x.is_finite() && f.y.is_finite());
}

// ==================================================================================
// Tank stepping tests
// ==================================================================================

#[test]
fn two_close_bodies_repel_each_other() {
    let mut tank = test_tank();
    tank.add_body(NVec2::new(10.0, 10.0), NVec2::zeros()).unwrap();
    tank.add_body(NVec2::new(10.0, 11.0), NVec2::zeros()).unwrap();

    // At distance 1 each must see the other
    assert_eq!(tank.neighbors_of(0).unwrap(), vec![1]);
    assert_eq!(tank.neighbors_of(1).unwrap(), vec![0]);

    tank.step(&Parameters::default()).unwrap();

    let v0 = tank.bodies()[0].v;
    let v1 = tank.bodies()[1].v;
    assert!(v0.norm() > 0.0 && v1.norm() > 0.0);

    // Directed away from each other along the separation axis
    let separation = tank.bodies()[1].x - tank.bodies()[0].x;
    assert!((v1 - v0).dot(&separation) > 0.0, "bodies are not separating");
}

#[test]
fn resting_body_at_center_stays_put() {
    let mut tank = test_tank();
    let center = NVec2::new(500.0, 150.0);
    tank.add_body(center, NVec2::zeros()).unwrap();

    let params = Parameters::default();
    for _ in 0..100 {
        tank.step(&params).unwrap();
        assert_eq!(tank.bodies()[0].x, center);
        assert_eq!(tank.bodies()[0].v, NVec2::zeros());
    }
}

#[test]
fn bounce_flips_velocity_into_the_tank() {
    // One unit from the left edge, moving at the wall
    let mut tank = test_tank();
    tank.add_body(NVec2::new(1.0, 150.0), NVec2::new(-5.0, 0.0)).unwrap();

    tank.step(&Parameters::current()).unwrap();

    // No damping in the current tuning: the flip is exact
    assert_eq!(tank.bodies()[0].v.x, 5.0);
    assert_eq!(tank.bodies()[0].x.x, 6.0);
}

#[test]
fn bounce_damping_bleeds_energy() {
    let mut tank = test_tank();
    tank.add_body(NVec2::new(1.0, 150.0), NVec2::new(-5.0, 0.0)).unwrap();

    tank.step(&Parameters::classic()).unwrap();

    let vx = tank.bodies()[0].v.x;
    assert!((vx - 5.0 * 0.98).abs() < 1e-12, "expected damped flip, got {vx}");
}

#[test]
fn body_leaving_a_wall_is_untouched() {
    // Touching the left wall but already moving inward
    let mut tank = test_tank();
    tank.add_body(NVec2::new(1.0, 150.0), NVec2::new(3.0, 0.0)).unwrap();

    tank.step(&Parameters::default()).unwrap();

    assert_eq!(tank.bodies()[0].v.x, 3.0);
    assert_eq!(tank.bodies()[0].x.x, 4.0);
}

#[test]
fn bodies_stay_inside_the_tank() {
    let mut tank = random_tank(25, 1.5, 42);
    let params = Parameters::classic();
    let half = tank.ball_size / 2.0;

    for _ in 0..300 {
        tank.step(&params).unwrap();
        for (i, body) in tank.bodies().iter().enumerate() {
            assert!(
                body.x.x >= -half && body.x.x <= tank.width + half,
                "body {i} escaped horizontally: {}",
                body.x.x
            );
            assert!(
                body.x.y >= -half && body.x.y <= tank.height + half,
                "body {i} escaped vertically: {}",
                body.x.y
            );
        }
    }
}

#[test]
fn fast_body_stays_contained() {
    // Speed of twice the half-size per axis is the containment limit; a lone
    // body at that speed must still never leave the half-size margin
    let mut tank = test_tank();
    tank.add_body(NVec2::new(500.0, 150.0), NVec2::new(-10.0, 8.0)).unwrap();

    let params = Parameters::current();
    let half = tank.ball_size / 2.0;
    for _ in 0..400 {
        tank.step(&params).unwrap();
        let p = tank.bodies()[0].x;
        assert!(p.x >= -half && p.x <= tank.width + half, "x escaped: {}", p.x);
        assert!(p.y >= -half && p.y <= tank.height + half, "y escaped: {}", p.y);
    }
}

#[test]
fn relocation_tracks_fast_movement() {
    let mut tank = test_tank(); // cell diameter 200
    tank.add_body(NVec2::new(150.0, 150.0), NVec2::new(60.0, 0.0)).unwrap();

    let params = Parameters::default();
    for _ in 0..10 {
        tank.step(&params).unwrap();
        assert_grid_consistent(&tank);
    }
}

// ==================================================================================
// Visualization tests
// ==================================================================================

#[test]
fn force_line_opacity_scales_and_caps() {
    // No interaction, no line
    assert_eq!(force_line_alpha(0.0), 0.0);
    // Strong repulsion saturates at full opacity
    assert_eq!(force_line_alpha(0.5), 1.0);
    // In between, opacity grows with the force
    let weak = force_line_alpha(0.02);
    let strong = force_line_alpha(0.04);
    assert!(weak > 0.0 && strong < 1.0);
    assert!(weak < strong);
}

// ==================================================================================
// Scenario tests
// ==================================================================================

#[test]
fn default_scenario_spawns_configured_bodies() {
    let scenario = Scenario::build_scenario(ScenarioConfig::default()).unwrap();

    assert_eq!(scenario.tank.bodies().len(), 25);
    assert_eq!(scenario.parameters.max_force, 0.5);
    assert_eq!(scenario.parameters.bounce_damping, 0.0);
    for body in scenario.tank.bodies() {
        assert!(body.x.x >= 0.0 && body.x.x <= scenario.tank.width);
        assert!(body.x.y >= 0.0 && body.x.y <= scenario.tank.height);
        assert!((body.v.norm() - 1.5).abs() < 1e-12);
    }
    assert_grid_consistent(&scenario.tank);
}

#[test]
fn scenario_spawning_is_deterministic_per_seed() {
    let a = Scenario::build_scenario(ScenarioConfig::default()).unwrap();
    let b = Scenario::build_scenario(ScenarioConfig::default()).unwrap();

    for (ba, bb) in a.tank.bodies().iter().zip(b.tank.bodies()) {
        assert_eq!(ba.x, bb.x);
        assert_eq!(ba.v, bb.v);
    }
}

#[test]
fn explicit_bodies_bypass_random_spawning() {
    let yaml = r#"
parameters:
  tuning: "classic"
bodies:
  - x: [10.0, 10.0]
    v: [0.0, 0.0]
  - x: [10.0, 11.0]
    v: [0.0, 0.0]
"#;
    let cfg: ScenarioConfig = serde_yaml::from_str(yaml).unwrap();
    let scenario = Scenario::build_scenario(cfg).unwrap();

    assert_eq!(scenario.tank.bodies().len(), 2);
    assert_eq!(scenario.tank.bodies()[0].x, NVec2::new(10.0, 10.0));
    assert_eq!(scenario.parameters.max_force, 0.05);
    assert_eq!(scenario.parameters.bounce_damping, 0.02);
}
