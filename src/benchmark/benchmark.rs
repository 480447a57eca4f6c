use std::time::Instant;

use crate::simulation::error::InvariantViolation;
use crate::simulation::params::Parameters;
use crate::simulation::states::NVec2;
use crate::simulation::tank::Tank;

// Deterministic in-bounds positions, no rand needed
fn seeded_tank(n: usize) -> Result<Tank, InvariantViolation> {
    let mut tank = Tank::new(1000.0, 300.0, 100.0, 10.0);

    for i in 0..n {
        let i_f = i as f64;
        let x = NVec2::new(
            ((i_f * 0.37).sin() * 0.5 + 0.5) * tank.width,
            ((i_f * 0.13).cos() * 0.5 + 0.5) * tank.height,
        );
        let v = NVec2::new((i_f * 0.07).sin(), (i_f * 0.11).cos());
        tank.add_body(x, v)?;
    }

    Ok(tank)
}

/// Time grid-accelerated neighbor queries against the brute-force O(n^2) scan.
pub fn bench_neighbors() -> Result<(), InvariantViolation> {
    // Different system sizes to test
    let ns = [200, 400, 800, 1600, 3200, 6400];

    for n in ns {
        let tank = seeded_tank(n)?;
        let bodies = tank.bodies();
        let radius = tank.effect_radius;

        // Warm up
        for i in 0..n {
            tank.neighbors_of(i)?;
        }

        // Time grid queries for every body
        let t0 = Instant::now();
        let mut grid_hits = 0usize;
        for i in 0..n {
            grid_hits += tank.neighbors_of(i)?.len();
        }
        let dt_grid = t0.elapsed().as_secs_f64();

        // Time the brute-force reference
        let t1 = Instant::now();
        let mut brute_hits = 0usize;
        for i in 0..n {
            for j in 0..n {
                if i != j && (bodies[j].x - bodies[i].x).norm() <= radius {
                    brute_hits += 1;
                }
            }
        }
        let dt_brute = t1.elapsed().as_secs_f64();

        assert_eq!(grid_hits, brute_hits);
        println!(
            "N = {n:5}, grid = {dt_grid:8.6} s, brute = {dt_brute:8.6} s, pairs = {grid_hits}"
        );
    }

    Ok(())
}

/// Time whole-frame throughput across system sizes.
pub fn bench_step() -> Result<(), InvariantViolation> {
    let ns = [200, 400, 800, 1600, 3200];
    let steps = 100;
    let params = Parameters::default();

    for n in ns {
        let mut tank = seeded_tank(n)?;

        // Warm up
        tank.step(&params)?;

        let t0 = Instant::now();
        for _ in 0..steps {
            tank.step(&params)?;
        }
        let dt = t0.elapsed().as_secs_f64();

        println!(
            "N = {n:5}, {steps} steps = {dt:8.6} s, {:10.1} steps/s",
            steps as f64 / dt
        );
    }

    Ok(())
}
