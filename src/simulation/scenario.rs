//! Build fully-initialized tank scenarios from configuration
//!
//! Takes a `ScenarioConfig` (YAML-facing) and produces the runtime bundle
//! (`Scenario`) containing:
//! - tuning parameters (`Parameters`)
//! - the tank with its bodies indexed and at frame 0
//!
//! The scenario is inserted into Bevy as a `Resource` and consumed by the
//! physics and visualization systems

use bevy::prelude::Resource;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::info;

use crate::configuration::config::{ScenarioConfig, TuningConfig};
use crate::simulation::error::InvariantViolation;
use crate::simulation::params::Parameters;
use crate::simulation::states::NVec2;
use crate::simulation::tank::Tank;

/// Bevy resource representing a fully-initialized tank scenario
///
/// This is the main "runtime bundle" constructed from a [`ScenarioConfig`]:
/// it contains the tuning parameters and the tank holding the system state.
///
/// In Bevy terms, this is inserted as a `Resource` and then read by systems
/// responsible for stepping and visualization
#[derive(Resource)]
pub struct Scenario {
    pub parameters: Parameters,
    pub tank: Tank,
}

impl Scenario {
    pub fn build_scenario(cfg: ScenarioConfig) -> Result<Self, InvariantViolation> {
        // Parameters (runtime): start from the chosen preset, then apply
        // any per-field overrides
        let p_cfg = &cfg.parameters;
        let mut parameters = match p_cfg.tuning {
            TuningConfig::Current => Parameters::current(),
            TuningConfig::Classic => Parameters::classic(),
        };
        if let Some(k) = p_cfg.force_base_magnitude {
            parameters.force_base_magnitude = k;
        }
        if let Some(cap) = p_cfg.max_force {
            parameters.max_force = cap;
        }
        if let Some(damping) = p_cfg.bounce_damping {
            parameters.bounce_damping = damping;
        }

        let t_cfg = &cfg.tank;
        let mut tank = Tank::new(t_cfg.width, t_cfg.height, t_cfg.effect_radius, t_cfg.ball_size);

        match cfg.bodies {
            // Explicit bodies: map `BodyConfig` -> runtime `Body`
            Some(bodies) => {
                for bc in &bodies {
                    tank.add_body(NVec2::new(bc.x[0], bc.x[1]), NVec2::new(bc.v[0], bc.v[1]))?;
                }
            }
            // Random spawning: uniform positions inside the tank, velocity a
            // random unit vector scaled to the configured magnitude
            None => {
                let mut rng = StdRng::seed_from_u64(p_cfg.seed);
                for _ in 0..p_cfg.body_count {
                    let x = NVec2::new(
                        rng.gen::<f64>() * tank.width,
                        rng.gen::<f64>() * tank.height,
                    );
                    let angle = rng.gen::<f64>() * std::f64::consts::TAU;
                    let v = NVec2::new(angle.cos(), angle.sin())
                        * p_cfg.initial_velocity_magnitude;
                    tank.add_body(x, v)?;
                }
            }
        }

        info!(
            bodies = tank.bodies().len(),
            width = tank.width,
            height = tank.height,
            effect_radius = tank.effect_radius,
            "scenario built"
        );

        Ok(Self { parameters, tank })
    }
}
