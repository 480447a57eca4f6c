pub mod simulation;
pub mod configuration;
pub mod visualization;
pub mod benchmark;

pub use simulation::states::{Body, NVec2};
pub use simulation::tank::Tank;
pub use simulation::params::Parameters;
pub use simulation::spatial::SpatialGrid;
pub use simulation::error::InvariantViolation;
pub use simulation::forces::{repelling_force, reflect_bounds};
pub use simulation::scenario::Scenario;

pub use configuration::config::{ScenarioConfig, TankConfig, ParametersConfig, BodyConfig, TuningConfig};

pub use visualization::tank_vis2d::{force_line_alpha, run_2d};

pub use benchmark::benchmark::{bench_neighbors, bench_step};
