//! Configuration types for loading tank scenarios from YAML.
//!
//! This module defines a thin, `serde`-deserializable representation of a
//! scenario. A scenario consists of:
//!
//! - [`TankConfig`]       – tank bounds, interaction radius, visual ball size
//! - [`ParametersConfig`] – force tuning and spawn settings
//! - [`BodyConfig`]       – optional explicit initial state for each body
//! - [`ScenarioConfig`]   – top-level wrapper used to load a scenario from YAML
//!
//! # YAML format
//! An example scenario YAML matching these types:
//!
//! ```yaml
//! tank:
//!   width: 1000.0
//!   height: 300.0
//!   effect_radius: 100.0
//!   ball_size: 10.0
//!
//! parameters:
//!   tuning: "current"       # or "classic"
//!   max_force: 0.5          # optional per-field override of the preset
//!   body_count: 25
//!   initial_velocity_magnitude: 1.5
//!   seed: 42
//!
//! # Optional; when present it replaces random spawning entirely.
//! bodies:
//!   - x: [ 10.0, 10.0 ]
//!     v: [ 0.0, 0.0 ]
//!   - x: [ 10.0, 11.0 ]
//!     v: [ 0.0, 0.0 ]
//! ```
//!
//! All fields default to the constants the original deployment ran with
//! (a 1000×300 tank, 25 balls, effect radius at a tenth of the width), so an
//! empty document is itself a valid scenario.

use serde::Deserialize;

/// Which of the two historical tunings to start from
/// `tuning: "current"` or `tuning: "classic"`
#[derive(Deserialize, Debug, Clone, Default)]
pub enum TuningConfig {
    #[default]
    #[serde(rename = "current")] // 0.5 force cap, fully elastic walls; the intended tuning
    Current,

    #[serde(rename = "classic")] // 0.05 force cap, 2% bounce damping; the earlier iteration
    Classic,
}

/// Tank geometry configuration
#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct TankConfig {
    pub width: f64, // tank width in simulation units
    pub height: f64, // tank height in simulation units
    pub effect_radius: f64, // interaction radius; fixes the grid cell size at 2x this
    pub ball_size: f64, // visual ball diameter, also the wall-overlap margin
}

impl Default for TankConfig {
    fn default() -> Self {
        Self {
            width: 1000.0,
            height: 300.0,
            effect_radius: 100.0,
            ball_size: 10.0,
        }
    }
}

/// Force tuning and spawn settings for a scenario
///
/// The `Option` fields override individual values of the chosen preset.
#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct ParametersConfig {
    pub tuning: TuningConfig, // preset to start from
    pub force_base_magnitude: Option<f64>, // K in K / d^2
    pub max_force: Option<f64>, // cap on per-pair force magnitude
    pub bounce_damping: Option<f64>, // fraction of velocity lost per bounce
    pub body_count: usize, // number of randomly spawned bodies
    pub initial_velocity_magnitude: f64, // speed of randomly spawned bodies
    pub seed: u64, // deterministic seed to make spawns reproducible
}

impl Default for ParametersConfig {
    fn default() -> Self {
        Self {
            tuning: TuningConfig::default(),
            force_base_magnitude: None,
            max_force: None,
            bounce_damping: None,
            body_count: 25,
            initial_velocity_magnitude: 1.5,
            seed: 42,
        }
    }
}

/// Configuration for a single body's initial state
#[derive(Deserialize, Debug, Clone)]
pub struct BodyConfig {
    pub x: [f64; 2], // initial position in tank units
    pub v: [f64; 2], // initial velocity in tank units per frame
}

/// Top-level scenario configuration loaded from YAML.
#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct ScenarioConfig {
    pub tank: TankConfig, // tank geometry
    pub parameters: ParametersConfig, // force tuning and spawn settings
    pub bodies: Option<Vec<BodyConfig>>, // explicit bodies; bypasses random spawning
}
