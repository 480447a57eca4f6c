//! Physical tuning parameters for the repulsion simulation
//!
//! `Parameters` holds runtime settings:
//! - base magnitude of the inverse-square repulsion,
//! - force cap that bounds the singularity at small separations,
//! - energy loss applied to a velocity component on wall bounce
//!
//! Two historical tunings of this system exist and both are kept as named
//! presets. The newer one ([`Parameters::current`]) runs with a 0.5 force cap
//! and no bounce damping; the older one ([`Parameters::classic`]) caps at
//! 0.05 and bleeds 2% of a velocity component per bounce. They drift only in
//! tuning, not in semantics, so the choice is configuration, not contract.

#[derive(Debug, Clone)]
pub struct Parameters {
    pub force_base_magnitude: f64, // K in K / d^2
    pub max_force: f64, // cap on per-pair force magnitude
    pub bounce_damping: f64, // fraction of velocity lost per bounce, in [0, 1]
}

impl Parameters {
    /// The newer tuning: looser force cap, fully elastic walls.
    pub fn current() -> Self {
        Self {
            force_base_magnitude: 20.0,
            max_force: 0.5,
            bounce_damping: 0.0,
        }
    }

    /// The older tuning: tight force cap, walls act as an energy sink.
    pub fn classic() -> Self {
        Self {
            force_base_magnitude: 20.0,
            max_force: 0.05,
            bounce_damping: 0.02,
        }
    }
}

impl Default for Parameters {
    fn default() -> Self {
        Self::current()
    }
}
