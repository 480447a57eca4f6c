//! Core state types for the ball tank simulation.
//!
//! Defines the 2D body struct:
//! - `Body` using `NVec2`
//!
//! The tank that owns the bodies lives in [`crate::simulation::tank`].

use nalgebra::Vector2;
pub type NVec2 = Vector2<f64>;

#[derive(Debug, Clone)]
pub struct Body {
    pub x: NVec2, // position
    pub v: NVec2, // velocity
}
