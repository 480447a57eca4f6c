//! Force laws for the ball tank
//!
//! Defines the clamped inverse-square repulsion between two bodies and the
//! one-sided wall reflection. Both are pure functions over `NVec2` so the
//! physics can be tested without a tank.

use crate::simulation::params::Parameters;
use crate::simulation::states::NVec2;

/// Repulsive force exerted on the body at `on` by the body at `from`.
///
/// Magnitude follows the electrostatic form `K / d^2`, capped at
/// `params.max_force` so the singularity at small separations cannot inject
/// unbounded energy. Direction is the unit vector from `from` toward `on`
/// (purely repulsive).
///
/// Degenerate case: at `d == 0` the direction is undefined, and the
/// function returns the zero vector instead of dividing by zero. Two exactly
/// coincident bodies therefore exert nothing on each other until something
/// else separates them.
pub fn repelling_force(on: NVec2, from: NVec2, params: &Parameters) -> NVec2 {
    // Separation normal points from the other body toward this one
    let separation = on - from;
    let distance = separation.norm();
    if distance == 0.0 {
        return NVec2::zeros();
    }

    let magnitude = (params.force_base_magnitude / (distance * distance)).min(params.max_force);

    separation * (magnitude / distance)
}

/// Reflect a velocity off the tank walls, in place.
///
/// Per axis independently: the component is negated only when the body
/// overlaps the wall by half its visual size AND is moving further out.
/// Components already pointing inward are never touched, so a body lingering
/// at a wall across frames cannot double-reflect and jitter. The negated
/// component is scaled by `1 - bounce_damping`, the system's energy sink.
pub fn reflect_bounds(
    position: &NVec2,
    velocity: &mut NVec2,
    width: f64,
    height: f64,
    ball_size: f64,
    params: &Parameters,
) {
    let keep = 1.0 - params.bounce_damping;
    let half = ball_size / 2.0;

    if velocity.x < 0.0 && position.x - half < 0.0 {
        velocity.x = -velocity.x * keep;
    } else if velocity.x > 0.0 && position.x + half > width {
        velocity.x = -velocity.x * keep;
    }

    if velocity.y < 0.0 && position.y - half < 0.0 {
        velocity.y = -velocity.y * keep;
    } else if velocity.y > 0.0 && position.y + half > height {
        velocity.y = -velocity.y * keep;
    }
}
