//! The tank: bounded 2D space owning the bodies and the spatial grid
//!
//! `Tank` is the unit the host constructs, steps once per frame, and reads
//! back for rendering. There is no global instance: the host owns it and
//! passes it by `&mut` into each frame (a resize tears the tank down and
//! builds a fresh one from the new bounds).

use tracing::trace;

use crate::simulation::error::InvariantViolation;
use crate::simulation::forces::{reflect_bounds, repelling_force};
use crate::simulation::params::Parameters;
use crate::simulation::spatial::SpatialGrid;
use crate::simulation::states::{Body, NVec2};

pub struct Tank {
    pub width: f64,
    pub height: f64,
    pub effect_radius: f64, // maximum distance at which two bodies interact
    pub ball_size: f64, // visual diameter shared by all bodies
    bodies: Vec<Body>,
    grid: SpatialGrid,
    frame: u64,
}

impl Tank {
    /// Create an empty tank with fixed bounds and interaction radius.
    ///
    /// `effect_radius` also fixes the grid cell size (2× the radius) and is
    /// immutable for the tank's lifetime; see [`SpatialGrid::new`].
    pub fn new(width: f64, height: f64, effect_radius: f64, ball_size: f64) -> Self {
        Self {
            width,
            height,
            effect_radius,
            ball_size,
            bodies: Vec::new(),
            grid: SpatialGrid::new(effect_radius),
            frame: 0,
        }
    }

    /// Add a body and index it immediately.
    ///
    /// Bodies get stable indices in insertion order; nothing is ever removed,
    /// so an index handed out here stays valid for the tank's lifetime.
    pub fn add_body(&mut self, x: NVec2, v: NVec2) -> Result<(), InvariantViolation> {
        let index = self.bodies.len();
        self.grid.insert(index, &x)?;
        self.bodies.push(Body { x, v });
        Ok(())
    }

    /// Advance the simulation by one frame.
    ///
    /// Bodies update sequentially in insertion order; a body later in the
    /// order sees the already-updated positions of earlier ones, matching the
    /// per-body update of the original system. For each body:
    ///
    /// 1. snapshot the position before mutation,
    /// 2. query the grid for bodies within the effect radius,
    /// 3. sum their clamped repulsions into the velocity,
    /// 4. reflect the velocity off any wall the body overlaps,
    /// 5. advance the position by the velocity,
    /// 6. relocate the body in the grid if it crossed a cell boundary.
    ///
    /// An `Err` here means the grid desynchronized from the body positions
    /// and the tank is unusable; hosts should treat it as fatal.
    pub fn step(&mut self, params: &Parameters) -> Result<(), InvariantViolation> {
        for i in 0..self.bodies.len() {
            let previous = self.bodies[i].x;

            let neighbors = self
                .grid
                .neighbors_within(i, self.effect_radius, &self.bodies)?;

            let mut force = NVec2::zeros();
            for &neighbor in &neighbors {
                force += repelling_force(previous, self.bodies[neighbor].x, params);
            }

            let (width, height, ball_size) = (self.width, self.height, self.ball_size);
            let body = &mut self.bodies[i];
            body.v += force;
            reflect_bounds(&body.x, &mut body.v, width, height, ball_size, params);
            body.x += body.v;

            let current = self.bodies[i].x;
            self.grid.relocate(i, &previous, &current)?;
        }

        self.frame += 1;
        trace!(frame = self.frame, bodies = self.bodies.len(), "tank stepped");
        Ok(())
    }

    /// Neighbor indices within the effect radius of the given body.
    pub fn neighbors_of(&self, body: usize) -> Result<Vec<usize>, InvariantViolation> {
        self.grid
            .neighbors_within(body, self.effect_radius, &self.bodies)
    }

    /// Read-only view of all bodies, for the host's rendering pass.
    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    pub fn grid(&self) -> &SpatialGrid {
        &self.grid
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }
}
