use bevy::prelude::*;
use bevy::sprite::{MaterialMesh2dBundle, Mesh2dHandle};
use bevy::math::primitives::Circle;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::simulation::forces::repelling_force;
use crate::simulation::scenario::Scenario;

#[derive(Component)]
struct BodyIndex(pub usize);

// Tank units are already pixel-scaled (the canonical tank is 1000 wide)
const SCALE: f32 = 1.0;

// Per-body colors are cosmetic; a fixed seed keeps reruns identical
const COLOR_SEED: u64 = 7;

// Force connector lines scale with the clamped force magnitude, capped so
// close pairs don't wash out the scene
const STROKE_MAG_MULT: f32 = 20.0;
const MAX_STROKE_WEIGHT: f32 = 4.0;

pub fn run_2d(scenario: Scenario) {
    tracing::info!(
        bodies = scenario.tank.bodies().len(),
        "run_2d: starting Bevy 2D viewer"
    );

    App::new()
        .insert_resource(scenario)
        .add_plugins(DefaultPlugins)
        .add_systems(Startup, setup_bodies_system)
        .add_systems(
            Update,
            (physics_step_system, sync_transforms_system, draw_force_lines_system),
        )
        .run();
}

fn setup_bodies_system(
    mut commands: Commands,
    scenario: Res<Scenario>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<ColorMaterial>>,
) {
    // 2D camera
    commands.spawn(Camera2dBundle::default());

    let mut rng = StdRng::seed_from_u64(COLOR_SEED);
    let radius_screen = (scenario.tank.ball_size as f32 / 2.0) * SCALE;

    for (i, body) in scenario.tank.bodies().iter().enumerate() {
        let (x, y) = tank_to_screen(body.x.x, body.x.y, &scenario);
        let color = Color::rgb(rng.gen(), rng.gen(), rng.gen());

        commands.spawn((
            MaterialMesh2dBundle {
                mesh: Mesh2dHandle(meshes.add(Circle::new(radius_screen))),
                material: materials.add(ColorMaterial::from(color)),
                transform: Transform::from_xyz(x, y, 0.0),
                ..Default::default()
            },
            BodyIndex(i),
        ));
    }
}

fn physics_step_system(mut scenario: ResMut<Scenario>) {
    // Split &mut Scenario into &mut fields in one destructuring step
    let Scenario { tank, parameters } = &mut *scenario;

    // An invariant violation means the grid and the bodies desynchronized;
    // there is nothing to recover, so surface the bug loudly
    if let Err(err) = tank.step(parameters) {
        panic!("simulation state corrupted: {err}");
    }
}

fn sync_transforms_system(scenario: Res<Scenario>, mut query: Query<(&BodyIndex, &mut Transform)>) {
    for (BodyIndex(i), mut transform) in &mut query {
        if let Some(b) = scenario.tank.bodies().get(*i) {
            let (x, y) = tank_to_screen(b.x.x, b.x.y, &scenario);
            transform.translation.x = x;
            transform.translation.y = y;
        }
    }
}

/// Opacity of the connector line drawn between an interacting pair.
///
/// The strength of the repulsion is visualized by line weight in tank units:
/// `min(magnitude * STROKE_MAG_MULT, MAX_STROKE_WEIGHT)`. Gizmo lines have a
/// global width, so the weight maps onto alpha instead, normalized against
/// the cap.
pub fn force_line_alpha(force_magnitude: f64) -> f32 {
    let weight = (force_magnitude as f32 * STROKE_MAG_MULT).min(MAX_STROKE_WEIGHT);
    weight / MAX_STROKE_WEIGHT
}

// One line per interacting pair, darker the stronger the repulsion
fn draw_force_lines_system(mut gizmos: Gizmos, scenario: Res<Scenario>) {
    let tank = &scenario.tank;

    for i in 0..tank.bodies().len() {
        let neighbors = match tank.neighbors_of(i) {
            Ok(neighbors) => neighbors,
            Err(err) => panic!("simulation state corrupted: {err}"),
        };

        for j in neighbors {
            // Each pair shows up from both endpoints; draw it once
            if j <= i {
                continue;
            }

            let a = tank.bodies()[i].x;
            let b = tank.bodies()[j].x;
            let magnitude = repelling_force(a, b, &scenario.parameters).norm();

            let (ax, ay) = tank_to_screen(a.x, a.y, &scenario);
            let (bx, by) = tank_to_screen(b.x, b.y, &scenario);
            gizmos.line_2d(
                Vec2::new(ax, ay),
                Vec2::new(bx, by),
                Color::rgba(0.0, 0.0, 0.0, force_line_alpha(magnitude)),
            );
        }
    }
}

// Tank coordinates have the origin at the top-left corner with y growing
// downward; screen space is centered with y growing upward
fn tank_to_screen(x: f64, y: f64, scenario: &Scenario) -> (f32, f32) {
    let sx = (x - scenario.tank.width / 2.0) as f32 * SCALE;
    let sy = (scenario.tank.height / 2.0 - y) as f32 * SCALE;
    (sx, sy)
}
