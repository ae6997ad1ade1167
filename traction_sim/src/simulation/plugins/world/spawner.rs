// traction_sim/src/simulation/plugins/world/spawner.rs

use crate::prelude::*;
use avian3d::prelude::*;

/// Camera offset behind and above the followed vehicle, chassis frame.
const CHASE_OFFSET: Vec3 = Vec3::new(0.0, 3.0, 9.0);
/// Fraction of the remaining distance the camera closes per second.
const CHASE_STIFFNESS: f32 = 4.0;

/// Marker for the camera that chases the keyboard-driven vehicle.
#[derive(Component)]
pub struct ChaseCamera;

pub struct WorldSpawnerPlugin;

impl Plugin for WorldSpawnerPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            OnEnter(AppState::SceneBuilding),
            (spawn_lighting_and_camera, spawn_ground).in_set(SceneBuildSet::World),
        )
        .add_systems(Update, follow_vehicle.in_set(SimulationSet::Presentation));
    }
}

fn spawn_lighting_and_camera(mut commands: Commands) {
    // --- Spawn Lighting ---
    commands.spawn((
        DirectionalLight {
            shadows_enabled: true,
            illuminance: 15_000.0,
            ..default()
        },
        Transform::from_xyz(20.0, 40.0, 10.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));

    // --- Spawn Camera ---
    commands.spawn((
        Camera3d::default(),
        Transform::from_xyz(-15.0, 10.0, 15.0).looking_at(Vec3::ZERO, Vec3::Y),
        ChaseCamera,
    ));
}

/// A flat static slab whose top face is the `y = 0` plane.
fn spawn_ground(
    mut commands: Commands,
    scenario: Res<ScenarioConfig>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let half = scenario.world.ground_half_extent;
    let thickness = 1.0;
    info!("[SCENE] Spawning {0}x{0} m ground.", half * 2.0);

    commands.spawn((
        Name::new("Ground"),
        RigidBody::Static,
        Collider::cuboid(half * 2.0, thickness, half * 2.0),
        Mesh3d(meshes.add(Cuboid::new(half * 2.0, thickness, half * 2.0))),
        MeshMaterial3d(materials.add(Color::srgb(0.3, 0.5, 0.3))),
        Transform::from_xyz(0.0, -thickness * 0.5, 0.0),
    ));
}

/// Eases the camera toward a point behind the first keyboard-driven vehicle.
fn follow_vehicle(
    time: Res<Time>,
    vehicles: Query<&Transform, (With<KeyboardControlled>, Without<ChaseCamera>)>,
    mut cameras: Query<&mut Transform, With<ChaseCamera>>,
) {
    let Some(target) = vehicles.iter().next() else {
        return;
    };
    // Only yaw is followed so the view doesn't roll with the body.
    let (yaw, _, _) = target.rotation.to_euler(EulerRot::YXZ);
    let desired = target.translation + Quat::from_rotation_y(yaw) * CHASE_OFFSET;
    let blend = (CHASE_STIFFNESS * time.delta_secs()).clamp(0.0, 1.0);

    for mut camera in &mut cameras {
        camera.translation = camera.translation.lerp(desired, blend);
        camera.look_at(target.translation, Vec3::Y);
    }
}
