// traction_sim/src/simulation/plugins/vehicles/raycast_car.rs

use std::f32::consts::FRAC_PI_2;

use avian3d::prelude::*;

use crate::{
    prelude::*,
    simulation::core::{
        host::{AvianHost, PhysicsWorld},
        transforms::{bevy_pose_to_isometry, isometry_to_bevy_transform, vector_to_bevy_vec3},
    },
};

// --- BEVY COMPONENTS for a ray-cast vehicle ---

/// The pure vehicle model driving this chassis body.
#[derive(Component, Debug)]
pub struct RaycastVehicle(pub Vehicle);

/// A visual-only wheel mesh that follows one wheel of a vehicle.
/// Wheels are top-level entities because their pose comes straight from the
/// vehicle model in world coordinates.
#[derive(Component, Debug, Clone, Copy)]
pub struct WheelVisual {
    pub vehicle: Entity,
    pub id: WheelId,
}

/// Added once a vehicle without a rigid body has been reported.
#[derive(Component)]
struct MissingBodyReported;

/// Throttles the speed/gear/RPM log line.
#[derive(Resource)]
struct HudTimer(Timer);

/// Shared materials so each car doesn't allocate its own.
#[derive(Resource)]
struct RaycastCarAssets {
    body_material: Handle<StandardMaterial>,
    wheel_material: Handle<StandardMaterial>,
}

// --- THE PLUGIN ---
pub struct RaycastCarPlugin;

impl Plugin for RaycastCarPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(HudTimer(Timer::from_seconds(1.0, TimerMode::Repeating)))
            .add_systems(
                OnEnter(AppState::SceneBuilding),
                (setup_raycast_car_assets, spawn_raycast_cars)
                    .chain()
                    .in_set(SceneBuildSet::ProcessVehicle),
            )
            // The wheel tick itself, once per fixed physics step.
            .add_systems(
                FixedUpdate,
                (report_vehicles_without_body, step_vehicles)
                    .chain()
                    .in_set(SimulationSet::Actuation),
            )
            // Steering smoothing and gear changes run at frame rate.
            .add_systems(
                Update,
                (
                    (smooth_steering, apply_gear_shifts).in_set(SimulationSet::Actuation),
                    (sync_wheel_visuals, log_vehicle_hud).in_set(SimulationSet::Presentation),
                ),
            );
    }
}

// --- SPAWNING ---

fn setup_raycast_car_assets(
    mut commands: Commands,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    commands.insert_resource(RaycastCarAssets {
        body_material: materials.add(Color::srgb(0.7, 0.2, 0.2)),
        wheel_material: materials.add(Color::srgb(0.1, 0.1, 0.1)),
    });
}

/// Builds a chassis body and four wheel visuals for every scenario vehicle
/// whose parameters are valid.
fn spawn_raycast_cars(
    mut commands: Commands,
    scenario: Res<ScenarioConfig>,
    assets: Res<RaycastCarAssets>,
    mut meshes: ResMut<Assets<Mesh>>,
) {
    for config in &scenario.vehicles {
        let vehicle = match Vehicle::new(config.params.clone()) {
            Ok(vehicle) => vehicle,
            Err(e) => {
                error!("[SPAWN] Skipping vehicle '{}': {}", config.name, e);
                continue;
            }
        };
        info!("[SPAWN] Spawning ray-cast vehicle '{}'.", config.name);

        let [hx, hy, hz] = config.chassis.half_extents;
        let size = Vec3::new(hx, hy, hz) * 2.0;
        let wheel = &config.params.wheel;
        let wheel_mesh = meshes.add(Cylinder::new(wheel.radius as f32, 0.3));

        let mut chassis = commands.spawn((
            Name::new(config.name.clone()),
            config.starting_pose.to_bevy_transform(),
            RigidBody::Dynamic,
            Collider::cuboid(size.x, size.y, size.z),
            Mass(config.chassis.mass),
            // Wheel forces are applied every tick, the body must never sleep.
            SleepingDisabled,
            ExternalForce::default(),
            ExternalTorque::default(),
            RaycastVehicle(vehicle),
            DriverInput::default(),
            InheritedVisibility::VISIBLE,
        ));
        chassis.with_children(|parent| {
            parent.spawn((
                Mesh3d(meshes.add(Cuboid::from_size(size))),
                MeshMaterial3d(assets.body_material.clone()),
                Name::new(format!("{}_Body", config.name)),
            ));
        });
        if config.keyboard_controlled {
            chassis.insert(KeyboardControlled);
        }
        let chassis = chassis.id();

        for id in WheelId::ALL {
            commands.spawn((
                Mesh3d(wheel_mesh.clone()),
                MeshMaterial3d(assets.wheel_material.clone()),
                Transform::default(),
                WheelVisual {
                    vehicle: chassis,
                    id,
                },
                Name::new(format!("{}_{}_Wheel", config.name, id.short_name())),
            ));
        }
    }
}

// --- RUNTIME ---

fn report_vehicles_without_body(
    mut commands: Commands,
    query: Query<
        (Entity, Option<&Name>),
        (
            With<RaycastVehicle>,
            Without<RigidBody>,
            Without<MissingBodyReported>,
        ),
    >,
) {
    for (entity, name) in &query {
        warn!(
            "Vehicle {:?} ({}) has no rigid body; its wheels are skipped.",
            entity,
            name.map(Name::as_str).unwrap_or("unnamed")
        );
        commands.entity(entity).insert(MissingBodyReported);
    }
}

/// One wheel tick per vehicle: probes the ground, integrates the wheels and
/// drivetrain, and writes the resulting net force and torque to the body.
fn step_vehicles(
    time: Res<Time>,
    physics: PhysicsWorld,
    mut vehicles: Query<
        (
            Entity,
            &mut RaycastVehicle,
            &DriverInput,
            &Position,
            &Rotation,
            &mut ExternalForce,
            &mut ExternalTorque,
        ),
        With<RigidBody>,
    >,
) {
    let dt = time.delta_secs_f64();
    for (entity, mut vehicle, input, position, rotation, mut force, mut torque) in &mut vehicles {
        let Some(chassis) = physics.body_state(entity) else {
            continue;
        };
        let pose = bevy_pose_to_isometry(&position.0, &rotation.0);
        let mut host = AvianHost::new(&physics, entity, chassis);
        vehicle.0.fixed_update(&pose, dt, &input.0, &mut host);

        force.set_force(vector_to_bevy_vec3(&host.forces.force));
        torque.set_torque(vector_to_bevy_vec3(&host.forces.torque));
    }
}

fn smooth_steering(time: Res<Time>, mut vehicles: Query<(&mut RaycastVehicle, &DriverInput)>) {
    let dt = time.delta_secs_f64();
    for (mut vehicle, input) in &mut vehicles {
        vehicle.0.update_steering(dt, input.0.steering);
    }
}

fn apply_gear_shifts(
    mut events: EventReader<GearShiftEvent>,
    mut vehicles: Query<(&mut RaycastVehicle, Option<&Name>)>,
) {
    for event in events.read() {
        let Ok((mut vehicle, name)) = vehicles.get_mut(event.vehicle) else {
            continue;
        };
        let name = name.map(Name::as_str).unwrap_or("unnamed");
        match vehicle.0.request_gear(event.request) {
            Some(outcome) => debug!("[GEAR] {}: {:?} -> {:?}", name, event.request, outcome),
            None => debug!("[GEAR] {} has no drivetrain, ignoring {:?}.", name, event.request),
        }
    }
}

/// Places each wheel mesh at its wheel's current world pose.
fn sync_wheel_visuals(
    vehicles: Query<(&RaycastVehicle, &Transform), Without<WheelVisual>>,
    mut wheels: Query<(&WheelVisual, &mut Transform)>,
) {
    for (visual, mut transform) in &mut wheels {
        let Ok((vehicle, chassis_transform)) = vehicles.get(visual.vehicle) else {
            continue;
        };
        let chassis_pose = bevy_pose_to_isometry(&chassis_transform.translation, &chassis_transform.rotation);
        let mount = vehicle.0.wheel_mount(&chassis_pose, visual.id);
        let pose = vehicle.0.wheel(visual.id).world_pose(&mount);

        // Bevy cylinders are built along Y, the wheel axle is local X.
        *transform = isometry_to_bevy_transform(&pose);
        transform.rotation *= Quat::from_rotation_z(FRAC_PI_2);
    }
}

fn log_vehicle_hud(
    time: Res<Time>,
    mut timer: ResMut<HudTimer>,
    vehicles: Query<(&RaycastVehicle, &Name), With<KeyboardControlled>>,
) {
    if !timer.0.tick(time.delta()).just_finished() {
        return;
    }
    for (vehicle, name) in &vehicles {
        let speed_kmh = vehicle.0.forward_speed() * 3.6;
        match vehicle.0.drivetrain() {
            Some(drivetrain) => info!(
                "[HUD] {}: {:.1} km/h, gear {}, {:.0} rpm",
                name,
                speed_kmh,
                drivetrain.gearbox.gear_label(),
                drivetrain.engine.rpm()
            ),
            None => info!("[HUD] {}: {:.1} km/h", name, speed_kmh),
        }
    }
}
