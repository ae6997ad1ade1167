use std::f32::consts::FRAC_PI_2;

use bevy::math::Isometry3d;
use bevy::prelude::*;
use nalgebra::Vector3;

use super::components::ShowDebugGizmos;
use crate::prelude::*;
use crate::simulation::core::transforms::{
    bevy_transform_to_isometry, unit_quaternion_to_bevy_quat, vector_to_bevy_vec3,
};

/// Meters of arrow per newton of tire force.
const FORCE_ARROW_SCALE: f64 = 1.0 / 2_000.0;

// =========================================================================
// == Toggle Systems (Hotkeys) ==
// =========================================================================

/// Toggles `ShowDebugGizmos` on every vehicle with the F1 key.
pub fn toggle_wheel_gizmos(
    mut commands: Commands,
    keyboard: Res<ButtonInput<KeyCode>>,
    query: Query<(Entity, Option<&ShowDebugGizmos>), With<RaycastVehicle>>,
) {
    if keyboard.just_pressed(KeyCode::F1) {
        let are_any_on = query.iter().any(|(_, gizmo_opt)| gizmo_opt.is_some());
        for (entity, _) in &query {
            if are_any_on {
                commands.entity(entity).remove::<ShowDebugGizmos>();
            } else {
                commands.entity(entity).insert(ShowDebugGizmos);
            }
        }
        info!(
            "[Debug] Toggled wheel visuals {}",
            if are_any_on { "OFF" } else { "ON" }
        );
    }
}

// =========================================================================
// == Drawing Systems ==
// =========================================================================

pub fn draw_wheel_gizmos(
    mut gizmos: Gizmos,
    query: Query<(&RaycastVehicle, &Transform), With<ShowDebugGizmos>>,
) {
    for (vehicle, transform) in &query {
        let chassis_pose = bevy_transform_to_isometry(transform);
        let vehicle = &vehicle.0;
        let ray_length = vehicle.params().suspension.length + vehicle.params().wheel.radius;

        for id in WheelId::ALL {
            let wheel = vehicle.wheel(id);
            let telemetry = wheel.telemetry();
            let mount = vehicle.wheel_mount(&chassis_pose, id);
            let pose = wheel.world_pose(&mount);

            // --- Wheel disc, in the plane normal to the axle ---
            let disc_rotation =
                unit_quaternion_to_bevy_quat(&pose.rotation) * Quat::from_rotation_y(FRAC_PI_2);
            let disc_color = if telemetry.locked {
                Color::srgb(1.0, 0.2, 0.2)
            } else {
                Color::srgb(0.9, 0.9, 0.9)
            };
            gizmos.circle(
                Isometry3d::new(vector_to_bevy_vec3(&pose.translation.vector), disc_rotation),
                wheel.radius() as f32,
                disc_color,
            );

            // --- Suspension ray ---
            let origin = mount.translation.vector;
            let ray_end = telemetry
                .contact_point
                .unwrap_or_else(|| origin + mount.rotation * (-Vector3::y() * ray_length));
            let ray_color = if telemetry.grounded {
                Color::srgb(0.2, 1.0, 0.2)
            } else {
                Color::srgb(0.5, 0.5, 0.5)
            };
            gizmos.line(
                vector_to_bevy_vec3(&origin),
                vector_to_bevy_vec3(&ray_end),
                ray_color,
            );

            // --- Tire force ---
            if let Some(contact) = telemetry.contact_point {
                let tip = contact + telemetry.tire_force * FORCE_ARROW_SCALE;
                gizmos.arrow(
                    vector_to_bevy_vec3(&contact),
                    vector_to_bevy_vec3(&tip),
                    Color::srgb(0.2, 0.4, 1.0),
                );
            }
        }
    }
}
