// traction_sim/src/simulation/config/structs.rs

use bevy::prelude::{Resource, Transform};
use nalgebra::{Isometry3, Translation3, UnitQuaternion, Vector3};
use serde::Deserialize;
use traction_core::prelude::VehicleParams;

// =========================================================================
// == Top-Level Configuration Resource ==
// =========================================================================

/// # ScenarioConfig
/// The Bevy resource holding all configuration for a simulation run.
/// This struct is the root of the data parsed from a `scenario.toml` file.
#[derive(Resource, Debug, Deserialize, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct ScenarioConfig {
    #[serde(default)]
    pub simulation: SimulationSettings,

    #[serde(default)]
    pub world: WorldSettings,

    // The TOML has `[[vehicles]]`, which becomes a Vec of VehicleConfig structs.
    #[serde(default)]
    pub vehicles: Vec<VehicleConfig>,
}

// =========================================================================
// == Configuration Sub-Structs ==
// =========================================================================

#[derive(Debug, Deserialize, Clone)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationSettings {
    /// Rate of the fixed physics tick, Hz.
    pub physics_hz: f64,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self { physics_hz: 60.0 }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default, deny_unknown_fields)]
pub struct WorldSettings {
    /// Global gravity vector in m/s^2.
    pub gravity: [f32; 3],
    /// Half the side length of the flat ground slab, meters.
    pub ground_half_extent: f32,
}

impl Default for WorldSettings {
    fn default() -> Self {
        Self {
            gravity: [0.0, -9.81, 0.0],
            ground_half_extent: 200.0,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct VehicleConfig {
    pub name: String,
    #[serde(default)]
    pub starting_pose: Pose,
    #[serde(default)]
    pub chassis: ChassisConfig,
    /// Everything the pure vehicle model needs. Partial tables are filled
    /// in from the reference road car.
    #[serde(default)]
    pub params: VehicleParams,
    /// Whether the keyboard drives this vehicle.
    #[serde(default)]
    pub keyboard_controlled: bool,
}

/// Rigid body of the chassis. The collider is a box centered on the body
/// origin, so the origin is also the center of mass.
#[derive(Debug, Deserialize, Clone)]
#[serde(default, deny_unknown_fields)]
pub struct ChassisConfig {
    /// kg.
    pub mass: f32,
    /// Half extents of the collision box, meters.
    pub half_extents: [f32; 3],
}

impl Default for ChassisConfig {
    fn default() -> Self {
        Self {
            mass: 1500.0,
            half_extents: [0.9, 0.4, 2.0],
        }
    }
}

// =========================================================================
// == Helper Structs for Nested Configuration ==
// =========================================================================

#[derive(Deserialize, Debug, Clone, Copy, Default)]
#[serde(default, deny_unknown_fields)]
pub struct Pose {
    pub translation: [f64; 3],
    /// `[roll, pitch, yaw]` in degrees, in the Y-up frame: roll about Z,
    /// pitch about X, yaw about Y. Positive yaw turns forward (-Z) toward -X.
    /// Applied yaw first, then pitch, then roll.
    pub rotation_deg: [f64; 3],
}

impl Pose {
    pub fn to_isometry(&self) -> Isometry3<f64> {
        let [roll, pitch, yaw] = self.rotation_deg.map(f64::to_radians);
        let rotation = UnitQuaternion::from_axis_angle(&Vector3::y_axis(), yaw)
            * UnitQuaternion::from_axis_angle(&Vector3::x_axis(), pitch)
            * UnitQuaternion::from_axis_angle(&Vector3::z_axis(), roll);
        Isometry3::from_parts(Translation3::from(Vector3::from(self.translation)), rotation)
    }

    pub fn to_bevy_transform(&self) -> Transform {
        crate::simulation::core::transforms::isometry_to_bevy_transform(&self.to_isometry())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn pose(rotation_deg: [f64; 3]) -> Pose {
        Pose {
            translation: [1.0, 2.0, 3.0],
            rotation_deg,
        }
    }

    #[test]
    fn yaw_turns_about_the_up_axis() {
        let iso = pose([0.0, 0.0, 90.0]).to_isometry();
        assert_abs_diff_eq!(iso.rotation * Vector3::y(), Vector3::y(), epsilon = 1e-12);
        assert_abs_diff_eq!(iso.rotation * -Vector3::z(), -Vector3::x(), epsilon = 1e-12);
        assert_abs_diff_eq!(iso.translation.vector, Vector3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn pitch_raises_the_nose_and_roll_keeps_heading() {
        let nose_up = pose([0.0, 30.0, 0.0]).to_isometry();
        assert!((nose_up.rotation * -Vector3::z()).y > 0.0);

        let rolled = pose([45.0, 0.0, 0.0]).to_isometry();
        assert_abs_diff_eq!(rolled.rotation * -Vector3::z(), -Vector3::z(), epsilon = 1e-12);
        assert!((rolled.rotation * Vector3::y()).x.abs() > 0.5);
    }
}
