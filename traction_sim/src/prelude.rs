// traction_sim/src/prelude.rs

// Re-export the entire Bevy prelude for convenience.
pub use bevy::prelude::*;

// The pure vehicle types. Listed explicitly: a glob would clash with
// `bevy::prelude::Curve`.
pub use traction_core::prelude::{
    DrivetrainTelemetry, GearRequest, InputSnapshot, ShiftOutcome, Vehicle, VehicleParams,
    VehicleTelemetry, WheelId,
};

// Re-export common simulation-specific types for easy access in other plugins.
pub use crate::simulation::config::structs::{ChassisConfig, Pose, ScenarioConfig, VehicleConfig};
pub use crate::simulation::core::app_state::{AppState, SceneBuildSet, SimulationSet};
pub use crate::simulation::core::components::{DriverInput, GearShiftEvent, KeyboardControlled};
pub use crate::simulation::plugins::vehicles::raycast_car::{RaycastCarPlugin, RaycastVehicle};
