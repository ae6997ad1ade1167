// traction_core/src/prelude.rs

// --- Host boundary (what an engine adapter implements) ---
pub use crate::types::{BodyHandle, GroundHit, PhysicsHost, WheelId};

// --- Configuration & errors ---
pub use crate::config::{
    ClutchParams, DifferentialParams, DrivenAxle, DrivetrainParams, EngineParams, GearboxParams,
    PacejkaParams, SteeringParams, SuspensionParams, TireModelKind, VehicleParams, WheelParams,
};
pub use crate::error::VehicleError;
pub use crate::utils::curve::Curve;

// --- Components ---
pub use crate::drivetrain::gearbox::{ShiftOutcome, ShiftState};
pub use crate::drivetrain::{Drivetrain, DrivetrainTelemetry};
pub use crate::models::tire::{TireInput, TireModel, TireOutput};
pub use crate::models::wheel::{Wheel, WheelTelemetry};

// --- The vehicle ---
pub use crate::vehicle::input::{GearRequest, InputSnapshot};
pub use crate::vehicle::{Vehicle, VehicleTelemetry};
