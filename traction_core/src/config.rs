// traction_core/src/config.rs

//! Simulation-time constants for every component of the vehicle.
//!
//! Every struct deserializes from a partial table: missing fields fall back to
//! the reference road car, unknown fields are rejected.

use nalgebra::Vector3;
use serde::Deserialize;

use crate::error::{ensure_non_negative, ensure_positive, VehicleError};
use crate::types::WheelId;
use crate::utils::curve::Curve;

// =========================================================================
// == Wheel & Suspension ==
// =========================================================================

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SuspensionParams {
    /// Free travel of the suspension, in meters.
    pub length: f64,
    /// Spring rate, N/m.
    pub spring_rate: f64,
    /// Damper rate, N·s/m.
    pub damper_rate: f64,
}

impl Default for SuspensionParams {
    fn default() -> Self {
        Self {
            length: 0.3,
            spring_rate: 35_000.0,
            damper_rate: 4_500.0,
        }
    }
}

impl SuspensionParams {
    pub fn validate(&self) -> Result<(), VehicleError> {
        ensure_positive("suspension.length", self.length)?;
        ensure_non_negative("suspension.spring_rate", self.spring_rate)?;
        ensure_non_negative("suspension.damper_rate", self.damper_rate)
    }
}

/// Shape parameters of the saturating `D·sin(C·atan(B·s − E·(B·s − atan(B·s))))` curve.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PacejkaParams {
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
}

impl Default for PacejkaParams {
    fn default() -> Self {
        Self {
            b: 10.0,
            c: 1.9,
            d: 1.0,
            e: 0.97,
        }
    }
}

/// Which tire model a wheel runs.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "PascalCase")]
pub enum TireModelKind {
    /// Longitudinal + lateral slip combined on the friction circle.
    Combined {
        #[serde(default = "default_peak_slip_angle")]
        peak_slip_angle_deg: f64,
    },
    /// Longitudinal-only slip-ratio model for straight-line drive wheels.
    Longitudinal {
        #[serde(default)]
        curve: PacejkaParams,
    },
}

fn default_peak_slip_angle() -> f64 {
    8.0
}

impl Default for TireModelKind {
    fn default() -> Self {
        TireModelKind::Combined {
            peak_slip_angle_deg: default_peak_slip_angle(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WheelParams {
    /// Kilograms.
    pub mass: f64,
    /// Meters.
    pub radius: f64,
    /// Surface friction coefficient (mu).
    pub friction_coefficient: f64,
    pub tire: TireModelKind,
}

impl Default for WheelParams {
    fn default() -> Self {
        Self {
            mass: 20.0,
            radius: 0.5,
            friction_coefficient: 1.0,
            tire: TireModelKind::default(),
        }
    }
}

impl WheelParams {
    /// Solid-disc moment of inertia, ½·m·r².
    pub fn inertia(&self) -> f64 {
        0.5 * self.mass * self.radius * self.radius
    }

    pub fn validate(&self) -> Result<(), VehicleError> {
        ensure_positive("wheel.mass", self.mass)?;
        ensure_positive("wheel.radius", self.radius)?;
        ensure_non_negative("wheel.friction_coefficient", self.friction_coefficient)?;
        if let TireModelKind::Combined {
            peak_slip_angle_deg,
        } = self.tire
        {
            if !(peak_slip_angle_deg > 0.0 && peak_slip_angle_deg <= 90.0) {
                return Err(VehicleError::param(
                    "wheel.tire.peak_slip_angle_deg",
                    format!("must be in (0, 90], got {peak_slip_angle_deg}"),
                ));
            }
        }
        Ok(())
    }
}

// =========================================================================
// == Drivetrain ==
// =========================================================================

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineParams {
    /// `[rpm, torque]` control points.
    pub torque_curve: Curve,
    /// kg·m².
    pub inertia: f64,
    pub idle_rpm: f64,
    pub max_rpm: f64,
    /// Constant part of the friction torque, N·m.
    pub start_friction: f64,
    /// RPM-proportional part of the friction torque, N·m per RPM.
    pub friction_coefficient: f64,
}

impl Default for EngineParams {
    fn default() -> Self {
        Self {
            torque_curve: Curve::from_keys_unchecked(vec![
                [0.0, 0.0],
                [1200.0, 250.0],
                [4500.0, 400.0],
                [9000.0, 0.0],
            ]),
            inertia: 0.2,
            idle_rpm: 1000.0,
            max_rpm: 7500.0,
            start_friction: 50.0,
            friction_coefficient: 0.02,
        }
    }
}

impl EngineParams {
    pub fn validate(&self) -> Result<(), VehicleError> {
        ensure_positive("engine.inertia", self.inertia)?;
        ensure_non_negative("engine.idle_rpm", self.idle_rpm)?;
        ensure_positive("engine.max_rpm", self.max_rpm)?;
        ensure_non_negative("engine.start_friction", self.start_friction)?;
        ensure_non_negative("engine.friction_coefficient", self.friction_coefficient)?;
        if self.idle_rpm >= self.max_rpm {
            return Err(VehicleError::param(
                "engine.idle_rpm",
                format!(
                    "must be below max_rpm ({} >= {})",
                    self.idle_rpm, self.max_rpm
                ),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClutchParams {
    /// N·m per rad/s of slip.
    pub stiffness: f64,
    /// Multiplier over the engine's peak torque.
    pub capacity: f64,
    /// Low-pass gain toward the new torque each tick, in `(0, 0.9]`.
    pub damping: f64,
    /// Engine RPM band over which the clutch goes from open to locked.
    pub engagement_rpm: [f64; 2],
}

impl Default for ClutchParams {
    fn default() -> Self {
        Self {
            stiffness: 30.0,
            capacity: 1.3,
            damping: 0.7,
            engagement_rpm: [1000.0, 1300.0],
        }
    }
}

impl ClutchParams {
    pub fn validate(&self) -> Result<(), VehicleError> {
        ensure_non_negative("clutch.stiffness", self.stiffness)?;
        ensure_non_negative("clutch.capacity", self.capacity)?;
        // At 0 the filter never moves off its initial zero torque.
        if !(self.damping > 0.0 && self.damping <= 0.9) {
            return Err(VehicleError::param(
                "clutch.damping",
                format!("must be in (0, 0.9], got {}", self.damping),
            ));
        }
        if self.engagement_rpm[0] >= self.engagement_rpm[1] {
            return Err(VehicleError::param(
                "clutch.engagement_rpm",
                "band must be increasing",
            ));
        }
        Ok(())
    }
}

/// Index of the neutral entry in a gear table.
pub const NEUTRAL_GEAR: usize = 1;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GearboxParams {
    /// `[reverse, neutral, first, second, ...]`.
    pub ratios: Vec<f64>,
    /// Seconds spent in neutral while changing between two driving gears.
    pub shift_time: f64,
}

impl Default for GearboxParams {
    fn default() -> Self {
        Self {
            ratios: vec![-3.73, 0.0, 3.80, 2.35, 1.52, 1.16, 0.90, 0.71],
            shift_time: 0.25,
        }
    }
}

impl GearboxParams {
    pub fn validate(&self) -> Result<(), VehicleError> {
        if self.ratios.len() < 3 {
            return Err(VehicleError::InvalidGearTable(format!(
                "need reverse, neutral and at least one forward gear, got {} entries",
                self.ratios.len()
            )));
        }
        if self.ratios[NEUTRAL_GEAR] != 0.0 {
            return Err(VehicleError::InvalidGearTable(format!(
                "neutral (index {NEUTRAL_GEAR}) must have ratio 0, got {}",
                self.ratios[NEUTRAL_GEAR]
            )));
        }
        if self.ratios.iter().any(|r| !r.is_finite()) {
            return Err(VehicleError::InvalidGearTable(
                "ratios must be finite".into(),
            ));
        }
        ensure_non_negative("gearbox.shift_time", self.shift_time)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DifferentialParams {
    pub ratio: f64,
}

impl Default for DifferentialParams {
    fn default() -> Self {
        Self { ratio: 3.9 }
    }
}

/// Which axle the differential drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum DrivenAxle {
    Front,
    #[default]
    Rear,
}

impl DrivenAxle {
    /// Left and right wheel of the driven axle.
    pub fn wheels(self) -> (WheelId, WheelId) {
        match self {
            DrivenAxle::Front => (WheelId::FrontLeft, WheelId::FrontRight),
            DrivenAxle::Rear => (WheelId::RearLeft, WheelId::RearRight),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DrivetrainParams {
    pub engine: EngineParams,
    pub clutch: ClutchParams,
    pub gearbox: GearboxParams,
    pub differential: DifferentialParams,
    pub driven_axle: DrivenAxle,
}

impl DrivetrainParams {
    pub fn validate(&self) -> Result<(), VehicleError> {
        self.engine.validate()?;
        self.clutch.validate()?;
        self.gearbox.validate()?;
        if !self.differential.ratio.is_finite() {
            return Err(VehicleError::param(
                "differential.ratio",
                "must be finite",
            ));
        }
        Ok(())
    }
}

// =========================================================================
// == Chassis & Steering ==
// =========================================================================

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SteeringParams {
    /// Distance between front and rear axles, meters.
    pub wheelbase: f64,
    /// Distance between left and right wheels, meters.
    pub track_width: f64,
    pub max_steering_angle_deg: f64,
    /// How fast the smoothed steering angle follows the input, deg/s.
    pub steering_rate_deg: f64,
}

impl Default for SteeringParams {
    fn default() -> Self {
        Self {
            wheelbase: 3.12,
            track_width: 1.5,
            max_steering_angle_deg: 40.0,
            steering_rate_deg: 200.0,
        }
    }
}

impl SteeringParams {
    pub fn validate(&self) -> Result<(), VehicleError> {
        ensure_positive("steering.wheelbase", self.wheelbase)?;
        ensure_non_negative("steering.track_width", self.track_width)?;
        ensure_non_negative("steering.max_steering_angle_deg", self.max_steering_angle_deg)?;
        ensure_non_negative("steering.steering_rate_deg", self.steering_rate_deg)?;
        // The inner-wheel Ackermann divisor is `wheelbase - track_width / 2`.
        if self.track_width * 0.5 >= self.wheelbase {
            return Err(VehicleError::param(
                "steering.track_width",
                "half the track width must be shorter than the wheelbase",
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VehicleParams {
    pub suspension: SuspensionParams,
    pub wheel: WheelParams,
    pub steering: SteeringParams,
    /// Brake torque per wheel at full brake input, N·m.
    pub max_brake_torque: f64,
    /// Height of the suspension hardpoints above the chassis origin, meters.
    pub mount_height: f64,
    /// `None` builds a vehicle that can steer and brake but has no engine.
    pub drivetrain: Option<DrivetrainParams>,
}

impl Default for VehicleParams {
    fn default() -> Self {
        Self {
            suspension: SuspensionParams::default(),
            wheel: WheelParams::default(),
            steering: SteeringParams::default(),
            max_brake_torque: 8_000.0,
            mount_height: 0.0,
            drivetrain: Some(DrivetrainParams::default()),
        }
    }
}

impl VehicleParams {
    pub fn validate(&self) -> Result<(), VehicleError> {
        self.suspension.validate()?;
        self.wheel.validate()?;
        self.steering.validate()?;
        ensure_non_negative("max_brake_torque", self.max_brake_torque)?;
        if let Some(drivetrain) = &self.drivetrain {
            drivetrain.validate()?;
        }
        Ok(())
    }

    /// Hardpoint of a wheel in the chassis frame (+X right, +Y up, -Z forward).
    pub fn mount_offset(&self, wheel: WheelId) -> Vector3<f64> {
        let half_track = self.steering.track_width * 0.5;
        let half_base = self.steering.wheelbase * 0.5;
        let x = match wheel {
            WheelId::FrontLeft | WheelId::RearLeft => -half_track,
            WheelId::FrontRight | WheelId::RearRight => half_track,
        };
        let z = if wheel.is_front() { -half_base } else { half_base };
        Vector3::new(x, self.mount_height, z)
    }
}
