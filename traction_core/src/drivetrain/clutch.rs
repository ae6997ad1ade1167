// traction_core/src/drivetrain/clutch.rs

use crate::config::ClutchParams;
use crate::error::VehicleError;
use crate::utils::math::{map_range_clamped, rad_to_rpm};

/// Friction clutch between the engine and the gearbox input shaft.
///
/// Transmitted torque is proportional to slip, scaled by an RPM-dependent
/// lock fraction, capped at `engine_max_torque * capacity` and low-pass
/// filtered from tick to tick.
#[derive(Debug, Clone)]
pub struct Clutch {
    params: ClutchParams,
    max_torque: f64,
    torque: f64,
    slip: f64,
    lock: f64,
}

impl Clutch {
    pub fn new(params: ClutchParams, engine_max_torque: f64) -> Result<Self, VehicleError> {
        params.validate()?;
        Ok(Self {
            max_torque: engine_max_torque.abs() * params.capacity,
            params,
            torque: 0.0,
            slip: 0.0,
            lock: 0.0,
        })
    }

    /// Recomputes the transmitted torque.
    ///
    /// `output_shaft_velocity` is the gearbox input shaft speed as seen from
    /// the wheels; `gearbox_ratio` is the currently engaged ratio.
    pub fn update(
        &mut self,
        output_shaft_velocity: f64,
        engine_angular_velocity: f64,
        gearbox_ratio: f64,
    ) -> f64 {
        // No drive path in neutral: nothing to slip against.
        let engaged = if gearbox_ratio == 0.0 { 0.0 } else { 1.0 };
        self.slip = (engine_angular_velocity - output_shaft_velocity) * engaged;

        let mut lock = map_range_clamped(
            rad_to_rpm(engine_angular_velocity),
            self.params.engagement_rpm[0],
            self.params.engagement_rpm[1],
            0.0,
            1.0,
        );
        if gearbox_ratio == 0.0 {
            lock += 1.0;
        }
        self.lock = lock.min(1.0);

        let raw = (self.slip * self.lock * self.params.stiffness)
            .clamp(-self.max_torque, self.max_torque);
        self.torque += (raw - self.torque) * self.params.damping;
        self.torque
    }

    /// Torque transmitted on the last update, N·m.
    pub fn torque(&self) -> f64 {
        self.torque
    }

    /// Engine minus shaft angular velocity, rad/s. Zero in neutral.
    pub fn slip(&self) -> f64 {
        self.slip
    }

    /// 0 fully slipping, 1 fully locked.
    pub fn lock(&self) -> f64 {
        self.lock
    }

    pub fn max_torque(&self) -> f64 {
        self.max_torque
    }
}
