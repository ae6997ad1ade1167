// traction_core/src/drivetrain/engine.rs

use crate::config::EngineParams;
use crate::error::VehicleError;
use crate::utils::math::{clamp01, rad_to_rpm, rpm_to_rad};

/// Torque-curve engine with a linear friction model.
///
/// Angular velocity always stays within `[idle_rpm, max_rpm]`; the engine
/// starts at idle.
#[derive(Debug, Clone)]
pub struct Engine {
    params: EngineParams,
    idle_angular_velocity: f64,
    max_angular_velocity: f64,
    rpm: f64,
    angular_velocity: f64,
    torque: f64,
}

impl Engine {
    pub fn new(params: EngineParams) -> Result<Self, VehicleError> {
        params.validate()?;
        let idle_angular_velocity = rpm_to_rad(params.idle_rpm);
        Ok(Self {
            idle_angular_velocity,
            max_angular_velocity: rpm_to_rad(params.max_rpm),
            rpm: params.idle_rpm,
            angular_velocity: idle_angular_velocity,
            torque: 0.0,
            params,
        })
    }

    /// Integrates one tick against `load_torque` (the clutch torque).
    /// `throttle` is clamped to `[0, 1]`.
    pub fn update(&mut self, dt: f64, throttle: f64, load_torque: f64) {
        if dt <= 0.0 {
            return;
        }
        let throttle = clamp01(throttle);

        let curve_torque = self.params.torque_curve.evaluate(self.rpm);
        let friction = self.friction_torque();
        let initial_torque = (curve_torque + friction) * throttle;
        self.torque = initial_torque - friction;

        let angular_acceleration = (self.torque - load_torque) / self.params.inertia;
        self.angular_velocity = (self.angular_velocity + angular_acceleration * dt)
            .clamp(self.idle_angular_velocity, self.max_angular_velocity);
        self.rpm = rad_to_rpm(self.angular_velocity);
    }

    /// Internal friction at the current RPM, N·m.
    pub fn friction_torque(&self) -> f64 {
        self.params.start_friction + self.params.friction_coefficient * self.rpm
    }

    pub fn rpm(&self) -> f64 {
        self.rpm
    }

    pub fn angular_velocity(&self) -> f64 {
        self.angular_velocity
    }

    /// Net torque produced on the last tick (after friction), N·m.
    pub fn torque(&self) -> f64 {
        self.torque
    }

    /// Highest value on the torque curve.
    pub fn max_torque(&self) -> f64 {
        self.params.torque_curve.peak()
    }

    pub fn params(&self) -> &EngineParams {
        &self.params
    }
}
