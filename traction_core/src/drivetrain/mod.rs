// traction_core/src/drivetrain/mod.rs

//! Engine → clutch → gearbox → differential chain.
//!
//! Torque flows down the chain to the driven wheels, angular velocity flows
//! back up from them. Each tick the owner calls, in order:
//! [`Drivetrain::wheel_torques`], then (after the wheels have been
//! integrated) [`Drivetrain::update`], then [`Drivetrain::advance`].

pub mod clutch;
pub mod differential;
pub mod engine;
pub mod gearbox;

use crate::config::{DrivenAxle, DrivetrainParams};
use crate::error::VehicleError;

use clutch::Clutch;
use differential::Differential;
use engine::Engine;
use gearbox::{Gearbox, ShiftOutcome};

/// Drivetrain state for observers.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DrivetrainTelemetry {
    pub rpm: f64,
    pub engine_torque: f64,
    pub clutch_torque: f64,
    pub clutch_lock: f64,
    pub clutch_slip: f64,
    pub gear: usize,
    pub gear_label: String,
    pub gear_ratio: f64,
    pub shifting: bool,
}

#[derive(Debug, Clone)]
pub struct Drivetrain {
    pub engine: Engine,
    pub clutch: Clutch,
    pub gearbox: Gearbox,
    pub differential: Differential,
    driven_axle: DrivenAxle,
}

impl Drivetrain {
    pub fn new(params: DrivetrainParams) -> Result<Self, VehicleError> {
        params.validate()?;
        let engine = Engine::new(params.engine)?;
        let clutch = Clutch::new(params.clutch, engine.max_torque())?;
        Ok(Self {
            clutch,
            engine,
            gearbox: Gearbox::new(params.gearbox)?,
            differential: Differential::new(&params.differential),
            driven_axle: params.driven_axle,
        })
    }

    pub fn driven_axle(&self) -> DrivenAxle {
        self.driven_axle
    }

    /// Runs the shift timer. Call once the tick's torques have been used.
    pub fn advance(&mut self, dt: f64) {
        self.gearbox.update(dt);
    }

    /// Drive torque for the `(left, right)` wheels of the driven axle, from
    /// the clutch torque of the previous tick.
    pub fn wheel_torques(&self) -> (f64, f64) {
        let gearbox_torque = self.gearbox.output_torque(self.clutch.torque());
        self.differential.output_torque(gearbox_torque)
    }

    /// Closes the loop from the driven wheels' spin back to the engine.
    pub fn update(&mut self, dt: f64, throttle: f64, left_wheel: f64, right_wheel: f64) {
        if dt <= 0.0 {
            return;
        }
        let differential_input = self.differential.input_shaft_velocity(left_wheel, right_wheel);
        let clutch_shaft = self.gearbox.input_shaft_velocity(differential_input);
        let clutch_torque = self.clutch.update(
            clutch_shaft,
            self.engine.angular_velocity(),
            self.gearbox.ratio(),
        );
        self.engine.update(dt, throttle, clutch_torque);
    }

    pub fn shift_up(&mut self) -> ShiftOutcome {
        self.gearbox.shift_up()
    }

    pub fn shift_down(&mut self) -> ShiftOutcome {
        self.gearbox.shift_down()
    }

    pub fn telemetry(&self) -> DrivetrainTelemetry {
        DrivetrainTelemetry {
            rpm: self.engine.rpm(),
            engine_torque: self.engine.torque(),
            clutch_torque: self.clutch.torque(),
            clutch_lock: self.clutch.lock(),
            clutch_slip: self.clutch.slip(),
            gear: self.gearbox.gear(),
            gear_label: self.gearbox.gear_label(),
            gear_ratio: self.gearbox.ratio(),
            shifting: self.gearbox.is_shifting(),
        }
    }
}
