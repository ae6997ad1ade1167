// traction_core/src/vehicle/mod.rs

//! The four-wheeled vehicle: wheels, steering and (optionally) a drivetrain,
//! stepped together once per physics tick.

pub mod input;
pub mod steering;

use nalgebra::{Isometry3, Translation3, Vector3};
use tracing::warn;

use crate::config::VehicleParams;
use crate::drivetrain::gearbox::ShiftOutcome;
use crate::drivetrain::{Drivetrain, DrivetrainTelemetry};
use crate::error::VehicleError;
use crate::models::wheel::{Wheel, WheelTelemetry};
use crate::types::{PhysicsHost, WheelId};

use input::{GearRequest, InputSnapshot};
use steering::Steering;

/// Snapshot of the whole vehicle after a tick.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VehicleTelemetry {
    pub wheels: [WheelTelemetry; 4],
    pub drivetrain: Option<DrivetrainTelemetry>,
    pub steering_angle_deg: f64,
    /// Chassis velocity along its forward axis, m/s.
    pub forward_speed: f64,
}

#[derive(Debug, Clone)]
pub struct Vehicle {
    params: VehicleParams,
    wheels: [Wheel; 4],
    steering: Steering,
    drivetrain: Option<Drivetrain>,
    forward_speed: f64,
}

impl Vehicle {
    /// Builds every component up front. Fails on the first invalid parameter.
    pub fn new(params: VehicleParams) -> Result<Self, VehicleError> {
        params.validate()?;

        let build_wheel = || Wheel::new(params.wheel.clone(), params.suspension.clone());
        let wheels = [build_wheel()?, build_wheel()?, build_wheel()?, build_wheel()?];
        let drivetrain = params.drivetrain.clone().map(Drivetrain::new).transpose()?;

        Ok(Self {
            steering: Steering::new(params.steering.clone()),
            wheels,
            drivetrain,
            forward_speed: 0.0,
            params,
        })
    }

    /// Smooths steering toward the driver input. Runs at frame rate; the
    /// result is picked up by the next [`Vehicle::fixed_update`].
    pub fn update_steering(&mut self, dt: f64, steering_input: f64) -> f64 {
        self.steering.update(dt, steering_input)
    }

    /// Forwards a gear change to the gearbox. `None` without a drivetrain.
    pub fn request_gear(&mut self, request: GearRequest) -> Option<ShiftOutcome> {
        let drivetrain = self.drivetrain.as_mut()?;
        Some(match request {
            GearRequest::Up => drivetrain.shift_up(),
            GearRequest::Down => drivetrain.shift_down(),
        })
    }

    /// One physics tick.
    ///
    /// Order: brake and steer inputs, drive torque, all four wheels
    /// (suspension, spin, tire), the drivetrain velocity stream and engine,
    /// then the shift timer.
    pub fn fixed_update(
        &mut self,
        chassis_pose: &Isometry3<f64>,
        dt: f64,
        input: &InputSnapshot,
        host: &mut dyn PhysicsHost,
    ) {
        if dt <= 0.0 {
            warn!(dt, "skipping vehicle tick with non-positive dt");
            return;
        }
        let input = input.clamped();

        // --- Driver inputs ---
        let brake_torque = input.brake * self.params.max_brake_torque;
        let (left_steer, right_steer) = self.steering.wheel_angles();
        for id in WheelId::ALL {
            let wheel = &mut self.wheels[id.index()];
            wheel.brake_torque = brake_torque;
            wheel.steer_angle_deg = match id {
                WheelId::FrontLeft => left_steer,
                WheelId::FrontRight => right_steer,
                WheelId::RearLeft | WheelId::RearRight => 0.0,
            };
        }

        // --- Torque stream ---
        if let Some(drivetrain) = self.drivetrain.as_ref() {
            let (left, right) = drivetrain.driven_axle().wheels();
            let (left_torque, right_torque) = drivetrain.wheel_torques();
            self.wheels[left.index()].drive_torque = left_torque;
            self.wheels[right.index()].drive_torque = right_torque;
        }

        // --- Wheels ---
        for id in WheelId::ALL {
            let mount = self.wheel_mount(chassis_pose, id);
            self.wheels[id.index()].update(&mount, dt, host);
        }

        // --- Velocity stream ---
        if let Some(drivetrain) = self.drivetrain.as_mut() {
            let (left, right) = drivetrain.driven_axle().wheels();
            drivetrain.update(
                dt,
                input.throttle,
                self.wheels[left.index()].angular_velocity(),
                self.wheels[right.index()].angular_velocity(),
            );
            // Last, so a shift holds neutral for every tick of its shift time.
            drivetrain.advance(dt);
        }

        let forward = chassis_pose.rotation * -Vector3::z();
        self.forward_speed = host
            .chassis_point_velocity(&chassis_pose.translation.vector)
            .dot(&forward);
    }

    /// World pose of a wheel's suspension hardpoint, before steering.
    pub fn wheel_mount(&self, chassis_pose: &Isometry3<f64>, id: WheelId) -> Isometry3<f64> {
        chassis_pose * Translation3::from(self.params.mount_offset(id))
    }

    /// World pose of each wheel center, for visuals.
    pub fn wheel_poses(&self, chassis_pose: &Isometry3<f64>) -> [Isometry3<f64>; 4] {
        WheelId::ALL.map(|id| self.wheels[id.index()].world_pose(&self.wheel_mount(chassis_pose, id)))
    }

    pub fn wheel(&self, id: WheelId) -> &Wheel {
        &self.wheels[id.index()]
    }

    pub fn drivetrain(&self) -> Option<&Drivetrain> {
        self.drivetrain.as_ref()
    }

    pub fn steering_angle_deg(&self) -> f64 {
        self.steering.angle_deg()
    }

    pub fn forward_speed(&self) -> f64 {
        self.forward_speed
    }

    pub fn params(&self) -> &VehicleParams {
        &self.params
    }

    pub fn telemetry(&self) -> VehicleTelemetry {
        VehicleTelemetry {
            wheels: WheelId::ALL.map(|id| self.wheels[id.index()].telemetry()),
            drivetrain: self.drivetrain.as_ref().map(Drivetrain::telemetry),
            steering_angle_deg: self.steering.angle_deg(),
            forward_speed: self.forward_speed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DrivenAxle, SteeringParams};
    use crate::testing::FlatGround;
    use approx::assert_abs_diff_eq;

    const DT: f64 = 0.02;

    fn chassis_at(height: f64) -> Isometry3<f64> {
        Isometry3::translation(0.0, height, 0.0)
    }

    #[test]
    fn rejects_invalid_params() {
        let params = VehicleParams {
            steering: SteeringParams {
                wheelbase: 0.5,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(Vehicle::new(params).is_err());
    }

    #[test]
    fn resting_vehicle_is_held_up_by_all_four_wheels() {
        let mut vehicle = Vehicle::new(VehicleParams::default()).unwrap();
        let mut ground = FlatGround::at_height(0.0);
        vehicle.fixed_update(&chassis_at(0.6), DT, &InputSnapshot::default(), &mut ground);

        for id in WheelId::ALL {
            assert!(vehicle.wheel(id).is_grounded(), "{id:?} in the air");
        }
        assert!(ground.total_force().y > 0.0);
        assert_abs_diff_eq!(ground.total_force().x, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn non_positive_dt_is_skipped() {
        let mut vehicle = Vehicle::new(VehicleParams::default()).unwrap();
        let mut ground = FlatGround::at_height(0.0);
        vehicle.fixed_update(&chassis_at(0.6), 0.0, &InputSnapshot::default(), &mut ground);
        assert!(ground.applied.is_empty());
    }

    #[test]
    fn brake_at_standstill_locks_every_wheel() {
        let mut vehicle = Vehicle::new(VehicleParams::default()).unwrap();
        let mut ground = FlatGround::at_height(0.0);
        let input = InputSnapshot {
            brake: 0.5,
            ..Default::default()
        };
        vehicle.fixed_update(&chassis_at(0.6), DT, &input, &mut ground);

        for id in WheelId::ALL {
            let wheel = vehicle.wheel(id);
            assert_eq!(wheel.brake_torque, 4_000.0);
            assert!(wheel.is_locked());
            assert_eq!(wheel.angular_velocity(), 0.0);
        }
    }

    #[test]
    fn steering_reaches_front_wheels_only() {
        let mut vehicle = Vehicle::new(VehicleParams::default()).unwrap();
        let mut ground = FlatGround::at_height(0.0);
        vehicle.update_steering(0.1, 1.0);
        vehicle.fixed_update(&chassis_at(0.6), DT, &InputSnapshot::default(), &mut ground);

        let fl = vehicle.wheel(WheelId::FrontLeft).steer_angle_deg;
        let fr = vehicle.wheel(WheelId::FrontRight).steer_angle_deg;
        assert!(fr > fl && fl > 0.0);
        assert_eq!(vehicle.wheel(WheelId::RearLeft).steer_angle_deg, 0.0);
        assert_eq!(vehicle.wheel(WheelId::RearRight).steer_angle_deg, 0.0);
    }

    #[test]
    fn engine_drives_rear_axle_once_in_gear() {
        let mut vehicle = Vehicle::new(VehicleParams::default()).unwrap();
        let mut ground = FlatGround::at_height(0.0);
        assert_eq!(
            vehicle.request_gear(GearRequest::Up),
            Some(ShiftOutcome::Engaged(2))
        );

        let input = InputSnapshot {
            throttle: 1.0,
            ..Default::default()
        };
        // Tick 1 revs the engine off idle, tick 2 closes the clutch, tick 3
        // puts torque on the wheels.
        for _ in 0..3 {
            vehicle.fixed_update(&chassis_at(0.6), DT, &input, &mut ground);
        }

        assert!(vehicle.wheel(WheelId::RearLeft).angular_velocity() > 0.0);
        assert!(vehicle.wheel(WheelId::RearRight).angular_velocity() > 0.0);
        assert_eq!(vehicle.wheel(WheelId::FrontLeft).drive_torque, 0.0);
        assert_eq!(vehicle.wheel(WheelId::FrontLeft).angular_velocity(), 0.0);

        let t = vehicle.telemetry();
        assert!(t.drivetrain.is_some_and(|d| d.rpm > 1000.0));
    }

    #[test]
    fn upshift_cuts_drive_for_the_whole_shift_time() {
        let mut vehicle = Vehicle::new(VehicleParams::default()).unwrap();
        let mut ground = FlatGround::at_height(0.0);
        let input = InputSnapshot {
            throttle: 1.0,
            ..Default::default()
        };
        let dt = 0.05;

        vehicle.request_gear(GearRequest::Up);
        for _ in 0..20 {
            vehicle.fixed_update(&chassis_at(0.6), dt, &input, &mut ground);
        }
        assert_ne!(vehicle.wheel(WheelId::RearLeft).drive_torque, 0.0);

        assert_eq!(
            vehicle.request_gear(GearRequest::Up),
            Some(ShiftOutcome::Started { target: 3 })
        );
        let mut cut_ticks = Vec::new();
        for tick in 0..10 {
            vehicle.fixed_update(&chassis_at(0.6), dt, &input, &mut ground);
            if vehicle.wheel(WheelId::RearLeft).drive_torque == 0.0 {
                cut_ticks.push(tick);
            }
        }
        // shift_time 0.25 s at 0.05 s per tick.
        assert_eq!(cut_ticks, vec![0, 1, 2, 3, 4]);
        let drivetrain = vehicle.telemetry().drivetrain.unwrap();
        assert_eq!(drivetrain.gear_label, "2");
        assert!(!drivetrain.shifting);
    }

    #[test]
    fn front_axle_can_be_driven() {
        let mut params = VehicleParams::default();
        if let Some(drivetrain) = params.drivetrain.as_mut() {
            drivetrain.driven_axle = DrivenAxle::Front;
        }
        let mut vehicle = Vehicle::new(params).unwrap();
        let mut ground = FlatGround::at_height(0.0);
        vehicle.request_gear(GearRequest::Up);
        let input = InputSnapshot {
            throttle: 1.0,
            ..Default::default()
        };
        for _ in 0..3 {
            vehicle.fixed_update(&chassis_at(0.6), DT, &input, &mut ground);
        }
        assert!(vehicle.wheel(WheelId::FrontLeft).drive_torque > 0.0);
        assert_eq!(vehicle.wheel(WheelId::RearLeft).drive_torque, 0.0);
    }

    #[test]
    fn vehicle_without_drivetrain_still_rolls_and_steers() {
        let params = VehicleParams {
            drivetrain: None,
            ..Default::default()
        };
        let mut vehicle = Vehicle::new(params).unwrap();
        assert_eq!(vehicle.request_gear(GearRequest::Up), None);

        let mut ground = FlatGround::at_height(0.0).moving(Vector3::new(0.0, 0.0, -5.0));
        vehicle.fixed_update(&chassis_at(0.6), DT, &InputSnapshot::default(), &mut ground);
        assert_abs_diff_eq!(vehicle.forward_speed(), 5.0, epsilon = 1e-12);
        assert!(vehicle.telemetry().drivetrain.is_none());
    }

    #[test]
    fn wheel_poses_sit_below_their_mounts() {
        let vehicle = Vehicle::new(VehicleParams::default()).unwrap();
        let chassis = chassis_at(1.0);
        let poses = vehicle.wheel_poses(&chassis);
        for id in WheelId::ALL {
            let mount = vehicle.wheel_mount(&chassis, id);
            let pose = poses[id.index()];
            assert_abs_diff_eq!(pose.translation.x, mount.translation.x, epsilon = 1e-12);
            assert_abs_diff_eq!(pose.translation.y, 0.7, epsilon = 1e-12);
        }
    }
}
