// traction_core/src/models/wheel.rs

use nalgebra::{Isometry3, Translation3, Unit, UnitQuaternion, Vector3};
use std::f64::consts::TAU;

use crate::config::{SuspensionParams, WheelParams};
use crate::error::VehicleError;
use crate::models::suspension::Suspension;
use crate::models::tire::{build_tire_model, TireInput, TireModel, TireOutput};
use crate::types::PhysicsHost;
use crate::utils::math::sign;

/// Axes of a steered wheel in world space.
#[derive(Debug, Clone, Copy)]
pub struct WheelAxes {
    pub right: Unit<Vector3<f64>>,
    pub up: Unit<Vector3<f64>>,
    pub forward: Unit<Vector3<f64>>,
}

/// Rotation of a wheel mount after steering. Mount-local axes are +X right,
/// +Y up, -Z forward; a positive angle turns the wheel toward its right.
pub fn steered_rotation(mount: &Isometry3<f64>, steer_angle_deg: f64) -> UnitQuaternion<f64> {
    mount.rotation * UnitQuaternion::from_axis_angle(&Vector3::y_axis(), -steer_angle_deg.to_radians())
}

impl WheelAxes {
    pub fn from_rotation(rotation: &UnitQuaternion<f64>) -> Self {
        Self {
            right: rotation * Vector3::x_axis(),
            up: rotation * Vector3::y_axis(),
            forward: rotation * -Vector3::z_axis(),
        }
    }
}

/// Everything an observer may want to know about a wheel after a tick.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WheelTelemetry {
    pub grounded: bool,
    pub compression: f64,
    pub load: f64,
    pub suspension_force: f64,
    pub angular_velocity: f64,
    pub locked: bool,
    pub steer_angle_deg: f64,
    /// Contact velocity as `(right, up, forward)` components.
    pub contact_velocity: Vector3<f64>,
    pub longitudinal_slip_velocity: f64,
    pub tire: TireOutput,
    pub center: Vector3<f64>,
    pub contact_point: Option<Vector3<f64>>,
    /// Tire force applied this tick, world frame.
    pub tire_force: Vector3<f64>,
}

/// One ray-cast wheel: suspension strut, tire and spinning mass.
///
/// Inputs (`drive_torque`, `brake_torque`, `steer_angle_deg`) are written by
/// the vehicle before `update` and held until changed.
#[derive(Debug, Clone)]
pub struct Wheel {
    params: WheelParams,
    inertia: f64,
    suspension: Suspension,
    tire: Box<dyn TireModel>,

    pub drive_torque: f64,
    /// Always applied against the direction of spin; expected `>= 0`.
    pub brake_torque: f64,
    pub steer_angle_deg: f64,

    angular_velocity: f64,
    /// Accumulated spin, radians in `[0, 2π)`.
    rotation: f64,
    locked: bool,
    /// Road torque from the previous tire update; consumed by the next integration.
    reaction_torque: f64,
    contact_velocity: Vector3<f64>,
    longitudinal_slip_velocity: f64,
    tire_output: TireOutput,
    center: Vector3<f64>,
    contact_point: Option<Vector3<f64>>,
    tire_force: Vector3<f64>,
}

impl Wheel {
    pub fn new(params: WheelParams, suspension: SuspensionParams) -> Result<Self, VehicleError> {
        params.validate()?;
        suspension.validate()?;
        Ok(Self {
            inertia: params.inertia(),
            suspension: Suspension::new(suspension, params.radius),
            tire: build_tire_model(&params),
            params,
            drive_torque: 0.0,
            brake_torque: 0.0,
            steer_angle_deg: 0.0,
            angular_velocity: 0.0,
            rotation: 0.0,
            locked: false,
            reaction_torque: 0.0,
            contact_velocity: Vector3::zeros(),
            longitudinal_slip_velocity: 0.0,
            tire_output: TireOutput::default(),
            center: Vector3::zeros(),
            contact_point: None,
            tire_force: Vector3::zeros(),
        })
    }

    /// Runs one physics tick: suspension, spin integration, tire forces.
    ///
    /// `mount` is the world pose of the suspension hardpoint before steering.
    pub fn update(&mut self, mount: &Isometry3<f64>, dt: f64, host: &mut dyn PhysicsHost) {
        if dt <= 0.0 {
            return;
        }

        let axes = WheelAxes::from_rotation(&steered_rotation(mount, self.steer_angle_deg));
        let origin = mount.translation.vector;

        // --- 1. Suspension ---
        let strut_force = self.suspension.update(&*host, &origin, &axes.up, dt);
        host.apply_force_at_point(&(axes.up.into_inner() * strut_force), &origin);
        self.center = self.suspension.wheel_center(&origin, &axes.up);
        self.contact_point = self
            .suspension
            .contact()
            .map(|hit| origin - axes.up.into_inner() * hit.distance);

        // --- 2. Contact-patch velocity relative to whatever we stand on ---
        let mut velocity = host.chassis_point_velocity(&self.center);
        if let Some(ground_velocity) = self
            .suspension
            .contact()
            .and_then(|hit| hit.body)
            .and_then(|body| host.body_point_velocity(body, &self.center))
        {
            velocity -= ground_velocity;
        }
        self.contact_velocity = Vector3::new(
            velocity.dot(&*axes.right),
            velocity.dot(&*axes.up),
            velocity.dot(&*axes.forward),
        );

        // --- 3. Spin ---
        self.integrate_rotation(dt);
        self.longitudinal_slip_velocity =
            self.angular_velocity * self.params.radius - self.contact_velocity.z;

        // --- 4. Tire ---
        let input = TireInput {
            lateral_velocity: self.contact_velocity.x,
            longitudinal_velocity: self.contact_velocity.z,
            speed: self.contact_velocity.norm(),
            angular_velocity: self.angular_velocity,
            longitudinal_slip_velocity: self.longitudinal_slip_velocity,
            radius: self.params.radius,
            inertia: self.inertia,
            load: self.suspension.load(),
            locked: self.locked,
            dt,
        };
        self.tire_output = self.tire.update(&input);
        self.reaction_torque = self.tire_output.reaction_torque;

        self.tire_force = Vector3::zeros();
        if let Some(contact_point) = self.contact_point {
            let normal = self.suspension.contact_normal();
            let forward = project_on_plane(&axes.forward, normal);
            let right = project_on_plane(&axes.right, normal);
            self.tire_force = forward * self.tire_output.longitudinal_force
                + right * self.tire_output.lateral_force;
            host.apply_force_at_point(&self.tire_force, &contact_point);
        }
    }

    /// Integrates spin from drive, road reaction and brake torque.
    ///
    /// Braking that would reverse the spin direction stops the wheel dead and
    /// marks it locked instead.
    pub fn integrate_rotation(&mut self, dt: f64) {
        self.angular_velocity += (self.drive_torque - self.reaction_torque) / self.inertia * dt;

        let spin_direction = sign(self.angular_velocity);
        self.angular_velocity -= spin_direction * self.brake_torque / self.inertia * dt;

        if sign(self.angular_velocity) != spin_direction {
            self.angular_velocity = 0.0;
            self.locked = true;
        } else {
            self.locked = false;
        }

        self.rotation = (self.rotation + self.angular_velocity * dt).rem_euclid(TAU);
    }

    /// World pose of the wheel center for visuals: steered, spun, and pushed
    /// down the strut by the unused travel.
    pub fn world_pose(&self, mount: &Isometry3<f64>) -> Isometry3<f64> {
        let steered = steered_rotation(mount, self.steer_angle_deg);
        let up = steered * Vector3::y_axis();
        let position = self.suspension.wheel_center(&mount.translation.vector, &up);
        // Positive spin rolls the wheel forward: the top moves toward -Z.
        let spin = UnitQuaternion::from_axis_angle(&Vector3::x_axis(), -self.rotation);
        Isometry3::from_parts(Translation3::from(position), steered * spin)
    }

    pub fn telemetry(&self) -> WheelTelemetry {
        WheelTelemetry {
            grounded: self.suspension.is_grounded(),
            compression: self.suspension.compression(),
            load: self.suspension.load(),
            suspension_force: self.suspension.force(),
            angular_velocity: self.angular_velocity,
            locked: self.locked,
            steer_angle_deg: self.steer_angle_deg,
            contact_velocity: self.contact_velocity,
            longitudinal_slip_velocity: self.longitudinal_slip_velocity,
            tire: self.tire_output,
            center: self.center,
            contact_point: self.contact_point,
            tire_force: self.tire_force,
        }
    }

    pub fn angular_velocity(&self) -> f64 {
        self.angular_velocity
    }

    /// Overrides spin, e.g. when placing a vehicle that is already moving.
    pub fn set_angular_velocity(&mut self, angular_velocity: f64) {
        self.angular_velocity = angular_velocity;
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn is_grounded(&self) -> bool {
        self.suspension.is_grounded()
    }

    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    pub fn reaction_torque(&self) -> f64 {
        self.reaction_torque
    }

    pub fn inertia(&self) -> f64 {
        self.inertia
    }

    pub fn radius(&self) -> f64 {
        self.params.radius
    }

    pub fn suspension(&self) -> &Suspension {
        &self.suspension
    }

    pub fn tire_output(&self) -> &TireOutput {
        &self.tire_output
    }

    /// Clears spin and filtered tire state.
    pub fn reset(&mut self) {
        self.angular_velocity = 0.0;
        self.reaction_torque = 0.0;
        self.locked = false;
        self.tire.reset();
    }
}

/// `axis` with its component along `normal` removed, renormalized. Falls back
/// to `axis` when it is parallel to the normal.
fn project_on_plane(axis: &Unit<Vector3<f64>>, normal: &Unit<Vector3<f64>>) -> Vector3<f64> {
    let axis = axis.into_inner();
    let normal = normal.into_inner();
    let projected = axis - normal * axis.dot(&normal);
    projected.try_normalize(1.0e-9).unwrap_or(axis)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FlatGround;
    use approx::assert_abs_diff_eq;

    const DT: f64 = 0.02;

    fn wheel(mass: f64, radius: f64) -> Wheel {
        Wheel::new(
            WheelParams {
                mass,
                radius,
                ..Default::default()
            },
            SuspensionParams::default(),
        )
        .unwrap()
    }

    fn mount_at(height: f64) -> Isometry3<f64> {
        Isometry3::translation(0.0, height, 0.0)
    }

    #[test]
    fn reset_clears_spin_and_lock() {
        let mut w = wheel(20.0, 0.5);
        w.set_angular_velocity(1.0);
        w.brake_torque = 8_000.0;
        w.integrate_rotation(DT);
        assert!(w.is_locked());

        w.reset();
        assert_eq!(w.angular_velocity(), 0.0);
        assert_eq!(w.reaction_torque(), 0.0);
        assert!(!w.is_locked());
    }

    #[test]
    fn braking_through_zero_locks_the_wheel() {
        let mut w = wheel(20.0, 0.5);
        w.set_angular_velocity(1.0);
        w.brake_torque = 8_000.0;
        w.integrate_rotation(DT);

        assert_eq!(w.angular_velocity(), 0.0);
        assert!(w.is_locked());

        // Staying on the brake keeps it locked at exactly zero.
        w.integrate_rotation(DT);
        assert_eq!(w.angular_velocity(), 0.0);
        assert!(w.is_locked());
    }

    #[test]
    fn reverse_spin_brakes_toward_zero() {
        let mut w = wheel(20.0, 0.5);
        w.set_angular_velocity(-100.0);
        w.brake_torque = 250.0;
        w.integrate_rotation(DT);

        // 250 / 2.5 * 0.02 = 2 rad/s removed, direction preserved.
        assert_abs_diff_eq!(w.angular_velocity(), -98.0, epsilon = 1e-9);
        assert!(!w.is_locked());
    }

    #[test]
    fn drive_torque_from_rest_spins_up_by_torque_over_inertia() {
        // 18 kg, 0.5 m: inertia 2.25 kg·m².
        let mut w = Wheel::new(
            WheelParams {
                mass: 18.0,
                radius: 0.5,
                ..Default::default()
            },
            // 0.1 m compression at 80 kN/m: 8000 N of load, no damper.
            SuspensionParams {
                length: 0.3,
                spring_rate: 80_000.0,
                damper_rate: 0.0,
            },
        )
        .unwrap();
        assert_abs_diff_eq!(w.inertia(), 2.25);

        let mut ground = FlatGround::at_height(0.0);
        w.drive_torque = 500.0;
        w.update(&mount_at(0.7), DT, &mut ground);

        assert!(w.is_grounded());
        assert_abs_diff_eq!(w.suspension().load(), 8_000.0, epsilon = 1e-6);
        assert_abs_diff_eq!(w.angular_velocity(), 500.0 / 2.25 * DT, epsilon = 1e-9);
    }

    #[test]
    fn suspension_force_is_applied_at_probe_origin() {
        let mut w = wheel(20.0, 0.5);
        let mut ground = FlatGround::at_height(0.0);
        let mount = mount_at(0.6);
        w.update(&mount, DT, &mut ground);

        let (force, point) = ground.applied[0];
        assert_abs_diff_eq!(point, mount.translation.vector);
        assert!(force.y > 0.0);
        assert_abs_diff_eq!(force.x, 0.0);
    }

    #[test]
    fn airborne_wheel_applies_no_tire_force() {
        let mut w = wheel(20.0, 0.5);
        let mut ground = FlatGround::at_height(-5.0).moving(Vector3::new(0.0, 0.0, -10.0));
        w.drive_torque = 300.0;
        w.update(&mount_at(0.0), DT, &mut ground);

        assert!(!w.is_grounded());
        assert_eq!(w.telemetry().tire_force, Vector3::zeros());
        // Only the (zero) strut force was pushed to the host.
        assert_eq!(ground.applied.len(), 1);
        assert_eq!(ground.total_force(), Vector3::zeros());
    }

    #[test]
    fn rolling_forward_is_measured_on_forward_axis() {
        let mut w = wheel(20.0, 0.5);
        // Chassis moves toward -Z, which is "forward" for an unrotated mount.
        let mut ground = FlatGround::at_height(0.0).moving(Vector3::new(0.0, 0.0, -10.0));
        w.set_angular_velocity(20.0);
        w.update(&mount_at(0.6), DT, &mut ground);

        let t = w.telemetry();
        assert_abs_diff_eq!(t.contact_velocity.z, 10.0, epsilon = 1e-9);
        assert_abs_diff_eq!(t.longitudinal_slip_velocity, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn moving_platform_velocity_is_subtracted() {
        let mut w = wheel(20.0, 0.5);
        let mut ground = FlatGround::at_height(0.0).moving(Vector3::new(0.0, 0.0, -10.0));
        ground.platform_velocity = Some(Vector3::new(0.0, 0.0, -10.0));
        w.update(&mount_at(0.6), DT, &mut ground);

        assert_abs_diff_eq!(w.telemetry().contact_velocity, Vector3::zeros(), epsilon = 1e-9);
    }

    #[test]
    fn steering_right_turns_forward_axis_toward_right() {
        let mount = Isometry3::identity();
        let axes = WheelAxes::from_rotation(&steered_rotation(&mount, 30.0));
        assert!(axes.forward.x > 0.0);
        assert_abs_diff_eq!(axes.forward.z, -(30.0_f64.to_radians().cos()), epsilon = 1e-12);
        assert_abs_diff_eq!(axes.up.into_inner(), Vector3::y(), epsilon = 1e-12);
    }

    #[test]
    fn sliding_sideways_pushes_back() {
        let mut w = wheel(20.0, 0.5);
        let mut ground = FlatGround::at_height(0.0).moving(Vector3::new(5.0, 0.0, -10.0));
        w.set_angular_velocity(20.0);
        for _ in 0..5 {
            w.update(&mount_at(0.6), DT, &mut ground);
        }
        assert!(w.telemetry().tire_force.x < 0.0);
    }

    #[test]
    fn world_pose_drops_with_extension() {
        let mut w = wheel(20.0, 0.5);
        let mut ground = FlatGround::at_height(-10.0);
        let mount = mount_at(1.0);
        w.update(&mount, DT, &mut ground);

        let pose = w.world_pose(&mount);
        // Fully extended: one suspension length below the hardpoint.
        assert_abs_diff_eq!(pose.translation.vector.y, 0.7, epsilon = 1e-12);
    }
}
