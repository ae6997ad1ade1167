// traction_core/src/models/tire.rs

use dyn_clone::DynClone;
use nalgebra::Vector2;
use std::fmt::Debug;

use crate::config::{PacejkaParams, TireModelKind, WheelParams};
use crate::utils::math::{clamp01, map_range_clamped, safe_divide, sign};

/// Longitudinal slip velocity (m/s) at which the slip ratio converges in one second.
const LONGITUDINAL_RELAXATION: f64 = 0.005;
/// Lateral velocity (m/s) at which the slip angle converges in one second.
const LATERAL_RELAXATION: f64 = 0.01;
/// Below `BLEND_SPEED_LOW` the slip angle is pinned to the peak angle, above
/// `BLEND_SPEED_HIGH` the geometric slip angle is used as is.
const BLEND_SPEED_LOW: f64 = 3.0;
const BLEND_SPEED_HIGH: f64 = 6.0;
const MAX_SLIP_RATIO: f64 = 100.0;
const MAX_SLIP_ANGLE_DEG: f64 = 90.0;

/// Kinematic and load state of one wheel for a single tick.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TireInput {
    /// Contact-patch velocity along the steered wheel's right axis, m/s.
    pub lateral_velocity: f64,
    /// Contact-patch velocity along the steered wheel's forward axis, m/s.
    pub longitudinal_velocity: f64,
    /// Magnitude of the full contact-patch velocity, m/s.
    pub speed: f64,
    /// Wheel spin, rad/s.
    pub angular_velocity: f64,
    /// `angular_velocity * radius - longitudinal_velocity`.
    pub longitudinal_slip_velocity: f64,
    pub radius: f64,
    pub inertia: f64,
    /// Normal load, N. Never negative.
    pub load: f64,
    pub locked: bool,
    pub dt: f64,
}

/// What a tire model produces for one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TireOutput {
    /// Normalized longitudinal slip after filtering.
    pub longitudinal_slip: f64,
    /// Normalized lateral slip in `[-1, 1]`.
    pub lateral_slip: f64,
    /// Geometric slip angle this tick, degrees.
    pub slip_angle_deg: f64,
    /// Low-pass filtered slip angle, degrees.
    pub dynamic_slip_angle_deg: f64,
    /// Force along the wheel's forward axis, N.
    pub longitudinal_force: f64,
    /// Force along the wheel's right axis, N.
    pub lateral_force: f64,
    /// Torque the road exerts back on the wheel, N·m.
    pub reaction_torque: f64,
}

// --- TIRE MODEL TRAIT ---
/// Converts slip and load into a contact-patch force.
///
/// Models may carry filtered state between ticks, so `update` is called
/// exactly once per physics tick per wheel.
pub trait TireModel: DynClone + Debug + Send + Sync {
    fn update(&mut self, input: &TireInput) -> TireOutput;

    /// Drops any filtered state, e.g. after a teleport.
    fn reset(&mut self);
}

// This macro automatically generates the implementation of `Clone` for `Box<dyn TireModel>`.
dyn_clone::clone_trait_object!(TireModel);

/// Builds the tire model selected by the wheel parameters.
pub fn build_tire_model(params: &WheelParams) -> Box<dyn TireModel> {
    match params.tire {
        TireModelKind::Combined {
            peak_slip_angle_deg,
        } => Box::new(CombinedSlipTire::new(
            params.friction_coefficient,
            peak_slip_angle_deg,
        )),
        TireModelKind::Longitudinal { curve } => Box::new(LongitudinalSlipTire {
            friction_coefficient: params.friction_coefficient,
            curve,
        }),
    }
}

/// The saturating "magic formula" curve: `D·sin(C·atan(B·s − E·(B·s − atan(B·s))))`.
pub fn pacejka(slip: f64, p: &PacejkaParams) -> f64 {
    let bs = p.b * slip;
    p.d * (p.c * (bs - p.e * (bs - bs.atan())).atan()).sin()
}

/// Scales `v` down so its length is at most `max`. Shorter vectors pass through.
pub fn clamp_magnitude(v: Vector2<f64>, max: f64) -> Vector2<f64> {
    let norm = v.norm();
    if norm > max && norm > 0.0 {
        v * (max / norm)
    } else {
        v
    }
}

// =========================================================================
// == Combined slip (friction circle) ==
// =========================================================================

/// Longitudinal slip from the torque needed to match road speed, lateral slip
/// from a filtered slip angle, both combined on the friction circle.
#[derive(Debug, Clone)]
pub struct CombinedSlipTire {
    pub friction_coefficient: f64,
    pub peak_slip_angle_deg: f64,
    longitudinal_slip: f64,
    dynamic_slip_angle_deg: f64,
}

impl CombinedSlipTire {
    pub fn new(friction_coefficient: f64, peak_slip_angle_deg: f64) -> Self {
        Self {
            friction_coefficient,
            peak_slip_angle_deg,
            longitudinal_slip: 0.0,
            dynamic_slip_angle_deg: 0.0,
        }
    }

    /// Filtered longitudinal slip. Unbounded by the friction circle, which is
    /// applied only when forces are built.
    fn update_longitudinal(&mut self, input: &TireInput) -> f64 {
        let target_angular_velocity = safe_divide(input.longitudinal_velocity, input.radius);
        let target_angular_acceleration =
            safe_divide(input.angular_velocity - target_angular_velocity, input.dt);
        let target_torque = target_angular_acceleration * input.inertia;
        let max_friction_torque = input.load * input.radius * self.friction_coefficient;

        let raw_slip = safe_divide(target_torque, max_friction_torque)
            .clamp(-MAX_SLIP_RATIO, MAX_SLIP_RATIO);
        let target_slip = if input.locked {
            sign(input.longitudinal_slip_velocity)
        } else {
            raw_slip
        };

        let gain = clamp01(
            input.longitudinal_slip_velocity.abs() / LONGITUDINAL_RELAXATION * input.dt,
        );
        self.longitudinal_slip += (target_slip - self.longitudinal_slip) * gain;
        self.longitudinal_slip
    }

    /// Returns `(geometric slip angle, lateral slip)`.
    fn update_lateral(&mut self, input: &TireInput) -> (f64, f64) {
        let slip_angle = (-input.lateral_velocity)
            .atan2(input.longitudinal_velocity.abs())
            .to_degrees();

        // At crawling speed the geometric angle swings wildly with tiny
        // velocity noise; hold the peak angle instead.
        let blend = map_range_clamped(input.speed, BLEND_SPEED_LOW, BLEND_SPEED_HIGH, 0.0, 1.0);
        let peak = self.peak_slip_angle_deg * sign(-input.lateral_velocity);
        let target_angle = peak + (slip_angle - peak) * blend;

        let gain = clamp01(input.lateral_velocity.abs() / LATERAL_RELAXATION * input.dt);
        self.dynamic_slip_angle_deg = (self.dynamic_slip_angle_deg
            + (target_angle - self.dynamic_slip_angle_deg) * gain)
            .clamp(-MAX_SLIP_ANGLE_DEG, MAX_SLIP_ANGLE_DEG);

        let lateral_slip =
            safe_divide(self.dynamic_slip_angle_deg, self.peak_slip_angle_deg).clamp(-1.0, 1.0);
        (slip_angle, lateral_slip)
    }
}

impl TireModel for CombinedSlipTire {
    fn update(&mut self, input: &TireInput) -> TireOutput {
        let longitudinal_slip = self.update_longitudinal(input);
        let (slip_angle_deg, lateral_slip) = self.update_lateral(input);

        let combined = clamp_magnitude(Vector2::new(lateral_slip, longitudinal_slip), 1.0);
        let grip = input.load * self.friction_coefficient;
        let longitudinal_force = combined.y * grip;
        let lateral_force = combined.x * grip;

        TireOutput {
            longitudinal_slip,
            lateral_slip,
            slip_angle_deg,
            dynamic_slip_angle_deg: self.dynamic_slip_angle_deg,
            longitudinal_force,
            lateral_force,
            reaction_torque: longitudinal_force * input.radius,
        }
    }

    fn reset(&mut self) {
        self.longitudinal_slip = 0.0;
        self.dynamic_slip_angle_deg = 0.0;
    }
}

// =========================================================================
// == Longitudinal-only slip ratio ==
// =========================================================================

/// Straight-line model: slip ratio through the Pacejka curve, no lateral force.
#[derive(Debug, Clone)]
pub struct LongitudinalSlipTire {
    pub friction_coefficient: f64,
    pub curve: PacejkaParams,
}

impl TireModel for LongitudinalSlipTire {
    fn update(&mut self, input: &TireInput) -> TireOutput {
        let forward_speed = input.longitudinal_velocity.abs();
        let slip_ratio = safe_divide(
            (input.angular_velocity * input.radius).abs() - input.longitudinal_velocity,
            forward_speed,
        );
        let coefficient = pacejka(slip_ratio, &self.curve);

        let grip = input.load * self.friction_coefficient;
        let longitudinal_force = (coefficient * grip).clamp(-grip, grip);

        TireOutput {
            longitudinal_slip: slip_ratio,
            longitudinal_force,
            reaction_torque: longitudinal_force * input.radius,
            ..Default::default()
        }
    }

    fn reset(&mut self) {}
}
