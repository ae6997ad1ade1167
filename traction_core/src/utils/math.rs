// traction_core/src/utils/math.rs

//! Small scalar helpers shared by every stage of the vehicle model.
//!
//! All of them are total: they never return a non-finite value for finite
//! input, which is what keeps a single bad tick from poisoning the state.

use num_traits::Float;

/// Multiply RPM by this to get rad/s.
pub const RPM_TO_RAD: f64 = (2.0 * std::f64::consts::PI) / 60.0;
/// Multiply rad/s by this to get RPM.
pub const RAD_TO_RPM: f64 = 60.0 / (2.0 * std::f64::consts::PI);

#[inline]
pub fn rpm_to_rad(rpm: f64) -> f64 {
    rpm * RPM_TO_RAD
}

#[inline]
pub fn rad_to_rpm(rad: f64) -> f64 {
    rad * RAD_TO_RPM
}

/// Divides `dividend` by `divisor`, returning zero instead of `inf`/`NaN`
/// when the divisor is exactly zero.
#[inline]
pub fn safe_divide<T: Float>(dividend: T, divisor: T) -> T {
    if divisor != T::zero() {
        dividend / divisor
    } else {
        T::zero()
    }
}

/// Sign with `sign(0) == 1`.
///
/// `f64::signum` distinguishes `-0.0`, which would make the zero-crossing
/// detection in the wheel integrator report spurious flips.
#[inline]
pub fn sign<T: Float>(value: T) -> T {
    if value >= T::zero() {
        T::one()
    } else {
        -T::one()
    }
}

#[inline]
pub fn clamp01<T: Float>(value: T) -> T {
    value.max(T::zero()).min(T::one())
}

/// Linear interpolation with `t` clamped to `[0, 1]`.
#[inline]
pub fn lerp<T: Float>(a: T, b: T, t: T) -> T {
    a + (b - a) * clamp01(t)
}

/// Where `value` sits between `a` and `b`, clamped to `[0, 1]`.
/// A degenerate range (`a == b`) maps everything to zero.
#[inline]
pub fn inverse_lerp<T: Float>(a: T, b: T, value: T) -> T {
    clamp01(safe_divide(value - a, b - a))
}

/// Maps `value` from `[in_a, in_b]` onto `[out_a, out_b]`, clamping at both ends.
#[inline]
pub fn map_range_clamped<T: Float>(value: T, in_a: T, in_b: T, out_a: T, out_b: T) -> T {
    lerp(out_a, out_b, inverse_lerp(in_a, in_b, value))
}

/// Moves `current` toward `target` by at most `max_delta`, never overshooting.
#[inline]
pub fn move_towards<T: Float>(current: T, target: T, max_delta: T) -> T {
    let delta = target - current;
    if delta.abs() <= max_delta {
        target
    } else {
        current + sign(delta) * max_delta
    }
}
