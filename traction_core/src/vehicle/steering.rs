// traction_core/src/vehicle/steering.rs

use crate::config::SteeringParams;
use crate::utils::math::{move_towards, sign};

/// Rate-limited steering with an Ackermann split between the front wheels.
#[derive(Debug, Clone)]
pub struct Steering {
    params: SteeringParams,
    /// Smoothed steering angle, degrees. Positive turns right.
    angle_deg: f64,
}

impl Steering {
    pub fn new(params: SteeringParams) -> Self {
        Self {
            params,
            angle_deg: 0.0,
        }
    }

    /// Moves the smoothed angle toward `input * max_steering_angle` at the
    /// configured rate. `input` is clamped to `[-1, 1]`; NaN reads as zero.
    pub fn update(&mut self, dt: f64, input: f64) -> f64 {
        if dt > 0.0 {
            let input = if input.is_nan() { 0.0 } else { input.clamp(-1.0, 1.0) };
            let target = input * self.params.max_steering_angle_deg;
            self.angle_deg =
                move_towards(self.angle_deg, target, self.params.steering_rate_deg * dt);
        }
        self.angle_deg
    }

    pub fn angle_deg(&self) -> f64 {
        self.angle_deg
    }

    /// `(front_left, front_right)` steer angles for the current smoothed angle.
    pub fn wheel_angles(&self) -> (f64, f64) {
        ackermann_angles(
            self.angle_deg,
            self.params.wheelbase,
            self.params.track_width,
        )
    }
}

/// Splits a steering angle into `(left, right)` wheel angles so that the
/// inner wheel turns more than the outer one.
pub fn ackermann_angles(angle_deg: f64, wheelbase: f64, track_width: f64) -> (f64, f64) {
    let offset = track_width * sign(angle_deg) * 0.5;
    let left = angle_deg * (wheelbase / (wheelbase + offset));
    let right = angle_deg * (wheelbase / (wheelbase - offset));
    (left, right)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn smoothing_is_linear_and_stops_at_target() {
        let mut s = Steering::new(SteeringParams::default());
        assert_abs_diff_eq!(s.update(0.1, 1.0), 20.0, epsilon = 1e-12);
        assert_abs_diff_eq!(s.update(0.1, 1.0), 40.0, epsilon = 1e-12);
        assert_abs_diff_eq!(s.update(0.1, 1.0), 40.0, epsilon = 1e-12);
        // Input beyond full lock is clamped.
        assert_abs_diff_eq!(s.update(1.0, 3.0), 40.0, epsilon = 1e-12);
        assert_abs_diff_eq!(s.update(0.05, -1.0), 30.0, epsilon = 1e-12);
    }

    #[test]
    fn nan_input_centers_the_wheel() {
        let mut s = Steering::new(SteeringParams::default());
        s.update(0.1, 1.0);
        assert_abs_diff_eq!(s.update(0.05, f64::NAN), 10.0, epsilon = 1e-12);
        assert_abs_diff_eq!(s.update(1.0, f64::NAN), 0.0, epsilon = 1e-12);
        assert_eq!(s.wheel_angles(), (0.0, 0.0));
    }

    #[test]
    fn inner_wheel_turns_more() {
        let (left, right) = ackermann_angles(20.0, 3.12, 1.5);
        // Turning right: the right wheel is on the inside.
        assert!(right > 20.0 && left < 20.0);
        assert_abs_diff_eq!(left, 20.0 * 3.12 / 3.87, epsilon = 1e-12);
        assert_abs_diff_eq!(right, 20.0 * 3.12 / 2.37, epsilon = 1e-12);

        let (left, right) = ackermann_angles(-20.0, 3.12, 1.5);
        assert!(left < -20.0 && right > -20.0);
    }

    #[test]
    fn straight_ahead_is_zero() {
        assert_eq!(ackermann_angles(0.0, 3.12, 1.5), (0.0, 0.0));
    }
}
