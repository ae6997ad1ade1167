// traction_core/src/drivetrain/gearbox.rs

use tracing::debug;

use crate::config::{GearboxParams, NEUTRAL_GEAR};
use crate::error::VehicleError;

/// Leftover shift time below this is treated as expired, so that a shift
/// lasting an integer number of fixed ticks does not wait one extra tick on
/// rounding error.
const SHIFT_EPSILON: f64 = 1.0e-9;

/// Where the gearbox is in its shift cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ShiftState {
    InGear,
    /// Sitting in neutral until `remaining` seconds have passed, then `target`
    /// engages.
    Shifting { target: usize, remaining: f64 },
}

/// What happened to a shift request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShiftOutcome {
    /// The new gear is engaged already (shifts into or out of neutral).
    Engaged(usize),
    /// The box is in neutral and will engage `target` after the shift time.
    Started { target: usize },
    /// Already in the highest (or lowest) gear.
    AtLimit,
    /// A shift is in progress; the request was dropped.
    Busy,
}

/// Sequential gearbox: `[reverse, neutral, first, ...]`, with a timed pass
/// through neutral between two driving gears.
///
/// Requests made while a shift is in progress are ignored and reported as
/// [`ShiftOutcome::Busy`].
#[derive(Debug, Clone)]
pub struct Gearbox {
    params: GearboxParams,
    gear: usize,
    state: ShiftState,
}

impl Gearbox {
    pub fn new(params: GearboxParams) -> Result<Self, VehicleError> {
        params.validate()?;
        Ok(Self {
            params,
            gear: NEUTRAL_GEAR,
            state: ShiftState::InGear,
        })
    }

    /// Advances the shift timer.
    pub fn update(&mut self, dt: f64) {
        if dt <= 0.0 {
            return;
        }
        if let ShiftState::Shifting { target, remaining } = self.state {
            let remaining = remaining - dt;
            if remaining <= SHIFT_EPSILON {
                self.gear = target;
                self.state = ShiftState::InGear;
                debug!(gear = %self.gear_label(), "gear engaged");
            } else {
                self.state = ShiftState::Shifting { target, remaining };
            }
        }
    }

    pub fn shift_up(&mut self) -> ShiftOutcome {
        if self.gear + 1 >= self.params.ratios.len() {
            return self.refuse();
        }
        self.shift_to(self.gear + 1)
    }

    pub fn shift_down(&mut self) -> ShiftOutcome {
        if self.gear == 0 {
            return self.refuse();
        }
        self.shift_to(self.gear - 1)
    }

    fn refuse(&self) -> ShiftOutcome {
        if self.is_shifting() {
            ShiftOutcome::Busy
        } else {
            ShiftOutcome::AtLimit
        }
    }

    fn shift_to(&mut self, target: usize) -> ShiftOutcome {
        if self.is_shifting() {
            return ShiftOutcome::Busy;
        }

        if self.gear == NEUTRAL_GEAR || self.params.shift_time <= 0.0 {
            self.gear = target;
            debug!(gear = %self.gear_label(), "gear engaged");
            return ShiftOutcome::Engaged(target);
        }

        debug!(
            from = %self.gear_label(),
            target,
            shift_time = self.params.shift_time,
            "shift started"
        );
        self.gear = NEUTRAL_GEAR;
        self.state = ShiftState::Shifting {
            target,
            remaining: self.params.shift_time,
        };
        ShiftOutcome::Started { target }
    }

    /// Currently engaged gear index. Neutral while shifting.
    pub fn gear(&self) -> usize {
        self.gear
    }

    /// Ratio of the engaged gear (0 in neutral and while shifting).
    pub fn ratio(&self) -> f64 {
        self.params.ratios[self.gear]
    }

    pub fn output_torque(&self, input_torque: f64) -> f64 {
        input_torque * self.ratio()
    }

    pub fn input_shaft_velocity(&self, output_shaft_velocity: f64) -> f64 {
        output_shaft_velocity * self.ratio()
    }

    pub fn state(&self) -> ShiftState {
        self.state
    }

    pub fn is_shifting(&self) -> bool {
        matches!(self.state, ShiftState::Shifting { .. })
    }

    /// "R", "N", "1", "2", ...
    pub fn gear_label(&self) -> String {
        match self.gear {
            0 => "R".to_string(),
            NEUTRAL_GEAR => "N".to_string(),
            g => (g - NEUTRAL_GEAR).to_string(),
        }
    }

    pub fn ratios(&self) -> &[f64] {
        &self.params.ratios
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn gearbox() -> Gearbox {
        Gearbox::new(GearboxParams::default()).unwrap()
    }

    #[test]
    fn starts_in_neutral() {
        let g = gearbox();
        assert_eq!(g.gear(), NEUTRAL_GEAR);
        assert_eq!(g.ratio(), 0.0);
        assert_eq!(g.gear_label(), "N");
    }

    #[test]
    fn shift_out_of_neutral_is_immediate() {
        let mut g = gearbox();
        assert_eq!(g.shift_up(), ShiftOutcome::Engaged(2));
        assert_eq!(g.gear(), 2);
        assert_abs_diff_eq!(g.ratio(), 3.80);
        assert!(!g.is_shifting());

        let mut g = gearbox();
        assert_eq!(g.shift_down(), ShiftOutcome::Engaged(0));
        assert_abs_diff_eq!(g.ratio(), -3.73);
    }

    #[test]
    fn upshift_dwells_in_neutral_for_shift_time() {
        let mut g = gearbox();
        g.shift_up();
        assert_eq!(g.shift_up(), ShiftOutcome::Started { target: 3 });

        let dt = 0.05;
        for _ in 0..4 {
            assert!(g.is_shifting());
            assert_eq!(g.ratio(), 0.0);
            g.update(dt);
        }
        // 0.20 s elapsed: still neutral.
        assert_eq!(g.ratio(), 0.0);
        g.update(dt);
        // 0.25 s elapsed: third gear.
        assert!(!g.is_shifting());
        assert_eq!(g.gear(), 3);
        assert_abs_diff_eq!(g.ratio(), 2.35);
    }

    #[test]
    fn requests_during_shift_are_ignored() {
        let mut g = gearbox();
        g.shift_up();
        g.shift_up();
        g.update(0.1);
        assert_eq!(g.shift_up(), ShiftOutcome::Busy);
        assert_eq!(g.shift_down(), ShiftOutcome::Busy);

        // The pending timer is neither extended nor cancelled.
        g.update(0.15);
        assert_eq!(g.gear(), 3);
    }

    #[test]
    fn limits_are_reported() {
        let mut g = gearbox();
        g.shift_down();
        assert_eq!(g.shift_down(), ShiftOutcome::AtLimit);
        assert_eq!(g.gear(), 0);

        let top = g.ratios().len() - 1;
        while g.gear() < top {
            g.shift_up();
            g.update(1.0);
        }
        assert_eq!(g.shift_up(), ShiftOutcome::AtLimit);
        assert_eq!(g.gear_label(), "6");
    }

    #[test]
    fn torque_and_velocity_scale_by_ratio() {
        let mut g = gearbox();
        g.shift_up();
        assert_abs_diff_eq!(g.output_torque(100.0), 380.0, epsilon = 1e-9);
        assert_abs_diff_eq!(g.input_shaft_velocity(10.0), 38.0, epsilon = 1e-9);
    }

    #[test]
    fn zero_shift_time_engages_immediately() {
        let mut g = Gearbox::new(GearboxParams {
            shift_time: 0.0,
            ..Default::default()
        })
        .unwrap();
        g.shift_up();
        assert_eq!(g.shift_up(), ShiftOutcome::Engaged(3));
    }
}
