// traction_core/src/vehicle/input.rs

/// Driver controls sampled for one tick. Handed to the vehicle explicitly
/// rather than read from any shared input state.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct InputSnapshot {
    /// `[0, 1]`.
    pub throttle: f64,
    /// `[0, 1]`.
    pub brake: f64,
    /// `[-1, 1]`, positive steers right.
    pub steering: f64,
}

impl InputSnapshot {
    /// Copy with every axis clamped to its valid range; NaN reads as zero.
    pub fn clamped(&self) -> Self {
        let clean = |v: f64| if v.is_nan() { 0.0 } else { v };
        Self {
            throttle: clean(self.throttle).clamp(0.0, 1.0),
            brake: clean(self.brake).clamp(0.0, 1.0),
            steering: clean(self.steering).clamp(-1.0, 1.0),
        }
    }
}

/// Edge-triggered gear change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GearRequest {
    Up,
    Down,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamped_limits_every_axis() {
        let raw = InputSnapshot {
            throttle: 1.7,
            brake: -0.2,
            steering: f64::NAN,
        };
        assert_eq!(
            raw.clamped(),
            InputSnapshot {
                throttle: 1.0,
                brake: 0.0,
                steering: 0.0,
            }
        );
    }
}
