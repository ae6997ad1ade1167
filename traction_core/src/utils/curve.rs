// traction_core/src/utils/curve.rs

use serde::Deserialize;

use crate::error::VehicleError;

/// A piecewise-linear curve through `(x, y)` control points.
///
/// Used for the engine torque curve (RPM -> N·m). Evaluation outside the first
/// and last key holds the end value.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "Vec<[f64; 2]>")]
pub struct Curve {
    keys: Vec<[f64; 2]>,
}

impl Curve {
    /// Builds a curve, rejecting an empty key list or keys whose `x` is not
    /// strictly increasing.
    pub fn new(keys: Vec<[f64; 2]>) -> Result<Self, VehicleError> {
        if keys.is_empty() {
            return Err(VehicleError::InvalidCurve("curve has no keys".into()));
        }
        if keys.iter().any(|k| !k[0].is_finite() || !k[1].is_finite()) {
            return Err(VehicleError::InvalidCurve("curve has non-finite keys".into()));
        }
        if keys.windows(2).any(|w| w[1][0] <= w[0][0]) {
            return Err(VehicleError::InvalidCurve(
                "curve keys must be strictly increasing in x".into(),
            ));
        }
        Ok(Self { keys })
    }

    /// For compile-time constant key sets that are known to be sorted.
    pub(crate) fn from_keys_unchecked(keys: Vec<[f64; 2]>) -> Self {
        debug_assert!(!keys.is_empty());
        Self { keys }
    }

    pub fn keys(&self) -> &[[f64; 2]] {
        &self.keys
    }

    pub fn evaluate(&self, x: f64) -> f64 {
        // `new` guarantees at least one key.
        let first = self.keys[0];
        let last = self.keys[self.keys.len() - 1];
        if x <= first[0] {
            return first[1];
        }
        if x >= last[0] {
            return last[1];
        }

        // Index of the first key strictly to the right of `x`.
        let upper = self.keys.partition_point(|k| k[0] <= x);
        let [x0, y0] = self.keys[upper - 1];
        let [x1, y1] = self.keys[upper];
        y0 + (y1 - y0) * (x - x0) / (x1 - x0)
    }

    /// The largest `y` of any key. For a piecewise-linear curve this is also
    /// the largest value `evaluate` can return.
    pub fn peak(&self) -> f64 {
        self.keys
            .iter()
            .map(|k| k[1])
            .fold(f64::NEG_INFINITY, f64::max)
    }
}

impl TryFrom<Vec<[f64; 2]>> for Curve {
    type Error = VehicleError;

    fn try_from(keys: Vec<[f64; 2]>) -> Result<Self, Self::Error> {
        Self::new(keys)
    }
}
