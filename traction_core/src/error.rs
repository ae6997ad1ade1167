// traction_core/src/error.rs

use thiserror::Error;

/// Everything that can go wrong while building a vehicle from its parameters.
///
/// None of these are produced on the per-tick path; the tick path guards its
/// own arithmetic instead of failing.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum VehicleError {
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error("invalid gear table: {0}")]
    InvalidGearTable(String),

    #[error("invalid curve: {0}")]
    InvalidCurve(String),
}

impl VehicleError {
    pub(crate) fn param(name: &'static str, reason: impl Into<String>) -> Self {
        VehicleError::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}

/// Fails with `InvalidParameter` unless `value` is finite and strictly positive.
pub(crate) fn ensure_positive(name: &'static str, value: f64) -> Result<(), VehicleError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(VehicleError::param(
            name,
            format!("must be finite and > 0, got {value}"),
        ))
    }
}

/// Fails with `InvalidParameter` unless `value` is finite and `>= 0`.
pub(crate) fn ensure_non_negative(name: &'static str, value: f64) -> Result<(), VehicleError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(VehicleError::param(
            name,
            format!("must be finite and >= 0, got {value}"),
        ))
    }
}
