// traction_core/src/utils/mod.rs

pub mod curve;
pub mod math;
