// traction_core/src/models/mod.rs

pub mod suspension;
pub mod tire;
pub mod wheel;
