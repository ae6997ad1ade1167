// traction_sim/src/simulation/core/mod.rs

pub mod app_state;
pub mod components;
pub mod host;
pub mod simulation_setup;
pub mod transforms;
