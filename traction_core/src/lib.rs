// traction_core/src/lib.rs

// Engine-agnostic ray-cast vehicle dynamics. The host physics engine is
// reached only through `types::PhysicsHost`.
pub mod config;
pub mod drivetrain;
pub mod error;
pub mod models;
pub mod prelude;
pub mod types;
pub mod utils;
pub mod vehicle;

#[cfg(test)]
pub(crate) mod testing;
