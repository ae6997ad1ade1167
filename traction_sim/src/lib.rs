// traction_sim/src/lib.rs

use bevy::prelude::*;

// Import the plugins defined within the simulation crate.
use crate::simulation::core::simulation_setup::SimulationSetupPlugin;
use crate::simulation::plugins::debugging::DebuggingPlugin;
use crate::simulation::plugins::input::keyboard::KeyboardInputPlugin;
use crate::simulation::plugins::vehicles::raycast_car::RaycastCarPlugin;
use crate::simulation::plugins::world::spawner::WorldSpawnerPlugin;

// This prelude is for convenience for other files WITHIN the traction_sim crate.
pub mod prelude;

pub mod cli;
pub mod simulation;

/// The main plugin that brings together all the simulation parts.
/// `main.rs` adds this one plugin (after Avian's `PhysicsPlugins`) and a
/// `ScenarioConfig` resource.
pub struct TractionSimulationPlugin;

impl Plugin for TractionSimulationPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins((
            // Fixed rate, gravity, schedule sets and app states.
            SimulationSetupPlugin,
            // Ground, lighting, camera.
            WorldSpawnerPlugin,
            // The ray-cast vehicles themselves.
            RaycastCarPlugin,
            KeyboardInputPlugin,
            DebuggingPlugin,
        ));
    }
}
