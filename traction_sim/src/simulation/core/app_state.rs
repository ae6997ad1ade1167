// traction_sim/src/simulation/core/app_state.rs

use bevy::{ecs::schedule::SystemSet, prelude::States};

/// Defines the major phases of the application's lifecycle.
#[derive(States, Debug, Clone, Eq, PartialEq, Hash, Default)]
pub enum AppState {
    /// The initial state. Entities are spawned from the scenario config.
    #[default]
    SceneBuilding,

    /// The scene is built. The main simulation loop is now running.
    Running,
}

/// System sets to control the order of execution during the SceneBuilding state.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum SceneBuildSet {
    /// Pass 1: Static world (ground, lights, camera).
    World,

    /// Pass 2: Vehicle bodies and their wheel visuals.
    ProcessVehicle,

    /// Pass 3: Anything that needs the vehicles to exist.
    Finalize,
}

// =========================================================================
// == Main Simulation Sets ==
// =========================================================================

#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum SimulationSet {
    /// Sampling driver controls into `DriverInput`.
    Input,
    /// Turning controls into vehicle state: steering smoothing and gear
    /// changes on `Update`, the wheel tick on `FixedUpdate`.
    Actuation,
    /// Visuals, overlays and logging that only read vehicle state.
    Presentation,
}
