// traction_sim/src/simulation/core/simulation_setup.rs

use std::time::Duration;

use avian3d::prelude::Gravity;
use bevy::ecs::schedule::ScheduleLabel;

use crate::prelude::*;
use crate::simulation::core::components::GearShiftEvent;

pub struct SimulationSetupPlugin;

impl Plugin for SimulationSetupPlugin {
    fn build(&self, app: &mut App) {
        // The scenario is validated before the app is built; fall back to
        // defaults if a caller forgot to insert one.
        let config = match app.world().get_resource::<ScenarioConfig>() {
            Some(config) => config.clone(),
            None => {
                warn!("No ScenarioConfig resource found, using defaults.");
                let config = ScenarioConfig::default();
                app.insert_resource(config.clone());
                config
            }
        };

        app.init_state::<AppState>()
            .add_event::<GearShiftEvent>()
            .insert_resource(Gravity(Vec3::from_array(config.world.gravity)))
            .insert_resource(Time::<Fixed>::from_duration(Duration::from_secs_f64(
                1.0 / config.simulation.physics_hz,
            )));
        info!(
            "[SETUP] Fixed physics tick at {} Hz, gravity {:?}.",
            config.simulation.physics_hz, config.world.gravity
        );

        // --- CONFIGURE THE SPAWNING PIPELINE ---
        app.configure_sets(
            OnEnter(AppState::SceneBuilding),
            (
                SceneBuildSet::World,
                SceneBuildSet::ProcessVehicle,
                SceneBuildSet::Finalize,
            )
                .chain(),
        );
        app.add_systems(
            OnEnter(AppState::SceneBuilding),
            transition_to_running.in_set(SceneBuildSet::Finalize),
        );

        // --- CONFIGURE THE RUNTIME SCHEDULES ---
        // Avian steps in `FixedPostUpdate`, so forces written in `FixedUpdate`
        // are picked up by the step of the same tick.
        configure_runtime_sets(app, Update);
        configure_runtime_sets(app, FixedUpdate);
    }
}

fn configure_runtime_sets(app: &mut App, schedule: impl ScheduleLabel + Clone) {
    let running = || in_state(AppState::Running);
    app.configure_sets(
        schedule.clone(),
        (
            SimulationSet::Input,
            SimulationSet::Actuation,
            SimulationSet::Presentation,
        )
            .chain(),
    );
    app.configure_sets(
        schedule,
        (
            SimulationSet::Input.run_if(running()),
            SimulationSet::Actuation.run_if(running()),
            SimulationSet::Presentation.run_if(running()),
        ),
    );
}

/// Runs once at the end of the `OnEnter(SceneBuilding)` chain.
fn transition_to_running(mut next_state: ResMut<NextState<AppState>>) {
    info!("Scene building complete. Transitioning to Running state.");
    next_state.set(AppState::Running);
}
