// traction_sim/src/main.rs

use avian3d::PhysicsPlugins;
use bevy::log::LogPlugin;
use clap::Parser;

use traction_sim::cli::Cli;
use traction_sim::prelude::*;
use traction_sim::simulation::config::load_scenario;
use traction_sim::TractionSimulationPlugin;

fn main() -> AppExit {
    let cli = Cli::parse();

    // --- 1. Load Configuration ---
    // Logging is not up yet, so a bad scenario is reported on stderr.
    let scenario = match load_scenario(&cli.scenario) {
        Ok(scenario) => scenario,
        Err(e) => {
            eprintln!("{e}");
            return AppExit::error();
        }
    };

    // --- 2. Add Core Plugins & Resources ---
    App::new()
        .add_plugins(DefaultPlugins.set(LogPlugin {
            level: bevy::log::Level::DEBUG,
            filter: cli.log_filter.clone(),
            ..Default::default()
        }))
        .add_plugins(PhysicsPlugins::default())
        .insert_resource(scenario)
        .insert_resource(cli)
        .add_plugins(TractionSimulationPlugin)
        // --- 3. Run the app ---
        .run()
}
