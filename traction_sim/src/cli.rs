use bevy::prelude::Resource;
use clap::Parser;
use std::path::PathBuf;

/// Traction: ray-cast vehicle dynamics on top of Avian3D.
///
/// This struct defines the command-line arguments accepted by the simulator
/// binary.
#[derive(Parser, Debug, Resource, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// The path to the scenario TOML file to run.
    #[arg(short, long, default_value = "assets/scenarios/default.toml")]
    pub scenario: PathBuf,

    /// Log filter in `tracing` env-filter syntax.
    #[arg(
        long,
        default_value = "info,traction_core=debug,wgpu_core=error,wgpu_hal=error"
    )]
    pub log_filter: String,
}
