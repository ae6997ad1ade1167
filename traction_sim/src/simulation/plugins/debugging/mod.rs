use bevy::prelude::*;

// --- Sub-modules for organization ---
mod components;
mod systems;

pub use components::ShowDebugGizmos;

use crate::prelude::SimulationSet;

/// Wheel overlay: discs at each wheel pose, suspension rays and tire force
/// arrows. Toggled with F1.
pub struct DebuggingPlugin;

impl Plugin for DebuggingPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (systems::toggle_wheel_gizmos, systems::draw_wheel_gizmos)
                .chain()
                .in_set(SimulationSet::Presentation),
        );
    }
}
