use bevy::prelude::Component;

/// A marker component that enables the wheel overlay for the vehicle it's
/// attached to.
#[derive(Component)]
pub struct ShowDebugGizmos;
