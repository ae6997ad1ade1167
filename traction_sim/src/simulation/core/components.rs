// traction_sim/src/simulation/core/components.rs

use bevy::prelude::*;
use traction_core::prelude::{GearRequest, InputSnapshot};

/// The controls a vehicle will be driven with on the next tick.
/// Written by an input plugin, read by the vehicle systems.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct DriverInput(pub InputSnapshot);

/// Marker for vehicles that take their `DriverInput` from the keyboard.
#[derive(Component, Debug, Default)]
pub struct KeyboardControlled;

/// A request to change gear on one vehicle.
#[derive(Event, Debug, Clone, Copy)]
pub struct GearShiftEvent {
    pub vehicle: Entity,
    pub request: GearRequest,
}
