// traction_sim/src/simulation/plugins/input/keyboard.rs

use crate::prelude::*;

/// Drives every `KeyboardControlled` vehicle from the keyboard.
///
/// | Key           | Control        |
/// |---------------|----------------|
/// | W / Up        | throttle       |
/// | S / Down      | brake          |
/// | A / Left      | steer left     |
/// | D / Right     | steer right    |
/// | E             | shift up       |
/// | Q             | shift down     |
pub struct KeyboardInputPlugin;

impl Plugin for KeyboardInputPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, keyboard_to_driver_input.in_set(SimulationSet::Input));
    }
}

/// Maps held keys to a full-scale input snapshot.
pub fn snapshot_from_keys(keyboard: &ButtonInput<KeyCode>) -> InputSnapshot {
    let held = |a: KeyCode, b: KeyCode| keyboard.any_pressed([a, b]);
    let axis = |on: bool| if on { 1.0 } else { 0.0 };

    InputSnapshot {
        throttle: axis(held(KeyCode::KeyW, KeyCode::ArrowUp)),
        brake: axis(held(KeyCode::KeyS, KeyCode::ArrowDown)),
        steering: axis(held(KeyCode::KeyD, KeyCode::ArrowRight))
            - axis(held(KeyCode::KeyA, KeyCode::ArrowLeft)),
    }
}

fn keyboard_to_driver_input(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut vehicles: Query<(Entity, &mut DriverInput), With<KeyboardControlled>>,
    mut shifts: EventWriter<GearShiftEvent>,
) {
    let snapshot = snapshot_from_keys(&keyboard);
    let request = if keyboard.just_pressed(KeyCode::KeyE) {
        Some(GearRequest::Up)
    } else if keyboard.just_pressed(KeyCode::KeyQ) {
        Some(GearRequest::Down)
    } else {
        None
    };

    for (entity, mut input) in &mut vehicles {
        input.0 = snapshot;
        if let Some(request) = request {
            shifts.write(GearShiftEvent {
                vehicle: entity,
                request,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opposite_steering_keys_cancel() {
        let mut keyboard = ButtonInput::<KeyCode>::default();
        keyboard.press(KeyCode::KeyA);
        keyboard.press(KeyCode::ArrowRight);
        keyboard.press(KeyCode::ArrowUp);

        let snapshot = snapshot_from_keys(&keyboard);
        assert_eq!(snapshot.steering, 0.0);
        assert_eq!(snapshot.throttle, 1.0);
        assert_eq!(snapshot.brake, 0.0);
    }

    #[test]
    fn right_is_positive_steering() {
        let mut keyboard = ButtonInput::<KeyCode>::default();
        keyboard.press(KeyCode::KeyD);
        assert_eq!(snapshot_from_keys(&keyboard).steering, 1.0);

        keyboard.release(KeyCode::KeyD);
        keyboard.press(KeyCode::ArrowLeft);
        assert_eq!(snapshot_from_keys(&keyboard).steering, -1.0);
    }
}
