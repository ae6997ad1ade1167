// traction_sim/src/simulation/config/mod.rs

//! Loading and validating the scenario file.

pub mod structs;

use std::path::{Path, PathBuf};

use figment::{
    providers::{Format, Toml},
    Figment,
};
use thiserror::Error;

pub use structs::{ChassisConfig, Pose, ScenarioConfig, VehicleConfig};

#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("scenario file not found: {0}")]
    NotFound(PathBuf),

    #[error("failed to parse scenario {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: Box<figment::Error>,
    },

    #[error("invalid scenario: {0}")]
    Invalid(String),
}

/// Reads and checks a scenario TOML file.
///
/// Vehicle parameters are not validated here; a vehicle with bad
/// parameters is reported and skipped at spawn time so the rest of the
/// scenario can still run.
pub fn load_scenario(path: &Path) -> Result<ScenarioConfig, ScenarioError> {
    // Figment treats a missing file as an empty source.
    if !path.is_file() {
        return Err(ScenarioError::NotFound(path.to_path_buf()));
    }
    let scenario = extract(Figment::new().merge(Toml::file(path))).map_err(|source| {
        ScenarioError::Parse {
            path: path.to_path_buf(),
            source: Box::new(source),
        }
    })?;
    check(&scenario)?;
    Ok(scenario)
}

fn extract(figment: Figment) -> Result<ScenarioConfig, figment::Error> {
    figment.extract()
}

fn check(scenario: &ScenarioConfig) -> Result<(), ScenarioError> {
    let hz = scenario.simulation.physics_hz;
    if !(hz.is_finite() && hz > 0.0) {
        return Err(ScenarioError::Invalid(format!(
            "simulation.physics_hz must be positive, got {hz}"
        )));
    }
    for vehicle in &scenario.vehicles {
        if !(vehicle.chassis.mass > 0.0) {
            return Err(ScenarioError::Invalid(format!(
                "vehicle '{}': chassis.mass must be positive",
                vehicle.name
            )));
        }
        if vehicle.chassis.half_extents.iter().any(|e| !(*e > 0.0)) {
            return Err(ScenarioError::Invalid(format!(
                "vehicle '{}': chassis.half_extents must be positive",
                vehicle.name
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use traction_core::prelude::{DrivenAxle, Vehicle};

    fn parse(toml: &str) -> Result<ScenarioConfig, figment::Error> {
        extract(Figment::new().merge(Toml::string(toml)))
    }

    #[test]
    fn empty_file_gives_defaults() {
        let scenario = parse("").unwrap();
        assert_eq!(scenario.simulation.physics_hz, 60.0);
        assert_eq!(scenario.world.gravity, [0.0, -9.81, 0.0]);
        assert!(scenario.vehicles.is_empty());
    }

    #[test]
    fn partial_vehicle_tables_fall_back_to_defaults() {
        let scenario = parse(
            r#"
            [simulation]
            physics_hz = 100.0

            [[vehicles]]
            name = "car"
            keyboard_controlled = true
            starting_pose = { translation = [0.0, 1.0, 0.0], rotation_deg = [0.0, 0.0, 0.0] }

            [vehicles.params]
            max_brake_torque = 5000.0

            [vehicles.params.drivetrain]
            driven_axle = "Front"
            "#,
        )
        .unwrap();
        check(&scenario).unwrap();

        let car = &scenario.vehicles[0];
        assert_eq!(car.name, "car");
        assert!(car.keyboard_controlled);
        assert_eq!(car.chassis.mass, 1500.0);
        assert_eq!(car.params.max_brake_torque, 5000.0);
        let drivetrain = car.params.drivetrain.as_ref().unwrap();
        assert_eq!(drivetrain.driven_axle, DrivenAxle::Front);
        assert_eq!(car.starting_pose.to_isometry().translation.y, 1.0);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        assert!(parse("[world]\ngravity = [0.0, -9.81, 0.0]\nfog = true\n").is_err());
    }

    #[test]
    fn non_positive_rate_is_invalid() {
        let scenario = parse("[simulation]\nphysics_hz = 0.0\n").unwrap();
        assert!(matches!(check(&scenario), Err(ScenarioError::Invalid(_))));
    }

    #[test]
    fn shipped_scenario_builds_a_valid_vehicle() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("assets/scenarios/default.toml");
        let scenario = load_scenario(&path).unwrap();
        assert_eq!(scenario.vehicles.len(), 1);
        assert!(scenario.vehicles[0].keyboard_controlled);
        Vehicle::new(scenario.vehicles[0].params.clone()).unwrap();
    }

    #[test]
    fn missing_file_is_reported() {
        let err = load_scenario(Path::new("does/not/exist.toml")).unwrap_err();
        assert!(matches!(err, ScenarioError::NotFound(_)));
    }
}
