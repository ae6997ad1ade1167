// traction_core/src/testing.rs

//! A minimal `PhysicsHost` used by the unit tests: an infinite horizontal
//! plane and a chassis that moves with a fixed velocity.

use nalgebra::{Unit, Vector3};

use crate::types::{BodyHandle, GroundHit, PhysicsHost};

pub const PLATFORM: BodyHandle = BodyHandle(7);

#[derive(Debug, Default)]
pub struct FlatGround {
    pub height: f64,
    pub chassis_velocity: Vector3<f64>,
    pub chassis_angular_velocity: Vector3<f64>,
    pub chassis_center: Vector3<f64>,
    /// If set, the ground is a moving body with this velocity.
    pub platform_velocity: Option<Vector3<f64>>,
    pub applied: Vec<(Vector3<f64>, Vector3<f64>)>,
}

impl FlatGround {
    pub fn at_height(height: f64) -> Self {
        Self {
            height,
            ..Default::default()
        }
    }

    pub fn moving(mut self, velocity: Vector3<f64>) -> Self {
        self.chassis_velocity = velocity;
        self
    }

    pub fn total_force(&self) -> Vector3<f64> {
        self.applied
            .iter()
            .fold(Vector3::zeros(), |acc, (f, _)| acc + f)
    }
}

impl PhysicsHost for FlatGround {
    fn cast_ray(
        &self,
        origin: &Vector3<f64>,
        direction: &Unit<Vector3<f64>>,
        max_distance: f64,
    ) -> Option<GroundHit> {
        // Only rays that point down can hit a horizontal plane below them.
        if direction.y >= 0.0 || origin.y < self.height {
            return None;
        }
        let distance = (origin.y - self.height) / -direction.y;
        (distance <= max_distance).then(|| GroundHit {
            distance,
            normal: Vector3::y_axis(),
            body: self.platform_velocity.map(|_| PLATFORM),
        })
    }

    fn chassis_point_velocity(&self, point: &Vector3<f64>) -> Vector3<f64> {
        self.chassis_velocity + self.chassis_angular_velocity.cross(&(point - self.chassis_center))
    }

    fn body_point_velocity(&self, body: BodyHandle, _point: &Vector3<f64>) -> Option<Vector3<f64>> {
        if body == PLATFORM {
            self.platform_velocity
        } else {
            None
        }
    }

    fn apply_force_at_point(&mut self, force: &Vector3<f64>, point: &Vector3<f64>) {
        self.applied.push((*force, *point));
    }
}
