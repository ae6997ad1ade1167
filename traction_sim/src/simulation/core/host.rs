// traction_sim/src/simulation/core/host.rs

//! `PhysicsHost` implemented on top of Avian's bodies and spatial queries.

use avian3d::prelude::*;
use bevy::ecs::system::SystemParam;
use bevy::prelude::*;
use nalgebra::{Unit, Vector3};
use traction_core::prelude::{BodyHandle, GroundHit, PhysicsHost};

use super::transforms::{bevy_vec3_to_vector, vector_to_bevy_vec3};

/// Read access to everything a wheel probe needs from the physics world.
#[derive(SystemParam)]
pub struct PhysicsWorld<'w, 's> {
    pub spatial_query: SpatialQuery<'w, 's>,
    pub bodies: Query<
        'w,
        's,
        (
            &'static Position,
            &'static LinearVelocity,
            &'static AngularVelocity,
        ),
    >,
}

impl PhysicsWorld<'_, '_> {
    /// Kinematic state of a body, or `None` if it is not a rigid body.
    pub fn body_state(&self, entity: Entity) -> Option<BodyState> {
        let (position, linear, angular) = self.bodies.get(entity).ok()?;
        Some(BodyState {
            center: bevy_vec3_to_vector(&position.0),
            linear: bevy_vec3_to_vector(&linear.0),
            angular: bevy_vec3_to_vector(&angular.0),
        })
    }
}

/// Linear and angular velocity of a body about its center of mass.
/// Colliders are centered on the body origin, so the center of mass is
/// the body position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyState {
    pub center: Vector3<f64>,
    pub linear: Vector3<f64>,
    pub angular: Vector3<f64>,
}

impl BodyState {
    pub fn point_velocity(&self, point: &Vector3<f64>) -> Vector3<f64> {
        self.linear + self.angular.cross(&(point - self.center))
    }
}

/// Sums point forces into a net force and a torque about the center of mass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForceAccumulator {
    center: Vector3<f64>,
    pub force: Vector3<f64>,
    pub torque: Vector3<f64>,
}

impl ForceAccumulator {
    pub fn new(center: Vector3<f64>) -> Self {
        Self {
            center,
            force: Vector3::zeros(),
            torque: Vector3::zeros(),
        }
    }

    pub fn add_at_point(&mut self, force: &Vector3<f64>, point: &Vector3<f64>) {
        self.force += force;
        self.torque += (point - self.center).cross(force);
    }
}

/// One chassis' view of the physics world for a single tick.
pub struct AvianHost<'a, 'w, 's> {
    world: &'a PhysicsWorld<'w, 's>,
    chassis: BodyState,
    filter: SpatialQueryFilter,
    pub forces: ForceAccumulator,
}

impl<'a, 'w, 's> AvianHost<'a, 'w, 's> {
    pub fn new(world: &'a PhysicsWorld<'w, 's>, chassis_entity: Entity, chassis: BodyState) -> Self {
        Self {
            world,
            chassis,
            // Probes never hit the car they belong to.
            filter: SpatialQueryFilter::from_excluded_entities([chassis_entity]),
            forces: ForceAccumulator::new(chassis.center),
        }
    }
}

impl PhysicsHost for AvianHost<'_, '_, '_> {
    fn cast_ray(
        &self,
        origin: &Vector3<f64>,
        direction: &Unit<Vector3<f64>>,
        max_distance: f64,
    ) -> Option<GroundHit> {
        let direction = Dir3::new(vector_to_bevy_vec3(direction)).ok()?;
        let hit = self.world.spatial_query.cast_ray(
            vector_to_bevy_vec3(origin),
            direction,
            max_distance as f32,
            true,
            &self.filter,
        )?;
        let normal = Unit::try_new(bevy_vec3_to_vector(&hit.normal), 1e-6)?;
        let body = self
            .world
            .bodies
            .contains(hit.entity)
            .then(|| BodyHandle::from_entity(hit.entity));
        Some(GroundHit {
            distance: hit.distance as f64,
            normal,
            body,
        })
    }

    fn chassis_point_velocity(&self, point: &Vector3<f64>) -> Vector3<f64> {
        self.chassis.point_velocity(point)
    }

    fn body_point_velocity(&self, body: BodyHandle, point: &Vector3<f64>) -> Option<Vector3<f64>> {
        self.world
            .body_state(body.to_entity())
            .map(|state| state.point_velocity(point))
    }

    fn apply_force_at_point(&mut self, force: &Vector3<f64>, point: &Vector3<f64>) {
        self.forces.add_at_point(force, point);
    }
}
