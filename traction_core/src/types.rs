// traction_core/src/types.rs

use nalgebra::{Unit, Vector3};

// --- Core Identifier ---
/// An opaque handle to a rigid body owned by the host physics engine.
/// In the Bevy sim this is the bits of the body's `Entity`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct BodyHandle(pub u64);

impl BodyHandle {
    // A convenience method for use in the Bevy adapter crate.
    #[cfg(feature = "bevy")] // This will only compile if the "bevy" feature is enabled
    pub fn from_entity(entity: bevy_ecs::prelude::Entity) -> Self {
        Self(entity.to_bits())
    }

    #[cfg(feature = "bevy")]
    pub fn to_entity(self) -> bevy_ecs::prelude::Entity {
        bevy_ecs::prelude::Entity::from_bits(self.0)
    }
}

/// Result of a successful ground probe.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroundHit {
    /// Distance from the ray origin to the hit point, in meters.
    pub distance: f64,
    /// Surface normal at the hit point (world frame).
    pub normal: Unit<Vector3<f64>>,
    /// The body that was hit, if it is a rigid body the host can report
    /// velocities for (static geometry returns `None`).
    pub body: Option<BodyHandle>,
}

// --- Core Trait for the Host Rigid-Body Engine ---
/// Everything the wheel model needs from the engine that integrates the
/// chassis. One implementation is bound to exactly one chassis body.
///
/// All vectors are world-frame, in meters and seconds.
pub trait PhysicsHost {
    /// Casts a ray that ignores the chassis itself.
    fn cast_ray(
        &self,
        origin: &Vector3<f64>,
        direction: &Unit<Vector3<f64>>,
        max_distance: f64,
    ) -> Option<GroundHit>;

    /// Velocity of the chassis at a world-space point.
    fn chassis_point_velocity(&self, point: &Vector3<f64>) -> Vector3<f64>;

    /// Velocity of another body at a world-space point, if the host knows it.
    fn body_point_velocity(&self, body: BodyHandle, point: &Vector3<f64>) -> Option<Vector3<f64>>;

    /// Accumulates a force on the chassis applied at a world-space point.
    fn apply_force_at_point(&mut self, force: &Vector3<f64>, point: &Vector3<f64>);
}

/// Identifies one of the four wheel positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WheelId {
    FrontLeft,
    FrontRight,
    RearLeft,
    RearRight,
}

impl WheelId {
    pub const ALL: [WheelId; 4] = [
        WheelId::FrontLeft,
        WheelId::FrontRight,
        WheelId::RearLeft,
        WheelId::RearRight,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn is_front(self) -> bool {
        matches!(self, WheelId::FrontLeft | WheelId::FrontRight)
    }

    pub fn short_name(self) -> &'static str {
        match self {
            WheelId::FrontLeft => "FL",
            WheelId::FrontRight => "FR",
            WheelId::RearLeft => "RL",
            WheelId::RearRight => "RR",
        }
    }
}
