// traction_core/src/models/suspension.rs

use nalgebra::{Unit, Vector3};

use crate::config::SuspensionParams;
use crate::types::{GroundHit, PhysicsHost};

/// Spring + damper strut with a single downward ground probe.
///
/// Compression is measured from full extension and is always kept in
/// `[0, length + wheel_radius]`.
#[derive(Debug, Clone)]
pub struct Suspension {
    params: SuspensionParams,
    /// Probe length: suspension travel plus wheel radius.
    reach: f64,
    compression: f64,
    previous_compression: f64,
    spring_force: f64,
    damper_force: f64,
    contact: Option<GroundHit>,
    /// Surface normal of the last contact, or the strut's up axis in the air.
    contact_normal: Unit<Vector3<f64>>,
}

impl Suspension {
    pub fn new(params: SuspensionParams, wheel_radius: f64) -> Self {
        let reach = params.length + wheel_radius;
        Self {
            params,
            reach,
            compression: 0.0,
            previous_compression: 0.0,
            spring_force: 0.0,
            damper_force: 0.0,
            contact: None,
            contact_normal: Vector3::y_axis(),
        }
    }

    /// Probes the ground along `-up` from `origin` and recomputes compression
    /// and the spring/damper forces. Returns the total strut force (signed,
    /// along `up`).
    pub fn update(
        &mut self,
        host: &dyn PhysicsHost,
        origin: &Vector3<f64>,
        up: &Unit<Vector3<f64>>,
        dt: f64,
    ) -> f64 {
        let down = -*up;
        self.contact = host.cast_ray(origin, &down, self.reach);

        match self.contact {
            Some(hit) => {
                self.previous_compression = self.compression;
                self.compression = (self.reach - hit.distance).clamp(0.0, self.reach);
                self.contact_normal = hit.normal;
            }
            None => {
                self.previous_compression = 0.0;
                self.compression = 0.0;
                self.contact_normal = *up;
            }
        }

        self.spring_force = spring_force(self.compression, self.params.spring_rate);
        self.damper_force = damper_force(
            self.compression,
            self.previous_compression,
            dt,
            self.params.damper_rate,
        );
        self.force()
    }

    pub fn force(&self) -> f64 {
        self.spring_force + self.damper_force
    }

    /// Normal load handed to the tire model. Never negative: a rebounding
    /// damper cannot pull the tire into the ground.
    pub fn load(&self) -> f64 {
        self.force().max(0.0)
    }

    pub fn compression(&self) -> f64 {
        self.compression
    }

    pub fn spring_force(&self) -> f64 {
        self.spring_force
    }

    pub fn damper_force(&self) -> f64 {
        self.damper_force
    }

    pub fn is_grounded(&self) -> bool {
        self.contact.is_some()
    }

    pub fn contact(&self) -> Option<&GroundHit> {
        self.contact.as_ref()
    }

    pub fn contact_normal(&self) -> &Unit<Vector3<f64>> {
        &self.contact_normal
    }

    pub fn reach(&self) -> f64 {
        self.reach
    }

    pub fn length(&self) -> f64 {
        self.params.length
    }

    /// Wheel center along the strut: full extension minus compression.
    pub fn wheel_center(&self, origin: &Vector3<f64>, up: &Unit<Vector3<f64>>) -> Vector3<f64> {
        origin - up.into_inner() * (self.params.length - self.compression)
    }
}

#[inline]
pub fn spring_force(compression: f64, spring_rate: f64) -> f64 {
    compression * spring_rate
}

#[inline]
pub fn damper_force(compression: f64, previous_compression: f64, dt: f64, damper_rate: f64) -> f64 {
    if dt > 0.0 {
        (compression - previous_compression) / dt * damper_rate
    } else {
        0.0
    }
}
