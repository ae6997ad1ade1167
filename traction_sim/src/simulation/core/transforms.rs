// traction_sim/src/simulation/core/transforms.rs

//! Conversions between Bevy's `f32` types and the `f64` nalgebra types used
//! by `traction_core`. Both sides use the same axes (+Y up, -Z forward), so
//! these are pure precision casts.

use bevy::prelude::{Quat as BevyQuat, Transform as BevyTransform, Vec3 as BevyVec3};
use nalgebra::{Isometry3, Quaternion, Translation3, UnitQuaternion, Vector3};

pub fn bevy_vec3_to_vector(v: &BevyVec3) -> Vector3<f64> {
    Vector3::new(v.x as f64, v.y as f64, v.z as f64)
}

pub fn vector_to_bevy_vec3(v: &Vector3<f64>) -> BevyVec3 {
    BevyVec3::new(v.x as f32, v.y as f32, v.z as f32)
}

pub fn bevy_quat_to_unit_quaternion(q: &BevyQuat) -> UnitQuaternion<f64> {
    UnitQuaternion::from_quaternion(Quaternion::new(
        q.w as f64, q.x as f64, q.y as f64, q.z as f64,
    ))
}

pub fn unit_quaternion_to_bevy_quat(q: &UnitQuaternion<f64>) -> BevyQuat {
    let c = q.coords;
    BevyQuat::from_xyzw(c.x as f32, c.y as f32, c.z as f32, c.w as f32)
}

/// Builds an isometry from a position and an orientation, e.g. Avian's
/// `Position` and `Rotation` components.
pub fn bevy_pose_to_isometry(translation: &BevyVec3, rotation: &BevyQuat) -> Isometry3<f64> {
    Isometry3::from_parts(
        Translation3::from(bevy_vec3_to_vector(translation)),
        bevy_quat_to_unit_quaternion(rotation),
    )
}

/// Converts a Bevy `Transform` into a `nalgebra::Isometry3<f64>`. Scale is dropped.
pub fn bevy_transform_to_isometry(transform: &BevyTransform) -> Isometry3<f64> {
    bevy_pose_to_isometry(&transform.translation, &transform.rotation)
}

pub fn isometry_to_bevy_transform(iso: &Isometry3<f64>) -> BevyTransform {
    BevyTransform::from_translation(vector_to_bevy_vec3(&iso.translation.vector))
        .with_rotation(unit_quaternion_to_bevy_quat(&iso.rotation))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f32::consts::FRAC_PI_2;

    const F32_EPSILON: f32 = 1e-6;
    const F64_EPSILON: f64 = 1e-6;

    fn assert_bevy_vec3_approx_eq(v1: &BevyVec3, v2: &BevyVec3, epsilon: f32) {
        assert_abs_diff_eq!(v1.x, v2.x, epsilon = epsilon);
        assert_abs_diff_eq!(v1.y, v2.y, epsilon = epsilon);
        assert_abs_diff_eq!(v1.z, v2.z, epsilon = epsilon);
    }

    #[test]
    fn identity_transform_is_identity_isometry() {
        let iso = bevy_transform_to_isometry(&BevyTransform::IDENTITY);
        assert_abs_diff_eq!(iso.translation.vector.norm(), 0.0, epsilon = F64_EPSILON);
        assert_abs_diff_eq!(iso.rotation.angle(), 0.0, epsilon = F64_EPSILON);
    }

    #[test]
    fn general_transform_survives_the_trip() {
        let transform = BevyTransform::from_xyz(1.0, 2.0, -3.0)
            .with_rotation(BevyQuat::from_rotation_y(FRAC_PI_2));
        let iso = bevy_transform_to_isometry(&transform);

        // Same axes on both sides: the local forward (-Z) of a +90° yaw is -X.
        let forward = iso.rotation * -Vector3::z();
        assert_abs_diff_eq!(forward.x, -1.0, epsilon = F64_EPSILON);
        assert_abs_diff_eq!(forward.z, 0.0, epsilon = F64_EPSILON);

        let back = isometry_to_bevy_transform(&iso);
        assert_bevy_vec3_approx_eq(&back.translation, &transform.translation, F32_EPSILON);
        assert!(back.rotation.abs_diff_eq(transform.rotation, F32_EPSILON));
    }

    #[test]
    fn vectors_convert_componentwise() {
        let v = Vector3::new(0.5, -1.25, 8.0);
        assert_bevy_vec3_approx_eq(&vector_to_bevy_vec3(&v), &BevyVec3::new(0.5, -1.25, 8.0), F32_EPSILON);
        assert_abs_diff_eq!(bevy_vec3_to_vector(&vector_to_bevy_vec3(&v)), v, epsilon = F64_EPSILON);
    }
}
