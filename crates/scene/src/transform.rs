//! Transform helpers for building node-local matrices.
//!
//! Scene graph nodes store plain [`Mat4`]s. This module provides the
//! constructors scene assembly uses to produce them, plus [`Transform`], a
//! position / rotation / scale view of a matrix that is easier to reason
//! about in tests and when logging.
//!
//! # Example
//!
//! ```
//! use glam::Vec3;
//! use marionette_scene::transform::{rotation_degrees, translation};
//!
//! // Offset along -Z, then turn a quarter about Y in the offset frame
//! let local = translation(0.0, 0.0, -1.125) * rotation_degrees(Vec3::Y, 90.0);
//! let origin = local.transform_point3(Vec3::ZERO);
//! assert!((origin - Vec3::new(0.0, 0.0, -1.125)).length() < 1e-6);
//! ```

use glam::{Mat4, Quat, Vec3};

/// Translation matrix.
#[inline]
pub fn translation(x: f32, y: f32, z: f32) -> Mat4 {
    Mat4::from_translation(Vec3::new(x, y, z))
}

/// Rotation of `degrees` about `axis`.
///
/// The axis does not need to be normalized. A zero axis yields the identity.
pub fn rotation_degrees(axis: Vec3, degrees: f32) -> Mat4 {
    match axis.try_normalize() {
        Some(axis) => Mat4::from_axis_angle(axis, degrees.to_radians()),
        None => Mat4::IDENTITY,
    }
}

/// Position, rotation and scale of an affine transform.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    /// Translation relative to the parent frame
    pub position: Vec3,
    /// Rotation as a quaternion
    pub rotation: Quat,
    /// Scale factor
    pub scale: Vec3,
}

impl Transform {
    /// Decompose an affine matrix.
    ///
    /// Shear and projective components are lost.
    pub fn from_matrix(matrix: Mat4) -> Self {
        let (scale, rotation, position) = matrix.to_scale_rotation_translation();
        Self {
            position,
            rotation,
            scale,
        }
    }

    /// Rotation angle in degrees, in `[0, 180]`.
    pub fn rotation_angle_degrees(&self) -> f32 {
        let (_, angle) = self.rotation.to_axis_angle();
        let degrees = angle.to_degrees();
        if degrees > 180.0 { 360.0 - degrees } else { degrees }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-4;

    fn approx_eq_vec3(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < EPSILON
    }

    #[test]
    fn test_rotation_normalizes_axis() {
        let a = rotation_degrees(Vec3::new(0.0, 0.0, -5.0), 90.0);
        let b = rotation_degrees(Vec3::NEG_Z, 90.0);
        assert!(a.abs_diff_eq(b, EPSILON));
    }

    #[test]
    fn test_zero_axis_is_identity() {
        assert_eq!(rotation_degrees(Vec3::ZERO, 45.0), Mat4::IDENTITY);
    }

    #[test]
    fn test_rotation_about_x() {
        // +Y turns into +Z under a quarter turn about X
        let m = rotation_degrees(Vec3::X, 90.0);
        assert!(approx_eq_vec3(m.transform_vector3(Vec3::Y), Vec3::Z));
    }

    #[test]
    fn test_decompose_matrix() {
        let matrix = Mat4::from_scale_rotation_translation(
            Vec3::splat(2.0),
            Quat::from_rotation_z(0.5),
            Vec3::new(1.0, -2.0, 3.0),
        );

        let t = Transform::from_matrix(matrix);
        assert!(approx_eq_vec3(t.position, Vec3::new(1.0, -2.0, 3.0)));
        assert!(approx_eq_vec3(t.scale, Vec3::splat(2.0)));
        assert!(t.rotation.abs_diff_eq(Quat::from_rotation_z(0.5), EPSILON));
    }

    #[test]
    fn test_rotation_angle_degrees() {
        let t = Transform::from_matrix(Mat4::IDENTITY);
        assert!(t.rotation_angle_degrees().abs() < EPSILON);

        let t = Transform::from_matrix(rotation_degrees(Vec3::Z, 30.0));
        assert!((t.rotation_angle_degrees() - 30.0).abs() < EPSILON);

        // Same rotation the other way round reports the same magnitude
        let t = Transform::from_matrix(rotation_degrees(Vec3::Z, -30.0));
        assert!((t.rotation_angle_degrees() - 30.0).abs() < EPSILON);
    }
}
