//! Light definitions for the scene.

use glam::{Mat4, Vec3, Vec4};

/// A point light (omnidirectional).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointLight {
    /// Light position in world space
    pub position: Vec3,
    /// Light colour, alpha included
    pub color: Vec4,
    /// Ambient term added regardless of orientation
    pub ambient: f32,
    /// Strength of the specular highlight
    pub specular: f32,
}

impl Default for PointLight {
    fn default() -> Self {
        Self {
            position: Vec3::new(1.5, 1.5, 3.0),
            color: Vec4::ONE,
            ambient: 0.2,
            specular: 0.5,
        }
    }
}

impl PointLight {
    pub fn new(position: Vec3, color: Vec4) -> Self {
        Self {
            position,
            color,
            ..Self::default()
        }
    }

    /// Model matrix placing a marker mesh at the light's position.
    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_translation(self.position)
    }
}
