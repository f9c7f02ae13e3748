//! Uniform names and per-frame uniform data.
//!
//! The names here must match the declarations in `shaders/`. Matrices are
//! uploaded per drawable; camera and light data once per frame per program.

use glam::{Mat4, Vec3, Vec4};
use marionette_scene::{Camera, PointLight};

use crate::shader::ShaderProgram;

pub const MODEL: &str = "model";
pub const VIEW: &str = "view";
pub const PROJECTION: &str = "projection";
pub const TEXTURE: &str = "tex0";
pub const LIGHT_COLOR: &str = "lightColor";
pub const LIGHT_POSITION: &str = "lightPosition";
pub const CAMERA_POSITION: &str = "cameraPosition";
pub const AMBIENT: &str = "ambient";
pub const SPECULAR: &str = "specularStrength";

/// Transform matrices for one draw call.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MatrixUniforms {
    /// Model matrix (object to world space).
    pub model: Mat4,
    /// View matrix (world to view space).
    pub view: Mat4,
    /// Projection matrix (view to clip space).
    pub projection: Mat4,
}

impl MatrixUniforms {
    pub fn new(model: Mat4, view: Mat4, projection: Mat4) -> Self {
        Self {
            model,
            view,
            projection,
        }
    }

    pub fn apply(&self, program: &ShaderProgram) {
        program.set_mat4(MODEL, &self.model);
        program.set_mat4(VIEW, &self.view);
        program.set_mat4(PROJECTION, &self.projection);
    }
}

/// Point light and viewer data for the lit program.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LightUniforms {
    pub light_position: Vec3,
    pub light_color: Vec4,
    pub ambient: f32,
    pub specular: f32,
    /// Camera world position, for the specular term.
    pub camera_position: Vec3,
}

impl LightUniforms {
    pub fn new(light: &PointLight, camera: &Camera) -> Self {
        Self {
            light_position: light.position,
            light_color: light.color,
            ambient: light.ambient,
            specular: light.specular,
            camera_position: camera.position,
        }
    }

    /// Upload to a lit program, which must be bound.
    pub fn apply(&self, program: &ShaderProgram) {
        program.set_vec3(LIGHT_POSITION, self.light_position);
        program.set_vec4(LIGHT_COLOR, self.light_color);
        program.set_f32(AMBIENT, self.ambient);
        program.set_f32(SPECULAR, self.specular);
        program.set_vec3(CAMERA_POSITION, self.camera_position);
    }

    /// Upload only the colour, for the program that draws the light itself.
    pub fn apply_emissive(&self, program: &ShaderProgram) {
        program.set_vec4(LIGHT_COLOR, self.light_color);
    }
}
