//! Shader program management.
//!
//! GLSL sources are compiled into the binary and linked into a
//! [`ShaderProgram`] at startup. Uniform setters look the location up by
//! name on every call; a name the linker optimized away is skipped, the way
//! GL itself ignores location -1.
//!
//! # Overview
//!
//! - [`ShaderStage`] identifies vertex or fragment stage
//! - [`ShaderSource`] pairs a vertex and a fragment source
//! - [`ShaderProgram`] owns a linked program object

use std::fmt;
use std::rc::Rc;

use glam::{Mat4, Vec3, Vec4};
use glow::HasContext;
use tracing::{debug, info};

use crate::error::{RenderError, RenderResult};

/// Shader stage type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    /// Vertex shader stage - processes each vertex
    Vertex,
    /// Fragment (pixel) shader stage - processes each fragment
    Fragment,
}

impl ShaderStage {
    /// Converts the shader stage to the GL shader type enum.
    pub fn to_gl(self) -> u32 {
        match self {
            ShaderStage::Vertex => glow::VERTEX_SHADER,
            ShaderStage::Fragment => glow::FRAGMENT_SHADER,
        }
    }

    /// Returns a human-readable name for the shader stage.
    pub fn name(self) -> &'static str {
        match self {
            ShaderStage::Vertex => "vertex",
            ShaderStage::Fragment => "fragment",
        }
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A named pair of GLSL sources.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ShaderSource {
    pub name: &'static str,
    pub vertex: &'static str,
    pub fragment: &'static str,
}

impl ShaderSource {
    /// Per-vertex colour, no lighting.
    pub const FLAT: Self = Self {
        name: "flat",
        vertex: include_str!("../shaders/flat.vert"),
        fragment: include_str!("../shaders/flat.frag"),
    };

    /// Textured, lit by one point light.
    pub const LIT: Self = Self {
        name: "lit",
        vertex: include_str!("../shaders/lit.vert"),
        fragment: include_str!("../shaders/lit.frag"),
    };

    /// Solid colour taken from the light colour uniform.
    pub const EMISSIVE: Self = Self {
        name: "emissive",
        vertex: include_str!("../shaders/emissive.vert"),
        fragment: include_str!("../shaders/emissive.frag"),
    };

    pub const ALL: [Self; 3] = [Self::FLAT, Self::LIT, Self::EMISSIVE];
}

/// Linked GL program.
pub struct ShaderProgram {
    gl: Rc<glow::Context>,
    program: glow::Program,
    name: &'static str,
}

impl ShaderProgram {
    /// Compile and link both stages of `source`.
    ///
    /// # Errors
    ///
    /// Returns the driver's info log if either stage fails to compile or the
    /// program fails to link.
    pub fn new(gl: Rc<glow::Context>, source: &ShaderSource) -> RenderResult<Self> {
        let vertex = compile(&gl, ShaderStage::Vertex, source.vertex)?;
        let fragment = match compile(&gl, ShaderStage::Fragment, source.fragment) {
            Ok(fragment) => fragment,
            Err(e) => {
                unsafe { gl.delete_shader(vertex) };
                return Err(e);
            }
        };

        let linked = unsafe { link(&gl, &[vertex, fragment]) };
        unsafe {
            gl.delete_shader(vertex);
            gl.delete_shader(fragment);
        }
        let program = linked?;

        info!(program = source.name, "shader program linked");
        Ok(Self {
            gl,
            program,
            name: source.name,
        })
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Make this the current program.
    pub fn bind(&self) {
        unsafe { self.gl.use_program(Some(self.program)) };
    }

    fn location(&self, name: &str) -> Option<glow::UniformLocation> {
        unsafe { self.gl.get_uniform_location(self.program, name) }
    }

    /// Upload a column-major matrix. The program must be bound.
    pub fn set_mat4(&self, name: &str, value: &Mat4) {
        if let Some(location) = self.location(name) {
            unsafe {
                self.gl
                    .uniform_matrix_4_f32_slice(Some(&location), false, &value.to_cols_array())
            };
        }
    }

    pub fn set_vec3(&self, name: &str, value: Vec3) {
        if let Some(location) = self.location(name) {
            unsafe {
                self.gl
                    .uniform_3_f32(Some(&location), value.x, value.y, value.z)
            };
        }
    }

    pub fn set_vec4(&self, name: &str, value: Vec4) {
        if let Some(location) = self.location(name) {
            unsafe {
                self.gl
                    .uniform_4_f32(Some(&location), value.x, value.y, value.z, value.w)
            };
        }
    }

    pub fn set_f32(&self, name: &str, value: f32) {
        if let Some(location) = self.location(name) {
            unsafe { self.gl.uniform_1_f32(Some(&location), value) };
        }
    }

    pub fn set_i32(&self, name: &str, value: i32) {
        if let Some(location) = self.location(name) {
            unsafe { self.gl.uniform_1_i32(Some(&location), value) };
        }
    }
}

impl Drop for ShaderProgram {
    fn drop(&mut self) {
        unsafe { self.gl.delete_program(self.program) };
        debug!(program = self.name, "shader program deleted");
    }
}

fn compile(gl: &glow::Context, stage: ShaderStage, source: &str) -> RenderResult<glow::Shader> {
    unsafe {
        let shader = gl
            .create_shader(stage.to_gl())
            .map_err(RenderError::allocation("shader"))?;
        gl.shader_source(shader, source);
        gl.compile_shader(shader);

        if !gl.get_shader_compile_status(shader) {
            let log = gl.get_shader_info_log(shader);
            gl.delete_shader(shader);
            return Err(RenderError::ShaderCompile { stage, log });
        }
        debug!(%stage, "shader compiled");
        Ok(shader)
    }
}

/// # Safety
///
/// Shaders must belong to the current context.
unsafe fn link(gl: &glow::Context, shaders: &[glow::Shader]) -> RenderResult<glow::Program> {
    unsafe {
        let program = gl
            .create_program()
            .map_err(RenderError::allocation("program"))?;
        for &shader in shaders {
            gl.attach_shader(program, shader);
        }
        gl.link_program(program);
        for &shader in shaders {
            gl.detach_shader(program, shader);
        }

        if !gl.get_program_link_status(program) {
            let log = gl.get_program_info_log(program);
            gl.delete_program(program);
            return Err(RenderError::ProgramLink(log));
        }
        Ok(program)
    }
}
