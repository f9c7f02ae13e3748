//! Main renderer orchestration.
//!
//! This module provides the [`Renderer`] struct that owns the shared GL
//! context handle, frame-level state (clear colour, depth test, viewport),
//! and hands out GPU resources.

use std::rc::Rc;

use glow::HasContext;
use marionette_resources::{MeshData, TextureData};
use tracing::{debug, info};

use crate::drawable::GlPrimitiveFactory;
use crate::error::RenderResult;
use crate::mesh::GpuMesh;
use crate::shader::{ShaderProgram, ShaderSource};
use crate::texture::GpuTexture;

/// Owns frame state for one GL context.
///
/// GPU objects created through the renderer keep their own handle to the
/// context and free themselves on drop, so the renderer may be dropped before
/// or after them as long as the context outlives both.
pub struct Renderer {
    gl: Rc<glow::Context>,
    width: u32,
    height: u32,
}

impl Renderer {
    /// Set up depth testing and the initial viewport on a current context.
    pub fn new(gl: Rc<glow::Context>, width: u32, height: u32, clear_color: [f32; 4]) -> Self {
        unsafe {
            let version = gl.get_parameter_string(glow::VERSION);
            let device = gl.get_parameter_string(glow::RENDERER);
            info!(%version, %device, "OpenGL renderer initialized ({}x{})", width, height);

            gl.enable(glow::DEPTH_TEST);
            let [r, g, b, a] = clear_color;
            gl.clear_color(r, g, b, a);
        }

        let mut renderer = Self {
            gl,
            width: 0,
            height: 0,
        };
        renderer.resize(width, height);
        renderer
    }

    /// Compile and link one of the bundled programs.
    pub fn program(&self, source: &ShaderSource) -> RenderResult<Rc<ShaderProgram>> {
        Ok(Rc::new(ShaderProgram::new(Rc::clone(&self.gl), source)?))
    }

    pub fn mesh(&self, data: &MeshData) -> RenderResult<Rc<GpuMesh>> {
        Ok(Rc::new(GpuMesh::new(Rc::clone(&self.gl), data)?))
    }

    pub fn texture(&self, data: &TextureData) -> RenderResult<Rc<GpuTexture>> {
        Ok(Rc::new(GpuTexture::new(Rc::clone(&self.gl), data)?))
    }

    /// Factory for rig primitives drawn with `program`.
    pub fn primitive_factory(&self, program: Rc<ShaderProgram>) -> GlPrimitiveFactory {
        GlPrimitiveFactory::new(Rc::clone(&self.gl), program)
    }

    /// Match the viewport to a new framebuffer size.
    ///
    /// Returns `false` and keeps the old viewport for a zero-sized
    /// (minimized) framebuffer.
    pub fn resize(&mut self, width: u32, height: u32) -> bool {
        let Some((w, h)) = viewport_size(width, height) else {
            debug!("Ignoring resize to zero dimensions");
            return false;
        };
        if (width, height) != (self.width, self.height) {
            debug!(
                "Viewport resized: {}x{} -> {}x{}",
                self.width, self.height, width, height
            );
        }
        self.width = width;
        self.height = height;
        unsafe { self.gl.viewport(0, 0, w, h) };
        true
    }

    /// Clear colour and depth for a new frame.
    pub fn begin_frame(&self) {
        unsafe {
            self.gl
                .clear(glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT);
        }
    }
}

/// Viewport dimensions as GL wants them, or `None` for an empty framebuffer.
pub fn viewport_size(width: u32, height: u32) -> Option<(i32, i32)> {
    if width == 0 || height == 0 {
        return None;
    }
    Some((
        i32::try_from(width).unwrap_or(i32::MAX),
        i32::try_from(height).unwrap_or(i32::MAX),
    ))
}
