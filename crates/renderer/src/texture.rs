//! 2D textures.

use std::rc::Rc;

use glow::HasContext;
use marionette_resources::TextureData;
use tracing::debug;

use crate::error::{RenderError, RenderResult};

/// RGBA8 texture with a full mip chain.
pub struct GpuTexture {
    gl: Rc<glow::Context>,
    texture: glow::Texture,
    width: u32,
    height: u32,
}

impl GpuTexture {
    pub fn new(gl: Rc<glow::Context>, data: &TextureData) -> RenderResult<Self> {
        unsafe {
            let texture = gl
                .create_texture()
                .map_err(RenderError::allocation("texture"))?;
            gl.bind_texture(glow::TEXTURE_2D, Some(texture));

            gl.tex_parameter_i32(
                glow::TEXTURE_2D,
                glow::TEXTURE_MIN_FILTER,
                glow::LINEAR_MIPMAP_LINEAR as i32,
            );
            gl.tex_parameter_i32(
                glow::TEXTURE_2D,
                glow::TEXTURE_MAG_FILTER,
                glow::NEAREST as i32,
            );
            gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_S, glow::REPEAT as i32);
            gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_T, glow::REPEAT as i32);

            // Rows are tightly packed RGBA8
            gl.pixel_store_i32(glow::UNPACK_ALIGNMENT, 1);
            gl.tex_image_2d(
                glow::TEXTURE_2D,
                0,
                glow::RGBA8 as i32,
                data.width() as i32,
                data.height() as i32,
                0,
                glow::RGBA,
                glow::UNSIGNED_BYTE,
                Some(data.pixels()),
            );
            gl.generate_mipmap(glow::TEXTURE_2D);
            gl.bind_texture(glow::TEXTURE_2D, None);

            debug!(width = data.width(), height = data.height(), "texture uploaded");

            Ok(Self {
                gl,
                texture,
                width: data.width(),
                height: data.height(),
            })
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Bind to texture unit `unit`.
    pub fn bind(&self, unit: u32) {
        unsafe {
            self.gl.active_texture(glow::TEXTURE0 + unit);
            self.gl.bind_texture(glow::TEXTURE_2D, Some(self.texture));
        }
    }
}

impl Drop for GpuTexture {
    fn drop(&mut self) {
        unsafe { self.gl.delete_texture(self.texture) };
    }
}
