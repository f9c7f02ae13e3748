//! GPU-resident indexed meshes.

use std::rc::Rc;

use glow::HasContext;
use marionette_resources::{MeshData, Vertex};
use tracing::debug;

use crate::error::{RenderError, RenderResult, release_on_error};

/// Vertex array with its vertex and index buffers.
pub struct GpuMesh {
    gl: Rc<glow::Context>,
    vao: glow::VertexArray,
    vbo: glow::Buffer,
    ebo: glow::Buffer,
    index_count: i32,
}

impl GpuMesh {
    /// Upload `data` into fresh buffers and record the attribute layout.
    ///
    /// # Errors
    ///
    /// Returns an error if the mesh has out-of-range indices or GL cannot
    /// allocate the objects.
    pub fn new(gl: Rc<glow::Context>, data: &MeshData) -> RenderResult<Self> {
        data.validate()?;
        let index_count = i32::try_from(data.indices.len()).map_err(|_| {
            RenderError::Allocation {
                object: "index buffer",
                message: format!("{} indices exceed GLsizei", data.indices.len()),
            }
        })?;

        unsafe {
            let vao = gl
                .create_vertex_array()
                .map_err(RenderError::allocation("vertex array"))?;
            let vbo = release_on_error(
                gl.create_buffer()
                    .map_err(RenderError::allocation("vertex buffer")),
                || gl.delete_vertex_array(vao),
            )?;
            let ebo = release_on_error(
                gl.create_buffer()
                    .map_err(RenderError::allocation("index buffer")),
                || {
                    gl.delete_vertex_array(vao);
                    gl.delete_buffer(vbo);
                },
            )?;

            gl.bind_vertex_array(Some(vao));

            gl.bind_buffer(glow::ARRAY_BUFFER, Some(vbo));
            gl.buffer_data_u8_slice(
                glow::ARRAY_BUFFER,
                bytemuck::cast_slice(&data.vertices),
                glow::STATIC_DRAW,
            );

            gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, Some(ebo));
            gl.buffer_data_u8_slice(
                glow::ELEMENT_ARRAY_BUFFER,
                bytemuck::cast_slice(&data.indices),
                glow::STATIC_DRAW,
            );

            let stride = Vertex::size() as i32;
            for attribute in Vertex::ATTRIBUTES {
                gl.vertex_attrib_pointer_f32(
                    attribute.location,
                    attribute.components,
                    glow::FLOAT,
                    false,
                    stride,
                    attribute.offset,
                );
                gl.enable_vertex_attrib_array(attribute.location);
            }

            // The element buffer binding is part of the VAO; unbind the VAO first
            gl.bind_vertex_array(None);
            gl.bind_buffer(glow::ARRAY_BUFFER, None);
            gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, None);

            debug!(
                vertices = data.vertices.len(),
                indices = data.indices.len(),
                "mesh uploaded"
            );

            Ok(Self {
                gl,
                vao,
                vbo,
                ebo,
                index_count,
            })
        }
    }

    pub fn index_count(&self) -> usize {
        self.index_count as usize
    }

    /// Draw as a triangle list with whatever program is bound.
    pub fn draw(&self) {
        unsafe {
            self.gl.bind_vertex_array(Some(self.vao));
            self.gl
                .draw_elements(glow::TRIANGLES, self.index_count, glow::UNSIGNED_INT, 0);
            self.gl.bind_vertex_array(None);
        }
    }
}

impl Drop for GpuMesh {
    fn drop(&mut self) {
        unsafe {
            self.gl.delete_vertex_array(self.vao);
            self.gl.delete_buffer(self.vbo);
            self.gl.delete_buffer(self.ebo);
        }
    }
}
