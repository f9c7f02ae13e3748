//! Scene-graph drawables backed by GL meshes.

use std::collections::HashMap;
use std::rc::Rc;

use glam::Mat4;
use marionette_resources as resources;
use marionette_scene::{Drawable, PrimitiveFactory};
use tracing::debug;

use crate::error::RenderError;
use crate::mesh::GpuMesh;
use crate::shader::ShaderProgram;
use crate::texture::GpuTexture;
use crate::uniforms::{self, MatrixUniforms};

/// A mesh drawn with one program and an optional texture.
///
/// Meshes, programs and textures are shared, so many drawables can reuse the
/// same GPU objects.
pub struct MeshDrawable {
    mesh: Rc<GpuMesh>,
    program: Rc<ShaderProgram>,
    texture: Option<Rc<GpuTexture>>,
}

impl MeshDrawable {
    pub fn new(mesh: Rc<GpuMesh>, program: Rc<ShaderProgram>) -> Self {
        Self {
            mesh,
            program,
            texture: None,
        }
    }

    pub fn with_texture(mut self, texture: Rc<GpuTexture>) -> Self {
        self.texture = Some(texture);
        self
    }

    pub fn program(&self) -> &ShaderProgram {
        &self.program
    }
}

impl Drawable for MeshDrawable {
    fn draw(&self, model: &Mat4, view: &Mat4, projection: &Mat4) {
        self.program.bind();
        MatrixUniforms::new(*model, *view, *projection).apply(&self.program);
        if let Some(texture) = &self.texture {
            texture.bind(0);
            self.program.set_i32(uniforms::TEXTURE, 0);
        }
        self.mesh.draw();
    }
}

/// Cache key for generated primitives. Dimensions are compared bitwise.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PrimitiveKey {
    Cylinder { height: u32, radius: u32, slices: u32 },
    Sphere { radius: u32, slices: u32 },
}

impl PrimitiveKey {
    pub fn cylinder(height: f32, radius: f32, slices: u32) -> Self {
        Self::Cylinder {
            height: height.to_bits(),
            radius: radius.to_bits(),
            slices,
        }
    }

    pub fn sphere(radius: f32, slices: u32) -> Self {
        Self::Sphere {
            radius: radius.to_bits(),
            slices,
        }
    }
}

/// Builds rig primitives as GL meshes drawn with the flat program.
///
/// Identical primitives share one uploaded mesh.
pub struct GlPrimitiveFactory {
    gl: Rc<glow::Context>,
    program: Rc<ShaderProgram>,
    meshes: HashMap<PrimitiveKey, Rc<GpuMesh>>,
}

impl GlPrimitiveFactory {
    pub fn new(gl: Rc<glow::Context>, program: Rc<ShaderProgram>) -> Self {
        Self {
            gl,
            program,
            meshes: HashMap::new(),
        }
    }

    /// Number of distinct meshes uploaded so far.
    pub fn mesh_count(&self) -> usize {
        self.meshes.len()
    }

    fn drawable(
        &mut self,
        key: PrimitiveKey,
        generate: impl FnOnce() -> resources::ResourceResult<resources::MeshData>,
    ) -> Result<Box<dyn Drawable>, RenderError> {
        let mesh = match self.meshes.get(&key) {
            Some(mesh) => Rc::clone(mesh),
            None => {
                let mesh = Rc::new(GpuMesh::new(Rc::clone(&self.gl), &generate()?)?);
                debug!(?key, "primitive mesh cached");
                self.meshes.insert(key, Rc::clone(&mesh));
                mesh
            }
        };
        Ok(Box::new(MeshDrawable::new(mesh, Rc::clone(&self.program))))
    }
}

impl PrimitiveFactory for GlPrimitiveFactory {
    type Error = RenderError;

    fn cylinder(
        &mut self,
        height: f32,
        radius: f32,
        slices: u32,
    ) -> Result<Box<dyn Drawable>, RenderError> {
        self.drawable(PrimitiveKey::cylinder(height, radius, slices), || {
            resources::cylinder(height, radius, slices)
        })
    }

    fn sphere(&mut self, radius: f32, slices: u32) -> Result<Box<dyn Drawable>, RenderError> {
        self.drawable(PrimitiveKey::sphere(radius, slices), || {
            resources::sphere(radius, slices)
        })
    }
}
