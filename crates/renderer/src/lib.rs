//! OpenGL rendering.
//!
//! This crate turns CPU-side resources into GL objects and draws them:
//! - Shader programs compiled from bundled GLSL
//! - Indexed meshes and textures
//! - Scene-graph drawables and the rig primitive factory
//! - Frame setup (clear, depth test, viewport)

pub mod drawable;
pub mod error;
pub mod mesh;
pub mod renderer;
pub mod shader;
pub mod texture;
pub mod uniforms;

pub use drawable::{GlPrimitiveFactory, MeshDrawable, PrimitiveKey};
pub use error::{RenderError, RenderResult};
pub use mesh::GpuMesh;
pub use renderer::Renderer;
pub use shader::{ShaderProgram, ShaderSource, ShaderStage};
pub use texture::GpuTexture;
pub use uniforms::{LightUniforms, MatrixUniforms};
