//! Resource generation and loading.
//!
//! This crate prepares CPU-side data for the renderer:
//! - Vertex format
//! - Procedural pyramid, cylinder and sphere meshes
//! - Image/texture loading

pub mod error;
pub mod mesh;
pub mod texture;
pub mod vertex;

pub use error::{ResourceError, ResourceResult};
pub use mesh::{MAX_SLICES, MIN_SLICES, MeshData, cylinder, lit_sphere, pyramid, sphere};
pub use texture::TextureData;
pub use vertex::{Vertex, VertexAttribute};
