//! Vertex format shared by every generated mesh.

use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec3};

/// One vertex attribute as the shaders see it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VertexAttribute {
    /// Shader input location.
    pub location: u32,
    /// Number of `f32` components.
    pub components: i32,
    /// Byte offset inside [`Vertex`].
    pub offset: i32,
}

/// Standard vertex format with position, color, UV, and normal.
///
/// # Memory Layout
///
/// - Offset 0: position (12 bytes)
/// - Offset 12: color (12 bytes)
/// - Offset 24: tex_coord (8 bytes)
/// - Offset 32: normal (12 bytes)
/// - Total size: 44 bytes
///
/// # Shader Locations
///
/// - location 0: position (vec3)
/// - location 1: color (vec3)
/// - location 2: tex_coord (vec2)
/// - location 3: normal (vec3)
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    /// 3D position in object space.
    pub position: Vec3,
    /// RGB color in [0, 1].
    pub color: Vec3,
    /// Texture coordinates (UV).
    pub tex_coord: Vec2,
    /// Surface normal, unit length for curved surfaces.
    pub normal: Vec3,
}

impl Vertex {
    /// Attribute layout matching the `layout (location = n)` inputs of the
    /// bundled shaders.
    pub const ATTRIBUTES: [VertexAttribute; 4] = [
        VertexAttribute {
            location: 0,
            components: 3,
            offset: 0,
        },
        VertexAttribute {
            location: 1,
            components: 3,
            offset: 12,
        },
        VertexAttribute {
            location: 2,
            components: 2,
            offset: 24,
        },
        VertexAttribute {
            location: 3,
            components: 3,
            offset: 32,
        },
    ];

    #[inline]
    pub const fn new(position: Vec3, color: Vec3, tex_coord: Vec2, normal: Vec3) -> Self {
        Self {
            position,
            color,
            tex_coord,
            normal,
        }
    }

    /// Returns the size of the vertex in bytes.
    #[inline]
    pub const fn size() -> usize {
        std::mem::size_of::<Self>()
    }
}
