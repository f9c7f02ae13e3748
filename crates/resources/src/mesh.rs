//! Procedural mesh generation.
//!
//! Every generator returns indexed triangle lists. Buffer sizes follow the
//! tessellation parameter: a cylinder with `n` slices has `2n + 2` vertices
//! and `12n` indices, a sphere with `n` slices has `(n + 1)^2` vertices and
//! `6n^2` indices.

use std::f32::consts::{PI, TAU};

use glam::{Vec2, Vec3};
use tracing::debug;

use crate::error::{ResourceError, ResourceResult};
use crate::vertex::Vertex;

/// Fewest slices that still enclose a volume.
pub const MIN_SLICES: u32 = 3;

/// Most slices a generator accepts. Keeps vertex and index counts well
/// inside `u32` index range.
pub const MAX_SLICES: u32 = 1024;

/// CPU-side mesh ready for upload.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshData {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Check that indices form whole triangles and stay inside the vertex
    /// buffer.
    pub fn validate(&self) -> ResourceResult<()> {
        if self.indices.len() % 3 != 0 {
            return Err(invalid(
                "mesh",
                format!("{} indices do not form whole triangles", self.indices.len()),
            ));
        }
        let count = self.vertices.len();
        if let Some(&index) = self.indices.iter().find(|&&i| i as usize >= count) {
            return Err(invalid(
                "mesh",
                format!("index {index} out of range for {count} vertices"),
            ));
        }
        Ok(())
    }

    /// Axis-aligned bounds of all vertex positions.
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        let first = self.vertices.first()?.position;
        Some(self.vertices.iter().fold((first, first), |(min, max), v| {
            (min.min(v.position), max.max(v.position))
        }))
    }
}

/// Square-based pyramid, apex up, base on the XZ plane.
pub fn pyramid() -> MeshData {
    const BASE: Vec3 = Vec3::new(0.83, 0.70, 0.44);
    const APEX: Vec3 = Vec3::new(0.92, 0.86, 0.76);

    let corners = [
        Vec3::new(-0.5, 0.0, 0.5),
        Vec3::new(-0.5, 0.0, -0.5),
        Vec3::new(0.5, 0.0, -0.5),
        Vec3::new(0.5, 0.0, 0.5),
    ];
    let mut vertices: Vec<Vertex> = corners
        .iter()
        .map(|&p| {
            Vertex::new(
                p,
                BASE,
                Vec2::new(p.x + 0.5, p.z + 0.5),
                p.normalize_or_zero(),
            )
        })
        .collect();
    vertices.push(Vertex::new(
        Vec3::new(0.0, 0.8, 0.0),
        APEX,
        Vec2::new(0.5, 1.0),
        Vec3::Y,
    ));

    let indices = vec![
        0, 1, 2, //
        0, 2, 3, //
        0, 1, 4, //
        1, 2, 4, //
        2, 3, 4, //
        3, 0, 4,
    ];

    MeshData { vertices, indices }
}

/// Closed cylinder centred on the origin with its axis along Z.
///
/// Vertex colors map the position inside the bounding box to RGB.
pub fn cylinder(height: f32, radius: f32, slices: u32) -> ResourceResult<MeshData> {
    check_dimensions("cylinder", &[("height", height), ("radius", radius)])?;
    check_slices("cylinder", slices)?;

    let half = 0.5 * height;
    let color = |p: Vec3| {
        Vec3::new(
            (p.x + radius) / (2.0 * radius),
            (p.y + radius) / (2.0 * radius),
            (p.z + height) / (2.0 * height),
        )
    };

    let mut vertices = Vec::with_capacity(2 * slices as usize + 2);
    for i in 0..slices {
        let u = i as f32 / slices as f32;
        let theta = TAU * u;
        let radial = Vec3::new(theta.cos(), theta.sin(), 0.0);
        let top = radial * radius + Vec3::Z * half;
        let bottom = radial * radius - Vec3::Z * half;
        vertices.push(Vertex::new(top, color(top), Vec2::new(u, 0.0), radial));
        vertices.push(Vertex::new(bottom, color(bottom), Vec2::new(u, 1.0), radial));
    }
    let top_centre = Vec3::Z * half;
    let bottom_centre = -top_centre;
    vertices.push(Vertex::new(
        top_centre,
        color(top_centre),
        Vec2::new(0.5, 0.0),
        Vec3::Z,
    ));
    vertices.push(Vertex::new(
        bottom_centre,
        color(bottom_centre),
        Vec2::new(0.5, 1.0),
        Vec3::NEG_Z,
    ));

    let ring = 2 * slices;
    let top_index = ring;
    let bottom_index = ring + 1;
    let mut indices = Vec::with_capacity(12 * slices as usize);
    for i in 0..slices {
        let top = 2 * i;
        let bottom = top + 1;
        let next_top = (top + 2) % ring;
        let next_bottom = (top + 3) % ring;

        indices.extend_from_slice(&[top, bottom, next_top]);
        indices.extend_from_slice(&[bottom, next_bottom, next_top]);
        indices.extend_from_slice(&[top, next_top, top_index]);
        indices.extend_from_slice(&[bottom, bottom_index, next_bottom]);
    }

    debug!(height, radius, slices, vertices = vertices.len(), "cylinder generated");
    Ok(MeshData { vertices, indices })
}

/// Sphere centred on the origin with its poles on the Z axis.
///
/// Vertex colors map the position inside the bounding box to RGB.
pub fn sphere(radius: f32, slices: u32) -> ResourceResult<MeshData> {
    check_dimensions("sphere", &[("radius", radius)])?;
    check_slices("sphere", slices)?;

    let mesh = lat_long(slices, |theta, phi| {
        let normal = Vec3::new(
            theta.sin() * phi.cos(),
            theta.sin() * phi.sin(),
            theta.cos(),
        );
        let position = normal * radius;
        let color = (position + Vec3::splat(radius)) / (2.0 * radius);
        (position, color, normal)
    });
    debug!(radius, slices, vertices = mesh.vertices.len(), "sphere generated");
    Ok(mesh)
}

/// White sphere with its poles on the Y axis, for lit and textured drawing.
pub fn lit_sphere(radius: f32, slices: u32) -> ResourceResult<MeshData> {
    check_dimensions("lit sphere", &[("radius", radius)])?;
    check_slices("lit sphere", slices)?;

    let mesh = lat_long(slices, |theta, phi| {
        let normal = Vec3::new(
            theta.sin() * phi.cos(),
            theta.cos(),
            theta.sin() * phi.sin(),
        );
        (normal * radius, Vec3::ONE, normal)
    });
    debug!(radius, slices, vertices = mesh.vertices.len(), "lit sphere generated");
    Ok(mesh)
}

/// Latitude/longitude grid. `surface(theta, phi)` yields position, color and
/// normal; theta runs pole to pole, phi once around.
fn lat_long(slices: u32, surface: impl Fn(f32, f32) -> (Vec3, Vec3, Vec3)) -> MeshData {
    let stride = slices + 1;
    let mut vertices = Vec::with_capacity((stride * stride) as usize);
    for i in 0..=slices {
        let v = i as f32 / slices as f32;
        for j in 0..=slices {
            let u = j as f32 / slices as f32;
            let (position, color, normal) = surface(PI * v, TAU * u);
            vertices.push(Vertex::new(position, color, Vec2::new(u, v), normal));
        }
    }

    let mut indices = Vec::with_capacity(6 * (slices * slices) as usize);
    for i in 0..slices {
        for j in 0..slices {
            let first = i * stride + j;
            let second = first + stride;
            indices.extend_from_slice(&[first, second, first + 1]);
            indices.extend_from_slice(&[second, second + 1, first + 1]);
        }
    }

    MeshData { vertices, indices }
}

fn check_dimensions(shape: &'static str, dims: &[(&str, f32)]) -> ResourceResult<()> {
    for &(name, value) in dims {
        if !(value.is_finite() && value > 0.0) {
            return Err(invalid(shape, format!("{name} must be positive, got {value}")));
        }
    }
    Ok(())
}

fn check_slices(shape: &'static str, slices: u32) -> ResourceResult<()> {
    if !(MIN_SLICES..=MAX_SLICES).contains(&slices) {
        return Err(invalid(
            shape,
            format!("slices must be in {MIN_SLICES}..={MAX_SLICES}, got {slices}"),
        ));
    }
    Ok(())
}

fn invalid(shape: &'static str, message: String) -> ResourceError {
    ResourceError::InvalidMesh { shape, message }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-5;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    fn in_unit_range(c: Vec3) -> bool {
        c.cmpge(Vec3::ZERO).all() && c.cmple(Vec3::ONE).all()
    }

    #[test]
    fn test_pyramid() {
        let mesh = pyramid();
        assert_eq!(mesh.vertices.len(), 5);
        assert_eq!(mesh.triangle_count(), 6);
        assert!(mesh.validate().is_ok());

        let (min, max) = mesh.bounds().expect("non-empty");
        assert_eq!(min, Vec3::new(-0.5, 0.0, -0.5));
        assert_eq!(max, Vec3::new(0.5, 0.8, 0.5));
    }

    #[test]
    fn test_cylinder_counts_follow_slices() {
        for slices in [3, 16, 40] {
            let mesh = cylinder(1.5, 0.1, slices).expect("valid parameters");
            assert_eq!(mesh.vertices.len(), 2 * slices as usize + 2);
            assert_eq!(mesh.indices.len(), 12 * slices as usize);
            assert!(mesh.validate().is_ok());
        }
    }

    #[test]
    fn test_cylinder_extent() {
        let mesh = cylinder(2.0, 0.5, 16).expect("valid parameters");
        let (min, max) = mesh.bounds().expect("non-empty");

        assert!(approx_eq(min.z, -1.0));
        assert!(approx_eq(max.z, 1.0));
        assert!(approx_eq(max.x, 0.5));
        for v in &mesh.vertices {
            assert!(v.position.truncate().length() <= 0.5 + EPSILON);
            assert!(in_unit_range(v.color));
        }
    }

    #[test]
    fn test_cylinder_wraps_around() {
        // Last quad closes back onto the first ring vertices
        let slices = 8;
        let mesh = cylinder(1.0, 1.0, slices).expect("valid parameters");
        let last_quad = &mesh.indices[12 * (slices as usize - 1)..][..6];
        assert!(last_quad.contains(&0));
        assert!(last_quad.contains(&1));
    }

    #[test]
    fn test_sphere_counts_follow_slices() {
        for slices in [3, 16, 32] {
            let n = slices as usize;
            let mesh = sphere(0.15, slices).expect("valid parameters");
            assert_eq!(mesh.vertices.len(), (n + 1) * (n + 1));
            assert_eq!(mesh.indices.len(), 6 * n * n);
            assert!(mesh.validate().is_ok());
        }
    }

    #[test]
    fn test_sphere_surface() {
        let radius = 0.4;
        let mesh = sphere(radius, 16).expect("valid parameters");

        for v in &mesh.vertices {
            assert!(approx_eq(v.position.length(), radius));
            assert!(approx_eq(v.normal.length(), 1.0));
            assert!(in_unit_range(v.color));
        }
        // Poles on Z
        assert!(approx_eq(mesh.vertices[0].position.z, radius));
        assert!(approx_eq(
            mesh.vertices.last().expect("non-empty").position.z,
            -radius
        ));
    }

    #[test]
    fn test_lit_sphere() {
        let mesh = lit_sphere(1.0, 32).expect("valid parameters");

        assert_eq!(mesh.vertices.len(), 33 * 33);
        assert!(mesh.validate().is_ok());
        assert!(approx_eq(mesh.vertices[0].position.y, 1.0));
        for v in &mesh.vertices {
            assert_eq!(v.color, Vec3::ONE);
            assert!(approx_eq(v.normal.length(), 1.0));
            assert!(v.normal.abs_diff_eq(v.position, EPSILON));
            assert!((0.0..=1.0).contains(&v.tex_coord.x));
            assert!((0.0..=1.0).contains(&v.tex_coord.y));
        }
    }

    #[test]
    fn test_invalid_parameters() {
        assert!(matches!(
            cylinder(1.0, 0.1, 2),
            Err(ResourceError::InvalidMesh { shape: "cylinder", .. })
        ));
        assert!(cylinder(0.0, 0.1, 16).is_err());
        assert!(cylinder(1.0, -0.1, 16).is_err());
        assert!(sphere(f32::NAN, 16).is_err());
        assert!(lit_sphere(1.0, 0).is_err());
    }

    #[test]
    fn test_oversized_tessellation_is_rejected() {
        assert!(matches!(
            sphere(1.0, 70_000),
            Err(ResourceError::InvalidMesh { shape: "sphere", .. })
        ));
        assert!(matches!(
            cylinder(1.0, 1.0, u32::MAX),
            Err(ResourceError::InvalidMesh { shape: "cylinder", .. })
        ));
        assert!(lit_sphere(1.0, MAX_SLICES + 1).is_err());
        assert!(cylinder(1.0, 1.0, MAX_SLICES).is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_indices() {
        let mut mesh = pyramid();
        mesh.indices.push(0);
        assert!(mesh.validate().is_err());

        let mut mesh = pyramid();
        mesh.indices.extend_from_slice(&[0, 1, 5]);
        assert!(mesh.validate().is_err());
    }
}
