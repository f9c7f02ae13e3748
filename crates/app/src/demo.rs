//! Demo scenes: what each one builds, animates and draws.

use std::rc::Rc;

use anyhow::{Context, Result};
use glam::{Mat4, Vec3};
use tracing::{info, warn};

use marionette_core::{Config, Demo};
use marionette_platform::{InputState, KeyCode};
use marionette_renderer::{
    LightUniforms, MeshDrawable, Renderer, ShaderProgram, ShaderSource,
};
use marionette_resources::{self as resources, TextureData};
use marionette_scene::{
    Camera, Node, PointLight, Rig, RigConfig, WalkCycle, WalkConfig, rotation_degrees,
};

/// Degrees the pyramid turns per frame.
const PYRAMID_SPIN_DEGREES: f32 = 1.0;
const SPHERE_RADIUS: f32 = 1.0;
const SPHERE_SLICES: u32 = 32;
const LIGHT_MARKER_RADIUS: f32 = 0.25;
const CHECKERBOARD_SIZE: u32 = 256;
const CHECKERBOARD_CELLS: u32 = 8;

/// Key held to make the rig walk.
pub const WALK_KEY: KeyCode = KeyCode::KeyF;

pub enum DemoScene {
    Pyramid {
        root: Node,
    },
    Rig {
        rig: Rig,
        walk: WalkCycle,
    },
    Sphere {
        root: Node,
        lit: Rc<ShaderProgram>,
        emissive: Rc<ShaderProgram>,
        light: PointLight,
    },
}

impl DemoScene {
    pub fn build(config: &Config, renderer: &Renderer) -> Result<Self> {
        let scene = match config.demo {
            Demo::Pyramid => Self::pyramid(renderer)?,
            Demo::Rig => Self::rig(renderer)?,
            Demo::Sphere => Self::sphere(config, renderer)?,
        };
        info!(demo = %config.demo, "scene built");
        Ok(scene)
    }

    fn pyramid(renderer: &Renderer) -> Result<Self> {
        let flat = renderer.program(&ShaderSource::FLAT)?;
        let mesh = renderer.mesh(&resources::pyramid())?;

        let mut root = Node::named("pyramid", Mat4::IDENTITY);
        root.add(Box::new(MeshDrawable::new(mesh, flat)));
        Ok(Self::Pyramid { root })
    }

    fn rig(renderer: &Renderer) -> Result<Self> {
        let flat = renderer.program(&ShaderSource::FLAT)?;
        let mut factory = renderer.primitive_factory(flat);
        let rig = Rig::build(&RigConfig::default(), &mut factory).context("building rig")?;
        info!(
            nodes = rig.root().node_count(),
            meshes = factory.mesh_count(),
            "rig ready, hold F to walk"
        );

        Ok(Self::Rig {
            rig,
            walk: WalkCycle::new(WalkConfig::default()),
        })
    }

    fn sphere(config: &Config, renderer: &Renderer) -> Result<Self> {
        let lit = renderer.program(&ShaderSource::LIT)?;
        let emissive = renderer.program(&ShaderSource::EMISSIVE)?;
        let light = PointLight::default();

        let texture = renderer.texture(&sphere_texture(config.texture_path.as_deref()))?;
        let sphere_mesh = renderer.mesh(&resources::lit_sphere(SPHERE_RADIUS, SPHERE_SLICES)?)?;
        let marker_mesh =
            renderer.mesh(&resources::lit_sphere(LIGHT_MARKER_RADIUS, SPHERE_SLICES)?)?;

        let mut root = Node::named("world", Mat4::IDENTITY);
        let mut sphere = Node::named("sphere", Mat4::IDENTITY);
        sphere.add(Box::new(
            MeshDrawable::new(sphere_mesh, Rc::clone(&lit)).with_texture(texture),
        ));
        let mut marker = Node::named("light", light.model_matrix());
        marker.add(Box::new(MeshDrawable::new(marker_mesh, Rc::clone(&emissive))));
        root.add(sphere);
        root.add(marker);

        Ok(Self::Sphere {
            root,
            lit,
            emissive,
            light,
        })
    }

    /// Advance animation by one frame.
    pub fn update(&mut self, input: &InputState) {
        match self {
            Self::Pyramid { root } => {
                root.transform(rotation_degrees(Vec3::Y, PYRAMID_SPIN_DEGREES));
            }
            Self::Rig { rig, walk } => {
                if input.is_key_pressed(WALK_KEY) {
                    walk.advance(rig);
                }
            }
            Self::Sphere { .. } => {}
        }
    }

    pub fn draw(&self, camera: &Camera) {
        let view = camera.view_matrix();
        let projection = camera.projection_matrix();

        match self {
            Self::Pyramid { root } => root.draw(&Mat4::IDENTITY, &view, &projection),
            Self::Rig { rig, .. } => rig.draw(&view, &projection),
            Self::Sphere {
                root,
                lit,
                emissive,
                light,
            } => {
                let uniforms = LightUniforms::new(light, camera);
                lit.bind();
                uniforms.apply(lit);
                emissive.bind();
                uniforms.apply_emissive(emissive);
                root.draw(&Mat4::IDENTITY, &view, &projection);
            }
        }
    }
}

/// The requested texture, or a checkerboard if none was given or it fails to
/// load.
fn sphere_texture(path: Option<&str>) -> TextureData {
    let fallback = || TextureData::checkerboard(CHECKERBOARD_SIZE, CHECKERBOARD_CELLS);
    match path {
        Some(path) => TextureData::load(path).unwrap_or_else(|e| {
            warn!(path, "Failed to load texture, using checkerboard: {}", e);
            fallback()
        }),
        None => fallback(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_texture_falls_back() {
        let texture = sphere_texture(Some("no/such/texture.png"));
        assert_eq!(texture.width(), CHECKERBOARD_SIZE);
        assert_eq!(texture, sphere_texture(None));
    }
}
