//! Runtime configuration.
//!
//! Defaults reproduce the constants the demos were tuned with. Each demo
//! tweaks the window size and camera start through [`Config::for_demo`].

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// The demos the launcher knows how to run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Demo {
    /// Coloured pyramid spinning about its Y axis.
    Pyramid,
    /// Articulated stick figure with a walk cycle.
    #[default]
    Rig,
    /// Textured sphere lit by a point light.
    Sphere,
}

impl Demo {
    /// All demos, in presentation order.
    pub const ALL: [Demo; 3] = [Demo::Pyramid, Demo::Rig, Demo::Sphere];

    /// Name used on the command line.
    pub fn name(self) -> &'static str {
        match self {
            Demo::Pyramid => "pyramid",
            Demo::Rig => "rig",
            Demo::Sphere => "sphere",
        }
    }
}

impl fmt::Display for Demo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Demo {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_ascii_lowercase();
        Demo::ALL
            .into_iter()
            .find(|demo| demo.name() == wanted)
            .ok_or_else(|| {
                let known: Vec<_> = Demo::ALL.iter().map(|d| d.name()).collect();
                Error::Config(format!(
                    "unknown demo '{s}', expected one of: {}",
                    known.join(", ")
                ))
            })
    }
}

/// Window settings.
#[derive(Clone, Debug, PartialEq)]
pub struct WindowConfig {
    /// Initial inner width in physical pixels
    pub width: u32,
    /// Initial inner height in physical pixels
    pub height: u32,
    /// Window title
    pub title: String,
    /// Wait for vertical sync when presenting
    pub vsync: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1000,
            height: 1000,
            title: "marionette".to_string(),
            vsync: true,
        }
    }
}

/// Camera and fly-controller settings.
#[derive(Clone, Debug, PartialEq)]
pub struct CameraConfig {
    /// Initial camera position
    pub position: [f32; 3],
    /// Vertical field of view in degrees
    pub fov_y_degrees: f32,
    /// Near clip plane
    pub near: f32,
    /// Far clip plane
    pub far: f32,
    /// Distance moved per frame while a movement key is held
    pub speed: f32,
    /// Degrees of rotation for a mouse drag spanning the window height
    pub sensitivity: f32,
    /// Pitch changes closer than this to straight up or down are rejected
    pub pole_margin_degrees: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: [0.0, 0.0, 8.0],
            fov_y_degrees: 45.0,
            near: 0.1,
            far: 100.0,
            speed: 0.1,
            sensitivity: 100.0,
            pole_margin_degrees: 5.0,
        }
    }
}

/// Top-level application configuration.
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub demo: Demo,
    pub window: WindowConfig,
    pub camera: CameraConfig,
    /// RGBA clear colour
    pub clear_color: [f32; 4],
    /// Optional texture for the lit sphere; a checkerboard is used otherwise
    pub texture_path: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self::for_demo(Demo::default())
    }
}

impl Config {
    /// Defaults for a specific demo.
    pub fn for_demo(demo: Demo) -> Self {
        let mut window = WindowConfig::default();
        let mut camera = CameraConfig::default();

        match demo {
            Demo::Pyramid => {
                window.width = 800;
                window.height = 800;
                camera.position = [0.0, 0.5, 3.0];
            }
            Demo::Rig => {}
            Demo::Sphere => {
                window.width = 800;
                window.height = 800;
                camera.position = [0.0, 0.0, 5.0];
            }
        }
        window.title = format!("marionette - {demo}");

        Self {
            demo,
            window,
            camera,
            clear_color: [0.07, 0.13, 0.17, 1.0],
            texture_path: None,
        }
    }

    /// Build a configuration from command-line arguments (program name
    /// already stripped): `[demo] [texture-path]`.
    pub fn from_args<I, S>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut args = args.into_iter();
        let demo = match args.next() {
            Some(name) => name.as_ref().parse()?,
            None => Demo::default(),
        };

        let mut config = Self::for_demo(demo);
        config.texture_path = args.next().map(|p| p.as_ref().to_string());

        if let Some(extra) = args.next() {
            return Err(Error::Config(format!(
                "unexpected argument '{}'",
                extra.as_ref()
            )));
        }

        config.validate()?;
        Ok(config)
    }

    /// Width over height of the initial window.
    pub fn aspect_ratio(&self) -> f32 {
        self.window.width as f32 / self.window.height as f32
    }

    /// Check that the values describe something renderable.
    pub fn validate(&self) -> Result<()> {
        if self.window.width == 0 || self.window.height == 0 {
            return Err(Error::Config(format!(
                "window size must be non-zero, got {}x{}",
                self.window.width, self.window.height
            )));
        }

        let camera = &self.camera;
        if !(camera.fov_y_degrees > 0.0 && camera.fov_y_degrees < 180.0) {
            return Err(Error::Config(format!(
                "field of view must be within (0, 180) degrees, got {}",
                camera.fov_y_degrees
            )));
        }
        if !(camera.near > 0.0 && camera.near < camera.far) {
            return Err(Error::Config(format!(
                "clip planes must satisfy 0 < near < far, got near={} far={}",
                camera.near, camera.far
            )));
        }
        if camera.speed < 0.0 || camera.sensitivity < 0.0 {
            return Err(Error::Config(
                "camera speed and sensitivity must not be negative".to_string(),
            ));
        }
        if !(0.0..90.0).contains(&camera.pole_margin_degrees) {
            return Err(Error::Config(format!(
                "pole margin must be within [0, 90) degrees, got {}",
                camera.pole_margin_degrees
            )));
        }

        Ok(())
    }
}
