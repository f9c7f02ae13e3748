//! Window and OpenGL context management using winit and glutin.

use std::num::NonZeroU32;
use std::rc::Rc;

use glutin::config::{ConfigTemplateBuilder, GlConfig};
use glutin::context::{
    ContextApi, ContextAttributesBuilder, GlProfile, NotCurrentGlContext, PossiblyCurrentContext,
    Version,
};
use glutin::display::{Display, DisplayApiPreference, GlDisplay};
use glutin::surface::{GlSurface, Surface, SurfaceAttributesBuilder, SwapInterval, WindowSurface};
use glutin_winit::GlWindow;
use raw_window_handle::{HasDisplayHandle, HasWindowHandle, RawWindowHandle};
use winit::dpi::PhysicalSize;
use winit::event_loop::ActiveEventLoop;
use winit::window::{Window as WinitWindow, WindowAttributes};

use marionette_core::{Error, Result, WindowConfig};

/// A window with a current OpenGL 3.3 core context.
///
/// Fields drop in declaration order: the GL function table, then the surface
/// and context, then the native window they were created for.
pub struct Window {
    gl: Rc<glow::Context>,
    gl_surface: Surface<WindowSurface>,
    gl_context: PossiblyCurrentContext,
    window: WinitWindow,
    width: u32,
    height: u32,
}

impl Window {
    /// Create the window, pick a framebuffer config with a depth buffer, and
    /// make a GL context current on it.
    ///
    /// Fails with [`Error::Gl`] when no config has a depth buffer.
    pub fn new(event_loop: &ActiveEventLoop, config: &WindowConfig) -> Result<Self> {
        let attrs = WindowAttributes::default()
            .with_title(config.title.as_str())
            .with_inner_size(PhysicalSize::new(config.width, config.height))
            .with_resizable(true);

        // WGL picks pixel formats against an existing window
        let early_window = if cfg!(windows) {
            Some(
                event_loop
                    .create_window(attrs.clone())
                    .map_err(|e| Error::Window(format!("Failed to create window: {e}")))?,
            )
        } else {
            None
        };
        let early_handle = match &early_window {
            Some(window) => Some(raw_handle(window)?),
            None => None,
        };

        let display_handle = event_loop
            .display_handle()
            .map_err(|e| Error::Window(format!("Failed to get display handle: {e}")))?
            .as_raw();
        // SAFETY: the display handle belongs to the running event loop.
        let gl_display = unsafe { Display::new(display_handle, display_preference(early_handle)) }
            .map_err(|e| Error::Gl(format!("Failed to open GL display: {e}")))?;

        let mut template = ConfigTemplateBuilder::new().with_depth_size(24);
        if let Some(handle) = early_handle {
            template = template.compatible_with_native_window(handle);
        }
        // SAFETY: the template only references `early_window`, which is alive.
        let configs = unsafe { gl_display.find_configs(template.build()) }
            .map_err(|e| Error::Gl(format!("Failed to query framebuffer configs: {e}")))?;
        let gl_config = most_samples(configs, |config| config.num_samples()).ok_or_else(|| {
            Error::Gl("No framebuffer config with a 24-bit depth buffer".into())
        })?;

        let window = match early_window {
            Some(window) => window,
            None => glutin_winit::finalize_window(event_loop, attrs, &gl_config)
                .map_err(|e| Error::Window(format!("Failed to create window: {e}")))?,
        };

        let raw_window_handle = raw_handle(&window)?;
        let context_attributes = ContextAttributesBuilder::new()
            .with_context_api(ContextApi::OpenGl(Some(Version::new(3, 3))))
            .with_profile(GlProfile::Core)
            .build(Some(raw_window_handle));

        // SAFETY: the raw window handle belongs to `window`, which outlives
        // the context in this struct's drop order.
        let not_current = unsafe { gl_display.create_context(&gl_config, &context_attributes) }
            .map_err(|e| Error::Gl(format!("Failed to create OpenGL 3.3 context: {e}")))?;

        let surface_attributes = window
            .build_surface_attributes(SurfaceAttributesBuilder::default())
            .map_err(|e| Error::Window(format!("Failed to get surface attributes: {e}")))?;
        // SAFETY: as above, the surface never outlives the window.
        let gl_surface =
            unsafe { gl_display.create_window_surface(&gl_config, &surface_attributes) }
                .map_err(|e| Error::Gl(format!("Failed to create window surface: {e}")))?;

        let gl_context = not_current
            .make_current(&gl_surface)
            .map_err(|e| Error::Gl(format!("Failed to make context current: {e}")))?;

        if config.vsync
            && let Err(e) =
                gl_surface.set_swap_interval(&gl_context, SwapInterval::Wait(NonZeroU32::MIN))
        {
            tracing::warn!("Failed to enable vsync: {}", e);
        }

        // SAFETY: the context is current on this thread.
        let gl = unsafe {
            glow::Context::from_loader_function_cstr(|name| gl_display.get_proc_address(name))
        };

        let size = window.inner_size();
        tracing::info!(
            samples = gl_config.num_samples(),
            "Window created: {}x{}",
            size.width,
            size.height
        );

        Ok(Self {
            gl: Rc::new(gl),
            gl_surface,
            gl_context,
            window,
            width: size.width,
            height: size.height,
        })
    }

    /// Shared handle to the GL function table.
    pub fn gl(&self) -> Rc<glow::Context> {
        Rc::clone(&self.gl)
    }

    /// Get a reference to the underlying winit window.
    pub fn inner(&self) -> &WinitWindow {
        &self.window
    }

    /// Get the current width of the window.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Get the current height of the window.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Resize the GL surface to match the window (call this when handling
    /// resize events). Zero sizes are ignored.
    pub fn resize(&mut self, width: u32, height: u32) {
        let (Some(w), Some(h)) = (NonZeroU32::new(width), NonZeroU32::new(height)) else {
            return;
        };
        self.gl_surface.resize(&self.gl_context, w, h);
        self.width = width;
        self.height = height;
        tracing::debug!("Window resized: {}x{}", width, height);
    }

    /// Get the aspect ratio of the window.
    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }

    /// Present the back buffer.
    pub fn swap_buffers(&self) -> Result<()> {
        self.gl_surface
            .swap_buffers(&self.gl_context)
            .map_err(|e| Error::Gl(format!("Failed to swap buffers: {e}")))
    }

    pub fn set_cursor_visible(&self, visible: bool) {
        self.window.set_cursor_visible(visible);
    }

    /// Request a redraw of the window.
    pub fn request_redraw(&self) {
        self.window.request_redraw();
    }
}

fn raw_handle(window: &WinitWindow) -> Result<RawWindowHandle> {
    window
        .window_handle()
        .map(|handle| handle.as_raw())
        .map_err(|e| Error::Window(format!("Failed to get window handle: {e}")))
}

/// Native GL API for this platform.
fn display_preference(_window: Option<RawWindowHandle>) -> DisplayApiPreference {
    #[cfg(windows)]
    let preference = DisplayApiPreference::Wgl(_window);
    #[cfg(target_os = "macos")]
    let preference = DisplayApiPreference::Cgl;
    #[cfg(not(any(windows, target_os = "macos")))]
    let preference = DisplayApiPreference::Egl;
    preference
}

/// The candidate with the most multisampling, first one on ties.
fn most_samples<T>(candidates: impl Iterator<Item = T>, samples: impl Fn(&T) -> u8) -> Option<T> {
    candidates.reduce(|best, candidate| {
        if samples(&candidate) > samples(&best) {
            candidate
        } else {
            best
        }
    })
}
