//! marionette - scene-graph demos on OpenGL.
//!
//! `marionette [pyramid|rig|sphere] [texture-path]`
//!
//! W/A/S/D move, Space/Left Ctrl rise and sink, drag with the left mouse
//! button to look around. In the rig demo, hold F to walk.

mod demo;

use anyhow::{Context, Result};
use glam::{Vec2, Vec3};
use tracing::{debug, error, info};

use marionette_core::{Config, FrameTimer};
use marionette_platform::{
    ActiveEventLoop, ApplicationHandler, ControlFlow, EventLoop, InputState, KeyCode, MouseButton,
    Window, WindowEvent, WindowId,
};
use marionette_renderer::Renderer;
use marionette_scene::{Camera, FlyController, FlyInput};

use crate::demo::DemoScene;

/// Everything that needs a live GL context.
///
/// Fields drop in declaration order, so GL objects owned by the scene are
/// freed while the window's context still exists.
struct Running {
    scene: DemoScene,
    renderer: Renderer,
    window: Window,
    camera: Camera,
    controller: FlyController,
}

impl Running {
    fn new(event_loop: &ActiveEventLoop, config: &Config) -> Result<Self> {
        let window = Window::new(event_loop, &config.window).context("creating window")?;
        let renderer = Renderer::new(
            window.gl(),
            window.width(),
            window.height(),
            config.clear_color,
        );
        let scene = DemoScene::build(config, &renderer).context("building scene")?;

        let camera_config = &config.camera;
        let camera = Camera::new(
            Vec3::from(camera_config.position),
            camera_config.fov_y_degrees,
            window.aspect_ratio(),
            camera_config.near,
            camera_config.far,
        );
        let mut controller = FlyController::new(
            camera_config.speed,
            camera_config.sensitivity,
            camera_config.pole_margin_degrees,
        );
        controller.set_viewport_height(window.height());

        Ok(Self {
            scene,
            renderer,
            window,
            camera,
            controller,
        })
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.window.resize(width, height);
        if self.renderer.resize(width, height) {
            self.camera.set_viewport(width, height);
            self.controller.set_viewport_height(height);
        }
    }

    fn frame(&mut self, input: &InputState) -> Result<()> {
        if input.is_mouse_just_pressed(MouseButton::Left) {
            self.window.set_cursor_visible(false);
        } else if input.is_mouse_just_released(MouseButton::Left) {
            self.window.set_cursor_visible(true);
        }
        self.controller.update(&mut self.camera, &fly_input(input));
        self.scene.update(input);

        self.renderer.begin_frame();
        self.scene.draw(&self.camera);
        self.window.swap_buffers()?;
        Ok(())
    }
}

/// Map held keys and the left-button drag onto fly-controller input.
fn fly_input(input: &InputState) -> FlyInput {
    // The press frame's delta includes travel from before the button went down
    let dragging = input.is_mouse_pressed(MouseButton::Left)
        && !input.is_mouse_just_pressed(MouseButton::Left);
    let (dx, dy) = input.mouse_delta();

    FlyInput {
        forward: input.axis(KeyCode::KeyW, KeyCode::KeyS),
        right: input.axis(KeyCode::KeyD, KeyCode::KeyA),
        up: input.axis(KeyCode::Space, KeyCode::ControlLeft),
        look: dragging.then_some(Vec2::new(dx, dy)),
    }
}

struct App {
    config: Config,
    running: Option<Running>,
    input: InputState,
    timer: FrameTimer,
}

impl App {
    fn new(config: Config) -> Self {
        Self {
            config,
            running: None,
            input: InputState::new(),
            timer: FrameTimer::new(),
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.running.is_some() {
            return;
        }
        match Running::new(event_loop, &self.config) {
            Ok(running) => {
                info!("Initialization complete, entering main loop");
                self.running = Some(running);
            }
            Err(e) => {
                error!("Failed to initialize: {:#}", e);
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        if self.input.handle_event(&event) {
            if self.input.is_key_just_pressed(KeyCode::Escape) {
                info!("Escape pressed, shutting down");
                event_loop.exit();
            }
            return;
        }

        match event {
            WindowEvent::CloseRequested => {
                info!("Close requested, shutting down");
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                if let Some(running) = &mut self.running {
                    running.resize(size.width, size.height);
                }
            }
            WindowEvent::RedrawRequested => {
                let Some(running) = &mut self.running else {
                    return;
                };
                self.timer.tick();
                if let Err(e) = running.frame(&self.input) {
                    error!("Render error: {:#}", e);
                    event_loop.exit();
                }
                self.input.begin_frame();

                if let Some(fps) = self.timer.fps() {
                    debug!(fps, frames = self.timer.frame_count(), "frame stats");
                }
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(running) = &self.running {
            running.window.request_redraw();
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        // Free GL objects before the event loop tears the window down
        self.running = None;
        info!(
            frames = self.timer.frame_count(),
            seconds = self.timer.elapsed().as_secs_f32(),
            "Shut down"
        );
    }
}

fn main() -> Result<()> {
    marionette_core::init_logging();

    let config = Config::from_args(std::env::args().skip(1))?;
    info!(demo = %config.demo, "Starting marionette");

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(config);
    event_loop.run_app(&mut app)?;

    Ok(())
}
