//! Platform abstraction layer for the OpenGL demos.
//!
//! This crate provides platform-specific functionality:
//! - Window management via winit
//! - OpenGL context and surface creation via glutin
//! - Input handling (keyboard, mouse)

mod input;
mod window;

pub use input::{InputState, KeyCode, MouseButton};
pub use window::Window;

// Re-export winit types that users might need
pub use winit::application::ApplicationHandler;
pub use winit::event::WindowEvent;
pub use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
pub use winit::window::WindowId;
