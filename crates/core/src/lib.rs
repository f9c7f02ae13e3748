//! Core utilities for marionette.
//!
//! This crate provides foundational types used across the workspace:
//! - Error types and result aliases
//! - Logging initialization
//! - Frame timing
//! - Configuration

mod config;
mod error;
mod logging;
mod timer;

pub use config::{CameraConfig, Config, Demo, WindowConfig};
pub use error::{Error, Result};
pub use logging::{DEFAULT_FILTER, init_logging};
pub use timer::FrameTimer;
