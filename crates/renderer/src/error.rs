//! Renderer error types.

use marionette_resources::ResourceError;
use thiserror::Error;

use crate::shader::ShaderStage;

/// Renderer error type.
#[derive(Error, Debug)]
pub enum RenderError {
    /// Shader failed to compile; carries the driver's info log
    #[error("{stage} shader compilation failed: {log}")]
    ShaderCompile { stage: ShaderStage, log: String },

    /// Program failed to link; carries the driver's info log
    #[error("Shader program link failed: {0}")]
    ProgramLink(String),

    /// GL refused to allocate an object
    #[error("Failed to create GL {object}: {message}")]
    Allocation {
        object: &'static str,
        message: String,
    },

    /// Geometry or texture data was rejected before upload
    #[error("Resource error: {0}")]
    Resource(#[from] ResourceError),
}

impl RenderError {
    pub(crate) fn allocation(object: &'static str) -> impl FnOnce(String) -> Self {
        move |message| Self::Allocation { object, message }
    }
}

/// Result type alias for renderer operations.
pub type RenderResult<T> = std::result::Result<T, RenderError>;

/// Pass `result` through, running `release` first if it is an error.
///
/// Used while creating several GL objects in a row so the ones already
/// created are deleted when a later one fails.
pub(crate) fn release_on_error<T>(
    result: RenderResult<T>,
    release: impl FnOnce(),
) -> RenderResult<T> {
    if result.is_err() {
        release();
    }
    result
}
