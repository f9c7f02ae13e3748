//! Error types for resource generation and loading.

use std::path::PathBuf;
use thiserror::Error;

/// Error type for resource operations.
#[derive(Error, Debug)]
pub enum ResourceError {
    /// Mesh parameters that cannot produce a closed surface.
    #[error("Invalid mesh parameters for {shape}: {message}")]
    InvalidMesh {
        /// Which generator rejected the parameters.
        shape: &'static str,
        /// What was wrong.
        message: String,
    },

    /// Pixel buffer does not match the stated dimensions.
    #[error("Invalid texture data: expected {expected} bytes, got {actual}")]
    InvalidTexture {
        /// Byte count implied by width x height x 4.
        expected: usize,
        /// Byte count supplied.
        actual: usize,
    },

    /// IO error during file operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Image decoding error.
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// File not found.
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),
}

/// Result type alias for resource operations.
pub type ResourceResult<T> = Result<T, ResourceError>;
