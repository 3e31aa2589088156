//! Error types for FrameScrub.

use thiserror::Error;

use crate::frame::BufferShape;

/// Main error type for FrameScrub operations.
#[derive(Error, Debug)]
pub enum ScrubError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Two buffers handed to the diff engine do not share a shape.
    /// Both must come out of the same decode pipeline.
    #[error("Buffer shape mismatch: {left} vs {right}")]
    ShapeMismatch {
        left: BufferShape,
        right: BufferShape,
    },

    #[error("Invalid buffer: {0}")]
    InvalidBuffer(String),

    #[error("Decoder error: {0}")]
    Decoder(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type alias for FrameScrub operations.
pub type Result<T> = std::result::Result<T, ScrubError>;
