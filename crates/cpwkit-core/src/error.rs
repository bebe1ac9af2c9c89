//! Error types for CPWKit.
//!
//! Path construction errors are raised synchronously by the primitive that
//! caused them and never leave a half-applied mutation behind. Layout errors
//! come from the collaborators that persist geometry.
//!
//! All error types use `thiserror` for ergonomic error handling.

use std::io;
use thiserror::Error;

/// Errors raised while building a waveguide path.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PathError {
    /// The path has not been started, or has already been finalized.
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// A parameter is out of its valid domain (negative length, zero width,
    /// malformed angle token, ...).
    #[error("Invalid argument '{name}': {reason}")]
    InvalidArgument {
        /// The offending parameter name.
        name: String,
        /// Why the value was rejected.
        reason: String,
    },

    /// The requested shape is degenerate.
    #[error("Geometry error: {0}")]
    Geometry(String),
}

impl PathError {
    /// Shorthand for [`PathError::InvalidArgument`].
    pub fn invalid_argument(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Shorthand for [`PathError::InvalidState`].
    pub fn invalid_state(message: impl Into<String>) -> Self {
        Self::InvalidState(message.into())
    }

    /// Shorthand for [`PathError::Geometry`].
    pub fn geometry(message: impl Into<String>) -> Self {
        Self::Geometry(message.into())
    }
}

/// Errors raised by layout and command-stream collaborators.
#[derive(Error, Debug)]
pub enum LayoutError {
    /// I/O error while persisting a layout or script.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The DXF writer rejected the drawing.
    #[error("DXF error: {0}")]
    Dxf(String),

    /// JSON serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The requested output format is not supported.
    #[error("Unsupported layout format: {0}")]
    UnsupportedFormat(String),

    /// Unit or precision values are unusable.
    #[error("Invalid units: {0}")]
    InvalidUnits(String),

    /// Nothing to write.
    #[error("Empty layout: {0}")]
    Empty(String),
}

/// Umbrella error for operations that touch both the path and a collaborator.
#[derive(Error, Debug)]
pub enum Error {
    /// A path construction error.
    #[error(transparent)]
    Path(#[from] PathError),

    /// A layout collaborator error.
    #[error(transparent)]
    Layout(#[from] LayoutError),
}

/// Result type alias for path construction.
pub type PathResult<T> = std::result::Result<T, PathError>;

/// Result type alias for layout operations.
pub type LayoutResult<T> = std::result::Result<T, LayoutError>;

/// Result type alias for combined operations.
pub type Result<T> = std::result::Result<T, Error>;
