//! Error types for geoplot rendering.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias using PlotError.
pub type PlotResult<T> = Result<T, PlotError>;

/// Primary error type for render calls.
///
/// Every variant except `BoundaryLoad` and `Config` is request-scoped: the
/// process keeps serving other renders after returning it.
#[derive(Debug, Clone, Error)]
pub enum PlotError {
    // === Startup Errors ===
    #[error("Failed to load boundaries: {0}")]
    BoundaryLoad(String),

    #[error("Invalid engine configuration: {0}")]
    Config(String),

    // === Validation Errors ===
    #[error("Unknown level: '{0}' (expected one of: county, town)")]
    UnknownLevel(String),

    #[error("Unknown colormap: '{0}'")]
    UnknownColormap(String),

    #[error("Length of '{field}' is {actual}, expected {expected} (one per point)")]
    ArrayLengthMismatch {
        field: String,
        expected: usize,
        actual: usize,
    },

    #[error("Invalid parameter value for '{param}': {message}")]
    InvalidParameter { param: String, message: String },

    #[error("Invalid color: '{0}'")]
    InvalidColor(String),

    // === Join Errors ===
    #[error("No data row matched any region at level '{0}'")]
    EmptyJoin(String),

    // === Rendering Errors ===
    #[error("Rendering failed: {0}")]
    Render(String),
}

/// Stable, protocol-agnostic error classification.
///
/// The service layer maps these to its own status codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    BoundaryLoadError,
    ConfigError,
    UnknownLevelError,
    UnknownColormapError,
    ArrayLengthMismatchError,
    InvalidParameterError,
    InvalidColorError,
    EmptyJoinError,
    RenderError,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::BoundaryLoadError => "BoundaryLoadError",
            ErrorKind::ConfigError => "ConfigError",
            ErrorKind::UnknownLevelError => "UnknownLevelError",
            ErrorKind::UnknownColormapError => "UnknownColormapError",
            ErrorKind::ArrayLengthMismatchError => "ArrayLengthMismatchError",
            ErrorKind::InvalidParameterError => "InvalidParameterError",
            ErrorKind::InvalidColorError => "InvalidColorError",
            ErrorKind::EmptyJoinError => "EmptyJoinError",
            ErrorKind::RenderError => "RenderError",
        }
    }
}

/// Serializable error body handed to the service layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorPayload {
    pub kind: ErrorKind,
    pub message: String,
}

impl PlotError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            PlotError::BoundaryLoad(_) => ErrorKind::BoundaryLoadError,
            PlotError::Config(_) => ErrorKind::ConfigError,
            PlotError::UnknownLevel(_) => ErrorKind::UnknownLevelError,
            PlotError::UnknownColormap(_) => ErrorKind::UnknownColormapError,
            PlotError::ArrayLengthMismatch { .. } => ErrorKind::ArrayLengthMismatchError,
            PlotError::InvalidParameter { .. } => ErrorKind::InvalidParameterError,
            PlotError::InvalidColor(_) => ErrorKind::InvalidColorError,
            PlotError::EmptyJoin(_) => ErrorKind::EmptyJoinError,
            PlotError::Render(_) => ErrorKind::RenderError,
        }
    }

    /// Whether this error was raised by request validation, before any
    /// geometry was touched.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            PlotError::UnknownLevel(_)
                | PlotError::UnknownColormap(_)
                | PlotError::ArrayLengthMismatch { .. }
                | PlotError::InvalidParameter { .. }
                | PlotError::InvalidColor(_)
        )
    }

    pub fn payload(&self) -> ErrorPayload {
        ErrorPayload {
            kind: self.kind(),
            message: self.to_string(),
        }
    }

    /// Create an InvalidParameter error.
    pub fn invalid_parameter(param: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            param: param.into(),
            message: message.into(),
        }
    }

    /// Create an ArrayLengthMismatch error.
    pub fn length_mismatch(field: impl Into<String>, expected: usize, actual: usize) -> Self {
        Self::ArrayLengthMismatch {
            field: field.into(),
            expected,
            actual,
        }
    }

    /// Create a BoundaryLoad error.
    pub fn boundary_load(msg: impl Into<String>) -> Self {
        Self::BoundaryLoad(msg.into())
    }

    /// Create a Render error.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }
}

impl From<std::io::Error> for PlotError {
    fn from(err: std::io::Error) -> Self {
        PlotError::BoundaryLoad(err.to_string())
    }
}

impl From<serde_json::Error> for PlotError {
    fn from(err: serde_json::Error) -> Self {
        PlotError::InvalidParameter {
            param: "request".to_string(),
            message: format!("JSON error: {}", err),
        }
    }
}
