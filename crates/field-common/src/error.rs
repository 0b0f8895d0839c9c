//! Error types for the scalar-field pipeline.

use thiserror::Error;

/// Result type alias using FieldError.
pub type FieldResult<T> = Result<T, FieldError>;

/// Primary error type for field loading, calibration and rendering.
#[derive(Debug, Error)]
pub enum FieldError {
    // === Argument Errors ===
    #[error("Invalid value for '{param}': {message}")]
    InvalidArgument { param: String, message: String },

    // === Input Errors ===
    #[error("Failed to decode {path}: {message}")]
    DecodeError { path: String, message: String },

    #[error("Failed to parse {path} (line {line}): {message}")]
    ParseError {
        path: String,
        line: usize,
        message: String,
    },

    // === Rendering Errors ===
    #[error("Rendering failed: {0}")]
    RenderError(String),

    // === Infrastructure Errors ===
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl FieldError {
    /// Shorthand for an `InvalidArgument` error.
    pub fn invalid(param: impl Into<String>, message: impl Into<String>) -> Self {
        FieldError::InvalidArgument {
            param: param.into(),
            message: message.into(),
        }
    }

    /// Short machine-readable name of the error kind, used in log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            FieldError::InvalidArgument { .. } => "InvalidArgument",
            FieldError::DecodeError { .. } => "DecodeError",
            FieldError::ParseError { .. } => "ParseError",
            FieldError::RenderError(_) => "RenderError",
            FieldError::Config(_) => "Config",
            FieldError::Io(_) => "Io",
        }
    }

    /// Process exit code for this error.
    ///
    /// Argument problems exit with 2 (the clap convention), everything else with 1.
    pub fn exit_code(&self) -> i32 {
        match self {
            FieldError::InvalidArgument { .. } => 2,
            _ => 1,
        }
    }
}

impl From<serde_json::Error> for FieldError {
    fn from(err: serde_json::Error) -> Self {
        FieldError::Config(format!("JSON error: {}", err))
    }
}
