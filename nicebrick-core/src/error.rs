//! Error types for nicebrick operations

use thiserror::Error;

/// Request validation errors.
///
/// Raised at the boundary before any side effect is performed.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required field missing: {field}")]
    RequiredFieldMissing { field: String },

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("Value {value} for {field} is out of range, expected less than {limit}")]
    OutOfRange { field: String, value: u64, limit: u64 },
}

impl ValidationError {
    pub fn missing(field: impl Into<String>) -> Self {
        Self::RequiredFieldMissing {
            field: field.into(),
        }
    }

    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Name of the offending field.
    pub fn field(&self) -> &str {
        match self {
            Self::RequiredFieldMissing { field }
            | Self::InvalidValue { field, .. }
            | Self::OutOfRange { field, .. } => field,
        }
    }
}

/// Configuration errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Content catalog is empty")]
    EmptyCatalog,

    #[error("Missing required configuration field: {field}")]
    MissingRequired { field: String },

    #[error("Invalid value for {field}: {value} - {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },
}

/// External store errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StorageError {
    #[error("Store {backend} is unavailable: {reason}")]
    Unavailable { backend: String, reason: String },

    #[error("Store operation {operation} failed: {reason}")]
    OperationFailed { operation: String, reason: String },

    #[error("Stored value under {key} is corrupt: {reason}")]
    CorruptValue { key: String, reason: String },
}

impl StorageError {
    pub fn unavailable(backend: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Unavailable {
            backend: backend.into(),
            reason: reason.into(),
        }
    }

    pub fn operation(operation: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::OperationFailed {
            operation: operation.into(),
            reason: reason.into(),
        }
    }
}

/// Artifact rendering errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RenderError {
    #[error("No renderer is configured")]
    RendererUnavailable,

    #[error("Renderer {renderer} produced no output")]
    EmptyOutput { renderer: String },

    #[error("Renderer {renderer} failed: {reason}")]
    Failed { renderer: String, reason: String },
}

/// Master error type for all nicebrick errors.
#[derive(Debug, Clone, Error)]
pub enum NiceError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Render error: {0}")]
    Render(#[from] RenderError),
}

/// Result type alias for nicebrick operations.
pub type NiceResult<T> = Result<T, NiceError>;
