//! Error Types for the nicebrick API
//!
//! This module defines error handling for the API layer, including:
//! - ApiError struct for structured error responses
//! - ErrorCode enum for categorizing errors
//! - IntoResponse implementation for Axum HTTP responses
//!
//! All errors are serialized as JSON with appropriate HTTP status codes.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use nicebrick_core::{ConfigError, NiceError, RenderError, StorageError, ValidationError};
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// ERROR CODE ENUM
// ============================================================================

/// Error codes for API responses.
///
/// Each code maps to a fixed HTTP status and is the stable, machine-checkable
/// reason string carried in every error body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // ========================================================================
    // Validation Errors (400)
    // ========================================================================
    /// Request body or query could not be parsed
    InvalidInput,

    /// Required field is missing from request
    MissingField,

    /// Field value is out of valid range
    InvalidRange,

    /// Field format is incorrect
    InvalidFormat,

    // ========================================================================
    // Not Found Errors (404)
    // ========================================================================
    /// No route or resource matches the request
    NotFound,

    // ========================================================================
    // Server Errors (500, 503)
    // ========================================================================
    /// Internal server error
    InternalError,

    /// The artifact renderer produced no usable output
    GenerationFailed,

    /// The server is misconfigured
    ConfigurationError,

    /// The external store or renderer is unreachable
    UpstreamUnavailable,
}

impl ErrorCode {
    /// Get the HTTP status code for this error code.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ErrorCode::InvalidInput
            | ErrorCode::MissingField
            | ErrorCode::InvalidRange
            | ErrorCode::InvalidFormat => StatusCode::BAD_REQUEST,

            ErrorCode::NotFound => StatusCode::NOT_FOUND,

            ErrorCode::UpstreamUnavailable => StatusCode::SERVICE_UNAVAILABLE,

            ErrorCode::InternalError
            | ErrorCode::GenerationFailed
            | ErrorCode::ConfigurationError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get a default message for this error code.
    pub fn default_message(&self) -> &'static str {
        match self {
            ErrorCode::InvalidInput => "Invalid input data",
            ErrorCode::MissingField => "Required field is missing",
            ErrorCode::InvalidRange => "Value is out of valid range",
            ErrorCode::InvalidFormat => "Invalid format",
            ErrorCode::NotFound => "Not found",
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::GenerationFailed => "Failed to generate artifact",
            ErrorCode::ConfigurationError => "Server is misconfigured",
            ErrorCode::UpstreamUnavailable => "Upstream service unavailable",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

// ============================================================================
// API ERROR STRUCT
// ============================================================================

/// Structured error response for API operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ApiError {
    /// Error code categorizing the error
    pub code: ErrorCode,

    /// Human-readable error message
    pub message: String,

    /// Optional additional details (offending field, limits)
    #[serde(skip_serializing_if = "Option::is_none")]
    #[cfg_attr(feature = "openapi", schema(value_type = Option<Object>))]
    pub details: Option<serde_json::Value>,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    /// Create a new API error with the given code, using the default message.
    pub fn from_code(code: ErrorCode) -> Self {
        Self::new(code, code.default_message())
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    pub fn status_code(&self) -> StatusCode {
        self.code.status_code()
    }

    // ========================================================================
    // Convenience constructors for common errors
    // ========================================================================

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, message)
    }

    pub fn missing_field(field: &str) -> Self {
        Self::new(
            ErrorCode::MissingField,
            format!("Required field '{}' is missing", field),
        )
        .with_details(serde_json::json!({ "field": field }))
    }

    pub fn invalid_range(field: &str, value: impl fmt::Display, limit: impl fmt::Display) -> Self {
        Self::new(
            ErrorCode::InvalidRange,
            format!("Field '{}' is {}, expected less than {}", field, value, limit),
        )
        .with_details(serde_json::json!({ "field": field }))
    }

    pub fn invalid_format(field: &str, reason: &str) -> Self {
        Self::new(
            ErrorCode::InvalidFormat,
            format!("Field '{}' has invalid format: {}", field, reason),
        )
        .with_details(serde_json::json!({ "field": field }))
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, message)
    }

    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }

    pub fn generation_failed(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::GenerationFailed, message)
    }

    pub fn configuration_error(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigurationError, message)
    }

    pub fn upstream_unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::UpstreamUnavailable, message)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

// ============================================================================
// AXUM INTEGRATION
// ============================================================================

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(self);
        (status, body).into_response()
    }
}

// ============================================================================
// CONVERSIONS FROM DOMAIN ERRORS
// ============================================================================

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        match &err {
            ValidationError::RequiredFieldMissing { field } => ApiError::missing_field(field),
            ValidationError::InvalidValue { field, reason } => {
                ApiError::invalid_format(field, reason)
            }
            ValidationError::OutOfRange {
                field,
                value,
                limit,
            } => ApiError::invalid_range(field, value, limit),
        }
    }
}

impl From<ConfigError> for ApiError {
    fn from(err: ConfigError) -> Self {
        tracing::error!(error = %err, "Configuration error");
        ApiError::configuration_error(err.to_string())
    }
}

/// Store failures never expose backend details to the caller.
impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        tracing::error!(error = %err, "Store operation failed");
        match err {
            StorageError::Unavailable { .. } => {
                ApiError::upstream_unavailable("Vote store is unavailable, please retry later")
            }
            StorageError::OperationFailed { .. } | StorageError::CorruptValue { .. } => {
                ApiError::internal_error("Vote store operation failed")
            }
        }
    }
}

impl From<RenderError> for ApiError {
    fn from(err: RenderError) -> Self {
        tracing::error!(error = %err, "Artifact rendering failed");
        match err {
            RenderError::RendererUnavailable => {
                ApiError::upstream_unavailable("Artifact renderer is not configured")
            }
            RenderError::EmptyOutput { .. } | RenderError::Failed { .. } => {
                ApiError::generation_failed("Failed to generate artifact")
            }
        }
    }
}

impl From<NiceError> for ApiError {
    fn from(err: NiceError) -> Self {
        match err {
            NiceError::Validation(e) => e.into(),
            NiceError::Config(e) => e.into(),
            NiceError::Storage(e) => e.into(),
            NiceError::Render(e) => e.into(),
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        tracing::error!("JSON serialization error: {:?}", err);
        ApiError::internal_error("Failed to serialize response")
    }
}

// ============================================================================
// RESULT TYPE ALIAS
// ============================================================================

/// Result type alias for API operations.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_status_mapping() {
        assert_eq!(ErrorCode::MissingField.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ErrorCode::InvalidFormat.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ErrorCode::NotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(ErrorCode::InternalError.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(ErrorCode::GenerationFailed.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            ErrorCode::UpstreamUnavailable.status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn test_validation_error_conversion() {
        let err = ApiError::from(ValidationError::missing("voteKind"));
        assert_eq!(err.code, ErrorCode::MissingField);
        assert_eq!(err.details, Some(serde_json::json!({ "field": "voteKind" })));

        let err = ApiError::from(ValidationError::OutOfRange {
            field: "index".into(),
            value: 30,
            limit: 25,
        });
        assert_eq!(err.code, ErrorCode::InvalidRange);
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.message, "Field 'index' is 30, expected less than 25");

        let err = ApiError::from(ValidationError::invalid("primaryColor", "expected six hex digits"));
        assert_eq!(err.code, ErrorCode::InvalidFormat);
        assert_eq!(
            err.message,
            "Field 'primaryColor' has invalid format: expected six hex digits"
        );
        assert_eq!(err.details, Some(serde_json::json!({ "field": "primaryColor" })));
    }

    #[test]
    fn test_storage_error_does_not_leak_details() {
        let err = ApiError::from(StorageError::unavailable("postgres", "password rejected"));
        assert_eq!(err.code, ErrorCode::UpstreamUnavailable);
        assert!(!err.message.contains("password"));

        let err = ApiError::from(StorageError::operation("incr", "syntax error at or near"));
        assert_eq!(err.code, ErrorCode::InternalError);
        assert!(!err.message.contains("syntax"));
    }

    #[test]
    fn test_render_error_conversion() {
        let err = ApiError::from(RenderError::EmptyOutput {
            renderer: "svg".into(),
        });
        assert_eq!(err.code, ErrorCode::GenerationFailed);
        let err = ApiError::from(NiceError::from(RenderError::RendererUnavailable));
        assert_eq!(err.code, ErrorCode::UpstreamUnavailable);
    }

    #[test]
    fn test_error_serialization() -> Result<(), serde_json::Error> {
        let err = ApiError::from_code(ErrorCode::UpstreamUnavailable);
        let json = serde_json::to_string(&err)?;
        assert!(json.contains("UPSTREAM_UNAVAILABLE"));
        assert!(!json.contains("details"));

        let deserialized: ApiError = serde_json::from_str(&json)?;
        assert_eq!(deserialized, err);
        Ok(())
    }

    #[test]
    fn test_error_display() {
        let err = ApiError::generation_failed("renderer returned nothing");
        let display = format!("{}", err);
        assert!(display.contains("GenerationFailed"));
        assert!(display.contains("renderer returned nothing"));
    }
}
