//! Unified error types for all layers of the application.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use thiserror::Error;

/// Unified error type for all layers of the Redeem service.
///
/// The redemption outcomes (`AlreadyInProgress`, `AlreadyRedeemed`, `NotFound`,
/// `ExternalService`, `Persistence`, `Publish`) are what the transport layer
/// reports back to a customer. The remaining variants cover configuration,
/// validation and infrastructure concerns.
#[derive(Error, Debug)]
pub enum RedeemError {
    // ============ Redemption Outcomes ============
    /// Another attempt for the same customer and gift code is being processed.
    #[error("Redemption already in progress for {mobile} and gift code {gift_code}")]
    AlreadyInProgress { mobile: String, gift_code: String },

    /// The customer has already redeemed this gift code.
    #[error("Gift code {gift_code} was already redeemed by {mobile}")]
    AlreadyRedeemed { mobile: String, gift_code: String },

    /// Resource not found (including gift codes outside their validity window)
    #[error("Resource not found: {resource_type} with id {id}")]
    NotFound {
        resource_type: &'static str,
        id: String,
    },

    /// External service error (wallet charge RPC)
    #[error("External service error: {service} - {message}")]
    ExternalService { service: String, message: String },

    /// Relational store read, write or commit failed
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// Event emission failed
    #[error("Publish error: {subject} - {message}")]
    Publish { subject: String, message: String },

    // ============ Request Errors ============
    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Conflict error (e.g., duplicate entry)
    #[error("Conflict: {0}")]
    Conflict(String),

    // ============ Infrastructure Errors ============
    /// Redis/Cache error
    #[error("Cache error: {0}")]
    Cache(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Deadline exceeded
    #[error("Operation timed out: {0}")]
    Timeout(String),

    /// Cancelled by the caller
    #[error("Operation cancelled: {0}")]
    Cancelled(String),

    // ============ Internal Errors ============
    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),

    /// Generic error wrapper
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl RedeemError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::NotFound { .. } => 404,
            Self::Validation(_) => 400,
            Self::AlreadyInProgress { .. } | Self::AlreadyRedeemed { .. } | Self::Conflict(_) => 409,
            Self::ExternalService { .. } | Self::Publish { .. } => 502,
            Self::Timeout(_) | Self::Cancelled(_) => 503,
            Self::Persistence(_)
            | Self::Cache(_)
            | Self::Configuration(_)
            | Self::Internal(_)
            | Self::Other(_) => 500,
        }
    }

    /// Returns a machine-readable error code.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::AlreadyInProgress { .. } => "ALREADY_IN_PROGRESS",
            Self::AlreadyRedeemed { .. } => "ALREADY_REDEEMED",
            Self::NotFound { .. } => "NOT_FOUND",
            Self::ExternalService { .. } => "EXTERNAL_SERVICE_FAILURE",
            Self::Persistence(_) => "PERSISTENCE_FAILURE",
            Self::Publish { .. } => "PUBLISH_FAILURE",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Conflict(_) => "CONFLICT",
            Self::Cache(_) => "CACHE_ERROR",
            Self::Configuration(_) => "CONFIGURATION_ERROR",
            Self::Timeout(_) => "TIMEOUT",
            Self::Cancelled(_) => "CANCELLED",
            Self::Internal(_) | Self::Other(_) => "INTERNAL_ERROR",
        }
    }

    /// Creates a not found error for a resource.
    #[must_use]
    pub fn not_found<T: ToString>(resource_type: &'static str, id: T) -> Self {
        Self::NotFound {
            resource_type,
            id: id.to_string(),
        }
    }

    /// Creates a validation error.
    #[must_use]
    pub fn validation<T: Into<String>>(message: T) -> Self {
        Self::Validation(message.into())
    }

    /// Creates a persistence error.
    #[must_use]
    pub fn persistence<T: Into<String>>(message: T) -> Self {
        Self::Persistence(message.into())
    }

    /// Creates an external service error.
    #[must_use]
    pub fn external<S: Into<String>, M: Into<String>>(service: S, message: M) -> Self {
        Self::ExternalService {
            service: service.into(),
            message: message.into(),
        }
    }

    /// Creates a publish error.
    #[must_use]
    pub fn publish<S: Into<String>, M: Into<String>>(subject: S, message: M) -> Self {
        Self::Publish {
            subject: subject.into(),
            message: message.into(),
        }
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal<T: Into<String>>(message: T) -> Self {
        Self::Internal(message.into())
    }

    /// Checks if this error is a "not found" outcome.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Checks if a caller may retry the operation that produced this error.
    ///
    /// `Publish` is deliberately absent: the report is already committed, so a
    /// retry ends in `AlreadyRedeemed`.
    #[must_use]
    pub const fn is_retriable(&self) -> bool {
        matches!(
            self,
            Self::AlreadyInProgress { .. }
                | Self::Persistence(_)
                | Self::ExternalService { .. }
                | Self::Cache(_)
                | Self::Timeout(_)
        )
    }

    /// Prefixes the message of string-carrying variants with call-site context.
    #[must_use]
    pub fn context(self, context: &str) -> Self {
        match self {
            Self::Persistence(msg) => Self::Persistence(format!("{context}: {msg}")),
            Self::Cache(msg) => Self::Cache(format!("{context}: {msg}")),
            Self::Internal(msg) => Self::Internal(format!("{context}: {msg}")),
            Self::ExternalService { service, message } => Self::ExternalService {
                service,
                message: format!("{context}: {message}"),
            },
            other => other,
        }
    }
}

#[cfg(feature = "sqlx")]
impl From<sqlx::Error> for RedeemError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => Self::NotFound {
                resource_type: "database_row",
                id: "unknown".to_string(),
            },
            sqlx::Error::Database(db_err) => {
                if db_err.code().is_some_and(|code| code == "23505") {
                    return Self::Conflict(db_err.message().to_string());
                }
                Self::Persistence(err.to_string())
            }
            _ => Self::Persistence(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for RedeemError {
    fn from(err: serde_json::Error) -> Self {
        Self::Internal(format!("JSON serialization error: {err}"))
    }
}

/// Serializable error response for API responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ErrorResponse {
    /// Machine-readable error code
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional field-level errors for validation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<FieldError>>,
    /// Request trace ID for debugging
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace_id: Option<String>,
}

/// Field-level validation error.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct FieldError {
    /// Field name
    pub field: String,
    /// Error message
    pub message: String,
    /// Error code
    pub code: String,
}

impl ErrorResponse {
    /// Creates a new error response from a `RedeemError`.
    #[must_use]
    pub fn from_error(error: &RedeemError) -> Self {
        Self {
            code: error.error_code().to_string(),
            message: error.to_string(),
            details: None,
            trace_id: None,
        }
    }

    /// Sets the trace ID.
    #[must_use]
    pub fn with_trace_id(mut self, trace_id: impl Into<String>) -> Self {
        self.trace_id = Some(trace_id.into());
        self
    }

    /// Sets field-level validation errors.
    #[must_use]
    pub fn with_details(mut self, details: Vec<FieldError>) -> Self {
        self.details = Some(details);
        self
    }
}

impl From<&RedeemError> for ErrorResponse {
    fn from(error: &RedeemError) -> Self {
        Self::from_error(error)
    }
}
