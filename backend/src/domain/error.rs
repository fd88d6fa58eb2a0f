//! Domain-level error envelope.
//!
//! Every boundary operation returns `Result<T, AppError>` instead of
//! panicking or leaking adapter error types. The `Ok`/`Err` split is the
//! success/error envelope: the two arms cannot both be populated, and
//! "success" is simply [`Result::is_ok`]. Inbound adapters map [`AppError`]
//! onto their transport (HTTP status codes, response payloads) without the
//! domain knowing about either.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

/// Stable machine-readable code describing the failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[non_exhaustive]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// Generic upstream/API failure; the default category.
    ApiError,
    /// The request is malformed or fails validation.
    InvalidRequest,
    /// The requested record does not exist.
    NotFound,
    /// The operation conflicts with current state.
    Conflict,
    /// A backing service is unreachable or refusing work.
    ServiceUnavailable,
}

impl ErrorCode {
    /// Default HTTP-style status for the category.
    #[must_use]
    pub const fn default_status(self) -> u16 {
        match self {
            Self::ApiError => 500,
            Self::InvalidRequest => 400,
            Self::NotFound => 404,
            Self::Conflict => 409,
            Self::ServiceUnavailable => 503,
        }
    }
}

/// Error payload carried through the domain and onto the wire.
///
/// ## Invariants
/// - `status` defaults from the code (`ApiError` → 500) but can be
///   overridden where an adapter knows better.
///
/// # Examples
/// ```
/// use backend::domain::{AppError, ErrorCode};
///
/// let err = AppError::not_found("work order not found");
/// assert_eq!(err.code(), ErrorCode::NotFound);
/// assert_eq!(err.status(), 404);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AppError {
    #[schema(example = "not_found")]
    code: ErrorCode,
    #[schema(example = "work order not found")]
    message: String,
    #[schema(example = 404)]
    status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Value>,
}

impl AppError {
    /// Create an error with the status defaulted from the code.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            status: code.default_status(),
            details: None,
        }
    }

    /// Generic failure with the default [`ErrorCode::ApiError`] category.
    pub fn api(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ApiError, message)
    }

    /// Convenience constructor for [`ErrorCode::InvalidRequest`].
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidRequest, message)
    }

    /// Convenience constructor for [`ErrorCode::NotFound`].
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, message)
    }

    /// Convenience constructor for [`ErrorCode::Conflict`].
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Conflict, message)
    }

    /// Convenience constructor for [`ErrorCode::ServiceUnavailable`].
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ServiceUnavailable, message)
    }

    /// Override the HTTP-style status.
    #[must_use]
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = status;
        self
    }

    /// Attach structured details for clients.
    #[must_use]
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Machine-readable failure category.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        self.code
    }

    /// Human-readable message.
    #[must_use]
    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    /// HTTP-style status associated with the failure.
    #[must_use]
    pub const fn status(&self) -> u16 {
        self.status
    }

    /// Supplementary structured details, if any.
    #[must_use]
    pub fn details(&self) -> Option<&Value> {
        self.details.as_ref()
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for AppError {}
