//! HTTP error payloads and mapping from domain errors.
//!
//! Keep the domain free of transport concerns by translating [`AppError`]
//! into Actix responses here.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use tracing::error;

use crate::domain::error::AppError;

/// Transport wrapper turning an [`AppError`] into an HTTP response.
///
/// The response body is the serialized [`AppError`] itself, so clients see
/// the same `code`/`message`/`status`/`details` shape the domain carries.
/// Server-side failures (status 500 and above) are logged in full and
/// redacted on the wire.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiError(AppError);

impl ApiError {
    /// The wrapped domain error.
    #[must_use]
    pub const fn inner(&self) -> &AppError {
        &self.0
    }
}

impl From<AppError> for ApiError {
    fn from(error: AppError) -> Self {
        Self(error)
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.0.status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            error!(code = ?self.0.code(), message = %self.0.message(), "server-side failure");
            let redacted =
                AppError::new(self.0.code(), "Internal server error").with_status(status.as_u16());
            return HttpResponse::build(status).json(redacted);
        }
        HttpResponse::build(status).json(&self.0)
    }
}

/// Convenience alias for HTTP handlers.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    #![expect(
        clippy::expect_used,
        reason = "test code uses expect for clear failure messages"
    )]

    use actix_web::ResponseError;
    use actix_web::body::to_bytes;
    use actix_rt::System;
    use rstest::rstest;
    use serde_json::Value;

    use crate::domain::error::AppError;

    use super::ApiError;

    #[rstest]
    fn status_comes_from_the_domain_error() {
        let error = ApiError::from(AppError::not_found("no such record"));
        assert_eq!(error.status_code().as_u16(), 404);
    }

    #[rstest]
    fn client_errors_keep_their_message() {
        System::new().block_on(async {
            let error = ApiError::from(AppError::invalid_request("tenant id must not be empty"));
            let body = to_bytes(error.error_response().into_body())
                .await
                .expect("body read");
            let payload: Value = serde_json::from_slice(&body).expect("JSON body");
            assert_eq!(payload["code"], "invalid_request");
            assert_eq!(payload["message"], "tenant id must not be empty");
        });
    }

    #[rstest]
    fn server_errors_are_redacted_on_the_wire() {
        System::new().block_on(async {
            let error = ApiError::from(AppError::api("record store query failed: secret dsn"));
            let response = error.error_response();
            assert_eq!(response.status().as_u16(), 500);

            let body = to_bytes(response.into_body()).await.expect("body read");
            let payload: Value = serde_json::from_slice(&body).expect("JSON body");
            assert_eq!(payload["message"], "Internal server error");
            assert_eq!(payload.get("details"), None);
        });
    }
}
