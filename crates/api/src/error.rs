use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use preventia_core::Error;
use serde_json::json;
use std::env;
use tracing::{error, warn};

/// Wraps a core `Error` for the HTTP boundary: sanitizes the response body
/// per environment while keeping full detail in logs.
#[derive(Debug)]
pub struct ApiError {
    error: Error,
    request_id: Option<String>,
    environment: String,
}

impl ApiError {
    pub fn new(error: Error) -> Self {
        let environment = env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string());
        Self {
            error,
            request_id: None,
            environment,
        }
    }

    pub fn new_with_environment(error: Error, environment: String) -> Self {
        Self {
            error,
            request_id: None,
            environment,
        }
    }

    pub fn with_request_id(mut self, request_id: String) -> Self {
        self.request_id = Some(request_id);
        self
    }

    /// Errors worth a security-audit log line even outside the 5xx band.
    pub fn is_security_relevant(&self) -> bool {
        matches!(
            self.error.code,
            preventia_core::error::ErrorCode::AuthorizationFailed
                | preventia_core::error::ErrorCode::PermissionDenied
                | preventia_core::error::ErrorCode::SecurityPolicyViolation
                | preventia_core::error::ErrorCode::RateLimitExceeded
                | preventia_core::error::ErrorCode::TooManyRequests
        )
    }

    fn log_error(&self) {
        let status_code = StatusCode::from_u16(self.error.http_status())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        match status_code.as_u16() {
            500..=599 => {
                error!(
                    error_code = %self.error.code,
                    error_id = %self.error.context.error_id,
                    request_id = ?self.request_id,
                    severity = ?self.error.severity,
                    "internal server error: {}",
                    self.error
                );

                if self.environment == "production" {
                    error!(target: "security_audit",
                        error_details = %serde_json::to_string(&self.error.to_debug_json()).unwrap_or_default(),
                        "production server error - full details"
                    );
                }
            }
            400..=499 => {
                if self.is_security_relevant() {
                    warn!(target: "security_audit",
                        error_code = %self.error.code,
                        error_id = %self.error.context.error_id,
                        request_id = ?self.request_id,
                        client_ip = ?self.error.context.metadata.get("client_ip"),
                        user_agent = ?self.error.context.metadata.get("user_agent"),
                        "security-relevant client error: {}",
                        self.error
                    );
                } else {
                    tracing::debug!(
                        error_code = %self.error.code,
                        request_id = ?self.request_id,
                        "client error: {}",
                        self.error
                    );
                }
            }
            _ => {
                tracing::info!(
                    error_code = %self.error.code,
                    request_id = ?self.request_id,
                    "informational response: {}",
                    self.error
                );
            }
        }
    }
}

impl From<Error> for ApiError {
    fn from(error: Error) -> Self {
        Self::new(error)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status_code = StatusCode::from_u16(self.error.http_status())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        self.log_error();

        let inner = self.error.to_api_response_with_environment(&self.environment);
        let message = inner["error"]["message"].clone();
        let details = inner["error"]["details"].clone();

        let mut error_entry = json!({
            "code": self.error.code,
            "message": message,
            "details": details,
            "error_id": self.error.context.error_id,
        });

        if self.environment == "production" && status_code.is_server_error() {
            error_entry = json!({
                "code": self.error.code,
                "message": "An internal error occurred. Please try again later.",
                "error_id": self.error.context.error_id,
            });
        }

        let body = json!({
            "status": "error",
            "errors": [error_entry],
            "meta": { "request_id": self.request_id },
        });

        (status_code, Json(body)).into_response()
    }
}
