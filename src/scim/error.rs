//! SCIM 2.0 Error Types
//!
//! This module defines SCIM-specific error responses per RFC 7644 Section 3.12.

use axum::{
    Json,
    response::{IntoResponse, Response},
};
use http::StatusCode;
use serde::{Deserialize, Serialize};

use super::types::SCHEMA_ERROR;

/// SCIM error response per RFC 7644.
///
/// All error responses carry this envelope with the matching HTTP status code.
/// The status field is numeric, matching what SCIM provisioning clients such
/// as Keycloak expect to read back.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScimErrorResponse {
    /// SCIM schema URIs (always contains the Error schema)
    pub schemas: Vec<String>,

    /// Human-readable error detail
    pub detail: String,

    /// HTTP status code
    pub status: u16,
}

impl ScimErrorResponse {
    /// Create a new SCIM error
    fn new(status: StatusCode, detail: impl Into<String>) -> Self {
        Self {
            schemas: vec![SCHEMA_ERROR.to_string()],
            detail: detail.into(),
            status: status.as_u16(),
        }
    }

    /// Missing credentials error (401)
    pub fn unauthorized(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, detail)
    }

    /// Invalid credentials error (403)
    pub fn forbidden(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, detail)
    }

    /// Resource not found error (404)
    pub fn not_found(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, detail)
    }

    /// Request timeout error (408)
    pub fn request_timeout(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::REQUEST_TIMEOUT, detail)
    }

    /// Internal server error (500)
    pub fn internal(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, detail)
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

impl IntoResponse for ScimErrorResponse {
    fn into_response(self) -> Response {
        let status = self.status_code();
        (status, Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_envelope_shape() {
        let error = ScimErrorResponse::not_found("User not found");
        let value = serde_json::to_value(&error).unwrap();

        assert_eq!(value["schemas"][0], SCHEMA_ERROR);
        assert_eq!(value["detail"], "User not found");
        assert_eq!(value["status"], 404);
    }

    #[test]
    fn test_status_is_numeric_in_json() {
        let error = ScimErrorResponse::unauthorized("Authorization header is required");
        let body = serde_json::to_string(&error).unwrap();
        assert!(body.contains("\"status\":401"));
        assert!(!body.contains("\"status\":\"401\""));
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ScimErrorResponse::unauthorized("x").status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ScimErrorResponse::forbidden("x").status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            ScimErrorResponse::not_found("x").status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ScimErrorResponse::request_timeout("x").status_code(),
            StatusCode::REQUEST_TIMEOUT
        );
        assert_eq!(
            ScimErrorResponse::internal("x").status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_into_response_sets_status() {
        let response = ScimErrorResponse::forbidden("Invalid authorization token").into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }
}
