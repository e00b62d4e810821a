//! Request Middleware
//!
//! Bearer-token authentication for the resource endpoints and a per-request
//! timeout applied to the whole router. Discovery and health endpoints are
//! mounted without the auth layer, mirroring how identity providers probe
//! a SCIM server before they are configured with credentials.

use std::time::Duration;

use axum::{
    body::Body,
    extract::State,
    http::{Request, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use subtle::ConstantTimeEq;

use crate::AppState;
use crate::scim::ScimErrorResponse;

/// Authenticate requests against the configured bearer token.
///
/// A missing or empty Authorization header is a 401; a present-but-wrong
/// token is a 403. The comparison is constant-time.
pub async fn scim_auth_middleware(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let token = match extract_bearer_token(&request) {
        Some(token) => token,
        None => {
            return ScimErrorResponse::unauthorized("Authorization header is required")
                .into_response();
        }
    };

    let token_matches: bool = token
        .as_bytes()
        .ct_eq(state.config.token.as_bytes())
        .into();
    if !token_matches {
        tracing::debug!("SCIM authentication failed: token mismatch");
        return ScimErrorResponse::forbidden("Invalid authorization token").into_response();
    }

    next.run(request).await
}

/// Extract the credential from the Authorization header.
///
/// The credential is the second whitespace-separated part, so "Bearer xyz"
/// yields "xyz". The scheme itself is not checked: a wrong scheme with some
/// credential fails the token comparison downstream rather than looking
/// like a missing header.
fn extract_bearer_token(request: &Request<Body>) -> Option<&str> {
    let header_value = request.headers().get(header::AUTHORIZATION)?;
    let header_str = header_value.to_str().ok()?;
    header_str.split_whitespace().nth(1)
}

/// Fail requests that run longer than the configured timeout with a SCIM
/// 408 envelope. A timeout of zero disables the limit.
pub async fn timeout_middleware(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let timeout_secs = state.config.request_timeout_secs;
    if timeout_secs == 0 {
        return next.run(request).await;
    }

    match tokio::time::timeout(Duration::from_secs(timeout_secs), next.run(request)).await {
        Ok(response) => response,
        Err(_) => {
            tracing::warn!(timeout_secs, "Request timeout");
            ScimErrorResponse::request_timeout("Request timeout").into_response()
        }
    }
}
