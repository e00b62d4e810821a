//! SCIM 2.0 User Resource Endpoints
//!
//! Implements RFC 7644 Section 3 CRUD operations for User resources:
//! - POST /Users: Create user
//! - GET /Users: List/search users
//! - GET /Users/{id}: Get user by ID
//! - PUT /Users/{id}: Replace user (full update)
//! - DELETE /Users/{id}: Delete user
//!
//! Request bodies are taken as raw JSON rather than typed extractors, since
//! real provisioning clients send partial and misspelled payloads that the
//! resource factory is expected to absorb.

use axum::{
    body::Body,
    extract::{Path, Query, State},
    http::{Request, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::Value;

use super::discovery::ScimJson;
use crate::AppState;
use crate::scim::{
    ScimErrorResponse, ScimListParams, apply_user_filter, build_user, merge_user, paginate,
};

// =============================================================================
// Response Helpers
// =============================================================================

/// Response wrapper that serializes as application/scim+json with an
/// explicit status code
pub struct ScimJsonWithStatus<T> {
    body: T,
    status: StatusCode,
}

impl<T: Serialize> ScimJsonWithStatus<T> {
    pub fn ok(body: T) -> Self {
        Self {
            body,
            status: StatusCode::OK,
        }
    }

    pub fn created(body: T) -> Self {
        Self {
            body,
            status: StatusCode::CREATED,
        }
    }
}

impl<T: Serialize> IntoResponse for ScimJsonWithStatus<T> {
    fn into_response(self) -> Response {
        match serde_json::to_vec(&self.body) {
            Ok(body) => Response::builder()
                .status(self.status)
                .header(header::CONTENT_TYPE, "application/scim+json")
                .body(Body::from(body))
                .unwrap(),
            Err(e) => {
                tracing::error!("Failed to serialize SCIM response: {}", e);
                ScimErrorResponse::internal("Failed to serialize response").into_response()
            }
        }
    }
}

/// Read and parse a JSON request body.
///
/// An empty body is treated as an empty object so creation falls back to
/// defaults. An unreadable or unparseable body is an internal error.
pub(super) async fn read_json_body(
    request: Request<Body>,
    limit: usize,
) -> Result<Value, Response> {
    let bytes = match axum::body::to_bytes(request.into_body(), limit).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::error!("Failed to read request body: {}", e);
            return Err(ScimErrorResponse::internal("Internal server error").into_response());
        }
    };

    if bytes.is_empty() {
        return Ok(Value::Object(serde_json::Map::new()));
    }

    match serde_json::from_slice(&bytes) {
        Ok(value) => Ok(value),
        Err(e) => {
            tracing::error!("Invalid JSON in request body: {}", e);
            Err(ScimErrorResponse::internal("Internal server error").into_response())
        }
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// GET /Users - list users with optional filter and pagination
#[tracing::instrument(name = "scim.users.list", skip_all)]
pub async fn list_users(
    State(state): State<AppState>,
    Query(params): Query<ScimListParams>,
) -> impl IntoResponse {
    let users = apply_user_filter(state.store.users.list(), params.filter.as_deref());
    ScimJson(paginate(users, params.start_index, params.count))
}

/// GET /Users/{id} - get a single user
#[tracing::instrument(name = "scim.users.get", skip_all, fields(id = %id))]
pub async fn get_user(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    match state.store.users.get(&id) {
        Some(user) => ScimJson(user).into_response(),
        None => ScimErrorResponse::not_found("User not found").into_response(),
    }
}

/// POST /Users - create a user
#[tracing::instrument(name = "scim.users.create", skip_all)]
pub async fn create_user(State(state): State<AppState>, request: Request<Body>) -> Response {
    let attrs = match read_json_body(request, state.config.body_limit_bytes).await {
        Ok(attrs) => attrs,
        Err(response) => return response,
    };
    tracing::debug!(payload = %attrs, "Received user data");

    let id = state.store.users.fresh_id();
    let user = build_user(&id, &attrs, &state.config.base_url());
    state.store.users.insert(id, user.clone());
    tracing::info!(user_name = %user.user_name, id = %user.id, "Created user");

    ScimJsonWithStatus::created(user).into_response()
}

/// PUT /Users/{id} - replace a user
#[tracing::instrument(name = "scim.users.replace", skip_all, fields(id = %id))]
pub async fn replace_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    request: Request<Body>,
) -> Response {
    let attrs = match read_json_body(request, state.config.body_limit_bytes).await {
        Ok(attrs) => attrs,
        Err(response) => return response,
    };

    match state
        .store
        .users
        .update(&id, |existing| merge_user(existing, &attrs))
    {
        Some(user) => {
            tracing::info!(user_name = %user.user_name, id = %user.id, "Updated user");
            ScimJsonWithStatus::ok(user).into_response()
        }
        None => ScimErrorResponse::not_found("User not found").into_response(),
    }
}

/// DELETE /Users/{id} - delete a user
#[tracing::instrument(name = "scim.users.delete", skip_all, fields(id = %id))]
pub async fn delete_user(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    if state.store.users.remove(&id) {
        tracing::info!(id = %id, "Deleted user");
        StatusCode::NO_CONTENT.into_response()
    } else {
        ScimErrorResponse::not_found("User not found").into_response()
    }
}
