//! SCIM 2.0 Group Resource Endpoints
//!
//! Implements RFC 7644 Section 3 CRUD operations for Group resources:
//! - POST /Groups: Create group
//! - GET /Groups: List/search groups
//! - GET /Groups/{id}: Get group by ID
//! - PUT /Groups/{id}: Replace group (full update)
//! - DELETE /Groups/{id}: Delete group

use axum::{
    body::Body,
    extract::{Path, Query, State},
    http::{Request, StatusCode},
    response::{IntoResponse, Response},
};

use super::discovery::ScimJson;
use super::users::{ScimJsonWithStatus, read_json_body};
use crate::AppState;
use crate::scim::{
    ScimErrorResponse, ScimListParams, apply_group_filter, build_group, merge_group, paginate,
};

/// GET /Groups - list groups with optional filter and pagination
#[tracing::instrument(name = "scim.groups.list", skip_all)]
pub async fn list_groups(
    State(state): State<AppState>,
    Query(params): Query<ScimListParams>,
) -> impl IntoResponse {
    let groups = apply_group_filter(state.store.groups.list(), params.filter.as_deref());
    ScimJson(paginate(groups, params.start_index, params.count))
}

/// GET /Groups/{id} - get a single group
#[tracing::instrument(name = "scim.groups.get", skip_all, fields(id = %id))]
pub async fn get_group(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    match state.store.groups.get(&id) {
        Some(group) => ScimJson(group).into_response(),
        None => ScimErrorResponse::not_found("Group not found").into_response(),
    }
}

/// POST /Groups - create a group
#[tracing::instrument(name = "scim.groups.create", skip_all)]
pub async fn create_group(State(state): State<AppState>, request: Request<Body>) -> Response {
    let attrs = match read_json_body(request, state.config.body_limit_bytes).await {
        Ok(attrs) => attrs,
        Err(response) => return response,
    };
    tracing::debug!(payload = %attrs, "Received group data");

    let id = state.store.groups.fresh_id();
    let group = build_group(&id, &attrs, &state.config.base_url());
    state.store.groups.insert(id, group.clone());
    tracing::info!(display_name = %group.display_name, id = %group.id, "Created group");

    ScimJsonWithStatus::created(group).into_response()
}

/// PUT /Groups/{id} - replace a group
#[tracing::instrument(name = "scim.groups.replace", skip_all, fields(id = %id))]
pub async fn replace_group(
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
        .groups
        .update(&id, |existing| merge_group(existing, &attrs))
    {
        Some(group) => {
            tracing::info!(display_name = %group.display_name, id = %group.id, "Updated group");
            ScimJsonWithStatus::ok(group).into_response()
        }
        None => ScimErrorResponse::not_found("Group not found").into_response(),
    }
}

/// DELETE /Groups/{id} - delete a group
#[tracing::instrument(name = "scim.groups.delete", skip_all, fields(id = %id))]
pub async fn delete_group(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    if state.store.groups.remove(&id) {
        tracing::info!(id = %id, "Deleted group");
        StatusCode::NO_CONTENT.into_response()
    } else {
        ScimErrorResponse::not_found("Group not found").into_response()
    }
}
