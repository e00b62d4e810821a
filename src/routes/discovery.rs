//! SCIM 2.0 Discovery Endpoints
//!
//! Implements RFC 7644 Section 4 discovery endpoints:
//! - GET /ServiceProviderConfig: Server capabilities
//! - GET /ResourceTypes: Available resource types
//! - GET /ResourceTypes/{id}: Single resource type
//! - GET /Schemas: Attribute schemas
//! - GET /Schemas/{id}: Single schema by URI
//!
//! All discovery responses are static and served without authentication,
//! since identity providers fetch them while validating an integration
//! before credentials are in place.

use axum::{
    body::Body,
    extract::Path,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::scim::{
    ResourceType, ScimErrorResponse, ScimListResponse, ScimSchema, ServiceProviderConfig,
    types::{SCHEMA_ENTERPRISE_USER, SCHEMA_GROUP, SCHEMA_USER},
};

/// Response wrapper that serializes as application/scim+json with status 200
pub struct ScimJson<T>(pub T);

impl<T: Serialize> IntoResponse for ScimJson<T> {
    fn into_response(self) -> Response {
        match serde_json::to_vec(&self.0) {
            Ok(body) => Response::builder()
                .status(StatusCode::OK)
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

/// GET /ServiceProviderConfig
#[tracing::instrument(name = "scim.discovery.service_provider_config", skip_all)]
pub async fn service_provider_config() -> impl IntoResponse {
    ScimJson(ServiceProviderConfig {
        documentation_uri: Some("http://example.com/help/scim.html".to_string()),
        ..Default::default()
    })
}

/// GET /ResourceTypes
#[tracing::instrument(name = "scim.discovery.resource_types", skip_all)]
pub async fn resource_types() -> impl IntoResponse {
    ScimJson(ScimListResponse::new(
        vec![ResourceType::user(), ResourceType::group()],
        2,
        1,
    ))
}

/// GET /ResourceTypes/{id}
#[tracing::instrument(name = "scim.discovery.resource_type", skip_all, fields(id = %id))]
pub async fn resource_type(Path(id): Path<String>) -> Response {
    match id.as_str() {
        "User" => ScimJson(ResourceType::user()).into_response(),
        "Group" => ScimJson(ResourceType::group()).into_response(),
        _ => ScimErrorResponse::not_found(format!("ResourceType '{}' not found", id))
            .into_response(),
    }
}

/// GET /Schemas
#[tracing::instrument(name = "scim.discovery.schemas", skip_all)]
pub async fn schemas() -> impl IntoResponse {
    ScimJson(ScimListResponse::new(
        vec![
            ScimSchema::user(),
            ScimSchema::group(),
            ScimSchema::enterprise_user(),
        ],
        3,
        1,
    ))
}

/// GET /Schemas/{id}
#[tracing::instrument(name = "scim.discovery.schema", skip_all, fields(id = %id))]
pub async fn schema(Path(id): Path<String>) -> Response {
    match id.as_str() {
        SCHEMA_USER => ScimJson(ScimSchema::user()).into_response(),
        SCHEMA_GROUP => ScimJson(ScimSchema::group()).into_response(),
        SCHEMA_ENTERPRISE_USER => ScimJson(ScimSchema::enterprise_user()).into_response(),
        _ => ScimErrorResponse::not_found(format!("Schema '{}' not found", id)).into_response(),
    }
}
