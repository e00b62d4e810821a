//! HTTP Route Definitions
//!
//! Two route groups make up the server surface:
//!
//! - Open endpoints: `/health` plus the SCIM discovery documents, reachable
//!   without credentials
//! - Resource endpoints: `/Users` and `/Groups` CRUD, guarded by the bearer
//!   token middleware

use axum::{Router, routing::get};

use crate::AppState;

pub mod discovery;
pub mod groups;
pub mod health;
pub mod middleware;
pub mod users;

/// Discovery and health endpoints, served without authentication
pub fn open_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route(
            "/ServiceProviderConfig",
            get(discovery::service_provider_config),
        )
        .route("/ResourceTypes", get(discovery::resource_types))
        .route("/ResourceTypes/{id}", get(discovery::resource_type))
        .route("/Schemas", get(discovery::schemas))
        .route("/Schemas/{id}", get(discovery::schema))
}

/// User and Group CRUD endpoints behind the bearer token check
pub fn resource_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/Users",
            get(users::list_users).post(users::create_user),
        )
        .route(
            "/Users/{id}",
            get(users::get_user)
                .put(users::replace_user)
                .delete(users::delete_user),
        )
        .route(
            "/Groups",
            get(groups::list_groups).post(groups::create_group),
        )
        .route(
            "/Groups/{id}",
            get(groups::get_group)
                .put(groups::replace_group)
                .delete(groups::delete_group),
        )
        .route_layer(axum::middleware::from_fn_with_state(
            state,
            middleware::scim_auth_middleware,
        ))
}
