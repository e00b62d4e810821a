//! Health check endpoint for readiness probes and smoke tests.

use axum::{Json, response::IntoResponse};
use serde::Serialize;

/// Health status response
#[derive(Debug, Serialize)]
pub struct HealthStatus {
    /// Always "healthy"; the server has no dependencies that can degrade
    pub status: String,
}

/// GET /health - liveness check, served without authentication
#[tracing::instrument(name = "health.check", skip_all)]
pub async fn health_check() -> impl IntoResponse {
    Json(HealthStatus {
        status: "healthy".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_status_shape() {
        let status = HealthStatus {
            status: "healthy".to_string(),
        };
        let value = serde_json::to_value(&status).unwrap();
        assert_eq!(value, serde_json::json!({"status": "healthy"}));
    }
}
