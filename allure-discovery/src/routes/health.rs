use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use allure_shared::{HealthCheck, HealthResponse, HealthStatus};
use std::sync::Arc;

use crate::store::blocking;
use crate::AppState;

/// Liveness plus a database round-trip.
pub async fn health_check(State(state): State<Arc<AppState>>) -> Response {
    let postgres = match blocking(&state.store, |s| s.ping()).await {
        Ok(()) => HealthCheck {
            name: "postgres".into(),
            status: HealthStatus::Healthy,
            message: None,
        },
        Err(e) => {
            tracing::error!(error = %e, "health check: postgres unreachable");
            HealthCheck {
                name: "postgres".into(),
                status: HealthStatus::Unhealthy,
                message: Some("unreachable".into()),
            }
        }
    };

    let response = HealthResponse::healthy("allure-discovery", env!("CARGO_PKG_VERSION"))
        .with_checks(vec![postgres]);

    let status = match response.status {
        HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
        _ => StatusCode::OK,
    };

    (status, Json(response)).into_response()
}

/// Prometheus exposition. Empty when no recorder is installed.
pub async fn metrics(State(state): State<Arc<AppState>>) -> String {
    state
        .metrics_handle
        .as_ref()
        .map(|handle| handle.render())
        .unwrap_or_default()
}
