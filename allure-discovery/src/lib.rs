//! Allure discovery service: escort search and ranking, preference-based
//! suggestions and swipe recording.

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use allure_shared::clients::rabbitmq::RabbitMQClient;

pub mod config;
pub mod events;
pub mod matching;
pub mod media;
pub mod models;
pub mod routes;
pub mod schema;
pub mod search;
pub mod store;

#[cfg(test)]
pub(crate) mod test_support;

use config::AppConfig;
use store::SharedStore;

pub struct AppState {
    pub store: SharedStore,
    pub config: AppConfig,
    /// `None` when no broker is configured or it was unreachable at startup.
    pub rabbitmq: Option<RabbitMQClient>,
    pub metrics_handle: Option<PrometheusHandle>,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/metrics", get(routes::health::metrics))
        .route("/escorts/search", get(routes::search::search))
        .route(
            "/matching/preferences",
            get(routes::matching::get_preferences).post(routes::matching::save_preferences),
        )
        .route("/matching/suggestions", get(routes::matching::suggestions))
        .route("/matching/swipe", post(routes::matching::swipe))
        .layer(axum::middleware::from_fn(
            allure_shared::middleware::metrics_middleware,
        ))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
