use std::sync::Arc;

use allure_discovery::config::AppConfig;
use allure_discovery::store::PgStore;
use allure_discovery::{router, AppState};
use allure_shared::clients::db::create_pool;
use allure_shared::clients::rabbitmq::RabbitMQClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    allure_shared::middleware::init_tracing("allure-discovery");

    let config = AppConfig::load()?;
    let port = config.port;

    let pool = create_pool(&config.database_url, config.db_pool_size)?;

    // Events are best-effort; the service runs without a broker.
    let rabbitmq = match config.rabbitmq_url.as_deref() {
        Some(url) => match RabbitMQClient::connect(url).await {
            Ok(client) => Some(client),
            Err(e) => {
                tracing::warn!(error = %e, "RabbitMQ unavailable, domain events disabled");
                None
            }
        },
        None => None,
    };

    let metrics_handle = allure_shared::middleware::init_metrics()?;

    let state = Arc::new(AppState {
        store: Arc::new(PgStore::new(pool)),
        config,
        rabbitmq,
        metrics_handle: Some(metrics_handle),
    });

    let app = router(state);

    let addr = format!("0.0.0.0:{port}");
    tracing::info!(addr = %addr, "allure-discovery starting");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
