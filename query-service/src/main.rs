use query_service::config::{QueryServiceConfig, SERVICE_NAME};
use query_service::services::init_metrics;
use query_service::startup::Application;
use service_core::observability::init_tracing;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = QueryServiceConfig::load().map_err(|e| {
        eprintln!("Failed to load configuration: {}", e);
        anyhow::anyhow!("Configuration error: {}", e)
    })?;

    init_tracing(
        SERVICE_NAME,
        &config.observability.log_level,
        config.observability.otlp_endpoint.as_deref(),
    );

    init_metrics()?;

    let app = Application::build(config).await?;
    tracing::info!(port = app.port(), "Starting {}", SERVICE_NAME);

    app.run_until_stopped().await?;

    Ok(())
}
