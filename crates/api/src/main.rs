use anyhow::Context;

use txguard_api::app::{build_app, services::build_services};
use txguard_api::config::ApiConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    txguard_observability::init();

    let config = ApiConfig::from_env()?;
    let services = build_services(&config).await?;
    let app = build_app(services, &config.cors_origins);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!(addr = %listener.local_addr()?, "listening");

    axum::serve(listener, app).await?;
    Ok(())
}
