use anyhow::Context;

use campus_api::config::ApiConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ApiConfig::from_env().context("failed to load configuration")?;
    campus_observability::init_with(config.log_format);

    let listener = tokio::net::TcpListener::bind(config.bind_addr())
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr()))?;
    let local_addr = listener.local_addr()?;

    let ip_address = campus_api::config::advertised_ip(local_addr.ip()).await;
    let app = campus_api::app::build_app(ip_address);

    tracing::info!("listening on {local_addr}");

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
