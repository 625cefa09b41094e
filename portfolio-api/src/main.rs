use portfolio_api::{config::Config, start_server};
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::load().map_err(|e| {
        error!("{}", e);
        e
    })?;
    info!("Starting portfolio API on {}", config.server_addr);

    start_server(config).await
}
