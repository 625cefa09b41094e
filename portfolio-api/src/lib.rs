pub mod api;
pub mod assistant;
pub mod config;
pub mod error;

use std::sync::Arc;

use anyhow::Context;
use blog_aggregator::Aggregator;
use interfaces::{Mailer, SiteStore};
use site_store::{LogMailer, SiteDatabase};
use tokio::net::TcpListener;
use tokio::signal;
use tracing::info;

use assistant::Assistant;
use config::Config;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub store: Arc<dyn SiteStore>,
    pub mailer: Arc<dyn Mailer>,
    pub aggregator: Arc<Aggregator>,
    pub assistant: Arc<Assistant>,
}

impl AppState {
    /// Production wiring: PostgreSQL store, logging mailer, live blog sources.
    pub async fn connect(config: Config) -> anyhow::Result<Self> {
        let db = SiteDatabase::new(&config.database_url)
            .await
            .context("Failed to connect to the site database")?;
        db.setup_schema().await.context("Failed to set up the site schema")?;

        let mailer = LogMailer::new(&config.site_name, &config.assistant.developer_email)
            .context("DEVELOPER_EMAIL is not a valid sender address")?;

        let aggregator = Aggregator::from_config(&config.sources, config.fetch.clone())
            .context("Failed to build the blog aggregator")?;
        let assistant = Assistant::new(config.assistant.clone()).context("Failed to build the assistant client")?;

        if config.assistant.api_key.is_none() {
            info!("GROQ_API_KEY not set, the assistant will use scripted replies");
        }

        Ok(Self {
            config: Arc::new(config),
            store: Arc::new(db),
            mailer: Arc::new(mailer),
            aggregator: Arc::new(aggregator),
            assistant: Arc::new(assistant),
        })
    }
}

pub async fn start_server(config: Config) -> anyhow::Result<()> {
    let server_addr = config.server_addr;

    info!("Initializing state...");
    let state = AppState::connect(config).await?;

    let app = api::routes::create_router(state);

    info!("Binding to {}", server_addr);
    let listener = TcpListener::bind(server_addr).await?;
    info!("Server running on {}", server_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                tracing::error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
