use blog_aggregator::{Aggregator, FetchConfig, PageQuery, SourcesConfig};
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Pull every configured blog source once and print the merged page as JSON.
#[derive(Debug, Parser)]
#[command(name = "blog-aggregator", version)]
struct Cli {
    /// Page size, clamped to 1..=100. Omit to get the whole capped list.
    #[arg(long)]
    limit: Option<i64>,

    #[arg(long, default_value_t = 1)]
    page: i64,

    /// dev.to topic tags (comma separated)
    #[arg(long, value_delimiter = ',')]
    tags: Vec<String>,

    #[arg(long, env = "HASHNODE_USERNAME")]
    hashnode_username: Option<String>,

    #[arg(long, default_value_t = 30)]
    timeout_seconds: u64,

    /// Pretty-print the output
    #[arg(long)]
    pretty: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut sources = SourcesConfig::default();
    if !cli.tags.is_empty() {
        sources.devto_tags = cli.tags.clone();
    }
    if let Some(username) = cli.hashnode_username.clone() {
        sources.hashnode_username = username;
    }

    let fetch_config = FetchConfig {
        timeout_seconds: cli.timeout_seconds,
        ..FetchConfig::default()
    };

    let aggregator = Aggregator::from_config(&sources, fetch_config).map_err(|e| {
        error!("Failed to build HTTP client: {}", e);
        e
    })?;

    let limit = cli.limit.map(|l| l.to_string());
    let page = cli.page.to_string();
    let query = PageQuery::from_params(limit.as_deref(), Some(&page));

    info!("Aggregating {} sources", aggregator.adapters().len());
    let result = aggregator.aggregate(query).await;
    info!(
        "Got {} of {} articles (source: {:?})",
        result.posts.len(),
        result.total,
        result.source
    );

    let json = if cli.pretty {
        serde_json::to_string_pretty(&result)?
    } else {
        serde_json::to_string(&result)?
    };
    println!("{}", json);

    Ok(())
}
