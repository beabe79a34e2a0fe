use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use toolfinder_api::{AuthenticationClient, ReqwestClient};
use toolfinder_core::{search_to_csv, Config};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "toolfinder")]
#[command(version, about = "Export GitHub repository search results as CSV", long_about = None)]
struct Cli {
    /// GitHub search query, e.g. "language:go sort:stars-desc"
    query: String,

    /// Number of repositories to fetch
    total: usize,

    /// GitHub personal access token
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Write CSV to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Config file (defaults to the user config directory)
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // stdout carries the CSV, so logs go to stderr
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "toolfinder=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => Config::load().context("Failed to load config")?,
    };

    let token = config.token(cli.token);
    if token.is_none() {
        tracing::warn!("No GitHub token configured, the GraphQL API will reject the request");
    }

    let client = AuthenticationClient::with_endpoint(
        ReqwestClient::new().context("Failed to build HTTP client")?,
        token,
        &config.github.api_url,
    )?;

    let output: Box<dyn Write + Send> = match &cli.output {
        Some(path) => Box::new(BufWriter::new(File::create(path).with_context(|| {
            format!("Failed to create {}", path.display())
        })?)),
        None => Box::new(BufWriter::new(std::io::stdout())),
    };

    tracing::info!("Searching for: {}", cli.query);
    search_to_csv(
        client,
        &cli.query,
        cli.total,
        output,
        config.search_options(),
    )
    .await
    .context("Search failed")?;

    Ok(())
}
