mod config;
mod render;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use boardbrief_client::fetcher::{is_bgg_url, validate_url};
use boardbrief_client::{EndpointClient, ReqwestFetcher};
use boardbrief_core::traits::Fetcher;

use crate::config::resolve_endpoint;
use crate::render::ReportView;

#[derive(Parser)]
#[command(
    name = "boardbrief",
    version,
    about = "Summarize a board game page with several models side by side"
)]
struct Cli {
    /// Board game page URL (e.g., https://boardgamegeek.com/boardgame/224517/brass-birmingham)
    url: String,

    /// Summarize endpoint URL (defaults to the config file)
    #[arg(long, env = "BOARDBRIEF_API_ENDPOINT")]
    api_endpoint: Option<String>,

    /// JSON file holding {"api_endpoint": "..."}
    #[arg(long, default_value = "config.json")]
    config: PathBuf,

    /// Print the raw JSON report instead of the formatted comparison
    #[arg(long, default_value_t = false)]
    json: bool,

    /// Page fetch timeout in seconds
    #[arg(long, default_value_t = 30)]
    fetch_timeout: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("boardbrief=info".parse()?))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let url = validate_url(&cli.url).context("Invalid page URL")?;
    if !is_bgg_url(&url) {
        tracing::warn!("URL doesn't appear to be from BoardGameGeek");
    }
    let endpoint = resolve_endpoint(cli.api_endpoint, &cli.config)?;

    // 1. Fetch HTML
    tracing::info!("Fetching HTML from {}", url);
    let fetcher = ReqwestFetcher::with_timeout(Duration::from_secs(cli.fetch_timeout))
        .context("Failed to create HTTP client")?;
    let document = fetcher
        .fetch_document(url.as_str())
        .await
        .with_context(|| format!("Could not fetch page {url}"))?;
    tracing::info!("Fetched {} bytes of HTML", document.html.len());

    // 2. Send to the summarize endpoint
    tracing::info!("Sending HTML to {}", endpoint);
    let client = EndpointClient::new(&endpoint).context("Failed to create HTTP client")?;
    let report = client
        .summarize(&document.html)
        .await
        .with_context(|| format!("Summarize endpoint {endpoint} failed"))?;

    if report.all_failed() {
        tracing::warn!(
            models = report.models_compared,
            "Document processed, but every model failed"
        );
    }

    // 3. Output
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", ReportView(&report));
    }

    Ok(())
}
