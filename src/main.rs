//! feedrank — Binary entrypoint.
//! Thin CLI adapter around the fetch/parse/score/rank pipeline; all the
//! engineering lives in the library crate.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use feedrank::{
    FeedFetcher, JsonStdoutSink, MatchMethod, PipelineConfig, RoundRobinProxy,
};

#[derive(Debug, Parser)]
#[command(name = "feedrank", about = "Search RSS/Atom feeds for a query, ranked by fuzzy relevance")]
struct Cli {
    /// Query string to be matched against feed entries
    #[arg(short, long)]
    query: Option<String>,

    /// Feed URL to search; repeat for multiple feeds
    #[arg(short, long = "feed")]
    feeds: Vec<String>,

    /// Number of top results to emit
    #[arg(short = 'n', long)]
    top_n: Option<i64>,

    /// 0 disables the recency multiplier; higher values penalize older results
    #[arg(short, long)]
    recency_exponent: Option<u32>,

    /// Fuzzy matching strategy: token_set_ratio or ratio
    #[arg(long)]
    method: Option<String>,

    /// Per-feed fetch timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Fetch through rotating proxies from FEEDRANK_PROXY_URLS (comma-separated)
    #[arg(long)]
    proxy: bool,

    /// Optional TOML/JSON config file; CLI flags override its values
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("feedrank=info,warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

fn build_config(cli: &Cli) -> Result<PipelineConfig> {
    let mut cfg = match &cli.config {
        Some(path) => PipelineConfig::from_path(path)?,
        None => PipelineConfig::new(
            cli.query.clone().unwrap_or_default(),
            cli.feeds.clone(),
        ),
    };
    if let Some(q) = &cli.query {
        cfg.query = q.clone();
    }
    if !cli.feeds.is_empty() {
        cfg.feeds = cli.feeds.clone();
    }
    if let Some(n) = cli.top_n {
        cfg.top_n = n;
    }
    if let Some(r) = cli.recency_exponent {
        cfg.recency_exponent = r;
    }
    if let Some(m) = &cli.method {
        cfg.method = MatchMethod::from_name(m);
    }
    if let Some(t) = cli.timeout {
        cfg.timeout_secs = t;
    }
    cfg.proxy |= cli.proxy;
    Ok(cfg)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env in local/dev; no-op when absent.
    let _ = dotenvy::dotenv();
    init_tracing();

    let cli = Cli::parse();
    let cfg = build_config(&cli)?;

    let mut fetcher = FeedFetcher::new(cfg.method, cfg.recency_exponent, cfg.timeout_secs);
    if cfg.proxy {
        let urls: Vec<String> = std::env::var("FEEDRANK_PROXY_URLS")
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();
        fetcher = fetcher.with_proxy(Arc::new(RoundRobinProxy::new(urls)?));
    }

    feedrank::run_pipeline(&cfg, Arc::new(fetcher), &JsonStdoutSink).await?;
    Ok(())
}
