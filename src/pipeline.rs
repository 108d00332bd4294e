// src/pipeline.rs
//! Fan-out/fan-in orchestration: one fetch task per feed, a join-all
//! barrier, then flatten, rank, and hand off to the sink.

use std::sync::Arc;

use anyhow::{bail, Result};
use tracing::info;

use crate::config::PipelineConfig;
use crate::fetch::FeedFetcher;
use crate::rank::rank;
use crate::score::ScoredResult;
use crate::sink::ResultSink;

/// Run the whole pipeline for one query.
///
/// Every feed is fetched concurrently; a failing feed degrades to zero
/// entries (soft failure inside the fetcher). The run itself fails only on
/// invalid input or when no feed produced a single scorable entry.
pub async fn run_pipeline(
    cfg: &PipelineConfig,
    fetcher: Arc<FeedFetcher>,
    sink: &dyn ResultSink,
) -> Result<Vec<ScoredResult>> {
    cfg.validate()?;

    info!(feeds = cfg.feeds.len(), query = %cfg.query, "parsing feeds");
    let mut handles = Vec::with_capacity(cfg.feeds.len());
    for url in &cfg.feeds {
        let fetcher = Arc::clone(&fetcher);
        let url = url.clone();
        let query = cfg.query.clone();
        handles.push(tokio::spawn(async move {
            fetcher.fetch_and_score(&url, &query).await
        }));
    }

    // Join-all barrier: no short-circuit, no cross-feed cancellation. A
    // panicked task is treated like any other soft feed failure.
    let mut flattened: Vec<ScoredResult> = Vec::new();
    for handle in handles {
        match handle.await {
            Ok(mut results) => flattened.append(&mut results),
            Err(e) => tracing::warn!(error = ?e, "fetch task aborted, contributing no entries"),
        }
    }

    if flattened.is_empty() {
        bail!(
            "no results found: none of the {} feed(s) yielded a scorable entry",
            cfg.feeds.len()
        );
    }

    info!(entries = flattened.len(), "processing results");
    let ranked = rank(flattened, cfg.top_n);
    sink.push(&ranked).await?;
    Ok(ranked)
}
