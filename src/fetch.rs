// src/fetch.rs
//! Per-feed retrieval and scoring. Fetch failures are soft: one bad feed
//! logs a warning and contributes nothing, it never aborts the batch.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use metrics::{counter, describe_counter, describe_histogram, histogram};
use once_cell::sync::OnceCell;
use quick_xml::de::from_str;
use serde::Deserialize;
use time::format_description::well_known::{Rfc2822, Rfc3339};
use time::{OffsetDateTime, UtcOffset};

use crate::fuzzy::MatchMethod;
use crate::score::{score_entry, FeedEntry, ScoredResult};

/// One-time metrics registration.
fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("feed_entries_total", "Entries scored across all feeds.");
        describe_counter!(
            "feed_entries_skipped_total",
            "Malformed entries skipped during scoring."
        );
        describe_counter!("feed_fetch_errors_total", "Feed fetch/parse soft failures.");
        describe_histogram!("feed_parse_ms", "Feed parse+score time in milliseconds.");
    });
}

// --- RSS 2.0 wire shape ---

#[derive(Debug, Deserialize)]
struct Rss {
    channel: Channel,
}

#[derive(Debug, Deserialize)]
struct Channel {
    #[serde(rename = "item", default)]
    item: Vec<Item>,
}

#[derive(Debug, Deserialize)]
struct Item {
    title: Option<String>,
    link: Option<String>,
    #[serde(rename = "pubDate")]
    pub_date: Option<String>,
    description: Option<String>,
}

// --- Atom wire shape ---

/// Element whose text content we want, attributes (e.g. `type="html"`) ignored.
#[derive(Debug, Default, Deserialize)]
struct TextNode {
    #[serde(rename = "$text", default)]
    value: String,
}

#[derive(Debug, Deserialize)]
struct AtomFeed {
    #[serde(rename = "entry", default)]
    entry: Vec<AtomEntry>,
}

#[derive(Debug, Deserialize)]
struct AtomEntry {
    title: Option<TextNode>,
    #[serde(rename = "link", default)]
    link: Vec<AtomLink>,
    published: Option<String>,
    updated: Option<String>,
    summary: Option<TextNode>,
    content: Option<TextNode>,
}

#[derive(Debug, Deserialize)]
struct AtomLink {
    #[serde(rename = "@href")]
    href: Option<String>,
    #[serde(rename = "@rel")]
    rel: Option<String>,
}

impl AtomEntry {
    /// Prefer rel="alternate" (or no rel), else the first link.
    fn best_link(&self) -> String {
        self.link
            .iter()
            .find(|l| matches!(l.rel.as_deref(), None | Some("alternate")))
            .or_else(|| self.link.first())
            .and_then(|l| l.href.clone())
            .unwrap_or_default()
    }
}

/// RSS pubDate is RFC 2822; Atom published/updated is RFC 3339. Accept both,
/// treat anything unparsable as "no timestamp".
fn parse_feed_timestamp(ts: &str) -> Option<i64> {
    if let Ok(dt) =
        OffsetDateTime::parse(ts, &Rfc2822).or_else(|_| OffsetDateTime::parse(ts, &Rfc3339))
    {
        return Some(dt.to_offset(UtcOffset::UTC).unix_timestamp());
    }
    // obsolete zone names ("GMT", "EST") that strict RFC 2822 parsers reject
    chrono::DateTime::parse_from_rfc2822(ts)
        .ok()
        .map(|dt| dt.timestamp())
}

/// Parse a feed document into entries, accepting RSS 2.0 and Atom.
pub fn parse_feed(xml: &str) -> Result<Vec<FeedEntry>> {
    if let Ok(rss) = from_str::<Rss>(xml) {
        let entries = rss
            .channel
            .item
            .into_iter()
            .map(|it| FeedEntry {
                title: it.title.unwrap_or_default(),
                link: it.link.unwrap_or_default(),
                description: it.description.unwrap_or_default(),
                published_at: it.pub_date.as_deref().and_then(parse_feed_timestamp),
            })
            .collect();
        return Ok(entries);
    }

    let atom: AtomFeed = from_str(xml).context("document is neither RSS 2.0 nor Atom")?;
    let entries = atom
        .entry
        .into_iter()
        .map(|e| FeedEntry {
            title: e.title.as_ref().map(|t| t.value.clone()).unwrap_or_default(),
            link: e.best_link(),
            description: e
                .summary
                .as_ref()
                .or(e.content.as_ref())
                .map(|t| t.value.clone())
                .unwrap_or_default(),
            published_at: e
                .published
                .as_deref()
                .or(e.updated.as_deref())
                .and_then(parse_feed_timestamp),
        })
        .collect();
    Ok(entries)
}

/// External collaborator that hands out a proxy URL per fetch call.
#[async_trait]
pub trait ProxyProvider: Send + Sync {
    async fn proxy_url(&self) -> Result<String>;
}

/// Rotating proxy over a fixed URL list; each call yields the next endpoint.
pub struct RoundRobinProxy {
    urls: Vec<String>,
    next: AtomicUsize,
}

impl RoundRobinProxy {
    pub fn new(urls: Vec<String>) -> Result<Self> {
        if urls.is_empty() {
            bail!("proxy rotation requires at least one proxy URL");
        }
        Ok(Self {
            urls,
            next: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl ProxyProvider for RoundRobinProxy {
    async fn proxy_url(&self) -> Result<String> {
        let i = self.next.fetch_add(1, Ordering::Relaxed);
        Ok(self.urls[i % self.urls.len()].clone())
    }
}

/// Fetches one feed over HTTP and scores every entry against the query.
pub struct FeedFetcher {
    client: reqwest::Client,
    method: MatchMethod,
    recency_exponent: u32,
    timeout: Duration,
    proxy: Option<Arc<dyn ProxyProvider>>,
}

impl FeedFetcher {
    pub fn new(method: MatchMethod, recency_exponent: u32, timeout_secs: u64) -> Self {
        Self {
            client: reqwest::Client::new(),
            method,
            recency_exponent,
            timeout: Duration::from_secs(timeout_secs),
            proxy: None,
        }
    }

    pub fn with_proxy(mut self, provider: Arc<dyn ProxyProvider>) -> Self {
        self.proxy = Some(provider);
        self
    }

    /// Soft-failure wrapper: any HTTP, network, or parse error is logged and
    /// degraded to an empty result list.
    pub async fn fetch_and_score(&self, url: &str, query: &str) -> Vec<ScoredResult> {
        match self.try_fetch_and_score(url, query).await {
            Ok(results) => results,
            Err(e) => {
                tracing::warn!(error = ?e, url, "feed fetch failed, contributing no entries");
                counter!("feed_fetch_errors_total").increment(1);
                Vec::new()
            }
        }
    }

    async fn try_fetch_and_score(&self, url: &str, query: &str) -> Result<Vec<ScoredResult>> {
        ensure_metrics_described();

        let request = match &self.proxy {
            // A fresh rotating endpoint per fetch call, used for this single
            // request only. reqwest proxies are fixed at client build time,
            // so the proxied path gets a one-off client.
            Some(provider) => {
                let proxy_url = provider.proxy_url().await.context("acquiring proxy url")?;
                let client = reqwest::Client::builder()
                    .proxy(reqwest::Proxy::all(&proxy_url).context("invalid proxy url")?)
                    .build()
                    .context("building proxied http client")?;
                client.get(url)
            }
            None => self.client.get(url),
        };

        let response = request
            .timeout(self.timeout)
            .send()
            .await
            .with_context(|| format!("fetching feed {url}"))?;
        let status = response.status();
        if !status.is_success() {
            bail!("HTTP {status} fetching feed {url}");
        }
        let body = response
            .text()
            .await
            .with_context(|| format!("reading feed body from {url}"))?;

        self.score_feed_str(&body, query)
    }

    /// Parse and score a feed document held in memory. No network; this is
    /// also the fixture path used by tests.
    pub fn score_feed_str(&self, xml: &str, query: &str) -> Result<Vec<ScoredResult>> {
        ensure_metrics_described();
        let t0 = std::time::Instant::now();

        let entries = parse_feed(xml)?;
        let mut out = Vec::with_capacity(entries.len());
        for entry in entries {
            // Current time sampled per entry evaluation, whole seconds.
            let now_unix = chrono::Utc::now().timestamp();
            match score_entry(&entry, query, self.method, self.recency_exponent, now_unix) {
                Ok(r) => out.push(r),
                Err(e) => {
                    tracing::warn!(error = ?e, "skipping malformed feed entry");
                    counter!("feed_entries_skipped_total").increment(1);
                }
            }
        }

        let ms = t0.elapsed().as_secs_f64() * 1_000.0;
        histogram!("feed_parse_ms").record(ms);
        counter!("feed_entries_total").increment(out.len() as u64);
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rfc2822_and_rfc3339_timestamps_parse() {
        assert_eq!(
            parse_feed_timestamp("Thu, 01 Jan 1970 00:00:10 GMT"),
            Some(10)
        );
        assert_eq!(parse_feed_timestamp("1970-01-01T00:00:10Z"), Some(10));
        assert_eq!(parse_feed_timestamp("next tuesday"), None);
    }

    #[test]
    fn atom_best_link_prefers_alternate() {
        let e = AtomEntry {
            title: None,
            link: vec![
                AtomLink {
                    href: Some("https://example.test/self".into()),
                    rel: Some("self".into()),
                },
                AtomLink {
                    href: Some("https://example.test/page".into()),
                    rel: Some("alternate".into()),
                },
            ],
            published: None,
            updated: None,
            summary: None,
            content: None,
        };
        assert_eq!(e.best_link(), "https://example.test/page");
    }

    #[tokio::test]
    async fn round_robin_proxy_rotates() {
        let p = RoundRobinProxy::new(vec!["http://p1".into(), "http://p2".into()]).unwrap();
        let a = p.proxy_url().await.unwrap();
        let b = p.proxy_url().await.unwrap();
        let c = p.proxy_url().await.unwrap();
        assert_eq!(
            (a.as_str(), b.as_str(), c.as_str()),
            ("http://p1", "http://p2", "http://p1")
        );
    }

    #[test]
    fn empty_proxy_list_is_rejected() {
        assert!(RoundRobinProxy::new(Vec::new()).is_err());
    }
}
