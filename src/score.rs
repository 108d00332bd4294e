// src/score.rs
//! Per-entry relevance scoring: fuzzy title/description match plus an
//! optional recency multiplier.

use anyhow::{bail, Result};
use serde::Serialize;

use crate::fuzzy::MatchMethod;
use crate::normalize::normalize_text;

/// One entry parsed out of a feed document. Transient: scored once, dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedEntry {
    pub title: String,
    pub link: String,
    pub description: String,
    /// Unix seconds; None when the feed carries no parsable publish time.
    pub published_at: Option<i64>,
}

/// A scored entry, immutable once built. This is the record shape handed to
/// the result sink.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ScoredResult {
    pub title: String,
    pub link: String,
    pub text: String,
    pub title_score: u32,
    pub description_score: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recency_score: Option<f64>,
    pub score: f64,
}

/// Score one entry against the query.
///
/// `now_unix` is the current UTC time in whole seconds, sampled by the caller
/// once per entry. recency_score = published_at / now; an entry with no
/// timestamp gets no recency adjustment (multiplier 1), and exponent 0
/// disables the adjustment entirely.
///
/// Fails fast on a malformed entry (empty title or link) instead of emitting
/// a silent zero score.
pub fn score_entry(
    entry: &FeedEntry,
    query: &str,
    method: MatchMethod,
    recency_exponent: u32,
    now_unix: i64,
) -> Result<ScoredResult> {
    if entry.title.is_empty() {
        bail!("malformed entry: missing title (link: {:?})", entry.link);
    }
    if entry.link.is_empty() {
        bail!("malformed entry: missing link (title: {:?})", entry.title);
    }

    let text = normalize_text(&entry.description);
    let title_score = method.score(query, &entry.title);
    let description_score = method.score(query, &text);

    let recency_score = entry
        .published_at
        .filter(|_| now_unix > 0)
        .map(|published| published as f64 / now_unix as f64);

    let mut score = f64::from(title_score) * f64::from(description_score);
    if recency_exponent > 0 {
        if let Some(r) = recency_score {
            score *= r.powi(recency_exponent as i32);
        }
    }

    Ok(ScoredResult {
        title: entry.title.clone(),
        link: entry.link.clone(),
        text,
        title_score,
        description_score,
        recency_score,
        score,
    })
}
