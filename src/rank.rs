// src/rank.rs
//! Top-N selection over scored results.

use crate::score::ScoredResult;

/// Sort descending by `score` and keep the first `top_n` results.
///
/// Ties break by `(title, link)` ascending, so the ordering is a function of
/// the result set alone: fetch-completion order and input order never show
/// through. `top_n` clamps at both ends (≤ 0 means empty, oversized means
/// everything).
pub fn rank(mut results: Vec<ScoredResult>, top_n: i64) -> Vec<ScoredResult> {
    results.sort_by(|a, b| {
        b.score
            .total_cmp(&a.score)
            .then_with(|| a.title.cmp(&b.title))
            .then_with(|| a.link.cmp(&b.link))
    });
    results.truncate(top_n.max(0) as usize);
    results
}
