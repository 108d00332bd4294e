// src/fuzzy.rs
//! Fuzzy string similarity in the fuzzywuzzy family: a plain edit-distance
//! `ratio` and an order/duplication-insensitive `token_set_ratio`.
//!
//! Similarity backend: `strsim::normalized_levenshtein` (f64 -> rounded 0..=100).

use std::collections::BTreeSet;

use strsim::normalized_levenshtein;

/// Matching strategy, selectable by name with a defined fallback.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MatchMethod {
    #[default]
    TokenSetRatio,
    Ratio,
}

impl MatchMethod {
    /// Map a strategy name to a variant. Unknown names fall back to `Ratio`.
    pub fn from_name(name: &str) -> Self {
        match name {
            "token_set_ratio" => Self::TokenSetRatio,
            _ => Self::Ratio,
        }
    }

    /// Similarity between `query` and `candidate`, bounded in [0, 100].
    pub fn score(self, query: &str, candidate: &str) -> u32 {
        match self {
            Self::TokenSetRatio => token_set_ratio(query, candidate),
            Self::Ratio => ratio(query, candidate),
        }
    }
}

/// Lowercase, turn non-alphanumerics into spaces, collapse runs, trim.
fn full_process(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut last_space = true;
    for c in s.chars() {
        if c.is_alphanumeric() {
            out.extend(c.to_lowercase());
            last_space = false;
        } else if !last_space {
            out.push(' ');
            last_space = true;
        }
    }
    while out.ends_with(' ') {
        out.pop();
    }
    out
}

fn scaled_levenshtein(a: &str, b: &str) -> u32 {
    (normalized_levenshtein(a, b) * 100.0).round() as u32
}

/// Direct edit-distance similarity over the processed strings.
pub fn ratio(query: &str, candidate: &str) -> u32 {
    scaled_levenshtein(&full_process(query), &full_process(candidate))
}

/// Order-independent, duplicate-insensitive comparison of unique token sets.
///
/// Classic construction: with `i` the sorted intersection and `d1`/`d2` the
/// sorted set differences, take the max ratio among (i, i+d1), (i, i+d2),
/// (i+d1, i+d2). Identical token sets always score 100.
pub fn token_set_ratio(query: &str, candidate: &str) -> u32 {
    token_set_ratio_impl(&full_process(query), &full_process(candidate))
}

fn token_set_ratio_impl(q: &str, c: &str) -> u32 {
    if q.is_empty() || c.is_empty() {
        return scaled_levenshtein(q, c);
    }
    let set1: BTreeSet<&str> = q.split(' ').filter(|t| !t.is_empty()).collect();
    let set2: BTreeSet<&str> = c.split(' ').filter(|t| !t.is_empty()).collect();

    let inter: Vec<&str> = set1.intersection(&set2).copied().collect();
    let diff1: Vec<&str> = set1.difference(&set2).copied().collect();
    let diff2: Vec<&str> = set2.difference(&set1).copied().collect();

    let sorted_inter = inter.join(" ");
    let combined_1 = join_nonempty(&sorted_inter, &diff1.join(" "));
    let combined_2 = join_nonempty(&sorted_inter, &diff2.join(" "));

    let r1 = scaled_levenshtein(&sorted_inter, &combined_1);
    let r2 = scaled_levenshtein(&sorted_inter, &combined_2);
    let r3 = scaled_levenshtein(&combined_1, &combined_2);
    r1.max(r2).max(r3)
}

fn join_nonempty(a: &str, b: &str) -> String {
    match (a.is_empty(), b.is_empty()) {
        (true, _) => b.to_string(),
        (_, true) => a.to_string(),
        _ => format!("{a} {b}"),
    }
}
