// src/config.rs
//! Run configuration: loadable from a TOML or JSON file, overridable by the
//! CLI, validated before any network activity.

use std::fs;
use std::path::Path;

use anyhow::{anyhow, bail, Context, Result};
use serde::{Deserialize, Deserializer};

use crate::fuzzy::MatchMethod;

fn default_top_n() -> i64 {
    10
}

fn default_timeout_secs() -> u64 {
    60
}

/// Accept the strategy by name; unknown names take the documented fallback.
fn de_match_method<'de, D>(d: D) -> std::result::Result<MatchMethod, D::Error>
where
    D: Deserializer<'de>,
{
    let name = String::deserialize(d)?;
    Ok(MatchMethod::from_name(&name))
}

#[derive(Debug, Clone, Deserialize)]
pub struct PipelineConfig {
    pub query: String,
    pub feeds: Vec<String>,
    #[serde(default = "default_top_n")]
    pub top_n: i64,
    /// 0 disables the recency multiplier; higher values penalize older
    /// entries harder.
    #[serde(default)]
    pub recency_exponent: u32,
    #[serde(default, deserialize_with = "de_match_method")]
    pub method: MatchMethod,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub proxy: bool,
}

impl PipelineConfig {
    pub fn new(query: impl Into<String>, feeds: Vec<String>) -> Self {
        Self {
            query: query.into(),
            feeds,
            top_n: default_top_n(),
            recency_exponent: 0,
            method: MatchMethod::default(),
            timeout_secs: default_timeout_secs(),
            proxy: false,
        }
    }

    /// Load from an explicit path. Supports TOML or JSON formats.
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading config from {}", path.display()))?;
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        Self::parse(&content, &ext)
    }

    fn parse(s: &str, hint_ext: &str) -> Result<Self> {
        if hint_ext == "json" {
            if let Ok(cfg) = serde_json::from_str(s) {
                return Ok(cfg);
            }
        }
        if let Ok(cfg) = toml::from_str(s) {
            return Ok(cfg);
        }
        if let Ok(cfg) = serde_json::from_str(s) {
            return Ok(cfg);
        }
        Err(anyhow!("config is neither valid TOML nor valid JSON"))
    }

    /// Fatal-input rules, checked before any fetch is spawned.
    pub fn validate(&self) -> Result<()> {
        if self.query.trim().is_empty() {
            bail!("query must be a non-empty string");
        }
        if self.feeds.is_empty() {
            bail!("feeds must contain at least one URL");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toml_with_defaults_parses() {
        let cfg = PipelineConfig::parse(
            r#"
query = "climate policy"
feeds = ["https://example.test/rss"]
"#,
            "toml",
        )
        .unwrap();
        assert_eq!(cfg.top_n, 10);
        assert_eq!(cfg.recency_exponent, 0);
        assert_eq!(cfg.method, MatchMethod::TokenSetRatio);
        assert_eq!(cfg.timeout_secs, 60);
        assert!(!cfg.proxy);
    }

    #[test]
    fn json_parses_and_unknown_method_falls_back() {
        let cfg = PipelineConfig::parse(
            r#"{"query": "q", "feeds": ["u"], "method": "jaro_winkler", "top_n": 3}"#,
            "json",
        )
        .unwrap();
        assert_eq!(cfg.method, MatchMethod::Ratio);
        assert_eq!(cfg.top_n, 3);
    }

    #[test]
    fn validation_rejects_fatal_inputs() {
        let cfg = PipelineConfig::new("  ", vec!["u".into()]);
        assert!(cfg.validate().unwrap_err().to_string().contains("query"));

        let cfg = PipelineConfig::new("q", Vec::new());
        assert!(cfg.validate().unwrap_err().to_string().contains("feeds"));

        let cfg = PipelineConfig::new("q", vec!["u".into()]);
        assert!(cfg.validate().is_ok());
    }
}
