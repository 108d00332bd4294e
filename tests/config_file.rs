// tests/config_file.rs
use std::fs;

use feedrank::{MatchMethod, PipelineConfig};

#[test]
fn toml_config_loads_from_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("run.toml");
    fs::write(
        &path,
        r#"
query = "climate policy"
feeds = ["https://news.example/rss"]
top_n = 5
recency_exponent = 1
method = "ratio"
"#,
    )
    .unwrap();

    let cfg = PipelineConfig::from_path(&path).unwrap();
    assert_eq!(cfg.query, "climate policy");
    assert_eq!(cfg.feeds, vec!["https://news.example/rss".to_string()]);
    assert_eq!(cfg.top_n, 5);
    assert_eq!(cfg.recency_exponent, 1);
    assert_eq!(cfg.method, MatchMethod::Ratio);
    assert_eq!(cfg.timeout_secs, 60);
}

#[test]
fn json_config_loads_from_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("run.json");
    fs::write(
        &path,
        r#"{"query": "q", "feeds": ["https://a.test/f"], "timeout_secs": 5, "proxy": true}"#,
    )
    .unwrap();

    let cfg = PipelineConfig::from_path(&path).unwrap();
    assert_eq!(cfg.timeout_secs, 5);
    assert!(cfg.proxy);
    assert_eq!(cfg.method, MatchMethod::TokenSetRatio);
}

#[test]
fn missing_file_is_an_error_naming_the_path() {
    let err = PipelineConfig::from_path(std::path::Path::new("/nope/run.toml")).unwrap_err();
    assert!(err.to_string().contains("/nope/run.toml"));
}
