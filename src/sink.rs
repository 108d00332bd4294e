// src/sink.rs
//! Result delivery seam. The orchestrator takes a sink by reference instead
//! of pushing to ambient global state, so callers choose where the ranked
//! records go.

use std::sync::Mutex;

use anyhow::Result;
use async_trait::async_trait;

use crate::score::ScoredResult;

#[async_trait]
pub trait ResultSink: Send + Sync {
    async fn push(&self, results: &[ScoredResult]) -> Result<()>;
}

/// Writes each record as one JSON line on stdout.
pub struct JsonStdoutSink;

#[async_trait]
impl ResultSink for JsonStdoutSink {
    async fn push(&self, results: &[ScoredResult]) -> Result<()> {
        for r in results {
            println!("{}", serde_json::to_string(r)?);
        }
        Ok(())
    }
}

/// Collects pushed records in memory; used by tests.
#[derive(Default)]
pub struct MemorySink {
    records: Mutex<Vec<ScoredResult>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<ScoredResult> {
        self.records.lock().expect("sink lock poisoned").clone()
    }
}

#[async_trait]
impl ResultSink for MemorySink {
    async fn push(&self, results: &[ScoredResult]) -> Result<()> {
        self.records
            .lock()
            .expect("sink lock poisoned")
            .extend_from_slice(results);
        Ok(())
    }
}
