// src/lib.rs
// Public library surface for integration tests (and potential reuse).

pub mod config;
pub mod fetch;
pub mod fuzzy;
pub mod normalize;
pub mod pipeline;
pub mod rank;
pub mod score;
pub mod sink;

// ---- Re-exports for stable public API ----
pub use crate::config::PipelineConfig;
pub use crate::fetch::{FeedFetcher, ProxyProvider, RoundRobinProxy};
pub use crate::fuzzy::MatchMethod;
pub use crate::pipeline::run_pipeline;
pub use crate::score::{FeedEntry, ScoredResult};
pub use crate::sink::{JsonStdoutSink, MemorySink, ResultSink};
