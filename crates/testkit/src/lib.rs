//! # poolstats-testkit
//!
//! Test helpers and in-memory port implementations.
//! This crate depends on `ports` and `domain`.

pub mod fixtures;
pub mod in_memory;

pub use in_memory::{
    CountingIter, InMemoryNodeStore, MetricCall, NoopMetricSink, RecordingMetricSink,
};

/// Returns the testkit crate version.
#[must_use]
pub const fn testkit_crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
