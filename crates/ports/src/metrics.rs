//! Metrics backend boundary contract (timings, counters, gauges).

/// Boundary contract for a metrics backend.
///
/// Keys arrive fully formatted. Emission is fire-and-forget: implementations
/// own transport failures and must not panic on them.
pub trait MetricSink: Send + Sync {
    /// Record a duration sample in milliseconds.
    fn timing(&self, key: &str, duration_ms: u64);

    /// Increment a counter by one.
    fn increment(&self, key: &str);

    /// Set a gauge to an absolute value.
    fn gauge(&self, key: &str, value: u64);
}
