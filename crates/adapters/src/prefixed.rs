//! Metric sink wrapper that namespaces every key.

use poolstats_ports::MetricSink;
use std::sync::Arc;

/// Prepends `<prefix>.` to every key before delegating to the inner sink.
#[derive(Clone)]
pub struct PrefixedMetricSink {
    inner: Arc<dyn MetricSink>,
    prefix: Box<str>,
}

impl PrefixedMetricSink {
    /// Wrap a sink with a key prefix (without the trailing `.`).
    pub fn new(inner: Arc<dyn MetricSink>, prefix: impl Into<Box<str>>) -> Self {
        Self {
            inner,
            prefix: prefix.into(),
        }
    }

    /// The configured prefix.
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    fn prefixed(&self, key: &str) -> String {
        let mut name = String::with_capacity(self.prefix.len() + 1 + key.len());
        name.push_str(&self.prefix);
        name.push('.');
        name.push_str(key);
        name
    }
}

impl std::fmt::Debug for PrefixedMetricSink {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("PrefixedMetricSink")
            .field("prefix", &self.prefix)
            .finish_non_exhaustive()
    }
}

impl MetricSink for PrefixedMetricSink {
    fn timing(&self, key: &str, duration_ms: u64) {
        self.inner.timing(&self.prefixed(key), duration_ms);
    }

    fn increment(&self, key: &str) {
        self.inner.increment(&self.prefixed(key));
    }

    fn gauge(&self, key: &str, value: u64) {
        self.inner.gauge(&self.prefixed(key), value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct CaptureSink {
        names: Mutex<Vec<String>>,
    }

    impl CaptureSink {
        fn names(&self) -> Vec<String> {
            self.names.lock().expect("names lock").clone()
        }
    }

    impl MetricSink for CaptureSink {
        fn timing(&self, key: &str, _duration_ms: u64) {
            self.names.lock().expect("names lock").push(key.to_owned());
        }

        fn increment(&self, key: &str) {
            self.names.lock().expect("names lock").push(key.to_owned());
        }

        fn gauge(&self, key: &str, _value: u64) {
            self.names.lock().expect("names lock").push(key.to_owned());
        }
    }

    #[test]
    fn every_call_is_prefixed() {
        let inner = Arc::new(CaptureSink::default());
        let sink = PrefixedMetricSink::new(inner.clone(), "zuul");

        sink.timing("pool.launch.ready", 1);
        sink.increment("pool.launch.ready");
        sink.gauge("pool.nodes.ready", 2);

        assert_eq!(
            inner.names(),
            vec![
                "zuul.pool.launch.ready",
                "zuul.pool.launch.ready",
                "zuul.pool.nodes.ready",
            ]
        );
        assert_eq!(sink.prefix(), "zuul");
    }
}
