//! JSON-lines metric sink (one object per timer, counter, or gauge).

use crate::log_sink::{LogSink, StderrLogSink};
use poolstats_ports::MetricSink;
use serde_json::Value;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

/// Metric sink that renders every call as a JSON line.
#[derive(Clone)]
pub struct JsonLinesMetricSink {
    sink: Arc<dyn LogSink>,
}

impl JsonLinesMetricSink {
    /// Create a metric sink backed by the provided line sink.
    #[must_use]
    pub fn new(sink: Arc<dyn LogSink>) -> Self {
        Self { sink }
    }

    /// Metric sink writing to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self::new(Arc::new(StderrLogSink))
    }
}

impl std::fmt::Debug for JsonLinesMetricSink {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter.debug_struct("JsonLinesMetricSink").finish_non_exhaustive()
    }
}

impl MetricSink for JsonLinesMetricSink {
    fn timing(&self, key: &str, duration_ms: u64) {
        let payload = metric_payload("timer", key, duration_ms, Some("ms"));
        self.sink.write_line(&payload);
    }

    fn increment(&self, key: &str) {
        let payload = metric_payload("counter", key, 1, None);
        self.sink.write_line(&payload);
    }

    fn gauge(&self, key: &str, value: u64) {
        let payload = metric_payload("gauge", key, value, None);
        self.sink.write_line(&payload);
    }
}

fn metric_payload(metric_type: &str, name: &str, value: u64, unit: Option<&str>) -> String {
    let mut payload = serde_json::Map::new();
    payload.insert("type".to_string(), Value::String("metric".to_string()));
    payload.insert("timestampMs".to_string(), Value::from(now_epoch_ms()));
    payload.insert(
        "metricType".to_string(),
        Value::String(metric_type.to_string()),
    );
    payload.insert("name".to_string(), Value::String(name.to_string()));
    payload.insert("value".to_string(), Value::from(value));
    if let Some(unit) = unit {
        payload.insert("unit".to_string(), Value::String(unit.to_string()));
    }
    to_line(payload)
}

fn to_line(payload: serde_json::Map<String, Value>) -> String {
    serde_json::to_string(&Value::Object(payload)).map_or_else(
        |_| {
            "{\"type\":\"metric\",\"metricType\":\"error\",\"name\":\"metrics.serialize_failed\",\"value\":1}\n"
                .to_string()
        },
        |mut encoded| {
            encoded.push('\n');
            encoded
        },
    )
}

fn now_epoch_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .ok()
        .and_then(|duration| u64::try_from(duration.as_millis()).ok())
        .unwrap_or_default()
}
