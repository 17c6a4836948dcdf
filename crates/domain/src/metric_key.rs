//! Metric key construction.
//!
//! Keys are dot-delimited hierarchies rooted at [`METRIC_ROOT`]. Every builder
//! here is pure and total: any input string produces a key, and only the
//! requestor segment is rewritten (see [`sanitize_segment`]).

use crate::NodeState;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Root segment of every metric emitted by the reporter.
pub const METRIC_ROOT: &str = "pool";

/// Fully-qualified metric name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MetricKey(Box<str>);

impl MetricKey {
    /// Join segments with `.` under [`METRIC_ROOT`].
    fn rooted(segments: &[&str]) -> Self {
        let capacity = segments
            .iter()
            .map(|segment| segment.len() + 1)
            .sum::<usize>()
            + METRIC_ROOT.len();
        let mut key = String::with_capacity(capacity);
        key.push_str(METRIC_ROOT);
        for segment in segments {
            key.push('.');
            key.push_str(segment);
        }
        Self(key.into_boxed_str())
    }

    /// Access the underlying string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume and return the underlying string.
    #[must_use]
    pub fn into_inner(self) -> Box<str> {
        self.0
    }
}

impl AsRef<str> for MetricKey {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl Borrow<str> for MetricKey {
    fn borrow(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for MetricKey {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Ordered sequence of metric keys derived from one event.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetricKeySet(Vec<MetricKey>);

impl MetricKeySet {
    /// Number of keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when the set holds no keys.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate keys in construction order.
    pub fn iter(&self) -> std::slice::Iter<'_, MetricKey> {
        self.0.iter()
    }

    /// Borrow the keys as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[MetricKey] {
        &self.0
    }

    fn push(&mut self, key: MetricKey) {
        self.0.push(key);
    }
}

impl<'a> IntoIterator for &'a MetricKeySet {
    type Item = &'a MetricKey;
    type IntoIter = std::slice::Iter<'a, MetricKey>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl IntoIterator for MetricKeySet {
    type Item = MetricKey;
    type IntoIter = std::vec::IntoIter<MetricKey>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Replace the hierarchy separator (`.`) and the `StatsD` field delimiter (`:`)
/// with `_` so the value can be embedded as a single key segment.
#[must_use]
pub fn sanitize_segment(raw: &str) -> String {
    raw.chars()
        .map(|ch| if matches!(ch, '.' | ':') { '_' } else { ch })
        .collect()
}

/// Inputs describing one completed launch attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchEvent {
    /// Outcome category appended to every key (e.g. `ready`, `error.quota`).
    pub subkey: Box<str>,
    /// Launch duration in milliseconds.
    pub duration_ms: u64,
    /// Image used for the node.
    pub image_name: Box<str>,
    /// Provider that launched the node.
    pub provider_name: Box<str>,
    /// Availability zone, when the provider reports one.
    pub availability_zone: Option<Box<str>>,
    /// Free-form identifier of the request originator.
    pub requestor: Option<Box<str>>,
}

impl LaunchEvent {
    /// Build an event without availability zone or requestor.
    pub fn new(
        subkey: impl Into<Box<str>>,
        duration_ms: u64,
        image_name: impl Into<Box<str>>,
        provider_name: impl Into<Box<str>>,
    ) -> Self {
        Self {
            subkey: subkey.into(),
            duration_ms,
            image_name: image_name.into(),
            provider_name: provider_name.into(),
            availability_zone: None,
            requestor: None,
        }
    }

    /// Set the availability zone.
    #[must_use]
    pub fn with_availability_zone(mut self, availability_zone: impl Into<Box<str>>) -> Self {
        self.availability_zone = Some(availability_zone.into());
        self
    }

    /// Set the requestor identifier.
    #[must_use]
    pub fn with_requestor(mut self, requestor: impl Into<Box<str>>) -> Self {
        self.requestor = Some(requestor.into());
        self
    }

    /// Derive the launch key set.
    ///
    /// Always provider, image, and bare subkey; then the zone-scoped provider
    /// key and the requestor key when those inputs are non-empty.
    #[must_use]
    pub fn metric_keys(&self) -> MetricKeySet {
        let subkey = self.subkey.as_ref();
        let provider = self.provider_name.as_ref();

        let mut keys = MetricKeySet::default();
        keys.push(MetricKey::rooted(&["launch", "provider", provider, subkey]));
        keys.push(MetricKey::rooted(&[
            "launch",
            "image",
            self.image_name.as_ref(),
            subkey,
        ]));
        keys.push(MetricKey::rooted(&["launch", subkey]));

        if let Some(zone) = non_empty(self.availability_zone.as_deref()) {
            keys.push(MetricKey::rooted(&[
                "launch", "provider", provider, zone, subkey,
            ]));
        }

        if let Some(requestor) = non_empty(self.requestor.as_deref()) {
            let requestor = sanitize_segment(requestor);
            keys.push(MetricKey::rooted(&[
                "launch",
                "requestor",
                requestor.as_str(),
                subkey,
            ]));
        }

        keys
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|value| !value.is_empty())
}

/// `pool.nodes.<state>`
#[must_use]
pub fn node_state_key(state: NodeState) -> MetricKey {
    MetricKey::rooted(&["nodes", state.as_str()])
}

/// `pool.label.<label>.nodes.<state>`
#[must_use]
pub fn label_state_key(label: &str, state: NodeState) -> MetricKey {
    MetricKey::rooted(&["label", label, "nodes", state.as_str()])
}

/// `pool.provider.<provider>.nodes.<state>`
#[must_use]
pub fn provider_state_key(provider: &str, state: NodeState) -> MetricKey {
    MetricKey::rooted(&["provider", provider, "nodes", state.as_str()])
}

/// `pool.provider.<provider>.max_servers`
#[must_use]
pub fn provider_max_servers_key(provider: &str) -> MetricKey {
    MetricKey::rooted(&["provider", provider, "max_servers"])
}
