//! Property coverage for launch key construction.

use poolstats_domain::{LaunchEvent, MetricKey, sanitize_segment};
use proptest::prelude::*;

fn requestor_segment<'a>(key: &'a str, subkey: &str) -> Option<&'a str> {
    key.strip_prefix("pool.launch.requestor.")?
        .strip_suffix(subkey)?
        .strip_suffix('.')
}

proptest! {
    #[test]
    fn requestor_segment_never_contains_reserved_characters(
        requestor in "[a-zA-Z0-9.:@_-]{1,40}",
        subkey in "[a-z]{1,12}",
    ) {
        let event = LaunchEvent::new(subkey.as_str(), 5, "img", "p1").with_requestor(requestor.as_str());
        let keys = event.metric_keys();
        let last = keys.as_slice().last().map(MetricKey::as_str).unwrap_or_default();

        let expected = sanitize_segment(&requestor);
        let segment = requestor_segment(last, &subkey);
        prop_assert_eq!(segment, Some(expected.as_str()));
        let segment = segment.unwrap_or_default();
        prop_assert!(!segment.contains('.'));
        prop_assert!(!segment.contains(':'));
    }

    #[test]
    fn key_set_size_depends_only_on_optional_inputs(
        zone in proptest::option::of("[a-z0-9-]{0,8}"),
        requestor in proptest::option::of(".{0,16}"),
    ) {
        let mut event = LaunchEvent::new("ready", 1, "img", "p1");
        if let Some(zone) = zone.as_deref() {
            event = event.with_availability_zone(zone);
        }
        if let Some(requestor) = requestor.as_deref() {
            event = event.with_requestor(requestor);
        }

        let expected = 3
            + usize::from(zone.as_deref().is_some_and(|value| !value.is_empty()))
            + usize::from(requestor.as_deref().is_some_and(|value| !value.is_empty()));
        prop_assert_eq!(event.metric_keys().len(), expected);
    }

    #[test]
    fn key_construction_is_deterministic(
        subkey in ".{0,16}",
        image in ".{0,16}",
        requestor in ".{0,16}",
    ) {
        let event = LaunchEvent::new(subkey.as_str(), 7, image.as_str(), "p1")
            .with_requestor(requestor.as_str());
        prop_assert_eq!(event.metric_keys(), event.clone().metric_keys());
    }
}
