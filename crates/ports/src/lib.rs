//! # poolstats-ports
//!
//! Port traits for the poolstats hexagonal architecture.
//!
//! This crate defines the interfaces between the reporting use cases and the
//! outside world (metrics backends, node state stores). It depends only on
//! `domain` (`shared` is a test-only dependency).

/// Returns the ports crate version.
#[must_use]
pub const fn ports_crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

pub mod metrics;
pub mod node_state;

pub use metrics::*;
pub use node_state::*;

// Re-export domain types used in port signatures, so adapter crates can
// implement ports without directly depending on `poolstats-domain`.
pub use poolstats_domain::{NodeRecord, NodeState};

#[cfg(test)]
mod tests {
    use super::*;
    use poolstats_domain::domain_crate_version;
    use poolstats_shared::shared_crate_version;

    fn workspace_deps() -> Vec<String> {
        let cargo_toml = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/Cargo.toml"));
        let mut deps = Vec::new();
        let mut in_deps = false;

        for raw_line in cargo_toml.lines() {
            let line = raw_line.split('#').next().unwrap_or("").trim();
            if line.is_empty() {
                continue;
            }
            if line.starts_with('[') {
                in_deps = line == "[dependencies]" || line == "[dev-dependencies]";
                continue;
            }
            if in_deps && line.starts_with("poolstats-") {
                let key = line.split('=').next().unwrap_or("").trim();
                let name = key.split('.').next().unwrap_or("").trim();
                deps.push(name.to_string());
            }
        }

        deps
    }

    #[test]
    fn ports_depends_only_on_domain_and_shared() {
        let deps = workspace_deps();
        let allowed = ["poolstats-domain", "poolstats-shared"];

        for dep in &deps {
            assert!(
                allowed.contains(&dep.as_str()),
                "unexpected dependency found: {dep}"
            );
        }

        for expected in allowed {
            assert!(
                deps.iter().any(|dep| dep == expected),
                "missing dependency: {expected}"
            );
        }
    }

    #[test]
    fn ports_can_use_domain_and_shared() {
        assert!(!ports_crate_version().is_empty());
        assert!(!domain_crate_version().is_empty());
        assert!(!shared_crate_version().is_empty());
    }

    #[test]
    fn ports_are_object_safe() {
        struct Empty;
        impl NodeStatePort for Empty {
            fn node_iter(&self) -> NodeIter<'_> {
                Box::new(std::iter::empty())
            }
        }

        let store: &dyn NodeStatePort = &Empty;
        assert_eq!(store.node_iter().count(), 0);
        let _sink: Option<&dyn MetricSink> = None;
    }
}
