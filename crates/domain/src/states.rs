//! Node lifecycle states.

use poolstats_shared::{ErrorCode, ErrorEnvelope};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle state of a node record.
///
/// The set is closed: every record held by the state store carries one of
/// these values, and aggregation seeds a zero gauge for each of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NodeState {
    /// Node is being created by the provider.
    Building,
    /// Node is being tested before use.
    Testing,
    /// Node is ready to be handed out.
    Ready,
    /// Node is allocated to a request.
    InUse,
    /// Node was used and awaits cleanup.
    Used,
    /// Node is held for inspection.
    Hold,
    /// Node is being deleted.
    Deleting,
    /// Node failed to launch.
    Failed,
    /// Node record was created but launch has not started.
    Init,
}

impl NodeState {
    /// Every valid state, in declaration order.
    pub const ALL: [Self; 9] = [
        Self::Building,
        Self::Testing,
        Self::Ready,
        Self::InUse,
        Self::Used,
        Self::Hold,
        Self::Deleting,
        Self::Failed,
        Self::Init,
    ];

    /// Wire name used in metric keys.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Building => "building",
            Self::Testing => "testing",
            Self::Ready => "ready",
            Self::InUse => "in-use",
            Self::Used => "used",
            Self::Hold => "hold",
            Self::Deleting => "deleting",
            Self::Failed => "failed",
            Self::Init => "init",
        }
    }
}

impl fmt::Display for NodeState {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Unknown node state name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownNodeState {
    /// Raw input that failed to parse.
    pub input: String,
}

impl fmt::Display for UnknownNodeState {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "unknown node state: {}", self.input)
    }
}

impl std::error::Error for UnknownNodeState {}

impl From<UnknownNodeState> for ErrorEnvelope {
    fn from(error: UnknownNodeState) -> Self {
        let message = error.to_string();
        Self::expected(ErrorCode::new("domain", "unknown_node_state"), message)
            .with_metadata("input", error.input)
    }
}

impl FromStr for NodeState {
    type Err = UnknownNodeState;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let trimmed = input.trim();
        Self::ALL
            .into_iter()
            .find(|state| state.as_str() == trimmed)
            .ok_or_else(|| UnknownNodeState {
                input: input.to_owned(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn wire_names_round_trip_through_from_str() -> Result<(), UnknownNodeState> {
        for state in NodeState::ALL {
            assert_eq!(state.as_str().parse::<NodeState>()?, state);
        }
        Ok(())
    }

    #[test]
    fn serde_uses_wire_names() -> Result<(), Box<dyn Error>> {
        let value = serde_json::to_value(NodeState::InUse)?;
        assert_eq!(value, serde_json::json!("in-use"));
        let parsed: NodeState = serde_json::from_str("\"deleting\"")?;
        assert_eq!(parsed, NodeState::Deleting);
        Ok(())
    }

    #[test]
    fn unknown_state_maps_to_envelope() {
        let Err(error) = "exploded".parse::<NodeState>() else {
            unreachable!("exploded is not a node state");
        };
        let envelope = ErrorEnvelope::from(error);
        assert_eq!(envelope.code.code(), "unknown_node_state");
        assert_eq!(
            envelope.metadata.get("input").map(String::as_str),
            Some("exploded")
        );
    }
}
