//! Node state store boundary contract.

use poolstats_domain::NodeRecord;

/// Single-pass iterator over node records.
pub type NodeIter<'a> = Box<dyn Iterator<Item = NodeRecord> + 'a>;

/// Read-only view of the node state store.
pub trait NodeStatePort {
    /// Start a fresh pass over the current node records.
    ///
    /// The returned iterator is not assumed to be repeatable; callers request a
    /// new one per pass.
    fn node_iter(&self) -> NodeIter<'_>;
}
