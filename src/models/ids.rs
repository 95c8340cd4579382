//! Identifier types shared by the infrastructure, timetable and ordering graph
//!
//! All ids are dense `u32` values. Ordering nodes are addressed purely by
//! their position in the node store; no node ever holds a reference to
//! another node.

/// Position of an [`OrderingNode`](super::OrderingNode) inside its graph
pub type NodeId = u32;

/// Identifier of a train in the timetable
pub type TrainId = u32;

/// Identifier of an interlocking route in the infrastructure
pub type InterlockingRouteId = u32;

/// Identifier of a physical resource (track section or element)
pub type ResourceId = u32;

/// Marker for "no such node". Never appears as a real node reference.
pub const INVALID_NODE: NodeId = NodeId::MAX;

/// Convert a node store position into a [`NodeId`]
///
/// # Panics
///
/// Panics if the position does not fit below [`INVALID_NODE`]; a graph that
/// large cannot be addressed at all.
#[must_use]
pub fn node_id_from_index(index: usize) -> NodeId {
    match NodeId::try_from(index) {
        Ok(id) if id != INVALID_NODE => id,
        _ => panic!("ordering graph exceeds the addressable node id range ({index})"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_id_from_index() {
        assert_eq!(node_id_from_index(0), 0);
        assert_eq!(node_id_from_index(41), 41);
    }

    #[test]
    #[should_panic(expected = "addressable node id range")]
    fn test_node_id_from_index_rejects_invalid_marker() {
        let _ = node_id_from_index(INVALID_NODE as usize);
    }
}
