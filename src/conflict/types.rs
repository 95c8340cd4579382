//! Core types for structural conflict reporting.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::{InterlockingRouteId, Interval, NodeId, ResourceId, TrainId};

/// One side of a structural conflict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConflictingUsage {
    pub node: NodeId,
    pub train: TrainId,
    pub route: InterlockingRouteId,
    pub interval: Interval,
}

/// Two trains planned onto conflicting routes at overlapping times
///
/// No precedence edge can express such a pair, so the builder reports it
/// instead of ordering it. `first.node` is always the lower node id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuralConflict {
    pub first: ConflictingUsage,
    pub second: ConflictingUsage,
    /// Time span during which both usages hold their routes
    pub overlap: Interval,
    /// Resources both routes occupy
    pub shared_resources: Vec<ResourceId>,
}

impl StructuralConflict {
    /// Whether both usages are of the very same interlocking route
    #[must_use]
    pub fn is_same_route(&self) -> bool {
        self.first.route == self.second.route
    }

    /// Human-readable one-line description
    #[must_use]
    pub fn format_message(&self) -> String {
        let location = if self.is_same_route() {
            format!("both on interlocking route {}", self.first.route)
        } else {
            format!(
                "on interlocking routes {} and {} sharing {} resource(s)",
                self.first.route,
                self.second.route,
                self.shared_resources.len()
            )
        };

        format!(
            "train {} (node {}, {}) overlaps train {} (node {}, {}) {location} during {}",
            self.first.train,
            self.first.node,
            self.first.interval,
            self.second.train,
            self.second.node,
            self.second.interval,
            self.overlap,
        )
    }
}

impl fmt::Display for StructuralConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format_message())
    }
}
