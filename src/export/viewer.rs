//! Compact document for the graph viewer
//!
//! `{"a":{},"n":[["<id>",route,train],..],"e":[["<from>","<to>"],..]}`.
//! Node keys are strings because the viewer addresses nodes by key.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::Result;
use crate::models::{InterlockingRouteId, NodeId, OrderingGraph, TrainId};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ViewerDocument {
    /// Graph attributes
    pub a: Map<String, Value>,
    /// `[key, route, train]`
    pub n: Vec<(String, InterlockingRouteId, TrainId)>,
    /// `[source key, target key]`
    pub e: Vec<(String, String)>,
}

impl ViewerDocument {
    #[must_use]
    pub fn from_graph(graph: &OrderingGraph) -> Self {
        Self {
            a: Map::new(),
            n: graph
                .nodes()
                .iter()
                .map(|node| (node.id.to_string(), node.interlocking_route_id, node.train_id))
                .collect(),
            e: graph.edges().map(|(from, to)| (from.to_string(), to.to_string())).collect(),
        }
    }

    /// # Errors
    ///
    /// Returns [`crate::OrderingError::Json`] if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Body of an invert request: `["<from>","<to>"]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeRequest(pub String, pub String);

impl EdgeRequest {
    /// Both keys as node ids, if they are numeric
    #[must_use]
    pub fn node_ids(&self) -> Option<(NodeId, NodeId)> {
        Some((self.0.trim().parse().ok()?, self.1.trim().parse().ok()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ItineraryEntry, RouteResourceMap, Timetable};
    use crate::ordering::{build_ordering_graph, BuildOptions};

    fn two_train_graph() -> OrderingGraph {
        let infrastructure: RouteResourceMap = vec![(4, vec![1])].into_iter().collect();
        let mut timetable = Timetable::new();
        timetable.push(7, ItineraryEntry::from_secs(4, 0, 10));
        timetable.push(9, ItineraryEntry::from_secs(4, 10, 20));
        build_ordering_graph(&infrastructure, &timetable, &BuildOptions::default())
            .expect("valid input")
            .into_graph()
    }

    #[test]
    fn test_viewer_document_layout() {
        let json = ViewerDocument::from_graph(&two_train_graph()).to_json().expect("serializable");
        assert_eq!(json, r#"{"a":{},"n":[["0",4,7],["1",4,9]],"e":[["0","1"]]}"#);
    }

    #[test]
    fn test_edge_request() {
        let request: EdgeRequest = serde_json::from_str(r#"["0","1"]"#).expect("valid request");
        assert_eq!(request.node_ids(), Some((0, 1)));
        assert_eq!(EdgeRequest("a".into(), "1".into()).node_ids(), None);
    }
}
