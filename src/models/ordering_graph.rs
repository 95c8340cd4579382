//! Arena-backed ordering graph.
//!
//! Nodes live in one dense vector and reference each other only by
//! [`NodeId`], which always equals the node's position in that vector.

use petgraph::graph::{DiGraph, NodeIndex};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use super::ids::{node_id_from_index, InterlockingRouteId, NodeId, TrainId, INVALID_NODE};
use crate::error::{OrderingError, Result};

/// One train's use of one interlocking route
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderingNode {
    pub id: NodeId,
    pub interlocking_route_id: InterlockingRouteId,
    pub train_id: TrainId,
    /// Nodes that must be visited before this one
    #[serde(rename = "in")]
    pub incoming: Vec<NodeId>,
    /// Nodes that must be visited after this one
    #[serde(rename = "out")]
    pub outgoing: Vec<NodeId>,
}

impl OrderingNode {
    #[must_use]
    pub fn new(id: NodeId, interlocking_route_id: InterlockingRouteId, train_id: TrainId) -> Self {
        Self {
            id,
            interlocking_route_id,
            train_id,
            incoming: Vec::new(),
            outgoing: Vec::new(),
        }
    }
}

/// Precedence graph over (train, interlocking route) usages
///
/// Immutable once handed out by the builder, generator or importer; every
/// derived view (`with_inverted_edge`, `subgraph`) returns a new graph.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderingGraph {
    nodes: Vec<OrderingNode>,
}

impl OrderingGraph {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self { nodes: Vec::with_capacity(capacity) }
    }

    #[cfg(test)]
    pub(crate) fn from_nodes_unchecked(nodes: Vec<OrderingNode>) -> Self {
        Self { nodes }
    }

    pub(crate) fn add_node(&mut self, route: InterlockingRouteId, train: TrainId) -> NodeId {
        let id = node_id_from_index(self.nodes.len());
        self.nodes.push(OrderingNode::new(id, route, train));
        id
    }

    /// Record `from -> to` on both endpoints
    pub(crate) fn emplace_edge(&mut self, from: NodeId, to: NodeId) {
        debug_assert_ne!(from, to, "ordering graph must not contain self-loops");
        self.nodes[from as usize].outgoing.push(to);
        self.nodes[to as usize].incoming.push(from);
    }

    #[must_use]
    pub fn nodes(&self) -> &[OrderingNode] {
        &self.nodes
    }

    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<&OrderingNode> {
        self.nodes.get(id as usize)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.nodes.iter().map(|n| n.outgoing.len()).sum()
    }

    /// All edges as `(from, to)`, ordered by source id and then by the
    /// source's `out` list
    pub fn edges(&self) -> impl Iterator<Item = (NodeId, NodeId)> + '_ {
        self.nodes
            .iter()
            .flat_map(|node| node.outgoing.iter().map(move |&to| (node.id, to)))
    }

    #[must_use]
    pub fn has_edge(&self, from: NodeId, to: NodeId) -> bool {
        self.node(from).is_some_and(|n| n.outgoing.contains(&to))
    }

    /// Whether the edge connects nodes of two different trains
    #[must_use]
    pub fn is_route_edge(&self, from: NodeId, to: NodeId) -> bool {
        match (self.node(from), self.node(to)) {
            (Some(a), Some(b)) => a.train_id != b.train_id,
            _ => false,
        }
    }

    /// Train ids in order of their first node
    #[must_use]
    pub fn train_ids(&self) -> Vec<TrainId> {
        let mut seen = BTreeSet::new();
        self.nodes
            .iter()
            .filter(|n| seen.insert(n.train_id))
            .map(|n| n.train_id)
            .collect()
    }

    #[must_use]
    pub fn nodes_of_train(&self, train: TrainId) -> Vec<NodeId> {
        self.nodes.iter().filter(|n| n.train_id == train).map(|n| n.id).collect()
    }

    #[must_use]
    pub fn nodes_of_route(&self, route: InterlockingRouteId) -> Vec<NodeId> {
        self.nodes
            .iter()
            .filter(|n| n.interlocking_route_id == route)
            .map(|n| n.id)
            .collect()
    }

    /// Check the structural invariants: continuous ascending ids, in-range
    /// references, symmetric edges, no self-loops and no repeated neighbours
    ///
    /// # Errors
    ///
    /// Returns [`OrderingError::MalformedGraph`] describing the first violation found.
    pub fn validate(&self) -> Result<()> {
        let len = self.nodes.len();
        let in_range = |id: NodeId| id != INVALID_NODE && (id as usize) < len;

        for (pos, node) in self.nodes.iter().enumerate() {
            if node.id as usize != pos {
                return Err(OrderingError::MalformedGraph(format!(
                    "node at position {pos} carries id {}",
                    node.id
                )));
            }
            for (list, direction) in [(&node.outgoing, "out"), (&node.incoming, "in")] {
                if let Some(id) = first_duplicate(list) {
                    return Err(OrderingError::MalformedGraph(format!(
                        "node {} lists {id} twice in its {direction}-list",
                        node.id
                    )));
                }
            }

            for &to in &node.outgoing {
                if !in_range(to) {
                    return Err(OrderingError::MalformedGraph(format!(
                        "node {} has an out-edge to unknown node {to}",
                        node.id
                    )));
                }
                if to == node.id {
                    return Err(OrderingError::MalformedGraph(format!("node {to} has a self-loop")));
                }
                if !self.nodes[to as usize].incoming.contains(&node.id) {
                    return Err(OrderingError::MalformedGraph(format!(
                        "edge {} -> {to} is missing from the in-list of {to}",
                        node.id
                    )));
                }
            }

            for &from in &node.incoming {
                if !in_range(from) {
                    return Err(OrderingError::MalformedGraph(format!(
                        "node {} has an in-edge from unknown node {from}",
                        node.id
                    )));
                }
                if from == node.id {
                    return Err(OrderingError::MalformedGraph(format!("node {from} has a self-loop")));
                }
                if !self.nodes[from as usize].outgoing.contains(&node.id) {
                    return Err(OrderingError::MalformedGraph(format!(
                        "edge {from} -> {} is missing from the out-list of {from}",
                        node.id
                    )));
                }
            }
        }

        Ok(())
    }

    /// Copy of this graph with the route edge `from -> to` reversed
    ///
    /// # Errors
    ///
    /// Fails if either node is unknown, the edge does not exist, both nodes
    /// belong to the same train, or `to -> from` is already an edge.
    pub fn with_inverted_edge(&self, from: NodeId, to: NodeId) -> Result<Self> {
        for id in [from, to] {
            if self.node(id).is_none() {
                return Err(OrderingError::UnknownNode(id));
            }
        }
        if !self.has_edge(from, to) {
            return Err(OrderingError::MissingEdge { from, to });
        }
        if !self.is_route_edge(from, to) {
            return Err(OrderingError::NotARouteEdge { from, to });
        }
        if self.has_edge(to, from) {
            return Err(OrderingError::ReverseEdgeExists { from, to });
        }

        let mut inverted = self.clone();
        inverted.nodes[from as usize].outgoing.retain(|&id| id != to);
        inverted.nodes[to as usize].incoming.retain(|&id| id != from);
        insert_sorted(&mut inverted.nodes[to as usize].outgoing, from);
        insert_sorted(&mut inverted.nodes[from as usize].incoming, to);

        log::debug!("inverted route edge {from} -> {to}");
        Ok(inverted)
    }

    /// Trains reachable from `train` within `degree` hops over edges between
    /// different trains. Always contains `train` itself.
    #[must_use]
    pub fn train_neighbourhood(&self, train: TrainId, degree: usize) -> BTreeSet<TrainId> {
        let mut by_train: BTreeMap<TrainId, Vec<&OrderingNode>> = BTreeMap::new();
        for node in &self.nodes {
            by_train.entry(node.train_id).or_default().push(node);
        }

        let mut result = BTreeSet::from([train]);
        let mut frontier = BTreeSet::from([train]);

        for _ in 0..degree {
            let mut next = BTreeSet::new();
            for current in &frontier {
                let Some(nodes) = by_train.get(current) else {
                    continue;
                };
                for node in nodes {
                    for &neighbour in node.incoming.iter().chain(&node.outgoing) {
                        let neighbour_train = self.nodes[neighbour as usize].train_id;
                        if neighbour_train != node.train_id && !result.contains(&neighbour_train) {
                            next.insert(neighbour_train);
                        }
                    }
                }
            }
            if next.is_empty() {
                break;
            }
            result.extend(next.iter().copied());
            frontier = next;
        }

        result
    }

    /// Re-indexed graph containing only the nodes of `trains` and the edges
    /// among them. Relative node order is preserved.
    #[must_use]
    pub fn subgraph(&self, trains: &BTreeSet<TrainId>) -> Self {
        let mut remap = vec![INVALID_NODE; self.nodes.len()];
        let mut sub = Self::new();
        for node in self.nodes.iter().filter(|n| trains.contains(&n.train_id)) {
            remap[node.id as usize] = sub.add_node(node.interlocking_route_id, node.train_id);
        }

        for node in self.nodes.iter().filter(|n| trains.contains(&n.train_id)) {
            let from = remap[node.id as usize];
            for &to in &node.outgoing {
                let to = remap[to as usize];
                if to != INVALID_NODE {
                    sub.emplace_edge(from, to);
                }
            }
        }

        sub
    }

    /// petgraph view of this graph. Node index `i` corresponds to node id `i`
    /// and carries `(train, route)`.
    #[must_use]
    pub fn to_digraph(&self) -> DiGraph<(TrainId, InterlockingRouteId), ()> {
        let mut graph = DiGraph::with_capacity(self.len(), self.edge_count());
        for node in &self.nodes {
            graph.add_node((node.train_id, node.interlocking_route_id));
        }
        for (from, to) in self.edges() {
            graph.add_edge(NodeIndex::new(from as usize), NodeIndex::new(to as usize), ());
        }
        graph
    }
}

fn first_duplicate(list: &[NodeId]) -> Option<NodeId> {
    let mut seen = BTreeSet::new();
    list.iter().copied().find(|&id| !seen.insert(id))
}

fn insert_sorted(list: &mut Vec<NodeId>, id: NodeId) {
    if let Err(pos) = list.binary_search(&id) {
        list.insert(pos, id);
    }
}
