use thiserror::Error;

use crate::models::{InterlockingRouteId, NodeId, TrainId, UnixTime};

/// Errors raised while building, generating, importing or editing ordering graphs
#[derive(Debug, Error)]
pub enum OrderingError {
    #[error("train {train} uses interlocking route {route}, which is not part of the infrastructure")]
    UnknownRoute { train: TrainId, route: InterlockingRouteId },

    #[error("train {train}: itinerary entry {index} exits at {exit} before it is entered at {entry}")]
    InvertedInterval { train: TrainId, index: usize, entry: UnixTime, exit: UnixTime },

    #[error("train {train}: itinerary entry {index} is entered at {entry}, before the previous entry is left at {previous_exit}")]
    UnorderedItinerary { train: TrainId, index: usize, previous_exit: UnixTime, entry: UnixTime },

    #[error("invalid generator parameters: {0}")]
    InvalidGeneratorParams(String),

    #[error("malformed ordering graph: {0}")]
    MalformedGraph(String),

    #[error("node {0} does not exist")]
    UnknownNode(NodeId),

    #[error("there is no edge {from} -> {to}")]
    MissingEdge { from: NodeId, to: NodeId },

    #[error("edge {from} -> {to} connects two nodes of the same train")]
    NotARouteEdge { from: NodeId, to: NodeId },

    #[error("edge {from} -> {to} cannot be inverted, {to} -> {from} already exists")]
    ReverseEdgeExists { from: NodeId, to: NodeId },

    #[error("invalid time value {value:?}, expected seconds or HH:MM:SS")]
    InvalidTime { value: String },

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, OrderingError>;
