#![allow(clippy::implicit_hasher)]

//! Ordering graphs for railway simulation.
//!
//! An ordering graph has one node per (train, interlocking route) usage of a
//! timetable and a directed edge wherever two trains use conflicting routes
//! one after the other. Simulations walk the graph to decide which train may
//! claim a shared resource next.

pub mod conflict;
pub mod constants;
pub mod error;
pub mod export;
pub mod import;
pub mod logging;
pub mod models;
pub mod ordering;

pub use error::{OrderingError, Result};
pub use models::{OrderingGraph, OrderingNode};
pub use ordering::{build_ordering_graph, generate_graph, BuildOptions, GeneratorParams, OrderingBuild};
