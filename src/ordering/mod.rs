//! Ordering graph construction

mod builder;
mod generator;

pub use builder::{build_ordering_graph, BuildOptions, OrderingBuild};
pub use generator::{generate_graph, generate_inputs, GeneratorParams};
