//! Serialized forms of an ordering graph

pub mod json;
pub mod viewer;

pub use json::{from_json, to_json, to_json_pretty, write_json};
pub use viewer::{EdgeRequest, ViewerDocument};
