//! Document format: `{"nodes":[{"id":0,"interlocking_route_id":..,"train_id":..,"in":[..],"out":[..]},..]}`

use std::io::Write;

use crate::error::Result;
use crate::models::OrderingGraph;

/// # Errors
///
/// Returns [`crate::OrderingError::Json`] if serialization fails.
pub fn to_json(graph: &OrderingGraph) -> Result<String> {
    Ok(serde_json::to_string(graph)?)
}

/// # Errors
///
/// Returns [`crate::OrderingError::Json`] if serialization fails.
pub fn to_json_pretty(graph: &OrderingGraph) -> Result<String> {
    Ok(serde_json::to_string_pretty(graph)?)
}

/// # Errors
///
/// Returns [`crate::OrderingError::Json`] if writing fails.
pub fn write_json<W: Write>(graph: &OrderingGraph, writer: W) -> Result<()> {
    serde_json::to_writer(writer, graph)?;
    Ok(())
}

/// Parse a graph document and check its structural invariants
///
/// # Errors
///
/// Returns [`crate::OrderingError::Json`] for invalid documents and
/// [`crate::OrderingError::MalformedGraph`] if ids or edges are inconsistent.
pub fn from_json(document: &str) -> Result<OrderingGraph> {
    let graph: OrderingGraph = serde_json::from_str(document)?;
    graph.validate()?;
    Ok(graph)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::OrderingError;
    use crate::ordering::{generate_graph, BuildOptions, GeneratorParams};

    #[test]
    fn test_document_field_names() {
        let build = generate_graph(&GeneratorParams::new(2, 1, 1, 1), &BuildOptions::default())
            .expect("valid params");
        let value: serde_json::Value =
            serde_json::from_str(&to_json(&build.graph).expect("serializable")).expect("valid json");

        let node = &value["nodes"][0];
        for field in ["id", "interlocking_route_id", "train_id", "in", "out"] {
            assert!(node.get(field).is_some(), "missing field {field}");
        }
        assert_eq!(value["nodes"].as_array().map(Vec::len), Some(2));
    }

    #[test]
    fn test_round_trip() {
        let build = generate_graph(&GeneratorParams::new(12, 3, 2, 5).with_seed(5), &BuildOptions::default())
            .expect("valid params");
        let parsed = from_json(&to_json_pretty(&build.graph).expect("serializable")).expect("valid document");
        assert_eq!(parsed, build.graph);

        let mut buffer = Vec::new();
        write_json(&build.graph, &mut buffer).expect("writable");
        assert_eq!(String::from_utf8(buffer).expect("utf8"), to_json(&build.graph).expect("serializable"));
    }

    #[test]
    fn test_rejects_half_edges() {
        let document = r#"{"nodes":[
            {"id":0,"interlocking_route_id":1,"train_id":1,"in":[],"out":[1]},
            {"id":1,"interlocking_route_id":1,"train_id":2,"in":[],"out":[]}
        ]}"#;
        assert!(matches!(from_json(document), Err(OrderingError::MalformedGraph(_))));
    }

    #[test]
    fn test_rejects_repeated_edges() {
        let document = r#"{"nodes":[
            {"id":0,"interlocking_route_id":1,"train_id":1,"in":[],"out":[1,1]},
            {"id":1,"interlocking_route_id":1,"train_id":2,"in":[0],"out":[]}
        ]}"#;
        assert!(matches!(from_json(document), Err(OrderingError::MalformedGraph(_))));
    }

    #[test]
    fn test_rejects_invalid_json() {
        assert!(matches!(from_json("{\"nodes\": 3}"), Err(OrderingError::Json(_))));
    }
}
