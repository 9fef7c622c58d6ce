//! Document codec: Graph ↔ JSON interchange file.
//!
//! The on-disk shape is fixed for compatibility with existing documents:
//!
//! ```json
//! {"nodes":[{"id":"n1","x":120,"y":48}],"edges":[{"from":"n1","to":"n2"}]}
//! ```
//!
//! Encoding is deterministic and preserves insertion order, so
//! `deserialize(serialize(g)) == g` for every graph.

use crate::error::{Error, Result};
use crate::id::{IdAllocator, NodeId};
use crate::model::{Edge, Graph, Node};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// What to do with an edge whose endpoint isn't among the document's nodes.
///
/// Self-loop edges are not covered by the policy: they are always
/// malformed, the same as `Graph::add_edge` refusing them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DanglingEdgePolicy {
    /// Fail the whole load with `DanglingEdgeReference`.
    #[default]
    Reject,
    /// Discard the edge and keep loading.
    Drop,
}

#[derive(Serialize)]
struct DocumentRef<'a> {
    nodes: &'a [Node],
    edges: &'a [Edge],
}

#[derive(Deserialize)]
struct Document {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
}

/// Encode as a JSON string.
pub fn to_json(graph: &Graph, pretty: bool) -> Result<String> {
    let doc = DocumentRef {
        nodes: graph.nodes(),
        edges: graph.edges(),
    };
    let json = if pretty {
        serde_json::to_string_pretty(&doc)?
    } else {
        serde_json::to_string(&doc)?
    };
    Ok(json)
}

/// Encode as compact JSON bytes.
pub fn serialize(graph: &Graph) -> Result<Vec<u8>> {
    to_json(graph, false).map(String::into_bytes)
}

/// Decode with the default policy (dangling edges are rejected).
pub fn deserialize(bytes: &[u8]) -> Result<Graph> {
    deserialize_with(bytes, DanglingEdgePolicy::default())
}

/// Decode a document, validating node identity and edge endpoints.
pub fn deserialize_with(bytes: &[u8], dangling: DanglingEdgePolicy) -> Result<Graph> {
    let doc: Document = serde_json::from_slice(bytes)?;

    let mut seen: HashSet<NodeId> = HashSet::with_capacity(doc.nodes.len());
    for node in &doc.nodes {
        if !seen.insert(node.id) {
            return Err(Error::MalformedDocument(format!(
                "duplicate node id `{}`",
                node.id
            )));
        }
        if !IdAllocator::can_follow(node.id) {
            return Err(Error::MalformedDocument(format!(
                "node id `{}` exhausts the id counter",
                node.id
            )));
        }
    }

    let mut edges = Vec::with_capacity(doc.edges.len());
    for edge in doc.edges {
        if edge.from == edge.to {
            return Err(Error::MalformedDocument(format!(
                "edge connects node `{}` to itself",
                edge.from
            )));
        }
        let missing = [edge.from, edge.to]
            .into_iter()
            .find(|id| !seen.contains(id));
        match (missing, dangling) {
            (None, _) => edges.push(edge),
            (Some(missing), DanglingEdgePolicy::Reject) => {
                return Err(Error::DanglingEdgeReference {
                    from: edge.from,
                    to: edge.to,
                    missing,
                });
            }
            (Some(missing), DanglingEdgePolicy::Drop) => {
                log::warn!(
                    "dropping edge {} -> {}: node {missing} is not in the document",
                    edge.from,
                    edge.to
                );
            }
        }
    }

    let graph = Graph::from_parts(doc.nodes, edges);
    log::debug!(
        "decoded document: {} nodes, {} edges, next id {}{}",
        graph.node_count(),
        graph.edge_count(),
        crate::id::NODE_ID_PREFIX,
        graph.id_allocator().peek()
    );
    Ok(graph)
}
