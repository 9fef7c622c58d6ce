use crate::id::NodeId;
use thiserror::Error;

/// Common error type for Pixgraph components.
#[derive(Debug, Error)]
pub enum Error {
    /// The background surface has not reported its natural pixel size yet.
    #[error("surface natural size is not known yet")]
    MissingSurfaceSize,

    /// The surface is rendered with no usable extent.
    #[error("surface is rendered with a degenerate extent ({width}x{height})")]
    DegenerateSurface { width: f64, height: f64 },

    #[error("malformed document: {0}")]
    MalformedDocument(String),

    /// An edge in a loaded document names a node the document doesn't contain.
    #[error("edge {from} -> {to} references missing node {missing}")]
    DanglingEdgeReference {
        from: NodeId,
        to: NodeId,
        missing: NodeId,
    },

    #[error("node {0} does not exist")]
    UnknownNode(NodeId),

    #[error("cannot connect node {0} to itself")]
    SelfLoop(NodeId),

    #[error("configuration error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::MalformedDocument(e.to_string())
    }
}

/// Result type alias using Pixgraph's Error.
pub type Result<T> = std::result::Result<T, Error>;
