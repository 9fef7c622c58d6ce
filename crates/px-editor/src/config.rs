//! Editor configuration.
//!
//! Every field has a default, so `{}` is a valid configuration and hosts
//! only need to spell out what they change.

use px_core::document::DanglingEdgePolicy;
use px_core::error::{Error, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Screen-pixel radius within which a click counts as hitting a node.
    pub hit_radius: f64,

    /// Maximum undo depth (`None` = unbounded).
    pub undo_limit: Option<usize>,

    /// How loads treat edges that reference missing nodes.
    pub dangling_edges: DanglingEdgePolicy,

    /// File name suggested to the host when saving.
    pub document_name: String,

    /// Pretty-print saved documents.
    pub pretty: bool,

    /// Start the session in placement mode.
    pub start_placing: bool,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            hit_radius: 8.0,
            undo_limit: None,
            dangling_edges: DanglingEdgePolicy::Reject,
            document_name: "graph.json".to_string(),
            pretty: false,
            start_placing: false,
        }
    }
}

impl EditorConfig {
    /// Parse a JSON configuration object.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if !self.hit_radius.is_finite() || self.hit_radius < 0.0 {
            return Err(Error::Config(format!(
                "hit_radius must be a non-negative number, got {}",
                self.hit_radius
            )));
        }
        if self.undo_limit == Some(0) {
            return Err(Error::Config("undo_limit must be at least 1".to_string()));
        }
        if self.document_name.trim().is_empty() {
            return Err(Error::Config("document_name must not be empty".to_string()));
        }
        Ok(())
    }
}
