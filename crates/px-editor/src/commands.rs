//! Linear undo log.
//!
//! Every committed mutation is recorded as an immutable `HistoryEntry`
//! snapshot of exactly what was added. Undo pops the most recent entry and
//! applies its inverse to the graph. There is no redo.

use px_core::model::{Edge, Graph, Node};
use serde::Serialize;

/// A record of one committed addition, sufficient to compute its inverse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum HistoryEntry {
    Node { node: Node },
    Edge { edge: Edge },
}

impl HistoryEntry {
    /// Short human-readable label, e.g. for an undo tooltip.
    pub fn describe(&self) -> String {
        match self {
            HistoryEntry::Node { node } => format!("place {} at ({}, {})", node.id, node.x, node.y),
            HistoryEntry::Edge { edge } => format!("connect {} to {}", edge.from, edge.to),
        }
    }

    /// Apply the inverse of this entry, returning how many edges left the
    /// graph with it. `None` if the graph no longer held what was recorded.
    fn revert(&self, graph: &mut Graph) -> Option<usize> {
        match self {
            // Cascades to any edges still attached to the node.
            HistoryEntry::Node { node } => graph.remove_node(node.id).map(|r| r.edges.len()),
            HistoryEntry::Edge { edge } => graph.remove_edge(edge.from, edge.to).map(|_| 1),
        }
    }
}

/// Append-only stack of `HistoryEntry` values.
#[derive(Debug, Clone, Default)]
pub struct UndoLog {
    entries: Vec<HistoryEntry>,
    /// Maximum undo depth (`None` = unbounded).
    max_depth: Option<usize>,
}

impl UndoLog {
    pub fn new(max_depth: Option<usize>) -> Self {
        Self {
            entries: Vec::new(),
            max_depth,
        }
    }

    /// Record an already-applied entry, trimming the oldest past `max_depth`.
    pub fn push(&mut self, entry: HistoryEntry) {
        self.entries.push(entry);
        if let Some(max) = self.max_depth
            && self.entries.len() > max
        {
            let excess = self.entries.len() - max;
            self.entries.drain(..excess);
        }
    }

    /// Undo the most recent entry. Returns `None` when there is nothing to undo.
    pub fn pop(&mut self, graph: &mut Graph) -> Option<HistoryEntry> {
        let entry = self.entries.pop()?;
        match entry.revert(graph) {
            Some(edges) => log::debug!("undo: {} ({edges} edges removed)", entry.describe()),
            None => log::warn!("undo target already gone: {}", entry.describe()),
        }
        Some(entry)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn can_undo(&self) -> bool {
        !self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The entry the next `pop` would undo.
    pub fn last(&self) -> Option<&HistoryEntry> {
        self.entries.last()
    }

    /// Entries oldest-first.
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }
}
