//! Editor session: the single owner of graph, history, selection and mode.
//!
//! Every user interaction is routed through `EditorSession`:
//!
//! - **Pointer down**: hit-test against existing nodes first. A hit feeds the
//!   selection machine (and may add an edge); it never places a node. A miss
//!   places a node at the mapped image position, but only while `Placing`.
//! - **Undo**: pops the last history entry and applies its inverse. Removing
//!   the armed node also disarms the selection.
//! - **Clear / Load**: replace the graph and reset history and selection in
//!   the same step.
//!
//! Events are handled one at a time to completion; nothing here blocks.

use crate::commands::{HistoryEntry, UndoLog};
use crate::config::EditorConfig;
use crate::input::InputEvent;
use crate::selection::{Selection, SelectionOutcome};
use crate::shortcuts::{ShortcutAction, ShortcutMap};
use crate::tools::PlacementMode;
use px_core::coords::{ImageSize, ScreenRect, SurfaceMapping};
use px_core::document;
use px_core::error::{Error, Result};
use px_core::hit::hit_test;
use px_core::id::NodeId;
use px_core::model::{Edge, Graph, Node};

/// What a pointer click did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    /// Nothing changed: not placing, surface not ready, or off-surface.
    Ignored,
    /// A new node was placed.
    Placed(Node),
    /// A node was armed as the first endpoint of an edge.
    Armed(NodeId),
    /// The armed node was clicked again and released.
    Deselected(NodeId),
    /// A second node completed an edge.
    Connected(Edge),
}

impl ClickOutcome {
    /// Whether the graph itself changed.
    pub fn mutated(&self) -> bool {
        matches!(self, ClickOutcome::Placed(_) | ClickOutcome::Connected(_))
    }

    pub fn name(&self) -> &'static str {
        match self {
            ClickOutcome::Ignored => "ignored",
            ClickOutcome::Placed(_) => "placed",
            ClickOutcome::Armed(_) => "armed",
            ClickOutcome::Deselected(_) => "deselected",
            ClickOutcome::Connected(_) => "connected",
        }
    }
}

/// Result of routing an `InputEvent`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputOutcome {
    Click(ClickOutcome),
    /// A shortcut fired. `changed` is `false` for host-handled actions
    /// (save/open) and for no-ops such as undo on an empty log.
    Shortcut {
        action: ShortcutAction,
        changed: bool,
    },
    /// The key has no binding.
    Unbound,
}

/// The annotation editor state for one background image.
#[derive(Debug, Clone)]
pub struct EditorSession {
    graph: Graph,
    history: UndoLog,
    selection: Selection,
    mode: PlacementMode,
    /// Natural size of the background surface, once it has loaded.
    natural_size: Option<ImageSize>,
    config: EditorConfig,
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl EditorSession {
    /// Create a session with an empty graph.
    pub fn new(config: EditorConfig) -> Self {
        let mode = if config.start_placing {
            PlacementMode::Placing
        } else {
            PlacementMode::Idle
        };
        Self {
            graph: Graph::new(),
            history: UndoLog::new(config.undo_limit),
            selection: Selection::Idle,
            mode,
            natural_size: None,
            config,
        }
    }

    /// Create a session seeded from a saved document.
    pub fn from_document(bytes: &[u8], config: EditorConfig) -> Result<Self> {
        let mut session = Self::new(config);
        session.load(bytes)?;
        Ok(session)
    }

    // ─── Surface readiness ───────────────────────────────────────────────

    /// Record the background surface's natural size. Until this fires,
    /// clicks are refused.
    pub fn surface_loaded(&mut self, size: ImageSize) {
        if self.natural_size != Some(size) {
            log::debug!("surface ready: {}x{}", size.width, size.height);
            self.natural_size = Some(size);
        }
    }

    pub fn natural_size(&self) -> Option<ImageSize> {
        self.natural_size
    }

    /// The screen ↔ image mapping for the surface's current rendered rect.
    pub fn mapping(&self, surface: ScreenRect) -> Result<SurfaceMapping> {
        SurfaceMapping::new(surface, self.natural_size)
    }

    // ─── Placement mode ──────────────────────────────────────────────────

    pub fn mode(&self) -> PlacementMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: PlacementMode) {
        self.mode = mode;
    }

    pub fn toggle_placement(&mut self) -> PlacementMode {
        let mode = self.mode.toggle();
        log::debug!("placement mode: {}", mode.name());
        mode
    }

    // ─── Input routing ───────────────────────────────────────────────────

    /// Route a normalized input event.
    pub fn handle_input(&mut self, event: &InputEvent) -> InputOutcome {
        match event {
            InputEvent::PointerDown { x, y, surface } => {
                InputOutcome::Click(self.pointer_down(*x, *y, *surface))
            }
            InputEvent::Key { key, modifiers } => match ShortcutMap::resolve(key, *modifiers) {
                Some(action) => InputOutcome::Shortcut {
                    action,
                    changed: self.dispatch(action),
                },
                None => InputOutcome::Unbound,
            },
        }
    }

    /// Handle a pointer press at screen position `(px, py)`.
    pub fn pointer_down(&mut self, px: f64, py: f64, surface: ScreenRect) -> ClickOutcome {
        let mapping = match self.mapping(surface) {
            Ok(m) => m,
            Err(Error::MissingSurfaceSize) => {
                log::debug!("click refused: surface size not known yet");
                return ClickOutcome::Ignored;
            }
            Err(e) => {
                log::warn!("click refused: {e}");
                return ClickOutcome::Ignored;
            }
        };

        if let Some(id) = hit_test(&self.graph, &mapping, px, py, self.config.hit_radius) {
            log::trace!("pointer ({px}, {py}) hit node {id}");
            return self.click_node(id);
        }

        if !self.mode.is_placing() {
            log::trace!("background click ignored: not placing");
            return ClickOutcome::Ignored;
        }
        if !surface.contains(px, py) {
            log::trace!("background click ignored: outside surface");
            return ClickOutcome::Ignored;
        }

        let p = mapping.to_image(px, py);
        ClickOutcome::Placed(self.add_node(p.x, p.y))
    }

    /// Feed a node click through the selection machine, adding an edge
    /// when it completes one.
    pub fn click_node(&mut self, id: NodeId) -> ClickOutcome {
        if !self.graph.contains(id) {
            log::warn!("click on unknown node {id}");
            return ClickOutcome::Ignored;
        }
        match self.selection.click(id) {
            SelectionOutcome::Armed(id) => ClickOutcome::Armed(id),
            SelectionOutcome::Deselected(id) => ClickOutcome::Deselected(id),
            SelectionOutcome::EdgeRequested { from, to } => match self.add_edge(from, to) {
                Ok(edge) => ClickOutcome::Connected(edge),
                Err(e) => {
                    log::warn!("edge {from} -> {to} not added: {e}");
                    ClickOutcome::Ignored
                }
            },
        }
    }

    /// Run a shortcut action. Returns `true` if session state changed.
    /// Save and open need the host and report `false`.
    pub fn dispatch(&mut self, action: ShortcutAction) -> bool {
        match action {
            ShortcutAction::TogglePlacement => {
                self.toggle_placement();
                true
            }
            ShortcutAction::Undo => self.undo().is_some(),
            ShortcutAction::ClearAll => {
                let changed = !self.graph.is_empty() || !self.history.is_empty();
                self.clear();
                changed
            }
            ShortcutAction::Deselect => {
                let changed = self.selection.is_armed();
                self.selection.clear();
                changed
            }
            ShortcutAction::Save | ShortcutAction::Open => false,
        }
    }

    // ─── Mutations ───────────────────────────────────────────────────────

    /// Place a node at natural-pixel `(x, y)` and record it for undo.
    pub fn add_node(&mut self, x: i32, y: i32) -> Node {
        let node = self.graph.add_node(x, y);
        self.record(HistoryEntry::Node { node });
        node
    }

    /// Connect two nodes and record the edge for undo.
    pub fn add_edge(&mut self, from: NodeId, to: NodeId) -> Result<Edge> {
        let edge = self.graph.add_edge(from, to)?;
        self.record(HistoryEntry::Edge { edge });
        Ok(edge)
    }

    fn record(&mut self, entry: HistoryEntry) {
        log::debug!("commit: {}", entry.describe());
        self.history.push(entry);
    }

    /// Undo the most recent addition. Returns `None` if there is nothing
    /// to undo.
    pub fn undo(&mut self) -> Option<HistoryEntry> {
        let entry = self.history.pop(&mut self.graph)?;
        if let HistoryEntry::Node { node } = entry
            && self.selection.forget(node.id)
        {
            log::debug!("selection released: {} was removed", node.id);
        }
        Some(entry)
    }

    /// Empty the graph, history and selection together.
    pub fn clear(&mut self) {
        self.graph.clear();
        self.history.clear();
        self.selection.clear();
        log::debug!("session cleared");
    }

    // ─── Persistence ─────────────────────────────────────────────────────

    /// Encode the current graph for the host to write out.
    pub fn save(&self) -> Result<Vec<u8>> {
        document::to_json(&self.graph, self.config.pretty).map(String::into_bytes)
    }

    /// File name to suggest to the host's save dialog.
    pub fn suggested_name(&self) -> &str {
        &self.config.document_name
    }

    /// Replace the graph with a decoded document.
    ///
    /// On success history and selection are reset (a loaded graph can't be
    /// undone piece by piece). On failure nothing changes.
    pub fn load(&mut self, bytes: &[u8]) -> Result<()> {
        let graph = match document::deserialize_with(bytes, self.config.dangling_edges) {
            Ok(graph) => graph,
            Err(e) => {
                log::warn!("load failed: {e}");
                return Err(e);
            }
        };
        log::debug!(
            "loaded document: {} nodes, {} edges",
            graph.node_count(),
            graph.edge_count()
        );
        self.graph = graph;
        self.history.clear();
        self.selection.clear();
        Ok(())
    }

    // ─── Queries ─────────────────────────────────────────────────────────

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn history(&self) -> &UndoLog {
        &self.history
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    /// The node currently armed for edge completion.
    pub fn armed(&self) -> Option<NodeId> {
        self.selection.armed()
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Modifiers;
    use pretty_assertions::assert_eq;

    const SURFACE: ScreenRect = ScreenRect::new(10.0, 20.0, 200.0, 100.0);
    const NATURAL: ImageSize = ImageSize::new(400, 200);

    fn ready_session() -> EditorSession {
        let mut s = EditorSession::default();
        s.surface_loaded(NATURAL);
        s.set_mode(PlacementMode::Placing);
        s
    }

    #[test]
    fn click_places_at_image_coordinates() {
        let mut s = ready_session();
        let out = s.pointer_down(110.0, 70.0, SURFACE);
        let ClickOutcome::Placed(node) = out else {
            panic!("expected placement, got {out:?}");
        };
        assert_eq!((node.x, node.y), (200, 100));
        assert_eq!(s.history().len(), 1);
    }

    #[test]
    fn click_refused_before_surface_loads() {
        let mut s = EditorSession::default();
        s.set_mode(PlacementMode::Placing);
        assert_eq!(s.pointer_down(110.0, 70.0, SURFACE), ClickOutcome::Ignored);
        assert!(s.graph().is_empty());
    }

    #[test]
    fn background_click_ignored_when_idle() {
        let mut s = ready_session();
        s.set_mode(PlacementMode::Idle);
        assert_eq!(s.pointer_down(110.0, 70.0, SURFACE), ClickOutcome::Ignored);
        assert!(s.history().is_empty());
    }

    #[test]
    fn click_outside_surface_ignored() {
        let mut s = ready_session();
        assert_eq!(s.pointer_down(5.0, 5.0, SURFACE), ClickOutcome::Ignored);
    }

    #[test]
    fn node_click_does_not_place() {
        let mut s = ready_session();
        let ClickOutcome::Placed(a) = s.pointer_down(110.0, 70.0, SURFACE) else {
            panic!("expected placement");
        };
        // Same spot again lands on the node.
        assert_eq!(s.pointer_down(111.0, 70.0, SURFACE), ClickOutcome::Armed(a.id));
        assert_eq!(s.graph().node_count(), 1);
    }

    #[test]
    fn node_click_works_when_idle() {
        let mut s = ready_session();
        let a = s.add_node(200, 100);
        s.set_mode(PlacementMode::Idle);
        assert_eq!(s.pointer_down(110.0, 70.0, SURFACE), ClickOutcome::Armed(a.id));
    }

    #[test]
    fn two_node_clicks_connect() {
        let mut s = ready_session();
        let a = s.add_node(20, 20);
        let b = s.add_node(300, 150);
        s.click_node(a.id);
        let out = s.click_node(b.id);
        assert_eq!(out, ClickOutcome::Connected(Edge::new(a.id, b.id)));
        assert_eq!(s.armed(), None);
        assert_eq!(s.history().len(), 3);
    }

    #[test]
    fn undo_of_armed_node_releases_selection() {
        let mut s = ready_session();
        let a = s.add_node(0, 0);
        let b = s.add_node(50, 50);
        s.click_node(b.id);
        assert_eq!(s.armed(), Some(b.id));

        s.undo();
        assert_eq!(s.armed(), None);
        // The next click arms rather than connecting to a ghost.
        assert_eq!(s.click_node(a.id), ClickOutcome::Armed(a.id));
        assert_eq!(s.graph().edge_count(), 0);
    }

    #[test]
    fn undo_on_empty_is_noop() {
        let mut s = ready_session();
        assert_eq!(s.undo(), None);
        assert!(s.graph().is_empty());
    }

    #[test]
    fn clear_resets_everything() {
        let mut s = ready_session();
        let a = s.add_node(1, 1);
        s.click_node(a.id);
        s.clear();
        assert!(s.graph().is_empty());
        assert!(s.history().is_empty());
        assert_eq!(s.armed(), None);
        s.clear();
        assert!(s.graph().is_empty());
        assert!(s.history().is_empty());
    }

    #[test]
    fn failed_load_leaves_state() {
        let mut s = ready_session();
        s.add_node(7, 7);
        let before = s.graph().clone();
        assert!(matches!(
            s.load(br#"{"nodes":[]}"#),
            Err(Error::MalformedDocument(_))
        ));
        assert_eq!(s.graph(), &before);
        assert_eq!(s.history().len(), 1);
    }

    #[test]
    fn load_resets_history() {
        let mut s = ready_session();
        s.add_node(7, 7);
        s.load(br#"{"nodes":[{"id":"n1","x":3,"y":4}],"edges":[]}"#)
            .unwrap();
        assert_eq!(s.graph().node_count(), 1);
        assert!(s.history().is_empty());
        assert_eq!(s.undo(), None);
        assert_eq!(s.graph().node_count(), 1);
    }

    #[test]
    fn shortcuts_route_through_handle_input() {
        let mut s = ready_session();
        s.add_node(1, 1);
        let cmd = Modifiers {
            ctrl: true,
            ..Modifiers::default()
        };
        let out = s.handle_input(&InputEvent::key("z", cmd));
        assert_eq!(
            out,
            InputOutcome::Shortcut {
                action: ShortcutAction::Undo,
                changed: true
            }
        );
        assert!(s.graph().is_empty());

        let out = s.handle_input(&InputEvent::key("p", Modifiers::default()));
        assert!(matches!(out, InputOutcome::Shortcut { changed: true, .. }));
        assert_eq!(s.mode(), PlacementMode::Idle);

        assert_eq!(
            s.handle_input(&InputEvent::key("q", Modifiers::default())),
            InputOutcome::Unbound
        );
    }

    #[test]
    fn start_placing_from_config() {
        let config = EditorConfig {
            start_placing: true,
            ..EditorConfig::default()
        };
        assert_eq!(EditorSession::new(config).mode(), PlacementMode::Placing);
    }
}
