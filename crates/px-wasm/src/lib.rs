//! WASM bridge for Pixgraph: exposes the annotation session to JavaScript.
//!
//! Compiled via `wasm-pack build --target web`. The page owns the pan/zoom
//! viewport, drawing and file dialogs; this crate owns the graph. Every
//! pointer call passes the background image's live `getBoundingClientRect()`
//! so clicks map to the same image pixel at any zoom.

use px_core::coords::{ImageSize, ScreenRect};
use px_core::document;
use px_editor::config::EditorConfig;
use px_editor::input::Modifiers;
use px_editor::session::{ClickOutcome, EditorSession};
use px_editor::shortcuts::ShortcutMap;
use px_editor::tools::PlacementMode;
use serde::Serialize;
use wasm_bindgen::prelude::*;
use web_sys::{DomRect, HtmlImageElement};

/// The main WASM-facing editor controller.
///
/// All interaction from the page goes through this struct.
#[wasm_bindgen]
pub struct PxCanvas {
    session: EditorSession,
}

/// JSON shape returned from pointer calls.
#[derive(Serialize)]
struct ClickReport<'a> {
    outcome: &'a str,
    changed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    node: Option<px_core::Node>,
    #[serde(skip_serializing_if = "Option::is_none")]
    edge: Option<px_core::Edge>,
    /// Node currently armed for edge completion, or `null`.
    armed: Option<String>,
}

#[wasm_bindgen]
impl PxCanvas {
    /// Create a controller. `config_json` may be empty; an invalid config is
    /// reported to the console and replaced by the defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: &str) -> Self {
        init_logging();

        let config = if config_json.trim().is_empty() {
            EditorConfig::default()
        } else {
            EditorConfig::from_json(config_json).unwrap_or_else(|e| {
                log::warn!("{e}; using default editor config");
                EditorConfig::default()
            })
        };

        Self {
            session: EditorSession::new(config),
        }
    }

    // ─── Surface ─────────────────────────────────────────────────────────

    /// Signal that the background image has loaded with this natural size.
    pub fn surface_loaded(&mut self, natural_width: u32, natural_height: u32) {
        self.session
            .surface_loaded(ImageSize::new(natural_width, natural_height));
    }

    /// Read the natural size straight from an `<img>`. Returns `false` if
    /// the image hasn't finished decoding yet.
    pub fn attach_image(&mut self, img: &HtmlImageElement) -> bool {
        if !img.complete() || img.natural_width() == 0 || img.natural_height() == 0 {
            return false;
        }
        self.surface_loaded(img.natural_width(), img.natural_height());
        true
    }

    /// Whether the natural size is known (clicks are refused until it is).
    pub fn is_ready(&self) -> bool {
        self.session.natural_size().is_some()
    }

    // ─── Pointer ─────────────────────────────────────────────────────────

    /// Handle a pointer press. `rect` is the image's current bounding rect.
    /// Returns a JSON report:
    /// `{"outcome":"placed","changed":true,"node":{...},"armed":null}`
    pub fn pointer_down(&mut self, x: f64, y: f64, rect: &DomRect) -> String {
        self.pointer_down_in(x, y, rect.left(), rect.top(), rect.width(), rect.height())
    }

    /// `pointer_down` with the rectangle passed as plain numbers.
    pub fn pointer_down_in(
        &mut self,
        x: f64,
        y: f64,
        left: f64,
        top: f64,
        width: f64,
        height: f64,
    ) -> String {
        let rect = ScreenRect::new(left, top, width, height);
        let outcome = self.session.pointer_down(x, y, rect);
        self.report(outcome)
    }

    /// Click a node directly by ID (e.g. from the host's own hit testing).
    pub fn click_node(&mut self, node_id: &str) -> String {
        let outcome = self.session.click_node(px_core::NodeId::intern(node_id));
        self.report(outcome)
    }

    // ─── Controls ────────────────────────────────────────────────────────

    /// Toggle placement mode. Returns the new mode name.
    pub fn toggle_placement(&mut self) -> String {
        self.session.toggle_placement().name().to_string()
    }

    pub fn get_mode(&self) -> String {
        self.session.mode().name().to_string()
    }

    /// Set the mode by name (`"idle"` or `"placing"`). Unknown names select
    /// `idle`. Returns the resulting mode name.
    pub fn set_mode(&mut self, name: &str) -> String {
        self.session.set_mode(PlacementMode::from_name(name));
        self.get_mode()
    }

    /// Undo the last action. Returns `true` if anything was undone.
    pub fn undo(&mut self) -> bool {
        self.session.undo().is_some()
    }

    pub fn can_undo(&self) -> bool {
        self.session.history().can_undo()
    }

    /// Clear all nodes, edges and history.
    pub fn clear(&mut self) {
        self.session.clear();
    }

    /// Get the armed node ID, or empty string if none.
    pub fn selected_id(&self) -> String {
        self.session
            .armed()
            .map(|id| id.as_str().to_string())
            .unwrap_or_default()
    }

    // ─── Persistence ─────────────────────────────────────────────────────

    /// Encode the document for download. Empty on encoder failure.
    pub fn save(&self) -> Vec<u8> {
        self.session.save().unwrap_or_else(|e| {
            log::error!("save failed: {e}");
            Vec::new()
        })
    }

    /// File name to offer in the download.
    pub fn suggested_name(&self) -> String {
        self.session.suggested_name().to_string()
    }

    /// Replace the graph with a loaded document.
    /// Returns `{"ok":true}` or `{"ok":false,"error":"..."}`.
    pub fn load(&mut self, bytes: &[u8]) -> String {
        match self.session.load(bytes) {
            Ok(()) => ok_json(),
            Err(e) => error_json(&e.to_string()),
        }
    }

    /// The current document as JSON text, for drawing.
    pub fn document_json(&self) -> String {
        document::to_json(self.session.graph(), false)
            .unwrap_or_else(|e| error_json(&e.to_string()))
    }

    /// Undo history as a JSON array, oldest first.
    pub fn history_json(&self) -> String {
        serde_json::to_string(self.session.history().entries())
            .unwrap_or_else(|_| "[]".to_string())
    }

    // ─── Keyboard Shortcut API ───────────────────────────────────────────

    /// Handle a keyboard event. Returns a JSON string:
    /// `{"changed":bool,"action":"<action_name>","mode":"<mode_name>"}`.
    /// `save` and `open` come back with `changed:false` for the page to act on.
    pub fn handle_key(
        &mut self,
        key: &str,
        ctrl: bool,
        shift: bool,
        alt: bool,
        meta: bool,
    ) -> String {
        let mods = Modifiers {
            shift,
            ctrl,
            alt,
            meta,
        };
        let (action, changed) = match ShortcutMap::resolve(key, mods) {
            Some(action) => (action.name(), self.session.dispatch(action)),
            None => ("none", false),
        };
        serde_json::json!({
            "changed": changed,
            "action": action,
            "mode": self.session.mode().name(),
        })
        .to_string()
    }
}

impl PxCanvas {
    fn report(&self, outcome: ClickOutcome) -> String {
        let (node, edge) = match outcome {
            ClickOutcome::Placed(node) => (Some(node), None),
            ClickOutcome::Connected(edge) => (None, Some(edge)),
            _ => (None, None),
        };
        let report = ClickReport {
            outcome: outcome.name(),
            changed: outcome.mutated(),
            node,
            edge,
            armed: self.session.armed().map(|id| id.as_str().to_string()),
        };
        serde_json::to_string(&report).unwrap_or_else(|e| error_json(&e.to_string()))
    }
}

fn ok_json() -> String {
    r#"{"ok":true}"#.to_string()
}

fn error_json(message: &str) -> String {
    serde_json::json!({ "ok": false, "error": message }).to_string()
}

// ─── Logging & panic hook for WASM debugging ─────────────────────────────

fn init_logging() {
    #[cfg(target_arch = "wasm32")]
    {
        use std::sync::Once;
        static INIT: Once = Once::new();
        INIT.call_once(|| {
            let _ = console_log::init_with_level(log::Level::Debug);
            std::panic::set_hook(Box::new(|info| {
                let msg = format!("PX WASM panic: {info}");
                web_sys::console::error_1(&msg.into());
            }));
        });
    }
}

// ─── Standalone validation (no canvas needed) ────────────────────────────

/// Validate a document. Returns JSON: `{"ok":true,"nodes":N,"edges":M}`
/// or `{"ok":false,"error":"..."}`.
#[wasm_bindgen]
pub fn validate(bytes: &[u8]) -> String {
    match document::deserialize(bytes) {
        Ok(graph) => serde_json::json!({
            "ok": true,
            "nodes": graph.node_count(),
            "edges": graph.edge_count(),
        })
        .to_string(),
        Err(e) => error_json(&e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::Value;

    fn ready_canvas() -> PxCanvas {
        let mut canvas = PxCanvas::new(r#"{"start_placing":true}"#);
        canvas.surface_loaded(400, 200);
        canvas
    }

    fn parse(json: &str) -> Value {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn pointer_report_for_placement() {
        let mut canvas = ready_canvas();
        let report = parse(&canvas.pointer_down_in(110.0, 70.0, 10.0, 20.0, 200.0, 100.0));
        assert_eq!(report["outcome"], "placed");
        assert_eq!(report["changed"], true);
        assert_eq!(report["node"]["id"], "n1");
        assert_eq!(report["node"]["x"], 200);
        assert_eq!(report["node"]["y"], 100);
        assert_eq!(report["armed"], Value::Null);
        assert!(report.get("edge").is_none());
    }

    #[test]
    fn pointer_ignored_before_ready() {
        let mut canvas = PxCanvas::new("");
        assert!(!canvas.is_ready());
        canvas.toggle_placement();
        let report = parse(&canvas.pointer_down_in(5.0, 5.0, 0.0, 0.0, 100.0, 100.0));
        assert_eq!(report["outcome"], "ignored");
        assert_eq!(report["changed"], false);
    }

    #[test]
    fn connect_via_node_clicks() {
        let mut canvas = ready_canvas();
        canvas.pointer_down_in(20.0, 20.0, 0.0, 0.0, 400.0, 200.0);
        canvas.pointer_down_in(200.0, 100.0, 0.0, 0.0, 400.0, 200.0);

        let armed = parse(&canvas.click_node("n1"));
        assert_eq!(armed["outcome"], "armed");
        assert_eq!(armed["armed"], "n1");
        assert_eq!(canvas.selected_id(), "n1");

        let done = parse(&canvas.click_node("n2"));
        assert_eq!(done["outcome"], "connected");
        assert_eq!(done["edge"]["from"], "n1");
        assert_eq!(done["edge"]["to"], "n2");
        assert_eq!(canvas.selected_id(), "");
    }

    #[test]
    fn save_load_and_validate() {
        let mut canvas = ready_canvas();
        canvas.pointer_down_in(50.0, 50.0, 0.0, 0.0, 400.0, 200.0);
        let bytes = canvas.save();
        assert_eq!(parse(&validate(&bytes))["nodes"], 1);

        let mut other = PxCanvas::new("");
        assert_eq!(other.load(&bytes), r#"{"ok":true}"#);
        assert_eq!(other.document_json(), canvas.document_json());
        assert_eq!(other.suggested_name(), "graph.json");
    }

    #[test]
    fn load_failure_reports_error() {
        let mut canvas = ready_canvas();
        canvas.pointer_down_in(50.0, 50.0, 0.0, 0.0, 400.0, 200.0);
        let before = canvas.document_json();

        let result = parse(&canvas.load(br#"{"nodes":[]}"#));
        assert_eq!(result["ok"], false);
        assert!(result["error"].as_str().unwrap().contains("malformed"));
        assert_eq!(canvas.document_json(), before);
    }

    #[test]
    fn keys_toggle_undo_and_defer_save() {
        let mut canvas = ready_canvas();
        canvas.pointer_down_in(50.0, 50.0, 0.0, 0.0, 400.0, 200.0);
        assert_eq!(parse(&canvas.history_json()).as_array().unwrap().len(), 1);

        let undo = parse(&canvas.handle_key("z", true, false, false, false));
        assert_eq!(undo["action"], "undo");
        assert_eq!(undo["changed"], true);
        assert!(!canvas.can_undo());

        let save = parse(&canvas.handle_key("s", false, false, false, true));
        assert_eq!(save["action"], "save");
        assert_eq!(save["changed"], false);

        let toggle = parse(&canvas.handle_key("p", false, false, false, false));
        assert_eq!(toggle["mode"], "idle");
        assert_eq!(canvas.get_mode(), "idle");
    }

    #[test]
    fn set_mode_by_name() {
        let mut canvas = PxCanvas::new("");
        assert_eq!(canvas.set_mode("placing"), "placing");
        canvas.surface_loaded(100, 100);
        let report = parse(&canvas.pointer_down_in(10.0, 10.0, 0.0, 0.0, 100.0, 100.0));
        assert_eq!(report["outcome"], "placed");
        assert_eq!(canvas.set_mode("lasso"), "idle");
    }

    #[test]
    fn invalid_config_falls_back() {
        let canvas = PxCanvas::new(r#"{"hit_radius":-4}"#);
        assert_eq!(canvas.get_mode(), "idle");
        assert_eq!(canvas.suggested_name(), "graph.json");
    }
}
