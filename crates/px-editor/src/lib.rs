pub mod commands;
pub mod config;
pub mod input;
pub mod selection;
pub mod session;
pub mod shortcuts;
pub mod tools;

pub use commands::{HistoryEntry, UndoLog};
pub use config::EditorConfig;
pub use input::{InputEvent, Modifiers};
pub use selection::{Selection, SelectionOutcome};
pub use session::{ClickOutcome, EditorSession, InputOutcome};
pub use shortcuts::{ShortcutAction, ShortcutMap};
pub use tools::PlacementMode;
