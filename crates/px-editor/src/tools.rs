//! Placement mode.
//!
//! Background clicks only create nodes while the editor is `Placing`.
//! Node clicks go to the selection machine in either mode.

/// Whether a background click places a new node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlacementMode {
    #[default]
    Idle,
    Placing,
}

impl PlacementMode {
    /// Flip between `Idle` and `Placing`, returning the new mode.
    pub fn toggle(&mut self) -> Self {
        *self = match self {
            PlacementMode::Idle => PlacementMode::Placing,
            PlacementMode::Placing => PlacementMode::Idle,
        };
        *self
    }

    pub fn is_placing(&self) -> bool {
        matches!(self, PlacementMode::Placing)
    }

    pub fn name(&self) -> &'static str {
        match self {
            PlacementMode::Idle => "idle",
            PlacementMode::Placing => "placing",
        }
    }

    /// Parse a mode name. Unknown names fall back to `Idle`.
    pub fn from_name(name: &str) -> Self {
        match name {
            "placing" => PlacementMode::Placing,
            _ => PlacementMode::Idle,
        }
    }
}
