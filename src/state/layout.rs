//! Panel layout preference

use serde::{Deserialize, Serialize};

/// Screen edge the panel docks to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PanelSide {
    Left,
    Right,
}

impl PanelSide {
    /// The opposite side
    pub fn toggled(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// The persisted form of this side
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
        }
    }

    /// Parse a persisted value; anything other than "right" falls back to left
    pub fn from_persisted(value: &str) -> Self {
        if value == "right" {
            Self::Right
        } else {
            Self::Left
        }
    }
}

/// Layout preference - docked side plus an optional CSS width.
///
/// The width is an opaque CSS length string chosen by the client during
/// drag-resize; the server stores it verbatim.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutState {
    pub side: PanelSide,
    pub width: Option<String>,
}

impl LayoutState {
    /// Default layout - docked left, no explicit width
    pub fn new() -> Self {
        Self {
            side: PanelSide::Left,
            width: None,
        }
    }

    /// Flip the docked side, returning the new side
    pub fn toggle_side(&mut self) -> PanelSide {
        self.side = self.side.toggled();
        self.side
    }
}

impl Default for LayoutState {
    fn default() -> Self {
        Self::new()
    }
}
