//! Tool kinds.
//!
//! Tool records are keyed by a `type` string. Known types map onto
//! [`ToolKind`]; anything else becomes [`ToolKind::Unknown`], which stays
//! placeable but renders a visible fallback label instead of nothing.

use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ToolKind {
    LayerSwitcher,
    Search,
    Print,
    Measure,
    Coordinates,
    InfoClick,
    Buffer,
    Draw,
    Edit,
    Export,
    Bookmarks,
    StreetView,
    Location,
    Information,
    DocumentHandler,
    Anchor,
    Routing,
    Unknown(String),
}

const KNOWN: &[ToolKind] = &[
    ToolKind::LayerSwitcher,
    ToolKind::Search,
    ToolKind::Print,
    ToolKind::Measure,
    ToolKind::Coordinates,
    ToolKind::InfoClick,
    ToolKind::Buffer,
    ToolKind::Draw,
    ToolKind::Edit,
    ToolKind::Export,
    ToolKind::Bookmarks,
    ToolKind::StreetView,
    ToolKind::Location,
    ToolKind::Information,
    ToolKind::DocumentHandler,
    ToolKind::Anchor,
    ToolKind::Routing,
];

impl ToolKind {
    pub fn known() -> &'static [ToolKind] {
        KNOWN
    }

    /// The `type` string used in persisted tool placements.
    pub fn type_name(&self) -> &str {
        match self {
            ToolKind::LayerSwitcher => "layerswitcher",
            ToolKind::Search => "search",
            ToolKind::Print => "print",
            ToolKind::Measure => "measure",
            ToolKind::Coordinates => "coordinates",
            ToolKind::InfoClick => "infoclick",
            ToolKind::Buffer => "buffer",
            ToolKind::Draw => "draw",
            ToolKind::Edit => "edit",
            ToolKind::Export => "export",
            ToolKind::Bookmarks => "bookmarks",
            ToolKind::StreetView => "streetview",
            ToolKind::Location => "location",
            ToolKind::Information => "information",
            ToolKind::DocumentHandler => "documenthandler",
            ToolKind::Anchor => "anchor",
            ToolKind::Routing => "routing",
            ToolKind::Unknown(raw) => raw,
        }
    }

    /// Human readable label; unknown types get a visible fallback.
    pub fn label(&self) -> String {
        let label = match self {
            ToolKind::LayerSwitcher => "Layer switcher",
            ToolKind::Search => "Search",
            ToolKind::Print => "Print",
            ToolKind::Measure => "Measure",
            ToolKind::Coordinates => "Coordinates",
            ToolKind::InfoClick => "Feature info",
            ToolKind::Buffer => "Buffer",
            ToolKind::Draw => "Draw",
            ToolKind::Edit => "Edit",
            ToolKind::Export => "Export",
            ToolKind::Bookmarks => "Bookmarks",
            ToolKind::StreetView => "Street view",
            ToolKind::Location => "My location",
            ToolKind::Information => "Information",
            ToolKind::DocumentHandler => "Documents",
            ToolKind::Anchor => "Share link",
            ToolKind::Routing => "Routing",
            ToolKind::Unknown(raw) => {
                return format!("not rendering from render function: {}", raw)
            }
        };
        label.to_string()
    }

    /// Slot a freshly added tool lands in when the caller does not name one.
    pub fn default_target(&self) -> Option<&'static str> {
        match self {
            ToolKind::LayerSwitcher | ToolKind::Search | ToolKind::Print => Some("toolbar"),
            ToolKind::Measure
            | ToolKind::Buffer
            | ToolKind::Draw
            | ToolKind::Edit
            | ToolKind::Export
            | ToolKind::Bookmarks
            | ToolKind::DocumentHandler
            | ToolKind::Routing => Some("left"),
            ToolKind::Coordinates | ToolKind::InfoClick | ToolKind::Information => Some("right"),
            ToolKind::StreetView | ToolKind::Location | ToolKind::Anchor => Some("control"),
            ToolKind::Unknown(_) => None,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, ToolKind::Unknown(_))
    }
}

impl FromStr for ToolKind {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        Ok(KNOWN
            .iter()
            .find(|kind| kind.type_name() == normalized)
            .cloned()
            .unwrap_or_else(|| ToolKind::Unknown(s.trim().to_string())))
    }
}

impl fmt::Display for ToolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}
