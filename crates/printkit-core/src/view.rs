//! Physical product views.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One physical facing of a product. Each view carries its own background
/// image, printable boundary, object set, and history stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewId {
    Front,
    Back,
    Left,
    Right,
}

impl ViewId {
    /// All views, in display order.
    pub const ALL: [ViewId; 4] = [ViewId::Front, ViewId::Back, ViewId::Left, ViewId::Right];

    /// Lowercase name used in serialized documents and catalog config.
    pub fn as_str(&self) -> &'static str {
        match self {
            ViewId::Front => "front",
            ViewId::Back => "back",
            ViewId::Left => "left",
            ViewId::Right => "right",
        }
    }
}

impl fmt::Display for ViewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ViewId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "front" => Ok(ViewId::Front),
            "back" => Ok(ViewId::Back),
            "left" => Ok(ViewId::Left),
            "right" => Ok(ViewId::Right),
            other => Err(format!("unknown view: {other}")),
        }
    }
}
