//! Opaque references to image pixel sources.
//!
//! The engine never fetches bytes itself: an `AssetRef` identifies a
//! source, and the host resolves it to pixel data through the asset store
//! contract. The engine only consumes decoded buffers and dimensions.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Opaque handle to pixel data: a remote URL, a local file, or inline
/// bytes already held by the host. Equality/hashing identify the source,
/// which keys the resolved-pixel cache.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum AssetRef {
    /// A remote resource the host fetches.
    Url { url: String },
    /// A file on the host filesystem.
    Path { path: PathBuf },
    /// Encoded image bytes (PNG/JPEG/...) held inline.
    Inline { bytes: Vec<u8> },
}

impl AssetRef {
    /// Creates a URL reference.
    pub fn url(url: impl Into<String>) -> Self {
        AssetRef::Url { url: url.into() }
    }

    /// Creates a file path reference.
    pub fn path(path: impl Into<PathBuf>) -> Self {
        AssetRef::Path { path: path.into() }
    }

    /// Creates an inline-bytes reference.
    pub fn inline(bytes: impl Into<Vec<u8>>) -> Self {
        AssetRef::Inline {
            bytes: bytes.into(),
        }
    }
}

impl fmt::Display for AssetRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetRef::Url { url } => write!(f, "url:{url}"),
            AssetRef::Path { path } => write!(f, "path:{}", path.display()),
            AssetRef::Inline { bytes } => write!(f, "inline:{} bytes", bytes.len()),
        }
    }
}
