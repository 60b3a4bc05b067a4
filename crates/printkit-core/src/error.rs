//! Error handling for PrintKit
//!
//! Provides the error taxonomy shared by every layer of the engine:
//! - Object model errors (lookup/validation/locking)
//! - History errors (empty undo/redo stacks, non-fatal)
//! - Asset errors (per-object, recoverable)
//! - Export errors (fatal for the call, recoverable for the session)
//!
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

use crate::view::ViewId;

/// Design engine error type
///
/// Represents every failure the canvas engine can report. Structural
/// validation errors never partially apply: a rejected mutation leaves the
/// target object unchanged and pushes no history entry.
#[derive(Error, Debug, Clone)]
pub enum DesignError {
    /// No object with the given id exists in the view
    #[error("Object not found: {id}")]
    NotFound {
        /// The object id that failed to resolve.
        id: String,
    },

    /// The view has not been activated and holds no state
    #[error("Unknown view: {view}")]
    UnknownView {
        /// The view that failed to resolve.
        view: ViewId,
    },

    /// A value constraint was violated
    #[error("Invalid value for {field}: {reason}")]
    InvalidValue {
        /// The field that was rejected.
        field: String,
        /// Why the value was rejected.
        reason: String,
    },

    /// The object is locked and rejects mutations
    #[error("Object is locked: {id}")]
    ObjectLocked {
        /// The locked object's id.
        id: String,
    },

    /// Undo requested on an empty history stack
    #[error("Nothing to undo")]
    NothingToUndo,

    /// Redo requested on an empty redo stack
    #[error("Nothing to redo")]
    NothingToRedo,

    /// An image source could not be resolved to pixel data
    #[error("Asset unavailable: {source}")]
    AssetUnavailable {
        /// Description of the source reference that failed.
        source: String,
    },

    /// Export could not produce any output
    #[error("Export failed: {reason}")]
    ExportFailed {
        /// Why the export failed.
        reason: String,
    },

    /// Standard I/O error
    #[error("I/O error: {0}")]
    Io(String),
}

impl DesignError {
    /// Create an invalid-value error
    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        DesignError::InvalidValue {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Check if this error is a non-fatal history no-op
    pub fn is_history_noop(&self) -> bool {
        matches!(
            self,
            DesignError::NothingToUndo | DesignError::NothingToRedo
        )
    }

    /// Check if this is a per-object asset error
    pub fn is_asset_error(&self) -> bool {
        matches!(self, DesignError::AssetUnavailable { .. })
    }

    /// Check if this is an export error
    pub fn is_export_error(&self) -> bool {
        matches!(self, DesignError::ExportFailed { .. })
    }
}

impl From<std::io::Error> for DesignError {
    fn from(err: std::io::Error) -> Self {
        DesignError::Io(err.to_string())
    }
}

/// Result type using DesignError
pub type Result<T> = std::result::Result<T, DesignError>;
