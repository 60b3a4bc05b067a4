//! # PrintKit Designer
//!
//! The product design canvas engine: composes text and image elements
//! onto a product template (t-shirt, mug, cap, ...) across its physical
//! views, constrained to a per-view printable boundary, with undo/redo
//! history and raster export for fulfillment.
//!
//! ## Core Components
//!
//! ### Design Elements
//! - **Objects**: text and image elements with position, scale, rotation,
//!   opacity, paint order, and locking
//! - **Views**: front/back/left/right object sets with independent
//!   histories
//! - **Styles**: font family from a fixed set, bold/italic/underline, and
//!   straight/arc/circle text-path effects
//!
//! ### Engine Services
//! - **History/Undo-Redo**: per-view snapshot stacks with a documented
//!   depth cap
//! - **Assets**: host-resolved pixel sources with cancellable loads
//! - **Rendering**: tiny-skia composition shared by preview and export
//! - **Export**: round-trippable JSON documents and per-view PNG output
//!   at a print-resolution multiplier
//!
//! ## Architecture
//!
//! ```text
//! DesignSession (view controller + mutation surface)
//!   ├── ViewState (objects, per view)
//!   ├── HistoryStack (undo/redo, per view)
//!   ├── AssetStore (resolved pixels, in-flight loads)
//!   └── EventBus (re-render notifications)
//!
//! Renderer (tiny-skia)
//!   └── Composite (base photo + boundary + paint-ordered layers)
//!
//! Export
//!   ├── DesignDocument (versioned JSON)
//!   └── RasterOutput (PNG per view, per-object failures)
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use printkit_designer::{DesignSession, TextSpec};
//! use printkit_core::ViewId;
//!
//! let mut session = DesignSession::with_defaults("tshirt");
//! session.create_text(ViewId::Front, &TextSpec::new("HELLO"))?;
//! let output = session.rasterize(ViewId::Front, 2.0)?;
//! ```

pub mod assets;
pub mod effects;
pub mod export;
pub mod font_manager;
pub mod history;
pub mod model;
pub mod renderer;
pub mod session;
pub mod view_state;

pub use assets::{AssetStore, LoadTicket, Pixels};
pub use effects::{layout, measure, GlyphPlacement};
pub use export::{
    AssetFailure, CancelFlag, DesignDocument, RasterOutput, DEFAULT_EXPORT_MULTIPLIER,
    DOCUMENT_FORMAT_VERSION,
};
pub use font_manager::{FontFamily, ResolvedFont};
pub use history::{HistoryEntry, HistoryStack, MAX_HISTORY_DEPTH};
pub use model::{
    DesignObject, ImageObject, ImageSpec, ObjectCommon, StylePatch, TextEffect, TextObject,
    TextSpec, TransformPatch,
};
pub use renderer::{render, render_preview, RenderOptions};
pub use session::{Composite, DesignSession};
pub use view_state::ViewState;
