//! Serialization and raster export.
//!
//! Implements the storage contract of the engine: a versioned,
//! round-trippable JSON design document (ephemeral state such as history
//! stacks and in-flight loads is never serialized) and per-view PNG
//! rasterization at a print-resolution multiplier.

use std::collections::BTreeMap;
use std::io::Cursor;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use printkit_core::{AssetRef, DesignError, DesignEvent, ProductCatalog, Result, ViewId};

use crate::renderer::{self, RenderOptions};
use crate::session::DesignSession;
use crate::view_state::ViewState;

/// Design document format version.
pub const DOCUMENT_FORMAT_VERSION: &str = "1.0";

/// Default print-export resolution multiplier.
pub const DEFAULT_EXPORT_MULTIPLIER: f64 = 2.0;

/// The serialized design: every view's objects and styles, nothing
/// ephemeral. Deserializing reconstructs a model that renders
/// identically.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DesignDocument {
    pub version: String,
    pub product_type: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub views: BTreeMap<ViewId, ViewState>,
}

impl DesignDocument {
    /// Serializes to pretty JSON.
    pub fn to_json(&self) -> anyhow::Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize design document")
    }

    /// Parses a JSON design document.
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        serde_json::from_str(json).context("Failed to parse design document")
    }

    /// Writes the document to a file.
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        let json = self.to_json()?;
        std::fs::write(path.as_ref(), json).context("Failed to write design document")?;
        Ok(())
    }

    /// Reads a document from a file.
    pub fn load_from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let content =
            std::fs::read_to_string(path.as_ref()).context("Failed to read design document")?;
        Self::from_json(&content)
    }
}

/// A per-object export failure. Recoverable: the remaining objects still
/// rasterize, and the source reference is kept for a retry.
#[derive(Debug, Clone)]
pub struct AssetFailure {
    pub object_id: Uuid,
    pub source: AssetRef,
    pub error: DesignError,
}

/// One exported view: lossless PNG bytes plus any per-object failures.
#[derive(Debug, Clone)]
pub struct RasterOutput {
    pub view_id: ViewId,
    pub width: u32,
    pub height: u32,
    pub png: Vec<u8>,
    pub failures: Vec<AssetFailure>,
}

/// Preview retained from the latest successful export, used as the
/// fallback when a later export cannot produce a surface.
#[derive(Debug, Clone)]
pub(crate) struct CachedPreview {
    pub png: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// Shared cancellation handle for long-running exports. Cloning shares
/// the flag.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    /// Creates an un-cancelled flag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Whether cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

impl DesignSession {
    /// Snapshots the session into a serializable document. Selection,
    /// history, and in-flight loads are excluded by construction.
    pub fn document(&self) -> DesignDocument {
        DesignDocument {
            version: DOCUMENT_FORMAT_VERSION.to_string(),
            product_type: self.product_type().to_string(),
            created_at: self.created_at,
            updated_at: self.updated_at,
            views: self.views().clone(),
        }
    }

    /// Serializes the current state to JSON.
    pub fn to_json(&self) -> anyhow::Result<String> {
        self.document().to_json()
    }

    /// Rebuilds a session from a stored document. History starts empty;
    /// undo does not reach across a save/load cycle.
    pub fn from_document(document: DesignDocument, catalog: ProductCatalog) -> Self {
        let mut session = DesignSession::new(document.product_type, catalog);
        session.set_views(document.views);
        session.created_at = document.created_at;
        session.updated_at = document.updated_at;
        session
    }

    /// Rasterizes a view at `multiplier` times display resolution,
    /// returning lossless PNG bytes. Unresolvable image assets are
    /// reported per object while the rest of the design still exports;
    /// a surface that cannot be produced at all falls back to the last
    /// cached preview, else the call fails with `ExportFailed`.
    pub fn rasterize(&mut self, view: ViewId, multiplier: f64) -> Result<RasterOutput> {
        self.rasterize_with(view, multiplier, None)
    }

    /// [`rasterize`](Self::rasterize) with a cancellation handle checked
    /// between objects. A cancelled export fails with `ExportFailed` and
    /// leaves no partial output (the preview cache keeps its prior
    /// contents).
    pub fn rasterize_with(
        &mut self,
        view: ViewId,
        multiplier: f64,
        cancel: Option<&CancelFlag>,
    ) -> Result<RasterOutput> {
        if !multiplier.is_finite() || multiplier < 1.0 {
            return Err(DesignError::invalid(
                "multiplier",
                format!("must be >= 1.0, got {multiplier}"),
            ));
        }

        let composite = self.composite(view);
        let rendered = renderer::render(
            &composite,
            self.assets(),
            multiplier,
            &RenderOptions::export(),
            cancel,
        );

        let (pixmap, failures) = match rendered {
            Ok(result) => result,
            Err(err) => {
                if cancel.is_some_and(|c| c.is_cancelled()) {
                    info!(view = %view, "export cancelled");
                    return Err(err);
                }
                return self.cached_fallback(view, err);
            }
        };

        let (width, height) = (pixmap.width(), pixmap.height());
        let png = encode_png(&pixmap)?;
        self.preview_cache.insert(
            view,
            CachedPreview {
                png: png.clone(),
                width,
                height,
            },
        );
        if !failures.is_empty() {
            warn!(view = %view, failed = failures.len(), "exported with unavailable assets");
        }
        self.events().publish(&DesignEvent::ViewExported { view });

        Ok(RasterOutput {
            view_id: view,
            width,
            height,
            png,
            failures,
        })
    }

    /// Exports every activated view.
    pub fn rasterize_all(&mut self, multiplier: f64) -> Result<BTreeMap<ViewId, RasterOutput>> {
        let views: Vec<ViewId> = self.views().keys().copied().collect();
        let mut out = BTreeMap::new();
        for view in views {
            out.insert(view, self.rasterize(view, multiplier)?);
        }
        Ok(out)
    }

    fn cached_fallback(&self, view: ViewId, err: DesignError) -> Result<RasterOutput> {
        match self.preview_cache.get(&view) {
            Some(cached) => {
                warn!(view = %view, error = %err, "export surface failed, serving cached preview");
                Ok(RasterOutput {
                    view_id: view,
                    width: cached.width,
                    height: cached.height,
                    png: cached.png.clone(),
                    failures: Vec::new(),
                })
            }
            None => Err(err),
        }
    }
}

fn encode_png(pixmap: &tiny_skia::Pixmap) -> Result<Vec<u8>> {
    let mut rgba = Vec::with_capacity(pixmap.pixels().len() * 4);
    for pixel in pixmap.pixels() {
        let c = pixel.demultiply();
        rgba.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
    }
    let img = image::RgbaImage::from_raw(pixmap.width(), pixmap.height(), rgba).ok_or_else(
        || DesignError::ExportFailed {
            reason: "pixel buffer size mismatch".to_string(),
        },
    )?;
    let mut bytes = Cursor::new(Vec::new());
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut bytes, image::ImageFormat::Png)
        .map_err(|err| DesignError::ExportFailed {
            reason: format!("png encoding: {err}"),
        })?;
    Ok(bytes.into_inner())
}
