//! Resolved pixel data and in-flight asset loads.
//!
//! The engine never fetches bytes: the host resolves an [`AssetRef`] and
//! hands the encoded bytes back through a [`LoadTicket`]. Tickets are the
//! cancellation mechanism required by the session model — deleting an
//! object or clearing a view invalidates its ticket, and a completion
//! arriving for an invalidated ticket is dropped instead of overwriting
//! state that no longer wants it.

use std::collections::HashMap;

use tracing::debug;
use uuid::Uuid;

use printkit_core::{AssetRef, DesignError, Result};

/// Decoded RGBA pixel data (straight alpha, row-major).
#[derive(Debug, Clone, PartialEq)]
pub struct Pixels {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl Pixels {
    /// Builds a buffer from raw RGBA bytes. The byte length must be
    /// `width * height * 4`.
    pub fn from_rgba(width: u32, height: u32, rgba: Vec<u8>) -> Result<Self> {
        if rgba.len() != (width as usize) * (height as usize) * 4 {
            return Err(DesignError::invalid(
                "pixels",
                format!(
                    "buffer length {} does not match {}x{} RGBA",
                    rgba.len(),
                    width,
                    height
                ),
            ));
        }
        Ok(Self {
            width,
            height,
            rgba,
        })
    }
}

/// Handle for an in-flight asset load issued by [`AssetStore::begin_load`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTicket {
    pub id: Uuid,
    pub source: AssetRef,
}

/// Cache of decoded assets plus the registry of in-flight loads.
#[derive(Debug, Clone, Default)]
pub struct AssetStore {
    resolved: HashMap<AssetRef, Pixels>,
    pending: HashMap<Uuid, AssetRef>,
}

impl AssetStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Decoded pixels for a source, if resolution completed.
    pub fn get(&self, source: &AssetRef) -> Option<&Pixels> {
        self.resolved.get(source)
    }

    /// Whether a source has resolved pixels.
    pub fn is_resolved(&self, source: &AssetRef) -> bool {
        self.resolved.contains_key(source)
    }

    /// Stores already-decoded pixels for a source.
    pub fn insert_pixels(&mut self, source: AssetRef, pixels: Pixels) {
        self.resolved.insert(source, pixels);
    }

    /// Decodes encoded image bytes (PNG/JPEG/...) and stores the result.
    /// Returns the decoded dimensions.
    pub fn insert_bytes(&mut self, source: AssetRef, bytes: &[u8]) -> Result<(u32, u32)> {
        let pixels = decode(&source, bytes)?;
        let dims = (pixels.width, pixels.height);
        self.resolved.insert(source, pixels);
        Ok(dims)
    }

    /// Registers an in-flight load for a source. Inline sources resolve
    /// immediately from their own bytes and need no host round-trip.
    pub fn begin_load(&mut self, source: AssetRef) -> Result<LoadTicket> {
        if let AssetRef::Inline { bytes } = &source {
            let bytes = bytes.clone();
            self.insert_bytes(source.clone(), &bytes)?;
        }
        let ticket = LoadTicket {
            id: Uuid::new_v4(),
            source: source.clone(),
        };
        if !self.is_resolved(&source) {
            self.pending.insert(ticket.id, source);
        }
        Ok(ticket)
    }

    /// Completes a load with the host-fetched bytes. Returns `false`
    /// (dropping the bytes) when the ticket was cancelled or never
    /// issued; late arrivals must not overwrite state that dropped them.
    pub fn complete_load(&mut self, ticket: &LoadTicket, bytes: &[u8]) -> Result<bool> {
        let Some(source) = self.pending.remove(&ticket.id) else {
            debug!(ticket = %ticket.id, source = %ticket.source, "ignoring completion for cancelled load");
            return Ok(false);
        };
        self.insert_bytes(source, bytes)?;
        Ok(true)
    }

    /// Cancels an in-flight load by ticket id. Unknown ids are ignored.
    pub fn cancel(&mut self, ticket_id: Uuid) {
        if self.pending.remove(&ticket_id).is_some() {
            debug!(ticket = %ticket_id, "asset load cancelled");
        }
    }

    /// Whether a ticket is still waiting for completion.
    pub fn is_pending(&self, ticket_id: Uuid) -> bool {
        self.pending.contains_key(&ticket_id)
    }

    /// Number of in-flight loads.
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }
}

fn decode(source: &AssetRef, bytes: &[u8]) -> Result<Pixels> {
    let decoded = image::load_from_memory(bytes).map_err(|err| DesignError::AssetUnavailable {
        source: format!("{source}: {err}"),
    })?;
    let rgba = decoded.to_rgba8();
    let (width, height) = rgba.dimensions();
    Ok(Pixels {
        width,
        height,
        rgba: rgba.into_raw(),
    })
}
