//! The editing session: view controller and mutation surface.
//!
//! A [`DesignSession`] owns the per-view object sets, the per-view
//! history stacks, the asset store, and the event bus. Every mutation
//! funnels through one path that validates, applies, records exactly one
//! history entry, and publishes a re-render notification, so UI-level
//! callers cannot bypass validation or history.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use tracing::{debug, info};
use uuid::Uuid;

use printkit_core::{
    AssetRef, DesignError, DesignEvent, EventBus, Point, ProductCatalog, Rect, Result, Size,
    ViewId, ViewTemplate,
};

use crate::assets::{AssetStore, LoadTicket};
use crate::effects;
use crate::export::CachedPreview;
use crate::font_manager;
use crate::history::{HistoryEntry, HistoryStack};
use crate::model::{
    DesignObject, ImageObject, ImageSpec, StylePatch, TextObject, TextSpec, TransformPatch,
};
use crate::view_state::ViewState;

/// Offset applied to duplicated objects so the copy is visibly apart
/// from its original.
const DUPLICATE_OFFSET: f64 = 12.0;

/// Fallback display edge for images created before their asset resolves.
const DEFAULT_IMAGE_EDGE: f64 = 100.0;

/// One renderable layer stack: the product base photo, the printable
/// boundary, and the view's objects in paint order.
#[derive(Debug, Clone)]
pub struct Composite {
    pub view_id: ViewId,
    pub canvas: Size,
    pub background: Option<AssetRef>,
    pub boundary: Rect,
    pub layers: Vec<DesignObject>,
}

/// A single-user editing session over one product template.
pub struct DesignSession {
    product_type: String,
    catalog: ProductCatalog,
    active_view: ViewId,
    views: BTreeMap<ViewId, ViewState>,
    histories: HashMap<ViewId, HistoryStack>,
    assets: AssetStore,
    events: EventBus,
    /// PNG previews from the latest successful rasterization per view,
    /// kept as the export fallback.
    pub(crate) preview_cache: HashMap<ViewId, CachedPreview>,
    /// Maps object ids to their in-flight asset load tickets.
    loads: HashMap<Uuid, Uuid>,
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) updated_at: DateTime<Utc>,
}

impl DesignSession {
    /// Creates a session for a product type, starting on the front view.
    pub fn new(product_type: impl Into<String>, catalog: ProductCatalog) -> Self {
        let now = Utc::now();
        let mut session = Self {
            product_type: product_type.into(),
            catalog,
            active_view: ViewId::Front,
            views: BTreeMap::new(),
            histories: HashMap::new(),
            assets: AssetStore::new(),
            events: EventBus::new(),
            preview_cache: HashMap::new(),
            loads: HashMap::new(),
            created_at: now,
            updated_at: now,
        };
        session.ensure_view(ViewId::Front);
        session
    }

    /// Creates a session with the built-in product catalog.
    pub fn with_defaults(product_type: impl Into<String>) -> Self {
        Self::new(product_type, ProductCatalog::new())
    }

    /// The current product type.
    pub fn product_type(&self) -> &str {
        &self.product_type
    }

    /// The event bus carrying re-render notifications.
    pub fn events(&self) -> &EventBus {
        &self.events
    }

    /// The asset store.
    pub fn assets(&self) -> &AssetStore {
        &self.assets
    }

    /// Mutable access to the asset store, for hosts that pre-resolve
    /// pixels outside the ticket flow.
    pub fn assets_mut(&mut self) -> &mut AssetStore {
        &mut self.assets
    }

    // ---- view controller ----

    /// The currently active view.
    pub fn active_view(&self) -> ViewId {
        self.active_view
    }

    /// Activates a view, creating its state lazily on first activation.
    /// Loads still in flight for the departed view are cancelled; the
    /// host re-requests them when it returns.
    pub fn set_active_view(&mut self, view: ViewId) {
        if view == self.active_view {
            return;
        }
        let departed = self.active_view;
        self.cancel_view_loads(departed);
        self.ensure_view(view);
        self.active_view = view;
        debug!(from = %departed, to = %view, "active view changed");
        self.events.publish(&DesignEvent::ActiveViewChanged { view });
    }

    /// Re-resolves every view's boundary and base image for a new
    /// product type. Objects keep their absolute coordinates; anything
    /// now outside the new printable area shows up in
    /// [`outside_boundary`](Self::outside_boundary).
    pub fn switch_product_type(&mut self, product_type: impl Into<String>) {
        self.product_type = product_type.into();
        let product = self.product_type.clone();
        for (view, state) in self.views.iter_mut() {
            state.background_image_ref = self.catalog.base_image(&product, *view);
        }
        info!(product = %product, "product type switched");
        self.events
            .publish(&DesignEvent::ProductChanged { product });
    }

    /// Resolved template for a view under the current product type.
    pub fn template(&self, view: ViewId) -> ViewTemplate {
        self.catalog.template(&self.product_type, view)
    }

    /// Printable boundary for a view under the current product type.
    pub fn boundary(&self, view: ViewId) -> Rect {
        self.catalog.boundary(&self.product_type, view)
    }

    /// The renderable layer stack for a view: base photo, boundary, and
    /// objects in paint order.
    pub fn composite(&self, view: ViewId) -> Composite {
        let template = self.template(view);
        let (background, layers) = match self.views.get(&view) {
            Some(state) => (
                state.background_image_ref.clone(),
                state.paint_order().into_iter().cloned().collect(),
            ),
            None => (template.base_image.clone(), Vec::new()),
        };
        Composite {
            view_id: view,
            canvas: template.canvas,
            background,
            boundary: template.boundary,
            layers,
        }
    }

    /// Objects of a view in insertion order. Views never activated are
    /// empty.
    pub fn objects(&self, view: ViewId) -> &[DesignObject] {
        self.views
            .get(&view)
            .map(|state| state.objects.as_slice())
            .unwrap_or(&[])
    }

    /// Looks up an object snapshot.
    pub fn object(&self, view: ViewId, id: Uuid) -> Result<&DesignObject> {
        self.view_state(view)?.get(id)
    }

    /// Ids of objects whose bounding box extends past the printable
    /// boundary. Out-of-boundary placement is a soft constraint: the
    /// engine reports it for the host's warning indicator and never
    /// force-moves the object.
    pub fn outside_boundary(&self, view: ViewId) -> Vec<Uuid> {
        let boundary = self.boundary(view);
        self.objects(view)
            .iter()
            .filter(|o| !boundary.contains_rect(&o.bounds()))
            .map(|o| o.id())
            .collect()
    }

    // ---- object model operations ----

    /// Adds a text object. Without an explicit position the object is
    /// centered inside the view's printable boundary.
    pub fn create_text(&mut self, view: ViewId, spec: &TextSpec) -> Result<Uuid> {
        crate::model::validate_font_size(spec.font_size)?;
        spec.effect.validate()?;

        let font = font_manager::resolve(spec.font_family, spec.bold, spec.italic);
        let boundary = self.boundary(view);
        let position = spec.position.unwrap_or_else(|| boundary.center());

        let mut object = TextObject::from_spec(spec, position, Size::new(1.0, 1.0));
        object.common.size = effects::measure(&object, &font);
        let id = object.common.id;

        self.mutate(view, |state| state.insert(DesignObject::Text(object)))?;
        debug!(view = %view, id = %id, "text object created");
        Ok(id)
    }

    /// Adds an image object referencing a pixel source. Without an
    /// explicit position the object is centered inside the view's
    /// printable boundary; without an explicit size it uses the source's
    /// natural or already-resolved dimensions.
    pub fn create_image(
        &mut self,
        view: ViewId,
        source_ref: AssetRef,
        spec: &ImageSpec,
    ) -> Result<Uuid> {
        if let Some(size) = spec.size {
            crate::model::validate_size(size)?;
        }

        let resolved_dims = self
            .assets
            .get(&source_ref)
            .map(|p| (p.width, p.height))
            .or(spec.natural_size);
        let size = spec.size.unwrap_or_else(|| match resolved_dims {
            Some((w, h)) if w > 0 && h > 0 => Size::new(w as f64, h as f64),
            _ => Size::new(DEFAULT_IMAGE_EDGE, DEFAULT_IMAGE_EDGE),
        });

        let boundary = self.boundary(view);
        let position = spec.position.unwrap_or_else(|| boundary.center());

        let mut resolved_spec = spec.clone();
        resolved_spec.natural_size = resolved_dims.or(Some((
            size.width.round() as u32,
            size.height.round() as u32,
        )));

        let object = ImageObject::from_spec(&resolved_spec, source_ref, position, size);
        let id = object.common.id;

        self.mutate(view, |state| state.insert(DesignObject::Image(object)))?;
        debug!(view = %view, id = %id, "image object created");
        Ok(id)
    }

    /// Applies a transform patch. Rejected patches leave the object
    /// unchanged and record no history.
    pub fn update_transform(
        &mut self,
        view: ViewId,
        id: Uuid,
        patch: &TransformPatch,
    ) -> Result<DesignObject> {
        self.mutate(view, |state| {
            let object = locked_checked(state, id)?;
            patch.apply(object.common_mut())?;
            Ok(object.clone())
        })
    }

    /// Applies a style patch to a text object. Each field patches
    /// independently, so toggling one style never resets another.
    pub fn update_style(
        &mut self,
        view: ViewId,
        id: Uuid,
        patch: &StylePatch,
    ) -> Result<DesignObject> {
        self.mutate(view, |state| {
            let object = locked_checked(state, id)?;
            let text = object.as_text_mut().ok_or_else(|| {
                DesignError::invalid("style", "style patches apply to text objects only")
            })?;
            patch.apply(text)?;
            // Content and style changes move the measured extent.
            let font = font_manager::resolve(text.font_family, text.bold, text.italic);
            text.common.size = effects::measure(text, &font);
            Ok(DesignObject::Text(text.clone()))
        })
    }

    /// Moves an object to a new paint-order key.
    pub fn reorder(&mut self, view: ViewId, id: Uuid, z_index: i32) -> Result<DesignObject> {
        self.mutate(view, |state| {
            let object = locked_checked(state, id)?;
            object.common_mut().z_index = z_index;
            Ok(object.clone())
        })
    }

    /// Locks or unlocks an object. Unlocking is always permitted; the
    /// lock check applies to every other mutation.
    pub fn set_locked(&mut self, view: ViewId, id: Uuid, locked: bool) -> Result<DesignObject> {
        self.mutate(view, |state| {
            let object = state
                .find_mut(id)
                .ok_or(DesignError::NotFound { id: id.to_string() })?;
            object.common_mut().locked = locked;
            Ok(object.clone())
        })
    }

    /// Removes an object, cancelling any in-flight asset load for it.
    pub fn remove(&mut self, view: ViewId, id: Uuid) -> Result<DesignObject> {
        let removed = self.mutate(view, |state| {
            locked_checked(state, id)?;
            state.remove(id)
        })?;
        if let Some(ticket_id) = self.loads.remove(&id) {
            self.assets.cancel(ticket_id);
        }
        debug!(view = %view, id = %id, kind = removed.kind(), "object removed");
        Ok(removed)
    }

    /// Clones an object under a fresh id, slightly offset from the
    /// original.
    pub fn duplicate(&mut self, view: ViewId, id: Uuid) -> Result<Uuid> {
        self.mutate(view, |state| {
            let original = state.get(id)?;
            let mut copy = original.clone();
            let common = copy.common_mut();
            common.id = Uuid::new_v4();
            common.position =
                Point::new(common.position.x + DUPLICATE_OFFSET, common.position.y + DUPLICATE_OFFSET);
            common.locked = false;
            let new_id = common.id;
            state.insert(copy)?;
            Ok(new_id)
        })
    }

    /// Removes every object from a view. The background and the view's
    /// history survive; the clear itself is undoable.
    pub fn clear(&mut self, view: ViewId) -> Result<()> {
        let cleared: Vec<Uuid> = self.objects(view).iter().map(|o| o.id()).collect();
        self.mutate(view, |state| {
            state.objects.clear();
            Ok(())
        })?;
        for id in cleared {
            if let Some(ticket_id) = self.loads.remove(&id) {
                self.assets.cancel(ticket_id);
            }
        }
        Ok(())
    }

    // ---- history ----

    /// Undoes the latest mutation on the active view. Other views'
    /// stacks are untouched.
    pub fn undo(&mut self) -> Result<()> {
        let view = self.active_view;
        let restored = self
            .histories
            .entry(view)
            .or_default()
            .undo()?;
        self.views.insert(view, restored);
        self.updated_at = Utc::now();
        self.events.publish(&DesignEvent::ViewInvalidated { view });
        Ok(())
    }

    /// Re-applies the latest undone mutation on the active view.
    pub fn redo(&mut self) -> Result<()> {
        let view = self.active_view;
        let restored = self
            .histories
            .entry(view)
            .or_default()
            .redo()?;
        self.views.insert(view, restored);
        self.updated_at = Utc::now();
        self.events.publish(&DesignEvent::ViewInvalidated { view });
        Ok(())
    }

    /// Whether the active view has something to undo.
    pub fn can_undo(&self) -> bool {
        self.histories
            .get(&self.active_view)
            .is_some_and(|h| h.can_undo())
    }

    /// Whether the active view has something to redo.
    pub fn can_redo(&self) -> bool {
        self.histories
            .get(&self.active_view)
            .is_some_and(|h| h.can_redo())
    }

    /// Undo depth of a view's history stack.
    pub fn undo_depth(&self, view: ViewId) -> usize {
        self.histories.get(&view).map_or(0, |h| h.undo_depth())
    }

    // ---- asset loading ----

    /// Starts resolving an image object's pixel source. The returned
    /// ticket is handed back through
    /// [`complete_image_load`](Self::complete_image_load) once the host
    /// has the bytes.
    pub fn begin_image_load(&mut self, view: ViewId, id: Uuid) -> Result<LoadTicket> {
        let source = match self.view_state(view)?.get(id)? {
            DesignObject::Image(image) => image.source_ref.clone(),
            DesignObject::Text(_) => {
                return Err(DesignError::invalid("object", "text objects load no assets"))
            }
        };
        let ticket = self.assets.begin_load(source)?;
        self.loads.insert(id, ticket.id);
        Ok(ticket)
    }

    /// Completes an asset load with the host-fetched bytes. Stale
    /// tickets (cancelled by delete/clear/view switch) are dropped.
    /// Fresh pixels update the natural dimensions of every image object
    /// sharing the source, without touching history.
    pub fn complete_image_load(&mut self, ticket: &LoadTicket, bytes: &[u8]) -> Result<bool> {
        if !self.assets.complete_load(ticket, bytes)? {
            return Ok(false);
        }
        let (width, height) = match self.assets.get(&ticket.source) {
            Some(pixels) => (pixels.width, pixels.height),
            None => return Ok(false),
        };
        let mut touched = Vec::new();
        for (view, state) in self.views.iter_mut() {
            for object in state.objects.iter_mut() {
                if let DesignObject::Image(image) = object {
                    if image.source_ref == ticket.source {
                        image.natural_width = width;
                        image.natural_height = height;
                        touched.push(*view);
                    }
                }
            }
        }
        self.loads.retain(|_, t| *t != ticket.id);
        for view in touched {
            self.events.publish(&DesignEvent::AssetResolved { view });
        }
        Ok(true)
    }

    // ---- internals ----

    pub(crate) fn view_state(&self, view: ViewId) -> Result<&ViewState> {
        self.views
            .get(&view)
            .ok_or(DesignError::UnknownView { view })
    }

    pub(crate) fn views(&self) -> &BTreeMap<ViewId, ViewState> {
        &self.views
    }

    pub(crate) fn set_views(&mut self, views: BTreeMap<ViewId, ViewState>) {
        self.views = views;
        self.histories.clear();
        self.loads.clear();
    }

    fn ensure_view(&mut self, view: ViewId) {
        if !self.views.contains_key(&view) {
            let mut state = ViewState::new(view);
            state.background_image_ref = self.catalog.base_image(&self.product_type, view);
            self.views.insert(view, state);
            self.histories.insert(view, HistoryStack::new());
        }
    }

    fn cancel_view_loads(&mut self, view: ViewId) {
        let ids: Vec<Uuid> = self.objects(view).iter().map(|o| o.id()).collect();
        for id in ids {
            if let Some(ticket_id) = self.loads.remove(&id) {
                self.assets.cancel(ticket_id);
            }
        }
    }

    /// The single mutation path: snapshot, apply, record exactly one
    /// history entry, notify. A failing closure restores the snapshot so
    /// no mutation partially applies.
    fn mutate<T>(
        &mut self,
        view: ViewId,
        f: impl FnOnce(&mut ViewState) -> Result<T>,
    ) -> Result<T> {
        self.ensure_view(view);
        let state = self
            .views
            .get_mut(&view)
            .expect("view ensured above");
        let before = state.clone();

        match f(state) {
            Ok(value) => {
                let after = state.clone();
                self.histories
                    .entry(view)
                    .or_default()
                    .record(HistoryEntry::new(before, after));
                self.updated_at = Utc::now();
                self.events.publish(&DesignEvent::ViewInvalidated { view });
                Ok(value)
            }
            Err(err) => {
                *state = before;
                Err(err)
            }
        }
    }
}

/// Resolves an object for mutation, rejecting locked targets.
fn locked_checked(state: &mut ViewState, id: Uuid) -> Result<&mut DesignObject> {
    let object = state
        .find_mut(id)
        .ok_or(DesignError::NotFound { id: id.to_string() })?;
    if object.common().locked {
        return Err(DesignError::ObjectLocked { id: id.to_string() });
    }
    Ok(object)
}
