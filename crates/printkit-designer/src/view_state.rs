//! Per-view object storage.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use printkit_core::{AssetRef, DesignError, Result, ViewId};

use crate::model::DesignObject;

/// The object set of one physical view.
///
/// `objects` is kept in insertion order; paint order is a separate,
/// derived ordering (stable sort by `z_index`, ties resolved by insertion
/// order). Cloning a `ViewState` is the history snapshot operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewState {
    pub view_id: ViewId,
    pub objects: Vec<DesignObject>,
    #[serde(default)]
    pub background_image_ref: Option<AssetRef>,
}

impl ViewState {
    /// Creates an empty view.
    pub fn new(view_id: ViewId) -> Self {
        Self {
            view_id,
            objects: Vec::new(),
            background_image_ref: None,
        }
    }

    /// Number of objects in the view.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Whether the view holds no objects.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Looks up an object by id.
    pub fn find(&self, id: Uuid) -> Option<&DesignObject> {
        self.objects.iter().find(|o| o.id() == id)
    }

    pub(crate) fn find_mut(&mut self, id: Uuid) -> Option<&mut DesignObject> {
        self.objects.iter_mut().find(|o| o.id() == id)
    }

    /// Looks up an object by id, reporting `NotFound` when missing.
    pub fn get(&self, id: Uuid) -> Result<&DesignObject> {
        self.find(id).ok_or(DesignError::NotFound { id: id.to_string() })
    }

    /// Appends an object, enforcing id uniqueness within the view.
    pub(crate) fn insert(&mut self, object: DesignObject) -> Result<()> {
        if self.find(object.id()).is_some() {
            return Err(DesignError::invalid(
                "id",
                format!("duplicate object id {} in view {}", object.id(), self.view_id),
            ));
        }
        self.objects.push(object);
        Ok(())
    }

    /// Removes an object by id, returning it.
    pub(crate) fn remove(&mut self, id: Uuid) -> Result<DesignObject> {
        let index = self
            .objects
            .iter()
            .position(|o| o.id() == id)
            .ok_or(DesignError::NotFound { id: id.to_string() })?;
        Ok(self.objects.remove(index))
    }

    /// Objects in paint order: stable sort by `z_index`, so equal keys
    /// keep insertion order.
    pub fn paint_order(&self) -> Vec<&DesignObject> {
        let mut ordered: Vec<&DesignObject> = self.objects.iter().collect();
        ordered.sort_by_key(|o| o.common().z_index);
        ordered
    }
}
