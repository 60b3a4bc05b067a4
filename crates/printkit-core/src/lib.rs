//! # PrintKit Core
//!
//! Shared types, traits, and utilities for the PrintKit design engine:
//!
//! - **Errors**: the [`DesignError`] taxonomy used by every layer
//! - **Geometry**: points, sizes, rectangles, and colors in display space
//! - **Views**: the four physical product facings ([`ViewId`])
//! - **Assets**: opaque pixel-source references ([`AssetRef`])
//! - **Catalog**: the `(product, view)` printable-boundary lookup table
//! - **Events**: re-render notifications from the model to the host UI
//!
//! The catalog is the boundary provider of the engine: a pure,
//! data-driven table with a documented fallback for unknown products, so
//! product onboarding is a data change rather than a code change.

pub mod asset;
pub mod catalog;
pub mod error;
pub mod events;
pub mod geometry;
pub mod view;

pub use asset::AssetRef;
pub use catalog::{
    CatalogConfig, ProductCatalog, ProductConfig, ViewTemplate, DEFAULT_BOUNDARY, DEFAULT_CANVAS,
};
pub use error::{DesignError, Result};
pub use events::{DesignEvent, EventBus, SubscriptionId};
pub use geometry::{normalize_degrees, Color, Point, Rect, Size, Vec2};
pub use view::ViewId;
