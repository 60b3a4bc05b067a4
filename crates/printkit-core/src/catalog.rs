//! Product catalog: the printable-boundary and base-image lookup table.
//!
//! Every `(product type, view)` pair resolves to a [`ViewTemplate`]
//! holding the display canvas size, the printable boundary, and the base
//! product photo for that view. The table is data: built-in defaults are
//! installed at construction and a host can overlay its own products from
//! a JSON document, so adding a product type is a data change rather than
//! a code change.
//!
//! Lookups are pure and total. Unknown products or views fall back to
//! [`ViewTemplate::fallback`] instead of failing, favoring permissive
//! rendering over hard errors for unrecognized templates.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::asset::AssetRef;
use crate::geometry::{Rect, Size};
use crate::view::ViewId;

/// Canvas size used when a product is not in the table.
pub const DEFAULT_CANVAS: Size = Size {
    width: 600.0,
    height: 600.0,
};

/// Printable boundary used when a product is not in the table.
pub const DEFAULT_BOUNDARY: Rect = Rect {
    left: 150.0,
    top: 150.0,
    width: 300.0,
    height: 300.0,
};

/// Per-(product, view) template resolved by the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewTemplate {
    /// Display resolution of the view at 1x.
    pub canvas: Size,
    /// Printable area within the canvas.
    pub boundary: Rect,
    /// Base product photo composited under the design, if any.
    #[serde(default)]
    pub base_image: Option<AssetRef>,
}

impl ViewTemplate {
    /// The documented fallback template for unknown combinations.
    pub fn fallback() -> Self {
        Self {
            canvas: DEFAULT_CANVAS,
            boundary: DEFAULT_BOUNDARY,
            base_image: None,
        }
    }
}

/// JSON overlay format: one product entry keyed by product type, holding
/// per-view templates keyed by view name.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogConfig {
    pub products: HashMap<String, ProductConfig>,
}

/// Per-product section of [`CatalogConfig`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductConfig {
    pub views: HashMap<ViewId, ViewTemplate>,
}

/// Lookup table from `(product type, view)` to [`ViewTemplate`].
#[derive(Debug, Clone)]
pub struct ProductCatalog {
    table: HashMap<(String, ViewId), ViewTemplate>,
}

impl ProductCatalog {
    /// Creates a catalog holding only the built-in product set.
    pub fn new() -> Self {
        let mut catalog = Self {
            table: HashMap::new(),
        };
        catalog.install_builtins();
        catalog
    }

    /// Creates an empty catalog; every lookup falls back.
    pub fn empty() -> Self {
        Self {
            table: HashMap::new(),
        }
    }

    /// Parses a JSON overlay and merges it over the built-ins.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        let config: CatalogConfig = serde_json::from_str(json)?;
        let mut catalog = Self::new();
        catalog.merge(config);
        Ok(catalog)
    }

    /// Overlays host-supplied products; existing entries are replaced.
    pub fn merge(&mut self, config: CatalogConfig) {
        for (product, product_config) in config.products {
            for (view, template) in product_config.views {
                self.table.insert((product.clone(), view), template);
            }
        }
    }

    /// Registers or replaces a single template.
    pub fn insert(&mut self, product: impl Into<String>, view: ViewId, template: ViewTemplate) {
        self.table.insert((product.into(), view), template);
    }

    /// Resolves the template for a product view, falling back to the
    /// documented default for unknown combinations.
    pub fn template(&self, product: &str, view: ViewId) -> ViewTemplate {
        match self.table.get(&(product.to_string(), view)) {
            Some(template) => template.clone(),
            None => {
                debug!(product, view = %view, "unknown product view, using fallback template");
                ViewTemplate::fallback()
            }
        }
    }

    /// Resolves the printable boundary for a product view.
    pub fn boundary(&self, product: &str, view: ViewId) -> Rect {
        self.template(product, view).boundary
    }

    /// Resolves the base product photo for a product view.
    pub fn base_image(&self, product: &str, view: ViewId) -> Option<AssetRef> {
        self.template(product, view).base_image
    }

    /// Whether the product has at least one explicit view entry.
    pub fn knows_product(&self, product: &str) -> bool {
        self.table.keys().any(|(p, _)| p == product)
    }

    /// Product types with explicit entries, sorted.
    pub fn product_types(&self) -> Vec<String> {
        let mut out: Vec<String> = self
            .table
            .keys()
            .map(|(p, _)| p.clone())
            .collect::<std::collections::HashSet<_>>()
            .into_iter()
            .collect();
        out.sort();
        out
    }

    fn install_builtins(&mut self) {
        let entry = |canvas: Size, boundary: Rect| ViewTemplate {
            canvas,
            boundary,
            base_image: None,
        };

        // Apparel: all four views share a canvas, side views print smaller.
        let shirt_canvas = Size::new(600.0, 700.0);
        let shirt_print = Rect::new(150.0, 120.0, 300.0, 400.0);
        let shirt_side = Rect::new(225.0, 200.0, 150.0, 200.0);
        for product in ["tshirt", "hoodie"] {
            self.insert(product, ViewId::Front, entry(shirt_canvas, shirt_print));
            self.insert(product, ViewId::Back, entry(shirt_canvas, shirt_print));
            self.insert(product, ViewId::Left, entry(shirt_canvas, shirt_side));
            self.insert(product, ViewId::Right, entry(shirt_canvas, shirt_side));
        }

        // Mug: the front is the printable wrap, sides are narrow strips.
        let mug_canvas = Size::new(800.0, 400.0);
        self.insert(
            "mug",
            ViewId::Front,
            entry(mug_canvas, Rect::new(100.0, 60.0, 600.0, 280.0)),
        );
        self.insert(
            "mug",
            ViewId::Back,
            entry(mug_canvas, Rect::new(100.0, 60.0, 600.0, 280.0)),
        );
        self.insert(
            "mug",
            ViewId::Left,
            entry(mug_canvas, Rect::new(300.0, 100.0, 200.0, 200.0)),
        );
        self.insert(
            "mug",
            ViewId::Right,
            entry(mug_canvas, Rect::new(300.0, 100.0, 200.0, 200.0)),
        );

        // Cap: small crown panel front/back, tiny side panels.
        let cap_canvas = Size::new(500.0, 400.0);
        self.insert(
            "cap",
            ViewId::Front,
            entry(cap_canvas, Rect::new(125.0, 80.0, 250.0, 150.0)),
        );
        self.insert(
            "cap",
            ViewId::Back,
            entry(cap_canvas, Rect::new(150.0, 100.0, 200.0, 120.0)),
        );
        self.insert(
            "cap",
            ViewId::Left,
            entry(cap_canvas, Rect::new(175.0, 120.0, 150.0, 100.0)),
        );
        self.insert(
            "cap",
            ViewId::Right,
            entry(cap_canvas, Rect::new(175.0, 120.0, 150.0, 100.0)),
        );

        // Tote bag: front/back only carry a meaningful print area.
        let tote_canvas = Size::new(550.0, 600.0);
        let tote_print = Rect::new(125.0, 150.0, 300.0, 300.0);
        self.insert("tote", ViewId::Front, entry(tote_canvas, tote_print));
        self.insert("tote", ViewId::Back, entry(tote_canvas, tote_print));
        self.insert(
            "tote",
            ViewId::Left,
            entry(tote_canvas, Rect::new(250.0, 200.0, 50.0, 200.0)),
        );
        self.insert(
            "tote",
            ViewId::Right,
            entry(tote_canvas, Rect::new(250.0, 200.0, 50.0, 200.0)),
        );
    }
}

impl Default for ProductCatalog {
    fn default() -> Self {
        Self::new()
    }
}
