use serde::{Deserialize, Serialize};

use printkit_core::{AssetRef, Point, Size};

use super::ObjectCommon;

/// A placed image element.
///
/// The object holds a reference to its pixel source, never the pixels
/// themselves; resolution happens through the asset store and the
/// underlying data is never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageObject {
    #[serde(flatten)]
    pub common: ObjectCommon,
    pub source_ref: AssetRef,
    pub natural_width: u32,
    pub natural_height: u32,
}

impl ImageObject {
    /// Natural width/height ratio, used for aspect-preserving scaling.
    /// Degenerate sources report 1.0.
    pub fn aspect_ratio(&self) -> f64 {
        if self.natural_height == 0 {
            1.0
        } else {
            self.natural_width as f64 / self.natural_height as f64
        }
    }

    /// Display size that fits the natural aspect ratio into `max_edge`.
    pub fn fit_size(&self, max_edge: f64) -> Size {
        let ratio = self.aspect_ratio();
        if ratio >= 1.0 {
            Size::new(max_edge, max_edge / ratio)
        } else {
            Size::new(max_edge * ratio, max_edge)
        }
    }
}

/// Initial properties for image creation. A `position` of `None` centers
/// the object inside the view's printable boundary; a `size` of `None`
/// uses the natural dimensions.
#[derive(Debug, Clone, Default)]
pub struct ImageSpec {
    pub position: Option<Point>,
    pub size: Option<Size>,
    /// Natural dimensions as reported by the host, used before the asset
    /// resolves. Decoding overwrites them with the real values.
    pub natural_size: Option<(u32, u32)>,
    pub z_index: i32,
}

impl ImageObject {
    pub(crate) fn from_spec(
        spec: &ImageSpec,
        source_ref: AssetRef,
        position: Point,
        size: Size,
    ) -> Self {
        let (natural_width, natural_height) = spec
            .natural_size
            .unwrap_or((size.width.round() as u32, size.height.round() as u32));
        let mut common = ObjectCommon::new(position, size);
        common.z_index = spec.z_index;
        Self {
            common,
            source_ref,
            natural_width,
            natural_height,
        }
    }
}
