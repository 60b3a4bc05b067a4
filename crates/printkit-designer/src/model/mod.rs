//! The design object model: pure data describing placed elements.
//!
//! Objects are plain serde-able values with no rendering backend
//! attached; the renderer and the JSON codec both consume this
//! representation independently. All mutation goes through the session so
//! that every change is validated and historied uniformly.

mod image;
mod text;

pub use image::{ImageObject, ImageSpec};
pub use text::{TextEffect, TextObject, TextSpec};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use printkit_core::{normalize_degrees, Color, DesignError, Point, Rect, Result, Size, Vec2};

use crate::font_manager::FontFamily;

/// Transform state shared by every design object.
///
/// `position` is the object's center in display space. `size` is the
/// untransformed box; the effective footprint applies `scale` and
/// `rotation` on top.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectCommon {
    pub id: Uuid,
    pub position: Point,
    pub size: Size,
    /// Degrees, normalized to [0, 360).
    pub rotation: f64,
    /// Axis-independent; negative components flip.
    pub scale: Vec2,
    /// 0 = transparent, 1 = opaque.
    pub opacity: f64,
    /// Paint order key; ties break by insertion order.
    pub z_index: i32,
    /// Locked objects reject mutations.
    pub locked: bool,
}

impl ObjectCommon {
    pub(crate) fn new(position: Point, size: Size) -> Self {
        Self {
            id: Uuid::new_v4(),
            position,
            size,
            rotation: 0.0,
            scale: Vec2::one(),
            opacity: 1.0,
            z_index: 0,
            locked: false,
        }
    }

    /// Effective width/height after scaling (flips ignored).
    pub fn scaled_size(&self) -> Size {
        Size::new(
            self.size.width * self.scale.x.abs(),
            self.size.height * self.scale.y.abs(),
        )
    }

    /// Axis-aligned bounding box after scale and rotation.
    pub fn bounds(&self) -> Rect {
        let scaled = self.scaled_size();
        let rad = self.rotation.to_radians();
        let (sin, cos) = (rad.sin().abs(), rad.cos().abs());
        let w = scaled.width * cos + scaled.height * sin;
        let h = scaled.width * sin + scaled.height * cos;
        Rect::new(self.position.x - w / 2.0, self.position.y - h / 2.0, w, h)
    }
}

/// A placed design element: text or image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum DesignObject {
    Text(TextObject),
    Image(ImageObject),
}

impl DesignObject {
    /// The shared transform state.
    pub fn common(&self) -> &ObjectCommon {
        match self {
            DesignObject::Text(t) => &t.common,
            DesignObject::Image(i) => &i.common,
        }
    }

    pub(crate) fn common_mut(&mut self) -> &mut ObjectCommon {
        match self {
            DesignObject::Text(t) => &mut t.common,
            DesignObject::Image(i) => &mut i.common,
        }
    }

    /// The object's id.
    pub fn id(&self) -> Uuid {
        self.common().id
    }

    /// Axis-aligned bounding box after transform.
    pub fn bounds(&self) -> Rect {
        self.common().bounds()
    }

    /// Human-readable kind, used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            DesignObject::Text(_) => "text",
            DesignObject::Image(_) => "image",
        }
    }

    pub(crate) fn as_text_mut(&mut self) -> Option<&mut TextObject> {
        match self {
            DesignObject::Text(t) => Some(t),
            DesignObject::Image(_) => None,
        }
    }
}

/// Partial update to an object's transform. Absent fields are untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransformPatch {
    pub position: Option<Point>,
    pub size: Option<Size>,
    pub rotation: Option<f64>,
    pub scale: Option<Vec2>,
    pub opacity: Option<f64>,
}

impl TransformPatch {
    /// Patch that only moves the object.
    pub fn move_to(position: Point) -> Self {
        Self {
            position: Some(position),
            ..Self::default()
        }
    }

    /// Patch that only rescales the object.
    pub fn scale_to(scale: Vec2) -> Self {
        Self {
            scale: Some(scale),
            ..Self::default()
        }
    }

    /// Validates the patch, then applies it. Rejected patches leave the
    /// target untouched.
    pub(crate) fn apply(&self, common: &mut ObjectCommon) -> Result<()> {
        if let Some(scale) = self.scale {
            validate_scale(scale)?;
        }
        if let Some(opacity) = self.opacity {
            validate_opacity(opacity)?;
        }
        if let Some(size) = self.size {
            validate_size(size)?;
        }

        if let Some(position) = self.position {
            common.position = position;
        }
        if let Some(size) = self.size {
            common.size = size;
        }
        if let Some(rotation) = self.rotation {
            common.rotation = normalize_degrees(rotation);
        }
        if let Some(scale) = self.scale {
            common.scale = scale;
        }
        if let Some(opacity) = self.opacity {
            common.opacity = opacity;
        }
        Ok(())
    }
}

/// Partial update to a text object's style. Absent fields are untouched,
/// so toggling bold never resets italic or underline.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StylePatch {
    pub text: Option<String>,
    pub font_family: Option<FontFamily>,
    pub font_size: Option<f64>,
    pub bold: Option<bool>,
    pub italic: Option<bool>,
    pub underline: Option<bool>,
    pub color: Option<Color>,
    pub effect: Option<TextEffect>,
}

impl StylePatch {
    /// Patch that only toggles bold.
    pub fn bold(on: bool) -> Self {
        Self {
            bold: Some(on),
            ..Self::default()
        }
    }

    /// Patch that only switches the text-path effect.
    pub fn effect(effect: TextEffect) -> Self {
        Self {
            effect: Some(effect),
            ..Self::default()
        }
    }

    pub(crate) fn apply(&self, text: &mut TextObject) -> Result<()> {
        if let Some(font_size) = self.font_size {
            validate_font_size(font_size)?;
        }
        if let Some(effect) = &self.effect {
            effect.validate()?;
        }

        if let Some(content) = &self.text {
            text.text = content.clone();
        }
        if let Some(family) = self.font_family {
            text.font_family = family;
        }
        if let Some(font_size) = self.font_size {
            text.font_size = font_size;
        }
        if let Some(bold) = self.bold {
            text.bold = bold;
        }
        if let Some(italic) = self.italic {
            text.italic = italic;
        }
        if let Some(underline) = self.underline {
            text.underline = underline;
        }
        if let Some(color) = self.color {
            text.color = color;
        }
        if let Some(effect) = &self.effect {
            text.effect = effect.clone();
        }
        Ok(())
    }
}

pub(crate) fn validate_scale(scale: Vec2) -> Result<()> {
    if scale.x == 0.0 || scale.y == 0.0 || !scale.x.is_finite() || !scale.y.is_finite() {
        return Err(DesignError::invalid(
            "scale",
            format!("scale components must be non-zero, got ({}, {})", scale.x, scale.y),
        ));
    }
    Ok(())
}

pub(crate) fn validate_opacity(opacity: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&opacity) {
        return Err(DesignError::invalid(
            "opacity",
            format!("must be within [0, 1], got {opacity}"),
        ));
    }
    Ok(())
}

pub(crate) fn validate_font_size(font_size: f64) -> Result<()> {
    if !(font_size > 0.0) || !font_size.is_finite() {
        return Err(DesignError::invalid(
            "font_size",
            format!("must be positive, got {font_size}"),
        ));
    }
    Ok(())
}

pub(crate) fn validate_size(size: Size) -> Result<()> {
    if !(size.width > 0.0) || !(size.height > 0.0) {
        return Err(DesignError::invalid(
            "size",
            format!("dimensions must be positive, got {}x{}", size.width, size.height),
        ));
    }
    Ok(())
}
