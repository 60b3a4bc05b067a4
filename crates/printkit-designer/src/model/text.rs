use serde::{Deserialize, Serialize};

use printkit_core::{Color, DesignError, Point, Result, Size};

use super::ObjectCommon;
use crate::font_manager::FontFamily;

/// Glyph layout mode for a text object. Switching the effect changes
/// glyph placement only; size, color, and weight are untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum TextEffect {
    /// Glyphs on a horizontal baseline (default).
    Straight,
    /// Glyphs along a circular arc. Higher curvature bends the baseline
    /// harder, increasing the angular spread per character.
    Arc { curvature: f64 },
    /// Glyphs around a full circle of the given radius, as used for mug
    /// wraps and badge prints.
    Circle { radius: f64 },
}

impl TextEffect {
    pub(crate) fn validate(&self) -> Result<()> {
        match self {
            TextEffect::Straight => Ok(()),
            TextEffect::Arc { curvature } => {
                if !curvature.is_finite() || *curvature < 0.0 {
                    Err(DesignError::invalid(
                        "effect.curvature",
                        format!("must be finite and non-negative, got {curvature}"),
                    ))
                } else {
                    Ok(())
                }
            }
            TextEffect::Circle { radius } => {
                if !(*radius > 0.0) || !radius.is_finite() {
                    Err(DesignError::invalid(
                        "effect.radius",
                        format!("must be positive, got {radius}"),
                    ))
                } else {
                    Ok(())
                }
            }
        }
    }
}

impl Default for TextEffect {
    fn default() -> Self {
        TextEffect::Straight
    }
}

/// A placed text element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextObject {
    #[serde(flatten)]
    pub common: ObjectCommon,
    pub text: String,
    pub font_family: FontFamily,
    pub font_size: f64,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub color: Color,
    pub effect: TextEffect,
}

/// Initial properties for text creation. Fields left at their defaults
/// follow the engine's documented creation behavior; a `position` of
/// `None` centers the object inside the view's printable boundary.
#[derive(Debug, Clone)]
pub struct TextSpec {
    pub text: String,
    pub font_family: FontFamily,
    pub font_size: f64,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub color: Color,
    pub effect: TextEffect,
    pub position: Option<Point>,
    pub z_index: i32,
}

impl TextSpec {
    /// A spec with the given content and engine defaults for the rest.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }
}

impl Default for TextSpec {
    fn default() -> Self {
        Self {
            text: String::new(),
            font_family: FontFamily::Arial,
            font_size: 32.0,
            bold: false,
            italic: false,
            underline: false,
            color: Color::BLACK,
            effect: TextEffect::Straight,
            position: None,
            z_index: 0,
        }
    }
}

impl TextObject {
    pub(crate) fn from_spec(spec: &TextSpec, position: Point, size: Size) -> Self {
        let mut common = ObjectCommon::new(position, size);
        common.z_index = spec.z_index;
        Self {
            common,
            text: spec.text.clone(),
            font_family: spec.font_family,
            font_size: spec.font_size,
            bold: spec.bold,
            italic: spec.italic,
            underline: spec.underline,
            color: spec.color,
            effect: spec.effect.clone(),
        }
    }
}
