//! Glyph placement for the three text-path effects.
//!
//! Layout is a pure function of the text object's own fields and the
//! resolved font metrics: the same object state always produces the same
//! placements, which is what makes effect switching lossless (switching
//! to `circle` and back to `straight` reproduces the original baseline
//! layout exactly).
//!
//! Placements are in object-local coordinates: the origin is the object's
//! center, y grows downward, and no object-level scale/rotation is
//! applied (the renderer does that).

use printkit_core::Size;

use crate::font_manager::ResolvedFont;
use crate::model::{TextEffect, TextObject};

/// Arc radius for curvature 1.0; higher curvature shrinks the radius,
/// widening the angular step per character.
const ARC_RADIUS_SCALE: f64 = 5000.0;

/// Curvature below this renders as a straight baseline.
const MIN_CURVATURE: f64 = 1e-6;

/// One glyph's resolved position: the baseline origin of the glyph and
/// its tangent rotation, in object-local coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlyphPlacement {
    pub ch: char,
    pub x: f64,
    pub y: f64,
    /// Degrees; 0 is upright.
    pub rotation: f64,
}

/// Lays out a text object's glyphs according to its effect.
pub fn layout(text: &TextObject, font: &ResolvedFont) -> Vec<GlyphPlacement> {
    match &text.effect {
        TextEffect::Straight => layout_straight(text, font),
        TextEffect::Arc { curvature } => {
            if *curvature < MIN_CURVATURE {
                layout_straight(text, font)
            } else {
                layout_arc(text, font, *curvature)
            }
        }
        TextEffect::Circle { radius } => layout_circle(text, font, *radius),
    }
}

fn layout_straight(text: &TextObject, font: &ResolvedFont) -> Vec<GlyphPlacement> {
    let size = text.font_size;
    let ascent = font.ascent(size);
    let descent = font.descent(size);
    let total = font.text_width(&text.text, size);

    // Baseline placed so the glyph block is vertically centered.
    let baseline = (ascent - descent) / 2.0;
    let mut pen = -total / 2.0;

    text.text
        .chars()
        .map(|ch| {
            let placement = GlyphPlacement {
                ch,
                x: pen,
                y: baseline,
                rotation: 0.0,
            };
            pen += font.advance(ch, size);
            placement
        })
        .collect()
}

fn layout_arc(text: &TextObject, font: &ResolvedFont, curvature: f64) -> Vec<GlyphPlacement> {
    let size = text.font_size;
    let radius = ARC_RADIUS_SCALE / curvature;
    let total = font.text_width(&text.text, size);

    // Glyph centers sit on a circle centered below the midpoint, so the
    // middle of the run rises above the ends.
    let mut pen = -total / 2.0;
    text.text
        .chars()
        .map(|ch| {
            let advance = font.advance(ch, size);
            let theta = (pen + advance / 2.0) / radius;
            let (sin, cos) = theta.sin_cos();
            let cx = radius * sin;
            let cy = radius * (1.0 - cos);
            let placement = GlyphPlacement {
                ch,
                x: cx - (advance / 2.0) * cos,
                y: cy - (advance / 2.0) * sin,
                rotation: theta.to_degrees(),
            };
            pen += advance;
            placement
        })
        .collect()
}

fn layout_circle(text: &TextObject, font: &ResolvedFont, radius: f64) -> Vec<GlyphPlacement> {
    let size = text.font_size;
    let total = font.text_width(&text.text, size);
    if total <= 0.0 {
        return Vec::new();
    }

    // Glyphs are spread over the full turn proportionally to their
    // advance, starting at the top of the circle.
    let mut pen = 0.0;
    text.text
        .chars()
        .map(|ch| {
            let advance = font.advance(ch, size);
            let theta = std::f64::consts::TAU * (pen + advance / 2.0) / total;
            let (sin, cos) = theta.sin_cos();
            let cx = radius * sin;
            let cy = -radius * cos;
            let placement = GlyphPlacement {
                ch,
                x: cx - (advance / 2.0) * cos,
                y: cy - (advance / 2.0) * sin,
                rotation: theta.to_degrees(),
            };
            pen += advance;
            placement
        })
        .collect()
}

/// Measures the object-local bounding box of a layout, used to keep a
/// text object's `size` in step with its content and style.
pub fn measure(text: &TextObject, font: &ResolvedFont) -> Size {
    let size = text.font_size;
    let ascent = font.ascent(size);
    let descent = font.descent(size);
    let placements = layout(text, font);

    if placements.is_empty() {
        return Size::new(size / 4.0, ascent + descent);
    }

    let mut min_x = f64::INFINITY;
    let mut min_y = f64::INFINITY;
    let mut max_x = f64::NEG_INFINITY;
    let mut max_y = f64::NEG_INFINITY;

    for placement in &placements {
        let advance = font.advance(placement.ch, size);
        let rad = placement.rotation.to_radians();
        let (sin, cos) = rad.sin_cos();
        // Corners of the glyph box around the baseline origin, rotated by
        // the glyph's tangent angle.
        let corners = [
            (0.0, -ascent),
            (advance, -ascent),
            (0.0, descent),
            (advance, descent),
        ];
        for (dx, dy) in corners {
            let x = placement.x + dx * cos - dy * sin;
            let y = placement.y + dx * sin + dy * cos;
            min_x = min_x.min(x);
            min_y = min_y.min(y);
            max_x = max_x.max(x);
            max_y = max_y.max(y);
        }
    }

    Size::new((max_x - min_x).max(1.0), (max_y - min_y).max(1.0))
}
