//! Raster composition of a view's layer stack.
//!
//! Renders a [`Composite`] to a tiny-skia pixmap: flat canvas color,
//! product base photo, then objects in paint order, with an optional
//! printable-boundary indicator on top for on-screen preview. The same
//! path serves interactive preview (scale 1) and print export
//! (multiplier-scaled), so what the user sees is what fulfillment gets.

use rusttype::{point as rt_point, Scale as RtScale};
use tiny_skia::{
    BlendMode, Color as SkColor, FillRule, FilterQuality, Paint, PathBuilder, Pixmap, PixmapPaint,
    Rect as SkRect, Stroke, StrokeDash, Transform,
};

use printkit_core::{Color, DesignError, Result};

use crate::assets::{AssetStore, Pixels};
use crate::effects;
use crate::export::{AssetFailure, CancelFlag};
use crate::font_manager::{self, ResolvedFont};
use crate::model::{DesignObject, ImageObject, ObjectCommon, TextObject};
use crate::session::Composite;

const BOUNDARY_DASH: [f32; 2] = [6.0, 4.0];

fn boundary_color() -> SkColor {
    SkColor::from_rgba8(52, 152, 219, 255)
}
fn placeholder_fill() -> SkColor {
    SkColor::from_rgba8(189, 195, 199, 160)
}

/// Rendering knobs. Preview shows the boundary indicator and placeholder
/// boxes for unresolved assets; export disables both.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub show_boundary: bool,
    pub placeholder_missing_assets: bool,
    pub background: Color,
}

impl RenderOptions {
    /// On-screen preview defaults.
    pub fn preview() -> Self {
        Self {
            show_boundary: true,
            placeholder_missing_assets: true,
            background: Color::WHITE,
        }
    }

    /// Print-export defaults: nothing but the design itself.
    pub fn export() -> Self {
        Self {
            show_boundary: false,
            placeholder_missing_assets: false,
            background: Color::WHITE,
        }
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self::preview()
    }
}

/// Renders a composite at `scale` times display resolution.
///
/// Unresolvable image sources never abort the render: the object is
/// skipped (or boxed, in preview) and reported in the failure list so
/// the caller can surface a per-object warning.
pub fn render(
    composite: &Composite,
    assets: &AssetStore,
    scale: f64,
    options: &RenderOptions,
    cancel: Option<&CancelFlag>,
) -> Result<(Pixmap, Vec<AssetFailure>)> {
    let width = (composite.canvas.width * scale).round() as u32;
    let height = (composite.canvas.height * scale).round() as u32;
    let mut pixmap = Pixmap::new(width, height).ok_or_else(|| DesignError::ExportFailed {
        reason: format!("cannot allocate {width}x{height} surface"),
    })?;

    let bg = options.background;
    pixmap.fill(SkColor::from_rgba8(bg.r, bg.g, bg.b, bg.a));

    if let Some(background) = &composite.background {
        if let Some(pixels) = assets.get(background) {
            draw_background(&mut pixmap, pixels, width, height);
        }
    }

    let mut failures = Vec::new();
    for object in &composite.layers {
        if cancel.is_some_and(|c| c.is_cancelled()) {
            return Err(DesignError::ExportFailed {
                reason: "cancelled".to_string(),
            });
        }
        match object {
            DesignObject::Image(image) => {
                draw_image(&mut pixmap, image, assets, scale, options, &mut failures);
            }
            DesignObject::Text(text) => {
                draw_text(&mut pixmap, text, scale);
            }
        }
    }

    if options.show_boundary {
        draw_boundary(&mut pixmap, composite, scale);
    }

    Ok((pixmap, failures))
}

/// Preview wrapper: failures become placeholder boxes, nothing can
/// cancel.
pub fn render_preview(composite: &Composite, assets: &AssetStore) -> Result<Pixmap> {
    let (pixmap, _) = render(composite, assets, 1.0, &RenderOptions::preview(), None)?;
    Ok(pixmap)
}

/// Maps object-local coordinates to output pixels: object scale (signed,
/// so flips work), rotation, position, then the render scale.
fn object_transform(common: &ObjectCommon, scale: f64) -> Transform {
    Transform::from_scale(common.scale.x as f32, common.scale.y as f32)
        .post_concat(Transform::from_rotate(common.rotation as f32))
        .post_translate(common.position.x as f32, common.position.y as f32)
        .post_scale(scale as f32, scale as f32)
}

fn pixmap_from_pixels(pixels: &Pixels) -> Option<Pixmap> {
    let mut pixmap = Pixmap::new(pixels.width, pixels.height)?;
    let data = pixmap.data_mut();
    for (dst, src) in data.chunks_exact_mut(4).zip(pixels.rgba.chunks_exact(4)) {
        let a = src[3] as u16;
        dst[0] = (src[0] as u16 * a / 255) as u8;
        dst[1] = (src[1] as u16 * a / 255) as u8;
        dst[2] = (src[2] as u16 * a / 255) as u8;
        dst[3] = src[3];
    }
    Some(pixmap)
}

fn draw_background(pixmap: &mut Pixmap, pixels: &Pixels, width: u32, height: u32) {
    let Some(source) = pixmap_from_pixels(pixels) else {
        return;
    };
    let sx = width as f32 / pixels.width as f32;
    let sy = height as f32 / pixels.height as f32;
    let paint = PixmapPaint {
        opacity: 1.0,
        blend_mode: BlendMode::SourceOver,
        quality: FilterQuality::Bilinear,
    };
    pixmap.draw_pixmap(
        0,
        0,
        source.as_ref(),
        &paint,
        Transform::from_scale(sx, sy),
        None,
    );
}

fn draw_image(
    pixmap: &mut Pixmap,
    image: &ImageObject,
    assets: &AssetStore,
    scale: f64,
    options: &RenderOptions,
    failures: &mut Vec<AssetFailure>,
) {
    let common = &image.common;
    let Some(pixels) = assets.get(&image.source_ref) else {
        failures.push(AssetFailure {
            object_id: common.id,
            source: image.source_ref.clone(),
            error: DesignError::AssetUnavailable {
                source: image.source_ref.to_string(),
            },
        });
        if options.placeholder_missing_assets {
            draw_placeholder(pixmap, common, scale);
        }
        return;
    };

    let Some(source) = pixmap_from_pixels(pixels) else {
        return;
    };

    // Pixmap pixels -> the object's untransformed box, centered on the
    // local origin; object_transform does the rest.
    let local = Transform::from_translate(
        -(pixels.width as f32) / 2.0,
        -(pixels.height as f32) / 2.0,
    )
    .post_scale(
        common.size.width as f32 / pixels.width as f32,
        common.size.height as f32 / pixels.height as f32,
    )
    .post_concat(object_transform(common, scale));

    let paint = PixmapPaint {
        opacity: common.opacity as f32,
        blend_mode: BlendMode::SourceOver,
        quality: FilterQuality::Bilinear,
    };
    pixmap.draw_pixmap(0, 0, source.as_ref(), &paint, local, None);
}

fn draw_placeholder(pixmap: &mut Pixmap, common: &ObjectCommon, scale: f64) {
    let w = common.size.width as f32;
    let h = common.size.height as f32;
    let Some(rect) = SkRect::from_xywh(-w / 2.0, -h / 2.0, w, h) else {
        return;
    };
    let path = PathBuilder::from_rect(rect);
    let mut paint = Paint::default();
    paint.set_color(placeholder_fill());
    paint.anti_alias = true;
    pixmap.fill_path(
        &path,
        &paint,
        FillRule::Winding,
        object_transform(common, scale),
        None,
    );
}

fn draw_text(pixmap: &mut Pixmap, text: &TextObject, scale: f64) {
    let font = font_manager::resolve(text.font_family, text.bold, text.italic);
    let placements = effects::layout(text, &font);
    if placements.is_empty() {
        return;
    }

    let common = &text.common;
    let alpha = (common.opacity * text.color.a as f64 / 255.0).clamp(0.0, 1.0);
    let to_output = object_transform(common, scale);

    // Glyph masks are rasterized at the output's effective pixel density
    // so scaled-up text stays sharp.
    let quality = (scale * common.scale.x.abs().max(common.scale.y.abs())).max(0.1);

    for placement in &placements {
        let glyph_to_output = Transform::from_rotate(placement.rotation as f32)
            .post_translate(placement.x as f32, placement.y as f32)
            .post_concat(to_output);

        match &font {
            ResolvedFont::System(system) => {
                draw_system_glyph(pixmap, system, text, placement.ch, quality, alpha, glyph_to_output);
            }
            ResolvedFont::Metric => {
                draw_metric_glyph(pixmap, &font, text, placement.ch, alpha, glyph_to_output);
            }
        }

        if text.underline {
            draw_underline(pixmap, &font, text, placement.ch, alpha, glyph_to_output);
        }
    }
}

fn draw_system_glyph(
    pixmap: &mut Pixmap,
    font: &rusttype::Font<'static>,
    text: &TextObject,
    ch: char,
    quality: f64,
    alpha: f64,
    glyph_to_output: Transform,
) {
    let glyph = font
        .glyph(ch)
        .scaled(RtScale::uniform((text.font_size * quality) as f32))
        .positioned(rt_point(0.0, 0.0));
    let Some(bb) = glyph.pixel_bounding_box() else {
        return; // whitespace
    };
    let width = (bb.max.x - bb.min.x).max(1) as u32;
    let height = (bb.max.y - bb.min.y).max(1) as u32;
    let Some(mut mask) = Pixmap::new(width, height) else {
        return;
    };

    let color = text.color;
    let data = mask.data_mut();
    glyph.draw(|gx, gy, coverage| {
        let a = (coverage * 255.0) as u16;
        if a == 0 {
            return;
        }
        let idx = ((gy * width + gx) * 4) as usize;
        data[idx] = (color.r as u16 * a / 255) as u8;
        data[idx + 1] = (color.g as u16 * a / 255) as u8;
        data[idx + 2] = (color.b as u16 * a / 255) as u8;
        data[idx + 3] = a as u8;
    });

    // Mask pixels -> glyph space (quality-scaled) -> object local.
    let q = quality as f32;
    let transform = Transform::from_translate(bb.min.x as f32, bb.min.y as f32)
        .post_scale(1.0 / q, 1.0 / q)
        .post_concat(glyph_to_output);
    let paint = PixmapPaint {
        opacity: alpha as f32,
        blend_mode: BlendMode::SourceOver,
        quality: FilterQuality::Bilinear,
    };
    pixmap.draw_pixmap(0, 0, mask.as_ref(), &paint, transform, None);
}

/// Fallback when no system face resolved: a filled block per glyph cell
/// keeps exports deterministic on hosts without fonts.
fn draw_metric_glyph(
    pixmap: &mut Pixmap,
    font: &ResolvedFont,
    text: &TextObject,
    ch: char,
    alpha: f64,
    glyph_to_output: Transform,
) {
    if ch.is_whitespace() {
        return;
    }
    let advance = font.advance(ch, text.font_size) as f32;
    let ascent = font.ascent(text.font_size) as f32;
    let Some(rect) = SkRect::from_xywh(advance * 0.1, -ascent * 0.9, advance * 0.8, ascent * 0.9)
    else {
        return;
    };
    let path = PathBuilder::from_rect(rect);
    let mut paint = Paint::default();
    let color = text.color;
    paint.set_color(SkColor::from_rgba8(
        color.r,
        color.g,
        color.b,
        (alpha * 255.0) as u8,
    ));
    paint.anti_alias = true;
    pixmap.fill_path(&path, &paint, FillRule::Winding, glyph_to_output, None);
}

fn draw_underline(
    pixmap: &mut Pixmap,
    font: &ResolvedFont,
    text: &TextObject,
    ch: char,
    alpha: f64,
    glyph_to_output: Transform,
) {
    let advance = font.advance(ch, text.font_size) as f32;
    let offset = (font.descent(text.font_size) * 0.5) as f32;
    let thickness = (text.font_size / 14.0).max(1.0) as f32;
    let Some(rect) = SkRect::from_xywh(0.0, offset, advance, thickness) else {
        return;
    };
    let path = PathBuilder::from_rect(rect);
    let mut paint = Paint::default();
    let color = text.color;
    paint.set_color(SkColor::from_rgba8(
        color.r,
        color.g,
        color.b,
        (alpha * 255.0) as u8,
    ));
    paint.anti_alias = true;
    pixmap.fill_path(&path, &paint, FillRule::Winding, glyph_to_output, None);
}

fn draw_boundary(pixmap: &mut Pixmap, composite: &Composite, scale: f64) {
    let b = composite.boundary;
    let Some(rect) = SkRect::from_xywh(
        b.left as f32,
        b.top as f32,
        b.width as f32,
        b.height as f32,
    ) else {
        return;
    };
    let path = PathBuilder::from_rect(rect);
    let mut paint = Paint::default();
    paint.set_color(boundary_color());
    paint.anti_alias = true;
    let stroke = Stroke {
        width: 1.5,
        dash: StrokeDash::new(BOUNDARY_DASH.to_vec(), 0.0),
        ..Default::default()
    };
    pixmap.stroke_path(
        &path,
        &paint,
        &stroke,
        Transform::from_scale(scale as f32, scale as f32),
        None,
    );
}
