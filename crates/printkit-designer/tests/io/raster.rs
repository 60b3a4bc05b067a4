use printkit_core::{AssetRef, ProductCatalog, Rect, Size, ViewId, ViewTemplate};
use printkit_designer::{CancelFlag, DesignSession, ImageSpec, TextSpec};

fn png_bytes(width: u32, height: u32, rgba: [u8; 4]) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(width, height, image::Rgba(rgba));
    let mut bytes = std::io::Cursor::new(Vec::new());
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut bytes, image::ImageFormat::Png)
        .unwrap();
    bytes.into_inner()
}

fn non_white_pixels(png: &[u8]) -> usize {
    let decoded = image::load_from_memory(png).unwrap().to_rgba8();
    decoded
        .pixels()
        .filter(|p| p.0 != [255, 255, 255, 255])
        .count()
}

#[test]
fn test_raster_dimensions_follow_multiplier() {
    let mut session = DesignSession::with_defaults("tshirt");
    session
        .create_text(ViewId::Front, &TextSpec::new("HELLO"))
        .unwrap();

    let output = session.rasterize(ViewId::Front, 2.0).unwrap();
    // tshirt canvas is 600x700 at display resolution.
    assert_eq!((output.width, output.height), (1200, 1400));

    let decoded = image::load_from_memory(&output.png).unwrap().to_rgba8();
    assert_eq!((decoded.width(), decoded.height()), (1200, 1400));
}

#[test]
fn test_multiplier_below_one_rejected() {
    let mut session = DesignSession::with_defaults("tshirt");
    let err = session.rasterize(ViewId::Front, 0.5).unwrap_err();
    assert!(matches!(
        err,
        printkit_core::DesignError::InvalidValue { .. }
    ));
}

#[test]
fn test_text_produces_visible_pixels() {
    let mut session = DesignSession::with_defaults("tshirt");
    session
        .create_text(ViewId::Front, &TextSpec::new("HELLO"))
        .unwrap();

    let output = session.rasterize(ViewId::Front, 1.0).unwrap();
    assert!(output.failures.is_empty());
    assert!(non_white_pixels(&output.png) > 0);
}

#[test]
fn test_unresolved_image_reports_failure_but_text_exports() {
    let mut session = DesignSession::with_defaults("tshirt");
    session
        .create_text(ViewId::Front, &TextSpec::new("HELLO"))
        .unwrap();
    let broken = session
        .create_image(
            ViewId::Front,
            AssetRef::url("https://cdn.example/missing.png"),
            &ImageSpec::default(),
        )
        .unwrap();

    let output = session.rasterize(ViewId::Front, 2.0).unwrap();
    assert_eq!(output.failures.len(), 1);
    assert_eq!(output.failures[0].object_id, broken);
    assert!(output.failures[0].error.is_asset_error());
    // The text still made it into the export.
    assert!(non_white_pixels(&output.png) > 0);
}

#[test]
fn test_resolved_image_pixels_appear_in_export() {
    let mut session = DesignSession::with_defaults("tshirt");
    let source = AssetRef::url("https://cdn.example/swatch.png");
    session
        .assets_mut()
        .insert_bytes(source.clone(), &png_bytes(8, 8, [10, 200, 30, 255]))
        .unwrap();
    session
        .create_image(
            ViewId::Front,
            source,
            &ImageSpec {
                size: Some(Size::new(50.0, 50.0)),
                ..ImageSpec::default()
            },
        )
        .unwrap();

    let output = session.rasterize(ViewId::Front, 2.0).unwrap();
    assert!(output.failures.is_empty());

    let decoded = image::load_from_memory(&output.png).unwrap().to_rgba8();
    let hit = decoded
        .pixels()
        .any(|p| p.0[0] <= 20 && p.0[1] >= 180 && p.0[2] <= 50 && p.0[3] == 255);
    assert!(hit, "expected the image swatch color in the export");
}

#[test]
fn test_cancelled_export_fails_without_partial_output() {
    let mut session = DesignSession::with_defaults("tshirt");
    session
        .create_text(ViewId::Front, &TextSpec::new("HELLO"))
        .unwrap();

    let cancel = CancelFlag::new();
    cancel.cancel();
    let err = session
        .rasterize_with(ViewId::Front, 2.0, Some(&cancel))
        .unwrap_err();
    assert!(err.is_export_error());

    // Nothing was cached by the aborted export.
    let ok = session.rasterize(ViewId::Front, 2.0);
    assert!(ok.is_ok());
}

#[test]
fn test_failed_surface_falls_back_to_cached_preview() {
    let mut catalog = ProductCatalog::new();
    catalog.insert(
        "degenerate",
        ViewId::Front,
        ViewTemplate {
            canvas: Size::new(0.0, 0.0),
            boundary: Rect::new(0.0, 0.0, 0.0, 0.0),
            base_image: None,
        },
    );
    let mut session = DesignSession::new("tshirt", catalog);
    session
        .create_text(ViewId::Front, &TextSpec::new("HELLO"))
        .unwrap();

    let first = session.rasterize(ViewId::Front, 2.0).unwrap();

    // A zero-sized surface cannot be produced; the cached preview from
    // the successful export serves as the fallback.
    session.switch_product_type("degenerate");
    let fallback = session.rasterize(ViewId::Front, 2.0).unwrap();
    assert_eq!(fallback.png, first.png);
    assert_eq!((fallback.width, fallback.height), (first.width, first.height));
}

#[test]
fn test_export_without_cache_or_surface_fails() {
    let mut catalog = ProductCatalog::new();
    catalog.insert(
        "degenerate",
        ViewId::Front,
        ViewTemplate {
            canvas: Size::new(0.0, 0.0),
            boundary: Rect::new(0.0, 0.0, 0.0, 0.0),
            base_image: None,
        },
    );
    let mut session = DesignSession::new("degenerate", catalog);
    let err = session.rasterize(ViewId::Front, 2.0).unwrap_err();
    assert!(err.is_export_error());
}

#[test]
fn test_preview_draws_boundary_indicator() {
    let session = DesignSession::with_defaults("tshirt");
    let composite = session.composite(ViewId::Front);
    let pixmap = printkit_designer::render_preview(&composite, session.assets()).unwrap();

    // The dashed indicator leaves blue-dominant pixels on the otherwise
    // white canvas.
    let hit = pixmap
        .pixels()
        .iter()
        .map(|p| p.demultiply())
        .any(|c| c.blue() > 150 && c.blue() > c.red().saturating_add(20));
    assert!(hit, "expected the printable-boundary indicator in preview");
}

#[test]
fn test_export_omits_boundary_indicator() {
    let mut session = DesignSession::with_defaults("tshirt");
    let output = session.rasterize(ViewId::Front, 1.0).unwrap();
    let decoded = image::load_from_memory(&output.png).unwrap().to_rgba8();
    // An empty view exports as a clean white canvas.
    assert!(decoded.pixels().all(|p| p.0 == [255, 255, 255, 255]));
}

#[test]
fn test_rasterize_all_covers_every_activated_view() {
    let mut session = DesignSession::with_defaults("mug");
    session
        .create_text(ViewId::Front, &TextSpec::new("front"))
        .unwrap();
    session.set_active_view(ViewId::Back);
    session
        .create_text(ViewId::Back, &TextSpec::new("back"))
        .unwrap();

    let outputs = session.rasterize_all(2.0).unwrap();
    assert_eq!(outputs.len(), 2);
    assert!(outputs.contains_key(&ViewId::Front));
    assert!(outputs.contains_key(&ViewId::Back));
}
