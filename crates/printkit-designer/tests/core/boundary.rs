use printkit_core::{
    catalog::DEFAULT_BOUNDARY, Point, ProductCatalog, Rect, Size, Vec2, ViewId, ViewTemplate,
};
use printkit_designer::{DesignSession, TextSpec, TransformPatch};

#[test]
fn test_unknown_product_gets_default_boundary() {
    let catalog = ProductCatalog::new();
    let boundary = catalog.boundary("unknown-product", ViewId::Front);
    assert_eq!(boundary, DEFAULT_BOUNDARY);
}

#[test]
fn test_every_builtin_product_covers_all_views() {
    let catalog = ProductCatalog::new();
    for product in catalog.product_types() {
        for view in ViewId::ALL {
            let template = catalog.template(&product, view);
            assert!(template.boundary.width > 0.0);
            assert!(template.boundary.height > 0.0);
            // Printable area stays inside the canvas.
            let canvas = Rect::new(0.0, 0.0, template.canvas.width, template.canvas.height);
            assert!(canvas.contains_rect(&template.boundary), "{product}/{view}");
        }
    }
}

#[test]
fn test_out_of_boundary_motion_is_allowed_but_reported() {
    let mut session = DesignSession::with_defaults("tshirt");
    let id = session
        .create_text(ViewId::Front, &TextSpec::new("HELLO"))
        .unwrap();
    assert!(session.outside_boundary(ViewId::Front).is_empty());

    // Dragging far outside the printable area is accepted...
    session
        .update_transform(
            ViewId::Front,
            id,
            &TransformPatch::move_to(Point::new(-200.0, -200.0)),
        )
        .unwrap();

    // ...and reported for the warning indicator.
    assert_eq!(session.outside_boundary(ViewId::Front), vec![id]);
}

#[test]
fn test_scaling_past_boundary_is_reported() {
    let mut session = DesignSession::with_defaults("tshirt");
    let id = session
        .create_text(ViewId::Front, &TextSpec::new("HELLO"))
        .unwrap();
    session
        .update_transform(
            ViewId::Front,
            id,
            &TransformPatch::scale_to(Vec2::new(50.0, 50.0)),
        )
        .unwrap();
    assert_eq!(session.outside_boundary(ViewId::Front), vec![id]);
}

#[test]
fn test_switch_product_type_keeps_absolute_coordinates() {
    let mut session = DesignSession::with_defaults("tshirt");
    let id = session
        .create_text(ViewId::Front, &TextSpec::new("HELLO"))
        .unwrap();
    let position = session.object(ViewId::Front, id).unwrap().common().position;

    session.switch_product_type("cap");

    // Objects are not rescaled or moved; only the boundary re-resolves.
    let after = session.object(ViewId::Front, id).unwrap().common().position;
    assert_eq!(position, after);
    assert_eq!(
        session.boundary(ViewId::Front),
        ProductCatalog::new().boundary("cap", ViewId::Front)
    );
}

#[test]
fn test_composite_exposes_template_for_inactive_views() {
    let session = DesignSession::with_defaults("tshirt");
    // The back view was never activated; its composite still resolves.
    let composite = session.composite(ViewId::Back);
    assert!(composite.layers.is_empty());
    assert_eq!(
        composite.boundary,
        ProductCatalog::new().boundary("tshirt", ViewId::Back)
    );
}

#[test]
fn test_custom_catalog_template_drives_creation_placement() {
    let mut catalog = ProductCatalog::empty();
    catalog.insert(
        "sticker",
        ViewId::Front,
        ViewTemplate {
            canvas: Size::new(200.0, 200.0),
            boundary: Rect::new(40.0, 40.0, 120.0, 120.0),
            base_image: None,
        },
    );
    let mut session = DesignSession::new("sticker", catalog);
    let id = session
        .create_text(ViewId::Front, &TextSpec::new("x"))
        .unwrap();
    assert_eq!(
        session.object(ViewId::Front, id).unwrap().common().position,
        Point::new(100.0, 100.0)
    );
}
