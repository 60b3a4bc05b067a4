use printkit_core::{Point, Size, Vec2, ViewId};
use printkit_designer::{
    DesignObject, DesignSession, ImageSpec, StylePatch, TextSpec, TransformPatch,
};
use printkit_core::AssetRef;

fn session() -> DesignSession {
    DesignSession::with_defaults("tshirt")
}

#[test]
fn test_create_text_centers_in_boundary() {
    let mut session = session();
    let id = session
        .create_text(ViewId::Front, &TextSpec::new("HELLO"))
        .unwrap();

    let object = session.object(ViewId::Front, id).unwrap();
    let center = session.boundary(ViewId::Front).center();
    assert_eq!(object.common().position, center);
}

#[test]
fn test_create_text_rejects_non_positive_font_size() {
    let mut session = session();
    let mut spec = TextSpec::new("x");
    spec.font_size = 0.0;
    let err = session.create_text(ViewId::Front, &spec).unwrap_err();
    assert!(matches!(
        err,
        printkit_core::DesignError::InvalidValue { .. }
    ));
    assert!(session.objects(ViewId::Front).is_empty());
}

#[test]
fn test_zero_scale_rejected_and_prior_scale_kept() {
    let mut session = session();
    let id = session
        .create_text(ViewId::Front, &TextSpec::new("HELLO"))
        .unwrap();
    session
        .update_transform(
            ViewId::Front,
            id,
            &TransformPatch::scale_to(Vec2::new(2.0, 3.0)),
        )
        .unwrap();

    let err = session
        .update_transform(
            ViewId::Front,
            id,
            &TransformPatch::scale_to(Vec2::new(0.0, 1.0)),
        )
        .unwrap_err();
    assert!(matches!(
        err,
        printkit_core::DesignError::InvalidValue { .. }
    ));

    let object = session.object(ViewId::Front, id).unwrap();
    assert_eq!(object.common().scale, Vec2::new(2.0, 3.0));
}

#[test]
fn test_opacity_out_of_range_rejected() {
    let mut session = session();
    let id = session
        .create_text(ViewId::Front, &TextSpec::new("x"))
        .unwrap();
    let patch = TransformPatch {
        opacity: Some(1.5),
        ..TransformPatch::default()
    };
    assert!(session.update_transform(ViewId::Front, id, &patch).is_err());
    assert_eq!(session.object(ViewId::Front, id).unwrap().common().opacity, 1.0);
}

#[test]
fn test_rotation_wraps_into_range() {
    let mut session = session();
    let id = session
        .create_text(ViewId::Front, &TextSpec::new("x"))
        .unwrap();
    let patch = TransformPatch {
        rotation: Some(-90.0),
        ..TransformPatch::default()
    };
    let object = session.update_transform(ViewId::Front, id, &patch).unwrap();
    assert_eq!(object.common().rotation, 270.0);
}

#[test]
fn test_locked_object_rejects_mutation() {
    let mut session = session();
    let id = session
        .create_text(ViewId::Front, &TextSpec::new("HELLO"))
        .unwrap();
    session.set_locked(ViewId::Front, id, true).unwrap();

    let err = session
        .update_transform(ViewId::Front, id, &TransformPatch::move_to(Point::new(0.0, 0.0)))
        .unwrap_err();
    assert!(matches!(err, printkit_core::DesignError::ObjectLocked { .. }));

    let err = session.remove(ViewId::Front, id).unwrap_err();
    assert!(matches!(err, printkit_core::DesignError::ObjectLocked { .. }));

    // Unlocking is the one mutation a locked object accepts.
    session.set_locked(ViewId::Front, id, false).unwrap();
    assert!(session.remove(ViewId::Front, id).is_ok());
}

#[test]
fn test_style_toggles_are_independent() {
    let mut session = session();
    let mut spec = TextSpec::new("HELLO");
    spec.italic = true;
    spec.underline = true;
    let id = session.create_text(ViewId::Front, &spec).unwrap();

    let object = session
        .update_style(ViewId::Front, id, &StylePatch::bold(true))
        .unwrap();
    let DesignObject::Text(text) = object else {
        panic!("expected text object");
    };
    assert!(text.bold);
    assert!(text.italic);
    assert!(text.underline);
}

#[test]
fn test_style_patch_on_image_rejected() {
    let mut session = session();
    let id = session
        .create_image(
            ViewId::Front,
            AssetRef::url("https://cdn.example/a.png"),
            &ImageSpec::default(),
        )
        .unwrap();
    let err = session
        .update_style(ViewId::Front, id, &StylePatch::bold(true))
        .unwrap_err();
    assert!(matches!(
        err,
        printkit_core::DesignError::InvalidValue { .. }
    ));
}

#[test]
fn test_mutating_missing_object_reports_not_found() {
    let mut session = session();
    let err = session
        .update_transform(
            ViewId::Front,
            uuid::Uuid::new_v4(),
            &TransformPatch::default(),
        )
        .unwrap_err();
    assert!(matches!(err, printkit_core::DesignError::NotFound { .. }));
}

#[test]
fn test_paint_order_sorts_by_z_then_insertion() {
    let mut session = session();
    let a = session.create_text(ViewId::Front, &TextSpec::new("a")).unwrap();
    let b = session.create_text(ViewId::Front, &TextSpec::new("b")).unwrap();
    let c = session.create_text(ViewId::Front, &TextSpec::new("c")).unwrap();

    session.reorder(ViewId::Front, a, 5).unwrap();

    let composite = session.composite(ViewId::Front);
    let order: Vec<_> = composite.layers.iter().map(|o| o.id()).collect();
    // b and c share z_index 0 and keep insertion order; a paints last.
    assert_eq!(order, vec![b, c, a]);
}

#[test]
fn test_duplicate_gets_fresh_id_and_offset() {
    let mut session = session();
    let id = session
        .create_text(ViewId::Front, &TextSpec::new("HELLO"))
        .unwrap();
    let copy = session.duplicate(ViewId::Front, id).unwrap();
    assert_ne!(id, copy);

    let original = session.object(ViewId::Front, id).unwrap().common().position;
    let duplicate = session.object(ViewId::Front, copy).unwrap().common().position;
    assert!(duplicate.x > original.x);
    assert!(duplicate.y > original.y);
    assert_eq!(session.objects(ViewId::Front).len(), 2);
}

#[test]
fn test_clear_empties_view_and_is_undoable() {
    let mut session = session();
    session.create_text(ViewId::Front, &TextSpec::new("a")).unwrap();
    session.create_text(ViewId::Front, &TextSpec::new("b")).unwrap();

    session.clear(ViewId::Front).unwrap();
    assert!(session.objects(ViewId::Front).is_empty());

    session.undo().unwrap();
    assert_eq!(session.objects(ViewId::Front).len(), 2);
}

#[test]
fn test_image_keeps_aspect_ratio_helpers() {
    let mut session = session();
    let mut spec = ImageSpec::default();
    spec.natural_size = Some((200, 100));
    let id = session
        .create_image(ViewId::Front, AssetRef::url("https://cdn.example/wide.png"), &spec)
        .unwrap();

    let DesignObject::Image(image) = session.object(ViewId::Front, id).unwrap() else {
        panic!("expected image object");
    };
    assert_eq!(image.aspect_ratio(), 2.0);
    assert_eq!(image.fit_size(100.0), Size::new(100.0, 50.0));
    assert_eq!(image.common.size, Size::new(200.0, 100.0));
}

#[test]
fn test_every_mutation_records_one_history_entry() {
    let mut session = session();
    let id = session
        .create_text(ViewId::Front, &TextSpec::new("HELLO"))
        .unwrap();
    assert_eq!(session.undo_depth(ViewId::Front), 1);

    session
        .update_transform(ViewId::Front, id, &TransformPatch::move_to(Point::new(5.0, 5.0)))
        .unwrap();
    assert_eq!(session.undo_depth(ViewId::Front), 2);

    // A rejected mutation records nothing.
    let _ = session.update_transform(
        ViewId::Front,
        id,
        &TransformPatch::scale_to(Vec2::new(0.0, 0.0)),
    );
    assert_eq!(session.undo_depth(ViewId::Front), 2);
}
