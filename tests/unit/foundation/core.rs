use super::*;

#[test]
fn canvas_rejects_zero_and_oversized_dimensions() {
    assert!(Canvas::new(0, 10).is_err());
    assert!(Canvas::new(10, 0).is_err());
    assert!(Canvas::new(70_000, 10).is_err());

    let c = Canvas::new(4, 2).unwrap();
    assert_eq!(c.pixel_count(), 8);
    assert_eq!(c.rgb_frame_len(), 24);
    assert_eq!(c.rgba_frame_len(), 32);
}

#[test]
fn transform_to_affine_identity_and_translation() {
    let t = Transform2D::default();
    assert_eq!(t.to_affine(), Affine::IDENTITY);

    let t = Transform2D {
        translate: Vec2::new(10.0, -2.5),
        ..Transform2D::default()
    };
    assert_eq!(t.to_affine(), Affine::translate(Vec2::new(10.0, -2.5)));
}

#[test]
fn transform_applies_scale_before_translation() {
    let t = Transform2D {
        translate: Vec2::new(5.0, 5.0),
        rotate: 0.0,
        scale: Vec2::new(2.0, 3.0),
    };
    let p = t.to_affine() * Point::new(1.0, 1.0);
    assert_eq!(p, Point::new(7.0, 8.0));
}
