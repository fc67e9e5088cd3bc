use super::*;
use crate::foundation::core::{Affine, Vec2};
use crate::render::surface::{DrawCall, RecordingSurface};
use crate::scene::model::ScaleValue;

fn object(shape: ShapeKind) -> SceneObject {
    SceneObject {
        id: "o".to_string(),
        shape,
        fill_color: "#ff0000".to_string(),
        stroke_color: None,
        stroke_width: None,
        initial_position: Point::new(50.0, 40.0),
        initial_rotation: 0.0,
        initial_scale: ScaleValue::default(),
        initial_opacity: 1.0,
    }
}

#[test]
fn shapes_are_centred_on_origin() {
    let tri = shape_path(&ShapeKind::Triangle { size: 10.0 });
    assert_eq!(tri.bounding_box(), Rect::new(-5.0, -5.0, 5.0, 5.0));

    let rect = shape_path(&ShapeKind::Rectangle {
        width: 8.0,
        height: 2.0,
    });
    assert_eq!(rect.bounding_box(), Rect::new(-4.0, -1.0, 4.0, 1.0));

    let circle = shape_path(&ShapeKind::Circle { radius: 3.0 }).bounding_box();
    assert!((circle.width() - 6.0).abs() < 1e-6);
    assert!((circle.center() - Point::ZERO).hypot() < 1e-6);
}

#[test]
fn opaque_object_fills_without_layer() {
    let obj = object(ShapeKind::Circle { radius: 5.0 });
    let state = ObjectState::initial(&obj);
    let mut s = RecordingSurface::new();
    draw_object(&mut s, &obj, &state);

    assert_eq!(s.calls.len(), 1);
    let DrawCall::FillPath { transform, color, .. } = &s.calls[0] else {
        panic!("expected fill");
    };
    assert_eq!(*color, Rgb8::new(255, 0, 0));
    assert_eq!(*transform, Affine::translate(Vec2::new(50.0, 40.0)));
}

#[test]
fn translucent_stroked_object_uses_layer() {
    let mut obj = object(ShapeKind::Triangle { size: 4.0 });
    obj.stroke_color = Some("#00ff00".to_string());
    obj.stroke_width = Some(3.0);
    let mut state = ObjectState::initial(&obj);
    state.opacity = 0.25;
    state.fill_color = "rgb(1,2,3)".to_string();

    let mut s = RecordingSurface::new();
    draw_object(&mut s, &obj, &state);
    assert_eq!(s.calls.len(), 4);
    assert_eq!(s.calls[0], DrawCall::PushOpacity(0.25));
    assert!(matches!(
        s.calls[1],
        DrawCall::FillPath { color, .. } if color == Rgb8::new(1, 2, 3)
    ));
    assert!(matches!(
        s.calls[2],
        DrawCall::StrokePath { color, width, .. } if color == Rgb8::new(0, 255, 0) && width == 3.0
    ));
    assert_eq!(s.calls[3], DrawCall::PopOpacity);
}

#[test]
fn stroke_without_width_uses_default() {
    let mut obj = object(ShapeKind::Circle { radius: 4.0 });
    obj.stroke_color = Some("#00ff00".to_string());
    let state = ObjectState::initial(&obj);

    let mut s = RecordingSurface::new();
    draw_object(&mut s, &obj, &state);
    assert!(s.calls.iter().any(|c| matches!(
        c,
        DrawCall::StrokePath { width, .. } if *width == DEFAULT_STROKE_WIDTH
    )));
}

#[test]
fn invisible_object_draws_nothing() {
    let obj = object(ShapeKind::Circle { radius: 5.0 });
    let mut state = ObjectState::initial(&obj);
    state.opacity = 0.0;
    let mut s = RecordingSurface::new();
    draw_object(&mut s, &obj, &state);
    assert!(s.calls.is_empty());
}
