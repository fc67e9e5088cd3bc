use super::*;

const DOC: &str = r##"{
  "duration": 2,
  "backgroundColor": "#101010",
  "objects": [
    {"id": "tri", "kind": "triangle", "size": 80, "fillColor": "#ff0000",
     "initialPosition": {"x": 100, "y": 100}},
    {"id": "dot", "kind": "circle", "radius": 20, "fillColor": "#00ff00",
     "strokeColor": "#ffffff", "strokeWidth": 3, "initialScale": 2, "initialOpacity": 0.5},
    {"id": "box", "kind": "rectangle", "width": 40, "height": 10, "fillColor": "#0000ff",
     "initialScale": {"x": 1, "y": 3}}
  ],
  "animations": [
    {"objectId": "tri", "kind": "move", "startTime": 0, "duration": 1, "easing": "easeInOut",
     "from": {"x": 0, "y": 0}, "to": {"x": 10, "y": 20}},
    {"objectId": "tri", "kind": "rotate", "duration": 1, "from": 0, "to": 0, "rotations": 2},
    {"objectId": "dot", "kind": "scale", "duration": 1, "from": 1, "to": {"x": 2, "y": 3}},
    {"objectId": "dot", "kind": "color", "duration": 1, "from": "#000000", "to": "#ffffff",
     "target": "stroke"},
    {"objectId": "box", "kind": "fade", "startTime": 0.5, "duration": 1, "from": 1, "to": 0}
  ],
  "markupOverlay": {"source": "x^2", "anchor": {"x": 640, "y": 100}, "scale": 3}
}"##;

#[test]
fn parses_flattened_shapes_and_defaults() {
    let scene = AnimationScene::from_json_str(DOC).unwrap();
    assert_eq!(scene.duration, 2.0);
    assert_eq!(scene.background_color, "#101010");

    let tri = scene.object("tri").unwrap();
    assert_eq!(tri.shape, ShapeKind::Triangle { size: 80.0 });
    assert_eq!(tri.initial_position, Point::new(100.0, 100.0));
    assert_eq!(tri.initial_rotation, 0.0);
    assert_eq!(tri.initial_scale.as_vec2(), Vec2::new(1.0, 1.0));
    assert_eq!(tri.initial_opacity, 1.0);
    assert_eq!(tri.stroke_color, None);

    let dot = scene.object("dot").unwrap();
    assert_eq!(dot.shape.name(), "circle");
    assert_eq!(dot.stroke_width, Some(3.0));
    assert_eq!(dot.initial_scale, ScaleValue::Uniform(2.0));
    assert_eq!(dot.initial_opacity, 0.5);

    let rect = scene.object("box").unwrap();
    assert_eq!(
        rect.shape,
        ShapeKind::Rectangle {
            width: 40.0,
            height: 10.0
        }
    );
    assert_eq!(rect.initial_scale.as_vec2(), Vec2::new(1.0, 3.0));
    assert!(scene.object("missing").is_none());
}

#[test]
fn parses_track_payloads() {
    let scene = AnimationScene::from_json_str(DOC).unwrap();
    let kinds: Vec<&str> = scene.animations.iter().map(|a| a.payload.name()).collect();
    assert_eq!(kinds, vec!["move", "rotate", "scale", "color", "fade"]);

    let mv = &scene.animations[0];
    assert_eq!(mv.easing, Ease::EaseInOut);
    assert_eq!(mv.end_time(), 1.0);

    let rot = &scene.animations[1];
    assert_eq!(rot.start_time, 0.0);
    assert_eq!(rot.easing, Ease::Linear);
    assert_eq!(
        rot.payload,
        TrackPayload::Rotate {
            from: 0.0,
            to: 0.0,
            rotations: Some(2.0)
        }
    );

    assert_eq!(
        scene.animations[2].payload,
        TrackPayload::Scale {
            from: ScaleValue::Uniform(1.0),
            to: ScaleValue::Xy(Vec2::new(2.0, 3.0)),
        }
    );
    let TrackPayload::Color { target, .. } = &scene.animations[3].payload else {
        panic!("expected color track");
    };
    assert_eq!(*target, ColorTarget::Stroke);
    assert_eq!(scene.animations[4].end_time(), 1.5);
}

#[test]
fn overlay_defaults() {
    let scene = AnimationScene::from_json_str(DOC).unwrap();
    let overlay = scene.markup_overlay.unwrap();
    assert_eq!(overlay.source, "x^2");
    assert_eq!(overlay.anchor, Point::new(640.0, 100.0));
    assert_eq!(overlay.scale, 3.0);
    assert!(overlay.center);
    assert_eq!(overlay.color, None);
}

#[test]
fn color_target_defaults_to_fill_and_background_to_black() {
    let scene = AnimationScene::from_json_str(
        r##"{"duration": 1,
            "objects": [{"id": "a", "kind": "circle", "radius": 1, "fillColor": "#000000"}],
            "animations": [{"objectId": "a", "kind": "color", "duration": 1,
                            "from": "#000000", "to": "#ffffff"}]}"##,
    )
    .unwrap();
    assert_eq!(scene.background_color, "#000000");
    assert!(scene.markup_overlay.is_none());
    let TrackPayload::Color { target, .. } = &scene.animations[0].payload else {
        panic!("expected color track");
    };
    assert_eq!(*target, ColorTarget::Fill);
}

#[test]
fn json_round_trip_preserves_scene() {
    let scene = AnimationScene::from_json_str(DOC).unwrap();
    let json = scene.to_json_pretty().unwrap();
    assert!(json.contains("\"kind\": \"triangle\""));
    assert!(json.contains("\"objectId\": \"tri\""));
    let back = AnimationScene::from_json_str(&json).unwrap();
    assert_eq!(back, scene);
}

#[test]
fn unknown_kind_is_a_serde_error() {
    let err = AnimationScene::from_json_str(
        r##"{"duration": 1, "objects": [{"id": "a", "kind": "hexagon", "fillColor": "#000"}]}"##,
    )
    .unwrap_err();
    assert!(matches!(err, MathreelError::Serde(_)));
}

#[test]
fn missing_file_is_reported_with_path() {
    let err = AnimationScene::from_path(Path::new("/definitely/not/here/scene.json")).unwrap_err();
    assert!(err.to_string().contains("/definitely/not/here/scene.json"));
}
