use super::*;
use crate::encode::sink::InMemorySink;
use crate::foundation::core::Point;
use crate::markup::compiler::PassthroughCompiler;
use crate::render::surface::{DrawCall, RecordingSurface};
use crate::scene::model::{
    AnimationTrack, MarkupOverlay, ScaleValue, SceneObject, ShapeKind, TrackPayload,
};

fn scene() -> AnimationScene {
    AnimationScene {
        duration: 1.0,
        objects: vec![SceneObject {
            id: "dot".to_string(),
            shape: ShapeKind::Circle { radius: 4.0 },
            fill_color: "#ff0000".to_string(),
            stroke_color: None,
            stroke_width: None,
            initial_position: Point::new(8.0, 8.0),
            initial_rotation: 0.0,
            initial_scale: ScaleValue::default(),
            initial_opacity: 1.0,
        }],
        animations: vec![],
        markup_overlay: None,
        background_color: "#000010".to_string(),
    }
}

fn opts() -> RenderSessionOpts {
    RenderSessionOpts {
        width: 16,
        height: 16,
        fps: 10,
        ..RenderSessionOpts::default()
    }
}

fn pixel(frame: &FrameRGBA, x: u32, y: u32) -> [u8; 4] {
    let i = ((y * frame.width + x) * 4) as usize;
    [
        frame.data[i],
        frame.data[i + 1],
        frame.data[i + 2],
        frame.data[i + 3],
    ]
}

struct FailingCompiler;

impl MarkupCompiler for FailingCompiler {
    fn compile(&self, _: &str) -> MathreelResult<String> {
        Err(MathreelError::markup("compiler unavailable"))
    }
}

#[test]
fn defaults_match_documented_values() {
    let o = RenderSessionOpts::default();
    assert_eq!((o.width, o.height, o.fps), (1280, 720, 30));
    assert_eq!(o.easing, Ease::Linear);
    assert_eq!((o.preset.as_str(), o.crf), ("medium", 23));
    assert_eq!(o.program, "ffmpeg");
    assert_eq!(o.channel_capacity, 2);
    assert!(o.out_path.is_none());
}

#[test]
fn invalid_scene_is_rejected() {
    let mut s = scene();
    s.animations.push(AnimationTrack {
        object_id: "ghost".to_string(),
        start_time: 0.0,
        duration: 1.0,
        easing: Ease::Linear,
        payload: TrackPayload::Fade { from: 1.0, to: 0.0 },
    });
    let err = RenderSession::new(s, opts(), &PassthroughCompiler).unwrap_err();
    assert!(matches!(err, MathreelError::Validation(_)));
    assert!(err.to_string().contains("ghost"));
}

#[test]
fn zero_canvas_and_fps_are_rejected() {
    let mut o = opts();
    o.width = 0;
    assert!(RenderSession::new(scene(), o, &PassthroughCompiler).is_err());

    let mut o = opts();
    o.fps = 0;
    assert!(RenderSession::new(scene(), o, &PassthroughCompiler).is_err());
}

#[test]
fn compiler_failure_surfaces_as_markup_error() {
    let mut s = scene();
    s.markup_overlay = Some(MarkupOverlay {
        source: "x^2".to_string(),
        anchor: Point::ZERO,
        scale: 1.0,
        center: true,
        color: None,
    });
    let err = RenderSession::new(s, opts(), &FailingCompiler).unwrap_err();
    assert!(matches!(err, MathreelError::Markup(_)));
}

#[test]
fn draw_puts_objects_before_markup() {
    let mut s = scene();
    s.markup_overlay = Some(MarkupOverlay {
        source: r##"<svg><rect x="0" y="0" width="2" height="2" fill="#00ff00"/></svg>"##
            .to_string(),
        anchor: Point::ZERO,
        scale: 1.0,
        center: false,
        color: None,
    });
    let session = RenderSession::new(s, opts(), &PassthroughCompiler).unwrap();

    let mut rec = RecordingSurface::new();
    session.draw(&mut rec, 0.0);
    assert_eq!(rec.calls.len(), 2);
    let DrawCall::FillPath { color, .. } = &rec.calls[0] else {
        panic!("expected object fill first");
    };
    assert_eq!(*color, Rgb8::new(255, 0, 0));
    let DrawCall::FillPath { color, .. } = &rec.calls[1] else {
        panic!("expected markup rect second");
    };
    assert_eq!(*color, Rgb8::new(0, 255, 0));
}

#[test]
fn render_frame_at_rasterizes_scene() {
    let mut s = scene();
    s.markup_overlay = Some(MarkupOverlay {
        source: r##"<svg><rect x="0" y="0" width="3" height="3" fill="currentColor"/></svg>"##
            .to_string(),
        anchor: Point::ZERO,
        scale: 1.0,
        center: false,
        color: Some("#0000ff".to_string()),
    });
    let session = RenderSession::new(s, opts(), &PassthroughCompiler).unwrap();
    let frame = session.render_frame_at(0.0).unwrap();

    assert_eq!((frame.width, frame.height), (16, 16));
    assert_eq!(frame.data.len(), 16 * 16 * 4);
    assert_eq!(pixel(&frame, 8, 8), [255, 0, 0, 255]);
    assert_eq!(pixel(&frame, 15, 15), [0, 0, 16, 255]);
    assert_eq!(pixel(&frame, 1, 1), [0, 0, 255, 255]);
}

#[test]
fn moving_object_is_sampled_at_frame_time() {
    let mut s = scene();
    s.animations.push(AnimationTrack {
        object_id: "dot".to_string(),
        start_time: 0.0,
        duration: 1.0,
        easing: Ease::Linear,
        payload: TrackPayload::Move {
            from: Point::new(4.0, 8.0),
            to: Point::new(12.0, 8.0),
        },
    });
    let session = RenderSession::new(s, opts(), &PassthroughCompiler).unwrap();

    let start = session.render_frame_at(0.0).unwrap();
    let end = session.render_frame_at(1.0).unwrap();
    assert_eq!(pixel(&start, 3, 8), [255, 0, 0, 255]);
    assert_eq!(pixel(&start, 12, 8)[0], 0);
    assert_eq!(pixel(&end, 12, 8), [255, 0, 0, 255]);
    assert_eq!(pixel(&end, 3, 8)[0], 0);
}

#[test]
fn one_second_at_ten_fps_writes_ten_rgb_frames() {
    let session = RenderSession::new(scene(), opts(), &PassthroughCompiler).unwrap();
    let mut sink = InMemorySink::new();
    let stats = session.render_to(&mut sink).unwrap();

    assert_eq!(stats.frames_written, 10);
    assert_eq!(sink.frames.len(), 10);
    assert!(sink.finished);
    assert!(sink.frames.iter().all(|f| f.len() == 16 * 16 * 3));
    let centre = (8 * 16 + 8) * 3;
    assert_eq!(&sink.frames[0][centre..centre + 3], &[255, 0, 0]);
}

#[test]
fn sink_failure_kills_render() {
    let session = RenderSession::new(scene(), opts(), &PassthroughCompiler).unwrap();
    let mut sink = InMemorySink::failing_after(2);
    assert!(session.render_to(&mut sink).is_err());
    assert!(sink.killed);
    assert!(!sink.finished);
}

#[test]
fn unique_output_paths_live_in_dir() {
    let dir = std::path::Path::new("out");
    let p = unique_output_path(dir);
    assert_eq!(p.parent(), Some(dir));
    let name = p.file_name().unwrap().to_str().unwrap();
    assert!(name.starts_with(&format!("mathreel_{}_", std::process::id())));
    assert!(name.ends_with(".mp4"));
}
