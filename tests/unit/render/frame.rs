use super::*;
use crate::encode::sink::InMemorySink;
use crate::foundation::core::{Affine, BezPath};
use crate::render::surface::DrawSurface;

/// Solid-color surface: `clear` fills, draw calls are counted but not rasterized.
struct SolidSurface {
    canvas: Canvas,
    color: Rgb8,
    draws: usize,
}

impl SolidSurface {
    fn new(width: u32, height: u32) -> Self {
        Self {
            canvas: Canvas { width, height },
            color: Rgb8::BLACK,
            draws: 0,
        }
    }
}

impl DrawSurface for SolidSurface {
    fn fill_path(&mut self, _: &BezPath, _: Affine, color: Rgb8) {
        self.color = color;
        self.draws += 1;
    }
    fn stroke_path(&mut self, _: &BezPath, _: Affine, _: Rgb8, _: f64) {
        self.draws += 1;
    }
    fn fill_fallback_glyph(&mut self, _: char, _: Affine, _: f64, _: Rgb8) {}
    fn push_opacity(&mut self, _: f64) {}
    fn pop_opacity(&mut self) {}
}

impl FrameSurface for SolidSurface {
    fn canvas(&self) -> Canvas {
        self.canvas
    }
    fn clear(&mut self, background: Rgb8) {
        self.color = background;
    }
    fn read_rgba8(&mut self) -> Vec<u8> {
        let px = [self.color.r, self.color.g, self.color.b, 255];
        px.repeat(self.canvas.pixel_count())
    }
}

fn generator(fps: u32, duration: f64) -> FrameGenerator {
    FrameGenerator {
        canvas: Canvas {
            width: 2,
            height: 2,
        },
        fps,
        duration,
        easing: Ease::Linear,
        background: Rgb8::new(10, 20, 30),
    }
}

#[test]
fn rgba_to_rgb_drops_alpha() {
    assert_eq!(
        rgba_to_rgb(&[255, 0, 0, 255, 0, 255, 0, 128]),
        vec![255, 0, 0, 0, 255, 0]
    );
    assert!(rgba_to_rgb(&[]).is_empty());
}

#[test]
fn total_frames_rounds_up_and_tolerates_float_noise() {
    assert_eq!(generator(10, 1.0).total_frames(), 10);
    assert_eq!(generator(30, 0.1).total_frames(), 3);
    assert_eq!(generator(10, 0.25).total_frames(), 3);
    assert_eq!(generator(10, 0.0).total_frames(), 0);
}

#[test]
fn frame_info_spans_zero_to_duration() {
    let g = generator(10, 1.0);
    let first = g.frame_info(0);
    let last = g.frame_info(9);
    assert_eq!(first.progress, 0.0);
    assert_eq!(first.time, 0.0);
    assert_eq!(last.progress, 1.0);
    assert_eq!(last.time, 1.0);

    let mid = g.frame_info(3);
    assert!((mid.progress - 1.0 / 3.0).abs() < 1e-12);
    assert_eq!(mid.eased_progress, mid.progress);
}

#[test]
fn single_frame_has_zero_progress() {
    let g = generator(1, 1.0);
    assert_eq!(g.total_frames(), 1);
    assert_eq!(g.frame_info(0).progress, 0.0);
}

#[test]
fn eased_progress_uses_global_easing_but_time_does_not() {
    let mut g = generator(10, 2.0);
    g.easing = Ease::EaseIn;
    let info = g.frame_info(5);
    assert!((info.time - 2.0 * 5.0 / 19.0).abs() < 1e-12);
    assert!(info.eased_progress < info.progress);
}

#[test]
fn run_streams_every_frame_and_finishes() {
    let g = generator(10, 1.0);
    let mut surface = SolidSurface::new(2, 2);
    let mut sink = InMemorySink::new();
    let mut seen = Vec::new();

    let frames = g
        .run(&mut surface, &mut sink, |s, info| {
            seen.push(info.index);
            if info.index == 9 {
                s.fill_path(&BezPath::new(), Affine::IDENTITY, Rgb8::WHITE);
            }
            Ok(())
        })
        .unwrap();

    assert_eq!(frames, 10);
    assert_eq!(seen, (0..10).collect::<Vec<_>>());
    assert!(sink.finished);
    assert!(!sink.killed);
    assert_eq!(sink.frames.len(), 10);
    assert_eq!(sink.frames[0], [10u8, 20, 30].repeat(4));
    assert_eq!(sink.frames[9], vec![255; 12]);
    assert_eq!(
        sink.config(),
        Some(SinkConfig {
            width: 2,
            height: 2,
            fps: 10
        })
    );
}

#[test]
fn sink_failure_kills_and_propagates() {
    let g = generator(10, 1.0);
    let mut surface = SolidSurface::new(2, 2);
    let mut sink = InMemorySink::failing_after(3);

    let err = g.run(&mut surface, &mut sink, |_, _| Ok(())).unwrap_err();
    assert!(matches!(err, MathreelError::Encode(_)));
    assert!(sink.killed);
    assert!(!sink.finished);
}

#[test]
fn draw_failure_kills_sink() {
    let g = generator(10, 1.0);
    let mut surface = SolidSurface::new(2, 2);
    let mut sink = InMemorySink::new();

    let err = g
        .run(&mut surface, &mut sink, |_, info| {
            if info.index == 4 {
                Err(MathreelError::evaluation("boom"))
            } else {
                Ok(())
            }
        })
        .unwrap_err();
    assert!(err.to_string().contains("boom"));
    assert!(sink.killed);
    assert!(sink.frames.is_empty());
}

#[test]
fn mismatched_surface_is_rejected_before_begin() {
    let g = generator(10, 1.0);
    let mut surface = SolidSurface::new(4, 2);
    let mut sink = InMemorySink::new();

    assert!(g.run(&mut surface, &mut sink, |_, _| Ok(())).is_err());
    assert_eq!(sink.config(), None);
    assert_eq!(surface.draws, 0);
}
