use crate::foundation::color::Rgb8;
use crate::foundation::core::{Affine, BezPath, Canvas};

/// Stroke width used when a shape or markup element declares none.
pub const DEFAULT_STROKE_WIDTH: f64 = 1.0;

/// Drawing target for shapes and markup.
///
/// Coordinates are canvas pixels after `transform` is applied (y down).
pub trait DrawSurface {
    /// Fill `path` (non-zero winding) with a solid color.
    fn fill_path(&mut self, path: &BezPath, transform: Affine, color: Rgb8);

    /// Stroke `path` with a solid color. `width` is in the path's local units.
    fn stroke_path(&mut self, path: &BezPath, transform: Affine, color: Rgb8, width: f64);

    /// Draw a single character with a generic system font, baseline at the local origin.
    fn fill_fallback_glyph(&mut self, ch: char, transform: Affine, size_px: f64, color: Rgb8);

    /// Start a group composited with `opacity` when popped.
    fn push_opacity(&mut self, opacity: f64);

    /// Close the innermost opacity group.
    fn pop_opacity(&mut self);
}

/// A [`DrawSurface`] with its own pixels, driven frame by frame.
pub trait FrameSurface: DrawSurface {
    /// Canvas the surface rasterizes.
    fn canvas(&self) -> Canvas;
    /// Start a frame filled with `background`.
    fn clear(&mut self, background: Rgb8);
    /// Finish the frame and return its RGBA8 pixels, row-major.
    fn read_rgba8(&mut self) -> Vec<u8>;
}

/// One call recorded by [`RecordingSurface`].
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCall {
    /// [`DrawSurface::fill_path`].
    FillPath {
        /// Path as passed.
        path: BezPath,
        /// Transform as passed.
        transform: Affine,
        /// Fill color.
        color: Rgb8,
    },
    /// [`DrawSurface::stroke_path`].
    StrokePath {
        /// Path as passed.
        path: BezPath,
        /// Transform as passed.
        transform: Affine,
        /// Stroke color.
        color: Rgb8,
        /// Stroke width.
        width: f64,
    },
    /// [`DrawSurface::fill_fallback_glyph`].
    FallbackGlyph {
        /// Character drawn.
        ch: char,
        /// Transform as passed.
        transform: Affine,
        /// Font size in pixels.
        size_px: f64,
        /// Fill color.
        color: Rgb8,
    },
    /// [`DrawSurface::push_opacity`].
    PushOpacity(f64),
    /// [`DrawSurface::pop_opacity`].
    PopOpacity,
}

/// Surface that records draw calls instead of rasterizing them.
#[derive(Clone, Debug, Default)]
pub struct RecordingSurface {
    /// Calls in issue order.
    pub calls: Vec<DrawCall>,
}

impl RecordingSurface {
    /// Empty recorder.
    pub fn new() -> Self {
        Self::default()
    }
}

impl DrawSurface for RecordingSurface {
    fn fill_path(&mut self, path: &BezPath, transform: Affine, color: Rgb8) {
        self.calls.push(DrawCall::FillPath {
            path: path.clone(),
            transform,
            color,
        });
    }

    fn stroke_path(&mut self, path: &BezPath, transform: Affine, color: Rgb8, width: f64) {
        self.calls.push(DrawCall::StrokePath {
            path: path.clone(),
            transform,
            color,
            width,
        });
    }

    fn fill_fallback_glyph(&mut self, ch: char, transform: Affine, size_px: f64, color: Rgb8) {
        self.calls.push(DrawCall::FallbackGlyph {
            ch,
            transform,
            size_px,
            color,
        });
    }

    fn push_opacity(&mut self, opacity: f64) {
        self.calls.push(DrawCall::PushOpacity(opacity));
    }

    fn pop_opacity(&mut self) {
        self.calls.push(DrawCall::PopOpacity);
    }
}
