use crate::foundation::error::{MathreelError, MathreelResult};

pub use kurbo::{Affine, BezPath, PathEl, Point, Rect, Vec2};

/// Output canvas dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Canvas {
    /// Create a validated canvas.
    ///
    /// Dimensions must be non-zero and fit the rasterizer's `u16` surface limit.
    pub fn new(width: u32, height: u32) -> MathreelResult<Self> {
        if width == 0 || height == 0 {
            return Err(MathreelError::validation(
                "canvas width/height must be non-zero",
            ));
        }
        if width > u32::from(u16::MAX) || height > u32::from(u16::MAX) {
            return Err(MathreelError::validation(format!(
                "canvas {width}x{height} exceeds the maximum surface size of {}",
                u16::MAX
            )));
        }
        Ok(Self { width, height })
    }

    /// Number of pixels on the canvas.
    pub fn pixel_count(self) -> usize {
        (self.width as usize) * (self.height as usize)
    }

    /// Size in bytes of one RGB24 frame.
    pub fn rgb_frame_len(self) -> usize {
        self.pixel_count() * 3
    }

    /// Size in bytes of one RGBA8 frame.
    pub fn rgba_frame_len(self) -> usize {
        self.pixel_count() * 4
    }
}

/// 2D transform without shear: translation, rotation (radians) and per-axis scale.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Transform2D {
    /// Translation in pixels.
    pub translate: Vec2,
    /// Rotation in radians, clockwise in y-down canvas space.
    pub rotate: f64,
    /// Per-axis scale.
    pub scale: Vec2,
}

impl Default for Transform2D {
    fn default() -> Self {
        Self {
            translate: Vec2::ZERO,
            rotate: 0.0,
            scale: Vec2::new(1.0, 1.0),
        }
    }
}

impl Transform2D {
    /// Compose into an affine matrix: `T(translate) * R(rotate) * S(scale)`.
    pub fn to_affine(self) -> Affine {
        Affine::translate(self.translate)
            * Affine::rotate(self.rotate)
            * Affine::scale_non_uniform(self.scale.x, self.scale.y)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
