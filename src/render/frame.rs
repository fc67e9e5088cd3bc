use crate::animation::ease::Ease;
use crate::encode::sink::{FrameSink, SinkConfig};
use crate::foundation::color::Rgb8;
use crate::foundation::core::Canvas;
use crate::foundation::error::{MathreelError, MathreelResult};
use crate::render::surface::FrameSurface;

/// A rendered frame (straight RGBA8, row-major).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRGBA {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// `width * height * 4` bytes.
    pub data: Vec<u8>,
}

/// Timing of one frame, handed to the per-frame draw callback.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameInfo {
    /// Zero-based frame index.
    pub index: u64,
    /// Scene time in seconds, derived from raw (not eased) progress.
    pub time: f64,
    /// `index / (total - 1)`, or 0 for a single-frame render.
    pub progress: f64,
    /// `progress` through the global easing.
    pub eased_progress: f64,
}

/// Drives the rasterize-and-stream loop for one render.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameGenerator {
    /// Output canvas.
    pub canvas: Canvas,
    /// Frames per second.
    pub fps: u32,
    /// Scene duration in seconds.
    pub duration: f64,
    /// Global easing applied to progress.
    pub easing: Ease,
    /// Clear color for every frame.
    pub background: Rgb8,
}

impl FrameGenerator {
    /// Number of frames: the frame indices in `[0, fps * duration)`.
    pub fn total_frames(&self) -> u64 {
        let exact = f64::from(self.fps) * self.duration;
        if !exact.is_finite() || exact <= 0.0 {
            return 0;
        }
        // Tolerate float noise so that e.g. 30 * 0.1 still yields 3 frames.
        (exact - 1e-9).ceil() as u64
    }

    /// Timing for frame `index`.
    pub fn frame_info(&self, index: u64) -> FrameInfo {
        let total = self.total_frames();
        let progress = if total <= 1 {
            0.0
        } else {
            index as f64 / (total - 1) as f64
        };
        FrameInfo {
            index,
            time: progress * self.duration,
            progress,
            eased_progress: self.easing.apply(progress),
        }
    }

    /// Render every frame into `sink`.
    ///
    /// Per frame: clear `surface`, call `draw`, read back, drop alpha, write. After the last frame
    /// the sink is finished. Any failure after `begin` kills the sink before the error is
    /// returned. Returns the number of frames written.
    pub fn run<S, F>(
        &self,
        surface: &mut S,
        sink: &mut dyn FrameSink,
        mut draw: F,
    ) -> MathreelResult<u64>
    where
        S: FrameSurface + ?Sized,
        F: FnMut(&mut S, &FrameInfo) -> MathreelResult<()>,
    {
        if surface.canvas() != self.canvas {
            return Err(MathreelError::validation(format!(
                "surface canvas {}x{} does not match render canvas {}x{}",
                surface.canvas().width,
                surface.canvas().height,
                self.canvas.width,
                self.canvas.height
            )));
        }

        sink.begin(&SinkConfig {
            width: self.canvas.width,
            height: self.canvas.height,
            fps: self.fps,
        })?;

        match self.stream(surface, sink, &mut draw) {
            Ok(frames) => {
                sink.finish()?;
                tracing::debug!(frames, "render finished");
                Ok(frames)
            }
            Err(e) => {
                tracing::debug!(error = %e, "render failed, killing sink");
                sink.kill();
                Err(e)
            }
        }
    }

    fn stream<S, F>(
        &self,
        surface: &mut S,
        sink: &mut dyn FrameSink,
        draw: &mut F,
    ) -> MathreelResult<u64>
    where
        S: FrameSurface + ?Sized,
        F: FnMut(&mut S, &FrameInfo) -> MathreelResult<()>,
    {
        let total = self.total_frames();
        let expected = self.canvas.rgba_frame_len();
        let mut rgb = Vec::with_capacity(self.canvas.rgb_frame_len());

        for index in 0..total {
            let info = self.frame_info(index);
            surface.clear(self.background);
            draw(&mut *surface, &info)?;

            let rgba = surface.read_rgba8();
            if rgba.len() != expected {
                return Err(MathreelError::evaluation(format!(
                    "frame {index} has {} bytes, expected {expected}",
                    rgba.len()
                )));
            }
            rgba_to_rgb_into(&rgba, &mut rgb);
            sink.write_frame(&rgb)?;
        }
        Ok(total)
    }
}

/// Drop the alpha channel: every 4th byte of an RGBA buffer.
pub fn rgba_to_rgb(rgba: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(rgba.len() / 4 * 3);
    rgba_to_rgb_into(rgba, &mut out);
    out
}

fn rgba_to_rgb_into(rgba: &[u8], out: &mut Vec<u8>) {
    out.clear();
    for px in rgba.chunks_exact(4) {
        out.extend_from_slice(&px[..3]);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/frame.rs"]
mod tests;
