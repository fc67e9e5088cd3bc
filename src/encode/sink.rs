use crate::foundation::core::Canvas;
use crate::foundation::error::{MathreelError, MathreelResult};

/// Stream parameters announced to a [`FrameSink`] before the first frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SinkConfig {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Frames per second.
    pub fps: u32,
}

impl SinkConfig {
    /// Size in bytes of one RGB24 frame.
    pub fn frame_len(&self) -> usize {
        Canvas {
            width: self.width,
            height: self.height,
        }
        .rgb_frame_len()
    }
}

/// Consumer of RGB24 frames in timeline order.
///
/// Lifecycle: `begin` once, `write_frame` per frame, then exactly one of `finish` (success) or
/// `kill` (any failure on the producing side).
pub trait FrameSink {
    /// Prepare for frames with the given geometry.
    fn begin(&mut self, cfg: &SinkConfig) -> MathreelResult<()>;
    /// Accept one frame of `width * height * 3` bytes. May block for backpressure.
    fn write_frame(&mut self, rgb: &[u8]) -> MathreelResult<()>;
    /// Flush and finalize the output.
    fn finish(&mut self) -> MathreelResult<()>;
    /// Abort and discard any partial output. Must not fail.
    fn kill(&mut self);
}

/// In-memory sink for tests and debugging.
#[derive(Debug, Default)]
pub struct InMemorySink {
    cfg: Option<SinkConfig>,
    /// Frames in write order.
    pub frames: Vec<Vec<u8>>,
    /// `finish` was called.
    pub finished: bool,
    /// `kill` was called.
    pub killed: bool,
    fail_after: Option<usize>,
}

impl InMemorySink {
    /// Create a new in-memory sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sink whose `write_frame` fails once `n` frames have been accepted.
    pub fn failing_after(n: usize) -> Self {
        Self {
            fail_after: Some(n),
            ..Self::default()
        }
    }

    /// Configuration captured in `begin`, if any.
    pub fn config(&self) -> Option<SinkConfig> {
        self.cfg
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, cfg: &SinkConfig) -> MathreelResult<()> {
        self.cfg = Some(*cfg);
        self.frames.clear();
        self.finished = false;
        self.killed = false;
        Ok(())
    }

    fn write_frame(&mut self, rgb: &[u8]) -> MathreelResult<()> {
        let cfg = self
            .cfg
            .ok_or_else(|| MathreelError::encode("in-memory sink not started"))?;
        if rgb.len() != cfg.frame_len() {
            return Err(MathreelError::validation(format!(
                "frame size mismatch: got {} bytes, expected {}",
                rgb.len(),
                cfg.frame_len()
            )));
        }
        if self.fail_after.is_some_and(|n| self.frames.len() >= n) {
            return Err(MathreelError::encode("in-memory sink refused frame"));
        }
        self.frames.push(rgb.to_vec());
        Ok(())
    }

    fn finish(&mut self) -> MathreelResult<()> {
        if self.cfg.is_none() {
            return Err(MathreelError::encode("in-memory sink not started"));
        }
        self.finished = true;
        Ok(())
    }

    fn kill(&mut self) {
        self.killed = true;
        self.frames.clear();
    }
}
