use std::io::{Read, Write as _};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStderr, ChildStdin, Command, Stdio};
use std::sync::mpsc;
use std::thread::JoinHandle;

use crate::encode::sink::{FrameSink, SinkConfig};
use crate::foundation::core::Canvas;
use crate::foundation::error::{MathreelError, MathreelResult};

/// Declared parameters of one encode.
#[derive(Clone, Debug, PartialEq)]
pub struct EncoderConfig {
    /// Frame width in pixels (even).
    pub width: u32,
    /// Frame height in pixels (even).
    pub height: u32,
    /// Frames per second.
    pub fps: u32,
    /// x264 preset, e.g. `medium`.
    pub preset: String,
    /// x264 constant rate factor (0-51, lower is better).
    pub crf: u8,
    /// Output video path.
    pub out_path: PathBuf,
    /// Overwrite an existing output file.
    pub overwrite: bool,
    /// Encoder executable.
    pub program: String,
    /// Frames buffered between the caller and the encoder's stdin before `write_frame` blocks.
    pub channel_capacity: usize,
}

impl EncoderConfig {
    /// Defaults for an encode of `width x height` at `fps` into `out_path`.
    pub fn new(width: u32, height: u32, fps: u32, out_path: impl Into<PathBuf>) -> Self {
        Self {
            width,
            height,
            fps,
            preset: "medium".to_string(),
            crf: 23,
            out_path: out_path.into(),
            overwrite: true,
            program: "ffmpeg".to_string(),
            channel_capacity: 2,
        }
    }

    /// Reject parameters the encoder cannot honor.
    pub fn validate(&self) -> MathreelResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(MathreelError::validation(
                "encoder width/height must be non-zero",
            ));
        }
        if !self.width.is_multiple_of(2) || !self.height.is_multiple_of(2) {
            return Err(MathreelError::validation(
                "encoder width/height must be even (required for yuv420p mp4 output)",
            ));
        }
        if self.fps == 0 {
            return Err(MathreelError::validation("encoder fps must be non-zero"));
        }
        if self.crf > 51 {
            return Err(MathreelError::validation("encoder crf must be in 0..=51"));
        }
        if self.preset.trim().is_empty() {
            return Err(MathreelError::validation("encoder preset must be non-empty"));
        }
        Ok(())
    }

    /// Size in bytes of one RGB24 frame.
    pub fn frame_len(&self) -> usize {
        Canvas {
            width: self.width,
            height: self.height,
        }
        .rgb_frame_len()
    }
}

/// Encoder command-line arguments (without the program name).
///
/// Input is raw RGB24 on stdin; output is H.264 in yuv420p with the moov atom up front.
pub fn ffmpeg_args(cfg: &EncoderConfig) -> Vec<String> {
    let mut args: Vec<String> = Vec::new();
    args.push(if cfg.overwrite { "-y" } else { "-n" }.to_string());
    args.extend(
        [
            "-loglevel",
            "error",
            "-f",
            "rawvideo",
            "-pix_fmt",
            "rgb24",
            "-s",
        ]
        .map(String::from),
    );
    args.push(format!("{}x{}", cfg.width, cfg.height));
    // For rawvideo input `-r` must come before `-i`.
    args.push("-r".to_string());
    args.push(cfg.fps.to_string());
    args.extend(["-i", "pipe:0", "-an", "-c:v", "libx264", "-preset"].map(String::from));
    args.push(cfg.preset.clone());
    args.push("-crf".to_string());
    args.push(cfg.crf.to_string());
    args.extend(["-pix_fmt", "yuv420p", "-movflags", "+faststart"].map(String::from));
    args.push(cfg.out_path.to_string_lossy().into_owned());
    args
}

/// Lifecycle of an [`EncoderSession`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    /// Configured, no process yet.
    Created,
    /// Process running and accepting frames.
    Started,
    /// Input closed and the process exited successfully.
    Finished,
    /// Terminated on an error path; partial output removed.
    Killed,
}

/// One encoder subprocess fed with raw frames.
///
/// Frames go through a bounded channel to a writer thread that owns the process's stdin, so
/// [`EncoderSession::write_frame`] blocks while the encoder is behind and fails with the first
/// write error. Not reusable: after `finish` or `kill` the session is spent. Dropping a started
/// session kills the process.
pub struct EncoderSession {
    cfg: EncoderConfig,
    state: SessionState,
    child: Option<Child>,
    frames_tx: Option<mpsc::SyncSender<Vec<u8>>>,
    writer: Option<JoinHandle<std::io::Result<()>>>,
    stderr_drain: Option<JoinHandle<std::io::Result<Vec<u8>>>>,
    frames_written: u64,
}

impl std::fmt::Debug for EncoderSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EncoderSession")
            .field("cfg", &self.cfg)
            .field("state", &self.state)
            .field("frames_written", &self.frames_written)
            .finish_non_exhaustive()
    }
}

impl EncoderSession {
    /// Create a session; nothing is spawned until [`EncoderSession::start`].
    pub fn new(cfg: EncoderConfig) -> Self {
        Self {
            cfg,
            state: SessionState::Created,
            child: None,
            frames_tx: None,
            writer: None,
            stderr_drain: None,
            frames_written: 0,
        }
    }

    /// Declared configuration.
    pub fn config(&self) -> &EncoderConfig {
        &self.cfg
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Frames accepted so far.
    pub fn frames_written(&self) -> u64 {
        self.frames_written
    }

    /// Validate the configuration and spawn the encoder.
    pub fn start(&mut self) -> MathreelResult<()> {
        self.cfg.validate()?;
        ensure_parent_dir(&self.cfg.out_path)?;
        if !self.cfg.overwrite && self.cfg.out_path.exists() {
            return Err(MathreelError::validation(format!(
                "output file '{}' already exists",
                self.cfg.out_path.display()
            )));
        }

        let mut cmd = Command::new(&self.cfg.program);
        cmd.args(ffmpeg_args(&self.cfg));
        self.start_with(cmd)
    }

    /// Spawn `cmd` as the encoder process. Its stdin receives the frames.
    pub(crate) fn start_with(&mut self, mut cmd: Command) -> MathreelResult<()> {
        if self.state != SessionState::Created {
            return Err(MathreelError::encode(format!(
                "encoder session cannot start from state {:?}",
                self.state
            )));
        }

        cmd.stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());
        let mut child = cmd.spawn().map_err(|e| {
            MathreelError::encode(format!(
                "failed to spawn '{}' (is it installed and on PATH?): {e}",
                self.cfg.program
            ))
        })?;

        let (mut stdin, mut stderr) = take_pipes(&mut child)?;
        let stderr_drain = std::thread::spawn(move || {
            let mut stderr_bytes = Vec::new();
            stderr.read_to_end(&mut stderr_bytes)?;
            Ok(stderr_bytes)
        });

        let (tx, rx) = mpsc::sync_channel::<Vec<u8>>(self.cfg.channel_capacity.max(1));
        let writer = std::thread::spawn(move || -> std::io::Result<()> {
            for frame in rx {
                stdin.write_all(&frame)?;
            }
            stdin.flush()
        });

        tracing::debug!(
            program = %self.cfg.program,
            out = %self.cfg.out_path.display(),
            width = self.cfg.width,
            height = self.cfg.height,
            fps = self.cfg.fps,
            "encoder started"
        );
        self.child = Some(child);
        self.frames_tx = Some(tx);
        self.writer = Some(writer);
        self.stderr_drain = Some(stderr_drain);
        self.state = SessionState::Started;
        Ok(())
    }

    /// Queue one RGB24 frame, blocking while the encoder is behind.
    pub fn write_frame(&mut self, rgb: &[u8]) -> MathreelResult<()> {
        if self.state != SessionState::Started {
            return Err(MathreelError::encode(format!(
                "cannot write frames in state {:?}",
                self.state
            )));
        }
        if rgb.len() != self.cfg.frame_len() {
            return Err(MathreelError::validation(format!(
                "frame size mismatch: got {} bytes, expected {} ({}x{} rgb24)",
                rgb.len(),
                self.cfg.frame_len(),
                self.cfg.width,
                self.cfg.height
            )));
        }
        let tx = self
            .frames_tx
            .as_ref()
            .ok_or_else(|| MathreelError::encode("encoder input already closed"))?;

        if tx.send(rgb.to_vec()).is_err() {
            // The writer thread has exited; surface its error.
            self.frames_tx = None;
            let err = match self.writer.take().map(JoinHandle::join) {
                Some(Ok(Err(e))) => format!("failed to write frame to encoder stdin: {e}"),
                Some(Err(_)) => "encoder writer thread panicked".to_string(),
                _ => "encoder stopped accepting frames".to_string(),
            };
            return Err(MathreelError::encode(err));
        }
        self.frames_written += 1;
        Ok(())
    }

    /// Close the input, wait for the encoder to exit and check its status.
    ///
    /// A non-zero exit yields [`MathreelError::EncoderExit`] with the captured stderr, and the
    /// partial output file is removed.
    pub fn finish(&mut self) -> MathreelResult<()> {
        if self.state != SessionState::Started {
            return Err(MathreelError::encode(format!(
                "cannot finish encoder in state {:?}",
                self.state
            )));
        }

        drop(self.frames_tx.take());
        let write_res = match self.writer.take().map(JoinHandle::join) {
            Some(Ok(res)) => res.map_err(|e| e.to_string()),
            Some(Err(_)) => Err("encoder writer thread panicked".to_string()),
            None => Ok(()),
        };

        let mut child = self
            .child
            .take()
            .ok_or_else(|| MathreelError::encode("encoder process missing (unexpected)"))?;
        let status = child.wait().map_err(|e| {
            MathreelError::encode(format!("failed to wait for encoder to finish: {e}"))
        })?;
        let stderr_bytes = self.join_stderr()?;

        if !status.success() {
            self.state = SessionState::Killed;
            remove_partial(&self.cfg.out_path);
            return Err(MathreelError::EncoderExit {
                code: status.code(),
                stderr: String::from_utf8_lossy(&stderr_bytes).trim().to_string(),
            });
        }
        if let Err(e) = write_res {
            self.state = SessionState::Killed;
            remove_partial(&self.cfg.out_path);
            return Err(MathreelError::encode(format!(
                "failed to write frames to encoder stdin: {e}"
            )));
        }

        self.state = SessionState::Finished;
        tracing::debug!(frames = self.frames_written, "encoder finished");
        Ok(())
    }

    /// Terminate the encoder and remove partial output. Safe to call in any state.
    pub fn kill(&mut self) {
        if self.state != SessionState::Started {
            return;
        }
        drop(self.frames_tx.take());
        if let Some(mut child) = self.child.take() {
            let _ = child.kill();
            let _ = child.wait();
        }
        if let Some(writer) = self.writer.take() {
            let _ = writer.join();
        }
        let _ = self.join_stderr();
        remove_partial(&self.cfg.out_path);
        self.state = SessionState::Killed;
        tracing::debug!(frames = self.frames_written, "encoder killed");
    }

    fn join_stderr(&mut self) -> MathreelResult<Vec<u8>> {
        match self.stderr_drain.take() {
            Some(handle) => handle
                .join()
                .map_err(|_| MathreelError::encode("encoder stderr drain thread panicked"))?
                .map_err(|e| MathreelError::encode(format!("encoder stderr read failed: {e}"))),
            None => Ok(Vec::new()),
        }
    }
}

impl Drop for EncoderSession {
    fn drop(&mut self) {
        self.kill();
    }
}

impl FrameSink for EncoderSession {
    fn begin(&mut self, cfg: &SinkConfig) -> MathreelResult<()> {
        if cfg.width != self.cfg.width || cfg.height != self.cfg.height || cfg.fps != self.cfg.fps
        {
            return Err(MathreelError::validation(format!(
                "sink geometry {}x{}@{} does not match encoder {}x{}@{}",
                cfg.width, cfg.height, cfg.fps, self.cfg.width, self.cfg.height, self.cfg.fps
            )));
        }
        self.start()
    }

    fn write_frame(&mut self, rgb: &[u8]) -> MathreelResult<()> {
        EncoderSession::write_frame(self, rgb)
    }

    fn finish(&mut self) -> MathreelResult<()> {
        EncoderSession::finish(self)
    }

    fn kill(&mut self) {
        EncoderSession::kill(self);
    }
}

/// Take the child's stdin and stderr, killing and reaping it when either is missing.
fn take_pipes(child: &mut Child) -> MathreelResult<(ChildStdin, ChildStderr)> {
    match (child.stdin.take(), child.stderr.take()) {
        (Some(stdin), Some(stderr)) => Ok((stdin, stderr)),
        _ => {
            let _ = child.kill();
            let _ = child.wait();
            Err(MathreelError::encode(
                "failed to open encoder stdin/stderr pipes",
            ))
        }
    }
}

fn remove_partial(path: &Path) {
    if path.exists()
        && let Err(e) = std::fs::remove_file(path)
    {
        tracing::warn!(path = %path.display(), "failed to remove partial output: {e}");
    }
}

/// Ensure the parent directory of `path` exists.
pub fn ensure_parent_dir(path: &Path) -> MathreelResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        use anyhow::Context as _;
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

/// Return `true` when `program -version` runs successfully.
pub fn is_encoder_available(program: &str) -> bool {
    Command::new(program)
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

#[cfg(test)]
#[path = "../../tests/unit/encode/ffmpeg.rs"]
mod tests;
