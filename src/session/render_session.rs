use std::path::{Path, PathBuf};

use crate::animation::ease::Ease;
use crate::encode::ffmpeg::{EncoderConfig, EncoderSession};
use crate::encode::sink::FrameSink;
use crate::eval::timeline::evaluate;
use crate::foundation::color::Rgb8;
use crate::foundation::core::Canvas;
use crate::foundation::error::{MathreelError, MathreelResult};
use crate::markup::compiler::MarkupCompiler;
use crate::markup::model::VectorMarkupModel;
use crate::markup::render::{MarkupRenderOpts, render_markup};
use crate::render::cpu::CpuSurface;
use crate::render::frame::{FrameGenerator, FrameRGBA};
use crate::render::shapes::draw_object;
use crate::render::surface::{DrawSurface, FrameSurface};
use crate::scene::model::AnimationScene;
use crate::scene::validate::ensure_renderable;

/// Options for a [`RenderSession`].
#[derive(Clone, Debug)]
pub struct RenderSessionOpts {
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
    /// Frames per second.
    pub fps: u32,
    /// Global easing applied to frame progress.
    pub easing: Ease,
    /// Encoder speed/quality preset.
    pub preset: String,
    /// Constant rate factor, lower is better quality.
    pub crf: u8,
    /// Encoder executable.
    pub program: String,
    /// Directory for uniquely named outputs when `out_path` is unset.
    pub out_dir: PathBuf,
    /// Explicit output file.
    pub out_path: Option<PathBuf>,
    /// Whether an existing output file may be replaced.
    pub overwrite: bool,
    /// Frames buffered between the renderer and the encoder.
    pub channel_capacity: usize,
    /// Markup foreground when the overlay sets no color.
    pub foreground: Rgb8,
}

impl Default for RenderSessionOpts {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            fps: 30,
            easing: Ease::Linear,
            preset: "medium".to_string(),
            crf: 23,
            program: "ffmpeg".to_string(),
            out_dir: std::env::temp_dir(),
            out_path: None,
            overwrite: true,
            channel_capacity: 2,
            foreground: Rgb8::WHITE,
        }
    }
}

/// Counters reported by [`RenderSession::render_to`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RenderStats {
    /// Frames handed to the sink.
    pub frames_written: u64,
}

struct MarkupLayer {
    model: VectorMarkupModel,
    opts: MarkupRenderOpts,
}

/// A validated scene ready to be rendered.
///
/// Construction runs validation and compiles the markup overlay once; every frame after that is
/// pure evaluation and drawing.
pub struct RenderSession {
    scene: AnimationScene,
    opts: RenderSessionOpts,
    canvas: Canvas,
    background: Rgb8,
    markup: Option<MarkupLayer>,
}

impl std::fmt::Debug for RenderSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderSession")
            .field("canvas", &self.canvas)
            .field("objects", &self.scene.objects.len())
            .field("animations", &self.scene.animations.len())
            .field("markup", &self.markup.is_some())
            .finish_non_exhaustive()
    }
}

impl RenderSession {
    /// Validate `scene` and prepare its markup overlay with `compiler`.
    pub fn new(
        scene: AnimationScene,
        opts: RenderSessionOpts,
        compiler: &dyn MarkupCompiler,
    ) -> MathreelResult<Self> {
        let canvas = Canvas::new(opts.width, opts.height)?;
        if opts.fps == 0 {
            return Err(MathreelError::validation("fps must be > 0"));
        }
        ensure_renderable(&scene)?;

        let background = Rgb8::parse_css(&scene.background_color).ok_or_else(|| {
            MathreelError::validation(format!(
                "backgroundColor '{}' is not a color",
                scene.background_color
            ))
        })?;

        let markup = match &scene.markup_overlay {
            None => None,
            Some(overlay) => {
                let text = compiler.compile(&overlay.source)?;
                let model = VectorMarkupModel::parse(&text)?;
                let foreground = match overlay.color.as_deref() {
                    None => opts.foreground,
                    Some(c) => Rgb8::parse_css(c).ok_or_else(|| {
                        MathreelError::validation(format!("markup color '{c}' is not a color"))
                    })?,
                };
                Some(MarkupLayer {
                    model,
                    opts: MarkupRenderOpts {
                        anchor: overlay.anchor,
                        scale: overlay.scale,
                        center: overlay.center,
                        foreground,
                    },
                })
            }
        };

        Ok(Self {
            scene,
            opts,
            canvas,
            background,
            markup,
        })
    }

    /// Scene being rendered.
    pub fn scene(&self) -> &AnimationScene {
        &self.scene
    }

    /// Output canvas.
    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// Frame loop parameters for this session.
    pub fn frame_generator(&self) -> FrameGenerator {
        FrameGenerator {
            canvas: self.canvas,
            fps: self.opts.fps,
            duration: self.scene.duration,
            easing: self.opts.easing,
            background: self.background,
        }
    }

    /// Draw the scene at `time` onto an already cleared surface.
    ///
    /// Objects draw in declaration order, the markup overlay last.
    pub fn draw(&self, surface: &mut dyn DrawSurface, time: f64) {
        for obj in &self.scene.objects {
            if let Some(state) = evaluate(&self.scene, &obj.id, time) {
                draw_object(surface, obj, &state);
            }
        }
        if let Some(layer) = &self.markup {
            render_markup(&layer.model, &layer.opts, surface);
        }
    }

    /// Rasterize a single frame at `time` seconds.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn render_frame_at(&self, time: f64) -> MathreelResult<FrameRGBA> {
        let mut surface = CpuSurface::new(self.canvas)?;
        surface.clear(self.background);
        self.draw(&mut surface, time);
        Ok(FrameRGBA {
            width: self.canvas.width,
            height: self.canvas.height,
            data: surface.read_rgba8(),
        })
    }

    /// Render every frame into `sink`.
    #[tracing::instrument(skip(self, sink), fields(w = self.canvas.width, h = self.canvas.height, fps = self.opts.fps))]
    pub fn render_to(&self, sink: &mut dyn FrameSink) -> MathreelResult<RenderStats> {
        let generator = self.frame_generator();
        let mut surface = CpuSurface::new(self.canvas)?;
        let frames_written = generator.run(&mut surface, sink, |s, info| {
            self.draw(s, info.time);
            Ok(())
        })?;
        Ok(RenderStats { frames_written })
    }

    /// Render to a video file through the encoder and return its path.
    #[tracing::instrument(skip(self))]
    pub fn render_to_video(&self) -> MathreelResult<PathBuf> {
        let out_path = match &self.opts.out_path {
            Some(p) => p.clone(),
            None => unique_output_path(&self.opts.out_dir),
        };

        let mut cfg = EncoderConfig::new(
            self.canvas.width,
            self.canvas.height,
            self.opts.fps,
            &out_path,
        );
        cfg.preset = self.opts.preset.clone();
        cfg.crf = self.opts.crf;
        cfg.program = self.opts.program.clone();
        cfg.overwrite = self.opts.overwrite;
        cfg.channel_capacity = self.opts.channel_capacity;

        let mut encoder = EncoderSession::new(cfg);
        let stats = self.render_to(&mut encoder)?;
        tracing::info!(
            frames = stats.frames_written,
            out = %out_path.display(),
            "video written"
        );
        Ok(out_path)
    }
}

/// `mathreel_<pid>_<nanos>.mp4` inside `dir`.
pub fn unique_output_path(dir: &Path) -> PathBuf {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0);
    dir.join(format!("mathreel_{}_{nanos}.mp4", std::process::id()))
}

#[cfg(test)]
#[path = "../../tests/unit/session/render_session.rs"]
mod tests;
