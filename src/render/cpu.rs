use std::borrow::Cow;
use std::collections::HashMap;

use crate::foundation::color::Rgb8;
use crate::foundation::core::{Affine, BezPath, Canvas, PathEl, Point};
use crate::foundation::error::{MathreelError, MathreelResult};
use crate::render::surface::{DrawSurface, FrameSurface};

/// Rasterizing [`DrawSurface`] backed by `vello_cpu`.
///
/// One render context and pixmap are reused for every frame: [`FrameSurface::clear`] starts a
/// frame, [`FrameSurface::read_rgba8`] finishes it.
pub struct CpuSurface {
    canvas: Canvas,
    ctx: vello_cpu::RenderContext,
    pixmap: vello_cpu::Pixmap,
    fallback: FallbackGlyphs,
}

impl std::fmt::Debug for CpuSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CpuSurface")
            .field("canvas", &self.canvas)
            .finish_non_exhaustive()
    }
}

impl CpuSurface {
    /// Allocate a surface for `canvas`.
    pub fn new(canvas: Canvas) -> MathreelResult<Self> {
        let width: u16 = canvas
            .width
            .try_into()
            .map_err(|_| MathreelError::validation("surface width exceeds u16"))?;
        let height: u16 = canvas
            .height
            .try_into()
            .map_err(|_| MathreelError::validation("surface height exceeds u16"))?;
        if width == 0 || height == 0 {
            return Err(MathreelError::validation(
                "surface width/height must be non-zero",
            ));
        }
        Ok(Self {
            canvas,
            ctx: vello_cpu::RenderContext::new(width, height),
            pixmap: vello_cpu::Pixmap::new(width, height),
            fallback: FallbackGlyphs::default(),
        })
    }
}

impl FrameSurface for CpuSurface {
    fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// Discard pending drawing and fill the canvas with `background`.
    fn clear(&mut self, background: Rgb8) {
        self.ctx.reset();
        self.ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx.set_paint(color_to_cpu(background));
        self.ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            0.0,
            0.0,
            f64::from(self.canvas.width),
            f64::from(self.canvas.height),
        ));
    }

    /// Rasterize everything drawn since `clear` and return premultiplied RGBA8.
    ///
    /// The background is opaque, so every pixel has alpha 255 and the data equals straight RGBA.
    fn read_rgba8(&mut self) -> Vec<u8> {
        self.ctx.flush();
        self.ctx.render_to_pixmap(&mut self.pixmap);
        self.pixmap.data_as_u8_slice().to_vec()
    }
}

impl DrawSurface for CpuSurface {
    fn fill_path(&mut self, path: &BezPath, transform: Affine, color: Rgb8) {
        self.ctx.set_transform(affine_to_cpu(transform));
        self.ctx.set_paint(color_to_cpu(color));
        self.ctx.fill_path(&bezpath_to_cpu(path));
    }

    fn stroke_path(&mut self, path: &BezPath, transform: Affine, color: Rgb8, width: f64) {
        self.ctx.set_transform(affine_to_cpu(transform));
        self.ctx.set_paint(color_to_cpu(color));
        self.ctx.set_stroke(vello_cpu::kurbo::Stroke::new(width));
        self.ctx.stroke_path(&bezpath_to_cpu(path));
    }

    fn fill_fallback_glyph(&mut self, ch: char, transform: Affine, size_px: f64, color: Rgb8) {
        self.ctx.set_transform(affine_to_cpu(transform));
        self.ctx.set_paint(color_to_cpu(color));
        match self.fallback.get(ch, size_px) {
            Some(shaped) => {
                self.ctx
                    .glyph_run(&shaped.font)
                    .font_size(size_px as f32)
                    .fill_glyphs(shaped.glyphs.iter().copied());
            }
            None => {
                // No system font: draw a hollow box so the character is still visible.
                let w = size_px * 0.6;
                let h = size_px * 0.7;
                self.ctx
                    .set_stroke(vello_cpu::kurbo::Stroke::new(size_px * 0.08));
                self.ctx
                    .stroke_rect(&vello_cpu::kurbo::Rect::new(0.0, -h, w, 0.0));
            }
        }
    }

    fn push_opacity(&mut self, opacity: f64) {
        self.ctx.push_opacity_layer(opacity as f32);
    }

    fn pop_opacity(&mut self) {
        self.ctx.pop_layer();
    }
}

/// A character shaped with a system font, baseline at the origin.
#[derive(Clone)]
struct ShapedGlyph {
    font: vello_cpu::peniko::FontData,
    glyphs: Vec<vello_cpu::Glyph>,
}

/// Lazily shapes fallback characters with the system's generic sans-serif face.
struct FallbackGlyphs {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<()>,
    fonts: HashMap<(u64, u32), vello_cpu::peniko::FontData>,
    shaped: HashMap<(char, u64), Option<ShapedGlyph>>,
}

impl Default for FallbackGlyphs {
    fn default() -> Self {
        Self {
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
            fonts: HashMap::new(),
            shaped: HashMap::new(),
        }
    }
}

impl FallbackGlyphs {
    fn get(&mut self, ch: char, size_px: f64) -> Option<&ShapedGlyph> {
        let key = (ch, size_px.to_bits());
        if !self.shaped.contains_key(&key) {
            let shaped = self.shape(ch, size_px as f32);
            if shaped.is_none() {
                tracing::debug!(%ch, "no system font glyph for fallback character");
            }
            self.shaped.insert(key, shaped);
        }
        self.shaped.get(&key).and_then(Option::as_ref)
    }

    fn shape(&mut self, ch: char, size_px: f32) -> Option<ShapedGlyph> {
        let text = ch.to_string();
        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, &text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(Cow::Borrowed("sans-serif")),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        let mut layout: parley::Layout<()> = builder.build(&text);
        layout.break_all_lines(None);

        for line in layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                let font = run.run().font();
                let font = self
                    .fonts
                    .entry((font.data.id(), font.index))
                    .or_insert_with(|| {
                        vello_cpu::peniko::FontData::new(
                            vello_cpu::peniko::Blob::from(font.data.data().to_vec()),
                            font.index,
                        )
                    })
                    .clone();

                let mut x = 0.0f32;
                let glyphs: Vec<vello_cpu::Glyph> = run
                    .glyphs()
                    .map(|g| {
                        let glyph = vello_cpu::Glyph {
                            id: g.id,
                            x: x + g.x,
                            y: -g.y,
                        };
                        x += g.advance;
                        glyph
                    })
                    .collect();
                if glyphs.is_empty() {
                    continue;
                }
                return Some(ShapedGlyph { font, glyphs });
            }
        }
        None
    }
}

fn color_to_cpu(c: Rgb8) -> vello_cpu::peniko::Color {
    vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, 255)
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn point_to_cpu(p: Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}

fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(point_to_cpu(p)),
            PathEl::LineTo(p) => out.line_to(point_to_cpu(p)),
            PathEl::QuadTo(p1, p2) => out.quad_to(point_to_cpu(p1), point_to_cpu(p2)),
            PathEl::CurveTo(p1, p2, p3) => {
                out.curve_to(point_to_cpu(p1), point_to_cpu(p2), point_to_cpu(p3));
            }
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
