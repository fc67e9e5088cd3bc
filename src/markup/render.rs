use kurbo::Shape as _;

use crate::foundation::color::Rgb8;
use crate::foundation::core::{Affine, BezPath, Point, Rect, Vec2};
use crate::markup::model::{TextRun, VectorMarkupModel};
use crate::render::surface::{DEFAULT_STROKE_WIDTH, DrawSurface};

/// Font-unit to markup-unit factor applied to glyph outlines and advances.
pub const GLYPH_UNIT_SCALE: f64 = 0.01;
/// Size of the generic face used for characters with no glyph outline.
pub const FALLBACK_FONT_SIZE: f64 = 10.0;
/// Cursor advance after a fallback character, in markup units.
pub const FALLBACK_ADVANCE: f64 = 6.0;

/// Placement of a markup overlay on the canvas.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MarkupRenderOpts {
    /// Canvas point the markup origin (or the text center, when centering) lands on.
    pub anchor: Point,
    /// Uniform scale from markup units to pixels.
    pub scale: f64,
    /// Center text runs horizontally on `anchor`.
    pub center: bool,
    /// Paint for `currentColor` and for elements without explicit paint.
    pub foreground: Rgb8,
}

impl Default for MarkupRenderOpts {
    fn default() -> Self {
        Self {
            anchor: Point::ZERO,
            scale: 1.0,
            center: true,
            foreground: Rgb8::WHITE,
        }
    }
}

/// Draw `model` onto `surface`.
///
/// Order is free paths, free lines, free rectangles, then text runs. Only text runs take part in
/// centering.
pub fn render_markup(
    model: &VectorMarkupModel,
    opts: &MarkupRenderOpts,
    surface: &mut dyn DrawSurface,
) {
    let base = Affine::translate(opts.anchor.to_vec2()) * Affine::scale(opts.scale);
    let fg = opts.foreground;

    for path in &model.paths {
        let transform = base * path.transform;
        let stroke = stroke_paint(path.stroke.as_deref(), fg);
        if let Some(color) = fill_paint(path.fill.as_deref(), stroke.is_some(), fg) {
            surface.fill_path(&path.outline, transform, color);
        }
        if let Some(color) = stroke {
            let width = path.stroke_width.unwrap_or(DEFAULT_STROKE_WIDTH);
            surface.stroke_path(&path.outline, transform, color, width);
        }
    }

    for line in &model.lines {
        let color = match line.stroke.as_deref() {
            None => Some(fg),
            stroke => stroke_paint(stroke, fg),
        };
        let Some(color) = color else {
            continue;
        };
        let mut seg = BezPath::new();
        seg.move_to((line.x1, line.y1));
        seg.line_to((line.x2, line.y2));
        let width = line.stroke_width.unwrap_or(DEFAULT_STROKE_WIDTH);
        surface.stroke_path(&seg, base * line.transform, color, width);
    }

    for rect in &model.rects {
        let outline = Rect::new(rect.x, rect.y, rect.x + rect.width, rect.y + rect.height)
            .to_path(0.1);
        let transform = base * rect.transform;
        let stroke = stroke_paint(rect.stroke.as_deref(), fg);
        if let Some(color) = fill_paint(rect.fill.as_deref(), stroke.is_some(), fg) {
            surface.fill_path(&outline, transform, color);
        }
        if let Some(color) = stroke {
            let width = rect.stroke_width.unwrap_or(DEFAULT_STROKE_WIDTH);
            surface.stroke_path(&outline, transform, color, width);
        }
    }

    let dx = if opts.center {
        centering_offset(model)
    } else {
        0.0
    };
    for run in &model.text_runs {
        let Some(color) = fill_paint(run.fill.as_deref(), false, fg) else {
            continue;
        };
        draw_text_run(model, run, base, dx, color, surface);
    }
}

fn draw_text_run(
    model: &VectorMarkupModel,
    run: &TextRun,
    base: Affine,
    dx: f64,
    color: Rgb8,
    surface: &mut dyn DrawSurface,
) {
    let mut x = run.x + dx;
    for ch in run.text.chars() {
        let at = base * Affine::translate(Vec2::new(x, run.y));
        match model.glyphs.get(&ch) {
            Some(glyph) => {
                if !glyph.outline.elements().is_empty() {
                    let flip = Affine::scale_non_uniform(GLYPH_UNIT_SCALE, -GLYPH_UNIT_SCALE);
                    surface.fill_path(&glyph.outline, at * flip, color);
                }
            }
            None if ch.is_whitespace() => {}
            None => surface.fill_fallback_glyph(ch, at, FALLBACK_FONT_SIZE, color),
        }
        x += char_advance(model, ch);
    }
}

fn char_advance(model: &VectorMarkupModel, ch: char) -> f64 {
    model
        .glyphs
        .get(&ch)
        .map_or(FALLBACK_ADVANCE, |g| g.advance_width * GLYPH_UNIT_SCALE)
}

/// Natural horizontal extent `(min_x, max_x)` of all text runs, or `None` without runs.
pub fn text_extent(model: &VectorMarkupModel) -> Option<(f64, f64)> {
    model
        .text_runs
        .iter()
        .map(|run| {
            let width: f64 = run.text.chars().map(|ch| char_advance(model, ch)).sum();
            (run.x, run.x + width)
        })
        .reduce(|(lo, hi), (a, b)| (lo.min(a), hi.max(b)))
}

fn centering_offset(model: &VectorMarkupModel) -> f64 {
    text_extent(model).map_or(0.0, |(lo, hi)| -(lo + hi) / 2.0)
}

fn stroke_paint(value: Option<&str>, fg: Rgb8) -> Option<Rgb8> {
    match value.map(str::trim) {
        None | Some("none") => None,
        Some(v) => Some(resolve_color(v, fg)),
    }
}

fn fill_paint(value: Option<&str>, has_stroke: bool, fg: Rgb8) -> Option<Rgb8> {
    match value.map(str::trim) {
        Some("none") => None,
        Some(v) => Some(resolve_color(v, fg)),
        None if has_stroke => None,
        None => Some(fg),
    }
}

fn resolve_color(value: &str, fg: Rgb8) -> Rgb8 {
    if value.eq_ignore_ascii_case("currentcolor") {
        return fg;
    }
    Rgb8::parse_css(value).unwrap_or_else(|| {
        tracing::warn!(paint = value, "unrecognized paint in markup, using foreground");
        fg
    })
}

#[cfg(test)]
#[path = "../../tests/unit/markup/render.rs"]
mod tests;
