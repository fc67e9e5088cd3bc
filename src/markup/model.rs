use std::collections::HashMap;

use crate::foundation::core::{Affine, BezPath};
use crate::foundation::error::{MathreelError, MathreelResult};
use crate::markup::transform::parse_transform;
use crate::path::interpret::interpret_bezpath;
use crate::path::lexer::scan_numbers;

/// Advance width used when neither the glyph nor its font declares one.
pub const DEFAULT_ADVANCE_WIDTH: f64 = 500.0;

/// Glyph outline from an SVG font definition.
#[derive(Clone, Debug)]
pub struct Glyph {
    /// Horizontal advance in font units.
    pub advance_width: f64,
    /// Raw path data (y-up font space).
    pub path_data: String,
    /// `path_data` interpreted once at parse time.
    pub outline: BezPath,
}

/// Positioned run of text drawn with glyph outlines.
#[derive(Clone, Debug, PartialEq)]
pub struct TextRun {
    /// Baseline start x.
    pub x: f64,
    /// Baseline y.
    pub y: f64,
    /// Text content, including nested `<tspan>` content.
    pub text: String,
    /// Explicit fill, if any.
    pub fill: Option<String>,
}

/// Free-standing `<path>` element.
#[derive(Clone, Debug)]
pub struct MarkupPath {
    /// Raw path data.
    pub path_data: String,
    /// `path_data` interpreted once at parse time.
    pub outline: BezPath,
    /// Explicit stroke paint.
    pub stroke: Option<String>,
    /// Explicit stroke width.
    pub stroke_width: Option<f64>,
    /// Explicit fill paint.
    pub fill: Option<String>,
    /// Element transform (identity when absent or unparseable).
    pub transform: Affine,
}

/// Free-standing `<line>` element.
#[derive(Clone, Debug, PartialEq)]
pub struct MarkupLine {
    /// Start x.
    pub x1: f64,
    /// Start y.
    pub y1: f64,
    /// End x.
    pub x2: f64,
    /// End y.
    pub y2: f64,
    /// Explicit stroke paint.
    pub stroke: Option<String>,
    /// Explicit stroke width.
    pub stroke_width: Option<f64>,
    /// Element transform.
    pub transform: Affine,
}

/// Free-standing `<rect>` element.
#[derive(Clone, Debug, PartialEq)]
pub struct MarkupRect {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Width.
    pub width: f64,
    /// Height.
    pub height: f64,
    /// Explicit fill paint.
    pub fill: Option<String>,
    /// Explicit stroke paint.
    pub stroke: Option<String>,
    /// Explicit stroke width.
    pub stroke_width: Option<f64>,
    /// Element transform.
    pub transform: Affine,
}

/// Typed view of the vector markup produced by the expression compiler.
///
/// Built once per scene and shared read-only by every frame.
#[derive(Clone, Debug, Default)]
pub struct VectorMarkupModel {
    /// Glyph outlines keyed by the exact character they render.
    pub glyphs: HashMap<char, Glyph>,
    /// Text runs in document order.
    pub text_runs: Vec<TextRun>,
    /// Free paths in document order.
    pub paths: Vec<MarkupPath>,
    /// Free lines in document order.
    pub lines: Vec<MarkupLine>,
    /// Free rectangles in document order.
    pub rects: Vec<MarkupRect>,
}

impl VectorMarkupModel {
    /// Parse markup text.
    ///
    /// Only a document that is not well-formed XML is an error. Missing or malformed attributes
    /// fall back to defaults: numbers to 0, advance widths to the font default or
    /// [`DEFAULT_ADVANCE_WIDTH`], transforms to the identity.
    pub fn parse(markup: &str) -> MathreelResult<Self> {
        let doc = roxmltree::Document::parse(markup)
            .map_err(|e| MathreelError::markup(format!("failed to parse vector markup: {e}")))?;

        let mut model = Self::default();
        for node in doc.descendants().filter(roxmltree::Node::is_element) {
            match node.tag_name().name() {
                "glyph" => model.push_glyph(node),
                "path" if !inside(node, &["defs", "font", "clipPath", "mask"]) => {
                    let path_data = node.attribute("d").unwrap_or_default().to_string();
                    model.paths.push(MarkupPath {
                        outline: interpret_bezpath(&path_data),
                        path_data,
                        stroke: paint_attr(node, "stroke"),
                        stroke_width: opt_num_attr(node, "stroke-width"),
                        fill: paint_attr(node, "fill"),
                        transform: transform_attr(node),
                    });
                }
                "line" if !inside(node, NOT_DRAWN) => model.lines.push(MarkupLine {
                    x1: num_attr(node, "x1"),
                    y1: num_attr(node, "y1"),
                    x2: num_attr(node, "x2"),
                    y2: num_attr(node, "y2"),
                    stroke: paint_attr(node, "stroke"),
                    stroke_width: opt_num_attr(node, "stroke-width"),
                    transform: transform_attr(node),
                }),
                "rect" if !inside(node, NOT_DRAWN) => {
                    model.rects.push(MarkupRect {
                        x: num_attr(node, "x"),
                        y: num_attr(node, "y"),
                        width: num_attr(node, "width"),
                        height: num_attr(node, "height"),
                        fill: paint_attr(node, "fill"),
                        stroke: paint_attr(node, "stroke"),
                        stroke_width: opt_num_attr(node, "stroke-width"),
                        transform: transform_attr(node),
                    });
                }
                "text" if !inside(node, NOT_DRAWN) => model.text_runs.push(TextRun {
                    x: num_attr(node, "x"),
                    y: num_attr(node, "y"),
                    text: node
                        .descendants()
                        .filter(roxmltree::Node::is_text)
                        .filter_map(|t| t.text())
                        .collect(),
                    fill: paint_attr(node, "fill"),
                }),
                _ => {}
            }
        }

        tracing::debug!(
            glyphs = model.glyphs.len(),
            text_runs = model.text_runs.len(),
            paths = model.paths.len(),
            lines = model.lines.len(),
            rects = model.rects.len(),
            "parsed vector markup"
        );
        Ok(model)
    }

    fn push_glyph(&mut self, node: roxmltree::Node<'_, '_>) {
        let key = node
            .attribute("unicode")
            .and_then(single_char)
            .or_else(|| node.attribute("glyph-name").and_then(single_char));
        let Some(ch) = key else {
            tracing::debug!("skipping glyph without a single-character key");
            return;
        };

        let advance_width = opt_num_attr(node, "horiz-adv-x")
            .or_else(|| {
                node.ancestors()
                    .find(|a| a.has_tag_name("font"))
                    .and_then(|font| opt_num_attr(font, "horiz-adv-x"))
            })
            .unwrap_or(DEFAULT_ADVANCE_WIDTH);
        let path_data = node.attribute("d").unwrap_or_default().to_string();

        self.glyphs.entry(ch).or_insert_with(|| Glyph {
            advance_width,
            outline: interpret_bezpath(&path_data),
            path_data,
        });
    }
}

/// Containers whose content is referenced rather than drawn.
const NOT_DRAWN: &[&str] = &["defs", "clipPath", "mask"];

fn single_char(s: &str) -> Option<char> {
    let mut chars = s.chars();
    let c = chars.next()?;
    chars.next().is_none().then_some(c)
}

fn inside(node: roxmltree::Node<'_, '_>, tags: &[&str]) -> bool {
    node.ancestors()
        .skip(1)
        .any(|a| tags.contains(&a.tag_name().name()))
}

/// Presentation attribute, falling back to a `style="name: value"` declaration.
fn style_attr<'a>(node: roxmltree::Node<'a, '_>, name: &str) -> Option<&'a str> {
    if let Some(v) = node.attribute(name) {
        return Some(v.trim());
    }
    node.attribute("style")?.split(';').find_map(|decl| {
        let (k, v) = decl.split_once(':')?;
        (k.trim() == name).then(|| v.trim())
    })
}

fn paint_attr(node: roxmltree::Node<'_, '_>, name: &str) -> Option<String> {
    style_attr(node, name).map(str::to_string)
}

fn opt_num_attr(node: roxmltree::Node<'_, '_>, name: &str) -> Option<f64> {
    style_attr(node, name).and_then(|v| scan_numbers(v).first().copied())
}

fn num_attr(node: roxmltree::Node<'_, '_>, name: &str) -> f64 {
    opt_num_attr(node, name).unwrap_or(0.0)
}

fn transform_attr(node: roxmltree::Node<'_, '_>) -> Affine {
    node.attribute("transform")
        .map(parse_transform)
        .unwrap_or(Affine::IDENTITY)
}

#[cfg(test)]
#[path = "../../tests/unit/markup/model.rs"]
mod tests;
