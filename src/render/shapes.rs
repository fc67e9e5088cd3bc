use kurbo::Shape as _;

use crate::eval::timeline::ObjectState;
use crate::foundation::color::Rgb8;
use crate::foundation::core::{BezPath, Point, Rect};
use crate::render::surface::{DEFAULT_STROKE_WIDTH, DrawSurface};
use crate::scene::model::{SceneObject, ShapeKind};

const CURVE_TOLERANCE: f64 = 0.1;

/// Outline of a shape in object space, centred on the origin.
pub fn shape_path(shape: &ShapeKind) -> BezPath {
    match *shape {
        ShapeKind::Triangle { size } => {
            let h = size / 2.0;
            let mut p = BezPath::new();
            p.move_to((0.0, -h));
            p.line_to((h, h));
            p.line_to((-h, h));
            p.close_path();
            p
        }
        ShapeKind::Circle { radius } => {
            kurbo::Circle::new(Point::ZERO, radius).to_path(CURVE_TOLERANCE)
        }
        ShapeKind::Rectangle { width, height } => {
            Rect::from_center_size(Point::ZERO, (width, height)).to_path(CURVE_TOLERANCE)
        }
    }
}

/// Draw `obj` in the evaluated `state`.
///
/// Colors that fail to parse fall back to white fill and no stroke. Fully transparent objects are
/// skipped.
pub fn draw_object(surface: &mut dyn DrawSurface, obj: &SceneObject, state: &ObjectState) {
    if state.opacity <= 0.0 {
        return;
    }
    let path = shape_path(&obj.shape);
    let transform = state.transform().to_affine();
    let layered = state.opacity < 1.0;

    if layered {
        surface.push_opacity(state.opacity);
    }

    let fill = Rgb8::parse_css(&state.fill_color).unwrap_or_else(|| {
        tracing::warn!(object = %obj.id, color = %state.fill_color, "unparseable fill color");
        Rgb8::WHITE
    });
    surface.fill_path(&path, transform, fill);

    if let Some(stroke) = state.stroke_color.as_deref().and_then(Rgb8::parse_css) {
        let width = obj.stroke_width.unwrap_or(DEFAULT_STROKE_WIDTH);
        surface.stroke_path(&path, transform, stroke, width);
    }

    if layered {
        surface.pop_opacity();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/shapes.rs"]
mod tests;
