use crate::foundation::core::{Point, Vec2};

/// Linear blend between `a` and `b`.
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Component-wise linear blend of two points.
pub fn lerp_point(a: Point, b: Point, t: f64) -> Point {
    Point::new(lerp(a.x, b.x, t), lerp(a.y, b.y, t))
}

/// Component-wise linear blend of two vectors.
pub fn lerp_vec2(a: Vec2, b: Vec2, t: f64) -> Vec2 {
    Vec2::new(lerp(a.x, b.x, t), lerp(a.y, b.y, t))
}

/// Clamp into `[0, 1]`. NaN maps to 0.
pub fn clamp01(t: f64) -> f64 {
    if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) }
}

/// Map `value` from `[start, start + span]` onto `[0, 1]`, clamped.
///
/// A non-positive span yields 1 once `value >= start`, 0 otherwise.
pub fn normalize(value: f64, start: f64, span: f64) -> f64 {
    if span <= 0.0 {
        return if value >= start { 1.0 } else { 0.0 };
    }
    clamp01((value - start) / span)
}

/// Reflect `control` through `pivot` (smooth curve continuity).
pub fn reflect(control: Point, pivot: Point) -> Point {
    Point::new(2.0 * pivot.x - control.x, 2.0 * pivot.y - control.y)
}
