use crate::foundation::core::{Affine, Vec2};
use crate::path::lexer::scan_numbers;

/// Parse an SVG `transform` attribute.
///
/// Functions compose in textual order (`translate(..) scale(..)` scales first, then translates
/// the result). Recognized functions are `translate`, `scale`, `rotate` (degrees, with an optional
/// center) and `matrix`; anything unrecognized or with the wrong argument count contributes the
/// identity.
pub fn parse_transform(s: &str) -> Affine {
    let mut out = Affine::IDENTITY;
    for part in s.split(')') {
        let Some((name, args)) = part.split_once('(') else {
            continue;
        };
        let name = name.trim().trim_start_matches(',').trim();
        let v = scan_numbers(args);
        out *= match (name, v.as_slice()) {
            ("translate", &[x]) => Affine::translate(Vec2::new(x, 0.0)),
            ("translate", &[x, y]) => Affine::translate(Vec2::new(x, y)),
            ("scale", &[s]) => Affine::scale(s),
            ("scale", &[sx, sy]) => Affine::scale_non_uniform(sx, sy),
            ("rotate", &[deg]) => Affine::rotate(deg.to_radians()),
            ("rotate", &[deg, cx, cy]) => {
                Affine::translate(Vec2::new(cx, cy))
                    * Affine::rotate(deg.to_radians())
                    * Affine::translate(Vec2::new(-cx, -cy))
            }
            ("matrix", &[a, b, c, d, e, f]) => Affine::new([a, b, c, d, e, f]),
            _ => {
                tracing::debug!(function = name, "ignoring unrecognized transform function");
                Affine::IDENTITY
            }
        };
    }
    out
}
