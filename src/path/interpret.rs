use crate::foundation::core::{BezPath, PathEl, Point, Vec2};
use crate::foundation::math::reflect;
use crate::path::lexer::{PathToken, tokenize};

/// Interpret SVG path data into drawing primitives.
///
/// Supported commands are `M L H V C S Q T Z` in absolute (uppercase) and relative (lowercase)
/// form. Each command occurrence consumes exactly one argument group; extra numbers are ignored,
/// so implicit-repeat shorthand such as `L 1 1 2 2` only draws to `(1, 1)`. A command with too few
/// arguments is skipped without touching the cursor. Drawing commands that appear while no
/// subpath is open (at the start, or after `Z`) implicitly start one at the cursor.
pub fn interpret(d: &str) -> Vec<PathEl> {
    let mut interp = Interpreter::default();
    for token in tokenize(d) {
        interp.apply(&token);
    }
    interp.out
}

/// [`interpret`] collected into a [`BezPath`].
pub fn interpret_bezpath(d: &str) -> BezPath {
    BezPath::from_vec(interpret(d))
}

#[derive(Clone, Copy, Debug, Default)]
enum LastControl {
    #[default]
    None,
    Cubic(Point),
    Quad(Point),
}

#[derive(Debug, Default)]
struct Interpreter {
    out: Vec<PathEl>,
    cursor: Point,
    subpath_start: Point,
    subpath_open: bool,
    last: LastControl,
}

impl Interpreter {
    fn apply(&mut self, token: &PathToken) {
        let relative = token.command.is_ascii_lowercase();
        let origin = if relative { self.cursor } else { Point::ZERO };
        let at = |i: usize| -> Point { origin + Vec2::new(token.args[i], token.args[i + 1]) };
        let arity = match token.command.to_ascii_uppercase() {
            'M' | 'L' | 'T' => 2,
            'H' | 'V' => 1,
            'C' => 6,
            'S' | 'Q' => 4,
            'Z' => 0,
            _ => return,
        };
        if token.args.len() < arity {
            return;
        }

        match token.command.to_ascii_uppercase() {
            'M' => {
                let p = at(0);
                self.out.push(PathEl::MoveTo(p));
                self.cursor = p;
                self.subpath_start = p;
                self.subpath_open = true;
                self.last = LastControl::None;
            }
            'L' => {
                let p = at(0);
                self.line_to(p);
            }
            'H' => {
                let x = if relative {
                    self.cursor.x + token.args[0]
                } else {
                    token.args[0]
                };
                self.line_to(Point::new(x, self.cursor.y));
            }
            'V' => {
                let y = if relative {
                    self.cursor.y + token.args[0]
                } else {
                    token.args[0]
                };
                self.line_to(Point::new(self.cursor.x, y));
            }
            'C' => {
                let (c1, c2, p) = (at(0), at(2), at(4));
                self.cubic_to(c1, c2, p);
            }
            'S' => {
                let c1 = match self.last {
                    LastControl::Cubic(prev) => reflect(prev, self.cursor),
                    _ => self.cursor,
                };
                let (c2, p) = (at(0), at(2));
                self.cubic_to(c1, c2, p);
            }
            'Q' => {
                let (c, p) = (at(0), at(2));
                self.quad_to(c, p);
            }
            'T' => {
                let c = match self.last {
                    LastControl::Quad(prev) => reflect(prev, self.cursor),
                    _ => self.cursor,
                };
                let p = at(0);
                self.quad_to(c, p);
            }
            'Z' => {
                if self.subpath_open {
                    self.out.push(PathEl::ClosePath);
                }
                self.cursor = self.subpath_start;
                self.subpath_open = false;
                self.last = LastControl::None;
            }
            _ => {}
        }
    }

    fn ensure_subpath(&mut self) {
        if !self.subpath_open {
            self.out.push(PathEl::MoveTo(self.cursor));
            self.subpath_start = self.cursor;
            self.subpath_open = true;
        }
    }

    fn line_to(&mut self, p: Point) {
        self.ensure_subpath();
        self.out.push(PathEl::LineTo(p));
        self.cursor = p;
        self.last = LastControl::None;
    }

    fn cubic_to(&mut self, c1: Point, c2: Point, p: Point) {
        self.ensure_subpath();
        self.out.push(PathEl::CurveTo(c1, c2, p));
        self.cursor = p;
        self.last = LastControl::Cubic(c2);
    }

    fn quad_to(&mut self, c: Point, p: Point) {
        self.ensure_subpath();
        self.out.push(PathEl::QuadTo(c, p));
        self.cursor = p;
        self.last = LastControl::Quad(c);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/path/interpret.rs"]
mod tests;
