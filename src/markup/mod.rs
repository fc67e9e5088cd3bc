//! Vector markup produced by the expression compiler: parsing, transforms and drawing.

/// Expression to markup compilers.
pub mod compiler;
/// Parsed markup: glyphs, text runs and free shapes.
pub mod model;
/// Drawing a parsed model onto a surface.
pub mod render;
/// `transform` attribute parsing.
pub mod transform;
