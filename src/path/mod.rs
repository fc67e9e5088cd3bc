//! SVG path-data interpretation.

/// Path-data to drawing-primitive interpreter.
pub mod interpret;
pub(crate) mod lexer;
