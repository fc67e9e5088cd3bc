//! mathreel renders parametric shape animations with a typeset math overlay.
//!
//! A scene is a set of shapes plus timed tracks that move, rotate, scale, fade and recolor them.
//! The pipeline is:
//!
//! - Load an [`AnimationScene`] (JSON) and [`validate`] it
//! - Create a [`RenderSession`], which compiles the optional markup overlay once
//! - Render single frames, or stream every frame into a [`FrameSink`] such as the
//!   [`EncoderSession`] that pipes RGB24 into `ffmpeg`
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

pub(crate) mod animation;
pub(crate) mod encode;
pub(crate) mod eval;
/// Vector markup: parsing, transforms, drawing and the compiler boundary.
pub mod markup;
/// SVG path-data interpretation.
pub mod path;
pub(crate) mod render;
pub(crate) mod scene;
pub(crate) mod session;

pub use crate::foundation::color::{Rgb8, interpolate_hex_colors};
pub use crate::foundation::core::{Affine, BezPath, Canvas, PathEl, Point, Rect, Transform2D, Vec2};
pub use crate::foundation::error::{MathreelError, MathreelResult};
pub use crate::foundation::math::{clamp01, lerp, normalize};

pub use crate::animation::ease::Ease;
pub use crate::encode::ffmpeg::{
    EncoderConfig, EncoderSession, SessionState, ensure_parent_dir, ffmpeg_args,
    is_encoder_available,
};
pub use crate::encode::sink::{FrameSink, InMemorySink, SinkConfig};
pub use crate::eval::timeline::{ObjectState, evaluate, evaluate_scene};
pub use crate::markup::compiler::{CommandCompiler, MarkupCompiler, PassthroughCompiler};
pub use crate::markup::model::VectorMarkupModel;
pub use crate::markup::render::{MarkupRenderOpts, render_markup};
pub use crate::render::cpu::CpuSurface;
pub use crate::render::frame::{FrameGenerator, FrameInfo, FrameRGBA, rgba_to_rgb};
pub use crate::render::shapes::{draw_object, shape_path};
pub use crate::render::surface::{DrawCall, DrawSurface, FrameSurface, RecordingSurface};
pub use crate::scene::model::{
    AnimationScene, AnimationTrack, ColorTarget, MarkupOverlay, ScaleValue, SceneObject,
    ShapeKind, TrackPayload,
};
pub use crate::scene::validate::{Severity, ValidationIssue, validate, validate_issues};
pub use crate::session::render_session::{
    RenderSession, RenderSessionOpts, RenderStats, unique_output_path,
};
