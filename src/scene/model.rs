use std::path::Path;

use anyhow::Context;

use crate::animation::ease::Ease;
use crate::foundation::core::{Point, Vec2};
use crate::foundation::error::{MathreelError, MathreelResult};

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
/// A complete animation: shapes, the tracks driving them, and an optional markup overlay.
///
/// Scenes are plain data. They are loaded from JSON (see [`AnimationScene::from_json_str`]),
/// checked with [`crate::validate`], and never mutated by evaluation or rendering.
pub struct AnimationScene {
    /// Scene length in seconds.
    pub duration: f64,
    /// Animated objects, drawn in declaration order.
    pub objects: Vec<SceneObject>,
    /// Animation tracks, applied in declaration order.
    #[serde(default)]
    pub animations: Vec<AnimationTrack>,
    /// Typeset expression drawn over the shapes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub markup_overlay: Option<MarkupOverlay>,
    /// Canvas clear color (CSS syntax).
    #[serde(default = "default_background")]
    pub background_color: String,
}

impl AnimationScene {
    /// Parse a scene document.
    pub fn from_json_str(json: &str) -> MathreelResult<Self> {
        serde_json::from_str(json).map_err(|e| MathreelError::serde(format!("scene document: {e}")))
    }

    /// Read and parse a scene document from disk.
    pub fn from_path(path: &Path) -> MathreelResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read scene '{}'", path.display()))?;
        Self::from_json_str(&text)
    }

    /// Serialize as pretty JSON.
    pub fn to_json_pretty(&self) -> MathreelResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| MathreelError::serde(e.to_string()))
    }

    /// Look up an object by id.
    pub fn object(&self, id: &str) -> Option<&SceneObject> {
        self.objects.iter().find(|o| o.id == id)
    }
}

fn default_background() -> String {
    "#000000".to_string()
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
/// Typeset-expression overlay.
pub struct MarkupOverlay {
    /// Expression (or markup, with the passthrough compiler) handed to the markup compiler.
    pub source: String,
    /// Canvas point the overlay is placed at.
    pub anchor: Point,
    /// Markup-unit to pixel scale.
    #[serde(default = "default_scale")]
    pub scale: f64,
    /// Center text horizontally on `anchor`.
    #[serde(default = "default_true")]
    pub center: bool,
    /// Foreground color; white when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

fn default_scale() -> f64 {
    1.0
}

fn default_true() -> bool {
    true
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
/// One drawable shape and its state at time zero.
pub struct SceneObject {
    /// Unique id referenced by tracks.
    pub id: String,
    /// Geometry.
    #[serde(flatten)]
    pub shape: ShapeKind,
    /// Fill color (CSS syntax; hex for animatable colors).
    pub fill_color: String,
    /// Optional outline color.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke_color: Option<String>,
    /// Outline width in pixels (default 1 when a stroke color is set).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke_width: Option<f64>,
    /// Center position in canvas pixels.
    #[serde(default)]
    pub initial_position: Point,
    /// Rotation in radians.
    #[serde(default)]
    pub initial_rotation: f64,
    /// Scale factor.
    #[serde(default)]
    pub initial_scale: ScaleValue,
    /// Opacity in `[0, 1]`.
    #[serde(default = "default_opacity")]
    pub initial_opacity: f64,
}

fn default_opacity() -> f64 {
    1.0
}

#[derive(Clone, Copy, Debug, serde::Serialize, serde::Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "camelCase")]
/// Shape geometry, centred on the object position.
pub enum ShapeKind {
    /// Isosceles triangle inscribed in a `size x size` box.
    Triangle {
        /// Box edge length.
        size: f64,
    },
    /// Circle.
    Circle {
        /// Radius.
        radius: f64,
    },
    /// Axis-aligned rectangle.
    Rectangle {
        /// Width.
        width: f64,
        /// Height.
        height: f64,
    },
}

impl ShapeKind {
    /// Lower-case kind name as it appears in scene documents.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Triangle { .. } => "triangle",
            Self::Circle { .. } => "circle",
            Self::Rectangle { .. } => "rectangle",
        }
    }
}

#[derive(Clone, Copy, Debug, serde::Serialize, serde::Deserialize, PartialEq)]
#[serde(untagged)]
/// Scale given as one number or per axis.
pub enum ScaleValue {
    /// Same factor on both axes.
    Uniform(f64),
    /// Per-axis factors.
    Xy(Vec2),
}

impl Default for ScaleValue {
    fn default() -> Self {
        Self::Xy(Vec2::new(1.0, 1.0))
    }
}

impl ScaleValue {
    /// Per-axis factors.
    pub fn as_vec2(self) -> Vec2 {
        match self {
            Self::Uniform(s) => Vec2::new(s, s),
            Self::Xy(v) => v,
        }
    }
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
/// A timed interpolation of one property of one object.
pub struct AnimationTrack {
    /// Target object id.
    pub object_id: String,
    /// Start time in seconds.
    #[serde(default)]
    pub start_time: f64,
    /// Length in seconds.
    pub duration: f64,
    /// Easing applied to local progress.
    #[serde(default)]
    pub easing: Ease,
    /// Property and endpoints.
    #[serde(flatten)]
    pub payload: TrackPayload,
}

impl AnimationTrack {
    /// Time at which the track reaches its end value.
    pub fn end_time(&self) -> f64 {
        self.start_time + self.duration
    }
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "camelCase")]
/// What a track animates.
pub enum TrackPayload {
    /// Position.
    Move {
        /// Start position.
        from: Point,
        /// End position.
        to: Point,
    },
    /// Rotation in radians.
    Rotate {
        /// Start angle.
        from: f64,
        /// End angle; ignored when `rotations` is set.
        to: f64,
        /// Whole turns from `from`; the end angle becomes `from + rotations * 2pi`.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        rotations: Option<f64>,
    },
    /// Scale.
    Scale {
        /// Start scale.
        from: ScaleValue,
        /// End scale.
        to: ScaleValue,
    },
    /// Opacity.
    Fade {
        /// Start opacity.
        from: f64,
        /// End opacity.
        to: f64,
    },
    /// Fill or stroke color.
    Color {
        /// Start color (6-digit hex).
        from: String,
        /// End color (6-digit hex).
        to: String,
        /// Which paint to animate.
        #[serde(default)]
        target: ColorTarget,
    },
}

impl TrackPayload {
    /// Lower-case kind name as it appears in scene documents.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Move { .. } => "move",
            Self::Rotate { .. } => "rotate",
            Self::Scale { .. } => "scale",
            Self::Fade { .. } => "fade",
            Self::Color { .. } => "color",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, serde::Serialize, serde::Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
/// Paint targeted by a color track.
pub enum ColorTarget {
    /// Fill color.
    #[default]
    Fill,
    /// Stroke color.
    Stroke,
}

#[cfg(test)]
#[path = "../../tests/unit/scene/model.rs"]
mod tests;
