use std::collections::BTreeMap;
use std::f64::consts::TAU;

use crate::foundation::color::interpolate_hex_colors;
use crate::foundation::core::{Point, Transform2D, Vec2};
use crate::foundation::math::{lerp, lerp_point, lerp_vec2, normalize};
use crate::scene::model::{AnimationScene, AnimationTrack, ColorTarget, SceneObject, TrackPayload};

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
/// Visual state of one object at one instant.
pub struct ObjectState {
    /// Center position in canvas pixels.
    pub position: Point,
    /// Rotation in radians.
    pub rotation: f64,
    /// Per-axis scale.
    pub scale: Vec2,
    /// Opacity; stays in `[0, 1]` as long as fade payloads do.
    pub opacity: f64,
    /// Fill color as authored or as `rgb(r,g,b)` once interpolated.
    pub fill_color: String,
    /// Stroke color, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke_color: Option<String>,
}

impl ObjectState {
    /// State at time zero, before any track applies.
    pub fn initial(obj: &SceneObject) -> Self {
        Self {
            position: obj.initial_position,
            rotation: obj.initial_rotation,
            scale: obj.initial_scale.as_vec2(),
            opacity: obj.initial_opacity,
            fill_color: obj.fill_color.clone(),
            stroke_color: obj.stroke_color.clone(),
        }
    }

    /// Object transform: translate to position, rotate, then scale.
    pub fn transform(&self) -> Transform2D {
        Transform2D {
            translate: self.position.to_vec2(),
            rotate: self.rotation,
            scale: self.scale,
        }
    }
}

/// Evaluate one object at `time` seconds.
///
/// Tracks targeting the object apply in declaration order, each overwriting the property it
/// animates, so the last applicable track wins. A track before its start contributes nothing; at
/// or past its end it contributes its end value exactly. Returns `None` for an unknown id.
pub fn evaluate(scene: &AnimationScene, object_id: &str, time: f64) -> Option<ObjectState> {
    let obj = scene.object(object_id)?;
    let mut state = ObjectState::initial(obj);
    for track in scene.animations.iter().filter(|t| t.object_id == object_id) {
        apply_track(&mut state, track, time);
    }
    Some(state)
}

/// Evaluate every object at `time`, keyed by id.
///
/// Objects are independent of each other; the result does not depend on iteration order.
#[tracing::instrument(level = "trace", skip(scene))]
pub fn evaluate_scene(scene: &AnimationScene, time: f64) -> BTreeMap<String, ObjectState> {
    scene
        .objects
        .iter()
        .filter_map(|obj| Some((obj.id.clone(), evaluate(scene, &obj.id, time)?)))
        .collect()
}

fn apply_track(state: &mut ObjectState, track: &AnimationTrack, time: f64) {
    if time < track.start_time {
        return;
    }
    // `None` means the track is complete and contributes its end value.
    let t = if time >= track.end_time() {
        None
    } else {
        Some(
            track
                .easing
                .apply(normalize(time, track.start_time, track.duration)),
        )
    };

    match &track.payload {
        TrackPayload::Move { from, to } => {
            state.position = t.map_or(*to, |t| lerp_point(*from, *to, t));
        }
        TrackPayload::Rotate {
            from,
            to,
            rotations,
        } => {
            let end = rotations.map_or(*to, |n| from + n * TAU);
            state.rotation = t.map_or(end, |t| lerp(*from, end, t));
        }
        TrackPayload::Scale { from, to } => {
            let (from, to) = (from.as_vec2(), to.as_vec2());
            state.scale = t.map_or(to, |t| lerp_vec2(from, to, t));
        }
        TrackPayload::Fade { from, to } => {
            state.opacity = t.map_or(*to, |t| lerp(*from, *to, t));
        }
        TrackPayload::Color { from, to, target } => {
            let color = match t {
                None => to.clone(),
                Some(t) => interpolate_hex_colors(from, to, t),
            };
            match target {
                ColorTarget::Fill => state.fill_color = color,
                ColorTarget::Stroke => state.stroke_color = Some(color),
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/eval/timeline.rs"]
mod tests;
