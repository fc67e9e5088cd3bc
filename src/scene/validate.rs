use crate::foundation::color::Rgb8;
use crate::foundation::error::{MathreelError, MathreelResult};
use crate::scene::model::{AnimationScene, ShapeKind, TrackPayload};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// How serious a validation issue is.
pub enum Severity {
    /// Reported, but rendering proceeds.
    Warning,
    /// Rendering refuses the scene.
    Error,
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// One finding from [`validate_issues`].
pub struct ValidationIssue {
    /// Severity.
    pub severity: Severity,
    /// Human-readable description naming the offending object or track.
    pub message: String,
}

impl ValidationIssue {
    fn error(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
        }
    }

    fn warning(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            message: message.into(),
        }
    }

    /// True for [`Severity::Error`].
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl std::fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.severity {
            Severity::Error => write!(f, "error: {}", self.message),
            Severity::Warning => write!(f, "warning: {}", self.message),
        }
    }
}

/// Check a scene for referential and temporal integrity.
///
/// Every check runs; issues accumulate in scene order. The scene is never modified and nothing
/// here fails: callers decide what to do with the result.
pub fn validate_issues(scene: &AnimationScene) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    if !scene.duration.is_finite() || scene.duration <= 0.0 {
        issues.push(ValidationIssue::error(format!(
            "scene duration must be > 0 (got {})",
            scene.duration
        )));
    }
    if scene.objects.is_empty() {
        issues.push(ValidationIssue::error("scene has no objects"));
    }
    if Rgb8::parse_css(&scene.background_color).is_none() {
        issues.push(ValidationIssue::error(format!(
            "backgroundColor '{}' is not a color",
            scene.background_color
        )));
    }

    let mut seen = std::collections::HashSet::new();
    for obj in &scene.objects {
        if !seen.insert(obj.id.as_str()) {
            issues.push(ValidationIssue::error(format!(
                "duplicate object id '{}'",
                obj.id
            )));
        }
        let dims_ok = match obj.shape {
            ShapeKind::Triangle { size } => size > 0.0,
            ShapeKind::Circle { radius } => radius > 0.0,
            ShapeKind::Rectangle { width, height } => width > 0.0 && height > 0.0,
        };
        if !dims_ok {
            issues.push(ValidationIssue::error(format!(
                "object '{}' ({}) must have positive dimensions",
                obj.id,
                obj.shape.name()
            )));
        }
    }

    for (i, track) in scene.animations.iter().enumerate() {
        let label = format!(
            "animation #{i} ({}) on '{}'",
            track.payload.name(),
            track.object_id
        );

        if !seen.contains(track.object_id.as_str()) {
            issues.push(ValidationIssue::error(format!(
                "animation #{i} ({}) references unknown object id '{}'",
                track.payload.name(),
                track.object_id
            )));
        }
        if !track.start_time.is_finite() || track.start_time < 0.0 {
            issues.push(ValidationIssue::error(format!(
                "{label} has invalid startTime {}",
                track.start_time
            )));
        }
        if !track.duration.is_finite() || track.duration < 0.0 {
            issues.push(ValidationIssue::error(format!(
                "{label} has invalid duration {}",
                track.duration
            )));
        }
        if track.end_time() > scene.duration {
            issues.push(ValidationIssue::warning(format!(
                "{label} ends at {}s, after the scene duration {}s",
                track.end_time(),
                scene.duration
            )));
        }
        if let TrackPayload::Fade { from, to } = track.payload
            && !((0.0..=1.0).contains(&from) && (0.0..=1.0).contains(&to))
        {
            issues.push(ValidationIssue::error(format!(
                "{label} has opacity outside [0, 1] ({from} -> {to})"
            )));
        }
    }

    issues
}

/// [`validate_issues`] flattened to display strings. Empty means valid.
pub fn validate(scene: &AnimationScene) -> Vec<String> {
    validate_issues(scene)
        .iter()
        .map(ToString::to_string)
        .collect()
}

/// Log warnings and fail on the first batch of errors.
pub fn ensure_renderable(scene: &AnimationScene) -> MathreelResult<()> {
    let issues = validate_issues(scene);
    for issue in issues.iter().filter(|i| !i.is_error()) {
        tracing::warn!("{}", issue.message);
    }
    let errors: Vec<&str> = issues
        .iter()
        .filter(|i| i.is_error())
        .map(|i| i.message.as_str())
        .collect();
    if errors.is_empty() {
        Ok(())
    } else {
        Err(MathreelError::validation(errors.join("; ")))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/validate.rs"]
mod tests;
