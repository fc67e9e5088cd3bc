/// Convenience result type used across mathreel.
pub type MathreelResult<T> = Result<T, MathreelError>;

/// Top-level error taxonomy used by engine APIs.
#[derive(thiserror::Error, Debug)]
pub enum MathreelError {
    /// Invalid user-provided scene, options or frame data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors while evaluating or drawing a frame.
    #[error("evaluation error: {0}")]
    Evaluation(String),

    /// Errors while compiling or parsing vector markup.
    #[error("markup error: {0}")]
    Markup(String),

    /// Errors while spawning or feeding the encoder subprocess.
    #[error("encode error: {0}")]
    Encode(String),

    /// The encoder subprocess exited unsuccessfully.
    #[error("encoder exited with code {}: {stderr}", .code.map_or_else(|| "<signal>".to_string(), |c| c.to_string()))]
    EncoderExit {
        /// Exit code, `None` when the process was terminated by a signal.
        code: Option<i32>,
        /// Captured (trimmed) stderr output of the encoder.
        stderr: String,
    },

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl MathreelError {
    /// Build a [`MathreelError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`MathreelError::Evaluation`] value.
    pub fn evaluation(msg: impl Into<String>) -> Self {
        Self::Evaluation(msg.into())
    }

    /// Build a [`MathreelError::Markup`] value.
    pub fn markup(msg: impl Into<String>) -> Self {
        Self::Markup(msg.into())
    }

    /// Build a [`MathreelError::Encode`] value.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// Build a [`MathreelError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
