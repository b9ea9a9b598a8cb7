/// Convenience result type used across Kolam.
pub type KolamResult<T> = Result<T, KolamError>;

/// Top-level error taxonomy for Kolam operations.
///
/// Playback boundaries (stepping past the end, stepping back at zero, undo on an
/// empty stack, deleting a handle twice) are not represented here: those are
/// clamped no-ops inside the engine.
#[derive(thiserror::Error, Debug)]
pub enum KolamError {
    /// A stroke file had the wrong JSON shape or an invalid step.
    #[error("malformed sequence file: {0}")]
    MalformedSequence(String),

    /// Configuration or model validation failure.
    #[error("validation error: {0}")]
    Validation(String),

    /// Failure while rasterizing or writing a snapshot.
    #[error("render error: {0}")]
    Render(String),

    /// JSON (de)serialization failure.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl KolamError {
    /// Build a [`KolamError::MalformedSequence`] value.
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedSequence(msg.into())
    }

    /// Build a [`KolamError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`KolamError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`KolamError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
