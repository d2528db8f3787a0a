/// Convenience result type used across votive.
pub type VotiveResult<T> = Result<T, VotiveError>;

/// Top-level error taxonomy used by the generation APIs.
///
/// Every variant is terminal for the call that produced it. Callers that only need to know
/// whether generation succeeded can use [`VotiveError::is_generation_failure`].
#[derive(thiserror::Error, Debug)]
pub enum VotiveError {
    /// The font-metrics capability is missing or returned unusable measurements.
    #[error("generation failed: layout unavailable: {0}")]
    LayoutUnavailable(String),

    /// Frame, palette or dimension inconsistency while assembling the GIF.
    #[error("generation failed: encode failure: {0}")]
    EncodeFailure(String),

    /// Invalid caller-provided options.
    #[error("validation error: {0}")]
    Validation(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl VotiveError {
    /// Build a [`VotiveError::LayoutUnavailable`] value.
    pub fn layout_unavailable(msg: impl Into<String>) -> Self {
        Self::LayoutUnavailable(msg.into())
    }

    /// Build a [`VotiveError::EncodeFailure`] value.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::EncodeFailure(msg.into())
    }

    /// Build a [`VotiveError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// True for the two synthesis failures that surface as an opaque "generation failed".
    pub fn is_generation_failure(&self) -> bool {
        matches!(self, Self::LayoutUnavailable(_) | Self::EncodeFailure(_))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
