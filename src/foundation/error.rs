/// Convenience result type used across reelsmith.
pub type ReelResult<T> = Result<T, ReelError>;

/// Top-level error taxonomy.
///
/// Asset-resolution misses are not represented here: the locator returns `None` and the scene
/// proceeds without that track. Every variant below halts the run once it reaches the sequencer.
#[derive(thiserror::Error, Debug)]
pub enum ReelError {
    /// Malformed script or invalid parameters.
    #[error("validation error: {0}")]
    Validation(String),

    /// A provider returned a non-success status, malformed payload, or timed out.
    #[error("acquisition error: {0}")]
    Acquisition(String),

    /// A required asset is missing or unreadable while composing a scene.
    #[error("composition error: {0}")]
    Composition(String),

    /// Final encoding/muxing failed.
    #[error("encoding error: {0}")]
    Encoding(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// A failure attributed to one scene of the script.
    #[error("scene {index}: {source}")]
    Scene {
        /// 0-based script index of the failing scene.
        index: usize,
        /// Underlying cause.
        #[source]
        source: Box<ReelError>,
    },

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ReelError {
    /// Build a [`ReelError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`ReelError::Acquisition`] value.
    pub fn acquisition(msg: impl Into<String>) -> Self {
        Self::Acquisition(msg.into())
    }

    /// Build a [`ReelError::Composition`] value.
    pub fn composition(msg: impl Into<String>) -> Self {
        Self::Composition(msg.into())
    }

    /// Build a [`ReelError::Encoding`] value.
    pub fn encoding(msg: impl Into<String>) -> Self {
        Self::Encoding(msg.into())
    }

    /// Build a [`ReelError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Attribute this error to scene `index`. Already-attributed errors are left untouched.
    pub fn in_scene(self, index: usize) -> Self {
        match self {
            Self::Scene { .. } => self,
            other => Self::Scene {
                index,
                source: Box::new(other),
            },
        }
    }

    /// Scene index this error is attributed to, if any.
    pub fn scene_index(&self) -> Option<usize> {
        match self {
            Self::Scene { index, .. } => Some(*index),
            _ => None,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
