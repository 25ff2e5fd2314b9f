/// Convenience result type used across framewall.
pub type MockupResult<T> = Result<T, MockupError>;

/// Top-level error taxonomy used by pipeline APIs.
///
/// Every variant except [`MockupError::EnvironmentSource`] is fatal for the request: the
/// pipeline never retries a stage internally.
#[derive(thiserror::Error, Debug)]
pub enum MockupError {
    /// Non-positive, non-finite or unparseable physical size, or an unknown unit.
    #[error("invalid dimension: {0}")]
    InvalidDimension(String),

    /// Frame style outside the closed catalog.
    #[error("unsupported frame style: {0}")]
    UnsupportedFrameStyle(String),

    /// Mat option outside the closed catalog.
    #[error("unsupported mat option: {0}")]
    UnsupportedMatOption(String),

    /// Corrupt or unreadable input raster.
    #[error("asset decode failure: {0}")]
    AssetDecode(String),

    /// Output serialization failed.
    #[error("encoding failure: {0}")]
    Encoding(String),

    /// Invalid configuration or request data.
    #[error("validation error: {0}")]
    Validation(String),

    /// The environment collaborator could not supply a background.
    #[error("environment source error: {0}")]
    EnvironmentSource(String),

    /// The owning request was aborted at a stage boundary.
    #[error("cancelled at {0}")]
    Cancelled(&'static str),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl MockupError {
    /// Build a [`MockupError::InvalidDimension`] value.
    pub fn invalid_dimension(msg: impl Into<String>) -> Self {
        Self::InvalidDimension(msg.into())
    }

    /// Build a [`MockupError::UnsupportedFrameStyle`] value.
    pub fn unsupported_frame_style(msg: impl Into<String>) -> Self {
        Self::UnsupportedFrameStyle(msg.into())
    }

    /// Build a [`MockupError::UnsupportedMatOption`] value.
    pub fn unsupported_mat_option(msg: impl Into<String>) -> Self {
        Self::UnsupportedMatOption(msg.into())
    }

    /// Build a [`MockupError::AssetDecode`] value.
    pub fn asset_decode(msg: impl Into<String>) -> Self {
        Self::AssetDecode(msg.into())
    }

    /// Build a [`MockupError::Encoding`] value.
    pub fn encoding(msg: impl Into<String>) -> Self {
        Self::Encoding(msg.into())
    }

    /// Build a [`MockupError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`MockupError::EnvironmentSource`] value.
    pub fn environment_source(msg: impl Into<String>) -> Self {
        Self::EnvironmentSource(msg.into())
    }

    /// Whether a caller may reasonably retry the whole request.
    ///
    /// Only failures of the external environment collaborator qualify.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::EnvironmentSource(_))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
