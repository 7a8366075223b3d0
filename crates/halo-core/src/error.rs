use thiserror::Error;

/// Errors surfaced by the scene core.
///
/// Arrangement and animation-request errors are raised synchronously by the
/// call that received bad input. Backend errors are fatal to the render loop.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SceneError {
    #[error("invalid arrangement spec: {0}")]
    InvalidSpec(String),

    #[error("invalid animation request: {0}")]
    InvalidAnimationRequest(String),

    #[error("rendering backend unavailable: {0}")]
    BackendUnavailable(String),

    #[error("frame submission failed: {0}")]
    Backend(String),
}

pub type Result<T> = std::result::Result<T, SceneError>;
