/// Crate-wide result alias.
pub type SingularityResult<T> = Result<T, SingularityError>;

/// Errors raised while configuring, building, or rendering a scene.
#[derive(thiserror::Error, Debug)]
pub enum SingularityError {
    /// Settings or input data failed validation.
    #[error("validation error: {0}")]
    Validation(String),

    /// A material graph could not be assembled.
    #[error("material graph error: {0}")]
    Graph(String),

    /// A keyframe channel was misused or sampled without keys.
    #[error("animation error: {0}")]
    Animation(String),

    /// A path or deformation binding could not be attached to an object.
    #[error("binding error: {0}")]
    Binding(String),

    /// The external render delegate failed.
    #[error("render error: {0}")]
    Render(String),

    /// The external 3D host (renderer program) is not available.
    #[error("missing host runtime: {0}")]
    MissingHostRuntime(String),

    /// Config or scene document (de)serialization failed.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Any other failure, usually IO with context attached.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SingularityError {
    /// Build a [`SingularityError::Validation`].
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`SingularityError::Graph`].
    pub fn graph(msg: impl Into<String>) -> Self {
        Self::Graph(msg.into())
    }

    /// Build a [`SingularityError::Animation`].
    pub fn animation(msg: impl Into<String>) -> Self {
        Self::Animation(msg.into())
    }

    /// Build a [`SingularityError::Binding`].
    pub fn binding(msg: impl Into<String>) -> Self {
        Self::Binding(msg.into())
    }

    /// Build a [`SingularityError::Render`].
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`SingularityError::MissingHostRuntime`].
    pub fn missing_host(msg: impl Into<String>) -> Self {
        Self::MissingHostRuntime(msg.into())
    }

    /// Build a [`SingularityError::Serde`].
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
