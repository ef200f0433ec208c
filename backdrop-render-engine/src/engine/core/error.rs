use thiserror::Error;

/// Failures at the edges of the engine. None of them propagate to the host page;
/// they are logged and reported as notifications while the scene degrades.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BackdropError {
    #[error("rendering context unavailable: {0}")]
    ContextUnavailable(String),

    #[error("failed to load texture {asset}: {reason}")]
    TextureLoad { asset: String, reason: String },

    #[error("failed to load model {path}: {reason}")]
    ModelLoad { path: String, reason: String },

    #[error("model {path} contains no scene")]
    EmptyModel { path: String },

    #[error("unknown section: {0}")]
    UnknownSection(String),
}

impl BackdropError {
    /// Short machine-readable kind used in host notifications.
    pub fn kind(&self) -> &'static str {
        match self {
            BackdropError::ContextUnavailable(_) => "context_unavailable",
            BackdropError::TextureLoad { .. } => "texture_load",
            BackdropError::ModelLoad { .. } => "model_load",
            BackdropError::EmptyModel { .. } => "empty_model",
            BackdropError::UnknownSection(_) => "unknown_section",
        }
    }

    /// Asset the failure concerns, if any.
    pub fn asset(&self) -> Option<&str> {
        match self {
            BackdropError::TextureLoad { asset, .. } => Some(asset),
            BackdropError::ModelLoad { path, .. } | BackdropError::EmptyModel { path } => {
                Some(path)
            }
            BackdropError::ContextUnavailable(_) | BackdropError::UnknownSection(_) => None,
        }
    }
}
