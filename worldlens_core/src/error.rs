use thiserror::Error;
use uuid::Uuid;

pub type Result<T> = std::result::Result<T, EngineError>;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Provider error: {0}")]
    Provider(anyhow::Error),

    #[error("Malformed provider response: {0}")]
    MalformedResponse(String),

    #[error("{pattern_count} pattern(s) reference missing worldview {worldview_id}")]
    DanglingWorldview { worldview_id: Uuid, pattern_count: u64 },

    #[error("Worldview not found: {0}")]
    WorldviewNotFound(Uuid),

    #[error("Perception not found: {0}")]
    PerceptionNotFound(Uuid),

    #[error("Store error: {0}")]
    Store(#[from] anyhow::Error),
}
