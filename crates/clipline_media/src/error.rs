use clipline_core::types::Generation;
use clipline_core::CoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MediaError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("audio signal is empty")]
    EmptySignal,

    #[error("invalid bucket count: {0}")]
    InvalidBucketCount(usize),

    #[error("stale result: expected {expected}, got {got}")]
    StaleGeneration { expected: Generation, got: Generation },

    #[error("media channel closed")]
    ChannelClosed,

    #[error("decode failed: {0}")]
    Decode(String),
}

pub type Result<T> = std::result::Result<T, MediaError>;
