use thiserror::Error;

/// Errors originating from the sampling engine.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("view parameters and resolution are frozen while sampling is active")]
    Sampling,

    #[error("failed to allocate {bytes} bytes for sampling buffers")]
    Allocation { bytes: usize },

    #[error("invalid engine config: {reason}")]
    InvalidConfig { reason: String },

    #[error("failed to spawn sampler worker: {0}")]
    Spawn(#[from] std::io::Error),

    #[error(transparent)]
    Core(#[from] buddhabrust_core::CoreError),
}
