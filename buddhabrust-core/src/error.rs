use thiserror::Error;

/// Errors originating from the core math types.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid max iterations: {0} (must be >= 1)")]
    InvalidMaxIterations(u32),

    #[error("invalid escape radius: {0} (must be > 0.0)")]
    InvalidEscapeRadius(f64),

    #[error("invalid view parameters: {reason}")]
    InvalidViewParams { reason: String },

    #[error("invalid screen size: {width}×{height} (both sides must be > 0)")]
    InvalidScreenSize { width: u32, height: u32 },
}
