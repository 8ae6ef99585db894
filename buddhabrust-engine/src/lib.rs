pub mod engine;
pub mod error;
pub mod frame;
pub mod histogram;
pub mod plot;
mod sampler;

// Re-export primary types for convenience.
pub use engine::{Engine, EngineConfig};
pub use error::EngineError;
pub use frame::{ColorWeights, RenderFrame};
pub use histogram::Histogram;
pub use plot::{plot, splat_cells};

/// Convenience result type for the engine crate.
pub type Result<T> = std::result::Result<T, EngineError>;
