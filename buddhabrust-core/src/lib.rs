pub mod complex;
pub mod error;
pub mod fractal;
pub mod window;

// Re-export primary types for convenience.
pub use complex::Complex;
pub use error::CoreError;
pub use fractal::{FractalKind, IterParams, Symmetry};
pub use window::{ExportSize, ScreenSize, ViewParams, ViewWindow};

/// Convenience result type for the core crate.
pub type Result<T> = std::result::Result<T, CoreError>;
