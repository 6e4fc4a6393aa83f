//! # Core Error Types
//!
//! The gate and the reconciler never fail: stray completions and
//! unresolved positions are normal traffic. What can fail is configuration.

use thiserror::Error;

/// Errors raised by the core.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    /// Squash distances are not ordered `0 <= near < far`.
    #[error("invalid squash range: near {near} must be >= 0 and below far {far}")]
    InvalidSquashRange {
        /// Full-squash distance.
        near: f32,
        /// No-squash distance.
        far: f32,
    },

    /// Maximum squash is not a scale factor in `(0, 1]`.
    #[error("invalid maximum squash {0}: expected a factor in (0, 1]")]
    InvalidSquashFactor(f32),

    /// Visibility radius is negative or not a number.
    #[error("invalid visibility radius {0}")]
    InvalidRadius(f64),
}

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;
