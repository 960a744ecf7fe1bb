//! Structured error types for the Vela crates.

use thiserror::Error;

/// Unified error type for all Vela operations.
#[derive(Debug, Error)]
pub enum VelaError {
    /// Invalid input (bad arguments, out-of-range values)
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// An iterative numerical search exhausted its iteration cap
    #[error("no convergence: {0}")]
    NonConvergence(String),
}

/// Convenience alias used throughout the Vela crates.
pub type Result<T> = std::result::Result<T, VelaError>;
