//! Shared primitives for the Vela gamma-ray analysis crates.
//!
//! `vela-core` provides the foundation the other Vela crates build on:
//!
//! - **Error types** — [`VelaError`] and [`Result`] for structured error handling
//! - **Traits** — [`Summarizable`] for one-line display of result types

pub mod error;
pub mod traits;

pub use error::{Result, VelaError};
pub use traits::Summarizable;
