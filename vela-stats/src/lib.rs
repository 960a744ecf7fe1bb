//! Counts statistics for gamma-ray analyses.
//!
//! Poisson and chi-square statistics used to annotate residual sky
//! maps and exclusion limits:
//!
//! - **Special functions** — closed-form gamma, Lanczos ln-gamma, erf,
//!   regularized incomplete gamma ([`special`])
//! - **Distributions** — [`Normal`], [`Poisson`], and [`ChiSquared`]
//!   with a first-crossing quantile search ([`distribution`])
//! - **Significance** — mirrored-tail counts significance and per-pixel
//!   significance maps ([`significance`])
//! - **Limits** — Garwood/PDG Poisson intervals and brazil-band
//!   containment extraction ([`limits`])
//! - **Smoothing** — Savitzky-Golay filtering of band curves
//!   ([`smoothing`])
//! - **Grids** — linear and log-uniform binning ([`grid`])

pub mod distribution;
pub mod grid;
pub mod limits;
pub mod significance;
pub mod smoothing;
pub mod special;

pub use distribution::{ChiSquared, Distribution, Normal, Poisson};
pub use limits::{containment_bands, poisson_limits, ContainmentBands, PoissonInterval};
pub use significance::{
    counts_significance, counts_significance_with, sigma_given_p, significance_map, SigmaGrid,
};
pub use smoothing::savitzky_golay;
