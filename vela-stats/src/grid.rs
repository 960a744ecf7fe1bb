//! Grid and binning helpers.
//!
//! [`linspace`] and [`log_spaced`] build the evenly and log-uniformly
//! spaced grids used by the sigma-grid inversion and by energy binning
//! (the analysis bins 6 GeV – 800 GeV into 50 log-uniform intervals).

use vela_core::{Result, VelaError};

/// `n` evenly spaced points from `lo` to `hi`, both endpoints included.
pub fn linspace(lo: f64, hi: f64, n: usize) -> Result<Vec<f64>> {
    if n < 2 {
        return Err(VelaError::InvalidInput(
            "linspace: need at least 2 points".into(),
        ));
    }
    if !lo.is_finite() || !hi.is_finite() || hi <= lo {
        return Err(VelaError::InvalidInput(
            "linspace: need finite bounds with hi > lo".into(),
        ));
    }
    let step = (hi - lo) / (n - 1) as f64;
    let mut pts: Vec<f64> = (0..n).map(|i| lo + i as f64 * step).collect();
    pts[n - 1] = hi;
    Ok(pts)
}

/// `n` log-uniformly spaced points from `lo` to `hi` (both positive),
/// endpoints included. Equivalent to exponentiating a [`linspace`] in
/// log10 space.
pub fn log_spaced(lo: f64, hi: f64, n: usize) -> Result<Vec<f64>> {
    if lo <= 0.0 || hi <= 0.0 {
        return Err(VelaError::InvalidInput(
            "log_spaced: bounds must be positive".into(),
        ));
    }
    let exponents = linspace(lo.log10(), hi.log10(), n)?;
    Ok(exponents.into_iter().map(|e| 10.0_f64.powf(e)).collect())
}
