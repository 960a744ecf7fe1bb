//! Gaussian-equivalent significance of observed counts.
//!
//! Converts observed/expected count pairs into signed sigma values for
//! annotating residual sky maps:
//!
//! - [`SigmaGrid`] — tabulated standard-normal CDF, inverted by nearest
//!   grid point
//! - [`sigma_given_p`] — upper-tail probability → one-sided sigma
//! - [`counts_significance`] — mirrored-tail Poisson significance
//! - [`significance_map`] — per-pixel significance over two images

use vela_core::{Result, VelaError};

use crate::distribution::{Distribution, Normal, Poisson};
use crate::grid::linspace;

/// Half-width of the standardized grid used by [`SigmaGrid::standard`].
pub const SIGMA_GRID_HALF_WIDTH: f64 = 200.0;

/// Number of points in the grid used by [`SigmaGrid::standard`].
pub const SIGMA_GRID_POINTS: usize = 50_000;

// ── Sigma grid ─────────────────────────────────────────────────────────────

/// Tabulated standard-normal CDF on a uniform grid in z.
///
/// The CDF is a normalized cumulative sum of the density over the grid,
/// and inversion returns the grid point whose CDF value is nearest the
/// target (the earliest such point on ties). Answers are therefore
/// quantized to the grid spacing — 0.008 σ for the standard grid — and
/// saturate for p of exactly 0 or 1: at the left grid edge, where the
/// density underflows to a zero-CDF plateau, and near +8 σ, where the
/// normalized cumulative sum rounds up to one. This
/// tabulated inversion, rather than a closed-form inverse normal CDF,
/// keeps sigma values bit-compatible with the published maps.
#[derive(Debug, Clone)]
pub struct SigmaGrid {
    z: Vec<f64>,
    cdf: Vec<f64>,
}

impl SigmaGrid {
    /// The ±200 σ, 50 000-point grid used throughout the analysis.
    pub fn standard() -> Self {
        let step = 2.0 * SIGMA_GRID_HALF_WIDTH / (SIGMA_GRID_POINTS - 1) as f64;
        let z: Vec<f64> = (0..SIGMA_GRID_POINTS)
            .map(|i| -SIGMA_GRID_HALF_WIDTH + i as f64 * step)
            .collect();
        Self::from_grid(z)
    }

    /// A grid over ±`half_width` with `points` samples, for callers that
    /// need a different resolution/precision trade-off.
    pub fn with_params(half_width: f64, points: usize) -> Result<Self> {
        let z = linspace(-half_width, half_width, points)?;
        Ok(Self::from_grid(z))
    }

    fn from_grid(z: Vec<f64>) -> Self {
        let normal = Normal::standard();
        let mut cdf = Vec::with_capacity(z.len());
        let mut running = 0.0;
        for &zi in &z {
            running += normal.pdf(zi);
            cdf.push(running);
        }
        if running > 0.0 {
            for c in &mut cdf {
                *c /= running;
            }
        }
        Self { z, cdf }
    }

    /// Number of grid points.
    pub fn len(&self) -> usize {
        self.z.len()
    }

    /// Whether the grid is empty (never true for constructed grids).
    pub fn is_empty(&self) -> bool {
        self.z.is_empty()
    }

    /// The standardized value z with P(Z ≤ z) = 1 − p, to grid
    /// resolution.
    ///
    /// # Errors
    ///
    /// Returns an error if `p` is outside [0, 1].
    pub fn invert(&self, p: f64) -> Result<f64> {
        if !(0.0..=1.0).contains(&p) {
            return Err(VelaError::InvalidInput(
                "sigma_given_p: p must be in [0, 1]".into(),
            ));
        }
        let target = 1.0 - p;
        let mut best = 0;
        let mut best_dist = f64::INFINITY;
        for (i, &c) in self.cdf.iter().enumerate() {
            let dist = (c - target).abs();
            if dist < best_dist {
                best_dist = dist;
                best = i;
            }
        }
        Ok(self.z[best])
    }
}

/// One-sided Gaussian significance equivalent to an upper-tail
/// probability `p`, via [`SigmaGrid::standard`].
///
/// `sigma_given_p(0.159)` ≈ 1.0, `sigma_given_p(0.5)` ≈ 0.0. Callers
/// converting many p-values should build one [`SigmaGrid`] and call
/// [`SigmaGrid::invert`] directly.
pub fn sigma_given_p(p: f64) -> Result<f64> {
    SigmaGrid::standard().invert(p)
}

// ── Counts significance ────────────────────────────────────────────────────

/// Signed Gaussian significance of `observed` counts against a Poisson
/// expectation of `mean` counts, using [`SigmaGrid::standard`].
///
/// See [`counts_significance_with`] for the construction; this
/// convenience wrapper builds the grid on every call.
pub fn counts_significance(observed: f64, mean: f64) -> Result<f64> {
    counts_significance_with(&SigmaGrid::standard(), observed, mean)
}

/// Signed Gaussian significance of `observed` counts against a Poisson
/// expectation of `mean` counts.
///
/// The p-value is a mirrored tail: for an upward fluctuation the
/// Poisson(mean) mass is summed over unit-stepped k from
/// max(2·mean − observed, 0) up to (but excluding) observed, and the
/// complement is converted to sigma; a downward fluctuation mirrors the
/// range and flips the sign. When observed and mean are less than one
/// count apart the summed tail degenerates, and the single-bin
/// complement 1 − pmf(observed) is used instead — a branch that is
/// discontinuous at one count of separation and can return a sigma
/// whose sign disagrees with observed − mean. This construction is kept
/// exactly as used for the published residual maps; it is not a
/// standard two-sided test.
///
/// # Errors
///
/// Returns an error for negative `observed` or `mean`.
pub fn counts_significance_with(grid: &SigmaGrid, observed: f64, mean: f64) -> Result<f64> {
    if observed < 0.0 || mean < 0.0 {
        return Err(VelaError::InvalidInput(
            "counts_significance: counts must be non-negative".into(),
        ));
    }
    if observed == mean {
        return Ok(0.0);
    }

    let poisson = Poisson::new(mean)?;
    if observed > mean {
        let pvalue = if (observed - mean).abs() < 1.0 {
            1.0 - poisson.pmf(observed)
        } else {
            let mut tail = 0.0;
            let mut k = (2.0 * mean - observed).max(0.0);
            while k < observed.max(0.0) {
                tail += poisson.pmf(k);
                k += 1.0;
            }
            1.0 - tail
        };
        grid.invert(pvalue)
    } else {
        let pvalue = if (observed - mean).abs() < 1.0 {
            1.0 - poisson.pmf(observed)
        } else {
            let mut tail = 0.0;
            let mut k = observed.max(0.0);
            while k < 2.0 * mean - observed {
                tail += poisson.pmf(k);
                k += 1.0;
            }
            1.0 - tail
        };
        Ok(-grid.invert(pvalue)?)
    }
}

/// Per-pixel [`counts_significance`] of an observed image against a
/// model image, flattened to matching slices.
///
/// # Errors
///
/// Returns an error if the slices differ in length or any pixel pair
/// is out of domain.
pub fn significance_map(observed: &[f64], model: &[f64]) -> Result<Vec<f64>> {
    if observed.len() != model.len() {
        return Err(VelaError::InvalidInput(format!(
            "significance_map: length mismatch ({} observed vs {} model)",
            observed.len(),
            model.len(),
        )));
    }
    let grid = SigmaGrid::standard();
    observed
        .iter()
        .zip(model)
        .map(|(&o, &m)| counts_significance_with(&grid, o, m))
        .collect()
}

// ── Tests ──────────────────────────────────────────────────────────────────
