//! Probability distributions for counts data.
//!
//! Provides the [`Distribution`] trait and the three distributions the
//! counts statistics are built from:
//!
//! - [`Normal`] — underlies the sigma-grid inversion of p-values
//! - [`Poisson`] — per-pixel counts model, with a mass function
//!   generalized to real-valued counts through Γ(k+1)
//! - [`ChiSquared`] — TS distributions and the Garwood limit quantiles,
//!   with a first-crossing [`ChiSquared::quantile`] search

use core::f64::consts::PI;

use vela_core::{Result, VelaError};

use crate::special::{erf, gamma, gammainc, ln_gamma};

/// Step size of the default chi-square quantile scan.
///
/// The quantile search walks the grid {0, dx, 2dx, …} and returns the
/// first crossing, so returned quantiles are quantized upward to this
/// resolution. Halving the step halves the quantization error and
/// doubles the scan cost.
pub const QUANTILE_STEP: f64 = 0.01;

/// Iteration cap for the quantile scan. At the default step this
/// covers quantiles up to x = 100 000 before giving up.
pub const QUANTILE_MAX_STEPS: usize = 10_000_000;

// ── Distribution trait ─────────────────────────────────────────────────────

/// A probability distribution with basic statistical properties.
pub trait Distribution {
    /// Probability density (or mass) function at `x`.
    fn pdf(&self, x: f64) -> f64;

    /// Cumulative distribution function at `x`.
    fn cdf(&self, x: f64) -> f64;

    /// Distribution mean.
    fn mean(&self) -> f64;

    /// Distribution variance.
    fn variance(&self) -> f64;

    /// Distribution standard deviation (default: sqrt of variance).
    fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }
}

// ── Normal distribution ────────────────────────────────────────────────────

/// Normal (Gaussian) distribution with parameters μ and σ.
#[derive(Debug, Clone, Copy)]
pub struct Normal {
    mu: f64,
    sigma: f64,
}

impl Normal {
    /// Create a new Normal distribution. `sigma` must be positive.
    pub fn new(mu: f64, sigma: f64) -> Result<Self> {
        if sigma <= 0.0 {
            return Err(VelaError::InvalidInput(
                "Normal: sigma must be positive".into(),
            ));
        }
        Ok(Self { mu, sigma })
    }

    /// Standard normal distribution N(0, 1).
    pub fn standard() -> Self {
        Self {
            mu: 0.0,
            sigma: 1.0,
        }
    }
}

impl Distribution for Normal {
    fn pdf(&self, x: f64) -> f64 {
        let z = (x - self.mu) / self.sigma;
        (-0.5 * z * z).exp() / (self.sigma * (2.0 * PI).sqrt())
    }

    fn cdf(&self, x: f64) -> f64 {
        let z = (x - self.mu) / self.sigma;
        0.5 * (1.0 + erf(z / core::f64::consts::SQRT_2))
    }

    fn mean(&self) -> f64 {
        self.mu
    }

    fn variance(&self) -> f64 {
        self.sigma * self.sigma
    }
}

// ── Poisson distribution ───────────────────────────────────────────────────

/// Poisson distribution with rate parameter λ.
///
/// λ = 0 is allowed: model maps routinely contain zero-expectation
/// pixels, for which the distribution degenerates to a point mass at 0.
#[derive(Debug, Clone, Copy)]
pub struct Poisson {
    lambda: f64,
}

impl Poisson {
    /// Create a new Poisson distribution. `lambda` must be non-negative.
    pub fn new(lambda: f64) -> Result<Self> {
        if lambda < 0.0 {
            return Err(VelaError::InvalidInput(
                "Poisson: lambda must be non-negative".into(),
            ));
        }
        Ok(Self { lambda })
    }

    /// Poisson mass λ^k e^(−λ) / Γ(k+1), generalized to real `k` ≥ 0.
    ///
    /// Evaluated in log space to avoid overflow. The mirrored-tail
    /// significance sums this over unit-stepped grids whose points are
    /// not integers when the expectation is fractional, so `k` is not
    /// rounded. `pmf(0)` is exactly e^(−λ). Negative `k` has zero mass.
    pub fn pmf(&self, k: f64) -> f64 {
        if k < 0.0 {
            return 0.0;
        }
        if self.lambda == 0.0 {
            return if k == 0.0 { 1.0 } else { 0.0 };
        }
        (k * self.lambda.ln() - self.lambda - ln_gamma(k + 1.0)).exp()
    }
}

impl Distribution for Poisson {
    fn pdf(&self, x: f64) -> f64 {
        self.pmf(x)
    }

    fn cdf(&self, x: f64) -> f64 {
        let k_max = x.floor() as i64;
        if k_max < 0 {
            return 0.0;
        }
        let mut sum = 0.0;
        for k in 0..=k_max {
            sum += self.pmf(k as f64);
        }
        sum.min(1.0)
    }

    fn mean(&self) -> f64 {
        self.lambda
    }

    fn variance(&self) -> f64 {
        self.lambda
    }
}

// ── Chi-squared distribution ──────────────────────────────────────────────

/// Chi-squared distribution with k degrees of freedom.
///
/// `k` must be a positive integer: every consumer in this workspace
/// feeds integer degrees of freedom (k = 1, 2 for TS distributions,
/// 2n and 2(n+1) for the Garwood limits), and the integer constraint
/// keeps the closed-form Γ(k/2) in [`Distribution::pdf`] exact.
#[derive(Debug, Clone, Copy)]
pub struct ChiSquared {
    k: f64,
}

impl ChiSquared {
    /// Create a chi-squared distribution with `k` degrees of freedom.
    pub fn new(k: f64) -> Result<Self> {
        if k <= 0.0 || k.fract() != 0.0 {
            return Err(VelaError::InvalidInput(
                "ChiSquared: k must be a positive integer".into(),
            ));
        }
        Ok(Self { k })
    }

    /// Degrees of freedom.
    pub fn df(&self) -> f64 {
        self.k
    }

    /// Inverse CDF at the default [`QUANTILE_STEP`] resolution.
    pub fn quantile(&self, f: f64) -> Result<f64> {
        self.quantile_with_step(f, QUANTILE_STEP)
    }

    /// Inverse CDF by first-crossing scan: the smallest x on the grid
    /// {0, step, 2·step, …} with `cdf(x) ≥ f`.
    ///
    /// The returned value is the first grid crossing, not an
    /// interpolation, so it overshoots the exact quantile by at most
    /// `step`. The scan exploits that the CDF is monotone in x.
    ///
    /// # Errors
    ///
    /// `InvalidInput` for `f` outside [0, 1) or a non-positive step;
    /// `NonConvergence` if no crossing is found within
    /// [`QUANTILE_MAX_STEPS`] iterations (e.g. step too coarse relative
    /// to the target quantile).
    pub fn quantile_with_step(&self, f: f64, step: f64) -> Result<f64> {
        if !(0.0..1.0).contains(&f) {
            return Err(VelaError::InvalidInput(
                "ChiSquared::quantile: f must be in [0, 1)".into(),
            ));
        }
        if step <= 0.0 {
            return Err(VelaError::InvalidInput(
                "ChiSquared::quantile: step must be positive".into(),
            ));
        }

        let mut x = 0.0;
        for _ in 0..QUANTILE_MAX_STEPS {
            if self.cdf(x) >= f {
                return Ok(x);
            }
            x += step;
        }
        Err(VelaError::NonConvergence(format!(
            "ChiSquared::quantile: no CDF crossing of {} below x = {}",
            f, x,
        )))
    }
}

impl Distribution for ChiSquared {
    fn pdf(&self, x: f64) -> f64 {
        if x <= 0.0 {
            return 0.0;
        }
        let half_k = self.k / 2.0;
        gamma(half_k)
            .map(|g| x.powf(half_k - 1.0) * (-0.5 * x).exp() / (2.0_f64.powf(half_k) * g))
            .unwrap_or(0.0)
    }

    fn cdf(&self, x: f64) -> f64 {
        if x <= 0.0 {
            return 0.0;
        }
        gammainc(self.k / 2.0, x / 2.0).unwrap_or(0.0)
    }

    fn mean(&self) -> f64 {
        self.k
    }

    fn variance(&self) -> f64 {
        2.0 * self.k
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────
