//! Frequentist Poisson limits and exclusion-band extraction.
//!
//! - [`poisson_limits`] — central confidence interval for a Poisson
//!   mean from an observed count (Garwood construction, PDG §38.71a,b)
//! - [`containment_bands`] — per-bin 68%/95% containment and median of
//!   Monte-Carlo upper limits, the bands of a brazil plot

use vela_core::{Result, Summarizable, VelaError};

use crate::distribution::ChiSquared;

// ── Poisson confidence interval ────────────────────────────────────────────

/// Confidence interval for a Poisson mean given an observed count.
///
/// Bounds roughly follow √counts but differ noticeably at low counts.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PoissonInterval {
    /// Lower bound on the mean.
    pub lower: f64,
    /// Upper bound on the mean.
    pub upper: f64,
}

impl PoissonInterval {
    /// Width of the interval.
    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }

    /// Whether the interval contains `value`.
    pub fn contains(&self, value: f64) -> bool {
        value >= self.lower && value <= self.upper
    }
}

impl Summarizable for PoissonInterval {
    fn summary(&self) -> String {
        format!("[{:.4}, {:.4}]", self.lower, self.upper)
    }
}

/// Central confidence interval for a Poisson mean from `observed`
/// counts, no background, pure counting statistics:
///
/// - upper = ½ · χ²-quantile(2·(observed + 1), 1 − alpha)
/// - lower = ½ · χ²-quantile(2·observed, alpha)
///
/// `alpha` is the tail probability excluded on each side, so
/// `alpha = 0.05` gives the 95% one-sided limits of PDG Table 38.3.
/// For `observed` = 0 the lower-limit quantile would need a
/// zero-degree-of-freedom distribution; the lower bound is 0 by
/// definition there.
///
/// Quantiles come from the first-crossing scan, so bounds carry its
/// [`crate::distribution::QUANTILE_STEP`] resolution.
///
/// # Errors
///
/// Returns an error for `alpha` outside (0, 1), or if the quantile
/// scan fails to converge.
pub fn poisson_limits(observed: u64, alpha: f64) -> Result<PoissonInterval> {
    if alpha <= 0.0 || alpha >= 1.0 {
        return Err(VelaError::InvalidInput(
            "poisson_limits: alpha must be in (0, 1)".into(),
        ));
    }

    let upper = 0.5 * ChiSquared::new(2.0 * (observed + 1) as f64)?.quantile(1.0 - alpha)?;
    let lower = if observed == 0 {
        0.0
    } else {
        0.5 * ChiSquared::new(2.0 * observed as f64)?.quantile(alpha)?
    };

    Ok(PoissonInterval { lower, upper })
}

// ── Containment bands ──────────────────────────────────────────────────────

/// Containment fractions of the band edges.
const LOWER_95: f64 = 0.025;
const LOWER_68: f64 = 0.15865;
const MEDIAN: f64 = 0.5;
const UPPER_68: f64 = 0.84135;
const UPPER_95: f64 = 0.975;

/// Per-bin containment bands of a set of Monte-Carlo upper limits.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ContainmentBands {
    /// 2.5th percentile per bin.
    pub lower_95: Vec<f64>,
    /// 15.87th percentile per bin.
    pub lower_68: Vec<f64>,
    /// Median per bin.
    pub median: Vec<f64>,
    /// 84.13th percentile per bin.
    pub upper_68: Vec<f64>,
    /// 97.5th percentile per bin.
    pub upper_95: Vec<f64>,
}

impl ContainmentBands {
    /// Number of bins.
    pub fn len(&self) -> usize {
        self.median.len()
    }

    /// Whether there are no bins.
    pub fn is_empty(&self) -> bool {
        self.median.is_empty()
    }
}

impl Summarizable for ContainmentBands {
    fn summary(&self) -> String {
        format!("containment bands over {} bins", self.len())
    }
}

/// Extract 68%/95% containment bands and the median from Monte-Carlo
/// trial limits, one trial per row, one energy bin per column.
///
/// Each bin's column is sorted and the order statistic at index
/// ⌊q · trials⌋ is taken for each containment fraction q — truncating,
/// not interpolating, which keeps the bands identical to the published
/// brazil plots. With few trials the truncation bias is large; the
/// published bands used hundreds of trials per bin.
///
/// # Errors
///
/// Returns an error if `trials` is empty, any row is empty, or rows
/// have unequal lengths.
pub fn containment_bands(trials: &[&[f64]]) -> Result<ContainmentBands> {
    if trials.is_empty() {
        return Err(VelaError::InvalidInput(
            "containment_bands: need at least one trial".into(),
        ));
    }
    let n_bins = trials[0].len();
    if n_bins == 0 {
        return Err(VelaError::InvalidInput(
            "containment_bands: trials have no bins".into(),
        ));
    }
    if let Some(row) = trials.iter().find(|row| row.len() != n_bins) {
        return Err(VelaError::InvalidInput(format!(
            "containment_bands: ragged trials ({} vs {} bins)",
            row.len(),
            n_bins,
        )));
    }

    let n_trials = trials.len();
    let pick = |sorted: &[f64], q: f64| sorted[(q * n_trials as f64) as usize];

    let mut bands = ContainmentBands {
        lower_95: Vec::with_capacity(n_bins),
        lower_68: Vec::with_capacity(n_bins),
        median: Vec::with_capacity(n_bins),
        upper_68: Vec::with_capacity(n_bins),
        upper_95: Vec::with_capacity(n_bins),
    };

    for bin in 0..n_bins {
        let mut column: Vec<f64> = trials.iter().map(|row| row[bin]).collect();
        column.sort_by(|a, b| a.total_cmp(b));

        bands.lower_95.push(pick(&column, LOWER_95));
        bands.lower_68.push(pick(&column, LOWER_68));
        bands.median.push(pick(&column, MEDIAN));
        bands.upper_68.push(pick(&column, UPPER_68));
        bands.upper_95.push(pick(&column, UPPER_95));
    }

    Ok(bands)
}

// ── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limits_bracket_the_observation() {
        for &n in &[1_u64, 2, 5, 10, 50] {
            let interval = poisson_limits(n, 0.05).unwrap();
            assert!(
                interval.contains(n as f64),
                "n={} interval={:?}",
                n,
                interval,
            );
            assert!(interval.lower > 0.0);
        }
    }

    #[test]
    fn zero_counts_have_zero_lower_limit() {
        let interval = poisson_limits(0, 0.05).unwrap();
        assert_eq!(interval.lower, 0.0);
        // Upper = ½ χ²(2) quantile at 0.95 ≈ 3.00
        assert!((interval.upper - 3.00).abs() < 0.02, "{:?}", interval);
    }

    #[test]
    fn one_sigma_upper_limit_for_zero_counts() {
        // The classic 1σ upper limit on zero observed events: 1.84
        let interval = poisson_limits(0, 0.159).unwrap();
        assert!((interval.upper - 1.84).abs() < 0.02, "{:?}", interval);
    }

    #[test]
    fn pdg_ninety_percent_limits() {
        // PDG Table 38.3, 90% CL column (alpha = 0.10):
        // n=1 → (0.105, 3.89); n=5 upper → 9.27
        let one = poisson_limits(1, 0.10).unwrap();
        assert!((one.lower - 0.105).abs() < 0.01, "{:?}", one);
        assert!((one.upper - 3.89).abs() < 0.02, "{:?}", one);
        let five = poisson_limits(5, 0.10).unwrap();
        assert!((five.upper - 9.27).abs() < 0.02, "{:?}", five);
    }

    #[test]
    fn pdg_ninety_five_percent_limits() {
        // PDG Table 38.3, 95% CL column (alpha = 0.05):
        // n=1 → (0.051, 4.74); n=5 → (1.97, 10.51)
        let one = poisson_limits(1, 0.05).unwrap();
        assert!((one.lower - 0.051).abs() < 0.01, "{:?}", one);
        assert!((one.upper - 4.74).abs() < 0.02, "{:?}", one);
        let five = poisson_limits(5, 0.05).unwrap();
        assert!((five.lower - 1.97).abs() < 0.02, "{:?}", five);
        assert!((five.upper - 10.51).abs() < 0.02, "{:?}", five);
    }

    #[test]
    fn interval_narrows_with_larger_alpha() {
        let tight = poisson_limits(5, 0.25).unwrap();
        let wide = poisson_limits(5, 0.01).unwrap();
        assert!(tight.width() < wide.width());
    }

    #[test]
    fn invalid_alpha() {
        assert!(poisson_limits(5, 0.0).is_err());
        assert!(poisson_limits(5, 1.0).is_err());
        assert!(poisson_limits(5, -0.1).is_err());
    }

    #[test]
    fn interval_summary() {
        let interval = poisson_limits(1, 0.05).unwrap();
        let s = interval.summary();
        assert!(s.starts_with('['));
        assert!(s.contains(", "));
    }

    #[test]
    fn bands_of_constant_trials_are_flat() {
        let row = [2.0, 4.0, 8.0];
        let trials: Vec<&[f64]> = vec![row.as_slice(); 10];
        let bands = containment_bands(&trials).unwrap();
        assert_eq!(bands.len(), 3);
        assert_eq!(bands.median, vec![2.0, 4.0, 8.0]);
        assert_eq!(bands.lower_95, bands.upper_95);
    }

    #[test]
    fn bands_pick_truncated_order_statistics() {
        // 10 trials of a single bin holding 0..9: index ⌊q·10⌋
        let rows: Vec<[f64; 1]> = (0..10).map(|i| [i as f64]).collect();
        let trials: Vec<&[f64]> = rows.iter().map(|r| r.as_slice()).collect();
        let bands = containment_bands(&trials).unwrap();
        assert_eq!(bands.lower_95[0], 0.0); // ⌊0.025·10⌋ = 0
        assert_eq!(bands.lower_68[0], 1.0); // ⌊0.15865·10⌋ = 1
        assert_eq!(bands.median[0], 5.0); // ⌊0.5·10⌋ = 5
        assert_eq!(bands.upper_68[0], 8.0); // ⌊0.84135·10⌋ = 8
        assert_eq!(bands.upper_95[0], 9.0); // ⌊0.975·10⌋ = 9
    }

    #[test]
    fn bands_order_is_monotone() {
        // Shuffled columns still produce nested bands
        let rows = [
            [5.0, 1.0],
            [3.0, 9.0],
            [8.0, 2.0],
            [1.0, 7.0],
            [6.0, 4.0],
            [2.0, 8.0],
            [9.0, 3.0],
            [4.0, 6.0],
            [7.0, 5.0],
            [0.0, 0.0],
        ];
        let trials: Vec<&[f64]> = rows.iter().map(|r| r.as_slice()).collect();
        let bands = containment_bands(&trials).unwrap();
        for bin in 0..2 {
            assert!(bands.lower_95[bin] <= bands.lower_68[bin]);
            assert!(bands.lower_68[bin] <= bands.median[bin]);
            assert!(bands.median[bin] <= bands.upper_68[bin]);
            assert!(bands.upper_68[bin] <= bands.upper_95[bin]);
        }
    }

    #[test]
    fn bands_reject_bad_input() {
        assert!(containment_bands(&[]).is_err());
        let empty: [f64; 0] = [];
        assert!(containment_bands(&[&empty]).is_err());
        let a = [1.0, 2.0];
        let b = [1.0];
        assert!(containment_bands(&[&a, &b]).is_err());
    }
}
