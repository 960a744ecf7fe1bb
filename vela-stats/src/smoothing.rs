//! Savitzky-Golay smoothing.
//!
//! The containment bands of a brazil plot are jagged at finite trial
//! counts; [`savitzky_golay`] smooths them with a least-squares
//! polynomial filter (the published bands use window 11, degree 1).

use vela_core::{Result, VelaError};

/// Smooth `data` with a Savitzky-Golay filter: fit a degree-`degree`
/// polynomial over a centered odd `window` around each point and take
/// the fitted value.
///
/// Near the edges the boundary window's polynomial is evaluated at the
/// off-center offsets, so a degree ≥ 1 filter reproduces affine data
/// exactly everywhere, edges included.
///
/// # Errors
///
/// Returns an error unless `window` is odd, larger than `degree`, and
/// no longer than `data`.
pub fn savitzky_golay(data: &[f64], window: usize, degree: usize) -> Result<Vec<f64>> {
    if window % 2 == 0 {
        return Err(VelaError::InvalidInput(
            "savitzky_golay: window must be odd".into(),
        ));
    }
    if window <= degree {
        return Err(VelaError::InvalidInput(
            "savitzky_golay: window must exceed degree".into(),
        ));
    }
    if window > data.len() {
        return Err(VelaError::InvalidInput(format!(
            "savitzky_golay: window {} longer than data ({})",
            window,
            data.len(),
        )));
    }

    let n = data.len();
    let half = window / 2;
    let positions: Vec<f64> = (0..window).map(|j| j as f64 - half as f64).collect();

    let mut smoothed = Vec::with_capacity(n);
    for i in 0..n {
        let start = i.saturating_sub(half).min(n - window);
        let offset = i as f64 - start as f64 - half as f64;
        let value = polyfit_eval(&positions, &data[start..start + window], degree, offset)?;
        smoothed.push(value);
    }
    Ok(smoothed)
}

/// Least-squares value at `t` of a degree-`degree` polynomial fitted to
/// the points `(xs, ys)`, via the normal equations.
fn polyfit_eval(xs: &[f64], ys: &[f64], degree: usize, t: f64) -> Result<f64> {
    let terms = degree + 1;

    // Normal matrix M[p][q] = Σ x^(p+q), right-hand side b[p] = Σ y·x^p
    let mut matrix = vec![vec![0.0; terms]; terms];
    let mut rhs = vec![0.0; terms];
    for (&x, &y) in xs.iter().zip(ys) {
        let mut xp = 1.0;
        let mut powers = Vec::with_capacity(2 * terms - 1);
        for _ in 0..2 * terms - 1 {
            powers.push(xp);
            xp *= x;
        }
        for p in 0..terms {
            rhs[p] += y * powers[p];
            for q in 0..terms {
                matrix[p][q] += powers[p + q];
            }
        }
    }

    let coeffs = solve_dense(matrix, rhs)?;

    // Horner evaluation at t
    let mut value = 0.0;
    for &c in coeffs.iter().rev() {
        value = value * t + c;
    }
    Ok(value)
}

/// Solve a small dense linear system by Gaussian elimination with
/// partial pivoting.
fn solve_dense(mut matrix: Vec<Vec<f64>>, mut rhs: Vec<f64>) -> Result<Vec<f64>> {
    let n = rhs.len();

    for col in 0..n {
        let pivot = (col..n)
            .max_by(|&a, &b| matrix[a][col].abs().total_cmp(&matrix[b][col].abs()))
            .unwrap_or(col);
        if matrix[pivot][col].abs() < 1e-12 {
            return Err(VelaError::InvalidInput(
                "polyfit: singular normal equations".into(),
            ));
        }
        matrix.swap(col, pivot);
        rhs.swap(col, pivot);

        for row in (col + 1)..n {
            let factor = matrix[row][col] / matrix[col][col];
            for k in col..n {
                matrix[row][k] -= factor * matrix[col][k];
            }
            rhs[row] -= factor * rhs[col];
        }
    }

    let mut solution = vec![0.0; n];
    for row in (0..n).rev() {
        let mut acc = rhs[row];
        for col in (row + 1)..n {
            acc -= matrix[row][col] * solution[col];
        }
        solution[row] = acc / matrix[row][row];
    }
    Ok(solution)
}

// ── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f64 = 1e-9;

    #[test]
    fn affine_data_is_unchanged() {
        let data: Vec<f64> = (0..42).map(|i| 3.0 * i as f64 + 2.0).collect();
        let smoothed = savitzky_golay(&data, 11, 1).unwrap();
        for (raw, s) in data.iter().zip(&smoothed) {
            assert!((raw - s).abs() < TOL, "raw={} smoothed={}", raw, s);
        }
    }

    #[test]
    fn quadratic_data_is_unchanged_at_degree_two() {
        let data: Vec<f64> = (0..30)
            .map(|i| {
                let x = i as f64;
                0.5 * x * x - 4.0 * x + 1.0
            })
            .collect();
        let smoothed = savitzky_golay(&data, 7, 2).unwrap();
        for (raw, s) in data.iter().zip(&smoothed) {
            assert!((raw - s).abs() < 1e-7, "raw={} smoothed={}", raw, s);
        }
    }

    #[test]
    fn constant_data_is_unchanged() {
        let data = vec![5.0; 20];
        let smoothed = savitzky_golay(&data, 5, 0).unwrap();
        for s in smoothed {
            assert!((s - 5.0).abs() < TOL);
        }
    }

    #[test]
    fn degree_one_at_center_is_window_mean() {
        let mut data = vec![0.0; 21];
        data[10] = 1.0;
        let smoothed = savitzky_golay(&data, 5, 1).unwrap();
        assert!((smoothed[10] - 0.2).abs() < TOL, "got {}", smoothed[10]);
    }

    #[test]
    fn spike_amplitude_is_reduced() {
        let mut data = vec![1.0; 15];
        data[7] = 10.0;
        let smoothed = savitzky_golay(&data, 5, 1).unwrap();
        assert!(smoothed[7] < data[7]);
        assert!(smoothed[7] > 1.0);
    }

    #[test]
    fn output_length_matches_input() {
        let data: Vec<f64> = (0..13).map(|i| (i as f64).sin()).collect();
        let smoothed = savitzky_golay(&data, 7, 2).unwrap();
        assert_eq!(smoothed.len(), data.len());
    }

    #[test]
    fn window_validation() {
        let data = vec![0.0; 10];
        assert!(savitzky_golay(&data, 4, 1).is_err()); // even
        assert!(savitzky_golay(&data, 3, 3).is_err()); // degree too high
        assert!(savitzky_golay(&data, 11, 1).is_err()); // longer than data
    }
}
