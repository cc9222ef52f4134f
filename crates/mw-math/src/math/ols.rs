//! Ordinary least squares with an intercept and two raw predictors.
//!
//! The fit centers both predictors and the target, then solves the 2x2
//! normal equations through an eigen-decomposition of the centered scatter
//! matrix. Directions with (near-)zero variance are dropped, which yields the
//! minimum-norm least-squares solution when the predictors are constant or
//! collinear instead of failing.

use serde::{Deserialize, Serialize};

/// Relative eigenvalue cutoff below which a direction is treated as rank
/// deficient.
const RANK_TOLERANCE: f64 = 1e-10;

/// Result of a two-feature least-squares fit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OlsFit {
    pub intercept: f64,
    /// One coefficient per predictor, in input column order.
    pub coefficients: [f64; 2],
    /// In-sample coefficient of determination.
    pub r_squared: f64,
    /// Number of training rows.
    pub n: usize,
}

impl OlsFit {
    pub fn predict(&self, x: [f64; 2]) -> f64 {
        self.intercept + self.coefficients[0] * x[0] + self.coefficients[1] * x[1]
    }
}

/// Fit `y ≈ b0 + b1·x[0] + b2·x[1]` by least squares.
///
/// Returns `None` when the inputs are empty, of different lengths, or contain
/// non-finite values.
pub fn fit_two_feature(x: &[[f64; 2]], y: &[f64]) -> Option<OlsFit> {
    if x.is_empty() || x.len() != y.len() {
        return None;
    }
    if x.iter().flatten().chain(y.iter()).any(|v| !v.is_finite()) {
        return None;
    }

    let n = x.len() as f64;
    let mean_x0 = x.iter().map(|r| r[0]).sum::<f64>() / n;
    let mean_x1 = x.iter().map(|r| r[1]).sum::<f64>() / n;
    let mean_y = y.iter().sum::<f64>() / n;

    let mut s00 = 0.0;
    let mut s01 = 0.0;
    let mut s11 = 0.0;
    let mut s0y = 0.0;
    let mut s1y = 0.0;
    for (row, &target) in x.iter().zip(y) {
        let d0 = row[0] - mean_x0;
        let d1 = row[1] - mean_x1;
        let dy = target - mean_y;
        s00 += d0 * d0;
        s01 += d0 * d1;
        s11 += d1 * d1;
        s0y += d0 * dy;
        s1y += d1 * dy;
    }

    let coefficients = pseudo_solve([[s00, s01], [s01, s11]], [s0y, s1y]);
    let intercept = mean_y - coefficients[0] * mean_x0 - coefficients[1] * mean_x1;

    let mut fit = OlsFit {
        intercept,
        coefficients,
        r_squared: 0.0,
        n: x.len(),
    };

    let ss_res: f64 = x
        .iter()
        .zip(y)
        .map(|(row, &target)| (target - fit.predict(*row)).powi(2))
        .sum();
    let ss_tot: f64 = y.iter().map(|v| (v - mean_y).powi(2)).sum();

    // A constant target is explained perfectly or not at all.
    fit.r_squared = if ss_tot > 1e-15 {
        1.0 - ss_res / ss_tot
    } else if ss_res < 1e-12 {
        1.0
    } else {
        0.0
    };

    Some(fit)
}

/// Minimum-norm solution of `A·b = rhs` for a symmetric positive
/// semi-definite 2x2 matrix.
fn pseudo_solve(a: [[f64; 2]; 2], rhs: [f64; 2]) -> [f64; 2] {
    let (a00, a01, a11) = (a[0][0], a[0][1], a[1][1]);

    let pairs: [(f64, [f64; 2]); 2] = if a01.abs() <= f64::EPSILON * (a00.abs() + a11.abs()) {
        [(a00, [1.0, 0.0]), (a11, [0.0, 1.0])]
    } else {
        let half_trace = (a00 + a11) / 2.0;
        let disc = (((a00 - a11) / 2.0).powi(2) + a01 * a01).sqrt();
        let lambdas = [half_trace + disc, half_trace - disc];
        lambdas.map(|lambda| {
            let v = [lambda - a11, a01];
            let norm = (v[0] * v[0] + v[1] * v[1]).sqrt();
            (lambda, [v[0] / norm, v[1] / norm])
        })
    };

    let lambda_max = pairs[0].0.max(pairs[1].0);
    if lambda_max <= 0.0 {
        return [0.0, 0.0];
    }

    let mut solution = [0.0, 0.0];
    for (lambda, v) in pairs {
        if lambda <= lambda_max * RANK_TOLERANCE {
            continue;
        }
        let projection = (v[0] * rhs[0] + v[1] * rhs[1]) / lambda;
        solution[0] += projection * v[0];
        solution[1] += projection * v[1];
    }
    solution
}
