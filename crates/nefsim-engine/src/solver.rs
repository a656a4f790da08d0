// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Decoder solving
//!
//! Decoders are the least-squares solution of `A D = Y` where `A` holds
//! tuning-curve activities (eval points x neurons) and `Y` the target
//! values (eval points x output dimensions). L2 regularization keeps the
//! solve well-conditioned and spike-noise robust:
//!
//! ```text
//! (AᵀA + m σ² I) D = Aᵀ Y,   σ = reg * max|A|,  m = eval point count
//! ```
//!
//! The regularized gram matrix is symmetric positive definite, so a plain
//! Cholesky factorization solves it without pivoting.

use ndarray::Array2;

use crate::error::{EngineError, Result};

/// Solve for decoders with L2 (ridge) regularization.
///
/// `activities` is `m x n`, `targets` is `m x d`; the result is `n x d`.
/// `reg` is the noise fraction of the peak activity (0.1 is the standard
/// default).
pub fn lstsq_l2(activities: &Array2<f64>, targets: &Array2<f64>, reg: f64) -> Result<Array2<f64>> {
    let m = activities.nrows();
    if targets.nrows() != m {
        return Err(EngineError::SolverShapeMismatch {
            activities: m,
            targets: targets.nrows(),
        });
    }

    let max_activity = activities.iter().fold(0.0f64, |acc, &v| acc.max(v.abs()));
    let sigma = reg * max_activity;

    let mut gram = activities.t().dot(activities);
    let lambda = m as f64 * sigma * sigma;
    for i in 0..gram.nrows() {
        gram[[i, i]] += lambda;
    }

    let mut rhs = activities.t().dot(targets);
    cholesky_factor(&mut gram)?;
    cholesky_solve_in_place(&gram, &mut rhs);
    Ok(rhs)
}

/// In-place Cholesky factorization; on success the lower triangle of `g`
/// holds `L` with `L Lᵀ = G`. The upper triangle is left untouched.
fn cholesky_factor(g: &mut Array2<f64>) -> Result<()> {
    let n = g.nrows();
    for j in 0..n {
        let mut diag = g[[j, j]];
        for k in 0..j {
            diag -= g[[j, k]] * g[[j, k]];
        }
        if diag <= 0.0 || !diag.is_finite() {
            return Err(EngineError::NotPositiveDefinite);
        }
        let l_jj = diag.sqrt();
        g[[j, j]] = l_jj;
        for i in (j + 1)..n {
            let mut v = g[[i, j]];
            for k in 0..j {
                v -= g[[i, k]] * g[[j, k]];
            }
            g[[i, j]] = v / l_jj;
        }
    }
    Ok(())
}

/// Solve `L Lᵀ X = B` in place, one forward and one backward substitution
/// per column of `B`.
fn cholesky_solve_in_place(l: &Array2<f64>, b: &mut Array2<f64>) {
    let n = l.nrows();
    let cols = b.ncols();
    for c in 0..cols {
        // Forward: L z = b
        for i in 0..n {
            let mut v = b[[i, c]];
            for k in 0..i {
                v -= l[[i, k]] * b[[k, c]];
            }
            b[[i, c]] = v / l[[i, i]];
        }
        // Backward: Lᵀ x = z
        for i in (0..n).rev() {
            let mut v = b[[i, c]];
            for k in (i + 1)..n {
                v -= l[[k, i]] * b[[k, c]];
            }
            b[[i, c]] = v / l[[i, i]];
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_cholesky_solves_known_system() {
        // G = [[4,2],[2,3]], b = [[8],[7]] -> x = [[1.1],[1.6]]
        let mut g = array![[4.0, 2.0], [2.0, 3.0]];
        let mut b = array![[8.0], [7.0]];
        cholesky_factor(&mut g).unwrap();
        cholesky_solve_in_place(&g, &mut b);
        assert!((b[[0, 0]] - 1.1).abs() < 1e-12);
        assert!((b[[1, 0]] - 1.6).abs() < 1e-12);
    }

    #[test]
    fn test_cholesky_rejects_indefinite_matrix() {
        let mut g = array![[1.0, 2.0], [2.0, 1.0]];
        assert!(matches!(
            cholesky_factor(&mut g),
            Err(EngineError::NotPositiveDefinite)
        ));
    }

    #[test]
    fn test_lstsq_recovers_exact_linear_map() {
        // Activities spanning the plane; targets a known linear readout.
        // With negligible regularization the solve is essentially exact.
        let a = array![
            [1.0, 0.0],
            [0.0, 1.0],
            [1.0, 1.0],
            [2.0, 1.0],
            [1.0, 3.0],
        ];
        let d_true = array![[2.0], [-1.0]];
        let y = a.dot(&d_true);
        let d = lstsq_l2(&a, &y, 1e-8).unwrap();
        assert!((d[[0, 0]] - 2.0).abs() < 1e-6);
        assert!((d[[1, 0]] + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_regularization_shrinks_solution() {
        let a = array![[1.0, 0.0], [0.0, 1.0], [1.0, 1.0]];
        let y = array![[1.0], [1.0], [2.0]];
        let d_small = lstsq_l2(&a, &y, 1e-8).unwrap();
        let d_large = lstsq_l2(&a, &y, 1.0).unwrap();
        let norm = |d: &Array2<f64>| d.iter().map(|v| v * v).sum::<f64>();
        assert!(norm(&d_large) < norm(&d_small));
    }

    #[test]
    fn test_shape_mismatch_rejected() {
        let a = Array2::<f64>::zeros((5, 2));
        let y = Array2::<f64>::zeros((4, 1));
        assert!(matches!(
            lstsq_l2(&a, &y, 0.1),
            Err(EngineError::SolverShapeMismatch { .. })
        ));
    }
}
