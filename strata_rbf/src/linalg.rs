/////////////////////////////////////////////////////////////////////////////////////////////
//
// Adds helper linear algebra routines, including dense Gaussian elimination with partial pivoting.
//
// Created on: 18 Oct 2026     Author: Daniel Owen
//
// Copyright (c) 2025, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

//! # linalg
//!
//! Helper linear algebra functionality.
//!
//! The direct solver works on a dense augmented copy `[A | b]` and never
//! modifies its inputs. It is intended for the small systems (up to a few
//! hundred points) where its `O(n^3)` cost is negligible.

use crate::error::{RBFError, RBFResult};
use faer::Mat;

/// Returns `|| b - A x ||_2`.
pub(crate) fn residual_norm(a: &Mat<f64>, x: &Mat<f64>, b: &Mat<f64>) -> f64 {
    let r = b - &(a * x);
    r.norm_l2()
}

/// Solves `A x = b` by Gaussian elimination with partial pivoting.
///
/// At each column the row with the largest absolute entry at or below the
/// diagonal is swapped into the pivot position. If that entry is smaller
/// than `tolerance` the system is reported as singular.
///
/// # Errors
/// [`RBFError::SingularSystem`] when a pivot falls below `tolerance`.
pub fn gaussian_elimination(a: &Mat<f64>, b: &Mat<f64>, tolerance: f64) -> RBFResult<Mat<f64>> {
    let n = a.nrows();
    debug_assert_eq!(a.ncols(), n);
    debug_assert_eq!(b.nrows(), n);

    // Augmented matrix [A | b]
    let mut aug = Mat::<f64>::from_fn(n, n + 1, |i, j| if j < n { a[(i, j)] } else { b[(i, 0)] });

    for col in 0..n {
        let mut pivot_row = col;
        let mut pivot_abs = aug[(col, col)].abs();
        for row in (col + 1)..n {
            let candidate = aug[(row, col)].abs();
            if candidate > pivot_abs {
                pivot_abs = candidate;
                pivot_row = row;
            }
        }

        if !(pivot_abs >= tolerance) {
            return Err(RBFError::SingularSystem {
                column: col,
                pivot: pivot_abs,
                tolerance,
            });
        }

        if pivot_row != col {
            for j in col..=n {
                let tmp = aug[(col, j)];
                aug[(col, j)] = aug[(pivot_row, j)];
                aug[(pivot_row, j)] = tmp;
            }
        }

        let pivot = aug[(col, col)];
        for row in (col + 1)..n {
            let factor = aug[(row, col)] / pivot;
            if factor == 0.0 {
                continue;
            }
            aug[(row, col)] = 0.0;
            for j in (col + 1)..=n {
                let update = factor * aug[(col, j)];
                aug[(row, j)] -= update;
            }
        }
    }

    // Back substitution
    let mut x = Mat::<f64>::zeros(n, 1);
    for i in (0..n).rev() {
        let mut sum = aug[(i, n)];
        for j in (i + 1)..n {
            sum -= aug[(i, j)] * x[(j, 0)];
        }
        x[(i, 0)] = sum / aug[(i, i)];
    }

    Ok(x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use equator::assert;
    use faer::{mat, prelude::Solve, utils::approx::*};

    /// Deterministic SPD matrix: A = M M^T + alpha I.
    fn make_spd(n: usize, alpha: f64) -> Mat<f64> {
        let mut m = Mat::<f64>::zeros(n, n);
        for i in 0..n {
            for j in 0..n {
                let x = (i as f64 + 1.0) * (j as f64 + 2.0);
                m[(i, j)] = (x.sin() + 2.0 * x.cos()) / (1.0 + (i + j + 1) as f64);
            }
        }
        let mut a = &m * m.transpose();
        for i in 0..n {
            a[(i, i)] += alpha.max(1e-3);
        }
        a
    }

    #[test]
    fn elimination_matches_faer_lu() {
        for n in [1usize, 2, 5, 12, 20] {
            let a = make_spd(n, 1.0);
            let b = Mat::<f64>::from_fn(n, 1, |i, _| ((i + 2) as f64).sin());

            let x = gaussian_elimination(&a, &b, 1e-12).unwrap();
            let x_ref = a.partial_piv_lu().solve(&b);

            let approx_eq = CwiseMat(ApproxEq::eps() * 1024.0 * (n as f64));
            assert!(&x ~ &x_ref);
            assert!(residual_norm(&a, &x, &b) < 1e-10);
        }
    }

    #[test]
    fn pivoting_handles_zero_leading_entry() {
        // Fails without row exchange.
        let a = mat![
            [0.0, 2.0, 1.0],
            [1.0, 1.0, 0.0],
            [2.0, 0.0, 3.0f64],
        ];
        let b = mat![[5.0], [3.0], [11.0f64]];
        let x = gaussian_elimination(&a, &b, 1e-12).unwrap();

        let approx_eq = CwiseMat(ApproxEq::eps() * 64.0);
        assert!(&a * &x ~ b);
    }

    #[test]
    fn singular_matrix_is_rejected() {
        let a = mat![
            [1.0, 2.0],
            [2.0, 4.0f64],
        ];
        let b = mat![[1.0], [2.0f64]];
        let err = gaussian_elimination(&a, &b, 1e-10).unwrap_err();
        assert!(matches!(err, RBFError::SingularSystem { column: 1, .. }));
    }

    #[test]
    fn inputs_are_left_untouched() {
        let a = make_spd(4, 1.0);
        let b = Mat::<f64>::from_fn(4, 1, |i, _| i as f64);
        let (a0, b0) = (a.clone(), b.clone());
        let _ = gaussian_elimination(&a, &b, 1e-12).unwrap();
        assert_eq!(a, a0);
        assert_eq!(b, b0);
    }
}
