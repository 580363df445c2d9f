/////////////////////////////////////////////////////////////////////////////////////////////
//
// Implements the conjugate gradient solver used for larger RBF linear systems.
//
// Created on: 18 Oct 2026     Author: Daniel Owen
//
// Copyright (c) 2025, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

use crate::progress::{ProgressMsg, ProgressSink, emit, progress_from_rel};
use faer::{Mat, MatRef, Scale};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Why a linear solve stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Termination {
    /// Solved by elimination; no iterations were run.
    Direct,

    /// The residual norm fell below the tolerance.
    Converged,

    /// `|p . A p|` fell below the degenerate threshold. The returned solution
    /// is the best iterate so far.
    DegenerateDirection,

    /// The iteration cap was reached before convergence.
    MaxIterations,
}

/// Output of [`conjugate_gradient`].
#[derive(Debug, Clone)]
pub struct CgSolution {
    /// Approximate solution, `n x 1`.
    pub x: Mat<f64>,

    /// Number of completed iterations.
    pub iterations: usize,

    /// Residual norm `||b - A x||` tracked by the recurrence.
    pub residual_norm: f64,

    pub termination: Termination,
}

/// Unpreconditioned conjugate gradient for symmetric systems.
///
/// Starts from `x = 0` and runs at most `min(n, max_iterations)` iterations.
/// Stops early when the residual norm drops below `tolerance`, or when the
/// curvature `|p . A p|` along the current search direction falls below
/// `degenerate_threshold`. The latter is not an error; the current iterate
/// is returned and the exit is flagged in [`CgSolution::termination`].
///
/// # Parameters
/// - `a`: Operator function A(x)
/// - `b`: Right-hand side vector
/// - `max_iterations`: Upper bound on the iteration count
/// - `tolerance`: Absolute residual norm stopping criterion
/// - `degenerate_threshold`: Minimum accepted `|p . A p|`
/// - `progress_interval`: Iterations between [`ProgressMsg::SolverIteration`] events
/// - `callback`: Optional progress sink
pub fn conjugate_gradient<A>(
    a: &A,
    b: &Mat<f64>,
    max_iterations: usize,
    tolerance: f64,
    degenerate_threshold: f64,
    progress_interval: usize,
    callback: &Option<Arc<dyn ProgressSink>>,
) -> CgSolution
where
    A: Fn(&MatRef<f64>) -> Mat<f64>,
{
    let n = b.nrows();
    let max_iter = n.min(max_iterations);
    let interval = progress_interval.max(1);

    let mut x = Mat::<f64>::zeros(n, 1);
    let mut r = b.clone();
    let mut p = r.clone();
    let mut rs_old = r.col(0).transpose() * r.col(0);
    let start_norm = rs_old.sqrt();

    if start_norm < tolerance {
        return CgSolution {
            x,
            iterations: 0,
            residual_norm: start_norm,
            termination: Termination::Converged,
        };
    }

    let mut residual_norm = start_norm;

    for iter in 0..max_iter {
        let ap = a(&p.as_ref());
        let p_ap = p.col(0).transpose() * ap.col(0);

        if p_ap.abs() < degenerate_threshold {
            log::warn!(
                "conjugate gradient stopped on a degenerate search direction at iteration {} (|p.Ap| = {:e}, residual {:e})",
                iter,
                p_ap.abs(),
                residual_norm
            );
            return CgSolution {
                x,
                iterations: iter,
                residual_norm,
                termination: Termination::DegenerateDirection,
            };
        }

        let alpha = rs_old / p_ap;
        x += Scale(alpha) * &p;
        r -= &(Scale(alpha) * &ap);

        let rs_new = r.col(0).transpose() * r.col(0);
        residual_norm = rs_new.sqrt();

        if (iter + 1) % interval == 0 {
            emit(
                callback,
                ProgressMsg::SolverIteration {
                    iter: iter + 1,
                    residual: residual_norm,
                    progress: progress_from_rel(residual_norm, start_norm, tolerance),
                },
            );
        }

        if residual_norm < tolerance {
            log::debug!(
                "conjugate gradient converged in {} iterations (residual {:e})",
                iter + 1,
                residual_norm
            );
            return CgSolution {
                x,
                iterations: iter + 1,
                residual_norm,
                termination: Termination::Converged,
            };
        }

        let beta = rs_new / rs_old;
        p = &r + &(Scale(beta) * &p);
        rs_old = rs_new;
    }

    log::warn!(
        "conjugate gradient reached {} iterations without converging (residual {:e}, tolerance {:e})",
        max_iter,
        residual_norm,
        tolerance
    );

    CgSolution {
        x,
        iterations: max_iter,
        residual_norm: r.norm_l2(),
        termination: Termination::MaxIterations,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::CollectingSink;
    use equator::assert;
    use faer::{prelude::Solve, utils::approx::*};

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
    fn converges_to_direct_solution() {
        let n = 40;
        let a = make_spd(n, 2.0);
        let b = Mat::<f64>::from_fn(n, 1, |i, _| ((i + 1) as f64).cos());
        let matvec = |x: &MatRef<f64>| &a * *x;

        // A tiny degenerate threshold, so only the residual test can stop it.
        let solution = conjugate_gradient(&matvec, &b, 1000, 1e-10, 1e-300, 10, &None);
        let x_ref = a.partial_piv_lu().solve(&b);

        assert!(solution.termination == Termination::Converged);
        assert!(solution.iterations <= n);
        assert!(solution.residual_norm < 1e-10);

        let approx_eq = CwiseMat(ApproxEq::eps() * 1E7);
        assert!(&solution.x ~ &x_ref);
    }

    #[test]
    fn zero_rhs_returns_immediately() {
        let a = make_spd(5, 1.0);
        let b = Mat::<f64>::zeros(5, 1);
        let matvec = |x: &MatRef<f64>| &a * *x;
        let solution = conjugate_gradient(&matvec, &b, 1000, 1e-8, 1e-14, 10, &None);
        assert!(solution.iterations == 0);
        assert!(solution.termination == Termination::Converged);
        assert!(solution.x == Mat::<f64>::zeros(5, 1));
    }

    #[test]
    fn degenerate_direction_returns_current_iterate() {
        // A vanishes along the initial direction, so p . A p = 0 straight away.
        let a = Mat::<f64>::zeros(3, 3);
        let b = Mat::<f64>::from_fn(3, 1, |i, _| i as f64 + 1.0);
        let matvec = |x: &MatRef<f64>| &a * *x;
        let solution = conjugate_gradient(&matvec, &b, 1000, 1e-8, 1e-14, 10, &None);
        assert!(solution.termination == Termination::DegenerateDirection);
        assert!(solution.iterations == 0);
        assert!(solution.x == Mat::<f64>::zeros(3, 1));
    }

    #[test]
    fn iteration_cap_is_min_of_n_and_limit() {
        let n = 30;
        let a = make_spd(n, 1e-3);
        let b = Mat::<f64>::from_fn(n, 1, |i, _| (i as f64).sin() + 1.0);
        let matvec = |x: &MatRef<f64>| &a * *x;
        let solution = conjugate_gradient(&matvec, &b, 3, 1e-30, 1e-300, 10, &None);
        assert!(solution.iterations == 3);
        assert!(solution.termination == Termination::MaxIterations);
    }

    #[test]
    fn progress_is_reported_every_interval() {
        let n = 30;
        let a = make_spd(n, 1e-3);
        let b = Mat::<f64>::from_fn(n, 1, |i, _| (i as f64).sin() + 1.0);
        let matvec = |x: &MatRef<f64>| &a * *x;

        let sink = Arc::new(CollectingSink::new());
        let callback: Option<Arc<dyn ProgressSink>> = Some(sink.clone());
        let _ = conjugate_gradient(&matvec, &b, 9, 1e-30, 1e-300, 3, &callback);

        let iters: Vec<usize> = sink
            .messages()
            .into_iter()
            .filter_map(|m| match m {
                ProgressMsg::SolverIteration { iter, progress, .. } => {
                    assert!(progress >= 0.0 && progress <= 1.0);
                    Some(iter)
                }
                _ => None,
            })
            .collect();
        assert!(iters == vec![3, 6, 9]);
    }
}
