/////////////////////////////////////////////////////////////////////////////////////////////
//
// Holds a fitted interpolant and evaluates it at arbitrary target points in batches.
//
// Created on: 18 Oct 2026     Author: Daniel Owen
//
// Copyright (c) 2025, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

//! Evaluation of a solved RBF system.
//!
//! A [`FitContext`] is produced by every fit and owns everything needed to
//! evaluate the field. It is never mutated after construction, so the same
//! context can be shared between threads and evaluated concurrently.

use crate::{
    config::Params,
    progress::{ProgressMsg, ProgressSink, emit},
};
use faer::{Mat, RowRef};
use std::sync::Arc;
use strata_rbf_utils::{Kernel, RadialKernel, get_distance};

/// A solved interpolant: control points, their values, the solved weights
/// and the kernel they were solved with.
#[derive(Debug, Clone)]
pub struct FitContext {
    /// `n x 3` control point coordinates.
    pub points: Mat<f64>,

    /// `n x 1` control values.
    pub values: Mat<f64>,

    /// `n x 1` RBF weights.
    pub weights: Mat<f64>,

    /// Kernel the weights were solved with.
    pub kernel: Kernel,
}

impl FitContext {
    /// Number of control points in the fit.
    pub fn len(&self) -> usize {
        self.points.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.points.nrows() == 0
    }

    /// Evaluates the field at a single target point.
    ///
    /// Only control points within the kernel's effective radius contribute,
    /// and kernel values smaller than `negligible` in magnitude are skipped.
    #[inline]
    pub fn evaluate_point(&self, target: RowRef<f64>, negligible: f64) -> f64 {
        self.kernel_sum(target, self.kernel.effective_radius(), negligible)
    }

    #[inline]
    fn kernel_sum(&self, target: RowRef<f64>, radius: f64, negligible: f64) -> f64 {
        let mut sum = 0.0;
        for (i, source) in self.points.row_iter().enumerate() {
            let r = get_distance(target, source);
            if r > radius {
                continue;
            }
            let phi = self.kernel.phi(r);
            if phi.abs() < negligible {
                continue;
            }
            sum += self.weights[(i, 0)] * phi;
        }
        sum
    }

    /// Evaluates the field at its own control points, summing over every
    /// weight.
    ///
    /// This is the fitted field of the solve, so with no smoothing it
    /// reproduces `values` up to solver accuracy however far apart the
    /// control points are. Query evaluation through [`FitContext::evaluate`]
    /// prunes by effective radius and only matches this when every
    /// neighbouring control point is inside that radius.
    pub fn evaluate_at_source(&self) -> Mat<f64> {
        Mat::from_fn(self.len(), 1, |i, _| {
            self.kernel_sum(self.points.row(i), f64::INFINITY, 0.0)
        })
    }

    /// Evaluates the field at every row of `targets`, returning an `m x 1`
    /// matrix.
    ///
    /// Targets are processed in batches of `params.eval_batch_size`, with a
    /// [`ProgressMsg::EvaluationProgress`] event after each batch. Batching
    /// does not change the result.
    pub fn evaluate(
        &self,
        targets: &Mat<f64>,
        params: &Params,
        callback: &Option<Arc<dyn ProgressSink>>,
    ) -> Mat<f64> {
        let total = targets.nrows();
        let batch_size = params.eval_batch_size.max(1);
        let mut out = Mat::<f64>::zeros(total, 1);

        let mut start = 0;
        while start < total {
            let end = (start + batch_size).min(total);
            for i in start..end {
                out[(i, 0)] = self.evaluate_point(targets.row(i), params.negligible_contribution);
            }

            emit(
                callback,
                ProgressMsg::EvaluationProgress {
                    processed: end,
                    total,
                    progress: end as f64 / total as f64,
                },
            );
            start = end;
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::CollectingSink;
    use faer::mat;
    use strata_rbf_utils::{KernelParams, KernelType};

    fn context(kernel_type: KernelType) -> FitContext {
        FitContext {
            points: mat![
                [0.0, 0.0, 0.0],
                [1.0, 0.0, 0.0],
                [0.0, 30.0, 0.0f64],
            ],
            values: mat![[1.0], [2.0], [3.0f64]],
            weights: mat![[0.5], [-0.25], [2.0f64]],
            kernel: Kernel::from_params(&KernelParams::builder(kernel_type).build()),
        }
    }

    #[test]
    fn far_control_points_are_pruned() {
        let ctx = context(KernelType::Multiquadric);
        // radius = 5 * 1.75 = 8.75, the third point is 30 away
        let target = mat![[0.5, 0.0, 0.0f64]];
        let expected = 0.5 * ctx.kernel.phi(0.5) - 0.25 * ctx.kernel.phi(0.5);
        assert_eq!(ctx.evaluate_point(target.row(0), 1E-12), expected);
    }

    #[test]
    fn negligible_kernel_values_are_skipped() {
        let mut ctx = context(KernelType::Gaussian);
        ctx.points = mat![[0.0, 0.0, 0.0], [5.0, 0.0, 0.0], [0.0, 30.0, 0.0f64]];
        // phi(5) = exp(-(5/1.75)^2) ~ 2.8e-4 which is kept at 1e-12 but not at 1e-3
        let target = mat![[0.0, 0.0, 0.0f64]];
        let kept = ctx.evaluate_point(target.row(0), 1E-12);
        let skipped = ctx.evaluate_point(target.row(0), 1E-3);
        assert_eq!(skipped, 0.5);
        assert!(kept != skipped);
    }

    #[test]
    fn batching_does_not_change_values() {
        let ctx = context(KernelType::Inverse);
        let targets = Mat::from_fn(37, 3, |i, j| (i as f64) * 0.1 + j as f64 * 0.05);

        let whole = ctx.evaluate(&targets, &Params::default(), &None);
        let small = Params::builder().eval_batch_size(5).build();

        let sink = Arc::new(CollectingSink::new());
        let callback: Option<Arc<dyn ProgressSink>> = Some(sink.clone());
        let batched = ctx.evaluate(&targets, &small, &callback);

        assert_eq!(whole, batched);

        let events = sink.messages();
        assert_eq!(events.len(), 8);
        assert_eq!(
            events.last(),
            Some(&ProgressMsg::EvaluationProgress {
                processed: 37,
                total: 37,
                progress: 1.0
            })
        );
    }

    #[test]
    fn source_evaluation_is_not_pruned() {
        let ctx = context(KernelType::Multiquadric);
        let k = ctx.kernel;
        let at_source = ctx.evaluate_at_source();

        // The third point is 30 away from the others, far outside the radius.
        let full = 0.5 * k.phi(30.0) - 0.25 * k.phi(901f64.sqrt()) + 2.0 * k.phi(0.0);
        assert_eq!(at_source[(2, 0)], full);

        let pruned = ctx.evaluate(&ctx.points, &Params::default(), &None);
        assert_eq!(pruned[(2, 0)], 2.0 * k.phi(0.0));
        assert!(pruned[(2, 0)] != at_source[(2, 0)]);
    }

    #[test]
    fn empty_targets_yield_empty_output() {
        let ctx = context(KernelType::Cubic);
        let out = ctx.evaluate(&Mat::<f64>::zeros(0, 3), &Params::default(), &None);
        assert_eq!(out.nrows(), 0);
    }
}
