/////////////////////////////////////////////////////////////////////////////////////////////
//
// Declares configuration types for solver selection, evaluation batching and quality thresholds.
//
// Created on: 18 Oct 2026     Author: Daniel Owen
//
// Copyright (c) 2025, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

//! Declares configuration types for solver selection, evaluation batching and quality thresholds.
use serde::{Deserialize, Serialize};

/// Thresholds used by the quality assessment.
///
/// Most users never need to touch these. They are exposed so that downstream
/// tooling can tighten or relax what counts as a critical region, and how
/// harshly residuals and conditioning are penalised in the quality score.
///
/// ### Default Values
/// - `gradient`: `0.5`
/// - `discontinuity`: `0.3`
/// - `low_confidence`: `0.7`
/// - `residual_high` / `residual_medium`: `0.1` / `0.05`
/// - `residual_high_penalty` / `residual_medium_penalty`: `0.2` / `0.1`
/// - `condition_high` / `condition_medium`: `1000` / `100`
/// - `condition_high_penalty` / `condition_medium_penalty`: `0.15` / `0.05`
/// - `complexity_high` / `complexity_medium`: `1_500_000` / `800_000`
/// - `mesh_size_min` / `mesh_size_max`: `1.5` / `2.0`
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq)]
pub struct QualityThresholds {
    /// Gradient magnitude above which a query point is a high gradient region.
    pub gradient: f64,

    /// Jump between consecutive query values that marks a discontinuity.
    pub discontinuity: f64,

    /// Confidence below which a query point is flagged.
    pub low_confidence: f64,

    pub residual_high: f64,
    pub residual_medium: f64,
    pub residual_high_penalty: f64,
    pub residual_medium_penalty: f64,

    pub condition_high: f64,
    pub condition_medium: f64,
    pub condition_high_penalty: f64,
    pub condition_medium_penalty: f64,

    /// Estimated element count above which complexity is `high`.
    pub complexity_high: f64,

    /// Estimated element count above which complexity is `medium`.
    pub complexity_medium: f64,

    /// Inclusive window the configured `target_mesh_size` must fall in for a
    /// field to be mesh ready.
    pub mesh_size_min: f64,
    pub mesh_size_max: f64,
}

impl Default for QualityThresholds {
    fn default() -> Self {
        QualityThresholds {
            gradient: 0.5,
            discontinuity: 0.3,
            low_confidence: 0.7,
            residual_high: 0.1,
            residual_medium: 0.05,
            residual_high_penalty: 0.2,
            residual_medium_penalty: 0.1,
            condition_high: 1000.0,
            condition_medium: 100.0,
            condition_high_penalty: 0.15,
            condition_medium_penalty: 0.05,
            complexity_high: 1_500_000.0,
            complexity_medium: 800_000.0,
            mesh_size_min: 1.5,
            mesh_size_max: 2.0,
        }
    }
}

#[doc = include_str!("../docs/params.md")]
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct Params {
    /// Solver to use when fitting the RBF system.
    pub solver_type: Solvers,

    /// Largest system size solved directly when `solver_type` is
    /// [`Solvers::Auto`].
    pub direct_solve_threshold: usize,

    /// Upper bound on conjugate gradient iterations. The effective cap is
    /// `min(n, max_iterations)`.
    pub max_iterations: usize,

    /// Residual norm at which conjugate gradient stops.
    pub iterative_tolerance: f64,

    /// Conjugate gradient stops when `|p . A p|` falls below this value.
    pub degenerate_threshold: f64,

    /// Number of iterations between solver progress events.
    pub progress_interval: usize,

    /// Number of query points evaluated per batch.
    pub eval_batch_size: usize,

    /// Kernel values with magnitude below this are skipped during evaluation.
    pub negligible_contribution: f64,

    /// Constant per-point confidence reported with every result.
    pub confidence: f64,

    /// Thresholds used by the quality assessment.
    pub quality_thresholds: QualityThresholds,
}

impl Default for Params {
    fn default() -> Self {
        ParamsBuilder::new().build()
    }
}

impl Params {
    /// Returns a new [`ParamsBuilder`] populated with defaults.
    pub fn builder() -> ParamsBuilder {
        ParamsBuilder::new()
    }

    /// Resolves [`Solvers::Auto`] to a concrete solver for a system of size `n`.
    pub fn resolve_solver(&self, n: usize) -> Solvers {
        match self.solver_type {
            Solvers::Auto if n <= self.direct_solve_threshold => Solvers::Direct,
            Solvers::Auto => Solvers::ConjugateGradient,
            other => other,
        }
    }
}

/// A convenience builder for constructing a [`Params`] instance.
///
/// The builder should be called via the [`Params::builder`] method.
///
/// See [`Params`] for details on each field.
#[derive(Debug, Clone)]
pub struct ParamsBuilder {
    pub solver_type: Solvers,
    pub direct_solve_threshold: usize,
    pub max_iterations: usize,
    pub iterative_tolerance: f64,
    pub degenerate_threshold: f64,
    pub progress_interval: usize,
    pub eval_batch_size: usize,
    pub negligible_contribution: f64,
    pub confidence: f64,
    pub quality_thresholds: QualityThresholds,
}

impl ParamsBuilder {
    /// Creates a new builder with default values.
    fn new() -> Self {
        Self {
            solver_type: Solvers::Auto,
            direct_solve_threshold: 100,
            max_iterations: 1000,
            iterative_tolerance: 1E-8,
            degenerate_threshold: 1E-14,
            progress_interval: 10,
            eval_batch_size: 256,
            negligible_contribution: 1E-12,
            confidence: 0.95,
            quality_thresholds: QualityThresholds::default(),
        }
    }

    /// Sets the solver type.
    pub fn solver_type(mut self, solver_type: Solvers) -> Self {
        self.solver_type = solver_type;
        self
    }

    /// Sets the threshold for switching to direct solves.
    pub fn direct_solve_threshold(mut self, direct_solve_threshold: usize) -> Self {
        self.direct_solve_threshold = direct_solve_threshold;
        self
    }

    /// Sets the conjugate gradient iteration cap.
    pub fn max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Sets the conjugate gradient residual tolerance.
    pub fn iterative_tolerance(mut self, iterative_tolerance: f64) -> Self {
        self.iterative_tolerance = iterative_tolerance;
        self
    }

    pub fn degenerate_threshold(mut self, degenerate_threshold: f64) -> Self {
        self.degenerate_threshold = degenerate_threshold;
        self
    }

    pub fn progress_interval(mut self, progress_interval: usize) -> Self {
        self.progress_interval = progress_interval;
        self
    }

    /// Sets the number of query points evaluated per batch.
    pub fn eval_batch_size(mut self, eval_batch_size: usize) -> Self {
        self.eval_batch_size = eval_batch_size;
        self
    }

    pub fn negligible_contribution(mut self, negligible_contribution: f64) -> Self {
        self.negligible_contribution = negligible_contribution;
        self
    }

    pub fn confidence(mut self, confidence: f64) -> Self {
        self.confidence = confidence;
        self
    }

    /// Sets the quality assessment thresholds.
    pub fn quality_thresholds(mut self, quality_thresholds: QualityThresholds) -> Self {
        self.quality_thresholds = quality_thresholds;
        self
    }

    /// Builds and returns a [`Params`] instance.
    pub fn build(self) -> Params {
        Params {
            solver_type: self.solver_type,
            direct_solve_threshold: self.direct_solve_threshold,
            max_iterations: self.max_iterations,
            iterative_tolerance: self.iterative_tolerance,
            degenerate_threshold: self.degenerate_threshold,
            progress_interval: self.progress_interval.max(1),
            eval_batch_size: self.eval_batch_size.max(1),
            negligible_contribution: self.negligible_contribution,
            confidence: self.confidence,
            quality_thresholds: self.quality_thresholds,
        }
    }
}

/// Enum for the available linear solvers.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Solvers {
    /// Direct solve up to `direct_solve_threshold` points, conjugate
    /// gradient above it.
    Auto,

    /// Gaussian elimination with partial pivoting.
    Direct,

    /// Unpreconditioned conjugate gradient.
    ConjugateGradient,
}

impl Default for Solvers {
    fn default() -> Self {
        Solvers::Auto
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auto_switches_at_the_direct_threshold() {
        let params = Params::default();
        assert_eq!(params.resolve_solver(1), Solvers::Direct);
        assert_eq!(params.resolve_solver(100), Solvers::Direct);
        assert_eq!(params.resolve_solver(101), Solvers::ConjugateGradient);
    }

    #[test]
    fn forced_solver_ignores_size() {
        let direct = Params::builder().solver_type(Solvers::Direct).build();
        assert_eq!(direct.resolve_solver(5000), Solvers::Direct);

        let cg = Params::builder().solver_type(Solvers::ConjugateGradient).build();
        assert_eq!(cg.resolve_solver(3), Solvers::ConjugateGradient);
    }

    #[test]
    fn builder_keeps_intervals_positive() {
        let params = Params::builder().progress_interval(0).eval_batch_size(0).build();
        assert_eq!(params.progress_interval, 1);
        assert_eq!(params.eval_batch_size, 1);
    }
}
