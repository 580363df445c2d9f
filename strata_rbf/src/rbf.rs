/////////////////////////////////////////////////////////////////////////////////////////////
//
// Implements the main RBF interpolator, solver selection, quality assessment and cross-validation.
//
// Created on: 18 Oct 2026     Author: Daniel Owen
//
// Copyright (c) 2025, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

use crate::{
    common::{Point3D, points_to_mat, values_to_mat},
    config::{Params, Solvers},
    cross_validation::{self, CrossValidationReport},
    error::RBFResult,
    evaluator::FitContext,
    interpolant_config::RBFConfig,
    iterative_solvers::{self, Termination},
    linalg,
    preprocessing::{self, PreparedPoints},
    progress::{ProgressMsg, ProgressSink, emit},
    quality,
    results::{InterpolationResult, QualityMetrics, SolveMethod, SolveReport},
};

use faer::{Mat, MatRef};
use serde::{Deserialize, Serialize};
use std::{sync::Arc, time::Instant};
use strata_rbf_utils::{Kernel, KernelParams, get_a_matrix_symmetric_solver};

/// A solved interpolant together with how the solve went.
#[derive(Debug, Clone)]
pub struct Fit {
    /// Control points, values, weights and kernel of the solve.
    pub context: FitContext,

    pub solver: SolveReport,

    /// Diagonal ratio estimate of the system matrix conditioning.
    pub condition: f64,

    /// Control points dropped as duplicates before the solve.
    pub duplicates_removed: usize,
}

/// Outcome of [`RBFInterpolator::optimize_shape`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeSearch {
    /// Candidate with the highest pooled cross-validation R².
    pub best_shape: f64,

    /// Candidates in the order they were tried.
    pub candidates: Vec<f64>,

    /// Pooled R² per candidate. Candidates whose fit failed score `-1`.
    pub scores: Vec<f64>,
}

/// Ten shape values spaced evenly in log space over `[1e-3, 1e2]`.
pub fn default_shape_candidates() -> Vec<f64> {
    let (lo, hi) = (-3.0f64, 2.0f64);
    let count = 10;
    (0..count)
        .map(|i| 10f64.powf(lo + (hi - lo) * i as f64 / (count - 1) as f64))
        .collect()
}

/// Convenience builder for constructing an [`RBFInterpolator`].
///
/// The builder should be called via the [`RBFInterpolator::builder`] method.
///
/// See [`RBFInterpolator`] for details on each field.
#[derive(Debug, Clone)]
pub struct RBFInterpolatorBuilder {
    config: RBFConfig,
    params: Params,
    progress_callback: Option<Arc<dyn ProgressSink>>,
}

impl RBFInterpolatorBuilder {
    fn new(config: RBFConfig) -> Self {
        Self {
            config,
            params: Params::default(),
            progress_callback: None,
        }
    }

    /// Sets custom solver and algorithm parameters.
    pub fn params(mut self, params: Params) -> Self {
        self.params = params;
        self
    }

    /// Optional callback for reporting progress.
    pub fn progress_callback(mut self, progress_callback: Arc<dyn ProgressSink>) -> Self {
        self.progress_callback = Some(progress_callback);
        self
    }

    /// Validates the configuration and returns the [`RBFInterpolator`].
    ///
    /// # Errors
    /// [`RBFError::InvalidConfig`](crate::RBFError::InvalidConfig) if the configuration is out of range.
    pub fn build(self) -> RBFResult<RBFInterpolator> {
        self.config.validate()?;
        Ok(RBFInterpolator {
            config: self.config,
            params: self.params,
            progress_callback: self.progress_callback,
        })
    }
}

#[doc = include_str!("../docs/rbf_interpolator.md")]
#[derive(Debug, Clone)]
pub struct RBFInterpolator {
    /// Kernel, smoothing, sampling and mesh settings.
    pub config: RBFConfig,

    /// Solver and algorithm parameters.
    pub params: Params,

    /// Optional callback for reporting progress.
    pub(crate) progress_callback: Option<Arc<dyn ProgressSink>>,
}

impl RBFInterpolator {
    /// Creates a new [`RBFInterpolatorBuilder`] for the given configuration.
    pub fn builder(config: RBFConfig) -> RBFInterpolatorBuilder {
        RBFInterpolatorBuilder::new(config)
    }

    /// Creates an interpolator with default [`Params`] and no progress sink.
    pub fn new(config: RBFConfig) -> RBFResult<Self> {
        Self::builder(config).build()
    }

    /// Kernel built from `config`.
    fn kernel(config: &RBFConfig) -> Kernel {
        Kernel::from_params(&KernelParams::from(config))
    }

    /// Assembles and solves the system for already prepared control points.
    fn solve_prepared(
        &self,
        config: &RBFConfig,
        points: Mat<f64>,
        values: Mat<f64>,
    ) -> RBFResult<(FitContext, SolveReport, f64)> {
        let n = points.nrows();
        let kernel = Self::kernel(config);

        let a = get_a_matrix_symmetric_solver(&points, &kernel, &config.smooth);
        let condition = quality::condition_estimate(&a);

        let (weights, report) = match self.params.resolve_solver(n) {
            Solvers::ConjugateGradient => {
                let matvec = |x: &MatRef<f64>| &a * *x;
                let solution = iterative_solvers::conjugate_gradient(
                    &matvec,
                    &values,
                    self.params.max_iterations,
                    self.params.iterative_tolerance,
                    self.params.degenerate_threshold,
                    self.params.progress_interval,
                    &self.progress_callback,
                );
                let report = SolveReport {
                    method: SolveMethod::ConjugateGradient,
                    iterations: solution.iterations,
                    residual_norm: solution.residual_norm,
                    termination: solution.termination,
                };
                (solution.x, report)
            }
            Solvers::Direct | Solvers::Auto => {
                let weights = linalg::gaussian_elimination(&a, &values, config.tolerance)?;
                let report = SolveReport {
                    method: SolveMethod::Direct,
                    iterations: 0,
                    residual_norm: linalg::residual_norm(&a, &weights, &values),
                    termination: Termination::Direct,
                };
                (weights, report)
            }
        };

        log::debug!(
            "solved {} point system with {:?} ({:?}, residual {:e})",
            n,
            report.method,
            report.termination,
            report.residual_norm
        );

        let context = FitContext {
            points,
            values,
            weights,
            kernel,
        };
        Ok((context, report, condition))
    }

    /// Deduplicates and caps the control points, then solves for the weights.
    ///
    /// `points` is `n x 3` and `values` is `n x 1`.
    ///
    /// # Errors
    /// - [`RBFError::InputMismatch`](crate::RBFError::InputMismatch) if the row counts differ.
    /// - [`RBFError::InsufficientData`](crate::RBFError::InsufficientData) if there are no control points.
    /// - [`RBFError::SingularSystem`](crate::RBFError::SingularSystem) if the direct solver meets a tiny pivot.
    pub fn fit(&self, points: &Mat<f64>, values: &Mat<f64>) -> RBFResult<Fit> {
        let PreparedPoints {
            points,
            values,
            duplicates_removed,
        } = preprocessing::prepare_points(
            points,
            values,
            self.config.max_points,
            &self.progress_callback,
        )?;

        let (context, solver, condition) = self.solve_prepared(&self.config, points, values)?;

        Ok(Fit {
            context,
            solver,
            condition,
            duplicates_removed,
        })
    }

    /// Evaluates a fitted interpolant at `targets` (`m x 3`).
    pub fn evaluate(&self, context: &FitContext, targets: &Mat<f64>) -> Mat<f64> {
        context.evaluate(targets, &self.params, &self.progress_callback)
    }

    /// Fits the control points, evaluates the field at `queries` and assesses
    /// the result.
    ///
    /// # Errors
    /// See [`RBFInterpolator::fit`].
    pub fn interpolate(
        &self,
        points: &Mat<f64>,
        values: &Mat<f64>,
        queries: &Mat<f64>,
    ) -> RBFResult<InterpolationResult> {
        let start = Instant::now();

        let fit = self.fit(points, values)?;
        let context = &fit.context;

        let predicted = self.evaluate(context, queries);
        let predicted: Vec<f64> = predicted.col(0).iter().copied().collect();

        let at_controls = context.evaluate_at_source();
        let residual = quality::rmse(&at_controls, &context.values);

        let confidence = vec![self.params.confidence; predicted.len()];
        let thresholds = &self.params.quality_thresholds;
        let mesh = &self.config.mesh_compatibility;

        let smoothness = quality::smoothness_score(&predicted);
        let quality_score = quality::quality_score(residual, fit.condition, smoothness, thresholds);
        let estimated_elements = quality::estimated_elements(queries, mesh.target_mesh_size);

        let quality_metrics = QualityMetrics {
            mesh_readiness: quality::mesh_readiness(
                quality_score,
                estimated_elements,
                mesh,
                thresholds,
            ),
            expected_mesh_size: mesh.target_mesh_size,
            estimated_elements,
            quality_score,
            complexity: quality::complexity(estimated_elements, thresholds),
        };
        let critical_regions =
            quality::critical_regions(queries, &predicted, &confidence, thresholds);

        let elapsed = start.elapsed();

        let summary = format!(
            "Took {:?} to interpolate {} query points from {} control points using the following settings:\n\
            Kernel: {}, Shape: {}, Smooth: {}\n\
            Solver: {:?} ({:?}), Residual: {:e}, Quality score: {:.3}",
            elapsed,
            predicted.len(),
            context.len(),
            self.config.kernel.tag(),
            self.config.shape,
            self.config.smooth,
            fit.solver.method,
            fit.solver.termination,
            residual,
            quality_score,
        );
        log::debug!("{}", summary);
        emit(&self.progress_callback, ProgressMsg::Message { message: summary });

        Ok(InterpolationResult {
            values: predicted,
            confidence,
            residual,
            condition: fit.condition,
            execution_time: elapsed.as_secs_f64() * 1000.0,
            quality_metrics,
            critical_regions,
            solver: fit.solver,
            points_used: context.len(),
            duplicates_removed: fit.duplicates_removed,
        })
    }

    fn cross_validate_prepared(
        &self,
        config: &RBFConfig,
        prepared: &PreparedPoints,
        folds: usize,
        callback: &Option<Arc<dyn ProgressSink>>,
    ) -> RBFResult<CrossValidationReport> {
        cross_validation::run_folds(
            &prepared.points,
            &prepared.values,
            folds,
            |train_points, train_values, test_points| {
                let (context, _, _) = self.solve_prepared(config, train_points, train_values)?;
                Ok(context.evaluate(test_points, &self.params, &None))
            },
            callback,
        )
    }

    /// Contiguous k-fold cross-validation of the interpolator.
    ///
    /// Control points are deduplicated and capped once, before partitioning.
    ///
    /// # Errors
    /// - [`RBFError::InvalidFolds`](crate::RBFError::InvalidFolds) unless `2 <= folds <= n` after deduplication.
    /// - Any error raised while fitting a fold.
    pub fn cross_validate(
        &self,
        points: &Mat<f64>,
        values: &Mat<f64>,
        folds: usize,
    ) -> RBFResult<CrossValidationReport> {
        let prepared = preprocessing::prepare_points(
            points,
            values,
            self.config.max_points,
            &self.progress_callback,
        )?;
        self.cross_validate_prepared(&self.config, &prepared, folds, &self.progress_callback)
    }

    /// Picks the shape parameter with the best pooled cross-validation R².
    ///
    /// An empty `candidates` slice uses [`default_shape_candidates`]. Ties go
    /// to the earlier candidate.
    ///
    /// # Errors
    /// Input and fold count errors are returned directly. Failures of an
    /// individual candidate only score it `-1`.
    pub fn optimize_shape(
        &self,
        points: &Mat<f64>,
        values: &Mat<f64>,
        candidates: &[f64],
        folds: usize,
    ) -> RBFResult<ShapeSearch> {
        let candidates = match candidates.is_empty() {
            true => default_shape_candidates(),
            false => candidates.to_vec(),
        };

        let prepared = preprocessing::prepare_points(
            points,
            values,
            self.config.max_points,
            &self.progress_callback,
        )?;
        cross_validation::fold_bounds(prepared.points.nrows(), folds)?;

        let mut scores = Vec::with_capacity(candidates.len());
        for &shape in &candidates {
            let config = RBFConfig {
                shape,
                ..self.config
            };
            let score = config
                .validate()
                .and_then(|_| self.cross_validate_prepared(&config, &prepared, folds, &None))
                .map(|report| report.r2);

            let score = match score {
                Ok(r2) if r2.is_finite() => r2,
                Ok(r2) => {
                    log::warn!("shape {} produced a non-finite R² ({})", shape, r2);
                    -1.0
                }
                Err(e) => {
                    log::warn!("shape {} failed during cross-validation: {}", shape, e);
                    -1.0
                }
            };
            emit(
                &self.progress_callback,
                ProgressMsg::Message {
                    message: format!("shape {:.4e}: R² {:.4}", shape, score),
                },
            );
            scores.push(score);
        }

        let mut best = 0;
        for (i, &score) in scores.iter().enumerate() {
            if score > scores[best] {
                best = i;
            }
        }

        Ok(ShapeSearch {
            best_shape: candidates[best],
            candidates,
            scores,
        })
    }
}

/// Interpolates `values` at `points` onto `query_points` in one call.
///
/// Uses [`RBFConfig::default`] when `config` is `None`.
///
/// # Example
/// ```
/// use strata_rbf::{Point3D, interpolate};
///
/// let points = [
///     Point3D::new(0.0, 0.0, 0.0),
///     Point3D::new(1.0, 0.0, 0.0),
///     Point3D::new(0.0, 1.0, 0.0),
/// ];
/// let values = [1.0, 2.0, 3.0];
///
/// let result = interpolate(&points, &values, &points, None)?;
/// assert!((result.values[1] - 2.0).abs() < 1e-8);
/// # Ok::<(), strata_rbf::RBFError>(())
/// ```
pub fn interpolate(
    points: &[Point3D],
    values: &[f64],
    query_points: &[Point3D],
    config: Option<&RBFConfig>,
) -> RBFResult<InterpolationResult> {
    let interpolator = RBFInterpolator::new(config.copied().unwrap_or_default())?;
    interpolator.interpolate(
        &points_to_mat(points),
        &values_to_mat(values),
        &points_to_mat(query_points),
    )
}

/// Cross-validates over `folds` contiguous folds.
///
/// Uses [`RBFConfig::default`] when `config` is `None`.
pub fn cross_validate(
    points: &[Point3D],
    values: &[f64],
    folds: usize,
    config: Option<&RBFConfig>,
) -> RBFResult<CrossValidationReport> {
    RBFInterpolator::new(config.copied().unwrap_or_default())?.cross_validate(
        &points_to_mat(points),
        &values_to_mat(values),
        folds,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        common::{create_evaluation_grid, generate_random_points},
        error::RBFError,
        interpolant_config::RBFKernelType,
        progress::CollectingSink,
        rbf_test_functions::RBFTestFunctions,
    };
    use equator::assert;
    use faer::{mat, prelude::Solve, utils::approx::*};
    use strata_rbf_utils::RadialKernel;

    fn interpolator(kernel: RBFKernelType) -> RBFInterpolator {
        RBFInterpolator::new(RBFConfig::builder(kernel).build()).unwrap()
    }

    fn rms_difference(a: &[f64], b: &[f64]) -> f64 {
        let sum: f64 = a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum();
        (sum / a.len() as f64).sqrt()
    }

    /// Franke samples on the unit cube, stretched to a 10 unit cube so the
    /// point spacing is comparable to the default mesh size.
    fn scattered(n: usize, seed: u64) -> (Mat<f64>, Mat<f64>) {
        let unit = generate_random_points(n, 3, Some(seed));
        let values = RBFTestFunctions::franke_3d(&unit);
        (Mat::from_fn(n, 3, |i, j| 10.0 * unit[(i, j)]), values)
    }

    /// Regular grid with `k` samples per axis and the given spacing.
    fn grid(k: usize, spacing: f64) -> Mat<f64> {
        let extent = spacing * (k - 1) as f64;
        create_evaluation_grid(&[(0.0, extent), (0.0, extent), (0.0, extent)], &[k, k, k])
    }

    #[test]
    fn reproduces_control_values_without_smoothing() {
        let mut points = generate_random_points(8, 3, Some(11));
        for i in 0..8 {
            for j in 0..3 {
                points[(i, j)] *= 3.0;
            }
        }
        let values = RBFTestFunctions::layer_elevation(&points);

        let rbf = interpolator(RBFKernelType::Multiquadric);
        let result = rbf.interpolate(&points, &values, &points).unwrap();

        for i in 0..8 {
            assert!((result.values[i] - values[(i, 0)]).abs() < 1e-8);
        }
        assert!(result.residual < 1e-8);
        assert!(result.solver.method == SolveMethod::Direct);
        assert!(result.points_used == 8);
    }

    #[test]
    fn four_corner_centre_matches_reference_solve() {
        let points = mat![
            [0.0, 0.0, 0.0],
            [10.0, 0.0, 0.0],
            [0.0, 10.0, 0.0],
            [10.0, 10.0, 0.0f64],
        ];
        let values = mat![[1.0], [2.0], [3.0], [4.0f64]];
        let centre = mat![[5.0, 5.0, 0.0f64]];

        let rbf = interpolator(RBFKernelType::Multiquadric);
        let fit = rbf.fit(&points, &values).unwrap();
        let v = rbf.evaluate(&fit.context, &centre)[(0, 0)];

        assert!(v > 1.0 && v < 4.0);

        // Every row of the system holds phi(0), two phi(10) and one phi(10 sqrt 2),
        // so the weights sum to 10 / row_sum.
        let k = fit.context.kernel;
        let row_sum = k.phi(0.0) + 2.0 * k.phi(10.0) + k.phi(200f64.sqrt());
        let expected = k.phi(50f64.sqrt()) * 10.0 / row_sum;
        assert!((v - expected).abs() < 1e-10);

        let a = get_a_matrix_symmetric_solver(&points, &k, &0.0);
        let w_ref = a.partial_piv_lu().solve(&values);
        let approx_eq = CwiseMat(ApproxEq::eps() * 1E4);
        assert!(&fit.context.weights ~ &w_ref);
    }

    #[test]
    fn four_corner_fit_is_exact_beyond_the_effective_radius() {
        // Corners are 10 apart, outside the multiquadric radius of 8.75.
        let points = mat![
            [0.0, 0.0, 0.0],
            [10.0, 0.0, 0.0],
            [0.0, 10.0, 0.0],
            [10.0, 10.0, 0.0f64],
        ];
        let values = mat![[1.0], [2.0], [3.0], [4.0f64]];

        let rbf = interpolator(RBFKernelType::Multiquadric);
        let fit = rbf.fit(&points, &values).unwrap();

        let approx_eq = CwiseMat(ApproxEq::eps() * 1E4);
        assert!(&fit.context.evaluate_at_source() ~ &values);

        let result = rbf.interpolate(&points, &values, &points).unwrap();
        assert!(result.residual < 1e-10);
        assert!(result.condition == 1.0);

        // Pruned query evaluation at a corner only sees that corner.
        let phi0 = fit.context.kernel.phi(0.0);
        for i in 0..4 {
            assert!(result.values[i] == fit.context.weights[(i, 0)] * phi0);
        }
    }

    #[test]
    fn residual_is_near_zero_on_widely_spread_points() {
        let (points, values) = scattered(60, 9);
        let queries = grid(4, 3.0);

        for kernel in [RBFKernelType::Multiquadric, RBFKernelType::Gaussian] {
            let result = interpolator(kernel)
                .interpolate(&points, &values, &queries)
                .unwrap();
            assert!(result.residual < 1e-8);
            assert!(result.quality_metrics.quality_score > 0.0);
        }
    }

    #[test]
    fn direct_and_iterative_solvers_agree() {
        let points = grid(4, 3.0);
        let values = RBFTestFunctions::layer_elevation(&points);
        let queries = create_evaluation_grid(&[(0.5, 8.5), (1.0, 8.0), (0.0, 9.0)], &[5, 4, 3]);

        let config = RBFConfig::builder(RBFKernelType::Gaussian).build();
        let direct = RBFInterpolator::builder(config)
            .params(Params::builder().solver_type(Solvers::Direct).build())
            .build()
            .unwrap();
        let iterative = RBFInterpolator::builder(config)
            .params(Params::builder().solver_type(Solvers::ConjugateGradient).build())
            .build()
            .unwrap();

        let a = direct.interpolate(&points, &values, &queries).unwrap();
        let b = iterative.interpolate(&points, &values, &queries).unwrap();

        assert!(a.solver.method == SolveMethod::Direct);
        assert!(b.solver.method == SolveMethod::ConjugateGradient);
        assert!(b.solver.termination != Termination::MaxIterations);
        assert!(rms_difference(&a.values, &b.values) < 1e-4);
    }

    #[test]
    fn large_systems_switch_to_conjugate_gradient() {
        let points = grid(5, 4.0);
        let values = RBFTestFunctions::layer_elevation(&points);
        let config = RBFConfig::builder(RBFKernelType::Gaussian).build();

        let auto = RBFInterpolator::new(config).unwrap();
        let fit = auto.fit(&points, &values).unwrap();
        assert!(fit.context.len() == 125);
        assert!(fit.solver.method == SolveMethod::ConjugateGradient);
        // Near convergence |p . A p| can drop under the degenerate threshold
        // before the residual norm drops under the tolerance.
        assert!(matches!(
            fit.solver.termination,
            Termination::Converged | Termination::DegenerateDirection
        ));
        assert!(fit.solver.iterations <= 125);
        assert!(fit.solver.residual_norm < 1e-6);

        let direct = RBFInterpolator::builder(config)
            .params(Params::builder().solver_type(Solvers::Direct).build())
            .build()
            .unwrap();
        let reference = direct.fit(&points, &values).unwrap();

        let approx_eq = CwiseMat(ApproxEq::eps() * 1E9);
        assert!(&fit.context.weights ~ &reference.context.weights);
    }

    #[test]
    fn near_coincident_points_make_a_singular_system() {
        let points = mat![[0.0, 0.0, 0.0], [1e-5, 0.0, 0.0f64]];
        let values = mat![[1.0], [2.0f64]];
        let err = interpolator(RBFKernelType::Gaussian)
            .fit(&points, &values)
            .unwrap_err();
        assert!(matches!(err, RBFError::SingularSystem { column: 1, .. }));
    }

    #[test]
    fn input_errors_are_raised_before_assembly() {
        let rbf = interpolator(RBFKernelType::Cubic);
        let err = rbf
            .interpolate(&Mat::zeros(3, 3), &Mat::zeros(2, 1), &Mat::zeros(1, 3))
            .unwrap_err();
        assert!(err == RBFError::InputMismatch { points: 3, values: 2 });

        let err = rbf
            .interpolate(&Mat::zeros(0, 3), &Mat::zeros(0, 1), &Mat::zeros(1, 3))
            .unwrap_err();
        assert!(err == RBFError::InsufficientData);
    }

    #[test]
    fn interpolation_is_idempotent() {
        let (points, values) = scattered(40, 3);
        let (queries, _) = scattered(25, 4);

        let rbf = interpolator(RBFKernelType::Inverse);
        let first = rbf.interpolate(&points, &values, &queries).unwrap();
        let second = rbf.interpolate(&points, &values, &queries).unwrap();
        assert!(first.values == second.values);
        assert!(first.residual == second.residual);
    }

    #[test]
    fn thin_plate_spline_diagonal_is_zero_without_smoothing() {
        let points = grid(2, 1.0);
        let values = RBFTestFunctions::plane(&points, 1.0, 2.0, 3.0, 0.0);

        let rbf = interpolator(RBFKernelType::ThinPlateSpline);
        let result = rbf.interpolate(&points, &values, &points).unwrap();
        assert!(result.condition.is_infinite());

        let json = serde_json::to_value(&result).unwrap();
        assert!(json["condition"].is_null());

        let smoothed = RBFInterpolator::new(
            RBFConfig::builder(RBFKernelType::ThinPlateSpline)
                .smooth(0.5)
                .build(),
        )
        .unwrap();
        let result = smoothed.interpolate(&points, &values, &points).unwrap();
        assert!(result.condition.is_finite());
    }

    #[test]
    fn duplicates_and_subsampling_are_reported() {
        let unique = grid(3, 1.0);
        let points = Mat::from_fn(54, 3, |i, j| unique[(i % 27, j)]);
        let values = RBFTestFunctions::plane(&points, 1.0, 0.0, 0.0, 0.0);

        let sink = Arc::new(CollectingSink::new());
        let rbf = RBFInterpolator::builder(
            RBFConfig::builder(RBFKernelType::Multiquadric)
                .max_points(10)
                .build(),
        )
        .progress_callback(sink.clone())
        .build()
        .unwrap();

        let result = rbf.interpolate(&points, &values, &points).unwrap();
        assert!(result.duplicates_removed == 27);
        // 27 unique points, step ceil(27 / 10) = 3
        assert!(result.points_used == 9);

        let messages = sink.messages();
        assert!(messages.contains(&ProgressMsg::DuplicatesRemoved { num_duplicates: 27 }));
        assert!(messages.contains(&ProgressMsg::PointsSubsampled { from: 27, to: 9 }));
        assert!(matches!(messages.last(), Some(ProgressMsg::Message { .. })));
    }

    #[test]
    fn result_carries_constant_confidence_and_quality() {
        let points = grid(3, 2.0);
        let values = RBFTestFunctions::plane(&points, 0.01, 0.01, 0.0, 1.0);
        let queries = create_evaluation_grid(&[(0.0, 4.0), (0.0, 4.0), (0.0, 4.0)], &[9, 1, 1]);

        let result = interpolator(RBFKernelType::Multiquadric)
            .interpolate(&points, &values, &queries)
            .unwrap();

        assert!(result.values.len() == 9);
        assert!(result.confidence == vec![0.95; 9]);
        assert!(result.critical_regions.low_confidence_zones.is_empty());
        assert!(result.quality_metrics.quality_score >= 0.0);
        assert!(result.quality_metrics.quality_score <= 1.0);
        // Queries lie on a line, so the bounding box has no volume.
        assert!(result.quality_metrics.estimated_elements == 0);
        assert!(result.quality_metrics.expected_mesh_size == 1.75);
        assert!(result.execution_time >= 0.0);
    }

    #[test]
    fn cross_validation_reports_every_fold() {
        let (points, values) = scattered(60, 21);

        let sink = Arc::new(CollectingSink::new());
        let rbf = RBFInterpolator::builder(RBFConfig::builder(RBFKernelType::Gaussian).build())
            .progress_callback(sink.clone())
            .build()
            .unwrap();
        let report = rbf.cross_validate(&points, &values, 5).unwrap();

        assert!(report.cross_validation_scores.len() == 5);
        assert!(report.mean_error >= 0.0);
        assert!(report.max_error >= report.mean_error);
        assert!(report.rmse >= report.mean_error);
        assert!(report.r2.is_finite());

        let folds: Vec<usize> = sink
            .messages()
            .into_iter()
            .filter_map(|m| match m {
                ProgressMsg::CrossValidationFold { fold, .. } => Some(fold),
                _ => None,
            })
            .collect();
        assert!(folds == vec![1, 2, 3, 4, 5]);

        let err = rbf.cross_validate(&points, &values, 61).unwrap_err();
        assert!(err == RBFError::InvalidFolds { folds: 61, points: 60 });
    }

    #[test]
    fn shape_search_scores_each_candidate() {
        let (points, values) = scattered(30, 5);

        let rbf = interpolator(RBFKernelType::Gaussian);
        let search = rbf.optimize_shape(&points, &values, &[], 3).unwrap();

        assert!(search.candidates.len() == 10);
        assert!(search.scores.len() == 10);
        assert!((search.candidates[0] - 1e-3).abs() < 1e-15);
        assert!((search.candidates[9] - 1e2).abs() < 1e-10);

        let best = search
            .scores
            .iter()
            .cloned()
            .fold(f64::NEG_INFINITY, f64::max);
        let best_idx = search.scores.iter().position(|&s| s == best).unwrap();
        assert!(search.best_shape == search.candidates[best_idx]);

        let err = rbf.optimize_shape(&points, &values, &[1.0], 1).unwrap_err();
        assert!(err == RBFError::InvalidFolds { folds: 1, points: 30 });
    }

    #[test]
    fn slice_api_matches_matrix_api() {
        let points = vec![
            Point3D::new(0.0, 0.0, 0.0),
            Point3D::new(10.0, 0.0, 0.0),
            Point3D::new(0.0, 10.0, 0.0),
            Point3D::new(10.0, 10.0, 0.0),
        ];
        let values = [1.0, 2.0, 3.0, 4.0];
        let query = [Point3D::new(5.0, 5.0, 0.0)];

        let result = interpolate(&points, &values, &query, None).unwrap();
        assert!(result.values[0] > 1.0 && result.values[0] < 4.0);

        let err = interpolate(&points, &values[..3], &query, None).unwrap_err();
        assert!(err == RBFError::InputMismatch { points: 4, values: 3 });

        let bad = RBFConfig::builder(RBFKernelType::Cubic).shape(-1.0).build();
        let err = interpolate(&points, &values, &query, Some(&bad)).unwrap_err();
        assert!(matches!(err, RBFError::InvalidConfig(_)));

        let report = cross_validate(&points, &values, 2, None).unwrap();
        assert!(report.cross_validation_scores.len() == 2);

        let gaussian = RBFConfig::builder(RBFKernelType::Gaussian).shape(0.2).build();
        let tuned = cross_validate(&points, &values, 2, Some(&gaussian)).unwrap();
        let matrix_api = RBFInterpolator::new(gaussian)
            .unwrap()
            .cross_validate(&points_to_mat(&points), &values_to_mat(&values), 2)
            .unwrap();
        assert!(tuned == matrix_api);
        assert!(tuned != report);

        let err = cross_validate(&points, &values, 2, Some(&bad)).unwrap_err();
        assert!(matches!(err, RBFError::InvalidConfig(_)));
    }

    #[test]
    fn interpolator_is_shareable_between_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<RBFInterpolator>();
        assert_send_sync::<FitContext>();
    }
}
