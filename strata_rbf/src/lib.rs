/////////////////////////////////////////////////////////////////////////////////////////////
//
// Exposes the public API and high-level documentation for RBF interpolation of layer fields.
//
// Created on: 18 Oct 2026     Author: Daniel Owen
//
// Copyright (c) 2025, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

//! # Scattered-data Radial Basis Function (RBF) interpolation.
//!
//! Interpolates a scalar field, typically a geological layer elevation or
//! grade, from scattered 3D control points onto arbitrary query locations,
//! and reports how suitable the result is for downstream mesh generation.
//!
//! The pipeline is:
//!
//! 1. **Preprocessing** - control points are deduplicated on a six decimal
//!    coordinate key and, when there are more than `max_points`, sampled with
//!    an even stride.
//! 2. **Assembly** - the symmetric kernel matrix is built with the smoothing
//!    parameter added on the diagonal.
//! 3. **Solve** - dense Gaussian elimination with partial pivoting for small
//!    systems, plain Conjugate Gradient above `direct_solve_threshold` points.
//! 4. **Evaluation** - kernel sums at the query points, in batches, skipping
//!    control points beyond the kernel's effective radius. Values at a query
//!    point only match the full fitted field when every control point that
//!    matters lies inside that radius.
//! 5. **Assessment** - residual of the full (unpruned) field at the control
//!    points, diagonal condition estimate, smoothness,
//!    quality score, mesh readiness and critical regions.
//!
//! The interpolator itself is immutable. Every call solves a fresh
//! [`FitContext`], so a single [`RBFInterpolator`] can be shared between
//! threads. Progress is reported through an optional [`progress::ProgressSink`].
//!
//! # Features
//! - Five kernels: multiquadric, inverse multiquadric, gaussian, thin plate
//!   spline and cubic
//! - Contiguous k-fold cross-validation with pooled error statistics
//! - Shape parameter search by cross-validated R²
//! - JSON persistence of results and CSV import/export of point data
//! - Built on [`faer`](https://docs.rs/faer/latest/faer/) for linear algebra
//!
//! # Examples
//!
//! ```
//! use strata_rbf::{
//!     RBFInterpolator,
//!     interpolant_config::{RBFConfig, RBFKernelType},
//!     create_evaluation_grid,
//!     RBFTestFunctions,
//! };
//!
//! // Control points on a coarse 4 x 4 x 2 grid
//! let points = create_evaluation_grid(&[(0.0, 9.0), (0.0, 9.0), (0.0, 3.0)], &[4, 4, 2]);
//! let values = RBFTestFunctions::layer_elevation(&points);
//!
//! let config = RBFConfig::builder(RBFKernelType::Multiquadric)
//!     .shape(1.0)
//!     .build();
//!
//! let rbf = RBFInterpolator::new(config)?;
//!
//! // The fitted field reproduces the control values
//! let fit = rbf.fit(&points, &values)?;
//! let fitted = fit.context.evaluate_at_source();
//!
//! let max_diff = fitted
//!     .col(0)
//!     .iter()
//!     .zip(values.col(0).iter())
//!     .fold(0.0f64, |acc, (a, b)| acc.max((a - b).abs()));
//!
//! assert!(max_diff < 1e-6);
//!
//! // Evaluate on a finer grid. The residual is measured at the control points.
//! let queries = create_evaluation_grid(&[(0.0, 9.0), (0.0, 9.0), (0.0, 3.0)], &[10, 10, 4]);
//! let result = rbf.interpolate(&points, &values, &queries)?;
//!
//! assert_eq!(result.values.len(), 400);
//! assert!(result.residual < 1e-6);
//! # Ok::<(), strata_rbf::RBFError>(())
//! ```
//!
//! # References
//! 1.  Fasshauer, G., 2007. Meshfree Approximation Methods with Matlab. World Scientific Publishing Co.
//! 2.  Bozzini, Mira & Rossini, Milvia. (2002). Testing methods for 3D scattered data
//!     interpolation. 20. 111-135.
pub mod interpolant_config;

mod common;

mod rbf;

mod error;

mod evaluator;

mod linalg;

mod iterative_solvers;

mod preprocessing;

mod cross_validation;

pub mod quality;

pub mod results;

pub mod progress;

pub mod config;

mod rbf_test_functions;

pub use {
    common::{
        Point3D, create_evaluation_grid, csv_to_control_points, generate_random_points,
        mat_to_points, points_to_mat, values_to_mat, write_values_csv,
    },
    cross_validation::{CrossValidationReport, fold_bounds},
    error::{RBFError, RBFResult, ResultIOError},
    evaluator::FitContext,
    iterative_solvers::{CgSolution, Termination, conjugate_gradient},
    linalg::gaussian_elimination,
    preprocessing::{PreparedPoints, prepare_points, stride_sample, unique_indices, validate_inputs},
    rbf::{
        Fit, RBFInterpolator, RBFInterpolatorBuilder, ShapeSearch, cross_validate,
        default_shape_candidates, interpolate,
    },
    rbf_test_functions::RBFTestFunctions,
    results::InterpolationResult,
};
