/////////////////////////////////////////////////////////////////////////////////////////////
//
// Provides synthetic value functions for validating and demonstrating RBF interpolation quality.
//
// Created on: 18 Oct 2026     Author: Daniel Owen
//
// Copyright (c) 2025, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

//! Synthetic fields used in tests and demos.
//!
//! # References
//! 1. Bozzini, Mira & Rossini, Milvia. (2002). Testing methods for 3D scattered data
//!    interpolation. 20. 111-135.
use faer::Mat;

/// Struct that implements synthetic 3D fields to generate values for testing RBF
/// interpolation.
pub struct RBFTestFunctions;

/// `scale * exp(-(sum of squared offsets) / divisor)` for `9 * p` shifted by `centre`.
#[inline]
fn gaussian_bump(p: [f64; 3], centre: [f64; 3], divisors: [f64; 3], scale: f64) -> f64 {
    let exponent: f64 = (0..3)
        .map(|k| (9.0 * p[k] - centre[k]).powi(2) / divisors[k])
        .sum();
    scale * (-exponent).exp()
}

impl RBFTestFunctions {
    /// Applies `f` to every row of an `n x 3` matrix, returning `n x 1` values.
    fn map_rows<F: Fn([f64; 3]) -> f64>(points: &Mat<f64>, f: F) -> Mat<f64> {
        assert_eq!(points.ncols(), 3);
        Mat::from_fn(points.nrows(), 1, |i, _| {
            f([points[(i, 0)], points[(i, 1)], points[(i, 2)]])
        })
    }

    /// Franke's function extended to three dimensions (`f1` in [1]), intended
    /// for points in the unit cube.
    pub fn franke_3d(points: &Mat<f64>) -> Mat<f64> {
        Self::map_rows(points, |p| {
            gaussian_bump(p, [2.0, 2.0, 2.0], [4.0, 4.0, 4.0], 0.75)
                + gaussian_bump(p, [-1.0, -1.0, -1.0], [49.0, 10.0, 10.0], 0.75)
                + gaussian_bump(p, [7.0, 3.0, 5.0], [4.0, 4.0, 4.0], 0.5)
                - gaussian_bump(p, [4.0, 7.0, 5.0], [1.0, 1.0, 1.0], 0.2)
        })
    }

    /// A gently dipping, undulating layer surface:
    /// `100 - 0.1 x - 0.05 y + 5 sin(0.2 x) cos(0.2 y)`.
    ///
    /// Ignores `z`, so it can be sampled on scattered borehole picks.
    pub fn layer_elevation(points: &Mat<f64>) -> Mat<f64> {
        Self::map_rows(points, |[x, y, _]| {
            100.0 - 0.1 * x - 0.05 * y + 5.0 * (0.2 * x).sin() * (0.2 * y).cos()
        })
    }

    /// A linear trend `a x + b y + c z + d`.
    pub fn plane(points: &Mat<f64>, a: f64, b: f64, c: f64, d: f64) -> Mat<f64> {
        Self::map_rows(points, |[x, y, z]| a * x + b * y + c * z + d)
    }
}
