/////////////////////////////////////////////////////////////////////////////////////////////
//
// Computes fit diagnostics, quality scores and mesh readiness for an interpolated field.
//
// Created on: 18 Oct 2026     Author: Daniel Owen
//
// Copyright (c) 2025, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

//! Fit diagnostics for an interpolated field.
//!
//! All measures here are cheap heuristics intended to gate mesh generation.
//! In particular [`condition_estimate`] only looks at the matrix diagonal and
//! is not a true condition number.

use crate::{
    common::Point3D,
    config::QualityThresholds,
    interpolant_config::MeshCompatibility,
    results::{Complexity, CriticalRegions},
};
use faer::Mat;
use strata_rbf_utils::{get_distance, get_pointarray_extents};

/// Root mean square difference between two `n x 1` columns.
///
/// Returns `0.0` for empty input.
pub fn rmse(predicted: &Mat<f64>, actual: &Mat<f64>) -> f64 {
    let n = predicted.nrows();
    if n == 0 {
        return 0.0;
    }
    let sum_sq: f64 = predicted
        .col(0)
        .iter()
        .zip(actual.col(0).iter())
        .map(|(p, a)| (p - a) * (p - a))
        .sum();
    (sum_sq / n as f64).sqrt()
}

/// Ratio of the largest to the smallest absolute diagonal entry.
///
/// Returns `f64::INFINITY` when the smallest entry is zero, which happens for
/// the thin plate spline and cubic kernels without smoothing.
pub fn condition_estimate(a: &Mat<f64>) -> f64 {
    let n = a.nrows().min(a.ncols());
    if n == 0 {
        return 1.0;
    }
    let (mut min_d, mut max_d) = (f64::INFINITY, 0.0f64);
    for i in 0..n {
        let d = a[(i, i)].abs();
        min_d = min_d.min(d);
        max_d = max_d.max(d);
    }
    if min_d == 0.0 {
        f64::INFINITY
    } else {
        max_d / min_d
    }
}

/// Maps the mean absolute second difference of `values` (in sequence order)
/// to `exp(-10 * mean)`.
///
/// Sequences shorter than three values score `1.0`.
pub fn smoothness_score(values: &[f64]) -> f64 {
    if values.len() < 3 {
        return 1.0;
    }
    let total: f64 = values
        .windows(3)
        .map(|w| (w[2] - 2.0 * w[1] + w[0]).abs())
        .sum();
    let avg_variation = total / (values.len() - 2) as f64;
    (-10.0 * avg_variation).exp()
}

/// Composite quality score in `[0, 1]`.
pub fn quality_score(
    residual: f64,
    condition: f64,
    smoothness: f64,
    thresholds: &QualityThresholds,
) -> f64 {
    let mut score = 1.0;

    if residual > thresholds.residual_high {
        score -= thresholds.residual_high_penalty;
    } else if residual > thresholds.residual_medium {
        score -= thresholds.residual_medium_penalty;
    }

    if condition > thresholds.condition_high {
        score -= thresholds.condition_high_penalty;
    } else if condition > thresholds.condition_medium {
        score -= thresholds.condition_medium_penalty;
    }

    (score * smoothness).max(0.0)
}

/// `floor(bounding box volume / mesh_size^3)` over the query points.
pub fn estimated_elements(queries: &Mat<f64>, mesh_size: f64) -> u64 {
    if queries.nrows() == 0 || queries.ncols() == 0 {
        return 0;
    }
    let dims = queries.ncols();
    let extents = get_pointarray_extents(queries);
    let volume: f64 = (0..dims).map(|d| extents[d + dims] - extents[d]).product();
    (volume / mesh_size.powi(3)).floor() as u64
}

pub fn complexity(estimated_elements: u64, thresholds: &QualityThresholds) -> Complexity {
    let elements = estimated_elements as f64;
    if elements > thresholds.complexity_high {
        Complexity::High
    } else if elements > thresholds.complexity_medium {
        Complexity::Medium
    } else {
        Complexity::Low
    }
}

/// A field is mesh ready when its quality score and element count are within
/// limits and the target mesh size sits inside the supported window.
pub fn mesh_readiness(
    quality_score: f64,
    estimated_elements: u64,
    mesh: &MeshCompatibility,
    thresholds: &QualityThresholds,
) -> bool {
    quality_score >= mesh.quality_threshold
        && estimated_elements <= mesh.max_elements as u64
        && (thresholds.mesh_size_min..=thresholds.mesh_size_max).contains(&mesh.target_mesh_size)
}

/// Flags interior query points (all but the first and last) with a steep
/// local gradient, a jump to either neighbour, or low confidence.
///
/// Neighbours are taken in array order, so the result is only meaningful
/// for query points laid out along lines or scan rows.
pub fn critical_regions(
    queries: &Mat<f64>,
    values: &[f64],
    confidence: &[f64],
    thresholds: &QualityThresholds,
) -> CriticalRegions {
    let mut regions = CriticalRegions::default();
    let m = values.len().min(queries.nrows());
    if m < 3 {
        return regions;
    }

    for i in 1..m - 1 {
        let point = Point3D::from_row(queries.row(i));

        let dv = (values[i + 1] - values[i - 1]).abs();
        let dp = get_distance(queries.row(i + 1), queries.row(i - 1));
        if dp > 0.0 && dv / dp > thresholds.gradient {
            regions.high_gradient_areas.push(point);
        }

        let backward = (values[i] - values[i - 1]).abs();
        let forward = (values[i + 1] - values[i]).abs();
        if backward > thresholds.discontinuity || forward > thresholds.discontinuity {
            regions.discontinuities.push(point);
        }

        if confidence.get(i).is_some_and(|&c| c < thresholds.low_confidence) {
            regions.low_confidence_zones.push(point);
        }
    }

    regions
}
