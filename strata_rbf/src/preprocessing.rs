/////////////////////////////////////////////////////////////////////////////////////////////
//
// Validates, deduplicates and thins control points ahead of system assembly.
//
// Created on: 18 Oct 2026     Author: Daniel Owen
//
// Copyright (c) 2025, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

//! Validates, deduplicates and thins control points ahead of system assembly.
use crate::{
    error::{RBFError, RBFResult},
    progress::{ProgressMsg, ProgressSink, emit},
};
use faer::Mat;
use std::{collections::HashSet, sync::Arc};
use strata_rbf_utils::select_mat_rows;

/// Number of decimal places kept in the deduplication key.
const DEDUP_DECIMALS: i32 = 6;

/// Control points and values that survived preprocessing.
#[derive(Debug, Clone)]
pub struct PreparedPoints {
    /// `n x 3` control point coordinates.
    pub points: Mat<f64>,

    /// `n x 1` control values, paired by row with `points`.
    pub values: Mat<f64>,

    /// Number of rows dropped as duplicates.
    pub duplicates_removed: usize,
}

/// Checks that points and values pair up and that there is something to fit.
///
/// A length mismatch is reported ahead of an empty input.
pub fn validate_inputs(points: &Mat<f64>, values: &Mat<f64>) -> RBFResult<()> {
    if points.nrows() != values.nrows() {
        return Err(RBFError::InputMismatch {
            points: points.nrows(),
            values: values.nrows(),
        });
    }
    if points.nrows() == 0 {
        return Err(RBFError::InsufficientData);
    }
    Ok(())
}

/// Coordinates rounded to a fixed number of decimals, usable as a hash key.
#[inline]
fn dedup_key(points: &Mat<f64>, row: usize) -> [i64; 3] {
    let scale = 10f64.powi(DEDUP_DECIMALS);
    let mut key = [0i64; 3];
    for (col, k) in key.iter_mut().enumerate().take(points.ncols()) {
        *k = (points[(row, col)] * scale).round() as i64;
    }
    key
}

/// Returns the indices of the first occurrence of every distinct point,
/// in input order.
pub fn unique_indices(points: &Mat<f64>) -> Vec<usize> {
    let mut seen = HashSet::with_capacity(points.nrows());
    (0..points.nrows())
        .filter(|&i| seen.insert(dedup_key(points, i)))
        .collect()
}

/// Thins `indices` to at most `max_points` entries by keeping every
/// `ceil(n / max_points)`-th entry.
pub fn stride_sample(indices: &[usize], max_points: usize) -> Vec<usize> {
    let n = indices.len();
    if n <= max_points || max_points == 0 {
        return indices.to_vec();
    }
    let step = n.div_ceil(max_points);
    indices
        .iter()
        .step_by(step)
        .take(max_points)
        .copied()
        .collect()
}

/// Validates, deduplicates and caps the control points.
///
/// Pairing between points and values is preserved throughout. Emits
/// [`ProgressMsg::DuplicatesRemoved`] and [`ProgressMsg::PointsSubsampled`]
/// when the corresponding step changes the data.
pub fn prepare_points(
    points: &Mat<f64>,
    values: &Mat<f64>,
    max_points: usize,
    progress_callback: &Option<Arc<dyn ProgressSink>>,
) -> RBFResult<PreparedPoints> {
    validate_inputs(points, values)?;

    let unique = unique_indices(points);
    let duplicates_removed = points.nrows() - unique.len();
    if duplicates_removed > 0 {
        log::debug!("removed {} duplicate control points", duplicates_removed);
        emit(
            progress_callback,
            ProgressMsg::DuplicatesRemoved {
                num_duplicates: duplicates_removed,
            },
        );
    }

    let kept = stride_sample(&unique, max_points);
    if kept.len() < unique.len() {
        log::debug!(
            "subsampled control points from {} to {}",
            unique.len(),
            kept.len()
        );
        emit(
            progress_callback,
            ProgressMsg::PointsSubsampled {
                from: unique.len(),
                to: kept.len(),
            },
        );
    }

    if kept.len() == points.nrows() {
        return Ok(PreparedPoints {
            points: points.clone(),
            values: values.clone(),
            duplicates_removed,
        });
    }

    Ok(PreparedPoints {
        points: select_mat_rows(points, &kept),
        values: select_mat_rows(values, &kept),
        duplicates_removed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::CollectingSink;
    use faer::mat;

    #[test]
    fn mismatch_is_reported_before_emptiness() {
        let points = Mat::<f64>::zeros(0, 3);
        let values = Mat::<f64>::zeros(2, 1);
        assert_eq!(
            validate_inputs(&points, &values),
            Err(RBFError::InputMismatch { points: 0, values: 2 })
        );
        assert_eq!(
            validate_inputs(&points, &Mat::<f64>::zeros(0, 1)),
            Err(RBFError::InsufficientData)
        );
    }

    #[test]
    fn duplicates_keep_first_occurrence() {
        let points = mat![
            [0.0, 0.0, 0.0],
            [1.0, 2.0, 3.0],
            [0.0000001, 0.0, 0.0],
            [1.0, 2.0, 3.0000004],
            [5.0, 5.0, 5.0f64],
        ];
        let values = mat![[1.0], [2.0], [10.0], [20.0], [3.0f64]];

        let sink = Arc::new(CollectingSink::new());
        let callback: Option<Arc<dyn ProgressSink>> = Some(sink.clone());
        let prepared = prepare_points(&points, &values, 10_000, &callback).unwrap();

        assert_eq!(prepared.duplicates_removed, 2);
        assert_eq!(prepared.points.nrows(), 3);
        assert_eq!(prepared.values, mat![[1.0], [2.0], [3.0f64]]);
        assert_eq!(
            sink.messages(),
            vec![ProgressMsg::DuplicatesRemoved { num_duplicates: 2 }]
        );
    }

    #[test]
    fn points_differing_at_sixth_decimal_are_distinct() {
        let points = mat![[0.0, 0.0, 0.0], [0.00001, 0.0, 0.0f64]];
        assert_eq!(unique_indices(&points), vec![0, 1]);
    }

    #[test]
    fn stride_sampling_preserves_order_and_cap() {
        let indices: Vec<usize> = (0..25).collect();
        let kept = stride_sample(&indices, 10);
        // step = ceil(25 / 10) = 3
        assert_eq!(kept, vec![0, 3, 6, 9, 12, 15, 18, 21, 24]);

        let kept = stride_sample(&indices, 5);
        assert_eq!(kept, vec![0, 5, 10, 15, 20]);

        assert_eq!(stride_sample(&indices, 25), indices);
    }

    #[test]
    fn subsampling_keeps_values_paired() {
        let n = 12;
        let points = Mat::from_fn(n, 3, |i, j| (i * 3 + j) as f64);
        let values = Mat::from_fn(n, 1, |i, _| i as f64 * 10.0);
        let prepared = prepare_points(&points, &values, 4, &None).unwrap();

        assert_eq!(prepared.points.nrows(), 4);
        for i in 0..prepared.points.nrows() {
            let original_row = prepared.points[(i, 0)] as usize / 3;
            assert_eq!(prepared.values[(i, 0)], original_row as f64 * 10.0);
        }
    }
}
