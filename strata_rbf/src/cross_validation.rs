/////////////////////////////////////////////////////////////////////////////////////////////
//
// Implements contiguous k-fold cross-validation of the interpolation pipeline.
//
// Created on: 18 Oct 2026     Author: Daniel Owen
//
// Copyright (c) 2025, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

//! Contiguous k-fold cross-validation.
//!
//! Folds are contiguous blocks of `floor(n / k)` control points in input
//! order; the final fold also takes the remainder. Errors are pooled over
//! every held-out prediction rather than averaged per fold.

use crate::{
    error::{RBFError, RBFResult},
    progress::{ProgressMsg, ProgressSink, emit},
};
use faer::Mat;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use strata_rbf_utils::select_mat_rows;

/// Pooled error statistics over all held-out predictions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrossValidationReport {
    pub mean_error: f64,
    pub rmse: f64,
    pub max_error: f64,
    /// `1 - SS_res / SS_tot` over the pooled predictions.
    pub r2: f64,
    /// Mean absolute error of each fold, in fold order.
    pub cross_validation_scores: Vec<f64>,
}

/// Half-open `[start, end)` test ranges for `folds` contiguous folds.
///
/// # Errors
/// [`RBFError::InvalidFolds`] unless `2 <= folds <= n`.
pub fn fold_bounds(n: usize, folds: usize) -> RBFResult<Vec<(usize, usize)>> {
    if folds < 2 || folds > n {
        return Err(RBFError::InvalidFolds { folds, points: n });
    }
    let fold_size = n / folds;
    Ok((0..folds)
        .map(|fold| {
            let start = fold * fold_size;
            let end = if fold == folds - 1 { n } else { start + fold_size };
            (start, end)
        })
        .collect())
}

/// Runs cross-validation with a caller supplied fit-and-predict step.
///
/// `fit_predict(train_points, train_values, test_points)` receives the
/// training rows by value and must return one prediction per test point.
pub(crate) fn run_folds<F>(
    points: &Mat<f64>,
    values: &Mat<f64>,
    folds: usize,
    mut fit_predict: F,
    callback: &Option<Arc<dyn ProgressSink>>,
) -> RBFResult<CrossValidationReport>
where
    F: FnMut(Mat<f64>, Mat<f64>, &Mat<f64>) -> RBFResult<Mat<f64>>,
{
    let n = points.nrows();
    let bounds = fold_bounds(n, folds)?;

    let mut actual = Vec::with_capacity(n);
    let mut predicted = Vec::with_capacity(n);
    let mut scores = Vec::with_capacity(folds);

    for (fold, &(start, end)) in bounds.iter().enumerate() {
        let train_idx: Vec<usize> = (0..start).chain(end..n).collect();
        let test_idx: Vec<usize> = (start..end).collect();

        let train_points = select_mat_rows(points, &train_idx);
        let train_values = select_mat_rows(values, &train_idx);
        let test_points = select_mat_rows(points, &test_idx);

        let prediction = fit_predict(train_points, train_values, &test_points)?;

        let mut fold_abs = 0.0;
        for (k, &i) in test_idx.iter().enumerate() {
            let p = prediction[(k, 0)];
            let a = values[(i, 0)];
            fold_abs += (p - a).abs();
            predicted.push(p);
            actual.push(a);
        }
        let fold_error = fold_abs / test_idx.len() as f64;
        scores.push(fold_error);

        log::debug!("fold {}/{}: mean absolute error {:e}", fold + 1, folds, fold_error);
        emit(
            callback,
            ProgressMsg::CrossValidationFold {
                fold: fold + 1,
                folds,
                error: fold_error,
            },
        );
    }

    Ok(pooled_report(&actual, &predicted, scores))
}

fn pooled_report(actual: &[f64], predicted: &[f64], scores: Vec<f64>) -> CrossValidationReport {
    let m = actual.len() as f64;

    let (mut abs_sum, mut sq_sum, mut max_error) = (0.0, 0.0, 0.0f64);
    for (a, p) in actual.iter().zip(predicted) {
        let e = (p - a).abs();
        abs_sum += e;
        sq_sum += e * e;
        max_error = max_error.max(e);
    }

    let mean_actual = actual.iter().sum::<f64>() / m;
    let ss_tot: f64 = actual.iter().map(|a| (a - mean_actual).powi(2)).sum();
    let r2 = if ss_tot > 0.0 {
        1.0 - sq_sum / ss_tot
    } else if sq_sum == 0.0 {
        1.0
    } else {
        0.0
    };

    CrossValidationReport {
        mean_error: abs_sum / m,
        rmse: (sq_sum / m).sqrt(),
        max_error,
        r2,
        cross_validation_scores: scores,
    }
}
