/////////////////////////////////////////////////////////////////////////////////////////////
//
// Defines the point type and shared helpers for point conversion, random points, grids and CSV I/O.
//
// Created on: 18 Oct 2026     Author: Daniel Owen
//
// Copyright (c) 2025, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

use crate::error::ResultIOError;
use csv::{ReaderBuilder, Writer};
use faer::{Mat, MatRef, RowRef};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A point in 3D space.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point3D {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3D {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Reads a point from a matrix row. Missing trailing coordinates are zero.
    #[inline]
    pub fn from_row(row: RowRef<f64>) -> Self {
        let mut coords = row.iter().copied();
        let mut next = || coords.next().unwrap_or(0.0);
        let (x, y, z) = (next(), next(), next());
        Self::new(x, y, z)
    }
}

impl From<[f64; 3]> for Point3D {
    fn from(v: [f64; 3]) -> Self {
        Self::new(v[0], v[1], v[2])
    }
}

/// Converts points to an `n x 3` matrix.
pub fn points_to_mat(points: &[Point3D]) -> Mat<f64> {
    Mat::from_fn(points.len(), 3, |i, j| match j {
        0 => points[i].x,
        1 => points[i].y,
        _ => points[i].z,
    })
}

/// Converts values to an `n x 1` matrix.
pub fn values_to_mat(values: &[f64]) -> Mat<f64> {
    Mat::from_fn(values.len(), 1, |i, _| values[i])
}

/// Converts the rows of a matrix to points.
pub fn mat_to_points(points: &Mat<f64>) -> Vec<Point3D> {
    points.row_iter().map(Point3D::from_row).collect()
}

/// Generate a matrix of random points in the unit hypercube.
///
/// # Parameters
/// - `n`: Number of points to generate (rows in the output matrix).
/// - `d`: Number of spatial dimensions per point (columns in the output matrix).
/// - `seed`: Optional random seed.
///   - If `Some(seed)` is provided, the same sequence of points will be generated
///     deterministically across runs and platforms (useful for reproducible tests).
///   - If `None`, the generator is seeded from the operating system's randomness source.
///
/// # Returns
/// A `Mat<f64>` of shape `(n, d)` where each element lies in `[0.0, 1.0)`.
///
/// # Example
/// ```
/// use strata_rbf::generate_random_points;
///
/// // Generate 100 reproducible 3D points
/// let pts = generate_random_points(100, 3, Some(42));
/// assert_eq!(pts.ncols(), 3);
/// ```
pub fn generate_random_points(n: usize, d: usize, seed: Option<u64>) -> Mat<f64> {
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    Mat::from_fn(n, d, |_, _| rng.random_range(0.0..1.0))
}

/// Create a regular evaluation grid from per-dimension ranges and sample counts.
///
/// The first dimension varies fastest. A dimension with a single sample sits
/// at the start of its range.
///
/// # Arguments
/// * `ranges` - Inclusive `(min, max)` range for each dimension.
/// * `counts` - Number of grid samples per range; must match `ranges.len()`.
///
/// # Returns
/// A `Mat<f64>` with one row per grid point and one column per dimension.
pub fn create_evaluation_grid(ranges: &[(f64, f64)], counts: &[usize]) -> Mat<f64> {
    assert_eq!(ranges.len(), counts.len());

    let total_points: usize = counts.iter().product();
    let num_dimensions = ranges.len();

    Mat::from_fn(total_points, num_dimensions, |row_idx, col_idx| {
        let dim_points = counts[col_idx];
        let (start, end) = ranges[col_idx];
        let step = match dim_points > 1 {
            true => (end - start) / (dim_points as f64 - 1.0),
            false => 0.0,
        };

        let stride = counts[..col_idx].iter().product::<usize>();

        let index_in_dim = (row_idx / stride) % dim_points;
        start + step * index_in_dim as f64
    })
}

/// Load control points from a CSV file with `x, y, z, value` columns.
///
/// # Arguments
/// * `path` - Path to the CSV file.
/// * `has_headers` - Whether the file has a single header row to skip.
///
/// # Returns
/// On success, returns `(points, values)` with shapes `(n, 3)` and `(n, 1)`.
pub fn csv_to_control_points<P: AsRef<Path>>(
    path: P,
    has_headers: bool,
) -> Result<(Mat<f64>, Mat<f64>), ResultIOError> {
    let path_ref = path.as_ref();
    let mut reader = ReaderBuilder::new()
        .has_headers(has_headers)
        .from_path(path_ref)
        .map_err(|e| ResultIOError::Csv {
            path: path_ref.to_path_buf(),
            source: e,
        })?;

    let mut coords = Vec::new();
    let mut values = Vec::new();

    for (record_idx, result) in reader.records().enumerate() {
        let record = result.map_err(|e| ResultIOError::Csv {
            path: path_ref.to_path_buf(),
            source: e,
        })?;

        if record.len() != 4 {
            return Err(ResultIOError::InvalidRecord {
                path: path_ref.to_path_buf(),
                record: record_idx,
                message: format!("expected 4 columns, found {}", record.len()),
            });
        }

        for (i, field) in record.iter().enumerate() {
            let parsed: f64 = field.trim().parse().map_err(|_| ResultIOError::InvalidRecord {
                path: path_ref.to_path_buf(),
                record: record_idx,
                message: format!("column {} is not a number: {:?}", i, field),
            })?;
            if i == 3 {
                values.push(parsed);
            } else {
                coords.push(parsed);
            }
        }
    }

    let num_rows = values.len();
    let points = MatRef::from_row_major_slice(coords.as_slice(), num_rows, 3).to_owned();
    let values = MatRef::from_row_major_slice(values.as_slice(), num_rows, 1).to_owned();

    Ok((points, values))
}

/// Write point coordinates and associated values to a CSV file.
///
/// Each row of `points` is written followed by the corresponding value
/// from `values`, with headers `X, Y, Z, InterpolatedValue`.
///
/// # Errors
/// Returns [`ResultIOError::Csv`] if writing to disk fails.
pub fn write_values_csv<P: AsRef<Path>>(
    points: &Mat<f64>,
    values: &Mat<f64>,
    path: P,
) -> Result<(), ResultIOError> {
    let path_ref = path.as_ref();
    let csv_err = |e: csv::Error| ResultIOError::Csv {
        path: path_ref.to_path_buf(),
        source: e,
    };

    let num_points = points.nrows();
    assert_eq!(num_points, values.nrows(), "Points and values must have same length.");

    let mut wtr = Writer::from_path(path_ref).map_err(csv_err)?;
    wtr.write_record(["X", "Y", "Z", "InterpolatedValue"])
        .map_err(csv_err)?;

    for i in 0..num_points {
        let p = Point3D::from_row(points.row(i));
        wtr.write_record(&[
            p.x.to_string(),
            p.y.to_string(),
            p.z.to_string(),
            values[(i, 0)].to_string(),
        ])
        .map_err(csv_err)?;
    }

    wtr.flush().map_err(|e| ResultIOError::Flush {
        path: path_ref.to_path_buf(),
        source: e,
    })?;
    Ok(())
}
