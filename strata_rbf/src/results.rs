/////////////////////////////////////////////////////////////////////////////////////////////
//
// Declares the interpolation result types and their versioned JSON persistence.
//
// Created on: 18 Oct 2026     Author: Daniel Owen
//
// Copyright (c) 2025, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

//! Result types returned by [`crate::RBFInterpolator::interpolate`].
use crate::{common::Point3D, error::ResultIOError, iterative_solvers::Termination};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::{
    fs::File,
    io::{BufReader, BufWriter, Write},
    path::Path,
};

/// Coarse cost bucket for the downstream mesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Complexity {
    Low,
    Medium,
    High,
}

/// Mesh-readiness verdict and the numbers it was derived from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QualityMetrics {
    pub mesh_readiness: bool,
    pub expected_mesh_size: f64,
    pub estimated_elements: u64,
    /// Composite score in `[0, 1]`.
    pub quality_score: f64,
    pub complexity: Complexity,
}

/// Query points flagged by the quality assessment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CriticalRegions {
    pub high_gradient_areas: Vec<Point3D>,
    pub discontinuities: Vec<Point3D>,
    pub low_confidence_zones: Vec<Point3D>,
}

/// Which linear solver produced the weights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SolveMethod {
    Direct,
    ConjugateGradient,
}

/// How the weight solve went.
///
/// A conjugate gradient solve that stops on a degenerate search direction or
/// at the iteration cap still produces a result; `termination` is the only
/// place that is visible.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SolveReport {
    pub method: SolveMethod,
    pub iterations: usize,
    pub residual_norm: f64,
    pub termination: Termination,
}

/// Everything returned by a single interpolation call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterpolationResult {
    /// Interpolated value at each query point, in query order.
    pub values: Vec<f64>,

    /// Per-point confidence, currently constant.
    pub confidence: Vec<f64>,

    /// RMSE of the fitted field at the control points.
    pub residual: f64,

    /// Ratio of largest to smallest absolute diagonal entry. Infinite values
    /// are written as `null`.
    #[serde(serialize_with = "serialize_condition", deserialize_with = "deserialize_condition")]
    pub condition: f64,

    /// Wall-clock time of the call in milliseconds.
    pub execution_time: f64,

    pub quality_metrics: QualityMetrics,
    pub critical_regions: CriticalRegions,

    pub solver: SolveReport,

    /// Control points that entered the solve after deduplication and sampling.
    pub points_used: usize,
    pub duplicates_removed: usize,
}

fn serialize_condition<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if value.is_finite() {
        serializer.serialize_some(value)
    } else {
        serializer.serialize_none()
    }
}

fn deserialize_condition<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::INFINITY))
}

const JSON_FORMAT_NAME: &str = "strata_rbf.json";
const JSON_VERSION: u32 = 1;

/// Borrowing envelope for SAVE (no clone of the result).
#[derive(Serialize)]
struct JsonEnvelopeRef<'a, T: ?Sized> {
    format: &'static str,
    version: u32,
    #[serde(flatten)]
    result: &'a T,
}

/// Owning envelope for LOAD.
#[derive(Deserialize)]
struct JsonEnvelopeOwned<T> {
    format: String,
    version: u32,
    #[serde(flatten)]
    result: T,
}

type ResultIOResult<T> = std::result::Result<T, ResultIOError>;

impl InterpolationResult {
    /// Save the result to a versioned **JSON envelope**.
    ///
    /// ### Errors
    /// - Returns `ResultIOError::{Create, Serialize, Flush}` as appropriate.
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> ResultIOResult<()> {
        let path_ref = path.as_ref();
        let file = File::create(path_ref).map_err(|e| ResultIOError::Create {
            path: path_ref.to_path_buf(),
            source: e,
        })?;
        let mut w = BufWriter::new(file);

        let env = JsonEnvelopeRef {
            format: JSON_FORMAT_NAME,
            version: JSON_VERSION,
            result: self,
        };

        serde_json::to_writer_pretty(&mut w, &env).map_err(|e| ResultIOError::Serialize {
            path: path_ref.to_path_buf(),
            source: e,
        })?;
        w.flush().map_err(|e| ResultIOError::Flush {
            path: path_ref.to_path_buf(),
            source: e,
        })?;
        Ok(())
    }

    /// Load a result from a versioned **JSON envelope**, validating format & version.
    ///
    /// ### Errors
    /// - Returns `ResultIOError::{Open, Parse, FormatMismatch, VersionMismatch}` as appropriate.
    pub fn load_json<P: AsRef<Path>>(path: P) -> ResultIOResult<Self> {
        let path_ref = path.as_ref();

        let file = File::open(path_ref).map_err(|e| ResultIOError::Open {
            path: path_ref.to_path_buf(),
            source: e,
        })?;
        let reader = BufReader::new(file);

        let env: JsonEnvelopeOwned<Self> =
            serde_json::from_reader(reader).map_err(|e| ResultIOError::Parse {
                path: path_ref.to_path_buf(),
                source: e,
            })?;

        if env.format != JSON_FORMAT_NAME {
            return Err(ResultIOError::FormatMismatch {
                path: path_ref.to_path_buf(),
                found: env.format,
                expected: JSON_FORMAT_NAME,
            });
        }

        if env.version != JSON_VERSION {
            return Err(ResultIOError::VersionMismatch {
                path: path_ref.to_path_buf(),
                found: env.version,
                expected: JSON_VERSION,
            });
        }

        Ok(env.result)
    }
}
