/////////////////////////////////////////////////////////////////////////////////////////////
//
// Declares the error types returned by interpolation, cross-validation and result I/O.
//
// Created on: 18 Oct 2026     Author: Daniel Owen
//
// Copyright (c) 2025, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

//! Error types for the interpolation pipeline and its file I/O helpers.
use std::{io, path::PathBuf};
use thiserror::Error;

/// Shorthand for results produced by the interpolation pipeline.
pub type RBFResult<T> = std::result::Result<T, RBFError>;

/// Errors raised while fitting or validating an RBF interpolant.
///
/// None of these are retried internally; they abort the call that raised them.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RBFError {
    /// The point and value arrays differ in length.
    #[error("input mismatch: {points} control points but {values} values")]
    InputMismatch { points: usize, values: usize },

    /// No control points were supplied.
    #[error("insufficient data: at least one control point is required")]
    InsufficientData,

    /// The direct solver met a pivot smaller than the configured tolerance.
    #[error("singular system: pivot {pivot:e} in column {column} is below tolerance {tolerance:e}")]
    SingularSystem {
        column: usize,
        pivot: f64,
        tolerance: f64,
    },

    /// The requested fold count cannot partition the control points.
    #[error("invalid fold count {folds} for {points} control points (need 2 <= folds <= points)")]
    InvalidFolds { folds: usize, points: usize },

    /// A configuration value is outside its valid range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Errors that can occur when reading or writing control points and results.
#[derive(Debug, Error)]
pub enum ResultIOError {
    /// Failed to create the target file before writing.
    #[error("creating {}: {source}", .path.display())]
    Create { path: PathBuf, source: io::Error },

    /// Failed to open an existing file for reading.
    #[error("opening {}: {source}", .path.display())]
    Open { path: PathBuf, source: io::Error },

    /// Failed to flush buffered output when finishing a write.
    #[error("flushing {}: {source}", .path.display())]
    Flush { path: PathBuf, source: io::Error },

    /// Error serializing a result to JSON.
    #[error("serializing JSON to {}: {source}", .path.display())]
    Serialize {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// Error parsing JSON when reading a result from disk.
    #[error("parsing JSON in {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// Error reading or writing CSV records.
    #[error("CSV error in {}: {source}", .path.display())]
    Csv { path: PathBuf, source: csv::Error },

    /// A CSV record could not be interpreted as `x, y, z, value`.
    #[error("invalid record {record} in {}: {message}", .path.display())]
    InvalidRecord {
        path: PathBuf,
        record: usize,
        message: String,
    },

    /// The JSON `format` field does not match the expected format.
    #[error("unsupported format {found:?} (expected {expected:?}) in {}", .path.display())]
    FormatMismatch {
        path: PathBuf,
        found: String,
        expected: &'static str,
    },

    /// The JSON `version` field does not match the supported version.
    #[error("unsupported version {found} (expected {expected}) in {}", .path.display())]
    VersionMismatch {
        path: PathBuf,
        found: u32,
        expected: u32,
    },
}
