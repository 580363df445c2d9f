/////////////////////////////////////////////////////////////////////////////////////////////
//
// Re-exports kernel utilities, constants, and helper functions used across the strata_rbf crates.
//
// Created on: 18 Oct 2026     Author: Daniel Owen
//
// Copyright (c) 2025, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

//! # Utilities for the [`strata_rbf`] crate
//!
//! Kernel functions, kernel parameters and dense interpolation matrix
//! assembly shared by the interpolation pipeline.
//!
//! [`strata_rbf`]: https://docs.rs/strata_rbf
mod constants;
mod rbf_kernels;
mod traits;
mod utils;
mod kernel_helpers;

/// Implemented kernels for use in the [`strata_rbf`] crate.
///
/// [`strata_rbf`]: https://docs.rs/strata_rbf
pub mod kernels {
    pub use super::rbf_kernels::*;
}

pub use {
    constants::DEFAULT_MESH_SIZE,
    kernel_helpers::{KernelParams, KernelParamsBuilder},
    utils::{
        Kernel, KernelType, get_a_matrix_symmetric_solver, get_a_matrix_symmetric_solver_typed,
        get_distance, get_pointarray_extents, select_mat_rows,
    },
    traits::{KernelFromParams, RadialKernel},
};
