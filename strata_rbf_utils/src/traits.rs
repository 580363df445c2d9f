/////////////////////////////////////////////////////////////////////////////////////////////
//
// Declares traits shared by every radial kernel.
//
// Created on: 18 Oct 2026     Author: Daniel Owen 
//
// Copyright (c) 2025, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License. 
//
/////////////////////////////////////////////////////////////////////////////////////////////

use crate::kernel_helpers::KernelParams;
use faer::RowRef;

/// Converts a shared [`KernelParams`] configuration into a concrete kernel type.
pub trait KernelFromParams: Sized {
    /// Constructs `Self` from a set of uniform kernel parameters.
    fn from_params(p: &KernelParams) -> Self;
}

/// A radially symmetric basis function `phi(r)`.
pub trait RadialKernel {
    /// Kernel value at distance `r >= 0`.
    fn phi(&self, r: f64) -> f64;

    /// Distance beyond which contributions are treated as negligible
    /// during evaluation.
    fn effective_radius(&self) -> f64;

    /// Kernel value between two points.
    #[inline(always)]
    fn evaluate(&self, target: RowRef<f64>, source: RowRef<f64>) -> f64 {
        self.phi(crate::get_distance(target, source))
    }
}
