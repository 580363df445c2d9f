/////////////////////////////////////////////////////////////////////////////////////////////
//
// Provides parameter and builder types for configuring RBF kernels.
//
// Created on: 18 Oct 2026     Author: Daniel Owen
//
// Copyright (c) 2025, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

use serde::{Deserialize, Serialize};
use crate::{constants::DEFAULT_MESH_SIZE, utils::KernelType};

/// Defines the [`KernelType`] to use, along with the parameters each
/// kernel variant reads.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct KernelParams {
    /// KernelType enum variant to use.
    pub kernel_type: KernelType,

    /// Shape parameter `eps`. Larger values sharpen the kernel and shrink its
    /// effective radius. Ignored by the thin plate spline and cubic kernels.
    pub shape: f64,

    /// Target mesh size `h`. All distances are measured in units of `h`.
    pub mesh_size: f64,

    /// Optional smoothness factor for the multiquadric kernel.
    pub smoothness_control: Option<f64>,

    /// Boost the thin plate spline response very close to each centre.
    pub corner_preservation: bool,

    /// Scale the thin plate spline by a decaying refinement factor.
    pub adaptive_refinement: bool,
}

impl KernelParams {
    /// Begins building a [`KernelParams`] instance for the given kernel type.
    pub fn builder(kernel_type: KernelType) -> KernelParamsBuilder {
        KernelParamsBuilder {
            kernel_type,
            shape: 1.0,
            mesh_size: DEFAULT_MESH_SIZE,
            smoothness_control: None,
            corner_preservation: false,
            adaptive_refinement: false,
        }
    }
}

/// Builder for [`KernelParams`] that provides sensible defaults.
#[derive(Debug, Clone, Copy)]
pub struct KernelParamsBuilder {
    kernel_type: KernelType,
    shape: f64,
    mesh_size: f64,
    smoothness_control: Option<f64>,
    corner_preservation: bool,
    adaptive_refinement: bool,
}

impl KernelParamsBuilder {
    /// Sets the `shape` parameter on the builder.
    pub fn shape(mut self, v: f64) -> Self {
        self.shape = v;
        self
    }

    /// Sets the `mesh_size` parameter on the builder.
    pub fn mesh_size(mut self, v: f64) -> Self {
        self.mesh_size = v;
        self
    }

    /// Sets the multiquadric smoothness factor.
    pub fn smoothness_control(mut self, v: Option<f64>) -> Self {
        self.smoothness_control = v;
        self
    }

    /// Enables or disables thin plate spline corner preservation.
    pub fn corner_preservation(mut self, v: bool) -> Self {
        self.corner_preservation = v;
        self
    }

    /// Enables or disables thin plate spline adaptive refinement.
    pub fn adaptive_refinement(mut self, v: bool) -> Self {
        self.adaptive_refinement = v;
        self
    }

    /// Finalises the builder into a [`KernelParams`] value.
    pub fn build(self) -> KernelParams {
        assert!(self.shape > 0.0);
        assert!(self.mesh_size > 0.0);
        KernelParams {
            kernel_type: self.kernel_type,
            shape: self.shape,
            mesh_size: self.mesh_size,
            smoothness_control: self.smoothness_control,
            corner_preservation: self.corner_preservation,
            adaptive_refinement: self.adaptive_refinement,
        }
    }
}
