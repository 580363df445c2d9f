/////////////////////////////////////////////////////////////////////////////////////////////
//
// Specifies kernel, smoothing, sampling and mesh compatibility options for RBF interpolants.
//
// Created on: 18 Oct 2026     Author: Daniel Owen
//
// Copyright (c) 2025, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

//! Specifies kernel, smoothing, sampling and mesh compatibility options for RBF interpolants.
use crate::error::{RBFError, RBFResult};
use serde::{Deserialize, Serialize};
use strata_rbf_utils::{DEFAULT_MESH_SIZE, KernelParams};

pub use strata_rbf_utils::KernelType as RBFKernelType;

/// Targets the downstream mesh generator has to meet.
///
/// ### Default Values
/// - `target_mesh_size`: `1.75`
/// - `quality_threshold`: `0.65`
/// - `max_elements`: `2_000_000`
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct MeshCompatibility {
    /// Target element edge length. Also the distance unit of every kernel.
    pub target_mesh_size: f64,

    /// Minimum quality score for the field to be declared mesh ready.
    pub quality_threshold: f64,

    /// Maximum number of elements the mesher accepts.
    pub max_elements: usize,
}

impl Default for MeshCompatibility {
    fn default() -> Self {
        Self {
            target_mesh_size: DEFAULT_MESH_SIZE,
            quality_threshold: 0.65,
            max_elements: 2_000_000,
        }
    }
}

/// Kernel shaping options.
///
/// `corner_preservation` and `adaptive_refinement` only affect the thin plate
/// spline kernel; `smoothness_control` only affects the multiquadric kernel.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct OptimizationSettings {
    pub adaptive_refinement: bool,
    pub corner_preservation: bool,
    pub smoothness_control: Option<f64>,
}

#[doc = include_str!("../docs/rbf_config.md")]
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct RBFConfig {
    /// The RBF kernel to use for interpolation.
    pub kernel: RBFKernelType,

    /// Kernel shape parameter. Must be positive.
    pub shape: f64,

    /// Smoothing added to the diagonal of the system matrix. A value of `0.0`
    /// enforces an exact fit to the control values.
    pub smooth: f64,

    /// Maximum number of control points kept after deduplication.
    pub max_points: usize,

    /// Minimum pivot magnitude accepted by the direct solver.
    pub tolerance: f64,

    /// Mesh targets used by the quality assessment.
    pub mesh_compatibility: MeshCompatibility,

    /// Kernel shaping options.
    pub optimization: OptimizationSettings,
}

impl Default for RBFConfig {
    fn default() -> Self {
        RBFConfigBuilder::new(RBFKernelType::default()).build()
    }
}

impl RBFConfig {
    /// Returns a new [`RBFConfigBuilder`] for the given kernel type.
    pub fn builder(kernel: RBFKernelType) -> RBFConfigBuilder {
        RBFConfigBuilder::new(kernel)
    }

    /// Parses a (possibly partial) JSON configuration. Missing fields keep
    /// their defaults.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Checks that every numeric field is inside its valid range.
    pub fn validate(&self) -> RBFResult<()> {
        if !(self.shape > 0.0 && self.shape.is_finite()) {
            return Err(RBFError::InvalidConfig(format!(
                "shape must be positive, got {}",
                self.shape
            )));
        }
        if !(self.smooth >= 0.0) {
            return Err(RBFError::InvalidConfig(format!(
                "smooth must be non-negative, got {}",
                self.smooth
            )));
        }
        if self.max_points == 0 {
            return Err(RBFError::InvalidConfig("maxPoints must be at least 1".into()));
        }
        if !(self.tolerance > 0.0) {
            return Err(RBFError::InvalidConfig(format!(
                "tolerance must be positive, got {}",
                self.tolerance
            )));
        }
        let mesh_size = self.mesh_compatibility.target_mesh_size;
        if !(mesh_size > 0.0 && mesh_size.is_finite()) {
            return Err(RBFError::InvalidConfig(format!(
                "targetMeshSize must be positive, got {}",
                mesh_size
            )));
        }
        Ok(())
    }
}

/// A convenience builder for constructing a [`RBFConfig`] instance.
///
/// The builder should be called via the [`RBFConfig::builder`] method.
///
/// See [`RBFConfig`] for details on each field.
#[derive(Debug, Clone, Copy)]
pub struct RBFConfigBuilder {
    pub kernel: RBFKernelType,
    pub shape: f64,
    pub smooth: f64,
    pub max_points: usize,
    pub tolerance: f64,
    pub mesh_compatibility: MeshCompatibility,
    pub optimization: OptimizationSettings,
}

impl RBFConfigBuilder {
    /// Creates a new instance of the [`RBFConfigBuilder`].
    fn new(kernel: RBFKernelType) -> Self {
        Self {
            kernel,
            shape: 1.0,
            smooth: 0.0,
            max_points: 10_000,
            tolerance: 1E-10,
            mesh_compatibility: MeshCompatibility::default(),
            optimization: OptimizationSettings::default(),
        }
    }

    /// Sets the shape parameter.
    pub fn shape(mut self, shape: f64) -> Self {
        self.shape = shape;
        self
    }

    /// Sets the smoothing value.
    pub fn smooth(mut self, smooth: f64) -> Self {
        self.smooth = smooth;
        self
    }

    /// Sets the control point cap.
    pub fn max_points(mut self, max_points: usize) -> Self {
        self.max_points = max_points;
        self
    }

    /// Sets the direct solver pivot tolerance.
    pub fn tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn mesh_compatibility(mut self, mesh_compatibility: MeshCompatibility) -> Self {
        self.mesh_compatibility = mesh_compatibility;
        self
    }

    pub fn optimization(mut self, optimization: OptimizationSettings) -> Self {
        self.optimization = optimization;
        self
    }

    /// Builds and returns an instance of [`RBFConfig`] from the values
    /// defined in the builder.
    pub fn build(self) -> RBFConfig {
        RBFConfig {
            kernel: self.kernel,
            shape: self.shape,
            smooth: self.smooth,
            max_points: self.max_points,
            tolerance: self.tolerance,
            mesh_compatibility: self.mesh_compatibility,
            optimization: self.optimization,
        }
    }
}

impl From<&RBFConfig> for KernelParams {
    /// Converts a [`RBFConfig`] into a [`strata_rbf_utils::KernelParams`].
    ///
    /// The configuration must have passed [`RBFConfig::validate`].
    fn from(v: &RBFConfig) -> Self {
        KernelParams::builder(v.kernel)
            .shape(v.shape)
            .mesh_size(v.mesh_compatibility.target_mesh_size)
            .smoothness_control(v.optimization.smoothness_control)
            .corner_preservation(v.optimization.corner_preservation)
            .adaptive_refinement(v.optimization.adaptive_refinement)
            .build()
    }
}
