/////////////////////////////////////////////////////////////////////////////////////////////
//
// Implements the concrete RBF kernel functions and their effective evaluation radii.
//
// Created on: 18 Oct 2026     Author: Daniel Owen
//
// Copyright (c) 2025, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

use crate::{
    KernelFromParams, KernelParams, RadialKernel,
    constants::{
        CORNER_PRESERVATION_LIMIT, CUBIC_RADIUS_FACTOR, GAUSSIAN_RADIUS_FACTOR,
        INVERSE_MULTIQUADRIC_RADIUS_FACTOR, MULTIQUADRIC_RADIUS_FACTOR,
        THIN_PLATE_SPLINE_RADIUS_FACTOR,
    },
};

/// Multiquadric RBF kernel with `phi(r) = sqrt(1 + (eps r / h)^2)`.
///
/// When a smoothness control `s` is set the value is scaled by
/// `1 + s exp(-(r / h)^2)`.
#[derive(Clone, Debug, Copy)]
pub struct MultiquadricRbfKernel {
    pub shape: f64,
    pub mesh_size: f64,
    pub smoothness_control: Option<f64>,
}

impl RadialKernel for MultiquadricRbfKernel {
    #[inline(always)]
    fn phi(&self, r: f64) -> f64 {
        let q = self.shape * r / self.mesh_size;
        let base = (1.0 + q * q).sqrt();
        match self.smoothness_control {
            Some(s) => {
                let t = r / self.mesh_size;
                base * (1.0 + s * (-(t * t)).exp())
            }
            None => base,
        }
    }

    #[inline(always)]
    fn effective_radius(&self) -> f64 {
        MULTIQUADRIC_RADIUS_FACTOR / self.shape * self.mesh_size
    }
}

impl KernelFromParams for MultiquadricRbfKernel {
    #[inline(always)]
    fn from_params(p: &KernelParams) -> Self {
        Self {
            shape: p.shape,
            mesh_size: p.mesh_size,
            smoothness_control: p.smoothness_control,
        }
    }
}

/// Inverse multiquadric RBF kernel with `phi(r) = 1 / sqrt(1 + (eps r / h)^2)`.
#[derive(Clone, Debug, Copy)]
pub struct InverseMultiquadricRbfKernel {
    pub shape: f64,
    pub mesh_size: f64,
}

impl RadialKernel for InverseMultiquadricRbfKernel {
    #[inline(always)]
    fn phi(&self, r: f64) -> f64 {
        let q = self.shape * r / self.mesh_size;
        1.0 / (1.0 + q * q).sqrt()
    }

    #[inline(always)]
    fn effective_radius(&self) -> f64 {
        INVERSE_MULTIQUADRIC_RADIUS_FACTOR / self.shape * self.mesh_size
    }
}

impl KernelFromParams for InverseMultiquadricRbfKernel {
    #[inline(always)]
    fn from_params(p: &KernelParams) -> Self {
        Self {
            shape: p.shape,
            mesh_size: p.mesh_size,
        }
    }
}

/// Gaussian RBF kernel with `phi(r) = exp(-(eps r / h)^2)`.
#[derive(Clone, Debug, Copy)]
pub struct GaussianRbfKernel {
    pub shape: f64,
    pub mesh_size: f64,
}

impl RadialKernel for GaussianRbfKernel {
    #[inline(always)]
    fn phi(&self, r: f64) -> f64 {
        let q = self.shape * r / self.mesh_size;
        (-(q * q)).exp()
    }

    #[inline(always)]
    fn effective_radius(&self) -> f64 {
        GAUSSIAN_RADIUS_FACTOR / self.shape * self.mesh_size
    }
}

impl KernelFromParams for GaussianRbfKernel {
    #[inline(always)]
    fn from_params(p: &KernelParams) -> Self {
        Self {
            shape: p.shape,
            mesh_size: p.mesh_size,
        }
    }
}

/// Thin plate spline RBF kernel with `phi(r) = (r / h)^2 ln(r / h)`.
///
/// Corner preservation boosts the response close to the centre
/// (`r / h < 0.1`) by `1 + 2 exp(-10 r / h)`. Otherwise adaptive refinement,
/// if enabled, scales by `1 + 0.5 exp(-r / h)`. The two never combine.
#[derive(Clone, Debug, Copy)]
pub struct ThinPlateSplineRbfKernel {
    pub mesh_size: f64,
    pub corner_preservation: bool,
    pub adaptive_refinement: bool,
}

impl RadialKernel for ThinPlateSplineRbfKernel {
    #[inline(always)]
    fn phi(&self, r: f64) -> f64 {
        if r.abs() < f64::EPSILON {
            return 0.0;
        }

        let t = r / self.mesh_size;
        let base = t.powi(2) * t.ln();

        if self.corner_preservation && t < CORNER_PRESERVATION_LIMIT {
            base * (1.0 + 2.0 * (-10.0 * t).exp())
        } else if self.adaptive_refinement {
            base * (1.0 + 0.5 * (-t).exp())
        } else {
            base
        }
    }

    #[inline(always)]
    fn effective_radius(&self) -> f64 {
        THIN_PLATE_SPLINE_RADIUS_FACTOR * self.mesh_size
    }
}

impl KernelFromParams for ThinPlateSplineRbfKernel {
    #[inline(always)]
    fn from_params(p: &KernelParams) -> Self {
        Self {
            mesh_size: p.mesh_size,
            corner_preservation: p.corner_preservation,
            adaptive_refinement: p.adaptive_refinement,
        }
    }
}

/// Cubic RBF kernel with `phi(r) = (r / h)^3`.
#[derive(Clone, Debug, Copy)]
pub struct CubicRbfKernel {
    pub mesh_size: f64,
}

impl RadialKernel for CubicRbfKernel {
    #[inline(always)]
    fn phi(&self, r: f64) -> f64 {
        (r / self.mesh_size).powi(3)
    }

    #[inline(always)]
    fn effective_radius(&self) -> f64 {
        CUBIC_RADIUS_FACTOR * self.mesh_size
    }
}

impl KernelFromParams for CubicRbfKernel {
    #[inline(always)]
    fn from_params(p: &KernelParams) -> Self {
        Self {
            mesh_size: p.mesh_size,
        }
    }
}
