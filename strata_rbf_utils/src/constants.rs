/////////////////////////////////////////////////////////////////////////////////////////////
//
// Defines the scale constants shared by the RBF kernels and their evaluation cut-offs.
//
// Created on: 18 Oct 2026     Author: Daniel Owen 
//
// Copyright (c) 2025, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License. 
//
/////////////////////////////////////////////////////////////////////////////////////////////

/// Default target mesh size used to scale kernel distances.
pub const DEFAULT_MESH_SIZE: f64 = 1.75;

/// Effective radius factors, in units of `mesh_size`.
///
/// Shape-dependent kernels divide their factor by the shape parameter.
pub const MULTIQUADRIC_RADIUS_FACTOR: f64 = 5.0;
pub const INVERSE_MULTIQUADRIC_RADIUS_FACTOR: f64 = 4.0;
pub const GAUSSIAN_RADIUS_FACTOR: f64 = 3.0;
pub const THIN_PLATE_SPLINE_RADIUS_FACTOR: f64 = 8.0;
pub const CUBIC_RADIUS_FACTOR: f64 = 6.0;

/// Below this scaled distance the thin plate spline corner adjustment applies.
pub const CORNER_PRESERVATION_LIMIT: f64 = 0.1;
