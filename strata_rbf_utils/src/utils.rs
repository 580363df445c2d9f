/////////////////////////////////////////////////////////////////////////////////////////////
//
// Supplies general-purpose utilities for matrices, distances, kernel dispatch and assembly.
//
// Created on: 18 Oct 2026     Author: Daniel Owen
//
// Copyright (c) 2025, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

use crate::{KernelFromParams, KernelParams, RadialKernel};
use faer::{Mat, RowRef};
use serde::{Deserialize, Deserializer, Serialize};

/// Returns an owned `Mat<T>` from a subset of row indices.
///
/// # Examples
///
/// ```
/// use faer::mat;
/// use strata_rbf_utils::select_mat_rows;
///
/// let matrix = mat![
///     [0.0, 1.0],
///     [1.0, 1.0],
///     [2.0, 2.0],
///     [3.0, 3.0f64],
/// ];
///
/// let wanted_rows = vec![0usize, 2];
///
/// let sub_matrix = select_mat_rows(&matrix, &wanted_rows);
///
/// assert_eq!(
///     sub_matrix,
///     mat![
///         [0.0, 1.0],
///         [2.0, 2.0f64],
///     ]
/// );
/// ```
#[inline(always)]
pub fn select_mat_rows<T>(existing_mat: &Mat<T>, row_indices: &[usize]) -> Mat<T>
where
    T: Clone,
{
    Mat::from_fn(row_indices.len(), existing_mat.ncols(), |i, j| {
        existing_mat.get(row_indices[i], j).clone()
    })
}

/// Computes the axis aligned bounding box (AABB) extents of a matrix of points.
///
/// Returns a flat vector containing the minimum and maximum values along each column (dimension)
/// of the input matrix. The result is arranged as:
///
/// `[min_0, min_1, ..., min_n, max_0, max_1, ..., max_n]`
///
/// where `n` is the number of columns in the matrix.
///
/// # Examples
///
/// ```
/// use faer::mat;
/// use strata_rbf_utils::get_pointarray_extents;
///
/// let points = mat![
///     [1.0, 2.0],
///     [3.0, -1.0],
///     [0.5, 4.0f64]
/// ];
/// let extents = get_pointarray_extents(&points);
/// assert_eq!(extents, vec![0.5, -1.0, 3.0, 4.0]);
/// ```
#[inline(always)]
pub fn get_pointarray_extents<T>(points: &Mat<T>) -> Vec<T>
where
    T: PartialOrd + Clone,
{
    let ncols = points.shape().1;

    // Initialize extents with min and max values for each column.
    // The first half of the vector stores mins, the second half stores maxs.
    let mut extents: Vec<T> = vec![points.get(0, 0).clone(); 2 * ncols];

    for col in 0..ncols {
        extents[col] = points.get(0, col).clone();
        extents[col + ncols] = points.get(0, col).clone();
    }

    for row in points.row_iter() {
        for (col, item) in row.iter().enumerate() {
            if item < &extents[col] {
                extents[col] = item.clone();
            }
            if item > &extents[col + ncols] {
                extents[col + ncols] = item.clone();
            }
        }
    }

    extents
}

/// Calculates the euclidean distance between two points.
///
/// # Examples
///
/// ```
/// use faer::mat;
/// use strata_rbf_utils::get_distance;
///
/// let points = mat![
///     [1.0, 2.0],
///     [4.0, 6.0],
/// ];
///
/// let target = points.row(0);
/// let source = points.row(1);
///
/// let dist = get_distance(target, source);
///
/// assert_eq!(dist, 5.0);
/// ```
#[inline(always)]
pub fn get_distance(target: RowRef<f64>, source: RowRef<f64>) -> f64 {
    let mut dist = 0.0;
    for (t, s) in target.iter().zip(source.iter()) {
        let diff = t - s;
        dist += diff * diff;
    }
    dist.sqrt()
}

/// Builds the symmetric interpolation matrix for a set of points using a
/// typed kernel, adding `smooth` on the diagonal.
///
/// Only the lower triangle is evaluated; each value is mirrored, so
/// `a[(i, j)] == a[(j, i)]` holds bit for bit.
#[inline(always)]
pub fn get_a_matrix_symmetric_solver_typed<K>(
    points: &Mat<f64>,
    kernel_function: &K,
    smooth: &f64,
) -> Mat<f64>
where
    K: RadialKernel,
{
    let n = points.nrows();

    let mut a_matrix = Mat::<f64>::zeros(n, n);

    for j in 0..n {
        let source_row = points.row(j);

        for i in j..n {
            let target_row = points.row(i);
            let mut k_val = kernel_function.evaluate(target_row, source_row);

            // Add smoothing to the diagonal
            if i == j {
                k_val += smooth;
            }

            a_matrix[(i, j)] = k_val;
            a_matrix[(j, i)] = k_val;
        }
    }

    a_matrix
}

// Dispatcher generated from the kernel registry below.
// Assumes each kernel type implements `KernelFromParams` and `RadialKernel`.
macro_rules! for_each_kernel {
    ( registry = [ $( ($V:ident, $tag:literal, $Kty:path) ),* $(,)? ] ) => {

        /// Runtime kernel selector built from the kernel registry.
        ///
        /// Serializes as the snake case tag (`"multiquadric"`, `"inverse"`,
        /// `"gaussian"`, `"thin_plate_spline"`, `"cubic"`). Unknown tags
        /// deserialize as [`KernelType::Multiquadric`].
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
        #[serde(rename_all = "snake_case")]
        pub enum KernelType {
            $( $V, )*
        }

        impl KernelType {
            /// Every registered kernel, in registry order.
            pub const ALL: [KernelType; [$( stringify!($V) ),*].len()] = [$( KernelType::$V ),*];

            /// Returns the configuration tag of this kernel.
            pub fn tag(&self) -> &'static str {
                match self {
                    $( KernelType::$V => $tag, )*
                }
            }

            /// Looks up a kernel by its configuration tag.
            pub fn from_tag(tag: &str) -> Option<Self> {
                match tag {
                    $( $tag => Some(KernelType::$V), )*
                    _ => None,
                }
            }
        }

        /// A kernel together with its parameters, one variant per registered kernel.
        #[derive(Debug, Clone, Copy)]
        pub enum Kernel {
            $( $V($Kty), )*
        }

        impl Kernel {
            /// Instantiates the concrete kernel selected by `params.kernel_type`.
            #[inline]
            pub fn from_params(params: &KernelParams) -> Self {
                match params.kernel_type {
                    $(
                        KernelType::$V => {
                            Kernel::$V(<$Kty as KernelFromParams>::from_params(params))
                        }
                    ),*
                }
            }

            /// Returns the registry tag of this kernel.
            #[inline]
            pub fn kernel_type(&self) -> KernelType {
                match self {
                    $( Kernel::$V(_) => KernelType::$V, )*
                }
            }
        }

        impl RadialKernel for Kernel {
            #[inline(always)]
            fn phi(&self, r: f64) -> f64 {
                match self {
                    $( Kernel::$V(k) => k.phi(r), )*
                }
            }

            #[inline(always)]
            fn effective_radius(&self) -> f64 {
                match self {
                    $( Kernel::$V(k) => k.effective_radius(), )*
                }
            }
        }

        /// Builds the symmetric interpolation matrix with `smooth` on the diagonal.
        #[inline(always)]
        pub fn get_a_matrix_symmetric_solver(
            points: &Mat<f64>,
            kernel: &Kernel,
            smooth: &f64,
        ) -> Mat<f64> {
            match kernel {
                $(
                    // Monomorphise the assembly loop per concrete kernel
                    Kernel::$V(k) => get_a_matrix_symmetric_solver_typed(points, k, smooth),
                )*
            }
        }
    };
}

for_each_kernel! {
    registry = [
        (Multiquadric,    "multiquadric",      crate::kernels::MultiquadricRbfKernel),
        (Inverse,         "inverse",           crate::kernels::InverseMultiquadricRbfKernel),
        (Gaussian,        "gaussian",          crate::kernels::GaussianRbfKernel),
        (ThinPlateSpline, "thin_plate_spline", crate::kernels::ThinPlateSplineRbfKernel),
        (Cubic,           "cubic",             crate::kernels::CubicRbfKernel),
    ]
}

impl Default for KernelType {
    fn default() -> Self {
        KernelType::Multiquadric
    }
}

impl KernelType {
    /// Looks up a kernel by tag, falling back to [`KernelType::Multiquadric`]
    /// for anything unrecognised.
    pub fn from_tag_or_default(tag: &str) -> Self {
        match KernelType::from_tag(tag) {
            Some(kernel_type) => kernel_type,
            None => {
                log::warn!("unknown kernel {:?}, falling back to multiquadric", tag);
                KernelType::default()
            }
        }
    }
}

impl<'de> Deserialize<'de> for KernelType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let tag = String::deserialize(deserializer)?;
        Ok(KernelType::from_tag_or_default(&tag))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use equator::assert;
    use faer::{mat, utils::approx::*};

    fn grid_points() -> Mat<f64> {
        mat![
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [0.0, 2.0, 0.0],
            [1.0, 1.0, 1.0],
            [3.0, 0.5, -1.0f64],
        ]
    }

    #[test]
    fn symmetric_matrix_is_symmetric_off_diagonal() {
        let points = grid_points();
        for kernel_type in KernelType::ALL {
            let kernel = Kernel::from_params(&KernelParams::builder(kernel_type).build());
            let a = get_a_matrix_symmetric_solver(&points, &kernel, &0.25);
            let a_t = a.transpose().to_owned();
            assert!(a == a_t);
        }
    }

    #[test]
    fn smoothing_only_touches_the_diagonal() {
        let points = grid_points();
        let kernel = Kernel::from_params(&KernelParams::builder(KernelType::Gaussian).build());
        let plain = get_a_matrix_symmetric_solver(&points, &kernel, &0.0);
        let smoothed = get_a_matrix_symmetric_solver(&points, &kernel, &0.5);

        let n = plain.nrows();
        let shift = Mat::<f64>::from_fn(n, n, |i, j| if i == j { 0.5 } else { 0.0 });
        let expected = &plain + &shift;

        let approx_eq = CwiseMat(ApproxEq::eps());
        assert!(&smoothed ~ &expected);
    }

    #[test]
    fn matrix_entries_match_kernel_phi() {
        let points = grid_points();
        let kernel = Kernel::from_params(&KernelParams::builder(KernelType::Cubic).build());
        let a = get_a_matrix_symmetric_solver(&points, &kernel, &0.0);
        let r = get_distance(points.row(1), points.row(4));
        assert!(a[(4, 1)] == kernel.phi(r));
        assert!(a[(2, 2)] == 0.0);
    }

    #[test]
    fn kernel_tags_round_trip_and_fall_back() {
        for kernel_type in KernelType::ALL {
            assert_eq!(KernelType::from_tag(kernel_type.tag()), Some(kernel_type));
            assert_eq!(Kernel::from_params(&KernelParams::builder(kernel_type).build()).kernel_type(), kernel_type);
        }
        assert_eq!(KernelType::from_tag("quintic"), None);
        assert_eq!(KernelType::from_tag_or_default("quintic"), KernelType::Multiquadric);
    }
}
