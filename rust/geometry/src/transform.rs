// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Accumulated placement transforms for nested instances and links.
//!
//! The stack always holds the traversal's base transform at the bottom.
//! Entering an instance pushes `top * local`, so the newest transform is
//! applied first to points expressed in the instance's own coordinates.

use nalgebra::{Matrix4, Point3, Vector3};

use crate::error::{Error, Result};
use crate::point::Point3D;
use crate::units::to_scene_point;

/// Build an affine transform from an origin and three basis vectors.
pub fn matrix_from_basis(
    origin: &Point3<f64>,
    basis_x: &Vector3<f64>,
    basis_y: &Vector3<f64>,
    basis_z: &Vector3<f64>,
) -> Matrix4<f64> {
    Matrix4::new(
        basis_x.x, basis_y.x, basis_z.x, origin.x, //
        basis_x.y, basis_y.y, basis_z.y, origin.y, //
        basis_x.z, basis_y.z, basis_z.z, origin.z, //
        0.0, 0.0, 0.0, 1.0,
    )
}

/// Flatten a matrix into 16 row-major values.
pub fn to_row_major(matrix: &Matrix4<f64>) -> [f64; 16] {
    let mut out = [0.0; 16];
    for row in 0..4 {
        for col in 0..4 {
            out[row * 4 + col] = matrix[(row, col)];
        }
    }
    out
}

/// Stack of accumulated transforms.
#[derive(Debug, Clone)]
pub struct TransformStack {
    stack: Vec<Matrix4<f64>>,
}

impl Default for TransformStack {
    fn default() -> Self {
        Self::new()
    }
}

impl TransformStack {
    /// Create a stack holding only the identity base.
    pub fn new() -> Self {
        Self {
            stack: vec![Matrix4::identity()],
        }
    }

    /// Drop everything and start again from the identity base.
    pub fn reset(&mut self) {
        self.stack.clear();
        self.stack.push(Matrix4::identity());
    }

    /// Compose `local` with the current top and push the result.
    pub fn push(&mut self, local: &Matrix4<f64>) {
        let combined = self.peek() * local;
        self.stack.push(combined);
    }

    /// Remove the top transform. The base cannot be popped.
    pub fn pop(&mut self) -> Result<Matrix4<f64>> {
        if self.stack.len() <= 1 {
            tracing::debug!(depth = self.stack.len(), "Transform pop at base");
            return Err(Error::UnbalancedTransformStack {
                depth: self.stack.len(),
            });
        }
        self.stack
            .pop()
            .ok_or(Error::UnbalancedTransformStack { depth: 0 })
    }

    /// The active (accumulated) transform.
    #[inline]
    pub fn peek(&self) -> Matrix4<f64> {
        self.stack.last().copied().unwrap_or_else(Matrix4::identity)
    }

    /// Number of transforms including the base.
    #[inline]
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Map a host point through the active transform.
    #[inline]
    pub fn transform_point(&self, point: &Point3<f64>) -> Point3<f64> {
        self.peek().transform_point(point)
    }

    /// Map a host point through the active transform into scene millimeters.
    #[inline]
    pub fn to_millimeters(&self, point: &Point3<f64>) -> Point3D {
        to_scene_point(&self.transform_point(point))
    }
}
