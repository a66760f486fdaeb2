// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # ObjScene Geometry
//!
//! Coordinate handling for the object scene exporter:
//!
//! - **Units**: host decimal feet to whole millimeters, with the axis
//!   permutation into the Y-up scene frame
//! - **Transforms**: [`TransformStack`] of accumulated instance placements,
//!   built on [nalgebra](https://nalgebra.org)
//! - **Welding**: [`VertexIndexCache`] assigns dense vertex indices so shared
//!   corners are stored once per material partition
//!
//! ## Quick Start
//!
//! ```rust
//! use nalgebra::{Matrix4, Point3, Vector3};
//! use objscene_geometry::{Point3D, TransformStack, VertexIndexCache};
//!
//! let mut stack = TransformStack::new();
//! stack.push(&Matrix4::new_translation(&Vector3::new(1.0, 0.0, 0.0)));
//!
//! let mut cache = VertexIndexCache::new();
//! let a = cache.add_vertex(stack.to_millimeters(&Point3::new(0.0, 2.0, 3.0)));
//! let b = cache.add_vertex(Point3D::new(-305, 914, 610));
//! assert_eq!((a, b), (0, 0));
//! ```

pub mod error;
pub mod point;
pub mod transform;
pub mod units;
pub mod vertex_cache;

pub use error::{Error, Result};
pub use point::Point3D;
pub use transform::{matrix_from_basis, to_row_major, TransformStack};
pub use units::{feet_to_millimeters, to_scene_point, LENGTH_EPSILON, MILLIMETERS_PER_FOOT};
pub use vertex_cache::VertexIndexCache;
