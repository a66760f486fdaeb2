// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # ObjScene Core
//!
//! Document model for the three.js JSON object scene format (version 4.3),
//! as produced by the ObjScene exporter.
//!
//! ## Overview
//!
//! - **Scene**: metadata header, flat geometry and material registries, and a
//!   root node tree ([`ObjectScene`])
//! - **Nodes**: [`Object3D`] with UUID-keyed, insertion-ordered children
//! - **Geometry**: legacy `Geometry` layout with `[0, a, b, c]` face records
//! - **Materials**: [`MeshPhongMaterial`] surfaces
//! - **Optimization**: geometry dedup and pruning of empty nodes
//!
//! ## Quick Start
//!
//! ```rust
//! use objscene_core::{Geometry, Metadata, Object3D, ObjectScene, MeshPhongMaterial, MESH_TYPE};
//!
//! let mut scene = ObjectScene::new(Metadata::default(), "view-uuid");
//! scene.add_material(MeshPhongMaterial::from_surface("mat", 0xFF0000, 0.0));
//!
//! let mut geometry = Geometry::new("elem-mat");
//! geometry.add_point([0.0, 0.0, 0.0]);
//! geometry.add_point([1.0, 0.0, 0.0]);
//! geometry.add_point([0.0, 1.0, 0.0]);
//! geometry.add_face([0, 1, 2]);
//! scene.add_geometry(geometry);
//!
//! let mut mesh = Object3D::new(MESH_TYPE, "elem-mat");
//! mesh.geometry = Some("elem-mat".into());
//! mesh.material = Some("mat".into());
//! scene.object.add_child(mesh);
//!
//! assert!(scene.validate().is_ok());
//! let json = scene.to_json().unwrap();
//! assert_eq!(ObjectScene::from_json(&json).unwrap(), scene);
//! ```

pub mod error;
pub mod geometry;
pub mod keyed;
pub mod material;
pub mod metadata;
pub mod object;
pub mod optimize;
pub mod scene;

pub use error::{Error, Result};
pub use geometry::{Geometry, GeometryData, FACE_RECORD_LEN, TRIANGLE_FACE};
pub use keyed::Keyed;
pub use material::{pack_rgb, Material, MeshPhongMaterial};
pub use metadata::{Metadata, DOCUMENT_TYPE, FORMAT_VERSION};
pub use object::{
    Object3D, DEFAULT_TYPE, ELEMENT_TYPE, IDENTITY_MATRIX, MESH_TYPE, SCENE_TYPE, VIEW_TYPE,
};
pub use optimize::OptimizeStats;
pub use scene::ObjectScene;

/// Generator string written into every exported scene header.
pub const GENERATOR: &str = concat!("objscene v", env!("CARGO_PKG_VERSION"));
