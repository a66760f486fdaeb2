// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Nodes reported by the tessellation engine during traversal.

use nalgebra::{Matrix4, Point3, Vector3};
use objscene_geometry::matrix_from_basis;
use serde::{Deserialize, Serialize};

use crate::host::{Color, ElementId};

/// Tells the engine whether to descend into a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderNodeAction {
    Proceed,
    Skip,
}

/// Affine placement in host units: an origin plus three basis vectors.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub origin: [f64; 3],
    pub basis_x: [f64; 3],
    pub basis_y: [f64; 3],
    pub basis_z: [f64; 3],
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    pub const IDENTITY: Transform = Transform {
        origin: [0.0, 0.0, 0.0],
        basis_x: [1.0, 0.0, 0.0],
        basis_y: [0.0, 1.0, 0.0],
        basis_z: [0.0, 0.0, 1.0],
    };

    /// Pure translation.
    pub fn translation(x: f64, y: f64, z: f64) -> Self {
        Self {
            origin: [x, y, z],
            ..Self::IDENTITY
        }
    }

    pub fn is_finite(&self) -> bool {
        [self.origin, self.basis_x, self.basis_y, self.basis_z]
            .iter()
            .flatten()
            .all(|v| v.is_finite())
    }

    pub fn to_matrix(&self) -> Matrix4<f64> {
        matrix_from_basis(
            &Point3::from(self.origin),
            &Vector3::from(self.basis_x),
            &Vector3::from(self.basis_y),
            &Vector3::from(self.basis_z),
        )
    }
}

/// The 3D view being exported.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ViewNode {
    pub view_id: ElementId,
    #[serde(default)]
    pub name: String,
    /// Tessellation quality hint, 1 (coarse) to 15 (fine). Set by the exporter.
    #[serde(default)]
    pub level_of_detail: u8,
}

/// A family instance placement.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InstanceNode {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub symbol_id: ElementId,
    #[serde(default)]
    pub transform: Transform,
}

/// A linked model placement.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LinkNode {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub symbol_id: ElementId,
    #[serde(default)]
    pub document_title: String,
    #[serde(default)]
    pub transform: Transform,
}

/// Material change for subsequent polymeshes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MaterialNode {
    /// Persisted material, or [`ElementId::INVALID`] for inline appearance.
    #[serde(default)]
    pub material_id: ElementId,
    pub color: Color,
    /// Fraction 0.0 (opaque) to 1.0.
    #[serde(default)]
    pub transparency: f64,
}

impl MaterialNode {
    pub fn persisted(material_id: ElementId, color: Color) -> Self {
        Self {
            material_id,
            color,
            transparency: 0.0,
        }
    }

    pub fn inline(color: Color, transparency: f64) -> Self {
        Self {
            material_id: ElementId::INVALID,
            color,
            transparency,
        }
    }
}

/// A triangle referencing three entries of the polymesh point list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Facet {
    pub v1: usize,
    pub v2: usize,
    pub v3: usize,
}

impl Facet {
    pub const fn new(v1: usize, v2: usize, v3: usize) -> Self {
        Self { v1, v2, v3 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Uv {
    pub u: f64,
    pub v: f64,
}

/// Tessellated face data in the coordinates of the innermost instance.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PolymeshTopology {
    pub points: Vec<[f64; 3]>,
    pub facets: Vec<Facet>,
    #[serde(default)]
    pub uvs: Vec<Uv>,
    #[serde(default)]
    pub normals: Vec<[f64; 3]>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FaceNode {
    #[serde(default)]
    pub face_index: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LightNode {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RpcNode {
    #[serde(default)]
    pub name: String,
}
