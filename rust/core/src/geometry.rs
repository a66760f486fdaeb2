// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Mesh geometry records.
//!
//! Geometries use the legacy three.js `Geometry` JSON layout: flat vertex,
//! UV and face arrays. Each face record is `[type, a, b, c]` where the type
//! bitmask is always `0` (plain triangle, single material per geometry).

use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

use crate::error::{Error, Result};

/// Face type bitmask for a plain triangle without per-face attributes.
pub const TRIANGLE_FACE: u32 = 0;

/// Number of entries per face record.
pub const FACE_RECORD_LEN: usize = 4;

/// A mesh geometry owned by an object scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    pub uuid: String,
    #[serde(rename = "type")]
    pub kind: String,
    /// Materials embedded in the geometry; always empty, materials live at scene level.
    #[serde(default)]
    pub materials: Vec<serde_json::Value>,
    pub data: GeometryData,
}

/// Buffers of a [`Geometry`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeometryData {
    /// Vertex positions in millimeters (x, y, z triplets).
    #[serde(default)]
    pub vertices: Vec<f64>,
    /// Vertex normals; passed through untouched.
    #[serde(default)]
    pub normals: Vec<f64>,
    /// Vertex colors, matching number and order of vertices.
    #[serde(default)]
    pub colors: Vec<u32>,
    /// Texture coordinates (u, v pairs).
    #[serde(default)]
    pub uvs: Vec<f64>,
    /// Face records, see [`FACE_RECORD_LEN`].
    #[serde(default)]
    pub faces: Vec<u32>,
    pub scale: f64,
    pub visible: bool,
    pub cast_shadow: bool,
    pub receive_shadow: bool,
    pub double_sided: bool,
}

impl Default for GeometryData {
    fn default() -> Self {
        Self {
            vertices: Vec::new(),
            normals: Vec::new(),
            colors: Vec::new(),
            uvs: Vec::new(),
            faces: Vec::new(),
            scale: 1.0,
            visible: true,
            cast_shadow: true,
            receive_shadow: false,
            double_sided: true,
        }
    }
}

impl Geometry {
    /// Create an empty geometry.
    pub fn new(uuid: impl Into<String>) -> Self {
        Self {
            uuid: uuid.into(),
            kind: "Geometry".to_string(),
            materials: Vec::new(),
            data: GeometryData::default(),
        }
    }

    /// Append a triangle face referencing three vertex indices.
    #[inline]
    pub fn add_face(&mut self, indices: [u32; 3]) {
        self.data.faces.push(TRIANGLE_FACE);
        self.data.faces.extend_from_slice(&indices);
    }

    /// Append one UV pair.
    #[inline]
    pub fn add_uv(&mut self, u: f64, v: f64) {
        self.data.uvs.push(u);
        self.data.uvs.push(v);
    }

    /// Append a vertex position (millimeters).
    #[inline]
    pub fn add_point(&mut self, point: impl Into<[f64; 3]>) {
        self.data.vertices.extend_from_slice(&point.into());
    }

    /// Number of vertices in the position buffer.
    pub fn vertex_count(&self) -> usize {
        self.data.vertices.len() / 3
    }

    /// Number of face records.
    pub fn face_count(&self) -> usize {
        self.data.faces.len() / FACE_RECORD_LEN
    }

    /// True when the geometry has no triangles or no vertices.
    pub fn is_empty(&self) -> bool {
        self.data.vertices.is_empty() || self.data.faces.is_empty()
    }

    /// Iterate the vertex index triples of every face record.
    pub fn triangles(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        self.data
            .faces
            .chunks_exact(FACE_RECORD_LEN)
            .map(|record| [record[1], record[2], record[3]])
    }

    /// Check buffer invariants: vertex triplets and in-range face indices.
    pub fn validate(&self) -> Result<()> {
        if self.data.vertices.len() % 3 != 0 {
            return Err(Error::RaggedVertexBuffer {
                uuid: self.uuid.clone(),
                len: self.data.vertices.len(),
            });
        }

        let vertex_count = self.vertex_count();
        for triangle in self.triangles() {
            for index in triangle {
                if index as usize >= vertex_count {
                    return Err(Error::FaceIndexOutOfRange {
                        uuid: self.uuid.clone(),
                        index,
                        vertex_count,
                    });
                }
            }
        }
        Ok(())
    }

    /// Hash the buffer contents, ignoring the UUID.
    /// Uses FxHasher - collisions are confirmed with [`Geometry::same_content`].
    pub fn content_hash(&self) -> u64 {
        use rustc_hash::FxHasher;
        let mut hasher = FxHasher::default();

        self.data.vertices.len().hash(&mut hasher);
        self.data.faces.len().hash(&mut hasher);

        for value in &self.data.vertices {
            value.to_bits().hash(&mut hasher);
        }
        self.data.faces.hash(&mut hasher);
        for value in &self.data.uvs {
            value.to_bits().hash(&mut hasher);
        }

        hasher.finish()
    }

    /// True when both geometries carry identical buffers.
    pub fn same_content(&self, other: &Geometry) -> bool {
        self.data == other.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle(uuid: &str) -> Geometry {
        let mut geo = Geometry::new(uuid);
        geo.add_point([0.0, 0.0, 0.0]);
        geo.add_point([1000.0, 0.0, 0.0]);
        geo.add_point([0.0, 1000.0, 0.0]);
        geo.add_face([0, 1, 2]);
        geo
    }

    #[test]
    fn face_records_carry_type_placeholder() {
        let geo = triangle("g");
        assert_eq!(geo.data.faces, vec![0, 0, 1, 2]);
        assert_eq!(geo.face_count(), 1);
        assert_eq!(geo.vertex_count(), 3);
        assert_eq!(geo.triangles().collect::<Vec<_>>(), vec![[0, 1, 2]]);
    }

    #[test]
    fn validate_rejects_out_of_range_face() {
        let mut geo = triangle("g");
        geo.add_face([0, 1, 3]);
        match geo.validate() {
            Err(Error::FaceIndexOutOfRange {
                index,
                vertex_count,
                ..
            }) => {
                assert_eq!(index, 3);
                assert_eq!(vertex_count, 3);
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn validate_rejects_ragged_vertices() {
        let mut geo = triangle("g");
        geo.data.vertices.push(1.0);
        assert!(matches!(
            geo.validate(),
            Err(Error::RaggedVertexBuffer { len: 10, .. })
        ));
    }

    #[test]
    fn content_hash_ignores_uuid() {
        let a = triangle("a");
        let b = triangle("b");
        assert_eq!(a.content_hash(), b.content_hash());
        assert!(a.same_content(&b));

        let mut c = triangle("c");
        c.add_uv(0.5, 0.5);
        assert!(!a.same_content(&c));
    }

    #[test]
    fn serializes_camel_case_buffers() {
        let mut geo = triangle("g");
        geo.add_uv(0.0, 1.0);
        let json = serde_json::to_value(&geo).unwrap();
        assert_eq!(json["type"], "Geometry");
        assert_eq!(json["materials"], serde_json::json!([]));
        assert_eq!(json["data"]["uvs"], serde_json::json!([0.0, 1.0]));
        assert_eq!(json["data"]["normals"], serde_json::json!([]));
        assert_eq!(json["data"]["castShadow"], true);
        assert_eq!(json["data"]["receiveShadow"], false);
        assert_eq!(json["data"]["doubleSided"], true);
        assert_eq!(json["data"]["scale"], 1.0);
    }
}
