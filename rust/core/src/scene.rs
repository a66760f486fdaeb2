// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The root object scene document.
//!
//! An [`ObjectScene`] aggregates a metadata header, the flat geometry and
//! material registries, and the root node tree. Registries are keyed by UUID
//! and keep first-registered order; a second registration under an existing
//! UUID is ignored (first writer wins).

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

use crate::error::{Error, Result};
use crate::geometry::Geometry;
use crate::material::Material;
use crate::metadata::Metadata;
use crate::object::{Object3D, SCENE_TYPE};

/// Root document of an export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectScene {
    pub metadata: Metadata,
    #[serde(default, with = "crate::keyed")]
    geometries: IndexMap<String, Geometry>,
    #[serde(default, with = "crate::keyed")]
    materials: IndexMap<String, Material>,
    pub object: Object3D,
}

impl ObjectScene {
    /// Create an empty scene whose root node carries `uuid`.
    pub fn new(metadata: Metadata, uuid: impl Into<String>) -> Self {
        Self {
            metadata,
            geometries: IndexMap::new(),
            materials: IndexMap::new(),
            object: Object3D::new(SCENE_TYPE, uuid),
        }
    }

    /// Register a geometry; returns `false` if the UUID was already taken.
    pub fn add_geometry(&mut self, geometry: Geometry) -> bool {
        if self.geometries.contains_key(&geometry.uuid) {
            tracing::trace!(uuid = %geometry.uuid, "Geometry already registered");
            return false;
        }
        self.geometries.insert(geometry.uuid.clone(), geometry);
        true
    }

    /// Register a material; returns `false` if the UUID was already taken.
    pub fn add_material(&mut self, material: impl Into<Material>) -> bool {
        let material = material.into();
        if self.materials.contains_key(material.uuid()) {
            tracing::trace!(uuid = %material.uuid(), "Material already registered");
            return false;
        }
        self.materials.insert(material.uuid().to_string(), material);
        true
    }

    pub fn has_geometry(&self, uuid: &str) -> bool {
        self.geometries.contains_key(uuid)
    }

    pub fn has_material(&self, uuid: &str) -> bool {
        self.materials.contains_key(uuid)
    }

    pub fn geometry(&self, uuid: &str) -> Option<&Geometry> {
        self.geometries.get(uuid)
    }

    pub fn material(&self, uuid: &str) -> Option<&Material> {
        self.materials.get(uuid)
    }

    /// Geometries in registration order.
    pub fn geometries(&self) -> impl Iterator<Item = &Geometry> {
        self.geometries.values()
    }

    /// Materials in registration order.
    pub fn materials(&self) -> impl Iterator<Item = &Material> {
        self.materials.values()
    }

    pub fn geometry_count(&self) -> usize {
        self.geometries.len()
    }

    pub fn material_count(&self) -> usize {
        self.materials.len()
    }

    pub(crate) fn geometries_mut(&mut self) -> &mut IndexMap<String, Geometry> {
        &mut self.geometries
    }

    pub(crate) fn materials_mut(&mut self) -> &mut IndexMap<String, Material> {
        &mut self.materials
    }

    /// Check that every node reference resolves and every geometry is well formed.
    pub fn validate(&self) -> Result<()> {
        for geometry in self.geometries.values() {
            geometry.validate()?;
        }

        let mut failure = None;
        self.object.walk(&mut |node| {
            if failure.is_some() {
                return;
            }
            if let Some(geometry) = &node.geometry {
                if !self.geometries.contains_key(geometry) {
                    failure = Some(Error::DanglingGeometry {
                        node: node.uuid.clone(),
                        geometry: geometry.clone(),
                    });
                    return;
                }
            }
            if let Some(material) = &node.material {
                if !self.materials.contains_key(material) {
                    failure = Some(Error::DanglingMaterial {
                        node: node.uuid.clone(),
                        material: material.clone(),
                    });
                }
            }
        });

        match failure {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Compact JSON encoding.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Indented JSON encoding.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Decode a scene previously written by [`ObjectScene::to_json`].
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Write the scene as JSON to `path`, replacing any existing file.
    pub fn write_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if path.as_os_str().is_empty() || path.is_dir() {
            return Err(Error::InvalidOutputPath(path.display().to_string()));
        }

        let json = self.to_json()?;
        std::fs::write(path, &json)?;
        tracing::debug!(
            path = %path.display(),
            size = json.len(),
            geometries = self.geometries.len(),
            materials = self.materials.len(),
            "Wrote object scene"
        );
        Ok(())
    }
}

impl fmt::Display for ObjectScene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let json = serde_json::to_string_pretty(self).map_err(|_| fmt::Error)?;
        f.write_str(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::MeshPhongMaterial;
    use crate::object::{ELEMENT_TYPE, MESH_TYPE};

    fn scene() -> ObjectScene {
        ObjectScene::new(Metadata::new("test").unwrap(), "view-1")
    }

    #[test]
    fn registries_are_first_writer_wins() {
        let mut scene = scene();
        assert!(scene.add_material(MeshPhongMaterial::new("m").with_name("first")));
        assert!(!scene.add_material(MeshPhongMaterial::new("m").with_name("second")));
        assert!(scene.add_geometry(Geometry::new("g")));
        assert!(!scene.add_geometry(Geometry::new("g")));

        assert_eq!(scene.material_count(), 1);
        assert_eq!(scene.geometry_count(), 1);
        assert_eq!(scene.material("m").unwrap().name(), "first");
        assert!(scene.has_material("m"));
        assert!(!scene.has_material("x"));
    }

    #[test]
    fn validate_reports_dangling_references() {
        let mut scene = scene();
        let mut mesh = Object3D::new(MESH_TYPE, "e-m");
        mesh.geometry = Some("missing".into());
        let mut element = Object3D::new(ELEMENT_TYPE, "e");
        element.add_child(mesh);
        scene.object.add_child(element);

        assert!(matches!(
            scene.validate(),
            Err(Error::DanglingGeometry { .. })
        ));
    }

    #[test]
    fn top_level_members() {
        let scene = scene();
        let json: serde_json::Value = serde_json::from_str(&scene.to_json().unwrap()).unwrap();
        assert_eq!(json["geometries"], serde_json::json!([]));
        assert_eq!(json["materials"], serde_json::json!([]));
        assert_eq!(json["object"]["type"], "Scene");
        assert_eq!(json["object"]["uuid"], "view-1");
        assert_eq!(json["metadata"]["type"], "Object");
    }

    #[test]
    fn write_rejects_empty_path() {
        assert!(matches!(
            scene().write_to_file(""),
            Err(Error::InvalidOutputPath(_))
        ));
    }
}
