// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Per-element working state.
//!
//! A [`CurrentSet`] lives from an element's begin to its end. Facets are
//! split into material partitions, each welding its own vertices. Nothing is
//! shared between elements, so two elements with the same material never
//! share vertex indices.

use indexmap::IndexMap;
use objscene_core::{Geometry, Object3D, ObjectScene, MESH_TYPE};
use objscene_geometry::{Point3D, VertexIndexCache};

use crate::error::{Error, Result};

/// Node and geometry UUID of an element's partition for one material.
pub fn partition_key(element_uuid: &str, material_uuid: &str) -> String {
    format!("{element_uuid}-{material_uuid}")
}

/// Geometry accumulated for one (element, material) pair.
#[derive(Debug, Clone)]
pub struct Partition {
    pub mesh: Object3D,
    pub geometry: Geometry,
    pub vertices: VertexIndexCache,
}

impl Partition {
    fn new(element: &Object3D, material_uuid: &str) -> Self {
        let key = partition_key(&element.uuid, material_uuid);
        let mut mesh = Object3D::new(MESH_TYPE, key.clone()).with_name(element.name.clone());
        mesh.geometry = Some(key.clone());
        mesh.material = Some(material_uuid.to_string());

        Self {
            mesh,
            geometry: Geometry::new(key),
            vertices: VertexIndexCache::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CurrentSet {
    element: Object3D,
    material: Option<String>,
    partitions: IndexMap<String, Partition>,
}

impl CurrentSet {
    pub fn new(element: Object3D) -> Self {
        Self {
            element,
            material: None,
            partitions: IndexMap::new(),
        }
    }

    /// UUID of the element shell.
    pub fn uuid(&self) -> &str {
        &self.element.uuid
    }

    pub fn element(&self) -> &Object3D {
        &self.element
    }

    pub fn element_mut(&mut self) -> &mut Object3D {
        &mut self.element
    }

    pub fn active_material(&self) -> Option<&str> {
        self.material.as_deref()
    }

    /// Make `material_uuid` the target of subsequent facets, opening its
    /// partition on first use.
    pub fn set_material(&mut self, material_uuid: &str) -> Result<()> {
        if material_uuid.trim().is_empty() {
            return Err(Error::InvalidMaterialUuid);
        }

        if !self.partitions.contains_key(material_uuid) {
            let partition = Partition::new(&self.element, material_uuid);
            self.partitions.insert(material_uuid.to_string(), partition);
        }
        self.material = Some(material_uuid.to_string());
        Ok(())
    }

    pub fn partition(&self, material_uuid: &str) -> Option<&Partition> {
        self.partitions.get(material_uuid)
    }

    pub fn partition_count(&self) -> usize {
        self.partitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.partitions.is_empty()
    }

    fn active_partition(&mut self) -> Result<&mut Partition> {
        let material = self
            .material
            .as_deref()
            .ok_or_else(|| Error::NoActiveMaterial(self.element.uuid.clone()))?;
        self.partitions
            .get_mut(material)
            .ok_or_else(|| Error::NoActiveMaterial(self.element.uuid.clone()))
    }

    /// Weld a triangle's corners into the active partition and record the face.
    pub fn add_facet(&mut self, corners: [Point3D; 3]) -> Result<()> {
        let partition = self.active_partition()?;
        let indices = corners.map(|p| partition.vertices.add_vertex(p));
        partition.geometry.add_face(indices);
        Ok(())
    }

    /// Append a UV pair to the active partition in the order the host reports
    /// them. UVs are not re-indexed to the welded vertices, so their count can
    /// differ from the partition's vertex count.
    pub fn add_uv(&mut self, u: f64, v: f64) -> Result<()> {
        self.active_partition()?.geometry.add_uv(u, v);
        Ok(())
    }

    /// Write welded vertices into each partition's geometry, register the
    /// geometries with `scene` and hang the meshes under the element shell.
    pub fn flush(self, scene: &mut ObjectScene) -> Object3D {
        let mut element = self.element;
        for (_, partition) in self.partitions {
            let Partition {
                mut mesh,
                mut geometry,
                vertices,
            } = partition;

            vertices.write_into(&mut geometry);
            mesh.geometry = Some(geometry.uuid.clone());
            scene.add_geometry(geometry);
            element.add_child(mesh);
        }
        element
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use objscene_core::{Metadata, ELEMENT_TYPE};

    fn set() -> CurrentSet {
        CurrentSet::new(Object3D::new(ELEMENT_TYPE, "e").with_name("Wall"))
    }

    #[test]
    fn facets_need_a_material() {
        let mut set = set();
        let corner = Point3D::new(0, 0, 0);
        assert!(matches!(
            set.add_facet([corner; 3]),
            Err(Error::NoActiveMaterial(_))
        ));
        assert!(matches!(set.set_material(" "), Err(Error::InvalidMaterialUuid)));
    }

    #[test]
    fn partitions_by_material() {
        let mut set = set();
        set.set_material("red").unwrap();
        set.add_facet([
            Point3D::new(0, 0, 0),
            Point3D::new(1, 0, 0),
            Point3D::new(0, 1, 0),
        ])
        .unwrap();
        set.set_material("blue").unwrap();
        set.add_facet([
            Point3D::new(0, 0, 0),
            Point3D::new(0, 0, 1),
            Point3D::new(0, 1, 0),
        ])
        .unwrap();
        set.set_material("red").unwrap();
        set.add_uv(0.5, 0.5).unwrap();

        assert_eq!(set.partition_count(), 2);
        assert_eq!(set.active_material(), Some("red"));
        let red = set.partition("red").unwrap();
        assert_eq!(red.vertices.len(), 3);
        assert_eq!(red.geometry.data.uvs, vec![0.5, 0.5]);
        assert_eq!(red.mesh.uuid, "e-red");
        assert_eq!(red.mesh.name, "Wall");
        assert_eq!(red.mesh.material.as_deref(), Some("red"));
    }

    #[test]
    fn flush_registers_geometry_and_meshes() {
        let mut set = set();
        set.set_material("m").unwrap();
        set.add_facet([
            Point3D::new(0, 0, 0),
            Point3D::new(1, 0, 0),
            Point3D::new(0, 1, 0),
        ])
        .unwrap();
        set.add_facet([
            Point3D::new(0, 0, 0),
            Point3D::new(0, 1, 0),
            Point3D::new(-1, 0, 0),
        ])
        .unwrap();

        let mut scene = ObjectScene::new(Metadata::default(), "root");
        let shell = set.flush(&mut scene);

        let geometry = scene.geometry("e-m").unwrap();
        assert_eq!(geometry.vertex_count(), 4);
        assert_eq!(geometry.data.faces, vec![0, 0, 1, 2, 0, 0, 2, 3]);
        let mesh = shell.child("e-m").unwrap();
        assert_eq!(mesh.geometry.as_deref(), Some("e-m"));
    }
}
