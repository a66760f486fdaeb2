// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Post-pass structural optimization of an assembled scene.
//!
//! Runs after traversal: merges geometries with identical buffers, optionally
//! prunes empty meshes and element shells, then drops registry entries that
//! no node references anymore.

use rustc_hash::{FxHashMap, FxHashSet};

use crate::object::{Object3D, MESH_TYPE};
use crate::scene::ObjectScene;

/// Counters reported by [`ObjectScene::optimize`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OptimizeStats {
    /// Geometries folded into an identical, earlier-registered geometry.
    pub merged_geometries: usize,
    /// Nodes removed from the tree.
    pub pruned_nodes: usize,
    /// Geometries dropped from the registry.
    pub removed_geometries: usize,
    /// Materials dropped from the registry.
    pub removed_materials: usize,
}

impl ObjectScene {
    /// Merge duplicate geometries and drop unreferenced registry entries.
    /// With `prune`, also removes empty meshes and childless element shells.
    pub fn optimize(&mut self, prune: bool) -> OptimizeStats {
        let mut stats = OptimizeStats::default();

        let redirects = self.duplicate_geometries();
        stats.merged_geometries = redirects.len();
        if !redirects.is_empty() {
            self.object.walk_mut(&mut |node| {
                if let Some(target) = node.geometry.as_ref().and_then(|g| redirects.get(g)) {
                    node.geometry = Some(target.clone());
                }
            });
        }

        if prune {
            let empty: FxHashSet<String> = self
                .geometries()
                .filter(|g| g.is_empty())
                .map(|g| g.uuid.clone())
                .collect();
            stats.pruned_nodes = prune_children(&mut self.object, &empty);
        }

        let mut used_geometries = FxHashSet::default();
        let mut used_materials = FxHashSet::default();
        self.object.walk(&mut |node| {
            if let Some(g) = &node.geometry {
                used_geometries.insert(g.clone());
            }
            if let Some(m) = &node.material {
                used_materials.insert(m.clone());
            }
        });

        let geometries = self.geometries_mut();
        let before = geometries.len();
        geometries.retain(|uuid, _| used_geometries.contains(uuid));
        stats.removed_geometries = before - geometries.len();

        let materials = self.materials_mut();
        let before = materials.len();
        materials.retain(|uuid, _| used_materials.contains(uuid));
        stats.removed_materials = before - materials.len();

        tracing::info!(
            merged_geometries = stats.merged_geometries,
            pruned_nodes = stats.pruned_nodes,
            removed_geometries = stats.removed_geometries,
            removed_materials = stats.removed_materials,
            "Optimized object scene"
        );
        stats
    }

    /// Map each duplicate geometry UUID to the first-registered geometry with
    /// the same buffers.
    fn duplicate_geometries(&self) -> FxHashMap<String, String> {
        let mut by_hash: FxHashMap<u64, Vec<&str>> = FxHashMap::default();
        let mut redirects = FxHashMap::default();

        for geometry in self.geometries() {
            let bucket = by_hash.entry(geometry.content_hash()).or_default();
            let original = bucket.iter().copied().find(|uuid| {
                self.geometry(uuid)
                    .map(|candidate| candidate.same_content(geometry))
                    .unwrap_or(false)
            });

            match original {
                Some(uuid) => {
                    redirects.insert(geometry.uuid.clone(), uuid.to_string());
                }
                None => bucket.push(&geometry.uuid),
            }
        }
        redirects
    }
}

/// Remove meshes pointing at empty geometries, then non-mesh nodes left with
/// neither children nor geometry. Returns the number of removed nodes.
fn prune_children(node: &mut Object3D, empty: &FxHashSet<String>) -> usize {
    let mut removed = 0;
    for child in node.children_mut() {
        removed += prune_children(child, empty);
    }

    let before = node.child_count();
    node.retain_children(|child| {
        let empty_mesh = child.kind() == MESH_TYPE
            && child.geometry.as_ref().map_or(true, |g| empty.contains(g));
        let empty_shell =
            child.kind() != MESH_TYPE && child.child_count() == 0 && child.geometry.is_none();
        !(empty_mesh || empty_shell)
    });
    removed + before - node.child_count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Geometry;
    use crate::material::MeshPhongMaterial;
    use crate::metadata::Metadata;
    use crate::object::ELEMENT_TYPE;

    fn triangle(uuid: &str) -> Geometry {
        let mut geo = Geometry::new(uuid);
        geo.add_point([0.0, 0.0, 0.0]);
        geo.add_point([10.0, 0.0, 0.0]);
        geo.add_point([0.0, 10.0, 0.0]);
        geo.add_face([0, 1, 2]);
        geo
    }

    fn element(uuid: &str, geometry: &str, material: &str) -> Object3D {
        let mut mesh = Object3D::new(MESH_TYPE, format!("{uuid}-{material}"));
        mesh.geometry = Some(geometry.to_string());
        mesh.material = Some(material.to_string());
        let mut shell = Object3D::new(ELEMENT_TYPE, uuid);
        shell.add_child(mesh);
        shell
    }

    #[test]
    fn merges_identical_geometries() {
        let mut scene = ObjectScene::new(Metadata::default(), "root");
        scene.add_material(MeshPhongMaterial::new("m"));
        scene.add_geometry(triangle("a-m"));
        scene.add_geometry(triangle("b-m"));
        scene.object.add_child(element("a", "a-m", "m"));
        scene.object.add_child(element("b", "b-m", "m"));

        let stats = scene.optimize(false);
        assert_eq!(stats.merged_geometries, 1);
        assert_eq!(stats.removed_geometries, 1);
        assert_eq!(scene.geometry_count(), 1);

        let b_mesh = scene.object.child("b").unwrap().child("b-m").unwrap();
        assert_eq!(b_mesh.geometry.as_deref(), Some("a-m"));
        scene.validate().unwrap();
    }

    #[test]
    fn prunes_empty_meshes_and_shells() {
        let mut scene = ObjectScene::new(Metadata::default(), "root");
        scene.add_material(MeshPhongMaterial::new("m"));
        scene.add_material(MeshPhongMaterial::new("unused"));
        scene.add_geometry(triangle("a-m"));
        scene.add_geometry(Geometry::new("b-m"));
        scene.object.add_child(element("a", "a-m", "m"));
        scene.object.add_child(element("b", "b-m", "m"));

        let stats = scene.optimize(true);
        // the empty mesh and then its shell
        assert_eq!(stats.pruned_nodes, 2);
        assert!(!scene.object.has_child("b"));
        assert!(scene.object.has_child("a"));
        assert_eq!(stats.removed_geometries, 1);
        assert_eq!(stats.removed_materials, 1);
        assert!(!scene.has_material("unused"));
        scene.validate().unwrap();
    }

    #[test]
    fn no_prune_keeps_empty_nodes() {
        let mut scene = ObjectScene::new(Metadata::default(), "root");
        scene.add_material(MeshPhongMaterial::new("m"));
        scene.add_geometry(Geometry::new("b-m"));
        scene.object.add_child(element("b", "b-m", "m"));

        let stats = scene.optimize(false);
        assert_eq!(stats.pruned_nodes, 0);
        assert!(scene.object.has_child("b"));
        assert_eq!(scene.geometry_count(), 1);
    }
}
