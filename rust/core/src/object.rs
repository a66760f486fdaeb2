// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Scene graph nodes.
//!
//! An [`Object3D`] owns its children exclusively. Children are kept in
//! insertion order and keyed by UUID: adding a child whose UUID is already
//! present is a no-op, so each node appears at most once under a parent.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Type tag of the scene root.
pub const SCENE_TYPE: &str = "Scene";
/// Type tag of exported model elements.
pub const ELEMENT_TYPE: &str = "RevitElement";
/// Type tag of the view-level pseudo element.
pub const VIEW_TYPE: &str = "RevitView";
/// Type tag of per-material mesh children.
pub const MESH_TYPE: &str = "Mesh";
/// Fallback type tag.
pub const DEFAULT_TYPE: &str = "Object3D";

/// Row-major 4x4 identity.
pub const IDENTITY_MATRIX: [f64; 16] = [
    1.0, 0.0, 0.0, 0.0, //
    0.0, 1.0, 0.0, 0.0, //
    0.0, 0.0, 1.0, 0.0, //
    0.0, 0.0, 0.0, 1.0,
];

/// A node of the object scene tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Object3D {
    pub uuid: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type")]
    kind: String,
    /// Local transform, row-major.
    #[serde(default = "identity")]
    pub matrix: [f64; 16],
    #[serde(default, with = "crate::keyed")]
    children: IndexMap<String, Object3D>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geometry: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub material: Option<String>,
    #[serde(default)]
    pub user_data: IndexMap<String, String>,
    pub visible: bool,
    pub cast_shadow: bool,
    pub receive_shadow: bool,
}

fn identity() -> [f64; 16] {
    IDENTITY_MATRIX
}

impl Object3D {
    /// Create a node; a blank `kind` falls back to `"Object3D"`.
    pub fn new(kind: &str, uuid: impl Into<String>) -> Self {
        let kind = if kind.trim().is_empty() {
            DEFAULT_TYPE
        } else {
            kind
        };

        Self {
            uuid: uuid.into(),
            name: String::new(),
            kind: kind.to_string(),
            matrix: IDENTITY_MATRIX,
            children: IndexMap::new(),
            geometry: None,
            material: None,
            user_data: IndexMap::new(),
            visible: true,
            cast_shadow: true,
            receive_shadow: false,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// The node's type tag.
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Replace the local transform (row-major).
    pub fn set_matrix(&mut self, matrix: [f64; 16]) {
        self.matrix = matrix;
    }

    pub fn user_data_mut(&mut self) -> &mut IndexMap<String, String> {
        &mut self.user_data
    }

    /// Add a child; returns `false` and drops `child` if its UUID is already present.
    pub fn add_child(&mut self, child: Object3D) -> bool {
        if self.children.contains_key(&child.uuid) {
            return false;
        }
        self.children.insert(child.uuid.clone(), child);
        true
    }

    pub fn has_child(&self, uuid: &str) -> bool {
        self.children.contains_key(uuid)
    }

    pub fn child(&self, uuid: &str) -> Option<&Object3D> {
        self.children.get(uuid)
    }

    pub fn child_mut(&mut self, uuid: &str) -> Option<&mut Object3D> {
        self.children.get_mut(uuid)
    }

    /// Remove a child, keeping the order of the remaining ones.
    pub fn remove_child(&mut self, uuid: &str) -> Option<Object3D> {
        self.children.shift_remove(uuid)
    }

    /// Children in insertion order.
    pub fn children(&self) -> impl Iterator<Item = &Object3D> {
        self.children.values()
    }

    pub fn children_mut(&mut self) -> impl Iterator<Item = &mut Object3D> {
        self.children.values_mut()
    }

    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    /// Keep only the children for which `keep` returns `true`.
    pub fn retain_children(&mut self, mut keep: impl FnMut(&Object3D) -> bool) {
        self.children.retain(|_, child| keep(child));
    }

    /// Visit this node and all descendants depth-first, parents before children.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a Object3D)) {
        visit(self);
        for child in self.children.values() {
            child.walk(visit);
        }
    }

    /// Mutable depth-first visit, parents before children.
    pub fn walk_mut(&mut self, visit: &mut impl FnMut(&mut Object3D)) {
        visit(self);
        for child in self.children.values_mut() {
            child.walk_mut(visit);
        }
    }

    /// Merge `entries` into the user data; later keys overwrite earlier ones.
    pub fn merge_user_data<I, K, V>(&mut self, entries: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (key, value) in entries {
            self.user_data.insert(key.into(), value.into());
        }
    }
}
