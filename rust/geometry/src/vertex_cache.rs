// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Vertex welding for a single material partition.

use objscene_core::Geometry;
use rustc_hash::FxHashMap;

use crate::point::Point3D;

/// Assigns dense, first-seen indices to distinct points.
///
/// Indices are never reused or renumbered, so face records written while
/// ingesting stay valid for the final vertex buffer.
#[derive(Debug, Clone, Default)]
pub struct VertexIndexCache {
    indices: FxHashMap<Point3D, u32>,
    points: Vec<Point3D>,
}

impl VertexIndexCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the index of `point`, assigning the next free one if unseen.
    #[inline]
    pub fn add_vertex(&mut self, point: Point3D) -> u32 {
        if let Some(&index) = self.indices.get(&point) {
            return index;
        }
        let index = self.points.len() as u32;
        self.indices.insert(point, index);
        self.points.push(point);
        index
    }

    pub fn index_of(&self, point: &Point3D) -> Option<u32> {
        self.indices.get(point).copied()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Distinct points in index order.
    pub fn points(&self) -> &[Point3D] {
        &self.points
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, Point3D)> + '_ {
        self.points
            .iter()
            .enumerate()
            .map(|(index, point)| (index as u32, *point))
    }

    /// Append every welded point to the geometry's vertex buffer in index order.
    pub fn write_into(&self, geometry: &mut Geometry) {
        geometry.data.vertices.reserve(self.points.len() * 3);
        for point in &self.points {
            geometry.add_point(*point);
        }
    }
}
