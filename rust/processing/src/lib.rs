// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # ObjScene Processing
//!
//! Export pipeline from a host model traversal to an object scene document.
//!
//! The tessellation engine walks a 3D view depth-first and reports views,
//! elements, instance and link placements, material changes and polymeshes
//! through the [`ExportContext`] callbacks. [`ObjectSceneExportContext`]
//! turns that stream into an [`ObjectScene`](objscene_core::ObjectScene):
//!
//! - points are mapped through the accumulated instance transforms, converted
//!   to millimeters and welded per (element, material) partition
//! - persisted and inline materials are registered once each
//! - every exported element becomes a `RevitElement` node with one `Mesh`
//!   child per material
//!
//! Host access goes through the [`Document`] trait. [`MemoryDocument`] and
//! [`Recording`] provide an offline implementation used by the
//! `scene-replay` tool and the tests.
//!
//! ## Example
//!
//! ```rust
//! use objscene_processing::{
//!     Category, Color, Element, ElementId, ExportConfig, Facet, MaterialNode, MemoryDocument,
//!     ObjectSceneExporter, PolymeshTopology, TraversalEvent,
//! };
//!
//! let document = MemoryDocument::new("Project1")
//!     .with_element(Element::new(1, "view-1", "{3D}"))
//!     .with_element(Element::new(2, "wall-2", "Wall").with_category(Category::new("Walls")));
//!
//! let events = vec![
//!     TraversalEvent::ElementBegin { id: ElementId(2) },
//!     TraversalEvent::Material(MaterialNode::inline(Color::new(255, 0, 0), 0.0)),
//!     TraversalEvent::Polymesh(PolymeshTopology {
//!         points: vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
//!         facets: vec![Facet::new(0, 1, 2)],
//!         ..Default::default()
//!     }),
//!     TraversalEvent::ElementEnd { id: ElementId(2) },
//! ];
//!
//! let exporter = ObjectSceneExporter::new(&document, ExportConfig::default()).unwrap();
//! let scene = exporter.try_export(Some(ElementId(1)), events).unwrap();
//! assert_eq!(scene.object.child_count(), 1);
//! assert_eq!(scene.geometry_count(), 1);
//! ```

pub mod config;
pub mod context;
pub mod current_set;
pub mod error;
pub mod exporter;
pub mod host;
pub mod materials;
pub mod memory;
pub mod nodes;
pub mod scene_context;
pub mod traversal;
pub mod user_data;

pub use config::{ExportConfig, MAX_LEVEL_OF_DETAIL};
pub use context::ExportContext;
pub use current_set::{partition_key, CurrentSet, Partition};
pub use error::{Error, Result};
pub use exporter::{variant_output_path, ObjectSceneExporter};
pub use host::{
    BuiltInParameter, Category, Color, Document, Element, ElementId, ElementKind, FamilySymbol,
    Parameter, PersistedMaterial, StorageType,
};
pub use materials::{inline_material_uuid, inline_to_phong, persisted_to_phong};
pub use memory::{MemoryDocument, Recording};
pub use nodes::{
    FaceNode, Facet, InstanceNode, LightNode, LinkNode, MaterialNode, PolymeshTopology,
    RenderNodeAction, RpcNode, Transform, Uv, ViewNode,
};
pub use scene_context::ObjectSceneExportContext;
pub use traversal::{replay, TraversalEvent};
pub use user_data::{MetadataPolicy, HARVESTED_BUILT_INS};
