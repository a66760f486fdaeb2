// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! In-memory host document and recorded traversals.
//!
//! Lets the pipeline run without the authoring tool: a [`Recording`] holds a
//! snapshot of the document plus the events the engine emitted for it.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::config::ExportConfig;
use crate::error::Result;
use crate::exporter::ObjectSceneExporter;
use crate::host::{Document, Element, ElementId, PersistedMaterial};
use crate::traversal::TraversalEvent;
use objscene_core::ObjectScene;

/// Serialized form of a [`MemoryDocument`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct DocumentRecord {
    title: String,
    #[serde(default)]
    is_family_document: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    active_view: Option<ElementId>,
    #[serde(default)]
    elements: Vec<Element>,
    #[serde(default)]
    materials: Vec<PersistedMaterial>,
}

/// A [`Document`] backed by plain vectors with id and unique-id lookups.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "DocumentRecord", into = "DocumentRecord")]
pub struct MemoryDocument {
    title: String,
    is_family_document: bool,
    active_view: Option<ElementId>,
    elements: Vec<Element>,
    materials: Vec<PersistedMaterial>,
    element_index: FxHashMap<ElementId, usize>,
    element_uid_index: FxHashMap<String, usize>,
    material_index: FxHashMap<ElementId, usize>,
    material_uid_index: FxHashMap<String, usize>,
}

impl From<DocumentRecord> for MemoryDocument {
    fn from(record: DocumentRecord) -> Self {
        let mut document = MemoryDocument::new(record.title);
        document.is_family_document = record.is_family_document;
        document.active_view = record.active_view;
        for element in record.elements {
            document.add_element(element);
        }
        for material in record.materials {
            document.add_material(material);
        }
        document
    }
}

impl From<MemoryDocument> for DocumentRecord {
    fn from(document: MemoryDocument) -> Self {
        Self {
            title: document.title,
            is_family_document: document.is_family_document,
            active_view: document.active_view,
            elements: document.elements,
            materials: document.materials,
        }
    }
}

impl MemoryDocument {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn set_family_document(&mut self, is_family_document: bool) {
        self.is_family_document = is_family_document;
    }

    pub fn set_active_view(&mut self, view: ElementId) {
        self.active_view = Some(view);
    }

    /// Add or replace an element.
    pub fn add_element(&mut self, element: Element) {
        if let Some(&slot) = self.element_index.get(&element.id) {
            self.element_uid_index.remove(&self.elements[slot].unique_id);
            self.element_uid_index.insert(element.unique_id.clone(), slot);
            self.elements[slot] = element;
            return;
        }
        let slot = self.elements.len();
        self.element_index.insert(element.id, slot);
        self.element_uid_index.insert(element.unique_id.clone(), slot);
        self.elements.push(element);
    }

    /// Add or replace a material.
    pub fn add_material(&mut self, material: PersistedMaterial) {
        if let Some(&slot) = self.material_index.get(&material.id) {
            self.material_uid_index.remove(&self.materials[slot].unique_id);
            self.material_uid_index.insert(material.unique_id.clone(), slot);
            self.materials[slot] = material;
            return;
        }
        let slot = self.materials.len();
        self.material_index.insert(material.id, slot);
        self.material_uid_index.insert(material.unique_id.clone(), slot);
        self.materials.push(material);
    }

    pub fn with_element(mut self, element: Element) -> Self {
        self.add_element(element);
        self
    }

    pub fn with_material(mut self, material: PersistedMaterial) -> Self {
        self.add_material(material);
        self
    }

    pub fn element_count(&self) -> usize {
        self.elements.len()
    }
}

impl Document for MemoryDocument {
    fn title(&self) -> &str {
        &self.title
    }

    fn is_family_document(&self) -> bool {
        self.is_family_document
    }

    fn active_view(&self) -> Option<&Element> {
        self.active_view.and_then(|id| self.element(id))
    }

    fn element(&self, id: ElementId) -> Option<&Element> {
        self.element_index.get(&id).map(|&slot| &self.elements[slot])
    }

    fn element_by_unique_id(&self, unique_id: &str) -> Option<&Element> {
        self.element_uid_index
            .get(unique_id)
            .map(|&slot| &self.elements[slot])
    }

    fn material(&self, id: ElementId) -> Option<&PersistedMaterial> {
        self.material_index.get(&id).map(|&slot| &self.materials[slot])
    }

    fn material_by_unique_id(&self, unique_id: &str) -> Option<&PersistedMaterial> {
        self.material_uid_index
            .get(unique_id)
            .map(|&slot| &self.materials[slot])
    }
}

/// A document snapshot plus the traversal recorded against it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Recording {
    pub document: MemoryDocument,
    /// View to export; the document's active view when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub view: Option<ElementId>,
    #[serde(default)]
    pub events: Vec<TraversalEvent>,
}

impl Recording {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let recording = Self::from_json(&text)?;
        tracing::debug!(
            path = %path.as_ref().display(),
            elements = recording.document.element_count(),
            events = recording.events.len(),
            "Loaded recording"
        );
        Ok(recording)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Replay the recorded events into a fresh scene.
    pub fn export(&self, config: ExportConfig) -> Result<ObjectScene> {
        ObjectSceneExporter::new(&self.document, config)?
            .try_export(self.view, self.events.iter().cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{Category, Color};

    fn document() -> MemoryDocument {
        MemoryDocument::new("Project1")
            .with_element(Element::new(1, "wall-1", "Wall").with_category(Category::new("Walls")))
            .with_material(PersistedMaterial::new(50, "mat-50", "Brick", Color::new(180, 60, 40)))
    }

    #[test]
    fn looks_up_by_id_and_unique_id() {
        let doc = document();
        assert_eq!(doc.element(ElementId(1)).unwrap().unique_id, "wall-1");
        assert_eq!(doc.element_by_unique_id("wall-1").unwrap().id, ElementId(1));
        assert_eq!(doc.material(ElementId(50)).unwrap().name, "Brick");
        assert!(doc.material_by_unique_id("mat-50").is_some());
        assert!(doc.element(ElementId(2)).is_none());
        assert!(doc.active_view().is_none());
    }

    #[test]
    fn replacing_an_element_reindexes_unique_id() {
        let mut doc = document();
        doc.add_element(Element::new(1, "wall-1b", "Wall"));
        assert_eq!(doc.element_count(), 1);
        assert!(doc.element_by_unique_id("wall-1").is_none());
        assert!(doc.element_by_unique_id("wall-1b").is_some());
    }

    #[test]
    fn survives_serde() {
        let json = serde_json::to_string(&document()).unwrap();
        let back: MemoryDocument = serde_json::from_str(&json).unwrap();
        assert_eq!(back.title(), "Project1");
        assert!(back.element_by_unique_id("wall-1").is_some());
        assert!(back.material(ElementId(50)).is_some());
    }
}
