// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Assembles an [`ObjectScene`] from traversal callbacks.
//!
//! Per-event handlers never abort the traversal. Bad input is logged, the
//! sticky cancellation flag is raised and the handler returns, so whatever
//! was assembled so far can still be written out.

use nalgebra::Point3;
use objscene_core::{Metadata, Object3D, ObjectScene, ELEMENT_TYPE, GENERATOR, VIEW_TYPE};
use objscene_geometry::{to_scene_point, Point3D, TransformStack};

use crate::config::ExportConfig;
use crate::context::ExportContext;
use crate::current_set::CurrentSet;
use crate::error::{Error, Result};
use crate::host::{Document, ElementId};
use crate::materials::{inline_to_phong, persisted_to_phong};
use crate::nodes::{
    InstanceNode, LinkNode, MaterialNode, PolymeshTopology, RenderNodeAction, Transform,
    ViewNode,
};
use crate::user_data::MetadataPolicy;

pub struct ObjectSceneExportContext<'d, D: Document + ?Sized> {
    document: &'d D,
    view: Option<ElementId>,
    config: ExportConfig,
    policy: MetadataPolicy,
    transforms: TransformStack,
    // open element, if any
    current: Option<CurrentSet>,
    // geometry emitted directly under the view, outside any element
    view_set: Option<CurrentSet>,
    scene: Option<ObjectScene>,
    canceled: bool,
}

impl<'d, D: Document + ?Sized> ObjectSceneExportContext<'d, D> {
    /// Create a context exporting `view`, or the document's active view when `None`.
    pub fn new(document: &'d D, view: Option<ElementId>, config: ExportConfig) -> Result<Self> {
        config.validate()?;
        if document.is_family_document() {
            return Err(Error::FamilyDocument);
        }

        Ok(Self {
            document,
            view,
            policy: MetadataPolicy::from_config(&config),
            config,
            transforms: TransformStack::new(),
            current: None,
            view_set: None,
            scene: None,
            canceled: false,
        })
    }

    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    pub fn scene(&self) -> Option<&ObjectScene> {
        self.scene.as_ref()
    }

    pub fn into_scene(self) -> Option<ObjectScene> {
        self.scene
    }

    fn fail(&mut self, stage: &'static str, err: Error) {
        tracing::error!(stage, error = %err, "Export handler failed, canceling");
        self.canceled = true;
    }

    fn scene_mut(&mut self) -> Result<&mut ObjectScene> {
        self.scene.as_mut().ok_or(Error::SceneMissing)
    }

    /// The open element's set, else the view-level set.
    fn active_set_mut(&mut self) -> Result<&mut CurrentSet> {
        self.current
            .as_mut()
            .or(self.view_set.as_mut())
            .ok_or(Error::NoActiveElement)
    }

    fn push_transform(&mut self, name: &str, transform: &Transform) -> Result<()> {
        if !transform.is_finite() {
            return Err(Error::InvalidTransform(name.to_string()));
        }
        self.transforms.push(&transform.to_matrix());
        Ok(())
    }

    /// Register the material if needed and make it current for the active element.
    fn activate_material(&mut self, uuid: &str) -> Result<()> {
        if uuid.trim().is_empty() {
            return Err(Error::InvalidMaterialUuid);
        }

        let document = self.document;
        let scene = self.scene.as_mut().ok_or(Error::SceneMissing)?;
        if !scene.has_material(uuid) {
            let material = document
                .material_by_unique_id(uuid)
                .ok_or_else(|| Error::MaterialNotFound(uuid.to_string()))?;
            scene.add_material(persisted_to_phong(material));
        }

        self.active_set_mut()?.set_material(uuid)
    }

    fn begin_element(&mut self, id: ElementId) -> Result<RenderNodeAction> {
        let document = self.document;
        let Some(element) = document.element(id) else {
            tracing::warn!(element = %id, "Element not found, skipping");
            return Ok(RenderNodeAction::Skip);
        };
        let uid = element.unique_id.as_str();
        if uid.trim().is_empty() {
            tracing::warn!(element = %id, "Element has no unique id, skipping");
            return Ok(RenderNodeAction::Skip);
        }

        tracing::debug!(
            element = %id,
            category = element.category.as_ref().map_or("", |c| c.name.as_str()),
            name = %element.name,
            "Element begin"
        );

        if self.scene_mut()?.object.has_child(uid) {
            tracing::debug!(element = %id, "Duplicate element, skipping");
            return Ok(RenderNodeAction::Skip);
        }
        let Some(category) = &element.category else {
            tracing::debug!(element = %id, "Element without category, skipping");
            return Ok(RenderNodeAction::Skip);
        };

        if element.material_ids.len() > 1 {
            let names: Vec<&str> = element
                .material_ids
                .iter()
                .map(|&m| document.material(m).map_or("<missing>", |m| m.name.as_str()))
                .collect();
            tracing::debug!(
                element = %element.description(),
                count = names.len(),
                materials = %names.join(", "),
                "Element has several materials"
            );
        }

        // the shell itself is never rendered, so it carries no material
        self.current = Some(CurrentSet::new(
            Object3D::new(ELEMENT_TYPE, uid).with_name(element.description()),
        ));

        if let Some(material) = category.material.and_then(|m| document.material(m)) {
            self.activate_material(&material.unique_id)?;
        }
        Ok(RenderNodeAction::Proceed)
    }

    fn end_element(&mut self, id: ElementId, current: Option<CurrentSet>) -> Result<()> {
        let document = self.document;
        let Some(element) = document.element(id) else {
            tracing::warn!(element = %id, "Element not found at end, skipping");
            return Ok(());
        };
        if element.is_level() {
            return Ok(());
        }

        let uid = element.unique_id.as_str();
        if uid.trim().is_empty() || self.scene_mut()?.object.has_child(uid) {
            tracing::debug!(element = %id, "Duplicate element, skipping");
            return Ok(());
        }
        if element.category.is_none() {
            tracing::debug!(element = %id, "Element without category, skipping");
            return Ok(());
        }

        let current = current.ok_or(Error::NoActiveElement)?;
        let partitions = current.partition_count();
        let scene = self.scene.as_mut().ok_or(Error::SceneMissing)?;
        let mut shell = current.flush(scene);

        if let Some(symbol) = self.policy.matching_symbol(element) {
            shell.merge_user_data(self.policy.harvest(element, symbol));
        }

        tracing::debug!(element = %id, partitions, "Element end");
        scene.object.add_child(shell);
        Ok(())
    }

    fn end_view(&mut self, id: ElementId, current: Option<CurrentSet>) -> Result<()> {
        let document = self.document;
        let element = document.element(id).ok_or(Error::ElementNotFound(id))?;
        let uid = element.unique_id.as_str();
        let scene = self.scene.as_mut().ok_or(Error::SceneMissing)?;
        if scene.object.has_child(uid) {
            tracing::debug!(view = %id, "Duplicate view, skipping");
            return Ok(());
        }

        match current {
            Some(current) if current.uuid() == uid && !current.is_empty() => {
                let shell = current.flush(scene);
                scene.object.add_child(shell);
            }
            _ => tracing::trace!(view = %id, "No view-level geometry"),
        }
        Ok(())
    }

    fn ingest_polymesh(&mut self, node: &PolymeshTopology) -> Result<()> {
        let mut points: Vec<Point3D> = Vec::with_capacity(node.points.len());
        for (index, p) in node.points.iter().enumerate() {
            let placed = self.transforms.transform_point(&Point3::from(*p));
            if !placed.coords.iter().all(|c| c.is_finite()) {
                return Err(Error::InvalidPoint { index });
            }
            points.push(to_scene_point(&placed));
        }

        let current = self.active_set_mut()?;

        let corner = |index: usize| {
            points.get(index).copied().ok_or(Error::FacetOutOfRange {
                index,
                count: points.len(),
            })
        };
        for facet in &node.facets {
            current.add_facet([corner(facet.v1)?, corner(facet.v2)?, corner(facet.v3)?])?;
        }
        for uv in &node.uvs {
            current.add_uv(uv.u, uv.v)?;
        }

        tracing::trace!(
            element = %current.uuid(),
            points = points.len(),
            facets = node.facets.len(),
            "Polymesh"
        );
        Ok(())
    }

    fn apply_material(&mut self, node: &MaterialNode) -> Result<()> {
        let document = self.document;
        if node.material_id.is_valid() {
            if let Some(material) = document.material(node.material_id) {
                return self.activate_material(&material.unique_id);
            }
        }

        let material = inline_to_phong(node);
        let uuid = material.uuid.clone();
        self.scene_mut()?.add_material(material);
        self.activate_material(&uuid)
    }
}

impl<'d, D: Document + ?Sized> ExportContext for ObjectSceneExportContext<'d, D> {
    fn start(&mut self) -> bool {
        let document = self.document;
        let view = self
            .view
            .and_then(|id| document.element(id))
            .or_else(|| document.active_view());
        let Some(view) = view else {
            tracing::error!(title = %document.title(), "No view to export");
            self.canceled = true;
            return false;
        };

        let mut scene = ObjectScene::new(Metadata::default(), view.unique_id.clone());
        scene.object.name = format!("Revit {}", document.title());

        tracing::info!(
            view = %view.unique_id,
            title = %document.title(),
            generator = GENERATOR,
            "Export started"
        );
        self.scene = Some(scene);
        self.transforms.reset();
        self.current = None;
        self.view_set = None;
        true
    }

    fn finish(&mut self) -> Result<()> {
        let depth = self.transforms.depth();
        let optimize = self.config.optimize;
        let canceled = self.canceled;
        let scene = self.scene.as_mut().ok_or(Error::SceneMissing)?;

        if depth != 1 {
            tracing::warn!(depth, "Transform stack not back at its base");
        }
        if optimize {
            scene.optimize(true);
        }

        tracing::info!(
            elements = scene.object.child_count(),
            geometries = scene.geometry_count(),
            materials = scene.material_count(),
            canceled,
            "Export finished"
        );
        Ok(())
    }

    fn is_canceled(&self) -> bool {
        self.canceled
    }

    fn on_view_begin(&mut self, node: &mut ViewNode) -> RenderNodeAction {
        node.level_of_detail = self.config.level_of_detail;

        let document = self.document;
        if let Some(view) = document.element(node.view_id) {
            if !view.unique_id.trim().is_empty() {
                let name = if node.name.is_empty() { &view.name } else { &node.name };
                self.view_set = Some(CurrentSet::new(
                    Object3D::new(VIEW_TYPE, view.unique_id.clone()).with_name(name.clone()),
                ));
            }
        }
        RenderNodeAction::Proceed
    }

    fn on_view_end(&mut self, id: ElementId) {
        let current = self.view_set.take();
        if let Err(err) = self.end_view(id, current) {
            self.fail("view end", err);
        }
    }

    fn on_element_begin(&mut self, id: ElementId) -> RenderNodeAction {
        match self.begin_element(id) {
            Ok(action) => action,
            Err(err) => {
                self.fail("element begin", err);
                RenderNodeAction::Skip
            }
        }
    }

    fn on_element_end(&mut self, id: ElementId) {
        let current = self.current.take();
        if let Err(err) = self.end_element(id, current) {
            self.fail("element end", err);
        }
    }

    fn on_instance_begin(&mut self, node: &InstanceNode) -> RenderNodeAction {
        tracing::trace!(name = %node.name, symbol = %node.symbol_id, "Instance begin");
        match self.push_transform(&node.name, &node.transform) {
            Ok(()) => RenderNodeAction::Proceed,
            Err(err) => {
                self.fail("instance begin", err);
                RenderNodeAction::Skip
            }
        }
    }

    fn on_instance_end(&mut self, _node: &InstanceNode) -> Result<()> {
        self.transforms.pop()?;
        Ok(())
    }

    fn on_link_begin(&mut self, node: &LinkNode) -> RenderNodeAction {
        tracing::debug!(
            name = %node.name,
            document = %node.document_title,
            symbol = %node.symbol_id,
            "Link begin"
        );
        match self.push_transform(&node.name, &node.transform) {
            Ok(()) => RenderNodeAction::Proceed,
            Err(err) => {
                self.fail("link begin", err);
                RenderNodeAction::Skip
            }
        }
    }

    fn on_link_end(&mut self, _node: &LinkNode) -> Result<()> {
        self.transforms.pop()?;
        Ok(())
    }

    fn on_material(&mut self, node: &MaterialNode) {
        if let Err(err) = self.apply_material(node) {
            self.fail("material", err);
        }
    }

    fn on_polymesh(&mut self, node: &PolymeshTopology) {
        if let Err(err) = self.ingest_polymesh(node) {
            self.fail("polymesh", err);
        }
    }
}
