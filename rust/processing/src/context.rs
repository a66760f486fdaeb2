// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Callback contract between the traversal engine and an exporter.
//!
//! The engine calls these synchronously, depth-first, with every begin
//! matched by exactly one end at the same depth. Handlers that hit bad input
//! are expected to log, set the cancellation flag and return; only stream
//! imbalance and finalization failures are returned as errors.

use crate::error::Result;
use crate::host::ElementId;
use crate::nodes::{
    FaceNode, InstanceNode, LightNode, LinkNode, MaterialNode, PolymeshTopology,
    RenderNodeAction, RpcNode, ViewNode,
};

pub trait ExportContext {
    /// Called before the first node. Returning `false` aborts the export.
    fn start(&mut self) -> bool;

    /// Called after the last node, also after cancellation.
    fn finish(&mut self) -> Result<()>;

    /// Polled by the engine between nodes; once `true` it stays `true`.
    fn is_canceled(&self) -> bool;

    fn on_view_begin(&mut self, node: &mut ViewNode) -> RenderNodeAction;

    fn on_view_end(&mut self, id: ElementId);

    fn on_element_begin(&mut self, id: ElementId) -> RenderNodeAction;

    fn on_element_end(&mut self, id: ElementId);

    fn on_instance_begin(&mut self, node: &InstanceNode) -> RenderNodeAction;

    fn on_instance_end(&mut self, node: &InstanceNode) -> Result<()>;

    fn on_link_begin(&mut self, node: &LinkNode) -> RenderNodeAction;

    fn on_link_end(&mut self, node: &LinkNode) -> Result<()>;

    fn on_material(&mut self, node: &MaterialNode);

    fn on_polymesh(&mut self, node: &PolymeshTopology);

    fn on_face_begin(&mut self, _node: &FaceNode) -> RenderNodeAction {
        RenderNodeAction::Proceed
    }

    fn on_face_end(&mut self, _node: &FaceNode) {}

    fn on_light(&mut self, _node: &LightNode) {}

    fn on_rpc(&mut self, _node: &RpcNode) {}
}
