// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Recorded traversal streams and the driver that replays them.
//!
//! A recording is the flat, ordered list of callbacks the tessellation engine
//! would make. [`replay`] feeds it to an [`ExportContext`] with the engine's
//! nesting rules:
//!
//! - the context is polled for cancellation before every event
//! - `Skip` from an element or view begin drops the nested events but still
//!   delivers the matching end
//! - `Skip` from an instance, link or face begin drops the nested events and
//!   the matching end

use serde::{Deserialize, Serialize};

use crate::context::ExportContext;
use crate::error::{Error, Result};
use crate::host::ElementId;
use crate::nodes::{
    FaceNode, InstanceNode, LightNode, LinkNode, MaterialNode, PolymeshTopology,
    RenderNodeAction, RpcNode, ViewNode,
};

/// One engine callback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum TraversalEvent {
    ViewBegin(ViewNode),
    ViewEnd { id: ElementId },
    ElementBegin { id: ElementId },
    ElementEnd { id: ElementId },
    InstanceBegin(InstanceNode),
    InstanceEnd,
    LinkBegin(LinkNode),
    LinkEnd,
    FaceBegin(FaceNode),
    FaceEnd,
    Material(MaterialNode),
    Polymesh(PolymeshTopology),
    Light(LightNode),
    Rpc(RpcNode),
}

/// An open begin awaiting its end.
#[derive(Debug)]
enum Scope {
    View(ElementId),
    Element(ElementId),
    Instance(InstanceNode),
    Link(LinkNode),
    Face(FaceNode),
}

impl Scope {
    fn label(&self) -> &'static str {
        match self {
            Scope::View(_) => "view",
            Scope::Element(_) => "element",
            Scope::Instance(_) => "instance",
            Scope::Link(_) => "link",
            Scope::Face(_) => "face",
        }
    }

    /// Whether the end is still delivered after the begin returned `Skip`.
    fn ends_after_skip(&self) -> bool {
        matches!(self, Scope::View(_) | Scope::Element(_))
    }
}

/// Drive `context` through `events`, bracketed by `start` and `finish`.
///
/// Returns the first fatal error: an unbalanced stream, a transform stack
/// underflow reported by an end handler, or a failing `finish`.
pub fn replay<C, I>(events: I, context: &mut C) -> Result<()>
where
    C: ExportContext + ?Sized,
    I: IntoIterator<Item = TraversalEvent>,
{
    if !context.start() {
        tracing::warn!("Export context refused to start");
        return context.finish();
    }

    let mut open: Vec<Scope> = Vec::new();
    // depth of the scope whose begin returned Skip
    let mut skipped: Option<usize> = None;
    let mut delivered = 0usize;

    for event in events {
        if context.is_canceled() {
            tracing::debug!(delivered, "Traversal canceled");
            break;
        }

        match event {
            TraversalEvent::ViewBegin(mut node) => {
                let id = node.view_id;
                let action = match skipped {
                    None => context.on_view_begin(&mut node),
                    Some(_) => RenderNodeAction::Skip,
                };
                enter(&mut open, &mut skipped, Scope::View(id), action);
            }
            TraversalEvent::ElementBegin { id } => {
                let action = match skipped {
                    None => context.on_element_begin(id),
                    Some(_) => RenderNodeAction::Skip,
                };
                enter(&mut open, &mut skipped, Scope::Element(id), action);
            }
            TraversalEvent::InstanceBegin(node) => {
                let action = match skipped {
                    None => context.on_instance_begin(&node),
                    Some(_) => RenderNodeAction::Skip,
                };
                enter(&mut open, &mut skipped, Scope::Instance(node), action);
            }
            TraversalEvent::LinkBegin(node) => {
                let action = match skipped {
                    None => context.on_link_begin(&node),
                    Some(_) => RenderNodeAction::Skip,
                };
                enter(&mut open, &mut skipped, Scope::Link(node), action);
            }
            TraversalEvent::FaceBegin(node) => {
                let action = match skipped {
                    None => context.on_face_begin(&node),
                    Some(_) => RenderNodeAction::Skip,
                };
                enter(&mut open, &mut skipped, Scope::Face(node), action);
            }

            TraversalEvent::ViewEnd { id } => {
                let scope = leave(&mut open, "view", Some(id))?;
                if deliver_end(&scope, open.len(), &mut skipped) {
                    context.on_view_end(id);
                }
            }
            TraversalEvent::ElementEnd { id } => {
                let scope = leave(&mut open, "element", Some(id))?;
                if deliver_end(&scope, open.len(), &mut skipped) {
                    context.on_element_end(id);
                }
            }
            TraversalEvent::InstanceEnd => {
                let scope = leave(&mut open, "instance", None)?;
                if deliver_end(&scope, open.len(), &mut skipped) {
                    if let Scope::Instance(node) = &scope {
                        context.on_instance_end(node)?;
                    }
                }
            }
            TraversalEvent::LinkEnd => {
                let scope = leave(&mut open, "link", None)?;
                if deliver_end(&scope, open.len(), &mut skipped) {
                    if let Scope::Link(node) = &scope {
                        context.on_link_end(node)?;
                    }
                }
            }
            TraversalEvent::FaceEnd => {
                let scope = leave(&mut open, "face", None)?;
                if deliver_end(&scope, open.len(), &mut skipped) {
                    if let Scope::Face(node) = &scope {
                        context.on_face_end(node);
                    }
                }
            }

            _ if skipped.is_some() => continue,
            TraversalEvent::Material(node) => context.on_material(&node),
            TraversalEvent::Polymesh(node) => context.on_polymesh(&node),
            TraversalEvent::Light(node) => context.on_light(&node),
            TraversalEvent::Rpc(node) => context.on_rpc(&node),
        }
        delivered += 1;
    }

    if !context.is_canceled() && !open.is_empty() {
        let labels: Vec<&str> = open.iter().map(Scope::label).collect();
        return Err(Error::UnbalancedTraversal(format!(
            "stream ended with open scopes: {}",
            labels.join(" > ")
        )));
    }

    context.finish()
}

fn enter(open: &mut Vec<Scope>, skipped: &mut Option<usize>, scope: Scope, action: RenderNodeAction) {
    if skipped.is_none() && action == RenderNodeAction::Skip {
        *skipped = Some(open.len());
    }
    open.push(scope);
}

/// Pop the innermost scope, checking it matches the end event.
fn leave(open: &mut Vec<Scope>, expected: &'static str, id: Option<ElementId>) -> Result<Scope> {
    let scope = open
        .pop()
        .ok_or_else(|| Error::UnbalancedTraversal(format!("{expected} end without begin")))?;

    let matches = match (&scope, id) {
        (Scope::View(open_id), Some(id)) | (Scope::Element(open_id), Some(id)) => {
            scope.label() == expected && *open_id == id
        }
        (_, None) => scope.label() == expected,
        _ => false,
    };
    if !matches {
        return Err(Error::UnbalancedTraversal(format!(
            "{expected} end closes an open {}",
            scope.label()
        )));
    }
    Ok(scope)
}

/// Decide whether the end of `scope` reaches the context, clearing the skip
/// marker when the skipped scope itself closes.
fn deliver_end(scope: &Scope, depth: usize, skipped: &mut Option<usize>) -> bool {
    match *skipped {
        Some(at) if depth > at => false,
        Some(_) => {
            *skipped = None;
            scope.ends_after_skip()
        }
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Context that records delivered callbacks and skips what it is told to.
    #[derive(Default)]
    struct Probe {
        log: Vec<String>,
        skip_elements: Vec<ElementId>,
        skip_instances: bool,
        cancel_on_polymesh: bool,
        canceled: bool,
    }

    impl ExportContext for Probe {
        fn start(&mut self) -> bool {
            self.log.push("start".into());
            true
        }
        fn finish(&mut self) -> Result<()> {
            self.log.push("finish".into());
            Ok(())
        }
        fn is_canceled(&self) -> bool {
            self.canceled
        }
        fn on_view_begin(&mut self, _node: &mut ViewNode) -> RenderNodeAction {
            self.log.push("view+".into());
            RenderNodeAction::Proceed
        }
        fn on_view_end(&mut self, _id: ElementId) {
            self.log.push("view-".into());
        }
        fn on_element_begin(&mut self, id: ElementId) -> RenderNodeAction {
            self.log.push(format!("element+{id}"));
            if self.skip_elements.contains(&id) {
                RenderNodeAction::Skip
            } else {
                RenderNodeAction::Proceed
            }
        }
        fn on_element_end(&mut self, id: ElementId) {
            self.log.push(format!("element-{id}"));
        }
        fn on_instance_begin(&mut self, _node: &InstanceNode) -> RenderNodeAction {
            self.log.push("instance+".into());
            if self.skip_instances {
                RenderNodeAction::Skip
            } else {
                RenderNodeAction::Proceed
            }
        }
        fn on_instance_end(&mut self, _node: &InstanceNode) -> Result<()> {
            self.log.push("instance-".into());
            Ok(())
        }
        fn on_link_begin(&mut self, _node: &LinkNode) -> RenderNodeAction {
            RenderNodeAction::Proceed
        }
        fn on_link_end(&mut self, _node: &LinkNode) -> Result<()> {
            Ok(())
        }
        fn on_material(&mut self, _node: &MaterialNode) {
            self.log.push("material".into());
        }
        fn on_polymesh(&mut self, _node: &PolymeshTopology) {
            self.log.push("polymesh".into());
            if self.cancel_on_polymesh {
                self.canceled = true;
            }
        }
    }

    fn element(id: i64, inner: Vec<TraversalEvent>) -> Vec<TraversalEvent> {
        let id = ElementId(id);
        let mut events = vec![TraversalEvent::ElementBegin { id }];
        events.extend(inner);
        events.push(TraversalEvent::ElementEnd { id });
        events
    }

    fn instance(inner: Vec<TraversalEvent>) -> Vec<TraversalEvent> {
        let mut events = vec![TraversalEvent::InstanceBegin(InstanceNode::default())];
        events.extend(inner);
        events.push(TraversalEvent::InstanceEnd);
        events
    }

    fn mesh() -> TraversalEvent {
        TraversalEvent::Polymesh(PolymeshTopology::default())
    }

    #[test]
    fn skipped_element_still_ends() {
        let mut probe = Probe {
            skip_elements: vec![ElementId(1)],
            ..Probe::default()
        };
        let mut events = element(1, instance(vec![mesh()]));
        events.extend(element(2, vec![mesh()]));

        replay(events, &mut probe).unwrap();
        assert_eq!(
            probe.log,
            vec!["start", "element+1", "element-1", "element+2", "polymesh", "element-2", "finish"]
        );
    }

    #[test]
    fn skipped_instance_drops_its_end() {
        let mut probe = Probe {
            skip_instances: true,
            ..Probe::default()
        };
        let events = element(1, instance(vec![mesh()]));

        replay(events, &mut probe).unwrap();
        assert_eq!(
            probe.log,
            vec!["start", "element+1", "instance+", "element-1", "finish"]
        );
    }

    #[test]
    fn cancellation_stops_delivery() {
        let mut probe = Probe {
            cancel_on_polymesh: true,
            ..Probe::default()
        };
        let mut events = element(1, vec![mesh(), mesh()]);
        events.extend(element(2, vec![mesh()]));

        replay(events, &mut probe).unwrap();
        assert_eq!(probe.log, vec!["start", "element+1", "polymesh", "finish"]);
        assert!(probe.is_canceled());
    }

    #[test]
    fn rejects_unbalanced_streams() {
        let mut probe = Probe::default();
        let err = replay(vec![TraversalEvent::InstanceEnd], &mut probe).unwrap_err();
        assert!(matches!(err, Error::UnbalancedTraversal(_)));

        let mut probe = Probe::default();
        let events = vec![TraversalEvent::ElementBegin { id: ElementId(1) }];
        assert!(matches!(
            replay(events, &mut probe),
            Err(Error::UnbalancedTraversal(_))
        ));

        let mut probe = Probe::default();
        let events = vec![
            TraversalEvent::ElementBegin { id: ElementId(1) },
            TraversalEvent::ElementEnd { id: ElementId(2) },
        ];
        assert!(matches!(
            replay(events, &mut probe),
            Err(Error::UnbalancedTraversal(_))
        ));
    }

    #[test]
    fn events_use_snake_case_tags() {
        let json = serde_json::to_value(TraversalEvent::ElementBegin { id: ElementId(7) }).unwrap();
        assert_eq!(json, serde_json::json!({"event": "element_begin", "id": 7}));

        let back: TraversalEvent = serde_json::from_str(r#"{"event": "instance_end"}"#).unwrap();
        assert_eq!(back, TraversalEvent::InstanceEnd);
    }
}
