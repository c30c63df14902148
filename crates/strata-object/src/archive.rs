//! Moving objects to and from tree nodes.
//!
//! An object is written as a map with a `class` key naming its type, an
//! `id` key naming the object, and one key per attribute. References
//! are written as the id of the referenced object's outermost composite;
//! signals as an array of `{receiver, slot}` maps. On the way back in,
//! references and signal bindings are only recorded; they are resolved
//! by [`DeferredQueue::flush`](crate::DeferredQueue::flush) once every
//! object of the scene exists.

use std::sync::Arc;

use strata_core::{LoadIssue, ObjectError, ObjectRef};
use strata_tree::{NodeKind, NodeMut, NodeRef, TreeError};
use tracing::{debug, warn};

use crate::deferred::{DeferredQueue, DeferredReference, DeferredSignal};
use crate::descriptor::{Attribute, FieldKind};
use crate::heap::{Cell, ObjectHeap};
use crate::space::ObjectSpace;

/// Key holding an object's type name.
pub const CLASS_KEY: &str = "class";
/// Key holding an object's id.
pub const ID_KEY: &str = "id";
/// Key of a signal connection's receiver id.
pub const RECEIVER_KEY: &str = "receiver";
/// Key of a signal connection's slot name.
pub const SLOT_KEY: &str = "slot";

/// Read access to the space being saved.
pub struct SerializeCx<'a> {
    space: &'a dyn ObjectSpace,
}

impl<'a> SerializeCx<'a> {
    /// Serialize against `space`.
    pub fn new(space: &'a dyn ObjectSpace) -> Self {
        Self { space }
    }

    /// Object memory.
    pub fn heap(&self) -> &'a ObjectHeap {
        self.space.heap()
    }

    /// The id written for a reference to `object`: the id of its
    /// outermost composite.
    pub fn id_of(&self, object: ObjectRef) -> Option<&'a str> {
        self.space.object_id(self.space.heap().topmost(object))
    }
}

/// Write access for loading fields, plus the queue of pending links.
pub struct DeserializeCx<'a> {
    heap: &'a mut ObjectHeap,
    deferred: &'a mut DeferredQueue,
}

impl<'a> DeserializeCx<'a> {
    /// Load into `heap`, recording links in `deferred`.
    pub fn new(heap: &'a mut ObjectHeap, deferred: &'a mut DeferredQueue) -> Self {
        Self { heap, deferred }
    }

    /// Object memory.
    pub fn heap_mut(&mut self) -> &mut ObjectHeap {
        &mut *self.heap
    }

    /// Pending links.
    pub fn deferred(&mut self) -> &mut DeferredQueue {
        &mut *self.deferred
    }
}

/// Write `attributes` of the object at `place` into `node`.
///
/// Null references and unconnected signals are written as empty nodes.
pub fn write_fields(attributes: &[Attribute], place: ObjectRef, mut node: NodeMut<'_>, cx: &SerializeCx<'_>) {
    for attr in attributes {
        let Some(cell) = cx.heap().cell(place.cell(attr.offset)) else {
            continue;
        };
        let mut child = node.reborrow().key(&attr.name);
        match cell {
            Cell::Integer(v) => child.set(*v),
            Cell::Float(v) => child.set(*v),
            Cell::String(v) => child.set(v.as_str()),
            Cell::Reference(Some(target)) => match cx.id_of(*target) {
                Some(id) => child.set(id),
                None => child.clear(),
            },
            Cell::Signal(connections) if !connections.is_empty() => {
                child.reset(NodeKind::Array);
                for connection in connections {
                    let Some(receiver) = cx.id_of(connection.receiver) else {
                        continue;
                    };
                    let mut entry = child.reborrow().push();
                    entry.reborrow().key(RECEIVER_KEY).set(receiver);
                    entry.key(SLOT_KEY).set(connection.slot.as_str());
                }
            }
            Cell::Reference(None) | Cell::Signal(_) | Cell::Vacant | Cell::Header(_) => child.clear(),
        }
    }
}

/// Read `attributes` of the object at `place` from `node`.
///
/// Absent keys leave the constructed default in place. A present key of
/// the wrong shape is skipped. References and signals are queued.
pub fn read_fields(attributes: &[Attribute], place: ObjectRef, node: NodeRef<'_>, cx: &mut DeserializeCx<'_>) {
    for attr in attributes {
        let child = node.key(&attr.name);
        if child.is_empty() {
            continue;
        }
        let at = place.cell(attr.offset);
        let result: Result<(), TreeError> = match attr.kind {
            FieldKind::Integer => child.get::<i64>().map(|v| cx.heap.set_cell(at, Cell::Integer(v))),
            FieldKind::Float => child.get::<f64>().map(|v| cx.heap.set_cell(at, Cell::Float(v))),
            FieldKind::String => child.get::<String>().map(|v| cx.heap.set_cell(at, Cell::String(v))),
            FieldKind::Reference { target } => child.get::<String>().map(|id| {
                cx.deferred.defer_reference(DeferredReference { cell: at, target, id });
            }),
            FieldKind::Signal => {
                for entry in child.elements() {
                    let receiver = entry.key(RECEIVER_KEY).get::<String>();
                    let slot = entry.key(SLOT_KEY).get::<String>();
                    match (receiver, slot) {
                        (Ok(receiver), Ok(slot)) => cx.deferred.defer_signal(DeferredSignal {
                            cell: at,
                            receiver,
                            slot,
                        }),
                        _ => debug!(attribute = %attr.name, "malformed signal binding skipped"),
                    }
                }
                Ok(())
            }
        };
        if let Err(error) = result {
            debug!(attribute = %attr.name, %error, "field left at default");
        }
    }
}

/// Write the object at `object` into `node`.
///
/// # Errors
///
/// [`ObjectError::NotLive`] if nothing is constructed at `object`.
pub fn serialize_object(space: &dyn ObjectSpace, object: ObjectRef, mut node: NodeMut<'_>) -> Result<(), ObjectError> {
    let ty = space
        .heap()
        .type_of(object)
        .and_then(|t| space.types().get(t))
        .ok_or(ObjectError::NotLive { object })?;
    node.reborrow().key(CLASS_KEY).set(ty.name());
    if let Some(id) = space.object_id(object) {
        node.reborrow().key(ID_KEY).set(id);
    }
    ty.serialize_raw(object, node, &SerializeCx::new(space));
    Ok(())
}

/// Create an object from `node` and load its fields.
///
/// Returns `None`, with an issue recorded, when the class is missing or
/// unknown or the object cannot be created.
pub fn deserialize_object(
    node: NodeRef<'_>,
    space: &mut dyn ObjectSpace,
    deferred: &mut DeferredQueue,
    issues: &mut Vec<LoadIssue>,
) -> Option<ObjectRef> {
    let class = node.key(CLASS_KEY).get::<String>().unwrap_or_default();
    let types = Arc::clone(space.types());
    let Some(ty) = types.by_name(&class) else {
        let issue = LoadIssue::UnknownType { class };
        warn!(%issue, "object skipped");
        issues.push(issue);
        return None;
    };

    let requested = node.key(ID_KEY).get::<String>().unwrap_or_default();
    let object = match space.create_object(ty.type_id(), &requested) {
        Ok(object) => object,
        Err(reason) => {
            let issue = LoadIssue::CreateFailed { class, reason };
            warn!(%issue, "object skipped");
            issues.push(issue);
            return None;
        }
    };
    ty.deserialize_raw(object, node, &mut DeserializeCx::new(space.heap_mut(), deferred));
    Some(object)
}
