//! Capability lookups across composite boundaries.

use std::sync::Arc;

use strata_core::{ObjectRef, TypeId};

use crate::descriptor::{Slot, TypeDescriptor};
use crate::heap::ObjectHeap;
use crate::registry::TypeRegistry;

/// Find the object that provides `target` as seen from `object`.
///
/// Checks, in order: `object` itself; the aspects of `object` when it is
/// a composite; then each enclosing composite outward, testing the
/// composite and then its other aspects. The aspect the search came
/// from is never tested twice.
pub fn aspect_cast(
    heap: &ObjectHeap,
    types: &TypeRegistry,
    object: ObjectRef,
    target: TypeId,
) -> Option<ObjectRef> {
    let ty = types.get(heap.type_of(object)?)?;
    if ty.provides(target, types) {
        return Some(object);
    }
    if let Some(composite) = ty.as_composite() {
        if let Some(found) = composite.find_aspect_of_type(object, target, types, None) {
            return Some(found);
        }
    }

    let mut came_from = object;
    let mut current = heap.enclosing(object);
    while let Some(parent) = current {
        let parent_ty = types.get(heap.type_of(parent)?)?;
        if parent_ty.provides(target, types) {
            return Some(parent);
        }
        if let Some(composite) = parent_ty.as_composite() {
            if let Some(found) = composite.find_aspect_of_type(parent, target, types, Some(came_from)) {
                return Some(found);
            }
        }
        came_from = parent;
        current = heap.enclosing(parent);
    }
    None
}

/// A slot resolved on a concrete object.
#[derive(Clone, Debug)]
pub struct SlotTarget {
    /// The object (or aspect) the slot runs against.
    pub owner: ObjectRef,
    /// Descriptor of `owner` used to resolve field names.
    pub ty: Arc<dyn TypeDescriptor>,
    index: usize,
}

impl SlotTarget {
    /// The resolved slot.
    pub fn slot(&self) -> &Slot {
        &self.ty.slots()[self.index]
    }
}

/// Find slot `name` on `object`, searching a composite's base first and
/// then its aspects in order.
pub fn find_slot(
    heap: &ObjectHeap,
    types: &TypeRegistry,
    object: ObjectRef,
    name: &str,
) -> Option<SlotTarget> {
    let ty = types.get(heap.type_of(object)?)?;
    find_slot_in(ty, object, name)
}

fn find_slot_in(ty: &Arc<dyn TypeDescriptor>, place: ObjectRef, name: &str) -> Option<SlotTarget> {
    if let Some(composite) = ty.as_composite() {
        if let Some(found) = find_slot_in(composite.base(), place, name) {
            return Some(found);
        }
        return composite
            .aspects()
            .enumerate()
            .find_map(|(i, aspect)| find_slot_in(aspect, place.offset_by(composite.offset_of_element(i)), name));
    }
    let index = ty.slots().iter().position(|s| s.name == name)?;
    Some(SlotTarget {
        owner: place,
        ty: Arc::clone(ty),
        index,
    })
}
