//! Composite types: a base object type with aspects embedded after it.
//!
//! Layout of a composite with base `B` and aspects `A0, A1, ...`:
//!
//! ```text
//!   offset 0          B.size()          B.size()+A0.size()
//!   | B (header, fields) | A0 (header, fields) | A1 ...
//! ```
//!
//! The base header is retyped to the composite; every aspect header
//! records its own offset so `ObjectHeap::enclosing` can walk back to
//! the composite.

use std::fmt;
use std::sync::Arc;

use smallvec::SmallVec;
use strata_core::{ObjectRef, TypeId};
use strata_tree::{NodeMut, NodeRef};

use crate::archive::{DeserializeCx, SerializeCx};
use crate::descriptor::{Attribute, Slot, TypeDescriptor};
use crate::error::TypeError;
use crate::heap::ObjectHeap;
use crate::registry::TypeRegistry;
use crate::view::{ObjectMut, UpdateCx};

/// A type assembled from a base type and a list of aspect types.
///
/// Aspects can be added until the composite is registered; from then on
/// it is frozen.
pub struct CompositeType {
    id: TypeId,
    name: String,
    base: Arc<dyn TypeDescriptor>,
    aspects: Vec<Arc<dyn TypeDescriptor>>,
    offsets: SmallVec<[usize; 8]>,
    size: usize,
    exposed: Vec<Attribute>,
    frozen: bool,
}

impl CompositeType {
    /// An unregistered composite over `base`.
    ///
    /// Prefer [`TypeRegistry::new_composite`], which resolves the base by id.
    pub fn new(name: impl Into<String>, base: Arc<dyn TypeDescriptor>) -> Self {
        let size = base.size();
        let exposed = base.attributes().to_vec();
        Self {
            id: TypeRegistry::UNASSIGNED,
            name: name.into(),
            base,
            aspects: Vec::new(),
            offsets: SmallVec::new(),
            size,
            exposed,
            frozen: false,
        }
    }

    /// Append an aspect after the existing ones.
    ///
    /// # Errors
    ///
    /// [`TypeError::Frozen`] once registered; [`TypeError::InvalidLayout`]
    /// for abstract aspects and for aspects repeating an attribute name
    /// the composite already exposes.
    pub fn add_aspect(&mut self, aspect: Arc<dyn TypeDescriptor>) -> Result<(), TypeError> {
        if self.frozen {
            return Err(TypeError::Frozen {
                name: self.name.clone(),
            });
        }
        if aspect.is_abstract() {
            return Err(TypeError::InvalidLayout {
                name: self.name.clone(),
                reason: format!("aspect '{}' is abstract", aspect.name()),
            });
        }
        if let Some(clash) = aspect
            .attributes()
            .iter()
            .find(|a| self.exposed.iter().any(|e| e.name == a.name))
        {
            return Err(TypeError::InvalidLayout {
                name: self.name.clone(),
                reason: format!("aspect '{}' repeats attribute '{}'", aspect.name(), clash.name),
            });
        }
        let offset = self.size;
        self.size += aspect.size();
        self.exposed
            .extend(aspect.attributes().iter().map(|a| a.rebased(offset)));
        self.offsets.push(offset);
        self.aspects.push(aspect);
        Ok(())
    }

    /// Stop accepting aspects.
    pub fn freeze(&mut self) {
        self.frozen = true;
    }

    /// Whether aspects can still be added.
    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    pub(crate) fn assign_id(&mut self, id: TypeId) {
        self.id = id;
    }

    /// The base type.
    pub fn base(&self) -> &Arc<dyn TypeDescriptor> {
        &self.base
    }

    /// Cells occupied by the base part.
    pub fn base_size(&self) -> usize {
        self.base.size()
    }

    /// Aspect descriptors in layout order.
    pub fn aspects(&self) -> impl ExactSizeIterator<Item = &Arc<dyn TypeDescriptor>> {
        self.aspects.iter()
    }

    /// Offset of aspect `index`: the base size plus the sizes of every
    /// earlier aspect.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range.
    pub fn offset_of_element(&self, index: usize) -> usize {
        self.offsets[index]
    }

    /// The first aspect of `object` providing `target`, skipping the one
    /// at `skip`.
    pub fn find_aspect_of_type(
        &self,
        object: ObjectRef,
        target: TypeId,
        types: &TypeRegistry,
        skip: Option<ObjectRef>,
    ) -> Option<ObjectRef> {
        self.aspects
            .iter()
            .zip(&self.offsets)
            .map(|(aspect, &offset)| (aspect, object.offset_by(offset)))
            .find(|(aspect, at)| Some(*at) != skip && aspect.provides(target, types))
            .map(|(_, at)| at)
    }

    fn elements(&self, place: ObjectRef) -> impl DoubleEndedIterator<Item = (&Arc<dyn TypeDescriptor>, ObjectRef)> + '_ {
        self.aspects
            .iter()
            .zip(self.offsets.iter())
            .map(move |(aspect, &offset)| (aspect, place.offset_by(offset)))
    }
}

impl fmt::Debug for CompositeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let aspects: Vec<&str> = self.aspects.iter().map(|a| a.name()).collect();
        f.debug_struct("CompositeType")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("base", &self.base.name())
            .field("aspects", &aspects)
            .field("offsets", &self.offsets)
            .field("size", &self.size)
            .field("frozen", &self.frozen)
            .finish()
    }
}

impl TypeDescriptor for CompositeType {
    fn type_id(&self) -> TypeId {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn super_type(&self) -> Option<TypeId> {
        Some(self.base.type_id())
    }

    fn size(&self) -> usize {
        self.size
    }

    fn alignment(&self) -> usize {
        self.aspects
            .iter()
            .map(|a| a.alignment())
            .fold(self.base.alignment(), usize::max)
    }

    fn construct(&self, place: ObjectRef, heap: &mut ObjectHeap) {
        self.base.construct(place, heap);
        if let Some(header) = heap.header_mut(place) {
            header.ty = self.id;
        }
        for (aspect, at) in self.elements(place) {
            aspect.construct(at, heap);
            if let Some(header) = heap.header_mut(at) {
                header.offset = (at.index() - place.index()) as u32;
            }
        }
    }

    fn destruct(&self, place: ObjectRef, heap: &mut ObjectHeap) {
        for (aspect, at) in self.elements(place).rev() {
            aspect.destruct(at, heap);
        }
        self.base.destruct(place, heap);
    }

    fn serialize_raw(&self, place: ObjectRef, mut node: NodeMut<'_>, cx: &SerializeCx<'_>) {
        self.base.serialize_raw(place, node.reborrow(), cx);
        for (aspect, at) in self.elements(place) {
            aspect.serialize_raw(at, node.reborrow(), cx);
        }
    }

    fn deserialize_raw(&self, place: ObjectRef, node: NodeRef<'_>, cx: &mut DeserializeCx<'_>) {
        self.base.deserialize_raw(place, node, cx);
        for (aspect, at) in self.elements(place) {
            aspect.deserialize_raw(at, node, cx);
        }
    }

    fn element_count(&self) -> usize {
        self.aspects.len()
    }

    fn offset_of(&self, index: usize) -> Option<usize> {
        self.offsets.get(index).copied()
    }

    fn type_of(&self, index: usize) -> Option<&Arc<dyn TypeDescriptor>> {
        self.aspects.get(index)
    }

    fn attributes(&self) -> &[Attribute] {
        &self.exposed
    }

    fn slots(&self) -> &[Slot] {
        self.base.slots()
    }

    fn wants_update(&self) -> bool {
        self.base.wants_update() || self.aspects.iter().any(|a| a.wants_update())
    }

    fn update(&self, cx: &mut UpdateCx<'_>, delta: f64) {
        let place = cx.object();
        if self.base.wants_update() {
            self.base.update(&mut cx.retarget(place, &*self.base), delta);
        }
        for (aspect, at) in self.elements(place) {
            if aspect.wants_update() {
                aspect.update(&mut cx.retarget(at, &**aspect), delta);
            }
        }
    }

    fn initialize(&self, object: &mut ObjectMut<'_>) {
        let place = object.object();
        self.base.initialize(&mut object.reborrow(place, &*self.base));
        for (aspect, at) in self.elements(place) {
            aspect.initialize(&mut object.reborrow(at, &**aspect));
        }
    }

    fn as_composite(&self) -> Option<&CompositeType> {
        Some(self)
    }
}
