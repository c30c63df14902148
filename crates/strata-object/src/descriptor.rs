//! The type descriptor interface and the metadata it exposes.
//!
//! A [`TypeDescriptor`] is everything the runtime knows about a type:
//! its layout in heap cells, how to construct and destruct an instance,
//! how to move its fields to and from a tree node, and the optional
//! per-frame update and post-load initialization hooks. Object types
//! built with [`ObjectTypeBuilder`](crate::ObjectTypeBuilder) and
//! [`CompositeType`] both implement it; a host can register its own
//! implementations through
//! [`TypeRegistry::register_descriptor`](crate::TypeRegistry::register_descriptor).

use std::fmt;
use std::sync::Arc;

use strata_core::{ObjectRef, TypeId};
use strata_tree::{NodeMut, NodeRef, Scalar};

use crate::archive::{DeserializeCx, SerializeCx};
use crate::composite::CompositeType;
use crate::heap::{Cell, ObjectHeap};
use crate::registry::TypeRegistry;
use crate::view::{ObjectMut, UpdateCx};

/// Handler invoked when a signal connected to a slot is emitted.
pub type SlotFn = Arc<dyn Fn(&mut ObjectMut<'_>, &[Scalar]) + Send + Sync>;

/// Per-frame update hook. The second argument is the elapsed time.
pub type UpdateFn = Arc<dyn Fn(&mut UpdateCx<'_>, f64) + Send + Sync>;

/// Post-load initialization hook.
pub type InitFn = Arc<dyn Fn(&mut ObjectMut<'_>) + Send + Sync>;

/// Storage class of an attribute.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldKind {
    /// 64-bit signed integer.
    Integer,
    /// 64-bit float.
    Float,
    /// UTF-8 string.
    String,
    /// Reference to an object providing `target`.
    Reference {
        /// Capability the referenced object must provide.
        target: TypeId,
    },
    /// Signal carrying a list of slot connections.
    Signal,
}

impl FieldKind {
    /// The cell a freshly constructed field of this kind holds.
    pub fn default_cell(self) -> Cell {
        match self {
            Self::Integer => Cell::Integer(0),
            Self::Float => Cell::Float(0.0),
            Self::String => Cell::String(String::new()),
            Self::Reference { .. } => Cell::Reference(None),
            Self::Signal => Cell::Signal(Vec::new()),
        }
    }
}

/// A named, serializable field at a fixed cell offset.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Attribute {
    /// Key used in the tree and for lookups.
    pub name: String,
    /// Storage class.
    pub kind: FieldKind,
    /// Cell offset from the object's header.
    pub offset: usize,
}

impl Attribute {
    /// The same attribute seen from an enclosing object `by` cells earlier.
    pub fn rebased(&self, by: usize) -> Attribute {
        Attribute {
            name: self.name.clone(),
            kind: self.kind,
            offset: self.offset + by,
        }
    }
}

/// A named callable endpoint that signals can be connected to.
#[derive(Clone)]
pub struct Slot {
    /// Name used in signal bindings.
    pub name: String,
    /// The handler run on emission.
    pub handler: SlotFn,
}

impl fmt::Debug for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Slot").field("name", &self.name).finish_non_exhaustive()
    }
}

/// Runtime description of a type.
///
/// Offsets and sizes are measured in heap cells. Every instance starts
/// with a header cell at offset 0.
pub trait TypeDescriptor: fmt::Debug + Send + Sync {
    /// Registry-assigned id.
    fn type_id(&self) -> TypeId;

    /// Registered name, also written as `class` in scene documents.
    fn name(&self) -> &str;

    /// The type this one derives from.
    fn super_type(&self) -> Option<TypeId> {
        None
    }

    /// Abstract types can be derived from but never instantiated.
    fn is_abstract(&self) -> bool {
        false
    }

    /// Cells occupied by one instance, header included.
    fn size(&self) -> usize;

    /// Required cell alignment of an instance.
    fn alignment(&self) -> usize {
        1
    }

    /// Initialize the `size()` Vacant cells at `place`.
    fn construct(&self, place: ObjectRef, heap: &mut ObjectHeap);

    /// Tear down the instance at `place`, leaving its cells Vacant.
    fn destruct(&self, place: ObjectRef, heap: &mut ObjectHeap);

    /// Write the fields of the instance at `place` into `node`.
    fn serialize_raw(&self, place: ObjectRef, node: NodeMut<'_>, cx: &SerializeCx<'_>);

    /// Read fields for the instance at `place` from `node`.
    fn deserialize_raw(&self, place: ObjectRef, node: NodeRef<'_>, cx: &mut DeserializeCx<'_>);

    /// Number of embedded elements (aspects).
    fn element_count(&self) -> usize {
        0
    }

    /// Cell offset of element `index`.
    fn offset_of(&self, _index: usize) -> Option<usize> {
        None
    }

    /// Descriptor of element `index`.
    fn type_of(&self, _index: usize) -> Option<&Arc<dyn TypeDescriptor>> {
        None
    }

    /// Serializable fields, with offsets relative to this type's header.
    fn attributes(&self) -> &[Attribute];

    /// Slots declared directly on this type (inherited ones included).
    fn slots(&self) -> &[Slot] {
        &[]
    }

    /// Whether instances should be enrolled for per-frame updates.
    fn wants_update(&self) -> bool {
        false
    }

    /// Per-frame update of the instance `cx` points at.
    fn update(&self, _cx: &mut UpdateCx<'_>, _delta: f64) {}

    /// Post-load initialization of `object`.
    fn initialize(&self, _object: &mut ObjectMut<'_>) {}

    /// Whether an instance of this type can stand in for `target`.
    fn provides(&self, target: TypeId, types: &TypeRegistry) -> bool {
        if self.type_id() == target {
            return true;
        }
        self.super_type()
            .and_then(|s| types.get(s))
            .is_some_and(|super_type| super_type.provides(target, types))
    }

    /// Downcast to a composite descriptor.
    fn as_composite(&self) -> Option<&CompositeType> {
        None
    }
}
