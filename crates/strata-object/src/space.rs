//! The registry interface serialization runs against.

use std::sync::Arc;

use strata_core::{ObjectError, ObjectRef, TypeId};

use crate::heap::ObjectHeap;
use crate::registry::TypeRegistry;

/// A named collection of objects that archives can be loaded into and
/// saved from.
///
/// Implemented by `strata_engine::Universe`; tests provide lighter ones.
pub trait ObjectSpace {
    /// The type registry objects are resolved against.
    fn types(&self) -> &Arc<TypeRegistry>;

    /// Object memory.
    fn heap(&self) -> &ObjectHeap;

    /// Mutable object memory.
    fn heap_mut(&mut self) -> &mut ObjectHeap;

    /// Construct a top-level object of type `ty` and register it under a
    /// name derived from `requested_id`.
    fn create_object(&mut self, ty: TypeId, requested_id: &str) -> Result<ObjectRef, ObjectError>;

    /// Look up a top-level object by id.
    fn find_object(&self, id: &str) -> Option<ObjectRef>;

    /// The id of a top-level object.
    fn object_id(&self, object: ObjectRef) -> Option<&str>;
}
