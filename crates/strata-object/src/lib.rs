//! Live objects for Strata: memory, types, composites and serialization.
//!
//! Objects live in an [`ObjectHeap`] owned by a registry. Their layout is
//! described by a [`TypeDescriptor`], either an [`ObjectType`] built from
//! a field list or a [`CompositeType`] assembling a base type with
//! aspects in one allocation. The [`archive`] and [`scene`] modules move
//! objects to and from `strata-tree` documents, deferring every
//! cross-object link until the whole scene exists.
//!
//! # Architecture
//!
//! ```text
//! TypeRegistry ── Arc<dyn TypeDescriptor> (ObjectType | CompositeType)
//!       │
//! ObjectSpace (implemented by a registry)
//! ├── ObjectHeap: Vec<Cell>, header at every object start
//! ├── archive: serialize_object / deserialize_object
//! ├── DeferredQueue: references, then signals
//! └── cast: aspect_cast, find_slot
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod archive;
pub mod cast;
pub mod composite;
pub mod deferred;
pub mod descriptor;
pub mod error;
pub mod heap;
pub mod object_type;
pub mod registry;
pub mod scene;
pub mod space;
pub mod view;

pub use archive::{deserialize_object, serialize_object, DeserializeCx, SerializeCx};
pub use cast::{aspect_cast, find_slot, SlotTarget};
pub use composite::CompositeType;
pub use deferred::{DeferredQueue, DeferredReference, DeferredSignal, FlushStats};
pub use descriptor::{Attribute, FieldKind, Slot, TypeDescriptor};
pub use error::TypeError;
pub use heap::{Cell, Connection, HeapConfig, ObjectHeader, ObjectHeap};
pub use object_type::{ObjectType, ObjectTypeBuilder};
pub use registry::TypeRegistry;
pub use scene::{instantiate, serialize_scene, ArchiveConfig, LoadOutcome};
pub use space::ObjectSpace;
pub use view::{Enrollment, ObjectMut, ObjectView, UpdateCx};
