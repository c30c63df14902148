//! Strata: a reflection-driven object runtime.
//!
//! This is the top-level facade crate that re-exports the public API from
//! all Strata sub-crates. For most users, adding `strata` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use std::sync::Arc;
//! use strata::prelude::*;
//!
//! let mut types = TypeRegistry::new();
//! let counter = types
//!     .register(ObjectTypeBuilder::new("Counter").integer("hits").string("label"))
//!     .unwrap();
//!
//! let mut universe = Universe::new(Arc::new(types), UniverseConfig::default()).unwrap();
//! let first = universe.create(counter, "counter").unwrap();
//! assert_eq!(first.naming, Naming::Exact);
//!
//! // The id is taken, so a unique one is synthesized.
//! let second = universe.create(counter, "counter").unwrap();
//! assert_eq!(second.naming, Naming::Synthesized);
//! assert_eq!(universe.id_of(second.object), Some("counter01"));
//!
//! universe.object_mut(first.object).unwrap().set_integer("hits", 3);
//!
//! let mut doc = Document::new();
//! assert_eq!(universe.save(&mut doc).unwrap(), 2);
//!
//! universe.clear();
//! let outcome = universe.load(&doc).unwrap();
//! assert!(outcome.succeeded());
//! let restored = universe.find("counter").unwrap();
//! assert_eq!(universe.object(restored).unwrap().integer("hits"), Some(3));
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`core`] | `strata-core` | Handles, identifiers, object and load errors |
//! | [`tree`] | `strata-tree` | Value trees and the reader/writer traits |
//! | [`object`] | `strata-object` | Object heap, type descriptors, composites, scene archives |
//! | [`engine`] | `strata-engine` | The `Universe` object registry |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Handles, identifiers and error types (`strata-core`).
pub use strata_core as core;

/// Value trees (`strata-tree`).
///
/// A [`tree::Document`] is an arena of nodes navigated through
/// [`tree::NodeRef`] and [`tree::NodeMut`]; concrete text formats plug in
/// through [`tree::TreeReader`] and [`tree::TreeWriter`].
pub use strata_tree as tree;

/// Object memory and reflection (`strata-object`).
///
/// Defines [`object::TypeRegistry`], [`object::ObjectTypeBuilder`],
/// [`object::CompositeType`] and the scene archive routines.
pub use strata_object as object;

/// Live object registry (`strata-engine`).
pub use strata_engine as engine;

/// Common imports for typical Strata usage.
///
/// ```rust
/// use strata::prelude::*;
/// ```
pub mod prelude {
    // Handles and errors
    pub use strata_core::{LoadError, LoadIssue, ObjectError, ObjectRef, TypeId};

    // Trees
    pub use strata_tree::{Document, NodeKind, NodeMut, NodeRef, Scalar, TreeReader, TreeWriter};

    // Types and objects
    pub use strata_object::{
        CompositeType, FieldKind, LoadOutcome, ObjectMut, ObjectTypeBuilder, ObjectView,
        TypeDescriptor, TypeRegistry, UpdateCx,
    };

    // Engine
    pub use strata_engine::{Created, Naming, Universe, UniverseConfig};
}
