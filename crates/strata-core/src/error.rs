//! Error types shared across the Strata workspace.
//!
//! Organised by how the caller must react: [`ObjectError`] for failed
//! registry operations, [`LoadError`] for aborted loads, and
//! [`LoadIssue`] for problems a load recovers from locally.

use std::error::Error;
use std::fmt;

use crate::id::{ObjectRef, TypeId};

/// Errors from object creation and registry bookkeeping.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ObjectError {
    /// No type is registered under the given name.
    UnknownType {
        /// The unresolved type name.
        name: String,
    },
    /// A `TypeId` that is not present in the type registry.
    UnregisteredType {
        /// The unrecognised type ID.
        type_id: TypeId,
    },
    /// The type is abstract and cannot be instantiated.
    AbstractType {
        /// Name of the abstract type.
        name: String,
    },
    /// The object heap has no room for the requested allocation.
    CapacityExceeded {
        /// Number of cells requested.
        requested: usize,
        /// Total cell capacity of the heap.
        capacity: usize,
    },
    /// The object is not owned by this registry.
    NotOwned {
        /// The foreign handle.
        object: ObjectRef,
    },
    /// The handle does not point at a constructed object.
    NotLive {
        /// The stale or invalid handle.
        object: ObjectRef,
    },
}

impl fmt::Display for ObjectError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownType { name } => write!(f, "unknown type '{name}'"),
            Self::UnregisteredType { type_id } => {
                write!(f, "type {type_id} is not registered")
            }
            Self::AbstractType { name } => {
                write!(f, "type '{name}' is abstract and cannot be instantiated")
            }
            Self::CapacityExceeded {
                requested,
                capacity,
            } => {
                write!(
                    f,
                    "object heap capacity exceeded: requested {requested} cells, capacity {capacity} cells"
                )
            }
            Self::NotOwned { object } => {
                write!(f, "object {object} is not owned by this universe")
            }
            Self::NotLive { object } => write!(f, "object {object} is not live"),
        }
    }
}

impl Error for ObjectError {}

/// Errors that abort a whole load operation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoadError {
    /// The document does not have the scene layout: the root is not a
    /// map, or a required top-level key is missing or malformed.
    Structural {
        /// Human-readable description of the defect.
        reason: String,
    },
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Structural { reason } => write!(f, "invalid scene definition: {reason}"),
        }
    }
}

impl Error for LoadError {}

/// A problem encountered and recovered from during a load.
///
/// Issues never stop the load; they are collected into the load outcome
/// so the caller can decide whether a partial graph is acceptable.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoadIssue {
    /// The declared class is not registered, missing, or abstract; the
    /// object was skipped entirely.
    UnknownType {
        /// The declared class name (empty when absent).
        class: String,
    },
    /// The registry refused to create an object of a known type.
    CreateFailed {
        /// The declared class name.
        class: String,
        /// Why creation failed.
        reason: ObjectError,
    },
    /// A reference names an identifier that does not exist after the
    /// whole load; the field keeps its constructed value.
    UnresolvedReference {
        /// The missing identifier.
        id: String,
    },
    /// A reference names an object that provides no capability of the
    /// field's target type; the field keeps its constructed value.
    ReferenceTypeMismatch {
        /// The referenced identifier.
        id: String,
        /// Name of the type the field requires.
        expected: String,
    },
    /// A signal binding names a receiver or slot that does not exist;
    /// the binding was skipped.
    UnresolvedSlot {
        /// The receiver identifier.
        receiver: String,
        /// The slot name.
        slot: String,
    },
}

impl fmt::Display for LoadIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownType { class } if class.is_empty() => {
                write!(f, "object without class skipped")
            }
            Self::UnknownType { class } => write!(f, "unknown class '{class}', object skipped"),
            Self::CreateFailed { class, reason } => {
                write!(f, "could not create '{class}': {reason}")
            }
            Self::UnresolvedReference { id } => {
                write!(f, "reference to unknown object '{id}'")
            }
            Self::ReferenceTypeMismatch { id, expected } => {
                write!(f, "object '{id}' provides no '{expected}'")
            }
            Self::UnresolvedSlot { receiver, slot } => {
                write!(f, "slot '{slot}' on '{receiver}' not found")
            }
        }
    }
}

impl Error for LoadIssue {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::CreateFailed { reason, .. } => Some(reason),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issue_messages_name_the_culprit() {
        let issue = LoadIssue::UnresolvedReference { id: "w9".into() };
        assert!(issue.to_string().contains("w9"));
        let issue = LoadIssue::UnknownType { class: String::new() };
        assert_eq!(issue.to_string(), "object without class skipped");
    }

    #[test]
    fn create_failed_exposes_source() {
        let issue = LoadIssue::CreateFailed {
            class: "Widget".into(),
            reason: ObjectError::CapacityExceeded {
                requested: 8,
                capacity: 4,
            },
        };
        assert!(issue.source().is_some());
    }
}
