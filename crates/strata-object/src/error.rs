//! Errors raised while building and registering types.

use std::error::Error;
use std::fmt;

use strata_core::TypeId;

/// Errors from [`TypeRegistry`](crate::TypeRegistry) and
/// [`CompositeType`](crate::CompositeType) construction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TypeError {
    /// A type with this name is already registered.
    DuplicateName {
        /// The conflicting name.
        name: String,
    },
    /// A referenced type name is not registered.
    UnknownType {
        /// The missing name.
        name: String,
    },
    /// A referenced [`TypeId`] is not registered.
    UnregisteredType {
        /// The missing id.
        type_id: TypeId,
    },
    /// The composite was already registered and can no longer change.
    Frozen {
        /// Name of the composite.
        name: String,
    },
    /// The type's layout cannot be built.
    InvalidLayout {
        /// Name of the offending type.
        name: String,
        /// What is wrong with it.
        reason: String,
    },
}

impl fmt::Display for TypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateName { name } => write!(f, "type '{name}' is already registered"),
            Self::UnknownType { name } => write!(f, "unknown type '{name}'"),
            Self::UnregisteredType { type_id } => write!(f, "type id {type_id} is not registered"),
            Self::Frozen { name } => write!(f, "composite '{name}' is frozen"),
            Self::InvalidLayout { name, reason } => {
                write!(f, "invalid layout for '{name}': {reason}")
            }
        }
    }
}

impl Error for TypeError {}
