//! Core identifiers and error types for the Strata object runtime.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the handles shared by every other crate in the workspace (type IDs,
//! object and cell references, universe identity) and the error kinds
//! that cross crate boundaries.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod id;

pub use error::{LoadError, LoadIssue, ObjectError};
pub use id::{CellRef, ObjectRef, TypeId, UniverseId};
