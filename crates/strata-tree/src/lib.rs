//! Arena-owned generic value tree for Strata documents.
//!
//! A [`Document`] owns every node created during one save or load
//! operation. Nodes are addressed by [`NodeId`] handles and released
//! together when the document is cleared or dropped; no node is ever
//! freed on its own.
//!
//! # Architecture
//!
//! ```text
//! Document (arena)
//! ├── Vec<NodeData>        node 0 is the root
//! │   ├── Empty | Integer | Float | String      scalar shapes
//! │   ├── Array(Vec<NodeId>)                    ordered children
//! │   └── Map(IndexMap<String, NodeId>)         keyed children
//! ├── NodeRef<'_>  read cursor, absent children read as Empty
//! └── NodeMut<'_>  write cursor, absent children are created
//! ```
//!
//! Concrete on-disk syntaxes plug in through [`TreeReader`] and
//! [`TreeWriter`]; this crate defines no wire format of its own.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod document;
pub mod error;
pub mod handle;
pub mod node;
pub mod syntax;
pub mod value;

pub use config::DocumentConfig;
pub use document::{Document, NodeMut, NodeRef};
pub use error::TreeError;
pub use handle::NodeId;
pub use node::{NodeData, NodeKind};
pub use syntax::{TreeReader, TreeWriter};
pub use value::{FromNode, Scalar};
