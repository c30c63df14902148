//! Tree-specific error types.

use std::error::Error;
use std::fmt;

use crate::node::NodeKind;

/// Errors that can occur while reading or parsing a value tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TreeError {
    /// A value of one shape was requested from a node of another.
    TagMismatch {
        /// The shape the caller asked for.
        expected: &'static str,
        /// The shape the node actually holds.
        found: NodeKind,
    },
    /// Growing the document would exceed its node budget.
    CapacityExceeded {
        /// Nodes the operation needed.
        requested: usize,
        /// Configured maximum node count.
        capacity: usize,
    },
    /// A syntax reader or writer failed.
    Syntax {
        /// Description reported by the syntax layer.
        reason: String,
    },
}

impl fmt::Display for TreeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TagMismatch { expected, found } => {
                write!(f, "expected {expected} node, found {found}")
            }
            Self::CapacityExceeded {
                requested,
                capacity,
            } => write!(f, "document needs {requested} more nodes, capacity is {capacity}"),
            Self::Syntax { reason } => write!(f, "syntax error: {reason}"),
        }
    }
}

impl Error for TreeError {}
