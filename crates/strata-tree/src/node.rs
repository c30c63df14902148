//! Node storage and shape tags.

use std::fmt;

use indexmap::IndexMap;

use crate::handle::NodeId;

/// The shape tag of a node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// No value.
    Empty,
    /// A signed 64-bit integer.
    Integer,
    /// A 64-bit float.
    Float,
    /// A UTF-8 string.
    String,
    /// An ordered sequence of child nodes.
    Array,
    /// A mapping from string keys to child nodes.
    Map,
}

impl NodeKind {
    /// Whether this shape holds no children.
    pub fn is_scalar(self) -> bool {
        !matches!(self, Self::Array | Self::Map)
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Empty => "empty",
            Self::Integer => "integer",
            Self::Float => "float",
            Self::String => "string",
            Self::Array => "array",
            Self::Map => "map",
        };
        f.write_str(name)
    }
}

/// Tag and payload of a single node.
///
/// The tag and the payload are one value, so changing the shape of a
/// node always discards what it held before. Children are stored as
/// handles into the same document.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum NodeData {
    /// No value.
    #[default]
    Empty,
    /// Integer payload.
    Integer(i64),
    /// Float payload.
    Float(f64),
    /// String payload.
    String(String),
    /// Ordered children.
    Array(Vec<NodeId>),
    /// Keyed children. Key order carries no meaning.
    Map(IndexMap<String, NodeId>),
}

impl NodeData {
    /// The shape tag of this payload.
    pub fn kind(&self) -> NodeKind {
        match self {
            Self::Empty => NodeKind::Empty,
            Self::Integer(_) => NodeKind::Integer,
            Self::Float(_) => NodeKind::Float,
            Self::String(_) => NodeKind::String,
            Self::Array(_) => NodeKind::Array,
            Self::Map(_) => NodeKind::Map,
        }
    }

    /// An empty payload of the given shape.
    pub fn of_kind(kind: NodeKind) -> Self {
        match kind {
            NodeKind::Empty => Self::Empty,
            NodeKind::Integer => Self::Integer(0),
            NodeKind::Float => Self::Float(0.0),
            NodeKind::String => Self::String(String::new()),
            NodeKind::Array => Self::Array(Vec::new()),
            NodeKind::Map => Self::Map(IndexMap::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_matches_payload() {
        assert_eq!(NodeData::Integer(4).kind(), NodeKind::Integer);
        assert_eq!(NodeData::default().kind(), NodeKind::Empty);
        for kind in [
            NodeKind::Empty,
            NodeKind::Integer,
            NodeKind::Float,
            NodeKind::String,
            NodeKind::Array,
            NodeKind::Map,
        ] {
            assert_eq!(NodeData::of_kind(kind).kind(), kind);
        }
    }

    #[test]
    fn only_containers_are_not_scalar() {
        assert!(NodeKind::Empty.is_scalar());
        assert!(NodeKind::String.is_scalar());
        assert!(!NodeKind::Array.is_scalar());
        assert!(!NodeKind::Map.is_scalar());
    }
}
