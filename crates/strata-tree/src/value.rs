//! Scalar values and typed extraction from nodes.
//!
//! Numeric reads succeed across `Integer` and `Float` nodes using `as`
//! conversion (truncating, saturating or widening exactly as `as` does).
//! Every other shape mismatch fails without producing a value.

use std::fmt;

use crate::node::{NodeData, NodeKind};

/// A scalar payload that can be stored into a node.
#[derive(Clone, Debug, PartialEq)]
pub enum Scalar {
    /// Integer value.
    Integer(i64),
    /// Float value.
    Float(f64),
    /// String value.
    String(String),
}

impl Scalar {
    /// The node shape this scalar is stored as.
    pub fn kind(&self) -> NodeKind {
        match self {
            Self::Integer(_) => NodeKind::Integer,
            Self::Float(_) => NodeKind::Float,
            Self::String(_) => NodeKind::String,
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::String(v) => write!(f, "{v:?}"),
        }
    }
}

impl From<Scalar> for NodeData {
    fn from(v: Scalar) -> Self {
        match v {
            Scalar::Integer(n) => NodeData::Integer(n),
            Scalar::Float(x) => NodeData::Float(x),
            Scalar::String(s) => NodeData::String(s),
        }
    }
}

macro_rules! integer_scalar {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Scalar {
                fn from(v: $t) -> Self {
                    Scalar::Integer(v as i64)
                }
            }

            impl FromNode for $t {
                const EXPECTED: &'static str = "integer";

                fn from_node(data: &NodeData) -> Option<Self> {
                    match data {
                        NodeData::Integer(n) => Some(*n as $t),
                        NodeData::Float(x) => Some(*x as $t),
                        _ => None,
                    }
                }
            }
        )*
    };
}

macro_rules! float_scalar {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Scalar {
                fn from(v: $t) -> Self {
                    Scalar::Float(v as f64)
                }
            }

            impl FromNode for $t {
                const EXPECTED: &'static str = "float";

                fn from_node(data: &NodeData) -> Option<Self> {
                    match data {
                        NodeData::Integer(n) => Some(*n as $t),
                        NodeData::Float(x) => Some(*x as $t),
                        _ => None,
                    }
                }
            }
        )*
    };
}

integer_scalar!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);
float_scalar!(f32, f64);

impl From<&str> for Scalar {
    fn from(v: &str) -> Self {
        Scalar::String(v.to_owned())
    }
}

impl From<String> for Scalar {
    fn from(v: String) -> Self {
        Scalar::String(v)
    }
}

/// Types that can be read out of a node's payload.
pub trait FromNode: Sized {
    /// Shape name reported in a [`TagMismatch`](crate::TreeError::TagMismatch).
    const EXPECTED: &'static str;

    /// Extract a value, or `None` if the payload has the wrong shape.
    fn from_node(data: &NodeData) -> Option<Self>;
}

impl FromNode for String {
    const EXPECTED: &'static str = "string";

    fn from_node(data: &NodeData) -> Option<Self> {
        match data {
            NodeData::String(s) => Some(s.clone()),
            _ => None,
        }
    }
}

impl FromNode for Scalar {
    const EXPECTED: &'static str = "scalar";

    fn from_node(data: &NodeData) -> Option<Self> {
        match data {
            NodeData::Integer(n) => Some(Scalar::Integer(*n)),
            NodeData::Float(x) => Some(Scalar::Float(*x)),
            NodeData::String(s) => Some(Scalar::String(s.clone())),
            _ => None,
        }
    }
}
