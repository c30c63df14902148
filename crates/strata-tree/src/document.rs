//! The node arena and its read/write cursors.
//!
//! [`Document`] owns all nodes. [`NodeRef`] is a shared cursor that never
//! mutates: asking it for a missing child yields a virtual Empty node.
//! [`NodeMut`] is an exclusive cursor that creates missing children on
//! access and promotes an Empty node to Array or Map as needed.

use indexmap::IndexMap;

use crate::config::DocumentConfig;
use crate::error::TreeError;
use crate::handle::NodeId;
use crate::node::{NodeData, NodeKind};
use crate::syntax::{TreeReader, TreeWriter};
use crate::value::{FromNode, Scalar};

/// Owner of every node created during one save or load operation.
///
/// Node 0 is the root and always exists. Nodes are appended and never
/// removed individually; [`clear`](Document::clear) releases them all
/// at once.
#[derive(Clone, Debug)]
pub struct Document {
    nodes: Vec<NodeData>,
    max_nodes: usize,
}

impl Document {
    /// Create a document holding a single Empty root.
    pub fn new() -> Self {
        Self::with_config(&DocumentConfig::default())
    }

    /// Create a document with the given sizing hints.
    pub fn with_config(config: &DocumentConfig) -> Self {
        let max_nodes = config.max_nodes.clamp(1, u32::MAX as usize);
        let mut nodes = Vec::with_capacity(config.initial_nodes.clamp(1, max_nodes));
        nodes.push(NodeData::Empty);
        Self { nodes, max_nodes }
    }

    /// Read cursor at the root.
    pub fn root(&self) -> NodeRef<'_> {
        self.node(NodeId::ROOT)
    }

    /// Write cursor at the root.
    pub fn root_mut(&mut self) -> NodeMut<'_> {
        self.node_mut(NodeId::ROOT)
    }

    /// Read cursor at `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not issued by this document since its last clear.
    pub fn node(&self, id: NodeId) -> NodeRef<'_> {
        assert!(id.index() < self.nodes.len(), "{id} out of range");
        NodeRef {
            doc: self,
            id: Some(id),
        }
    }

    /// Write cursor at `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not issued by this document since its last clear.
    pub fn node_mut(&mut self, id: NodeId) -> NodeMut<'_> {
        assert!(id.index() < self.nodes.len(), "{id} out of range");
        NodeMut { doc: self, id }
    }

    /// Number of nodes allocated, including the root and any nodes
    /// orphaned by shape changes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Maximum number of nodes the document may hold.
    pub fn capacity(&self) -> usize {
        self.max_nodes
    }

    /// Release every node and reset to a single Empty root.
    pub fn clear(&mut self) {
        self.nodes.truncate(1);
        self.nodes[0] = NodeData::Empty;
    }

    /// Clear the document and populate it with `reader`.
    pub fn load_with<R: TreeReader + ?Sized>(
        &mut self,
        reader: &mut R,
        input: &[u8],
    ) -> Result<(), TreeError> {
        self.clear();
        reader.read(input, self)
    }

    /// Render the document with `writer`, appending to `out`.
    pub fn save_with<W: TreeWriter + ?Sized>(
        &self,
        writer: &mut W,
        out: &mut Vec<u8>,
    ) -> Result<(), TreeError> {
        writer.write(self, out)
    }

    fn check_room(&self, extra: usize) -> Result<(), TreeError> {
        let fits = self
            .nodes
            .len()
            .checked_add(extra)
            .is_some_and(|total| total <= self.max_nodes);
        if fits {
            Ok(())
        } else {
            Err(TreeError::CapacityExceeded {
                requested: extra,
                capacity: self.max_nodes,
            })
        }
    }

    fn try_alloc(&mut self) -> Result<NodeId, TreeError> {
        self.check_room(1)?;
        let id = u32::try_from(self.nodes.len()).map_err(|_| TreeError::CapacityExceeded {
            requested: 1,
            capacity: self.max_nodes,
        })?;
        self.nodes.push(NodeData::Empty);
        Ok(NodeId(id))
    }

    fn alloc(&mut self) -> NodeId {
        match self.try_alloc() {
            Ok(id) => id,
            Err(error) => panic!("{error}"),
        }
    }

    fn data(&self, id: NodeId) -> &NodeData {
        &self.nodes[id.index()]
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for Document {
    /// Structural equality of the two trees. Orphaned nodes and map key
    /// order are ignored.
    fn eq(&self, other: &Self) -> bool {
        self.root() == other.root()
    }
}

static EMPTY: NodeData = NodeData::Empty;

// ── NodeRef ─────────────────────────────────────────────────────────

/// Shared cursor over a node.
///
/// A cursor with no `id` stands for a child that does not exist; it
/// behaves exactly like an Empty node.
#[derive(Clone, Copy, Debug)]
pub struct NodeRef<'a> {
    doc: &'a Document,
    id: Option<NodeId>,
}

impl<'a> NodeRef<'a> {
    /// Handle of the node, or `None` for a missing child.
    pub fn id(&self) -> Option<NodeId> {
        self.id
    }

    /// The underlying payload.
    pub fn data(&self) -> &'a NodeData {
        match self.id {
            Some(id) => self.doc.data(id),
            None => &EMPTY,
        }
    }

    /// Shape tag of the node.
    pub fn kind(&self) -> NodeKind {
        self.data().kind()
    }

    /// Whether the node is Empty (or missing).
    pub fn is_empty(&self) -> bool {
        self.kind() == NodeKind::Empty
    }

    /// Whether the node is an Array.
    pub fn is_array(&self) -> bool {
        self.kind() == NodeKind::Array
    }

    /// Whether the node is a Map.
    pub fn is_map(&self) -> bool {
        self.kind() == NodeKind::Map
    }

    /// Whether the node holds no children.
    pub fn is_scalar(&self) -> bool {
        self.kind().is_scalar()
    }

    /// Read a typed value.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::TagMismatch`] if the node's shape does not
    /// hold a `T`.
    pub fn get<T: FromNode>(&self) -> Result<T, TreeError> {
        T::from_node(self.data()).ok_or(TreeError::TagMismatch {
            expected: T::EXPECTED,
            found: self.kind(),
        })
    }

    /// Read a typed value into `out`, returning whether it succeeded.
    /// On failure `out` is left untouched.
    pub fn get_into<T: FromNode>(&self, out: &mut T) -> bool {
        match T::from_node(self.data()) {
            Some(v) => {
                *out = v;
                true
            }
            None => false,
        }
    }

    /// The child stored under `key`, or a virtual Empty node.
    pub fn key(&self, key: &str) -> NodeRef<'a> {
        let id = match self.data() {
            NodeData::Map(map) => map.get(key).copied(),
            _ => None,
        };
        NodeRef { doc: self.doc, id }
    }

    /// The child at `index`, or a virtual Empty node.
    pub fn at(&self, index: usize) -> NodeRef<'a> {
        let id = match self.data() {
            NodeData::Array(items) => items.get(index).copied(),
            _ => None,
        };
        NodeRef { doc: self.doc, id }
    }

    /// Whether a Map node has a child under `key`.
    pub fn contains_key(&self, key: &str) -> bool {
        matches!(self.data(), NodeData::Map(map) if map.contains_key(key))
    }

    /// Number of children (0 for scalars).
    pub fn len(&self) -> usize {
        match self.data() {
            NodeData::Array(items) => items.len(),
            NodeData::Map(map) => map.len(),
            _ => 0,
        }
    }

    /// Keys of a Map node, in storage order.
    pub fn keys(&self) -> impl Iterator<Item = &'a str> + 'a {
        let map = match self.data() {
            NodeData::Map(map) => Some(map),
            _ => None,
        };
        map.into_iter().flat_map(|m| m.keys().map(String::as_str))
    }

    /// `(key, child)` pairs of a Map node.
    pub fn entries(&self) -> impl Iterator<Item = (&'a str, NodeRef<'a>)> + 'a {
        let doc = self.doc;
        let map = match self.data() {
            NodeData::Map(map) => Some(map),
            _ => None,
        };
        map.into_iter().flat_map(move |m| {
            m.iter().map(move |(k, &id)| (k.as_str(), NodeRef { doc, id: Some(id) }))
        })
    }

    /// Children of an Array node, in order.
    pub fn elements(&self) -> impl Iterator<Item = NodeRef<'a>> + 'a {
        let doc = self.doc;
        let items: &'a [NodeId] = match self.data() {
            NodeData::Array(items) => items,
            _ => &[],
        };
        items.iter().map(move |&id| NodeRef { doc, id: Some(id) })
    }
}

impl PartialEq for NodeRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        match (self.data(), other.data()) {
            (NodeData::Empty, NodeData::Empty) => true,
            (NodeData::Integer(a), NodeData::Integer(b)) => a == b,
            (NodeData::Float(a), NodeData::Float(b)) => a == b,
            (NodeData::String(a), NodeData::String(b)) => a == b,
            (NodeData::Array(a), NodeData::Array(b)) => {
                a.len() == b.len() && self.elements().zip(other.elements()).all(|(x, y)| x == y)
            }
            (NodeData::Map(a), NodeData::Map(b)) => {
                a.len() == b.len()
                    && self
                        .entries()
                        .all(|(k, v)| other.contains_key(k) && v == other.key(k))
            }
            _ => false,
        }
    }
}

// ── NodeMut ─────────────────────────────────────────────────────────

/// Exclusive cursor over a node.
///
/// Navigation methods consume the cursor and return one pointing at the
/// child; use [`reborrow`](NodeMut::reborrow) to keep the parent.
#[derive(Debug)]
pub struct NodeMut<'a> {
    doc: &'a mut Document,
    id: NodeId,
}

impl<'a> NodeMut<'a> {
    /// Handle of the node.
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// A shorter-lived cursor at the same node.
    pub fn reborrow(&mut self) -> NodeMut<'_> {
        NodeMut {
            doc: &mut *self.doc,
            id: self.id,
        }
    }

    /// Read view of the node.
    pub fn view(&self) -> NodeRef<'_> {
        NodeRef {
            doc: &*self.doc,
            id: Some(self.id),
        }
    }

    /// Shape tag of the node.
    pub fn kind(&self) -> NodeKind {
        self.doc.data(self.id).kind()
    }

    /// Overwrite tag and value, discarding any previous children.
    pub fn set(&mut self, value: impl Into<Scalar>) {
        *self.slot() = value.into().into();
    }

    /// Reset the node to Empty.
    pub fn clear(&mut self) {
        *self.slot() = NodeData::Empty;
    }

    /// Reset the node to an empty payload of `kind`.
    pub fn reset(&mut self, kind: NodeKind) {
        *self.slot() = NodeData::of_kind(kind);
    }

    /// The child under `key`, created Empty if absent.
    ///
    /// A node that is not a Map becomes an empty Map first.
    ///
    /// # Panics
    ///
    /// Panics if a new child is needed and the node budget is exhausted.
    pub fn key(self, key: &str) -> NodeMut<'a> {
        let doc = self.doc;
        let slot = &mut doc.nodes[self.id.index()];
        if !matches!(slot, NodeData::Map(_)) {
            *slot = NodeData::Map(IndexMap::new());
        }
        let existing = match slot {
            NodeData::Map(map) => map.get(key).copied(),
            _ => None,
        };
        let child = match existing {
            Some(child) => child,
            None => {
                let child = doc.alloc();
                if let NodeData::Map(map) = &mut doc.nodes[self.id.index()] {
                    map.insert(key.to_owned(), child);
                }
                child
            }
        };
        NodeMut { doc, id: child }
    }

    /// The child at `index`, growing the Array with Empty children if
    /// needed.
    ///
    /// A node that is not an Array becomes an empty Array first.
    ///
    /// # Panics
    ///
    /// Panics if the growth would exceed the document's node budget; use
    /// [`NodeMut::try_at`] for untrusted indices.
    pub fn at(self, index: usize) -> NodeMut<'a> {
        match self.try_at(index) {
            Ok(child) => child,
            Err(error) => panic!("{error}"),
        }
    }

    /// Like [`NodeMut::at`], but fails with
    /// [`TreeError::CapacityExceeded`] instead of growing past the node
    /// budget. The document is untouched on failure.
    pub fn try_at(self, index: usize) -> Result<NodeMut<'a>, TreeError> {
        let doc = self.doc;
        let len = match &doc.nodes[self.id.index()] {
            NodeData::Array(items) => items.len(),
            _ => 0,
        };
        let missing = index.saturating_add(1).saturating_sub(len);
        doc.check_room(missing)?;
        doc.array_mut(self.id);
        let mut fresh = Vec::with_capacity(missing);
        for _ in 0..missing {
            fresh.push(doc.try_alloc()?);
        }
        let items = doc.array_mut(self.id);
        items.extend(fresh);
        let child = items[index];
        Ok(NodeMut { doc, id: child })
    }

    /// Append an Empty child and return a cursor to it.
    ///
    /// A node that is not an Array becomes an empty Array first.
    ///
    /// # Panics
    ///
    /// Panics if the document's node budget is exhausted.
    pub fn push(self) -> NodeMut<'a> {
        let doc = self.doc;
        doc.array_mut(self.id);
        let child = doc.alloc();
        doc.array_mut(self.id).push(child);
        NodeMut { doc, id: child }
    }

    /// Remove the child under `key` from a Map, leaving the node itself
    /// allocated until the document is cleared.
    pub fn remove_key(&mut self, key: &str) -> bool {
        match self.slot() {
            NodeData::Map(map) => map.shift_remove(key).is_some(),
            _ => false,
        }
    }

    fn slot(&mut self) -> &mut NodeData {
        &mut self.doc.nodes[self.id.index()]
    }
}

impl Document {
    /// The child list of `id`, turning the node into an empty Array first
    /// if it is anything else.
    fn array_mut(&mut self, id: NodeId) -> &mut Vec<NodeId> {
        let slot = &mut self.nodes[id.index()];
        if !matches!(slot, NodeData::Array(_)) {
            *slot = NodeData::Array(Vec::new());
        }
        match slot {
            NodeData::Array(items) => items,
            _ => unreachable!(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_document_has_empty_root() {
        let doc = Document::new();
        assert!(doc.root().is_empty());
        assert_eq!(doc.node_count(), 1);
    }

    #[test]
    fn set_then_get_round_trips() {
        let mut doc = Document::new();
        doc.root_mut().set(42i32);
        assert_eq!(doc.root().get::<i64>(), Ok(42));
        doc.root_mut().set("hello");
        assert_eq!(doc.root().get::<String>().as_deref(), Ok("hello"));
    }

    #[test]
    fn numeric_get_crosses_integer_and_float() {
        let mut doc = Document::new();
        doc.root_mut().set(2.75f64);
        assert_eq!(doc.root().get::<i32>(), Ok(2));
        doc.root_mut().set(5u16);
        assert_eq!(doc.root().get::<f32>(), Ok(5.0));
    }

    #[test]
    fn mismatched_get_leaves_out_untouched() {
        let mut doc = Document::new();
        doc.root_mut().set("text");
        let mut out = 17i64;
        assert!(!doc.root().get_into(&mut out));
        assert_eq!(out, 17);
        assert_eq!(
            doc.root().get::<i64>(),
            Err(TreeError::TagMismatch {
                expected: "integer",
                found: NodeKind::String,
            })
        );
    }

    #[test]
    fn keyed_access_promotes_empty_to_map() {
        let mut doc = Document::new();
        doc.root_mut().key("a").set(1);
        assert!(doc.root().is_map());
        assert_eq!(doc.root().key("a").get::<i64>(), Ok(1));
        assert!(doc.root().key("missing").is_empty());
    }

    #[test]
    fn indexed_access_promotes_empty_to_array_and_grows() {
        let mut doc = Document::new();
        doc.root_mut().at(2).set(9);
        assert!(doc.root().is_array());
        assert_eq!(doc.root().len(), 3);
        assert!(doc.root().at(0).is_empty());
        assert_eq!(doc.root().at(2).get::<i64>(), Ok(9));
        assert!(doc.root().at(10).is_empty());
    }

    #[test]
    fn push_appends_in_order() {
        let mut doc = Document::new();
        for i in 0..4 {
            doc.root_mut().push().set(i);
        }
        let values: Vec<i64> = doc
            .root()
            .elements()
            .map(|n| n.get::<i64>().unwrap())
            .collect();
        assert_eq!(values, vec![0, 1, 2, 3]);
    }

    #[test]
    fn set_discards_children() {
        let mut doc = Document::new();
        doc.root_mut().key("x").set(1);
        doc.root_mut().set(3.5);
        assert_eq!(doc.root().kind(), NodeKind::Float);
        assert_eq!(doc.root().len(), 0);
        assert!(doc.root().key("x").is_empty());
    }

    #[test]
    fn keyed_access_on_array_resets_shape() {
        let mut doc = Document::new();
        doc.root_mut().push().set(1);
        doc.root_mut().key("k").set(2);
        assert!(doc.root().is_map());
        assert_eq!(doc.root().len(), 1);
    }

    #[test]
    fn reborrow_keeps_parent_cursor() {
        let mut doc = Document::new();
        let mut root = doc.root_mut();
        root.reborrow().key("a").set(1);
        root.reborrow().key("b").set(2);
        assert_eq!(root.view().len(), 2);
    }

    #[test]
    fn clear_resets_to_single_root() {
        let mut doc = Document::new();
        doc.root_mut().key("a").key("b").push().set(1);
        assert!(doc.node_count() > 1);
        doc.clear();
        assert_eq!(doc.node_count(), 1);
        assert!(doc.root().is_empty());
    }

    #[test]
    fn huge_index_is_refused_without_growth() {
        let mut doc = Document::new();
        doc.root_mut().key("list").push().set(1);
        let before = doc.node_count();
        let result = doc.root_mut().key("list").try_at(usize::MAX).map(|_| ());
        assert_eq!(
            result,
            Err(TreeError::CapacityExceeded {
                requested: usize::MAX - 1,
                capacity: DocumentConfig::DEFAULT_MAX_NODES,
            })
        );
        assert_eq!(doc.node_count(), before);
        assert_eq!(doc.root().key("list").len(), 1);
    }

    #[test]
    fn configured_node_budget_is_honoured() {
        let config = DocumentConfig {
            max_nodes: 4,
            ..DocumentConfig::default()
        };
        let mut doc = Document::with_config(&config);
        assert_eq!(doc.capacity(), 4);
        // Root plus three array slots fills the budget exactly.
        doc.root_mut().try_at(2).unwrap().set(7);
        assert_eq!(doc.node_count(), 4);
        assert!(matches!(
            doc.root_mut().try_at(3),
            Err(TreeError::CapacityExceeded { requested: 1, capacity: 4 })
        ));
        assert_eq!(doc.root().at(2).get::<i64>(), Ok(7));
        assert_eq!(doc.node_count(), 4);
    }

    #[test]
    fn try_at_on_a_scalar_reshapes_within_budget() {
        let mut doc = Document::new();
        doc.root_mut().set(5);
        doc.root_mut().try_at(1).unwrap().set(9);
        assert_eq!(doc.root().kind(), NodeKind::Array);
        assert_eq!(doc.root().len(), 2);
        assert!(doc.root().at(0).is_empty());
    }

    #[test]
    #[should_panic(expected = "capacity is 2")]
    fn at_panics_past_the_budget() {
        let config = DocumentConfig {
            max_nodes: 2,
            ..DocumentConfig::default()
        };
        let mut doc = Document::with_config(&config);
        doc.root_mut().at(5);
    }

    #[test]
    fn remove_key_detaches_child() {
        let mut doc = Document::new();
        doc.root_mut().key("a").set(1);
        assert!(doc.root_mut().remove_key("a"));
        assert!(!doc.root().contains_key("a"));
        assert!(!doc.root_mut().remove_key("a"));
    }

    #[test]
    fn map_equality_ignores_key_order() {
        let mut a = Document::new();
        a.root_mut().key("x").set(1);
        a.root_mut().key("y").set("two");
        let mut b = Document::new();
        b.root_mut().key("y").set("two");
        b.root_mut().key("x").set(1);
        assert_eq!(a, b);
        b.root_mut().key("x").set(2);
        assert_ne!(a, b);
    }

    #[test]
    fn array_equality_respects_order() {
        let mut a = Document::new();
        a.root_mut().push().set(1);
        a.root_mut().push().set(2);
        let mut b = Document::new();
        b.root_mut().push().set(2);
        b.root_mut().push().set(1);
        assert_ne!(a, b);
    }

    #[cfg(not(miri))]
    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn arb_scalar() -> impl Strategy<Value = Scalar> {
            prop_oneof![
                any::<i64>().prop_map(Scalar::Integer),
                (-1.0e12f64..1.0e12).prop_map(Scalar::Float),
                "[a-z0-9 ]{0,12}".prop_map(Scalar::String),
            ]
        }

        proptest! {
            #[test]
            fn scalar_set_get_round_trip(value in arb_scalar()) {
                let mut doc = Document::new();
                doc.root_mut().set(value.clone());
                prop_assert_eq!(doc.root().kind(), value.kind());
                prop_assert_eq!(doc.root().get::<Scalar>(), Ok(value));
            }

            #[test]
            fn map_round_trip_is_order_independent(
                entries in proptest::collection::btree_map("[a-z]{1,6}", any::<i64>(), 0..12),
            ) {
                let mut forward = Document::new();
                for (k, v) in &entries {
                    forward.root_mut().key(k).set(*v);
                }
                let mut backward = Document::new();
                for (k, v) in entries.iter().rev() {
                    backward.root_mut().key(k).set(*v);
                }
                prop_assert_eq!(&forward, &backward);

                let keys: std::collections::BTreeSet<&str> = forward.root().keys().collect();
                prop_assert_eq!(keys.len(), entries.len());
                for (k, v) in &entries {
                    prop_assert_eq!(forward.root().key(k).get::<i64>(), Ok(*v));
                }
            }

            #[test]
            fn array_push_grows_monotonically(n in 0usize..40) {
                let mut doc = Document::new();
                for i in 0..n {
                    doc.root_mut().push().set(i as i64);
                    prop_assert_eq!(doc.root().len(), i + 1);
                }
            }
        }
    }
}
