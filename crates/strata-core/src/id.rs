//! Strongly-typed identifiers for types, objects and heap cells.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Identifies a registered type descriptor.
///
/// Types are registered into a type registry and assigned sequential IDs.
/// `TypeId(n)` corresponds to the n-th registered descriptor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(pub u32);

impl fmt::Display for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for TypeId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// Handle to a live object inside an object heap.
///
/// The value is the heap cell index of the object's header. Aspects
/// embedded in a composite have their own header, so an `ObjectRef` may
/// name either a composite root or one of its aspects.
///
/// Handles are plain indices relative to one heap and carry no owner, so
/// a handle is only meaningful to the registry that returned it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectRef(pub u32);

impl ObjectRef {
    /// Cell index of the object header.
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// The object located `offset` cells after this one.
    pub fn offset_by(self, offset: usize) -> ObjectRef {
        ObjectRef(self.0 + offset as u32)
    }

    /// The object located `offset` cells before this one, if any.
    pub fn back_by(self, offset: usize) -> Option<ObjectRef> {
        self.0.checked_sub(offset as u32).map(ObjectRef)
    }

    /// Absolute address of the cell `offset` cells into this object.
    pub fn cell(self, offset: usize) -> CellRef {
        CellRef(self.0 + offset as u32)
    }
}

impl fmt::Display for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.0)
    }
}

/// Absolute address of a single cell in an object heap.
///
/// Deferred write-backs are recorded as `CellRef`s rather than borrowed
/// locations, so they stay valid for the whole load operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellRef(pub u32);

impl CellRef {
    /// Cell index within the heap.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Counter for unique [`UniverseId`] allocation.
static UNIVERSE_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Unique per-instance identifier for an object registry.
///
/// Allocated from a monotonic atomic counter via [`UniverseId::next`].
/// Every object header records the ID of the registry whose heap holds it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UniverseId(u64);

impl UniverseId {
    /// Allocate a fresh, unique registry ID. Thread-safe.
    pub fn next() -> Self {
        Self(UNIVERSE_COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// The raw counter value.
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for UniverseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn universe_ids_are_unique() {
        let a = UniverseId::next();
        let b = UniverseId::next();
        assert_ne!(a, b);
        assert!(b.get() > a.get());
    }

    #[test]
    fn object_ref_offset_arithmetic() {
        let root = ObjectRef(10);
        let aspect = root.offset_by(4);
        assert_eq!(aspect, ObjectRef(14));
        assert_eq!(aspect.back_by(4), Some(root));
        assert_eq!(ObjectRef(2).back_by(3), None);
        assert_eq!(root.cell(2), CellRef(12));
    }

    #[test]
    fn display_formats() {
        assert_eq!(TypeId(3).to_string(), "3");
        assert_eq!(ObjectRef(7).to_string(), "@7");
        assert_eq!(CellRef(9).to_string(), "#9");
    }
}
