//! Typed access to an object's fields by attribute name.

use std::ops::{Deref, DerefMut};

use strata_core::{CellRef, ObjectRef};

use crate::descriptor::TypeDescriptor;
use crate::heap::{Cell, Connection, ObjectHeap};

fn locate(ty: &dyn TypeDescriptor, object: ObjectRef, name: &str) -> Option<CellRef> {
    ty.attributes()
        .iter()
        .find(|a| a.name == name)
        .map(|a| object.cell(a.offset))
}

macro_rules! getters {
    () => {
        /// The object this view points at.
        pub fn object(&self) -> ObjectRef {
            self.object
        }

        /// Descriptor used to resolve attribute names.
        pub fn descriptor(&self) -> &dyn TypeDescriptor {
            self.ty
        }

        /// Name of the viewed type.
        pub fn type_name(&self) -> &str {
            self.ty.name()
        }

        fn field(&self, name: &str) -> Option<&Cell> {
            self.heap.cell(locate(self.ty, self.object, name)?)
        }

        /// Integer attribute `name`.
        pub fn integer(&self, name: &str) -> Option<i64> {
            match self.field(name)? {
                Cell::Integer(v) => Some(*v),
                _ => None,
            }
        }

        /// Float attribute `name`.
        pub fn float(&self, name: &str) -> Option<f64> {
            match self.field(name)? {
                Cell::Float(v) => Some(*v),
                _ => None,
            }
        }

        /// String attribute `name`.
        pub fn string(&self, name: &str) -> Option<&str> {
            match self.field(name)? {
                Cell::String(v) => Some(v),
                _ => None,
            }
        }

        /// Reference attribute `name`; `None` if absent or null.
        pub fn reference(&self, name: &str) -> Option<ObjectRef> {
            match self.field(name)? {
                Cell::Reference(v) => *v,
                _ => None,
            }
        }

        /// Connections of signal attribute `name`.
        pub fn connections(&self, name: &str) -> &[Connection] {
            match self.field(name) {
                Some(Cell::Signal(v)) => v,
                _ => &[],
            }
        }
    };
}

/// Read-only view of one object.
#[derive(Clone, Copy, Debug)]
pub struct ObjectView<'a> {
    heap: &'a ObjectHeap,
    object: ObjectRef,
    ty: &'a dyn TypeDescriptor,
}

impl<'a> ObjectView<'a> {
    /// View `object`, resolving names through `ty`.
    pub fn new(heap: &'a ObjectHeap, object: ObjectRef, ty: &'a dyn TypeDescriptor) -> Self {
        Self { heap, object, ty }
    }

    getters!();
}

/// Mutable view of one object.
#[derive(Debug)]
pub struct ObjectMut<'a> {
    heap: &'a mut ObjectHeap,
    object: ObjectRef,
    ty: &'a dyn TypeDescriptor,
}

impl<'a> ObjectMut<'a> {
    /// View `object` mutably, resolving names through `ty`.
    pub fn new(heap: &'a mut ObjectHeap, object: ObjectRef, ty: &'a dyn TypeDescriptor) -> Self {
        Self { heap, object, ty }
    }

    getters!();

    /// Read-only view of the same object.
    pub fn view(&self) -> ObjectView<'_> {
        ObjectView::new(&*self.heap, self.object, self.ty)
    }

    /// Shorten the borrow, e.g. to re-target at an aspect.
    pub fn reborrow<'b>(&'b mut self, object: ObjectRef, ty: &'b dyn TypeDescriptor) -> ObjectMut<'b> {
        ObjectMut::new(&mut *self.heap, object, ty)
    }

    /// Direct heap access.
    pub fn heap(&self) -> &ObjectHeap {
        &*self.heap
    }

    fn field_mut(&mut self, name: &str) -> Option<&mut Cell> {
        let at = locate(self.ty, self.object, name)?;
        self.heap.cell_mut(at)
    }

    /// Set integer attribute `name`. Returns false if there is no such integer.
    pub fn set_integer(&mut self, name: &str, value: i64) -> bool {
        match self.field_mut(name) {
            Some(Cell::Integer(v)) => {
                *v = value;
                true
            }
            _ => false,
        }
    }

    /// Set float attribute `name`.
    pub fn set_float(&mut self, name: &str, value: f64) -> bool {
        match self.field_mut(name) {
            Some(Cell::Float(v)) => {
                *v = value;
                true
            }
            _ => false,
        }
    }

    /// Set string attribute `name`.
    pub fn set_string(&mut self, name: &str, value: impl Into<String>) -> bool {
        match self.field_mut(name) {
            Some(Cell::String(v)) => {
                *v = value.into();
                true
            }
            _ => false,
        }
    }

    /// Set reference attribute `name`.
    ///
    /// The caller is responsible for passing an object that provides the
    /// attribute's target type; use
    /// [`aspect_cast`](crate::aspect_cast) to find one.
    pub fn set_reference(&mut self, name: &str, value: Option<ObjectRef>) -> bool {
        match self.field_mut(name) {
            Some(Cell::Reference(v)) => {
                *v = value;
                true
            }
            _ => false,
        }
    }

    /// Append a connection to signal attribute `name`.
    pub fn connect(&mut self, name: &str, connection: Connection) -> bool {
        match self.field_mut(name) {
            Some(Cell::Signal(v)) => {
                v.push(connection);
                true
            }
            _ => false,
        }
    }
}

/// A change to the update set requested from inside an update pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Enrollment {
    /// Add the object to the update set.
    Enroll(ObjectRef),
    /// Remove the object from the update set.
    Withdraw(ObjectRef),
}

/// Context handed to [`TypeDescriptor::update`].
///
/// Derefs to the [`ObjectMut`] being updated. Enrollment changes are
/// queued and applied by the caller once the pass is over.
#[derive(Debug)]
pub struct UpdateCx<'a> {
    object: ObjectMut<'a>,
    requests: &'a mut Vec<Enrollment>,
}

impl<'a> UpdateCx<'a> {
    /// Wrap `object`, collecting enrollment requests into `requests`.
    pub fn new(object: ObjectMut<'a>, requests: &'a mut Vec<Enrollment>) -> Self {
        Self { object, requests }
    }

    /// Ask for `object` to be updated from the next pass on.
    pub fn enroll(&mut self, object: ObjectRef) {
        self.requests.push(Enrollment::Enroll(object));
    }

    /// Ask for `object` to stop being updated from the next pass on.
    pub fn withdraw(&mut self, object: ObjectRef) {
        self.requests.push(Enrollment::Withdraw(object));
    }

    /// A context for the element at `place` described by `ty`.
    pub fn retarget<'b>(&'b mut self, place: ObjectRef, ty: &'b dyn TypeDescriptor) -> UpdateCx<'b> {
        UpdateCx {
            object: self.object.reborrow(place, ty),
            requests: &mut *self.requests,
        }
    }
}

impl<'a> Deref for UpdateCx<'a> {
    type Target = ObjectMut<'a>;

    fn deref(&self) -> &Self::Target {
        &self.object
    }
}

impl DerefMut for UpdateCx<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.object
    }
}
