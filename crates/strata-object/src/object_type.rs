//! Plain object types built from a list of fields.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use strata_core::{ObjectRef, TypeId};
use strata_tree::{NodeMut, NodeRef, Scalar};

use crate::archive::{read_fields, write_fields, DeserializeCx, SerializeCx, CLASS_KEY, ID_KEY};
use crate::descriptor::{Attribute, FieldKind, InitFn, Slot, TypeDescriptor, UpdateFn};
use crate::error::TypeError;
use crate::heap::ObjectHeap;
use crate::registry::TypeRegistry;
use crate::view::{ObjectMut, UpdateCx};

#[derive(Clone, Debug)]
enum FieldSpec {
    Integer,
    Float,
    String,
    Reference(String),
    Signal,
}

/// Declarative description of an object type, turned into an
/// [`ObjectType`] by [`TypeRegistry::register`].
///
/// ```
/// use strata_object::{ObjectTypeBuilder, TypeRegistry};
///
/// let mut types = TypeRegistry::new();
/// let widget = types
///     .register(
///         ObjectTypeBuilder::new("Widget")
///             .integer("count")
///             .reference("target", "Widget"),
///     )
///     .unwrap();
/// assert_eq!(types.lookup("Widget"), Some(widget));
/// ```
pub struct ObjectTypeBuilder {
    name: String,
    super_name: Option<String>,
    is_abstract: bool,
    fields: Vec<(String, FieldSpec)>,
    slots: Vec<Slot>,
    update: Option<UpdateFn>,
    initialize: Option<InitFn>,
}

impl ObjectTypeBuilder {
    /// Start a type called `name` deriving from the root `Object` type.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            super_name: None,
            is_abstract: false,
            fields: Vec::new(),
            slots: Vec::new(),
            update: None,
            initialize: None,
        }
    }

    /// Name of the type being built.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Derive from the registered type `super_name`.
    pub fn extends(mut self, super_name: impl Into<String>) -> Self {
        self.super_name = Some(super_name.into());
        self
    }

    /// Mark the type as non-instantiable.
    pub fn abstract_type(mut self) -> Self {
        self.is_abstract = true;
        self
    }

    /// Add an integer attribute.
    pub fn integer(self, name: impl Into<String>) -> Self {
        self.field(name, FieldSpec::Integer)
    }

    /// Add a float attribute.
    pub fn float(self, name: impl Into<String>) -> Self {
        self.field(name, FieldSpec::Float)
    }

    /// Add a string attribute.
    pub fn string(self, name: impl Into<String>) -> Self {
        self.field(name, FieldSpec::String)
    }

    /// Add a reference to an object providing `target`. The target may be
    /// the type being built.
    pub fn reference(self, name: impl Into<String>, target: impl Into<String>) -> Self {
        self.field(name, FieldSpec::Reference(target.into()))
    }

    /// Add a signal attribute.
    pub fn signal(self, name: impl Into<String>) -> Self {
        self.field(name, FieldSpec::Signal)
    }

    fn field(mut self, name: impl Into<String>, spec: FieldSpec) -> Self {
        self.fields.push((name.into(), spec));
        self
    }

    /// Declare a slot. A slot with the same name as an inherited one
    /// shadows it.
    pub fn slot<F>(mut self, name: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&mut ObjectMut<'_>, &[Scalar]) + Send + Sync + 'static,
    {
        self.slots.push(Slot {
            name: name.into(),
            handler: Arc::new(handler),
        });
        self
    }

    /// Per-frame update hook; instances become eligible for enrollment.
    pub fn on_update<F>(mut self, hook: F) -> Self
    where
        F: Fn(&mut UpdateCx<'_>, f64) + Send + Sync + 'static,
    {
        self.update = Some(Arc::new(hook));
        self
    }

    /// Hook run on every instance created by a scene load.
    pub fn on_initialize<F>(mut self, hook: F) -> Self
    where
        F: Fn(&mut ObjectMut<'_>) + Send + Sync + 'static,
    {
        self.initialize = Some(Arc::new(hook));
        self
    }

    pub(crate) fn build(self, id: TypeId, types: &TypeRegistry) -> Result<ObjectType, TypeError> {
        let invalid = |reason: String| TypeError::InvalidLayout {
            name: self.name.clone(),
            reason,
        };

        let super_name = self.super_name.as_deref().unwrap_or(TypeRegistry::OBJECT_NAME);
        let parent = types
            .by_name(super_name)
            .cloned()
            .ok_or_else(|| TypeError::UnknownType {
                name: super_name.to_string(),
            })?;
        if parent.as_composite().is_some() {
            return Err(invalid(format!("cannot derive from composite '{super_name}'")));
        }

        let mut attributes = parent.attributes().to_vec();
        let mut seen: HashSet<String> = attributes.iter().map(|a| a.name.clone()).collect();
        let base = parent.size();
        for (index, (name, spec)) in self.fields.iter().enumerate() {
            if name == CLASS_KEY || name == ID_KEY {
                return Err(invalid(format!("attribute name '{name}' is reserved")));
            }
            if !seen.insert(name.clone()) {
                return Err(invalid(format!("duplicate attribute '{name}'")));
            }
            let kind = match spec {
                FieldSpec::Integer => FieldKind::Integer,
                FieldSpec::Float => FieldKind::Float,
                FieldSpec::String => FieldKind::String,
                FieldSpec::Signal => FieldKind::Signal,
                FieldSpec::Reference(target) if *target == self.name => FieldKind::Reference { target: id },
                FieldSpec::Reference(target) => FieldKind::Reference {
                    target: types.lookup(target).ok_or_else(|| TypeError::UnknownType {
                        name: target.clone(),
                    })?,
                },
            };
            attributes.push(Attribute {
                name: name.clone(),
                kind,
                offset: base + index,
            });
        }

        let mut slots = self.slots;
        for inherited in parent.slots() {
            if !slots.iter().any(|s| s.name == inherited.name) {
                slots.push(inherited.clone());
            }
        }

        Ok(ObjectType {
            id,
            name: self.name,
            size: base + self.fields.len(),
            super_type: Some(parent.type_id()),
            parent: Some(parent),
            is_abstract: self.is_abstract,
            attributes,
            slots,
            update: self.update,
            initialize: self.initialize,
        })
    }
}

impl fmt::Debug for ObjectTypeBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectTypeBuilder")
            .field("name", &self.name)
            .field("super_name", &self.super_name)
            .field("fields", &self.fields)
            .finish_non_exhaustive()
    }
}

/// A registered object type: a header followed by one cell per attribute.
pub struct ObjectType {
    id: TypeId,
    name: String,
    size: usize,
    super_type: Option<TypeId>,
    parent: Option<Arc<dyn TypeDescriptor>>,
    is_abstract: bool,
    attributes: Vec<Attribute>,
    slots: Vec<Slot>,
    update: Option<UpdateFn>,
    initialize: Option<InitFn>,
}

impl ObjectType {
    /// The abstract root of the object hierarchy.
    pub(crate) fn root(id: TypeId) -> Self {
        Self {
            id,
            name: TypeRegistry::OBJECT_NAME.to_string(),
            size: 1,
            super_type: None,
            parent: None,
            is_abstract: true,
            attributes: Vec::new(),
            slots: Vec::new(),
            update: None,
            initialize: None,
        }
    }
}

impl fmt::Debug for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectType")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("size", &self.size)
            .field("super_type", &self.super_type)
            .field("attributes", &self.attributes)
            .finish_non_exhaustive()
    }
}

impl TypeDescriptor for ObjectType {
    fn type_id(&self) -> TypeId {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn super_type(&self) -> Option<TypeId> {
        self.super_type
    }

    fn is_abstract(&self) -> bool {
        self.is_abstract
    }

    fn size(&self) -> usize {
        self.size
    }

    fn construct(&self, place: ObjectRef, heap: &mut ObjectHeap) {
        heap.write_header(place, self.id, 0);
        for attr in &self.attributes {
            heap.set_cell(place.cell(attr.offset), attr.kind.default_cell());
        }
    }

    fn destruct(&self, place: ObjectRef, heap: &mut ObjectHeap) {
        heap.release(place, self.size);
    }

    fn serialize_raw(&self, place: ObjectRef, node: NodeMut<'_>, cx: &SerializeCx<'_>) {
        write_fields(&self.attributes, place, node, cx);
    }

    fn deserialize_raw(&self, place: ObjectRef, node: NodeRef<'_>, cx: &mut DeserializeCx<'_>) {
        read_fields(&self.attributes, place, node, cx);
    }

    fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    fn slots(&self) -> &[Slot] {
        &self.slots
    }

    fn wants_update(&self) -> bool {
        self.update.is_some() || self.parent.as_ref().is_some_and(|p| p.wants_update())
    }

    fn update(&self, cx: &mut UpdateCx<'_>, delta: f64) {
        match (&self.update, &self.parent) {
            (Some(hook), _) => hook(cx, delta),
            (None, Some(parent)) => parent.update(cx, delta),
            (None, None) => {}
        }
    }

    fn initialize(&self, object: &mut ObjectMut<'_>) {
        match (&self.initialize, &self.parent) {
            (Some(hook), _) => hook(object),
            (None, Some(parent)) => parent.initialize(object),
            (None, None) => {}
        }
    }
}
