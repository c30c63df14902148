//! Name and id lookup for every registered type.

use std::sync::Arc;

use indexmap::IndexMap;
use strata_core::TypeId;
use tracing::debug;

use crate::composite::CompositeType;
use crate::descriptor::TypeDescriptor;
use crate::error::TypeError;
use crate::object_type::{ObjectType, ObjectTypeBuilder};

/// The set of types a universe can instantiate.
///
/// Type ids are dense and assigned in registration order; the abstract
/// root type `Object` always has id 0. Registries are built up front and
/// then shared read-only, typically behind an `Arc`.
#[derive(Debug)]
pub struct TypeRegistry {
    types: Vec<Arc<dyn TypeDescriptor>>,
    by_name: IndexMap<String, TypeId>,
}

impl TypeRegistry {
    /// Id of the root `Object` type.
    pub const OBJECT: TypeId = TypeId(0);

    /// Name of the root type.
    pub const OBJECT_NAME: &'static str = "Object";

    pub(crate) const UNASSIGNED: TypeId = TypeId(u32::MAX);

    /// A registry holding only the root type.
    pub fn new() -> Self {
        let mut registry = Self {
            types: Vec::new(),
            by_name: IndexMap::new(),
        };
        registry.insert(Arc::new(ObjectType::root(Self::OBJECT)));
        registry
    }

    fn next_id(&self) -> TypeId {
        TypeId(self.types.len() as u32)
    }

    fn check_name(&self, name: &str) -> Result<(), TypeError> {
        if self.by_name.contains_key(name) {
            return Err(TypeError::DuplicateName {
                name: name.to_string(),
            });
        }
        Ok(())
    }

    fn insert(&mut self, descriptor: Arc<dyn TypeDescriptor>) -> TypeId {
        let id = descriptor.type_id();
        debug!(%id, name = descriptor.name(), size = descriptor.size(), "type registered");
        self.by_name.insert(descriptor.name().to_string(), id);
        self.types.push(descriptor);
        id
    }

    /// Register an object type.
    ///
    /// # Errors
    ///
    /// Fails on duplicate names, unknown super or reference targets, and
    /// invalid attribute layouts.
    pub fn register(&mut self, builder: ObjectTypeBuilder) -> Result<TypeId, TypeError> {
        self.check_name(builder.name())?;
        let ty = builder.build(self.next_id(), self)?;
        Ok(self.insert(Arc::new(ty)))
    }

    /// Start a composite over the registered type `base` (the root type
    /// if `None`).
    pub fn new_composite(
        &self,
        name: impl Into<String>,
        base: Option<TypeId>,
    ) -> Result<CompositeType, TypeError> {
        let base_id = base.unwrap_or(Self::OBJECT);
        let base = self
            .get(base_id)
            .cloned()
            .ok_or(TypeError::UnregisteredType { type_id: base_id })?;
        Ok(CompositeType::new(name, base))
    }

    /// Freeze and register `composite`.
    pub fn register_composite(&mut self, mut composite: CompositeType) -> Result<TypeId, TypeError> {
        self.check_name(composite.name())?;
        if composite.is_frozen() {
            return Err(TypeError::Frozen {
                name: composite.name().to_string(),
            });
        }
        composite.assign_id(self.next_id());
        composite.freeze();
        Ok(self.insert(Arc::new(composite)))
    }

    /// Register a descriptor implemented outside this crate. `make`
    /// receives the id the descriptor must report.
    pub fn register_descriptor<F>(&mut self, make: F) -> Result<TypeId, TypeError>
    where
        F: FnOnce(TypeId) -> Arc<dyn TypeDescriptor>,
    {
        let id = self.next_id();
        let descriptor = make(id);
        self.check_name(descriptor.name())?;
        if descriptor.type_id() != id {
            return Err(TypeError::InvalidLayout {
                name: descriptor.name().to_string(),
                reason: format!("reports id {} instead of {id}", descriptor.type_id()),
            });
        }
        if let Some(super_id) = descriptor.super_type() {
            if self.get(super_id).is_none() {
                return Err(TypeError::UnregisteredType { type_id: super_id });
            }
        }
        Ok(self.insert(descriptor))
    }

    /// Descriptor for `id`.
    pub fn get(&self, id: TypeId) -> Option<&Arc<dyn TypeDescriptor>> {
        self.types.get(id.0 as usize)
    }

    /// Id of the type called `name`.
    pub fn lookup(&self, name: &str) -> Option<TypeId> {
        self.by_name.get(name).copied()
    }

    /// Descriptor of the type called `name`.
    pub fn by_name(&self, name: &str) -> Option<&Arc<dyn TypeDescriptor>> {
        self.lookup(name).and_then(|id| self.get(id))
    }

    /// Whether instances of `ty` provide `target`.
    pub fn is_a(&self, ty: TypeId, target: TypeId) -> bool {
        self.get(ty).is_some_and(|d| d.provides(target, self))
    }

    /// Number of registered types, the root included.
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Always false: the root type is always present.
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// All descriptors in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn TypeDescriptor>> {
        self.types.iter()
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}
