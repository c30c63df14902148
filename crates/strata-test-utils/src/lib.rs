//! Test utilities and fixture types for Strata development.
//!
//! Provides a minimal [`ObjectSpace`] implementation ([`MemorySpace`]),
//! a shared set of scene types ([`fixtures`]), scene document builders
//! ([`trees`]), a small JSON syntax for readable test input
//! ([`syntax::MiniJson`]), and [`init_tracing`] for log output in tests.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;
pub mod syntax;
pub mod trees;

use std::collections::HashMap;
use std::sync::Arc;

use strata_core::{ObjectError, ObjectRef, TypeId, UniverseId};
use strata_object::{HeapConfig, ObjectHeap, ObjectSpace, ObjectView, TypeRegistry};

pub use fixtures::{scene_types, SceneTypes};
pub use syntax::MiniJson;

/// Install a `tracing` subscriber writing to the test harness.
///
/// Honors `RUST_LOG`; safe to call from every test.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Bare-bones object space for exercising the archive layer without a
/// full universe.
///
/// Requested ids that are empty or taken get a numeric suffix.
pub struct MemorySpace {
    types: Arc<TypeRegistry>,
    heap: ObjectHeap,
    ids: HashMap<String, ObjectRef>,
    names: HashMap<ObjectRef, String>,
    order: Vec<ObjectRef>,
}

impl MemorySpace {
    pub fn new(types: Arc<TypeRegistry>) -> Self {
        Self {
            types,
            heap: ObjectHeap::new(UniverseId::next(), &HeapConfig::default()),
            ids: HashMap::new(),
            names: HashMap::new(),
            order: Vec::new(),
        }
    }

    /// A space whose heap holds at most `max_cells` cells.
    pub fn with_capacity(types: Arc<TypeRegistry>, max_cells: usize) -> Self {
        let mut space = Self::new(types);
        space.heap = ObjectHeap::new(
            space.heap.universe(),
            &HeapConfig {
                initial_cells: max_cells,
                max_cells,
            },
        );
        space
    }

    /// Objects in creation order.
    pub fn objects(&self) -> &[ObjectRef] {
        &self.order
    }

    /// Read view of `object` through its own type.
    pub fn view(&self, object: ObjectRef) -> Option<ObjectView<'_>> {
        let ty = self.types.get(self.heap.type_of(object)?)?;
        Some(ObjectView::new(&self.heap, object, &**ty))
    }
}

impl ObjectSpace for MemorySpace {
    fn types(&self) -> &Arc<TypeRegistry> {
        &self.types
    }

    fn heap(&self) -> &ObjectHeap {
        &self.heap
    }

    fn heap_mut(&mut self) -> &mut ObjectHeap {
        &mut self.heap
    }

    fn create_object(&mut self, ty: TypeId, requested_id: &str) -> Result<ObjectRef, ObjectError> {
        let descriptor = self
            .types
            .get(ty)
            .ok_or(ObjectError::UnregisteredType { type_id: ty })?;
        if descriptor.is_abstract() {
            return Err(ObjectError::AbstractType {
                name: descriptor.name().to_string(),
            });
        }
        let object = self.heap.allocate(descriptor.size(), descriptor.alignment())?;
        descriptor.construct(object, &mut self.heap);

        let mut id = requested_id.to_string();
        if id.is_empty() || self.ids.contains_key(&id) {
            let base = if id.is_empty() { descriptor.name() } else { requested_id };
            id = format!("{base}{}", self.order.len());
        }
        self.ids.insert(id.clone(), object);
        self.names.insert(object, id);
        self.order.push(object);
        Ok(object)
    }

    fn find_object(&self, id: &str) -> Option<ObjectRef> {
        self.ids.get(id).copied()
    }

    fn object_id(&self, object: ObjectRef) -> Option<&str> {
        self.names.get(&object).map(String::as_str)
    }
}
