//! The registry of live objects.
//!
//! A [`Universe`] owns an [`ObjectHeap`] and every top-level object
//! constructed in it, addressed by a unique string identifier. It runs
//! per-frame updates for enrolled objects, delivers signal emissions to
//! connected slots, and loads and saves whole scenes.
//!
//! # Ownership model
//!
//! All mutating operations take `&mut self`; views returned by
//! [`object`](Universe::object) and [`object_mut`](Universe::object_mut)
//! borrow the universe, so no view can outlive a `clear`. Object handles
//! are plain indices and become stale once their object is destroyed.

use std::collections::HashMap;
use std::sync::Arc;

use indexmap::{IndexMap, IndexSet};
use strata_core::{LoadError, ObjectError, ObjectRef, TypeId, UniverseId};
use strata_object::{
    aspect_cast, find_slot, instantiate, serialize_scene, Connection, Enrollment, LoadOutcome,
    ObjectHeap, ObjectMut, ObjectSpace, ObjectView, TypeRegistry, UpdateCx,
};
use strata_tree::{Document, Scalar};
use tracing::{debug, info, warn};

use crate::config::{ConfigError, UniverseConfig};
use crate::metrics::UniverseMetrics;
use crate::naming::{unique_name, Naming};

// Compile-time assertion: Universe can move between threads.
const _: () = {
    #[allow(dead_code)]
    fn assert_send<T: Send>() {}
    #[allow(dead_code)]
    fn check() {
        assert_send::<Universe>();
    }
};

/// A freshly created object and how its identifier was assigned.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Created {
    /// Handle to the new object.
    pub object: ObjectRef,
    /// Whether the requested identifier was granted verbatim.
    pub naming: Naming,
}

/// Coarse lifecycle state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UniverseState {
    /// No live objects.
    Empty,
    /// At least one live object.
    Populated,
}

/// Owner of all live objects of one session.
#[derive(Debug)]
pub struct Universe {
    id: UniverseId,
    config: UniverseConfig,
    types: Arc<TypeRegistry>,
    heap: ObjectHeap,
    ids: IndexMap<String, ObjectRef>,
    names: HashMap<ObjectRef, String>,
    memory: Vec<ObjectRef>,
    updates: IndexSet<ObjectRef>,
    root: Option<ObjectRef>,
    metrics: UniverseMetrics,
}

impl Universe {
    /// Create an empty universe instantiating types from `types`.
    pub fn new(types: Arc<TypeRegistry>, config: UniverseConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let id = UniverseId::next();
        Ok(Self {
            id,
            heap: ObjectHeap::new(id, &config.heap),
            config,
            types,
            ids: IndexMap::new(),
            names: HashMap::new(),
            memory: Vec::new(),
            updates: IndexSet::new(),
            root: None,
            metrics: UniverseMetrics::default(),
        })
    }

    /// Process-unique identity of this universe.
    pub fn id(&self) -> UniverseId {
        self.id
    }

    /// The type registry.
    pub fn types(&self) -> &Arc<TypeRegistry> {
        &self.types
    }

    /// The configuration in use.
    pub fn config(&self) -> &UniverseConfig {
        &self.config
    }

    /// Object memory.
    pub fn heap(&self) -> &ObjectHeap {
        &self.heap
    }

    /// Counters, with gauges sampled now.
    pub fn metrics(&self) -> UniverseMetrics {
        UniverseMetrics {
            live_objects: self.memory.len(),
            live_headers: self.heap.live_objects(),
            heap_cells_used: self.heap.used_cells(),
            ..self.metrics.clone()
        }
    }

    /// Whether any object is live.
    pub fn state(&self) -> UniverseState {
        if self.memory.is_empty() {
            UniverseState::Empty
        } else {
            UniverseState::Populated
        }
    }

    /// Number of live top-level objects.
    pub fn len(&self) -> usize {
        self.memory.len()
    }

    /// Whether there are no live objects.
    pub fn is_empty(&self) -> bool {
        self.memory.is_empty()
    }

    /// Live top-level objects in creation order.
    pub fn objects(&self) -> impl ExactSizeIterator<Item = ObjectRef> + '_ {
        self.memory.iter().copied()
    }

    /// The scene root: set by [`create_root`](Self::create_root) or by the
    /// first load into an empty universe.
    pub fn root(&self) -> Option<ObjectRef> {
        self.root
    }

    /// Construct a top-level object of type `ty`.
    ///
    /// The identifier is assigned as by [`rename`](Self::rename). Objects
    /// whose type wants updates are enrolled right away.
    ///
    /// # Errors
    ///
    /// Fails for unregistered or abstract types and when the heap is full.
    pub fn create(&mut self, ty: TypeId, requested_id: &str) -> Result<Created, ObjectError> {
        let descriptor = self
            .types
            .get(ty)
            .cloned()
            .ok_or(ObjectError::UnregisteredType { type_id: ty })?;
        if descriptor.is_abstract() {
            return Err(ObjectError::AbstractType {
                name: descriptor.name().to_string(),
            });
        }
        let object = self.heap.allocate(descriptor.size(), descriptor.alignment())?;
        descriptor.construct(object, &mut self.heap);
        self.memory.push(object);
        let naming = self.assign_name(object, requested_id, descriptor.name());
        if descriptor.wants_update() {
            self.updates.insert(object);
        }
        self.metrics.objects_created += 1;
        debug!(
            %object,
            ty = descriptor.name(),
            id = self.names.get(&object).map(String::as_str),
            ?naming,
            "object created"
        );
        Ok(Created { object, naming })
    }

    /// Construct a top-level object of the type called `class`.
    pub fn create_by_name(&mut self, class: &str, requested_id: &str) -> Result<Created, ObjectError> {
        let ty = self.types.lookup(class).ok_or_else(|| ObjectError::UnknownType {
            name: class.to_string(),
        })?;
        self.create(ty, requested_id)
    }

    /// Clear the universe, then create the new scene root.
    pub fn create_root(&mut self, ty: TypeId, requested_id: &str) -> Result<Created, ObjectError> {
        self.clear();
        let created = self.create(ty, requested_id)?;
        self.root = Some(created.object);
        Ok(created)
    }

    fn check_owned(&self, object: ObjectRef) -> Result<(), ObjectError> {
        if !self.heap.is_live(object) {
            return Err(ObjectError::NotLive { object });
        }
        if !self.names.contains_key(&object) {
            return Err(ObjectError::NotOwned { object });
        }
        Ok(())
    }

    fn assign_name(&mut self, object: ObjectRef, requested_id: &str, type_name: &str) -> Naming {
        if let Some(old) = self.names.remove(&object) {
            self.ids.shift_remove(&old);
        }
        let (name, naming) = unique_name(requested_id, type_name, |c| self.ids.contains_key(c));
        if naming == Naming::Synthesized {
            self.metrics.synthesized_names += 1;
        }
        self.ids.insert(name.clone(), object);
        self.names.insert(object, name);
        naming
    }

    /// Give `object` a new identifier.
    ///
    /// The object's current identifier is released first, so renaming
    /// an object to its own id is exact. A requested id that is taken or
    /// shorter than two characters is replaced by a synthesized one.
    ///
    /// # Errors
    ///
    /// [`ObjectError::NotLive`] or [`ObjectError::NotOwned`] if `object`
    /// is not a live top-level object of this universe.
    pub fn rename(&mut self, object: ObjectRef, requested_id: &str) -> Result<Naming, ObjectError> {
        self.check_owned(object)?;
        let type_name = self
            .heap
            .type_of(object)
            .and_then(|t| self.types.get(t))
            .map(|d| d.name().to_string())
            .unwrap_or_default();
        let naming = self.assign_name(object, requested_id, &type_name);
        debug!(%object, requested = requested_id, ?naming, "object renamed");
        Ok(naming)
    }

    /// The top-level object called `id`.
    pub fn find(&self, id: &str) -> Option<ObjectRef> {
        self.ids.get(id).copied()
    }

    /// Identifier of `object`, or of its outermost composite for an aspect.
    pub fn id_of(&self, object: ObjectRef) -> Option<&str> {
        self.names
            .get(&self.heap.topmost(object))
            .map(String::as_str)
    }

    /// Read view of `object` through its exact type.
    pub fn object(&self, object: ObjectRef) -> Option<ObjectView<'_>> {
        let ty = self.types.get(self.heap.type_of(object)?)?;
        Some(ObjectView::new(&self.heap, object, &**ty))
    }

    /// Write view of `object` through its exact type.
    pub fn object_mut(&mut self, object: ObjectRef) -> Option<ObjectMut<'_>> {
        let ty = self.types.get(self.heap.type_of(object)?)?;
        Some(ObjectMut::new(&mut self.heap, object, &**ty))
    }

    /// The object providing `target` as seen from `object`, crossing
    /// composite boundaries.
    pub fn cast(&self, object: ObjectRef, target: TypeId) -> Option<ObjectRef> {
        aspect_cast(&self.heap, &self.types, object, target)
    }

    /// Include `object` in every following update pass.
    pub fn enroll(&mut self, object: ObjectRef) -> Result<(), ObjectError> {
        if !self.heap.is_live(object) {
            return Err(ObjectError::NotLive { object });
        }
        self.updates.insert(object);
        Ok(())
    }

    /// Stop updating `object`. Returns whether it was enrolled.
    pub fn withdraw(&mut self, object: ObjectRef) -> bool {
        self.updates.shift_remove(&object)
    }

    /// Whether `object` is in the update set.
    pub fn is_enrolled(&self, object: ObjectRef) -> bool {
        self.updates.contains(&object)
    }

    /// Run one update pass over the enrolled objects, in enrollment order.
    ///
    /// The pass works on a snapshot of the update set; enroll and
    /// withdraw requests made by hooks take effect from the next pass.
    pub fn update(&mut self, delta: f64) {
        let batch: Vec<ObjectRef> = self.updates.iter().copied().collect();
        let types = Arc::clone(&self.types);
        let mut requests = Vec::new();
        for object in batch {
            let Some(ty) = self.heap.type_of(object).and_then(|t| types.get(t)) else {
                continue;
            };
            let mut cx = UpdateCx::new(ObjectMut::new(&mut self.heap, object, &**ty), &mut requests);
            ty.update(&mut cx, delta);
        }
        for request in requests {
            match request {
                Enrollment::Enroll(object) => {
                    if let Err(error) = self.enroll(object) {
                        warn!(%object, %error, "enrollment request ignored");
                    }
                }
                Enrollment::Withdraw(object) => {
                    self.withdraw(object);
                }
            }
        }
        self.metrics.update_passes += 1;
    }

    /// Bind signal `signal` of `sender` to slot `slot` of `receiver`.
    ///
    /// Returns false, leaving nothing connected, when the receiver has no
    /// such slot or the sender no such signal.
    pub fn connect(
        &mut self,
        sender: ObjectRef,
        signal: &str,
        receiver: ObjectRef,
        slot: &str,
    ) -> Result<bool, ObjectError> {
        self.check_owned(receiver)?;
        if !self.heap.is_live(sender) {
            return Err(ObjectError::NotLive { object: sender });
        }
        if find_slot(&self.heap, &self.types, receiver, slot).is_none() {
            return Ok(false);
        }
        let connection = Connection {
            receiver,
            slot: slot.to_string(),
        };
        Ok(self
            .object_mut(sender)
            .is_some_and(|mut obj| obj.connect(signal, connection)))
    }

    /// Invoke every slot connected to signal `signal` of `sender`, in
    /// binding order. Returns the number of slots run.
    ///
    /// Connections whose receiver no longer exists are skipped.
    pub fn emit(&mut self, sender: ObjectRef, signal: &str, args: &[Scalar]) -> Result<usize, ObjectError> {
        let connections: Vec<Connection> = self
            .object(sender)
            .ok_or(ObjectError::NotLive { object: sender })?
            .connections(signal)
            .to_vec();
        let types = Arc::clone(&self.types);
        let mut invoked = 0;
        for connection in connections {
            let Some(target) = find_slot(&self.heap, &types, connection.receiver, &connection.slot) else {
                warn!(receiver = %connection.receiver, slot = %connection.slot, "stale connection skipped");
                continue;
            };
            let handler = Arc::clone(&target.slot().handler);
            handler(&mut ObjectMut::new(&mut self.heap, target.owner, &*target.ty), args);
            invoked += 1;
        }
        self.metrics.slot_invocations += invoked as u64;
        Ok(invoked)
    }

    /// Destruct one top-level object and forget it.
    ///
    /// Its cells stay allocated until [`clear`](Self::clear).
    pub fn destroy(&mut self, object: ObjectRef) -> Result<(), ObjectError> {
        self.check_owned(object)?;
        if let Some(ty) = self.heap.type_of(object).and_then(|t| self.types.get(t)) {
            ty.destruct(object, &mut self.heap);
        }
        if let Some(name) = self.names.remove(&object) {
            self.ids.shift_remove(&name);
        }
        self.memory.retain(|&o| o != object);
        self.updates.retain(|&o| self.heap.is_live(o));
        if self.root == Some(object) {
            self.root = None;
        }
        self.metrics.objects_destroyed += 1;
        debug!(%object, "object destroyed");
        Ok(())
    }

    /// Destruct every object in creation order and release all memory.
    pub fn clear(&mut self) {
        let count = self.memory.len();
        for &object in &self.memory {
            if let Some(ty) = self.heap.type_of(object).and_then(|t| self.types.get(t)) {
                ty.destruct(object, &mut self.heap);
            }
        }
        self.heap.clear();
        self.memory.clear();
        self.ids.clear();
        self.names.clear();
        self.updates.clear();
        self.root = None;
        self.metrics.objects_destroyed += count as u64;
        if count > 0 {
            info!(objects = count, "universe cleared");
        }
    }

    /// Instantiate the scene in `doc`.
    ///
    /// Objects already in the universe stay; new ones may reference them.
    /// The first object loaded becomes the root if there is none.
    pub fn load(&mut self, doc: &Document) -> Result<LoadOutcome, LoadError> {
        let config = self.config.archive.clone();
        let outcome = instantiate(doc, self, &config)?;
        if self.root.is_none() {
            self.root = outcome.root;
        }
        self.metrics.loads += 1;
        self.metrics.load_issues += outcome.issues.len() as u64;
        Ok(outcome)
    }

    /// Write every live object, in creation order, as a scene into `doc`.
    pub fn save(&mut self, doc: &mut Document) -> Result<usize, ObjectError> {
        let objects = self.memory.clone();
        self.save_objects(objects, doc)
    }

    /// Write `objects` as a scene into `doc`.
    pub fn save_objects(
        &mut self,
        objects: impl IntoIterator<Item = ObjectRef>,
        doc: &mut Document,
    ) -> Result<usize, ObjectError> {
        let written = serialize_scene(&*self, objects, doc, &self.config.archive)?;
        self.metrics.saves += 1;
        Ok(written)
    }
}

impl ObjectSpace for Universe {
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
        self.create(ty, requested_id).map(|c| c.object)
    }

    fn find_object(&self, id: &str) -> Option<ObjectRef> {
        self.find(id)
    }

    fn object_id(&self, object: ObjectRef) -> Option<&str> {
        self.names.get(&object).map(String::as_str)
    }
}
