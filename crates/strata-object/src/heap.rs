//! Cell-addressed object memory owned by a registry.
//!
//! An [`ObjectHeap`] is a bump-allocated `Vec<Cell>`. Every object
//! occupies a contiguous run of cells starting with an [`ObjectHeader`];
//! a composite's aspects live inside the same run at fixed offsets and
//! carry their own headers. Cells are never released individually: a
//! destructed object leaves Vacant cells behind until [`ObjectHeap::clear`]
//! resets the whole heap.

use strata_core::{CellRef, ObjectError, ObjectRef, TypeId, UniverseId};

/// A pending signal-to-slot link stored in a signal cell.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Connection {
    /// The object whose slot is invoked (a top-level object).
    pub receiver: ObjectRef,
    /// Name of the slot on the receiver or one of its aspects.
    pub slot: String,
}

/// Per-object header stored in the first cell of every object.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ObjectHeader {
    /// Exact type of the object.
    pub ty: TypeId,
    /// Distance in cells back to the enclosing composite, 0 if the
    /// object is not embedded.
    pub offset: u32,
    /// The registry that owns the object.
    pub universe: UniverseId,
}

/// One unit of object memory.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Cell {
    /// Allocated but not constructed (or already destructed).
    #[default]
    Vacant,
    /// Start of an object.
    Header(ObjectHeader),
    /// Integer field.
    Integer(i64),
    /// Float field.
    Float(f64),
    /// String field.
    String(String),
    /// Object reference field.
    Reference(Option<ObjectRef>),
    /// Signal field with its connections in binding order.
    Signal(Vec<Connection>),
}

/// Capacity settings for an [`ObjectHeap`].
#[derive(Clone, Debug)]
pub struct HeapConfig {
    /// Cells reserved at creation. Default: 1024.
    pub initial_cells: usize,
    /// Hard upper bound on allocated cells. Default: 16_777_216.
    pub max_cells: usize,
}

impl HeapConfig {
    /// Default number of pre-reserved cells.
    pub const DEFAULT_INITIAL_CELLS: usize = 1024;

    /// Default hard capacity.
    pub const DEFAULT_MAX_CELLS: usize = 1 << 24;
}

impl Default for HeapConfig {
    fn default() -> Self {
        Self {
            initial_cells: Self::DEFAULT_INITIAL_CELLS,
            max_cells: Self::DEFAULT_MAX_CELLS,
        }
    }
}

/// Bump-allocated object memory.
#[derive(Debug)]
pub struct ObjectHeap {
    universe: UniverseId,
    cells: Vec<Cell>,
    max_cells: usize,
    live: usize,
}

impl ObjectHeap {
    /// Create an empty heap owned by `universe`.
    pub fn new(universe: UniverseId, config: &HeapConfig) -> Self {
        Self {
            universe,
            cells: Vec::with_capacity(config.initial_cells.min(config.max_cells)),
            max_cells: config.max_cells,
            live: 0,
        }
    }

    /// The owning registry.
    pub fn universe(&self) -> UniverseId {
        self.universe
    }

    /// Reserve `size` Vacant cells aligned to `align` cells.
    ///
    /// # Errors
    ///
    /// Returns [`ObjectError::CapacityExceeded`] if the allocation would
    /// grow the heap past its configured maximum.
    pub fn allocate(&mut self, size: usize, align: usize) -> Result<ObjectRef, ObjectError> {
        let start = self.cells.len().next_multiple_of(align.max(1));
        let end = start
            .checked_add(size)
            .filter(|&end| end <= self.max_cells && end <= u32::MAX as usize)
            .ok_or(ObjectError::CapacityExceeded {
                requested: size,
                capacity: self.max_cells,
            })?;
        self.cells.resize_with(end, Cell::default);
        Ok(ObjectRef(start as u32))
    }

    /// The cell at `at`, if allocated.
    pub fn cell(&self, at: CellRef) -> Option<&Cell> {
        self.cells.get(at.index())
    }

    /// Mutable access to the cell at `at`, if allocated.
    pub fn cell_mut(&mut self, at: CellRef) -> Option<&mut Cell> {
        self.cells.get_mut(at.index())
    }

    /// Store `cell` at `at`. Writes outside the allocated range are ignored.
    pub fn set_cell(&mut self, at: CellRef, cell: Cell) {
        if let Some(slot) = self.cells.get_mut(at.index()) {
            *slot = cell;
        }
    }

    /// Construct a header at `place`.
    pub fn write_header(&mut self, place: ObjectRef, ty: TypeId, offset: u32) {
        let header = ObjectHeader {
            ty,
            offset,
            universe: self.universe,
        };
        if let Some(slot) = self.cells.get_mut(place.index()) {
            if !matches!(slot, Cell::Header(_)) {
                self.live += 1;
            }
            *slot = Cell::Header(header);
        }
    }

    /// Return `len` cells starting at `place` to Vacant.
    pub fn release(&mut self, place: ObjectRef, len: usize) {
        let start = place.index().min(self.cells.len());
        let end = (start + len).min(self.cells.len());
        for slot in &mut self.cells[start..end] {
            if matches!(slot, Cell::Header(_)) {
                self.live -= 1;
            }
            *slot = Cell::Vacant;
        }
    }

    /// The header of the object at `object`.
    pub fn header(&self, object: ObjectRef) -> Option<&ObjectHeader> {
        match self.cells.get(object.index()) {
            Some(Cell::Header(header)) => Some(header),
            _ => None,
        }
    }

    /// Mutable header of the object at `object`.
    pub fn header_mut(&mut self, object: ObjectRef) -> Option<&mut ObjectHeader> {
        match self.cells.get_mut(object.index()) {
            Some(Cell::Header(header)) => Some(header),
            _ => None,
        }
    }

    /// Exact type of the object at `object`.
    pub fn type_of(&self, object: ObjectRef) -> Option<TypeId> {
        self.header(object).map(|h| h.ty)
    }

    /// Whether `object` names a constructed object in this heap.
    pub fn is_live(&self, object: ObjectRef) -> bool {
        self.header(object).is_some()
    }

    /// The composite that directly embeds `object`, if any.
    pub fn enclosing(&self, object: ObjectRef) -> Option<ObjectRef> {
        let header = self.header(object)?;
        if header.offset == 0 {
            return None;
        }
        object.back_by(header.offset as usize)
    }

    /// The outermost composite containing `object` (itself if not embedded).
    pub fn topmost(&self, object: ObjectRef) -> ObjectRef {
        let mut current = object;
        while let Some(parent) = self.enclosing(current) {
            current = parent;
        }
        current
    }

    /// Number of constructed headers, aspects included.
    pub fn live_objects(&self) -> usize {
        self.live
    }

    /// Number of cells handed out so far.
    pub fn used_cells(&self) -> usize {
        self.cells.len()
    }

    /// Hard capacity in cells.
    pub fn capacity(&self) -> usize {
        self.max_cells
    }

    /// Release every cell at once.
    pub fn clear(&mut self) {
        self.cells.clear();
        self.live = 0;
    }
}
