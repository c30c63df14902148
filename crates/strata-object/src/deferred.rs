//! Cross-references recorded during a load and resolved once every
//! object exists.

use strata_core::{CellRef, LoadIssue, ObjectRef, TypeId};
use tracing::{debug, warn};

use crate::cast::{aspect_cast, find_slot};
use crate::heap::{Cell, Connection};
use crate::space::ObjectSpace;

/// A reference field waiting for its target to exist.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeferredReference {
    /// The reference cell to fill.
    pub cell: CellRef,
    /// Capability the target must provide.
    pub target: TypeId,
    /// Id of the referenced top-level object.
    pub id: String,
}

/// A signal binding waiting for its receiver to exist.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeferredSignal {
    /// The signal cell to connect.
    pub cell: CellRef,
    /// Id of the receiving top-level object.
    pub receiver: String,
    /// Slot name on the receiver or one of its aspects.
    pub slot: String,
}

/// Pending cross-references of one load.
#[derive(Debug, Default)]
pub struct DeferredQueue {
    references: Vec<DeferredReference>,
    signals: Vec<DeferredSignal>,
}

/// Counts from one [`DeferredQueue::flush`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FlushStats {
    /// References written.
    pub references: usize,
    /// Connections added.
    pub signals: usize,
    /// Records that could not be resolved.
    pub failed: usize,
}

impl DeferredQueue {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a reference to resolve later.
    pub fn defer_reference(&mut self, record: DeferredReference) {
        self.references.push(record);
    }

    /// Record a signal binding to resolve later.
    pub fn defer_signal(&mut self, record: DeferredSignal) {
        self.signals.push(record);
    }

    /// Number of unresolved records.
    pub fn len(&self) -> usize {
        self.references.len() + self.signals.len()
    }

    /// Whether nothing is pending.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Resolve every record against `space`, references first.
    ///
    /// Each record is consumed exactly once. Records that cannot be
    /// resolved are reported in `issues` and leave their cell untouched.
    pub fn flush(&mut self, space: &mut dyn ObjectSpace, issues: &mut Vec<LoadIssue>) -> FlushStats {
        let mut stats = FlushStats::default();

        for record in std::mem::take(&mut self.references) {
            match resolve_reference(&*space, &record) {
                Ok(object) => {
                    if let Some(Cell::Reference(slot)) = space.heap_mut().cell_mut(record.cell) {
                        *slot = Some(object);
                        stats.references += 1;
                    }
                }
                Err(issue) => {
                    warn!(cell = %record.cell, %issue, "reference left null");
                    issues.push(issue);
                    stats.failed += 1;
                }
            }
        }

        for record in std::mem::take(&mut self.signals) {
            match resolve_signal(&*space, &record) {
                Ok(receiver) => {
                    if let Some(Cell::Signal(connections)) = space.heap_mut().cell_mut(record.cell) {
                        connections.push(Connection {
                            receiver,
                            slot: record.slot,
                        });
                        stats.signals += 1;
                    }
                }
                Err(issue) => {
                    warn!(cell = %record.cell, %issue, "signal binding dropped");
                    issues.push(issue);
                    stats.failed += 1;
                }
            }
        }

        debug!(
            references = stats.references,
            signals = stats.signals,
            failed = stats.failed,
            "deferred records flushed"
        );
        stats
    }
}

fn resolve_reference(space: &dyn ObjectSpace, record: &DeferredReference) -> Result<ObjectRef, LoadIssue> {
    let object = space
        .find_object(&record.id)
        .ok_or_else(|| LoadIssue::UnresolvedReference {
            id: record.id.clone(),
        })?;
    let types = space.types();
    aspect_cast(space.heap(), types, object, record.target).ok_or_else(|| {
        LoadIssue::ReferenceTypeMismatch {
            id: record.id.clone(),
            expected: types
                .get(record.target)
                .map_or_else(|| record.target.to_string(), |t| t.name().to_string()),
        }
    })
}

fn resolve_signal(space: &dyn ObjectSpace, record: &DeferredSignal) -> Result<ObjectRef, LoadIssue> {
    let unresolved = || LoadIssue::UnresolvedSlot {
        receiver: record.receiver.clone(),
        slot: record.slot.clone(),
    };
    let receiver = space.find_object(&record.receiver).ok_or_else(unresolved)?;
    find_slot(space.heap(), space.types(), receiver, &record.slot).ok_or_else(unresolved)?;
    Ok(receiver)
}
