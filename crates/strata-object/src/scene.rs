//! Whole-scene load and save.
//!
//! A scene document is a map `{ "format": <int>, "objects": [ ... ] }`
//! where every element of `objects` is an object map as written by
//! [`serialize_object`].

use std::fmt::Write as _;
use std::sync::Arc;

use strata_core::{LoadError, LoadIssue, ObjectError, ObjectRef};
use strata_tree::{Document, NodeKind};
use tracing::info;

use crate::archive::{deserialize_object, serialize_object};
use crate::deferred::DeferredQueue;
use crate::space::ObjectSpace;
use crate::view::ObjectMut;

/// Key of the format version.
pub const FORMAT_KEY: &str = "format";
/// Key of the object array.
pub const OBJECTS_KEY: &str = "objects";

/// Scene format settings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArchiveConfig {
    /// Version written on save and the newest accepted on load. Default: 1.
    pub format_version: i64,
    /// Refuse documents with a newer format. Default: true.
    pub reject_newer_format: bool,
}

impl ArchiveConfig {
    /// The current scene format.
    pub const CURRENT_FORMAT: i64 = 1;
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            format_version: Self::CURRENT_FORMAT,
            reject_newer_format: true,
        }
    }
}

/// Result of a best-effort scene load.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LoadOutcome {
    /// First object created, if any.
    pub root: Option<ObjectRef>,
    /// Every object created, in document order.
    pub objects: Vec<ObjectRef>,
    /// Recovered problems. Objects created before a problem are kept.
    pub issues: Vec<LoadIssue>,
    /// Format version found in the document.
    pub format: i64,
}

impl LoadOutcome {
    /// Whether the load completed without issues.
    pub fn succeeded(&self) -> bool {
        self.issues.is_empty()
    }

    /// One line per issue, empty on success.
    pub fn message(&self) -> String {
        let mut out = String::new();
        for (i, issue) in self.issues.iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            let _ = write!(out, "{issue}");
        }
        out
    }
}

fn structural(reason: impl Into<String>) -> LoadError {
    LoadError::Structural {
        reason: reason.into(),
    }
}

/// Create every object described by `doc` in `space`, then resolve
/// cross-references and run initializers.
///
/// # Errors
///
/// [`LoadError::Structural`] if the document is not a scene, or its
/// format is newer than `config` accepts. Nothing is created in that case.
pub fn instantiate(
    doc: &Document,
    space: &mut dyn ObjectSpace,
    config: &ArchiveConfig,
) -> Result<LoadOutcome, LoadError> {
    let root = doc.root();
    if !root.is_map() {
        return Err(structural(format!("root is {}, expected map", root.kind())));
    }
    let format = root
        .key(FORMAT_KEY)
        .get::<i64>()
        .map_err(|_| structural("missing format version"))?;
    if format > config.format_version && config.reject_newer_format {
        return Err(structural(format!(
            "format {format} is newer than supported {}",
            config.format_version
        )));
    }
    let definitions = root.key(OBJECTS_KEY);
    if !definitions.is_array() {
        return Err(structural("missing objects array"));
    }

    let mut outcome = LoadOutcome {
        format,
        ..LoadOutcome::default()
    };
    let mut deferred = DeferredQueue::new();
    for definition in definitions.elements() {
        if let Some(object) = deserialize_object(definition, space, &mut deferred, &mut outcome.issues) {
            outcome.objects.push(object);
        }
    }
    deferred.flush(space, &mut outcome.issues);

    let types = Arc::clone(space.types());
    for &object in &outcome.objects {
        let Some(ty) = space.heap().type_of(object).and_then(|t| types.get(t)) else {
            continue;
        };
        ty.initialize(&mut ObjectMut::new(space.heap_mut(), object, &**ty));
    }

    outcome.root = outcome.objects.first().copied();
    info!(
        format,
        objects = outcome.objects.len(),
        issues = outcome.issues.len(),
        "scene instantiated"
    );
    Ok(outcome)
}

/// Write `objects` as a scene into `doc`, replacing its contents.
///
/// Returns the number of objects written.
///
/// # Errors
///
/// [`ObjectError::NotLive`] for an object that is not constructed.
pub fn serialize_scene(
    space: &dyn ObjectSpace,
    objects: impl IntoIterator<Item = ObjectRef>,
    doc: &mut Document,
    config: &ArchiveConfig,
) -> Result<usize, ObjectError> {
    doc.clear();
    let mut root = doc.root_mut();
    root.reborrow().key(FORMAT_KEY).set(config.format_version);
    let mut array = root.key(OBJECTS_KEY);
    array.reset(NodeKind::Array);
    let mut written = 0;
    for object in objects {
        serialize_object(space, object, array.reborrow().push())?;
        written += 1;
    }
    info!(objects = written, "scene serialized");
    Ok(written)
}
