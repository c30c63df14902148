//! Object registry for Strata sessions.
//!
//! Provides [`Universe`], which owns every live object of a session,
//! assigns their identifiers, runs per-frame updates, delivers signals,
//! and loads and saves scenes through `strata-object`.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod metrics;
pub mod naming;
pub mod universe;

pub use config::{ConfigError, UniverseConfig};
pub use metrics::UniverseMetrics;
pub use naming::Naming;
pub use universe::{Created, Universe, UniverseState};
