//! Universe configuration, validation, and error types.
//!
//! [`UniverseConfig`] is the input for constructing a
//! [`Universe`](crate::Universe). [`validate()`](UniverseConfig::validate)
//! checks structural invariants before any memory is reserved.

use std::error::Error;
use std::fmt;

use strata_object::{ArchiveConfig, HeapConfig};

// ── ConfigError ────────────────────────────────────────────────────

/// Errors detected during [`UniverseConfig::validate()`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// The heap may not hold even a single object header.
    EmptyHeap,
    /// More cells were reserved up front than the heap may ever hold.
    InitialExceedsMax {
        /// Configured reservation.
        initial: usize,
        /// Configured maximum.
        max: usize,
    },
    /// Cell handles are 32-bit; the maximum does not fit.
    HeapTooLarge {
        /// The configured maximum.
        max: usize,
    },
    /// Scene format versions start at 1.
    InvalidFormatVersion {
        /// The configured version.
        value: i64,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyHeap => write!(f, "heap max_cells must be at least 1"),
            Self::InitialExceedsMax { initial, max } => {
                write!(f, "heap initial_cells {initial} exceeds max_cells {max}")
            }
            Self::HeapTooLarge { max } => write!(f, "heap max_cells {max} exceeds u32::MAX"),
            Self::InvalidFormatVersion { value } => {
                write!(f, "archive format_version must be at least 1, got {value}")
            }
        }
    }
}

impl Error for ConfigError {}

// ── UniverseConfig ─────────────────────────────────────────────────

/// Complete configuration for a [`Universe`](crate::Universe).
#[derive(Clone, Debug, Default)]
pub struct UniverseConfig {
    /// Object memory limits.
    pub heap: HeapConfig,
    /// Scene format accepted by `load` and written by `save`.
    pub archive: ArchiveConfig,
}

impl UniverseConfig {
    /// Validate all structural invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let heap = &self.heap;
        if heap.max_cells == 0 {
            return Err(ConfigError::EmptyHeap);
        }
        if u32::try_from(heap.max_cells).is_err() {
            return Err(ConfigError::HeapTooLarge { max: heap.max_cells });
        }
        if heap.initial_cells > heap.max_cells {
            return Err(ConfigError::InitialExceedsMax {
                initial: heap.initial_cells,
                max: heap.max_cells,
            });
        }
        if self.archive.format_version < 1 {
            return Err(ConfigError::InvalidFormatVersion {
                value: self.archive.format_version,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(UniverseConfig::default().validate().is_ok());
    }

    #[test]
    fn zero_capacity_fails() {
        let mut cfg = UniverseConfig::default();
        cfg.heap.max_cells = 0;
        assert_eq!(cfg.validate(), Err(ConfigError::EmptyHeap));
    }

    #[test]
    fn oversized_reservation_fails() {
        let mut cfg = UniverseConfig::default();
        cfg.heap.initial_cells = 10;
        cfg.heap.max_cells = 4;
        match cfg.validate() {
            Err(ConfigError::InitialExceedsMax { initial: 10, max: 4 }) => {}
            other => panic!("expected InitialExceedsMax, got {other:?}"),
        }
    }

    #[test]
    fn format_version_must_be_positive() {
        let mut cfg = UniverseConfig::default();
        cfg.archive.format_version = 0;
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::InvalidFormatVersion { value: 0 })
        );
    }

    #[test]
    fn display_mentions_values() {
        let err = ConfigError::InitialExceedsMax { initial: 10, max: 4 };
        assert_eq!(err.to_string(), "heap initial_cells 10 exceeds max_cells 4");
    }
}
