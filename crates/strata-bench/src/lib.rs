//! Benchmark profiles for the Strata object runtime.
//!
//! - [`populated_universe`]: a universe holding `n` widgets in a ring
//! - [`actor_scene`]: a scene document of `n` composite actors
//! - [`deep_tree`]: a nested value tree for navigation benchmarks

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use strata_engine::{Universe, UniverseConfig};
use strata_object::HeapConfig;
use strata_test_utils::trees::{push_object, scene_document, widget_ring_scene};
use strata_test_utils::SceneTypes;
use strata_tree::{Document, NodeKind};

/// Config with a heap large enough for every profile in this crate.
pub fn bench_config() -> UniverseConfig {
    UniverseConfig {
        heap: HeapConfig {
            initial_cells: 1 << 16,
            max_cells: 1 << 22,
        },
        ..UniverseConfig::default()
    }
}

/// A universe loaded from a ring of `n` widgets.
pub fn populated_universe(types: &SceneTypes, n: usize) -> Universe {
    let mut universe = Universe::new(types.registry.clone(), bench_config()).unwrap();
    let outcome = universe.load(&widget_ring_scene(n)).unwrap();
    assert!(outcome.succeeded(), "{}", outcome.message());
    universe
}

/// `n` actors, each sensor watching the previous actor's health.
pub fn actor_scene(n: usize) -> Document {
    scene_document(1, |objects| {
        for i in 0..n {
            let mut node = push_object(objects, "Actor", &format!("a{i}"));
            node.reborrow().key("name").set(format!("actor {i}"));
            node.reborrow().key("hp").set(100_i64);
            node.reborrow().key("range").set(12.5);
            if i > 0 {
                node.key("vitals").set(format!("a{}", i - 1));
            }
        }
    })
}

/// A tree `depth` maps deep, each level holding `width` integer entries.
pub fn deep_tree(depth: usize, width: usize) -> Document {
    let mut doc = Document::new();
    let mut node = doc.root_mut();
    for _ in 0..depth {
        node.reset(NodeKind::Map);
        for i in 0..width {
            node.reborrow().key(&format!("k{i}")).set(i as i64);
        }
        node = node.key("child");
    }
    doc
}

/// Key path from the root to the innermost map of [`deep_tree`].
pub fn deep_path(depth: usize) -> Vec<&'static str> {
    vec!["child"; depth.saturating_sub(1)]
}
