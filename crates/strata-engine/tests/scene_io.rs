//! Scene load and save through a Universe.

use proptest::prelude::*;
use strata_core::LoadIssue;
use strata_engine::{Universe, UniverseConfig};
use strata_test_utils::trees::{bind_signal, push_object, scene_document, widget_pair_scene};
use strata_test_utils::{init_tracing, scene_types, MiniJson};
use strata_tree::Document;

fn empty_universe() -> Universe {
    init_tracing();
    Universe::new(scene_types().registry, UniverseConfig::default()).unwrap()
}

#[test]
fn scene_example_loads_and_resolves() {
    let mut u = empty_universe();
    let doc = MiniJson::parse(
        r#"{"format":1,"objects":[{"class":"Widget","id":"w1","target":"w2"},{"class":"Widget","id":"w2"}]}"#,
    )
    .unwrap();
    let outcome = u.load(&doc).unwrap();
    assert!(outcome.succeeded());
    assert_eq!(u.len(), 2);

    let w1 = u.find("w1").unwrap();
    let w2 = u.find("w2").unwrap();
    assert_eq!(u.root(), Some(w1));
    assert_eq!(u.object(w1).unwrap().reference("target"), Some(w2));
    assert_eq!(u.metrics().loads, 1);
}

#[test]
fn loaded_signal_bindings_fire_on_emit() {
    let mut u = empty_universe();
    let doc = scene_document(1, |objects| {
        let mut button = push_object(objects, "Widget", "button");
        bind_signal(&mut button, "clicked", "lamp", "poke");
        push_object(objects, "Widget", "lamp");
    });
    u.load(&doc).unwrap();
    let button = u.find("button").unwrap();
    let lamp = u.find("lamp").unwrap();
    assert_eq!(u.emit(button, "clicked", &[]).unwrap(), 1);
    assert_eq!(u.object(lamp).unwrap().integer("count"), Some(1));
}

#[test]
fn loaded_updaters_are_enrolled_and_initialized() {
    let mut u = empty_universe();
    let doc = scene_document(1, |objects| {
        push_object(objects, "Ticker", "t1");
        push_object(objects, "Beacon", "b1");
    });
    u.load(&doc).unwrap();
    let t1 = u.find("t1").unwrap();
    let b1 = u.find("b1").unwrap();
    assert!(u.is_enrolled(t1));
    assert_eq!(u.object(b1).unwrap().integer("armed"), Some(1));
}

#[test]
fn load_issues_are_counted_and_reported() {
    let mut u = empty_universe();
    let doc = scene_document(1, |objects| {
        push_object(objects, "Gizmo", "g1");
        push_object(objects, "Widget", "w1").key("target").set("nowhere");
    });
    let outcome = u.load(&doc).unwrap();
    assert!(!outcome.succeeded());
    assert_eq!(
        outcome.issues,
        vec![
            LoadIssue::UnknownType { class: "Gizmo".into() },
            LoadIssue::UnresolvedReference { id: "nowhere".into() },
        ]
    );
    assert!(outcome.message().contains("Gizmo"));
    assert_eq!(u.metrics().load_issues, 2);
    assert_eq!(u.len(), 1);
}

#[test]
fn structural_errors_leave_the_universe_untouched() {
    let mut u = empty_universe();
    u.load(&widget_pair_scene()).unwrap();
    let bad = MiniJson::parse(r#"{"format":"one","objects":[]}"#).unwrap();
    assert!(u.load(&bad).is_err());
    assert_eq!(u.len(), 2);
    assert_eq!(u.metrics().loads, 1);
}

#[test]
fn loading_twice_synthesizes_conflicting_ids() {
    let mut u = empty_universe();
    u.load(&widget_pair_scene()).unwrap();
    let first_root = u.root();
    let outcome = u.load(&widget_pair_scene()).unwrap();
    assert_eq!(u.len(), 4);
    assert_eq!(u.root(), first_root);
    let ids: Vec<&str> = outcome.objects.iter().filter_map(|&o| u.id_of(o)).collect();
    assert_eq!(ids, vec!["w101", "w201"]);
}

#[test]
fn save_load_save_round_trips() {
    let mut u = empty_universe();
    let source = scene_document(1, |objects| {
        let mut a1 = push_object(objects, "Actor", "a1");
        a1.reborrow().key("name").set("scout");
        a1.reborrow().key("hp").set(12);
        a1.key("vitals").set("a2");
        push_object(objects, "Actor", "a2").key("range").set(4.5);
        let mut w = push_object(objects, "Widget", "w1");
        w.reborrow().key("target").set("w1");
        bind_signal(&mut w, "clicked", "a2", "heal");
    });
    assert!(u.load(&source).unwrap().succeeded());

    let mut first = Document::new();
    assert_eq!(u.save(&mut first).unwrap(), 3);

    let mut v = empty_universe();
    assert!(v.load(&first).unwrap().succeeded());
    let mut second = Document::new();
    v.save(&mut second).unwrap();

    assert_eq!(first, second);
    let w1 = v.find("w1").unwrap();
    assert_eq!(v.object(w1).unwrap().reference("target"), Some(w1));
    assert_eq!(v.emit(w1, "clicked", &[]).unwrap(), 1);
}

#[test]
fn text_round_trip_through_mini_json() {
    let mut u = empty_universe();
    u.load(&widget_pair_scene()).unwrap();
    let mut doc = Document::new();
    u.save(&mut doc).unwrap();
    let text = MiniJson::render(&doc).unwrap();
    assert_eq!(
        text,
        r#"{"format":1,"objects":[{"class":"Widget","id":"w1","count":0,"label":"","target":"w2","clicked":null},{"class":"Widget","id":"w2","count":0,"label":"","target":null,"clicked":null}]}"#
    );
    assert_eq!(MiniJson::parse(&text).unwrap(), doc);
}

proptest! {
    #[test]
    fn identifiers_stay_unique(requests in prop::collection::vec("[a-c]{0,3}[0-9]{0,2}", 1..40)) {
        let fx = scene_types();
        let mut u = Universe::new(fx.registry.clone(), UniverseConfig::default()).unwrap();
        let mut created = Vec::new();
        for requested in &requests {
            created.push(u.create(fx.widget, requested).unwrap().object);
        }
        let mut seen = std::collections::HashSet::new();
        for &object in &created {
            let id = u.id_of(object).unwrap().to_string();
            prop_assert!(id.chars().count() >= 2);
            prop_assert_eq!(u.find(&id), Some(object));
            prop_assert!(seen.insert(id));
        }
    }
}
