//! Scene load/save through the archive layer against a MemorySpace.

use strata_core::{LoadError, LoadIssue, ObjectError};
use strata_object::{instantiate, serialize_scene, ArchiveConfig, Connection, ObjectSpace};
use strata_test_utils::trees::{bind_signal, push_object, scene_document, widget_ring_scene};
use strata_test_utils::{init_tracing, scene_types, MemorySpace, MiniJson};
use strata_tree::{Document, NodeKind};

fn load(space: &mut MemorySpace, doc: &Document) -> strata_object::LoadOutcome {
    instantiate(doc, space, &ArchiveConfig::default()).unwrap()
}

#[test]
fn widget_pair_resolves_forward_reference() {
    init_tracing();
    let fx = scene_types();
    let doc = MiniJson::parse(
        r#"{"format":1,"objects":[{"class":"Widget","id":"w1","target":"w2"},{"class":"Widget","id":"w2"}]}"#,
    )
    .unwrap();
    let mut space = MemorySpace::new(fx.registry.clone());
    let outcome = load(&mut space, &doc);

    assert!(outcome.succeeded(), "{}", outcome.message());
    assert_eq!(outcome.objects.len(), 2);
    let w1 = space.find_object("w1").unwrap();
    let w2 = space.find_object("w2").unwrap();
    assert_eq!(outcome.root, Some(w1));
    assert_eq!(space.view(w1).unwrap().reference("target"), Some(w2));
    assert_eq!(space.view(w2).unwrap().reference("target"), None);
}

#[test]
fn ring_of_references_resolves_in_both_directions() {
    let fx = scene_types();
    let mut space = MemorySpace::new(fx.registry.clone());
    let outcome = load(&mut space, &widget_ring_scene(4));
    assert!(outcome.succeeded());
    for i in 0..4 {
        let this = space.find_object(&format!("w{i}")).unwrap();
        let next = space.find_object(&format!("w{}", (i + 1) % 4)).unwrap();
        let view = space.view(this).unwrap();
        assert_eq!(view.reference("target"), Some(next));
        assert_eq!(view.integer("count"), Some(i as i64));
    }
}

#[test]
fn unknown_and_abstract_classes_are_skipped() {
    let fx = scene_types();
    let doc = scene_document(1, |objects| {
        push_object(objects, "Gizmo", "g1");
        push_object(objects, "Widget", "w1");
        push_object(objects, "Shape", "s1");
        objects.reborrow().push().key("id").set("anonymous");
    });
    let mut space = MemorySpace::new(fx.registry.clone());
    let outcome = load(&mut space, &doc);

    assert!(!outcome.succeeded());
    assert_eq!(outcome.objects.len(), 1);
    assert!(space.find_object("w1").is_some());
    assert!(space.find_object("g1").is_none());
    assert_eq!(outcome.issues[0], LoadIssue::UnknownType { class: "Gizmo".into() });
    assert!(matches!(
        &outcome.issues[1],
        LoadIssue::CreateFailed {
            reason: ObjectError::AbstractType { .. },
            ..
        }
    ));
    assert_eq!(outcome.issues[2], LoadIssue::UnknownType { class: String::new() });
    assert_eq!(outcome.message().lines().count(), 3);
}

#[test]
fn unresolved_reference_leaves_field_null() {
    let fx = scene_types();
    let doc = scene_document(1, |objects| {
        push_object(objects, "Widget", "w1").key("target").set("ghost");
    });
    let mut space = MemorySpace::new(fx.registry.clone());
    let outcome = load(&mut space, &doc);

    assert_eq!(outcome.issues, vec![LoadIssue::UnresolvedReference { id: "ghost".into() }]);
    let w1 = space.find_object("w1").unwrap();
    assert_eq!(space.view(w1).unwrap().reference("target"), None);
}

#[test]
fn reference_to_wrong_type_is_reported() {
    let fx = scene_types();
    let doc = scene_document(1, |objects| {
        push_object(objects, "Spawner", "sp").key("buddy").set("w1");
        push_object(objects, "Widget", "w1");
    });
    let mut space = MemorySpace::new(fx.registry.clone());
    let outcome = load(&mut space, &doc);

    assert_eq!(
        outcome.issues,
        vec![LoadIssue::ReferenceTypeMismatch {
            id: "w1".into(),
            expected: "Ticker".into(),
        }]
    );
    let sp = space.find_object("sp").unwrap();
    assert_eq!(space.view(sp).unwrap().reference("buddy"), None);
}

#[test]
fn references_sidecast_into_composite_aspects() {
    let fx = scene_types();
    let doc = scene_document(1, |objects| {
        let mut a1 = push_object(objects, "Actor", "a1");
        a1.reborrow().key("name").set("scout");
        a1.key("vitals").set("a2");
        push_object(objects, "Actor", "a2").key("hp").set(40);
    });
    let mut space = MemorySpace::new(fx.registry.clone());
    let outcome = load(&mut space, &doc);
    assert!(outcome.succeeded(), "{}", outcome.message());

    let a1 = space.find_object("a1").unwrap();
    let a2 = space.find_object("a2").unwrap();
    let vitals = space.view(a1).unwrap().reference("vitals").unwrap();
    assert_eq!(space.heap().type_of(vitals), Some(fx.health));
    assert_eq!(space.heap().topmost(vitals), a2);
    assert_eq!(space.view(a2).unwrap().integer("hp"), Some(40));
    assert_eq!(space.view(a1).unwrap().string("name"), Some("scout"));

    let mut saved = Document::new();
    serialize_scene(&space, space.objects().to_vec(), &mut saved, &ArchiveConfig::default()).unwrap();
    let first = saved.root().key("objects").at(0);
    assert_eq!(first.key("class").get::<String>().unwrap(), "Actor");
    assert_eq!(first.key("vitals").get::<String>().unwrap(), "a2");
}

#[test]
fn signal_bindings_connect_after_load() {
    let fx = scene_types();
    let doc = scene_document(1, |objects| {
        let mut w1 = push_object(objects, "Widget", "w1");
        bind_signal(&mut w1, "clicked", "w2", "poke");
        bind_signal(&mut w1, "clicked", "w2", "nope");
        bind_signal(&mut w1, "clicked", "a1", "heal");
        push_object(objects, "Widget", "w2");
        push_object(objects, "Actor", "a1");
    });
    let mut space = MemorySpace::new(fx.registry.clone());
    let outcome = load(&mut space, &doc);

    assert_eq!(
        outcome.issues,
        vec![LoadIssue::UnresolvedSlot {
            receiver: "w2".into(),
            slot: "nope".into(),
        }]
    );
    let w1 = space.find_object("w1").unwrap();
    let w2 = space.find_object("w2").unwrap();
    let a1 = space.find_object("a1").unwrap();
    assert_eq!(
        space.view(w1).unwrap().connections("clicked"),
        &[
            Connection {
                receiver: w2,
                slot: "poke".into(),
            },
            Connection {
                receiver: a1,
                slot: "heal".into(),
            },
        ]
    );
}

#[test]
fn initializers_run_after_flush() {
    let fx = scene_types();
    let doc = scene_document(1, |objects| {
        push_object(objects, "Beacon", "b1");
    });
    let mut space = MemorySpace::new(fx.registry.clone());
    load(&mut space, &doc);
    let b1 = space.find_object("b1").unwrap();
    assert_eq!(space.view(b1).unwrap().integer("armed"), Some(1));
}

#[test]
fn mistyped_fields_keep_defaults() {
    let fx = scene_types();
    let doc = scene_document(1, |objects| {
        let mut w = push_object(objects, "Widget", "w1");
        w.reborrow().key("count").set("many");
        w.key("label").reset(NodeKind::Array);
    });
    let mut space = MemorySpace::new(fx.registry.clone());
    let outcome = load(&mut space, &doc);
    assert!(outcome.succeeded());
    let view = space.view(space.find_object("w1").unwrap()).unwrap();
    assert_eq!(view.integer("count"), Some(0));
    assert_eq!(view.string("label"), Some(""));
}

#[test]
fn float_fields_accept_integer_nodes() {
    let fx = scene_types();
    let doc = scene_document(1, |objects| {
        push_object(objects, "Ticker", "t").key("elapsed").set(3);
    });
    let mut space = MemorySpace::new(fx.registry.clone());
    load(&mut space, &doc);
    let t = space.find_object("t").unwrap();
    assert_eq!(space.view(t).unwrap().float("elapsed"), Some(3.0));
}

#[test]
fn structural_errors_abort_before_creating_objects() {
    let fx = scene_types();
    let mut space = MemorySpace::new(fx.registry.clone());
    let config = ArchiveConfig::default();

    let not_a_map = MiniJson::parse("[1,2]").unwrap();
    let no_format = MiniJson::parse(r#"{"objects":[]}"#).unwrap();
    let no_objects = MiniJson::parse(r#"{"format":1,"objects":{}}"#).unwrap();
    let too_new = MiniJson::parse(r#"{"format":9,"objects":[{"class":"Widget"}]}"#).unwrap();

    for doc in [&not_a_map, &no_format, &no_objects, &too_new] {
        let err = instantiate(doc, &mut space, &config).unwrap_err();
        assert!(matches!(err, LoadError::Structural { .. }));
    }
    assert!(space.objects().is_empty());

    let lenient = ArchiveConfig {
        reject_newer_format: false,
        ..ArchiveConfig::default()
    };
    let outcome = instantiate(&too_new, &mut space, &lenient).unwrap();
    assert_eq!(outcome.format, 9);
    assert_eq!(outcome.objects.len(), 1);
}

#[test]
fn heap_exhaustion_is_a_recovered_issue() {
    let fx = scene_types();
    // Widget: header + 4 fields.
    let mut space = MemorySpace::with_capacity(fx.registry.clone(), 7);
    let outcome = load(&mut space, &widget_ring_scene(2));
    assert_eq!(outcome.objects.len(), 1);
    assert!(matches!(
        &outcome.issues[0],
        LoadIssue::CreateFailed {
            reason: ObjectError::CapacityExceeded { .. },
            ..
        }
    ));
    assert_eq!(outcome.issues[1], LoadIssue::UnresolvedReference { id: "w1".into() });
}

#[test]
fn save_load_save_is_stable() {
    let fx = scene_types();
    let source = scene_document(1, |objects| {
        let mut w1 = push_object(objects, "Widget", "w1");
        w1.reborrow().key("label").set("first");
        w1.reborrow().key("target").set("w2");
        bind_signal(&mut w1, "clicked", "w2", "poke");
        push_object(objects, "Widget", "w2").key("count").set(7);
        push_object(objects, "Actor", "a1").key("vitals").set("a1");
        push_object(objects, "Ticker", "t1").key("elapsed").set(0.25);
    });

    let mut first_space = MemorySpace::new(fx.registry.clone());
    assert!(load(&mut first_space, &source).succeeded());
    let mut first = Document::new();
    let written = serialize_scene(
        &first_space,
        first_space.objects().to_vec(),
        &mut first,
        &ArchiveConfig::default(),
    )
    .unwrap();
    assert_eq!(written, 4);

    let mut second_space = MemorySpace::new(fx.registry.clone());
    assert!(load(&mut second_space, &first).succeeded());
    let mut second = Document::new();
    serialize_scene(
        &second_space,
        second_space.objects().to_vec(),
        &mut second,
        &ArchiveConfig::default(),
    )
    .unwrap();

    assert_eq!(first, second);
    assert_eq!(MiniJson::render(&first).unwrap(), MiniJson::render(&second).unwrap());
}
