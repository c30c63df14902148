//! Integration tests for building and reading scene-shaped trees.

use strata_tree::{Document, NodeKind, Scalar, TreeError};

fn scene(doc: &mut Document) {
    let mut root = doc.root_mut();
    root.reborrow().key("format").set(1);
    let mut objects = root.key("objects");
    let mut first = objects.reborrow().push();
    first.reborrow().key("class").set("Widget");
    first.reborrow().key("id").set("w1");
    first.key("target").set("w2");
    let mut second = objects.push();
    second.reborrow().key("class").set("Widget");
    second.key("id").set("w2");
}

#[test]
fn scene_layout_reads_back() {
    let mut doc = Document::new();
    scene(&mut doc);

    let root = doc.root();
    assert!(root.is_map());
    assert_eq!(root.key("format").get::<i64>(), Ok(1));
    let objects = root.key("objects");
    assert_eq!(objects.kind(), NodeKind::Array);
    assert_eq!(objects.len(), 2);

    let ids: Vec<String> = objects
        .elements()
        .map(|o| o.key("id").get::<String>().unwrap())
        .collect();
    assert_eq!(ids, vec!["w1", "w2"]);
    assert_eq!(objects.at(0).key("target").get::<String>().as_deref(), Ok("w2"));
    assert!(objects.at(1).key("target").is_empty());
}

#[test]
fn cloned_document_is_structurally_equal() {
    let mut doc = Document::new();
    scene(&mut doc);
    let copy = doc.clone();
    assert_eq!(doc, copy);
}

#[test]
fn reading_a_missing_path_never_allocates() {
    let mut doc = Document::new();
    scene(&mut doc);
    let before = doc.node_count();
    assert!(doc.root().key("nope").key("deeper").at(3).is_empty());
    assert_eq!(doc.node_count(), before);
}

#[test]
fn scalar_getters_report_shape() {
    let mut doc = Document::new();
    scene(&mut doc);
    let err = doc.root().key("objects").get::<Scalar>().unwrap_err();
    assert_eq!(
        err,
        TreeError::TagMismatch {
            expected: "scalar",
            found: NodeKind::Array,
        }
    );
}

#[test]
fn map_children_survive_in_insertion_order() {
    let mut doc = Document::new();
    scene(&mut doc);
    let keys: Vec<&str> = doc.root().key("objects").at(0).keys().collect();
    assert_eq!(keys, vec!["class", "id", "target"]);
}
