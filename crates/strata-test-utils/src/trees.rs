//! Scene document builders.

use strata_tree::{Document, NodeKind, NodeMut};

/// A scene document with format `format`; `fill` receives the objects array.
pub fn scene_document(format: i64, fill: impl FnOnce(&mut NodeMut<'_>)) -> Document {
    let mut doc = Document::new();
    let mut root = doc.root_mut();
    root.reborrow().key("format").set(format);
    let mut objects = root.key("objects");
    objects.reset(NodeKind::Array);
    fill(&mut objects);
    doc
}

/// Append an object map with `class` and `id` and return it for more keys.
pub fn push_object<'a>(objects: &'a mut NodeMut<'_>, class: &str, id: &str) -> NodeMut<'a> {
    let mut node = objects.reborrow().push();
    node.reborrow().key("class").set(class);
    if !id.is_empty() {
        node.reborrow().key("id").set(id);
    }
    node
}

/// Append a `{receiver, slot}` binding to signal `signal` of `object`.
pub fn bind_signal(object: &mut NodeMut<'_>, signal: &str, receiver: &str, slot: &str) {
    let mut entry = object.reborrow().key(signal).push();
    entry.reborrow().key("receiver").set(receiver);
    entry.key("slot").set(slot);
}

/// Two widgets where `w1.target` names `w2`.
pub fn widget_pair_scene() -> Document {
    scene_document(1, |objects| {
        push_object(objects, "Widget", "w1").key("target").set("w2");
        push_object(objects, "Widget", "w2");
    })
}

/// `n` widgets, each targeting the next, the last targeting the first.
pub fn widget_ring_scene(n: usize) -> Document {
    scene_document(1, |objects| {
        for i in 0..n {
            let mut node = push_object(objects, "Widget", &format!("w{i}"));
            node.reborrow().key("count").set(i as i64);
            node.key("target").set(format!("w{}", (i + 1) % n));
        }
    })
}
