//! A JSON syntax for tests, backed by `serde_json`.
//!
//! `true`/`false` read as 1/0 and `null` reads as Empty. Output is
//! compact with keys in document order.

use serde_json::{Map, Number, Value};
use strata_tree::{Document, NodeData, NodeKind, NodeMut, NodeRef, TreeError, TreeReader, TreeWriter};

#[derive(Clone, Copy, Debug, Default)]
pub struct MiniJson;

impl MiniJson {
    /// Parse `text` into a fresh document.
    pub fn parse(text: &str) -> Result<Document, TreeError> {
        let mut doc = Document::new();
        doc.load_with(&mut MiniJson, text.as_bytes())?;
        Ok(doc)
    }

    /// Render `doc` to a string.
    pub fn render(doc: &Document) -> Result<String, TreeError> {
        let mut out = Vec::new();
        doc.save_with(&mut MiniJson, &mut out)?;
        String::from_utf8(out).map_err(|e| syntax(e.to_string()))
    }
}

fn syntax(reason: impl Into<String>) -> TreeError {
    TreeError::Syntax {
        reason: reason.into(),
    }
}

fn fill(mut node: NodeMut<'_>, value: &Value) {
    match value {
        Value::Null => node.clear(),
        Value::Bool(b) => node.set(i64::from(*b)),
        Value::Number(n) => match n.as_i64() {
            Some(v) => node.set(v),
            None => node.set(n.as_f64().unwrap_or_default()),
        },
        Value::String(s) => node.set(s.as_str()),
        Value::Array(items) => {
            node.reset(NodeKind::Array);
            for item in items {
                fill(node.reborrow().push(), item);
            }
        }
        Value::Object(entries) => {
            node.reset(NodeKind::Map);
            for (key, item) in entries {
                fill(node.reborrow().key(key), item);
            }
        }
    }
}

fn to_value(node: NodeRef<'_>) -> Result<Value, TreeError> {
    Ok(match node.data() {
        NodeData::Empty => Value::Null,
        NodeData::Integer(v) => Value::from(*v),
        NodeData::Float(v) => Number::from_f64(*v)
            .map(Value::Number)
            .ok_or_else(|| syntax(format!("float {v} has no JSON form")))?,
        NodeData::String(s) => Value::String(s.clone()),
        NodeData::Array(_) => Value::Array(node.elements().map(to_value).collect::<Result<_, _>>()?),
        NodeData::Map(_) => {
            let mut map = Map::new();
            for (key, child) in node.entries() {
                map.insert(key.to_owned(), to_value(child)?);
            }
            Value::Object(map)
        }
    })
}

impl TreeReader for MiniJson {
    fn read(&mut self, input: &[u8], doc: &mut Document) -> Result<(), TreeError> {
        let value: Value = serde_json::from_slice(input).map_err(|e| syntax(e.to_string()))?;
        fill(doc.root_mut(), &value);
        Ok(())
    }
}

impl TreeWriter for MiniJson {
    fn write(&mut self, doc: &Document, out: &mut Vec<u8>) -> Result<(), TreeError> {
        let value = to_value(doc.root())?;
        serde_json::to_writer(out, &value).map_err(|e| syntax(e.to_string()))
    }
}
