//! Seam to concrete on-disk syntaxes.
//!
//! A reader populates a [`Document`] from bytes; a writer renders one
//! back. The core treats both purely as "load tree" and "save tree" and
//! never looks at the bytes itself.

use crate::document::Document;
use crate::error::TreeError;

/// Populates a document from a byte stream.
///
/// Implementations report malformed input as [`TreeError::Syntax`].
/// The target document has already been cleared when `read` is called
/// through [`Document::load_with`].
pub trait TreeReader {
    /// Parse `input` into `doc`, starting at its root.
    fn read(&mut self, input: &[u8], doc: &mut Document) -> Result<(), TreeError>;
}

/// Renders a document to a byte stream.
pub trait TreeWriter {
    /// Append the rendering of `doc` to `out`.
    fn write(&mut self, doc: &Document, out: &mut Vec<u8>) -> Result<(), TreeError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::NodeKind;

    /// Reads a single decimal integer into the root.
    struct DecimalReader;

    impl TreeReader for DecimalReader {
        fn read(&mut self, input: &[u8], doc: &mut Document) -> Result<(), TreeError> {
            let text = std::str::from_utf8(input).map_err(|e| TreeError::Syntax {
                reason: e.to_string(),
            })?;
            let value: i64 = text.trim().parse().map_err(|_| TreeError::Syntax {
                reason: format!("not an integer: {text:?}"),
            })?;
            doc.root_mut().set(value);
            Ok(())
        }
    }

    struct DecimalWriter;

    impl TreeWriter for DecimalWriter {
        fn write(&mut self, doc: &Document, out: &mut Vec<u8>) -> Result<(), TreeError> {
            let value: i64 = doc.root().get()?;
            out.extend_from_slice(value.to_string().as_bytes());
            Ok(())
        }
    }

    #[test]
    fn load_clears_previous_contents() {
        let mut doc = Document::new();
        doc.root_mut().key("stale").set(1);
        doc.load_with(&mut DecimalReader, b" 12 ").unwrap();
        assert_eq!(doc.root().kind(), NodeKind::Integer);
        assert_eq!(doc.node_count(), 1);
    }

    #[test]
    fn save_renders_through_writer() {
        let mut doc = Document::new();
        doc.root_mut().set(-4);
        let mut out = Vec::new();
        doc.save_with(&mut DecimalWriter, &mut out).unwrap();
        assert_eq!(out, b"-4");
    }

    #[test]
    fn reader_errors_propagate() {
        let mut doc = Document::new();
        let err = doc.load_with(&mut DecimalReader, b"nope").unwrap_err();
        assert!(matches!(err, TreeError::Syntax { .. }));
    }

    #[test]
    fn writer_surfaces_tag_mismatch() {
        let mut doc = Document::new();
        doc.root_mut().set("x");
        let err = doc.save_with(&mut DecimalWriter, &mut Vec::new()).unwrap_err();
        assert!(matches!(err, TreeError::TagMismatch { .. }));
    }
}
