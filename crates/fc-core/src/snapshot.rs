//! Binary document snapshots (MessagePack).
//!
//! Compact form handed to the host renderer or persistence layer. Structs are
//! written as maps so the flat, tagged node layout survives the round trip.

use crate::document::Document;
use crate::error::{DocumentError, Result};

/// # Errors
/// [`DocumentError::Snapshot`] if a node cannot be encoded.
pub fn encode(document: &Document) -> Result<Vec<u8>> {
    rmp_serde::to_vec_named(document).map_err(|e| DocumentError::Snapshot(e.to_string()))
}

/// # Errors
/// [`DocumentError::Snapshot`] on malformed bytes, [`DocumentError::NodeNotFound`]
/// if the decoded root is missing.
pub fn decode(bytes: &[u8]) -> Result<Document> {
    let document: Document =
        rmp_serde::from_slice(bytes).map_err(|e| DocumentError::Snapshot(e.to_string()))?;
    if !document.contains(document.root_id) {
        return Err(DocumentError::NodeNotFound(document.root_id));
    }
    Ok(document)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn snapshot_preserves_document() {
        let doc = Document::from_json(
            r##"{
            "root_id": "sn_root",
            "nodes": {
                "sn_root": {
                    "id": "sn_root", "type": "container", "width": "100%", "height": 600,
                    "padding": "8 16", "children": ["sn_title", "sn_card"]
                },
                "sn_title": {
                    "id": "sn_title", "type": "text", "text": { "expression": "props.title" },
                    "left": 4, "top": 8, "font_weight": 700
                },
                "sn_card": {
                    "id": "sn_card", "type": "template_instance", "template_id": "tpl-card",
                    "overrides": { "card_title": { "name": "Heading" } }
                }
            }
        }"##,
        )
        .unwrap();
        let bytes = encode(&doc).unwrap();
        assert_eq!(decode(&bytes).unwrap(), doc);
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(matches!(
            decode(&[0xc1, 0x00]),
            Err(DocumentError::Snapshot(_))
        ));
    }
}
