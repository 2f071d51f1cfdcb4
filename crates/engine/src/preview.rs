//! Read-only response shaping for the preview path.
//!
//! The preview is deliberately a thin projection of [`ChunkOutput`] — it
//! reshapes a completed tree into the wire contract and nothing more. It must
//! never re-split, re-clean, or otherwise touch the text, so that a preview
//! request and a full ingestion request can never drift apart.

use serde::Serialize;

use ragsplit_core::Segment;

use crate::hierarchy::ChunkOutput;

/// JSON contract of the split preview, matching the upload/preview endpoints.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PreviewResponse {
    /// Parent segments, each carrying its ordered children.
    pub segments: Vec<Segment>,
    /// Parent count.
    pub total_segments: usize,
    /// The full normalized document text.
    #[serde(rename = "parentContent")]
    pub parent_content: String,
    /// Flat, ordered list of every child's text.
    #[serde(rename = "childrenContent")]
    pub children_content: Vec<String>,
}

impl PreviewResponse {
    pub fn from_output(output: &ChunkOutput) -> Self {
        let children_content = output
            .segments
            .iter()
            .flat_map(|parent| parent.children.iter().map(|child| child.content.clone()))
            .collect();
        Self {
            segments: output.segments.clone(),
            total_segments: output.segments.len(),
            parent_content: output.content.clone(),
            children_content,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::ChunkCache;
    use crate::hierarchy::HierarchicalChunker;
    use ragsplit_core::{ChunkRule, Document, LimitsConfig};

    fn chunker() -> HierarchicalChunker {
        HierarchicalChunker::new(LimitsConfig::default())
    }

    fn doc() -> Document {
        Document::new("Alpha beta.\n\nGamma delta epsilon.\n\nZeta.")
    }

    fn rule() -> ChunkRule {
        ChunkRule {
            parent_max_size: 20,
            parent_overlap: 0,
            parent_separator: "\n\n".to_string(),
            child_max_size: 8,
            child_overlap: 2,
            child_separator: " ".to_string(),
            keep_separator: false,
        }
    }

    #[test]
    fn response_matches_the_wire_contract() {
        let output = chunker().chunk(&doc(), &rule()).unwrap();
        let response = PreviewResponse::from_output(&output);
        let value = serde_json::to_value(&response).unwrap();

        assert_eq!(value["total_segments"], 3);
        assert_eq!(
            value["parentContent"],
            "Alpha beta.\n\nGamma delta epsilon.\n\nZeta."
        );

        let segments = value["segments"].as_array().unwrap();
        assert_eq!(segments[0]["id"], "0");
        assert_eq!(segments[1]["content"], "Gamma delta epsilon.");
        assert_eq!(segments[1]["length"], 20);

        let children = segments[1]["children"].as_array().unwrap();
        assert_eq!(children[0]["id"], "1_0");
        // Child objects carry no children array and no kind marker.
        assert!(children[0].get("children").is_none());
        assert!(children[0].get("kind").is_none());

        let children_content = value["childrenContent"].as_array().unwrap();
        let total_children: usize = response.segments.iter().map(|p| p.children.len()).sum();
        assert_eq!(children_content.len(), total_children);
    }

    #[test]
    fn children_content_is_in_tree_order() {
        let output = chunker().chunk(&doc(), &rule()).unwrap();
        let response = PreviewResponse::from_output(&output);
        let from_tree: Vec<String> = output
            .segments
            .iter()
            .flat_map(|p| p.children.iter().map(|c| c.content.clone()))
            .collect();
        assert_eq!(response.children_content, from_tree);
    }

    #[test]
    fn preview_and_ingest_paths_agree() {
        // The regression that motivated the single-entry-point design: a
        // cached preview call and a direct ingestion call over the same
        // content and rule must see the exact same segments.
        let chunker = chunker();
        let cache = ChunkCache::new(8);

        // Preview path: through the cache, reshaped for the wire.
        let preview_output = cache.get_or_compute(&chunker, &doc(), &rule()).unwrap();
        let preview = PreviewResponse::from_output(&preview_output);

        // Ingest path: direct chunk, children handed to the indexer.
        let ingest_output = chunker.chunk(&doc(), &rule()).unwrap();
        let indexed: Vec<&str> = ingest_output
            .child_segments()
            .iter()
            .map(|c| c.content.as_str())
            .collect();

        assert_eq!(preview.segments, ingest_output.segments);
        assert_eq!(preview.parent_content, ingest_output.content);
        assert_eq!(
            preview
                .children_content
                .iter()
                .map(String::as_str)
                .collect::<Vec<_>>(),
            indexed
        );
    }
}
