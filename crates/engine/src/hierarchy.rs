//! Two-level chunking orchestration.
//!
//! [`HierarchicalChunker::chunk`] is the single entry point for every caller.
//! Normalization happens exactly once, inside this function; no caller may
//! pre-clean text on its own, which is what guarantees that a preview request
//! and a full ingestion request over the same content produce identical
//! segment trees.

use std::time::Instant;

use ragsplit_core::{
    parent_id_of, ChunkError, ChunkRule, Document, LimitsConfig, Segment, SegmentKind,
};

use crate::normalize::{normalize, Normalized};
use crate::splitter::split;

/// The complete, immutable result of one chunking run.
#[derive(Debug, Clone, PartialEq)]
pub struct ChunkOutput {
    /// Ordered parent segments, each owning its ordered children.
    pub segments: Vec<Segment>,
    /// The normalized document text all offsets refer to.
    pub content: String,
    /// Whether the content was cut at the configured length cap.
    pub truncated: bool,
}

impl ChunkOutput {
    /// Look up a parent segment by id (`"0"`, `"1"`, ...).
    pub fn parent(&self, id: &str) -> Option<&Segment> {
        self.segments.iter().find(|s| s.id == id)
    }

    /// Expand-to-parent lookup: resolve a child id (`"{i}_{j}"`) to the
    /// owning parent, for context retrieval after a child matched a query.
    pub fn parent_of_child(&self, child_id: &str) -> Option<&Segment> {
        let parent = self.parent(parent_id_of(child_id)?)?;
        parent
            .children
            .iter()
            .any(|c| c.id == child_id)
            .then_some(parent)
    }

    /// Flat, ordered view of all children — the units handed to the
    /// embedding and indexing consumers.
    pub fn child_segments(&self) -> Vec<&Segment> {
        self.segments
            .iter()
            .flat_map(|p| p.children.iter())
            .collect()
    }
}

/// Orchestrates the parent pass and the per-parent child passes.
pub struct HierarchicalChunker {
    limits: LimitsConfig,
}

impl HierarchicalChunker {
    pub fn new(limits: LimitsConfig) -> Self {
        Self { limits }
    }

    pub fn limits(&self) -> &LimitsConfig {
        &self.limits
    }

    /// Chunk a document under the given rule. Returns the full tree or fails
    /// entirely; partial results are never produced.
    pub fn chunk(&self, doc: &Document, rule: &ChunkRule) -> Result<ChunkOutput, ChunkError> {
        self.chunk_with_deadline(doc, rule, None)
    }

    /// Like [`chunk`](Self::chunk), but checks the deadline between parent
    /// iterations so a caller-imposed timeout can abort long documents early.
    pub fn chunk_with_deadline(
        &self,
        doc: &Document,
        rule: &ChunkRule,
        deadline: Option<Instant>,
    ) -> Result<ChunkOutput, ChunkError> {
        rule.validate()?;
        let Normalized { content, truncated } = normalize(&doc.content, &self.limits)?;

        let parents = split(
            &content,
            rule.parent_max_size,
            rule.parent_overlap,
            &rule.parent_separator,
            rule.keep_separator,
        );

        let mut segments = Vec::with_capacity(parents.len());
        for (i, parent) in parents.into_iter().enumerate() {
            if let Some(deadline) = deadline {
                if Instant::now() >= deadline {
                    tracing::warn!(doc_id = %doc.id, parents_done = i, "chunking aborted at deadline");
                    return Err(ChunkError::DeadlineExceeded);
                }
            }

            let children: Vec<Segment> = split(
                &parent.content,
                rule.child_max_size,
                rule.child_overlap,
                &rule.child_separator,
                rule.keep_separator,
            )
            .into_iter()
            .enumerate()
            .map(|(j, child)| Segment {
                id: format!("{i}_{j}"),
                length: char_len(&child.content),
                content: child.content,
                start: child.start,
                end: child.end,
                kind: SegmentKind::Child,
                children: Vec::new(),
            })
            .collect();

            segments.push(Segment {
                id: i.to_string(),
                length: char_len(&parent.content),
                content: parent.content,
                start: parent.start,
                end: parent.end,
                kind: SegmentKind::Parent,
                children,
            });
        }

        log_split_statistics(doc, &segments);
        Ok(ChunkOutput {
            segments,
            content,
            truncated,
        })
    }
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

fn log_split_statistics(doc: &Document, segments: &[Segment]) {
    let child_count: usize = segments.iter().map(|p| p.children.len()).sum();
    let lengths: Vec<usize> = segments.iter().map(|p| p.length).collect();
    let min = lengths.iter().min().copied().unwrap_or(0);
    let max = lengths.iter().max().copied().unwrap_or(0);
    let avg = if lengths.is_empty() {
        0
    } else {
        lengths.iter().sum::<usize>() / lengths.len()
    };
    tracing::debug!(
        doc_id = %doc.id,
        parents = segments.len(),
        children = child_count,
        min_parent_len = min,
        max_parent_len = max,
        avg_parent_len = avg,
        "document chunked"
    );
}
