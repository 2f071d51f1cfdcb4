use serde::{Deserialize, Serialize};

use crate::error::ChunkError;

/// Configuration for one chunking run.
///
/// Deserializes from the request-parameter names used by the preview and
/// upload paths (`parent_chunk_size`, `child_chunk_overlap`, ...). All sizes
/// and overlaps are measured in characters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkRule {
    /// Maximum characters per parent segment.
    #[serde(rename = "parent_chunk_size")]
    pub parent_max_size: usize,
    /// Characters of context duplicated between adjacent parent segments.
    #[serde(rename = "parent_chunk_overlap")]
    pub parent_overlap: usize,
    /// Preferred parent split boundary; empty means fixed-width slicing.
    pub parent_separator: String,
    /// Maximum characters per child segment.
    #[serde(rename = "child_chunk_size")]
    pub child_max_size: usize,
    /// Characters of context duplicated between adjacent child segments.
    #[serde(rename = "child_chunk_overlap")]
    pub child_overlap: usize,
    /// Preferred child split boundary; empty means fixed-width slicing.
    pub child_separator: String,
    /// Whether the separator is retained as a suffix of the piece before it.
    pub keep_separator: bool,
}

impl Default for ChunkRule {
    fn default() -> Self {
        Self {
            parent_max_size: 1024,
            parent_overlap: 200,
            parent_separator: "\n\n".to_string(),
            child_max_size: 512,
            child_overlap: 50,
            child_separator: "\n".to_string(),
            keep_separator: true,
        }
    }
}

impl ChunkRule {
    /// Bounds-check the rule. Called once, before any splitting occurs.
    pub fn validate(&self) -> Result<(), ChunkError> {
        if self.parent_max_size == 0 {
            return Err(ChunkError::InvalidRule(
                "parent_chunk_size must be greater than 0".to_string(),
            ));
        }
        if self.child_max_size == 0 {
            return Err(ChunkError::InvalidRule(
                "child_chunk_size must be greater than 0".to_string(),
            ));
        }
        if self.parent_overlap >= self.parent_max_size {
            return Err(ChunkError::InvalidRule(format!(
                "parent_chunk_overlap ({}) must be smaller than parent_chunk_size ({})",
                self.parent_overlap, self.parent_max_size
            )));
        }
        if self.child_overlap >= self.child_max_size {
            return Err(ChunkError::InvalidRule(format!(
                "child_chunk_overlap ({}) must be smaller than child_chunk_size ({})",
                self.child_overlap, self.child_max_size
            )));
        }
        Ok(())
    }
}
