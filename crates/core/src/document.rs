use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Unique document identifier.
pub type DocId = Uuid;

/// Raw extracted text plus caller-supplied metadata.
///
/// Produced upstream by the extraction service; this subsystem never parses
/// file formats and treats the content as an immutable input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub id: DocId,
    pub created_at: DateTime<Utc>,
    /// Raw extracted text (pre-normalization).
    pub content: String,
    /// Arbitrary metadata carried through from the producer (filename, source, ...).
    pub metadata: HashMap<String, serde_json::Value>,
}

impl Document {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            content: content.into(),
            metadata: HashMap::new(),
        }
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }
}
