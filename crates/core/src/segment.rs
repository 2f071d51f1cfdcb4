use serde::Serialize;

/// Level of a segment in the two-level hierarchy.
///
/// Parents provide expanded context at retrieval time; children are the unit
/// of embedding and indexing. There is no third level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SegmentKind {
    Parent,
    Child,
}

/// One bounded text segment, created fresh per chunking run and immutable
/// after construction.
///
/// `start`/`end` are character offsets describing the segment's pre-overlap
/// coverage span — into the normalized document for parents, into the owning
/// parent's content for children. `length` counts the characters of
/// `content`, which includes the applied overlap prefix.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Segment {
    /// `"{i}"` for parents, `"{i}_{j}"` for children.
    pub id: String,
    pub content: String,
    pub start: usize,
    pub end: usize,
    pub length: usize,
    #[serde(skip)]
    pub kind: SegmentKind,
    /// Ordered children, empty for `Child` segments.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Segment>,
}

/// Extract the owning parent's id from a child id (`"3_7"` → `"3"`).
pub fn parent_id_of(child_id: &str) -> Option<&str> {
    child_id.split_once('_').map(|(parent, _)| parent)
}
