//! Hierarchical parent/child chunking engine.
//!
//! Converts raw extracted document text into a two-level tree of ordered,
//! bounded segments: coarse parents for context expansion at retrieval time,
//! fine children as the unit of embedding and indexing.
//!
//! The pipeline is `normalize` → parent split → per-parent child split, all
//! behind the single [`HierarchicalChunker::chunk`] entry point. Every caller
//! (preview, ingestion) routes through it, which is what makes the output
//! byte-identical across call paths. The optional [`ChunkCache`] memoizes
//! completed trees by content+rule hash with single-flight semantics.

pub mod cache;
pub mod hierarchy;
pub mod normalize;
pub mod preview;
pub mod splitter;

pub use cache::ChunkCache;
pub use hierarchy::{ChunkOutput, HierarchicalChunker};
pub use normalize::{normalize, Normalized};
pub use preview::PreviewResponse;
pub use splitter::{split, Span};
