//! Vector index abstraction for Sworn Chat.
//!
//! The knowledge base lives in a hosted nearest-neighbour index. Records are
//! partitioned into namespaces and carry free-form metadata; this crate reads
//! the `text-source` and `content` fields.

mod memory;
mod pinecone;

pub use memory::MemoryVectorIndex;
pub use pinecone::PineconeIndex;

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Metadata field naming the source document or video.
pub const SOURCE_FIELD: &str = "text-source";
/// Metadata field holding the record's text.
pub const CONTENT_FIELD: &str = "content";
/// Source name used when a record has none.
pub const UNKNOWN_SOURCE: &str = "Unknown source";
/// Content used when a record has none.
pub const NO_CONTENT: &str = "No content available";

/// A ranked match returned by the index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievedRecord {
    /// Record identifier.
    pub id: String,
    /// Similarity score (higher is better).
    #[serde(default)]
    pub score: f32,
    /// Attached metadata, if the index returned any.
    #[serde(default)]
    pub metadata: Option<Map<String, Value>>,
}

impl RetrievedRecord {
    /// Source name, or [`UNKNOWN_SOURCE`] when absent or not a string.
    pub fn source_name(&self) -> &str {
        self.metadata_str(SOURCE_FIELD).unwrap_or(UNKNOWN_SOURCE)
    }

    /// Content text, or [`NO_CONTENT`] when absent or not a string.
    pub fn content_text(&self) -> &str {
        self.metadata_str(CONTENT_FIELD).unwrap_or(NO_CONTENT)
    }

    fn metadata_str(&self, field: &str) -> Option<&str> {
        self.metadata.as_ref()?.get(field)?.as_str()
    }
}

/// Trait for vector index implementations.
#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Return up to `top_k` records of `namespace` nearest to `vector`, best first.
    async fn query(
        &self,
        namespace: &str,
        vector: &[f32],
        top_k: usize,
        include_metadata: bool,
    ) -> Result<Vec<RetrievedRecord>>;
}

/// Compute cosine similarity between two vectors.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot_product / (norm_a * norm_b)
}
