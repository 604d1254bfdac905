//! Knowledge retrieval from the vector index.

use crate::embedding::Embedder;
use crate::error::Result;
use crate::vector_index::{RetrievedRecord, VectorIndex};
use std::sync::Arc;
use tracing::{debug, instrument, warn};

/// Default number of nearest records fetched per query.
pub const DEFAULT_TOP_K: usize = 3;

/// Outcome of a knowledge base search.
#[derive(Debug, Clone, PartialEq)]
pub enum Retrieval {
    /// The index answered; the list may be empty.
    Matches(Vec<RetrievedRecord>),
    /// The index query failed. Treated exactly like "no matches".
    Unavailable(String),
}

impl Retrieval {
    /// Ranked records, or `None` when the index was unavailable.
    pub fn records(&self) -> Option<&[RetrievedRecord]> {
        match self {
            Retrieval::Matches(records) => Some(records),
            Retrieval::Unavailable(_) => None,
        }
    }

    /// Distinct source names in first-seen ranking order.
    pub fn sources(&self) -> Vec<String> {
        self.records().map(collect_sources).unwrap_or_default()
    }
}

/// Distinct source names of `records`, in the order they first appear.
pub fn collect_sources(records: &[RetrievedRecord]) -> Vec<String> {
    let mut sources: Vec<String> = Vec::new();
    for record in records {
        let source = record.source_name();
        if !sources.iter().any(|s| s == source) {
            sources.push(source.to_string());
        }
    }
    sources
}

/// Embeds queries and fetches their nearest records from one namespace.
pub struct KnowledgeRetriever {
    embedder: Arc<dyn Embedder>,
    index: Arc<dyn VectorIndex>,
    namespace: String,
    top_k: usize,
}

impl KnowledgeRetriever {
    /// Create a new retriever over `namespace`.
    pub fn new(embedder: Arc<dyn Embedder>, index: Arc<dyn VectorIndex>, namespace: &str) -> Self {
        Self {
            embedder,
            index,
            namespace: namespace.to_string(),
            top_k: DEFAULT_TOP_K,
        }
    }

    /// Set the number of records fetched per query.
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    /// Search the knowledge base.
    ///
    /// Embedding failures are returned as errors. Index failures are logged
    /// and reported as [`Retrieval::Unavailable`].
    #[instrument(skip(self, query), fields(namespace = %self.namespace, top_k = self.top_k))]
    pub async fn search(&self, query: &str) -> Result<Retrieval> {
        let query_embedding = self.embedder.embed(query).await?;

        match self
            .index
            .query(&self.namespace, &query_embedding, self.top_k, true)
            .await
        {
            Ok(records) => {
                debug!("Retrieved {} records", records.len());
                Ok(Retrieval::Matches(records))
            }
            Err(e) => {
                warn!("Error searching content: {}", e);
                Ok(Retrieval::Unavailable(e.to_string()))
            }
        }
    }
}
