//! In-memory vector index implementation.
//!
//! Useful for testing and small offline knowledge bases.

use super::{cosine_similarity, RetrievedRecord, VectorIndex};
use crate::error::{Result, SwornError};
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::RwLock;

struct StoredRecord {
    id: String,
    values: Vec<f32>,
    metadata: Map<String, Value>,
}

/// In-memory vector index, partitioned by namespace.
pub struct MemoryVectorIndex {
    namespaces: RwLock<HashMap<String, Vec<StoredRecord>>>,
}

impl MemoryVectorIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self {
            namespaces: RwLock::new(HashMap::new()),
        }
    }

    /// Insert or replace a record in `namespace`.
    pub fn upsert(
        &self,
        namespace: &str,
        id: &str,
        values: Vec<f32>,
        metadata: Map<String, Value>,
    ) -> Result<()> {
        let mut namespaces = self
            .namespaces
            .write()
            .map_err(|_| SwornError::VectorIndex("Index lock poisoned".to_string()))?;
        let records = namespaces.entry(namespace.to_string()).or_default();
        records.retain(|r| r.id != id);
        records.push(StoredRecord {
            id: id.to_string(),
            values,
            metadata,
        });
        Ok(())
    }

    /// Number of records in `namespace`.
    pub fn len(&self, namespace: &str) -> usize {
        self.namespaces
            .read()
            .map(|n| n.get(namespace).map_or(0, Vec::len))
            .unwrap_or(0)
    }
}

impl Default for MemoryVectorIndex {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VectorIndex for MemoryVectorIndex {
    async fn query(
        &self,
        namespace: &str,
        vector: &[f32],
        top_k: usize,
        include_metadata: bool,
    ) -> Result<Vec<RetrievedRecord>> {
        let namespaces = self
            .namespaces
            .read()
            .map_err(|_| SwornError::VectorIndex("Index lock poisoned".to_string()))?;

        let Some(records) = namespaces.get(namespace) else {
            return Ok(Vec::new());
        };

        let mut results: Vec<RetrievedRecord> = records
            .iter()
            .map(|r| RetrievedRecord {
                id: r.id.clone(),
                score: cosine_similarity(vector, &r.values),
                metadata: include_metadata.then(|| r.metadata.clone()),
            })
            .collect();

        results.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        results.truncate(top_k);

        Ok(results)
    }
}
