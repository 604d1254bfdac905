//! Mock providers shared by unit tests.

use crate::completion::{ChatModel, CompletionRequest};
use crate::embedding::Embedder;
use crate::error::{Result, SwornError};
use crate::vector_index::{MemoryVectorIndex, RetrievedRecord, VectorIndex};
use async_trait::async_trait;
use serde_json::{json, Map, Value};
use std::sync::Mutex;

pub const NAMESPACE: &str = "sworn-text-content";

/// Returns the same vector for every text.
pub struct StaticEmbedder(pub Vec<f32>);

#[async_trait]
impl Embedder for StaticEmbedder {
    async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
        Ok(self.0.clone())
    }

    fn dimensions(&self) -> usize {
        self.0.len()
    }
}

/// Fails every call the way a provider outage would.
pub struct FailingEmbedder;

#[async_trait]
impl Embedder for FailingEmbedder {
    async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
        Err(SwornError::Embedding("connection reset by peer".to_string()))
    }

    fn dimensions(&self) -> usize {
        3
    }
}

/// An index whose queries always fail.
pub struct FailingIndex;

#[async_trait]
impl VectorIndex for FailingIndex {
    async fn query(&self, _: &str, _: &[f32], _: usize, _: bool) -> Result<Vec<RetrievedRecord>> {
        Err(SwornError::VectorIndex("Query failed (503 Service Unavailable): overloaded".to_string()))
    }
}

/// Chat model that records every request and answers from a script.
pub struct ScriptedChatModel {
    reply: Option<String>,
    pub requests: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedChatModel {
    pub fn replying(reply: &str) -> Self {
        Self {
            reply: Some(reply.to_string()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            reply: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn last_request(&self) -> Option<CompletionRequest> {
        self.requests.lock().unwrap().last().cloned()
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl ChatModel for ScriptedChatModel {
    async fn complete(&self, request: &CompletionRequest) -> Result<String> {
        self.requests.lock().unwrap().push(request.clone());
        match &self.reply {
            Some(reply) => Ok(reply.clone()),
            None => Err(SwornError::OpenAI("Failed to generate response: 500 upstream".to_string())),
        }
    }
}

pub fn metadata(source: &str, content: &str) -> Map<String, Value> {
    json!({ "text-source": source, "content": content })
        .as_object()
        .cloned()
        .unwrap()
}

pub fn record(id: &str, score: f32, source: Option<&str>, content: Option<&str>) -> RetrievedRecord {
    let mut meta = Map::new();
    if let Some(source) = source {
        meta.insert("text-source".to_string(), Value::String(source.to_string()));
    }
    if let Some(content) = content {
        meta.insert("content".to_string(), Value::String(content.to_string()));
    }
    RetrievedRecord {
        id: id.to_string(),
        score,
        metadata: Some(meta),
    }
}

/// Four records; queried with `[1, 0, 0]` they rank sleep-1, sleep-2, stress, nutrition.
pub fn knowledge_base() -> MemoryVectorIndex {
    let index = MemoryVectorIndex::new();
    index
        .upsert(NAMESPACE, "sleep-1", vec![1.0, 0.0, 0.0], metadata("Shift Work Sleep", "Anchor sleep to a fixed window."))
        .unwrap();
    index
        .upsert(NAMESPACE, "sleep-2", vec![0.9, 0.1, 0.0], metadata("Shift Work Sleep", "Darken the room fully."))
        .unwrap();
    index
        .upsert(NAMESPACE, "stress", vec![0.6, 0.6, 0.0], metadata("Tactical Breathing", "Inhale four, hold four."))
        .unwrap();
    index
        .upsert(NAMESPACE, "nutrition", vec![0.0, 0.0, 1.0], metadata("Eating on Patrol", "Pack protein snacks."))
        .unwrap();
    index
}
