//! Conversation sessions.
//!
//! A [`ConversationSession`] drives one turn end to end: retrieve, assemble
//! context, generate, then record the exchange in its bounded history. The
//! [`SessionStore`] hands each caller its own session.

mod history;
mod store;

pub use history::{ConversationHistory, DEFAULT_MAX_HISTORY};
pub use store::{SessionStore, DEFAULT_MAX_SESSIONS, DEFAULT_SESSION_ID};

use crate::rag::{format_context, AnswerGenerator, Generation, KnowledgeRetriever, Retrieval};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Reply to one chat message, as sent to callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatResult {
    /// Text shown to the user.
    pub response: String,
    /// Distinct source names of the retrieved records, first-seen order.
    pub sources: Vec<String>,
}

/// How a turn was resolved.
#[derive(Debug, Clone, PartialEq)]
pub enum TurnOutcome {
    /// Genuine model answer grounded on whatever the index returned.
    Answered,
    /// The turn completed, but with fallback behaviour (index or model unavailable).
    Degraded { reason: String },
    /// The turn could not run; history was left untouched.
    Failed { reason: String },
}

/// A resolved turn: the caller-facing result plus how it was produced.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatTurn {
    pub result: ChatResult,
    pub outcome: TurnOutcome,
}

/// One conversation with its own history.
pub struct ConversationSession {
    retriever: Arc<KnowledgeRetriever>,
    generator: Arc<AnswerGenerator>,
    history: ConversationHistory,
}

impl ConversationSession {
    /// Create a session retaining the default six history entries.
    pub fn new(retriever: Arc<KnowledgeRetriever>, generator: Arc<AnswerGenerator>) -> Self {
        Self::with_history_limit(retriever, generator, DEFAULT_MAX_HISTORY)
    }

    pub fn with_history_limit(
        retriever: Arc<KnowledgeRetriever>,
        generator: Arc<AnswerGenerator>,
        max_history: usize,
    ) -> Self {
        Self {
            retriever,
            generator,
            history: ConversationHistory::new(max_history),
        }
    }

    pub fn history(&self) -> &ConversationHistory {
        &self.history
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    /// Run one turn.
    ///
    /// Retrieval and generation faults degrade gracefully and are still
    /// recorded. An embedding fault fails the turn: the reply describes the
    /// error and history is not modified.
    #[instrument(skip(self, user_text), fields(history = self.history.len()))]
    pub async fn chat(&mut self, user_text: &str) -> ChatTurn {
        let retrieval = match self.retriever.search(user_text).await {
            Ok(retrieval) => retrieval,
            Err(e) => {
                warn!("Chat turn failed: {}", e);
                return ChatTurn {
                    result: ChatResult {
                        response: format!(
                            "I apologize, but I encountered an error: {} - {}",
                            e.kind(),
                            e
                        ),
                        sources: Vec::new(),
                    },
                    outcome: TurnOutcome::Failed {
                        reason: e.to_string(),
                    },
                };
            }
        };

        let sources = retrieval.sources();
        let context = format_context(retrieval.records(), None);

        let generation = self
            .generator
            .generate(user_text, &context, self.history.turns())
            .await;

        let outcome = match (&generation, &retrieval) {
            (Generation::Degraded { reason, .. }, _) => TurnOutcome::Degraded {
                reason: reason.clone(),
            },
            (Generation::Answered(_), Retrieval::Unavailable(reason)) => TurnOutcome::Degraded {
                reason: format!("Knowledge base unavailable: {}", reason),
            },
            (Generation::Answered(_), Retrieval::Matches(_)) => TurnOutcome::Answered,
        };

        let response = generation.into_text();
        self.history.record_exchange(user_text, &response);

        info!(sources = sources.len(), outcome = ?outcome, "Chat turn complete");

        ChatTurn {
            result: ChatResult { response, sources },
            outcome,
        }
    }
}
