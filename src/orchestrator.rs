//! Component wiring for Sworn Chat.
//!
//! Builds the provider clients, retriever and generator from settings and
//! hands out conversation sessions.

use crate::completion::{ChatModel, OpenAIChatModel};
use crate::config::{Credentials, Prompts, Settings};
use crate::embedding::{Embedder, OpenAIEmbedder};
use crate::error::Result;
use crate::openai::create_client_with_timeout;
use crate::rag::{AnswerGenerator, KnowledgeRetriever};
use crate::session::{ConversationSession, SessionStore};
use crate::vector_index::{PineconeIndex, VectorIndex};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Owns the shared pipeline components.
pub struct Orchestrator {
    settings: Settings,
    retriever: Arc<KnowledgeRetriever>,
    generator: Arc<AnswerGenerator>,
}

impl Orchestrator {
    /// Connect to OpenAI and Pinecone using `credentials`.
    pub async fn connect(settings: Settings, credentials: &Credentials) -> Result<Self> {
        let prompts = Prompts::load(settings.prompts.custom_dir.as_deref())?;
        let timeout = Duration::from_secs(settings.openai.timeout_secs);

        let client = create_client_with_timeout(&credentials.openai_api_key, timeout)?;

        let embedder: Arc<dyn Embedder> = Arc::new(OpenAIEmbedder::new(
            client.clone(),
            &settings.openai.embedding_model,
            settings.openai.dimensions as usize,
        ));
        let chat_model: Arc<dyn ChatModel> = Arc::new(OpenAIChatModel::new(client));

        let index: Arc<dyn VectorIndex> = Arc::new(
            PineconeIndex::connect(&settings.pinecone, &credentials.pinecone_api_key, timeout).await?,
        );

        info!(
            "Using {} for embeddings and {} for answers",
            settings.openai.embedding_model, settings.openai.chat_model
        );

        Ok(Self::with_components(settings, prompts, embedder, index, chat_model))
    }

    /// Create an orchestrator with custom components.
    pub fn with_components(
        settings: Settings,
        prompts: Prompts,
        embedder: Arc<dyn Embedder>,
        index: Arc<dyn VectorIndex>,
        chat_model: Arc<dyn ChatModel>,
    ) -> Self {
        let retriever = Arc::new(
            KnowledgeRetriever::new(embedder, index, &settings.pinecone.namespace)
                .with_top_k(settings.pinecone.top_k),
        );
        let generator = Arc::new(
            AnswerGenerator::new(chat_model, prompts.assistant).with_settings(&settings.openai),
        );

        Self {
            settings,
            retriever,
            generator,
        }
    }

    /// Start a standalone conversation.
    pub fn new_session(&self) -> ConversationSession {
        ConversationSession::with_history_limit(
            self.retriever.clone(),
            self.generator.clone(),
            self.settings.session.max_history,
        )
    }

    /// Build a store handing out one session per caller.
    pub fn session_store(&self) -> SessionStore {
        SessionStore::new(
            self.retriever.clone(),
            self.generator.clone(),
            self.settings.session.max_history,
            self.settings.session.max_sessions,
        )
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::TurnOutcome;
    use crate::test_support::{knowledge_base, ScriptedChatModel, StaticEmbedder};

    #[tokio::test]
    async fn test_components_follow_settings() {
        let mut settings = Settings::default();
        settings.pinecone.top_k = 1;
        settings.session.max_history = 2;

        let model = Arc::new(ScriptedChatModel::replying("ok"));
        let orchestrator = Orchestrator::with_components(
            settings,
            Prompts::default(),
            Arc::new(StaticEmbedder(vec![1.0, 0.0, 0.0])),
            Arc::new(knowledge_base()),
            model.clone(),
        );

        let mut session = orchestrator.new_session();
        let turn = session.chat("sleep").await;
        assert_eq!(turn.outcome, TurnOutcome::Answered);
        assert_eq!(turn.result.sources, vec!["Shift Work Sleep"]);

        session.chat("again").await;
        assert_eq!(session.history().len(), 2);
        assert_eq!(model.last_request().unwrap().model, "gpt-4o-mini");
    }
}
