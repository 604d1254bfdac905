//! Grounded answer generation.

use crate::completion::{ChatMessage, ChatModel, CompletionRequest};
use crate::config::{AssistantPrompts, OpenAISettings, Prompts};
use crate::error::SwornError;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{instrument, warn};

/// Result of one generation attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum Generation {
    /// The model produced an answer.
    Answered(String),
    /// The provider failed or returned nothing; `text` is the fixed apology shown instead.
    Degraded { text: String, reason: String },
}

impl Generation {
    /// Text to show the user.
    pub fn text(&self) -> &str {
        match self {
            Generation::Answered(text) => text,
            Generation::Degraded { text, .. } => text,
        }
    }

    pub fn into_text(self) -> String {
        match self {
            Generation::Answered(text) => text,
            Generation::Degraded { text, .. } => text,
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, Generation::Degraded { .. })
    }
}

/// Builds the grounded prompt and calls the chat model.
pub struct AnswerGenerator {
    chat_model: Arc<dyn ChatModel>,
    prompts: AssistantPrompts,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

impl AnswerGenerator {
    /// Create a generator using `gpt-4o-mini` at temperature 0.7 with 500 output tokens.
    pub fn new(chat_model: Arc<dyn ChatModel>, prompts: AssistantPrompts) -> Self {
        let defaults = OpenAISettings::default();
        Self {
            chat_model,
            prompts,
            model: defaults.chat_model,
            temperature: defaults.temperature,
            max_tokens: defaults.max_tokens,
        }
    }

    /// Take model name and sampling parameters from settings.
    pub fn with_settings(mut self, settings: &OpenAISettings) -> Self {
        self.model = settings.chat_model.clone();
        self.temperature = settings.temperature;
        self.max_tokens = settings.max_tokens;
        self
    }

    /// Messages sent for `query`: system prompt, the context-bearing user turn, then `history`.
    pub fn build_messages(&self, query: &str, context: &str, history: &[ChatMessage]) -> Vec<ChatMessage> {
        let vars = HashMap::from([("context", context), ("question", query)]);
        let user_prompt = Prompts::render(&self.prompts.user, &vars);

        let mut messages = Vec::with_capacity(history.len() + 2);
        messages.push(ChatMessage::system(self.prompts.system.clone()));
        messages.push(ChatMessage::user(user_prompt));
        messages.extend(history.iter().cloned());
        messages
    }

    /// Generate an answer. Never fails; provider faults become [`Generation::Degraded`].
    #[instrument(skip_all, fields(model = %self.model, history = history.len()))]
    pub async fn generate(&self, query: &str, context: &str, history: &[ChatMessage]) -> Generation {
        let request = CompletionRequest {
            model: self.model.clone(),
            messages: self.build_messages(query, context, history),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        match self.chat_model.complete(&request).await {
            Ok(answer) if !answer.trim().is_empty() => Generation::Answered(answer),
            Ok(_) => self.degrade(SwornError::Completion("Model returned an empty answer".to_string())),
            Err(e) => self.degrade(e),
        }
    }

    fn degrade(&self, error: SwornError) -> Generation {
        warn!("Error generating response: {}", error);
        Generation::Degraded {
            text: self.prompts.apology.clone(),
            reason: error.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::completion::Role;
    use crate::rag::context::NO_CONTEXT;
    use crate::test_support::ScriptedChatModel;

    #[tokio::test]
    async fn test_prompt_layout_and_parameters() {
        let model = Arc::new(ScriptedChatModel::replying("Try a consistent wind-down routine."));
        let generator = AnswerGenerator::new(model.clone(), AssistantPrompts::default());

        let history = vec![
            ChatMessage::user("earlier question"),
            ChatMessage::assistant("earlier answer"),
        ];
        let generation = generator
            .generate("How do I sleep after nights?", "From video A:\nDarken the room.", &history)
            .await;

        assert_eq!(generation, Generation::Answered("Try a consistent wind-down routine.".to_string()));

        let request = model.last_request().unwrap();
        assert_eq!(request.model, "gpt-4o-mini");
        assert!((request.temperature - 0.7).abs() < f32::EPSILON);
        assert_eq!(request.max_tokens, 500);

        let roles: Vec<Role> = request.messages.iter().map(|m| m.role).collect();
        assert_eq!(roles, vec![Role::System, Role::User, Role::User, Role::Assistant]);
        assert!(request.messages[0].content.contains("police officers"));
        assert!(request.messages[1].content.starts_with("Context:\nFrom video A:\nDarken the room.\n\nUser Question: How do I sleep after nights?"));
        assert_eq!(request.messages[2].content, "earlier question");
        assert_eq!(request.messages[3].content, "earlier answer");
    }

    #[tokio::test]
    async fn test_empty_context_still_answers() {
        let model = Arc::new(ScriptedChatModel::replying("General guidance: hydrate."));
        let generator = AnswerGenerator::new(model.clone(), AssistantPrompts::default());

        let generation = generator.generate("What should I drink?", NO_CONTEXT, &[]).await;
        assert!(!generation.is_degraded());
        assert_eq!(generation.text(), "General guidance: hydrate.");
        assert!(model.last_request().unwrap().messages[1].content.contains(NO_CONTEXT));
    }

    #[tokio::test]
    async fn test_provider_fault_becomes_apology() {
        let model = Arc::new(ScriptedChatModel::failing());
        let prompts = AssistantPrompts::default();
        let generator = AnswerGenerator::new(model, prompts.clone());

        let generation = generator.generate("anything", NO_CONTEXT, &[]).await;
        assert!(generation.is_degraded());
        assert_eq!(generation.text(), prompts.apology);
        match generation {
            Generation::Degraded { reason, .. } => assert!(reason.contains("500 upstream")),
            other => panic!("expected degraded generation, got {:?}", other),
        }
    }

    #[test]
    fn test_placeholders_in_inputs_are_kept_verbatim() {
        let generator = AnswerGenerator::new(
            Arc::new(ScriptedChatModel::replying("ok")),
            AssistantPrompts::default(),
        );
        let context = "From video A:\nWrite {{question}} on the board.";

        let first = generator.build_messages("what is {{context}}?", context, &[]);
        assert!(first[1].content.starts_with(
            "Context:\nFrom video A:\nWrite {{question}} on the board.\n\nUser Question: what is {{context}}?\n"
        ));
        for _ in 0..32 {
            assert_eq!(generator.build_messages("what is {{context}}?", context, &[]), first);
        }
    }

    #[tokio::test]
    async fn test_blank_answer_becomes_apology() {
        let prompts = AssistantPrompts::default();
        for reply in ["", "  \n"] {
            let generator = AnswerGenerator::new(Arc::new(ScriptedChatModel::replying(reply)), prompts.clone());
            let generation = generator.generate("anything", NO_CONTEXT, &[]).await;
            assert!(generation.is_degraded());
            assert_eq!(generation.text(), prompts.apology);
        }
    }

    #[tokio::test]
    async fn test_settings_override_parameters() {
        let model = Arc::new(ScriptedChatModel::replying("ok"));
        let settings = OpenAISettings {
            chat_model: "gpt-4o".to_string(),
            temperature: 0.2,
            max_tokens: 128,
            ..OpenAISettings::default()
        };
        let generator = AnswerGenerator::new(model.clone(), AssistantPrompts::default()).with_settings(&settings);

        generator.generate("q", NO_CONTEXT, &[]).await;
        let request = model.last_request().unwrap();
        assert_eq!(request.model, "gpt-4o");
        assert_eq!(request.max_tokens, 128);
    }
}
