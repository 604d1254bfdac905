//! Configuration module for Sworn Chat.
//!
//! Handles loading application settings, provider credentials and prompt templates.

mod credentials;
mod prompts;
mod settings;

pub use credentials::{Credentials, OPENAI_API_KEY_VAR, PINECONE_API_KEY_VAR};
pub use prompts::{AssistantPrompts, Prompts};
pub use settings::{
    GeneralSettings, OpenAISettings, PineconeSettings, PromptSettings, ServerSettings,
    SessionSettings, Settings,
};
