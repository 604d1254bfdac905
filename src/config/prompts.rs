//! Prompt templates for Sworn Chat.
//!
//! Prompts can be customized by placing an `assistant.toml` file in the custom prompts directory.

use serde::{Deserialize, Serialize};
use super::Settings;
use std::collections::HashMap;

/// Collection of all prompt templates.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Prompts {
    pub assistant: AssistantPrompts,
}

/// Prompts used by the answer generator.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AssistantPrompts {
    /// Persona and grounding rules.
    pub system: String,
    /// User turn template. Receives `{{context}}` and `{{question}}`.
    pub user: String,
    /// Reply used when the completion provider fails.
    pub apology: String,
}

impl Default for AssistantPrompts {
    fn default() -> Self {
        Self {
            system: r#"You are a helpful assistant with access to a knowledge base of educational content and video transcripts, curated specifically to help on duty police officers manage their health.
Use the provided context to answer questions accurately. Be conversational but precise.
When you reference information, mention if it comes from educational content or video material.
If the context doesn't contain relevant information, be honest about it and provide general guidance."#
                .to_string(),

            user: r#"Context:
{{context}}

User Question: {{question}}
Please provide a helpful response using this context. If the context doesn't contain relevant information, let me know and provide general guidance instead."#
                .to_string(),

            apology: "I apologize, but I encountered an error generating a response. Please try asking your question in a different way."
                .to_string(),
        }
    }
}

impl Prompts {
    /// Load prompts, applying overrides from `custom_dir/assistant.toml` when present.
    pub fn load(custom_dir: Option<&str>) -> crate::error::Result<Self> {
        let mut prompts = Prompts::default();

        if let Some(dir) = custom_dir {
            let custom_path = Settings::expand_path(dir);

            let assistant_path = custom_path.join("assistant.toml");
            if assistant_path.exists() {
                let content = std::fs::read_to_string(&assistant_path)?;
                prompts.assistant = toml::from_str(&content)?;
            }
        }

        Ok(prompts)
    }

    /// Render a prompt template with the given variables.
    ///
    /// Single pass over the template: substituted values are copied verbatim and
    /// never scanned for placeholders. Unknown `{{name}}` tokens are kept as is.
    pub fn render(template: &str, vars: &HashMap<&str, &str>) -> String {
        let mut result = String::with_capacity(template.len());
        let mut rest = template;

        while let Some(start) = rest.find("{{") {
            result.push_str(&rest[..start]);
            let after_open = &rest[start + 2..];

            match after_open.find("}}") {
                Some(end) => {
                    let key = &after_open[..end];
                    match vars.get(key) {
                        Some(value) => result.push_str(value),
                        None => {
                            result.push_str("{{");
                            result.push_str(key);
                            result.push_str("}}");
                        }
                    }
                    rest = &after_open[end + 2..];
                }
                None => {
                    result.push_str(&rest[start..]);
                    rest = "";
                }
            }
        }

        result.push_str(rest);
        result
    }
}
