//! Provider credentials read from the environment.

use crate::error::{Result, SwornError};

/// Environment variable holding the OpenAI API key.
pub const OPENAI_API_KEY_VAR: &str = "OPENAI_API_KEY";
/// Environment variable holding the Pinecone API key.
pub const PINECONE_API_KEY_VAR: &str = "PINECONE_API_KEY";

/// API keys for the embedding/completion provider and the vector index.
#[derive(Clone)]
pub struct Credentials {
    pub openai_api_key: String,
    pub pinecone_api_key: String,
}

impl Credentials {
    /// Read both keys from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read both keys through `lookup`. Blank values count as missing.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let fetch = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let openai = fetch(OPENAI_API_KEY_VAR);
        let pinecone = fetch(PINECONE_API_KEY_VAR);

        match (openai, pinecone) {
            (Some(openai_api_key), Some(pinecone_api_key)) => Ok(Self {
                openai_api_key,
                pinecone_api_key,
            }),
            (openai, pinecone) => {
                let missing: Vec<&str> = [
                    openai.is_none().then_some(OPENAI_API_KEY_VAR),
                    pinecone.is_none().then_some(PINECONE_API_KEY_VAR),
                ]
                .into_iter()
                .flatten()
                .collect();
                Err(SwornError::Config(format!(
                    "Missing required environment variables: {}",
                    missing.join(", ")
                )))
            }
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("openai_api_key", &"<redacted>")
            .field("pinecone_api_key", &"<redacted>")
            .finish()
    }
}
