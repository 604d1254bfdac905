//! Pre-flight checks before talking to providers.
//!
//! Both provider credentials must be present before any command that embeds,
//! searches or generates starts.

use crate::cli::Output;
use crate::config::Credentials;
use crate::error::Result;

/// Load credentials, printing a hint and failing when any is missing.
pub fn check_credentials() -> Result<Credentials> {
    Credentials::from_env().inspect_err(|e| {
        Output::error(&e.to_string());
        Output::info("Export OPENAI_API_KEY and PINECONE_API_KEY before starting sworn-chat.");
    })
}
