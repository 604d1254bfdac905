//! Sworn Chat - a retrieval-augmented wellness assistant.
//!
//! Answers health and wellness questions for on-duty officers from a curated
//! knowledge base of educational content and video transcripts, citing the
//! sources each answer drew on.
//!
//! # Architecture
//!
//! A turn flows through these modules in order:
//!
//! - `embedding` - Query embedding (OpenAI)
//! - `vector_index` - Nearest-neighbour search (Pinecone, in-memory)
//! - `rag` - Retrieval, context assembly and answer generation
//! - `completion` - Chat completion providers (OpenAI)
//! - `session` - Bounded conversation history and per-caller sessions
//! - `server` - The `/api/chat` HTTP endpoint
//!
//! `config` loads settings, credentials and prompts; `orchestrator` wires the
//! components together.
//!
//! # Example
//!
//! ```rust,no_run
//! use sworn_chat::config::{Credentials, Settings};
//! use sworn_chat::orchestrator::Orchestrator;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let credentials = Credentials::from_env()?;
//!     let orchestrator = Orchestrator::connect(settings, &credentials).await?;
//!
//!     let mut session = orchestrator.new_session();
//!     let turn = session.chat("How can I sleep better between night shifts?").await;
//!     println!("{}", turn.result.response);
//!     println!("Sources: {:?}", turn.result.sources);
//!
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod completion;
pub mod config;
pub mod embedding;
pub mod error;
pub mod openai;
pub mod orchestrator;
pub mod rag;
pub mod server;
pub mod session;
pub mod vector_index;

#[cfg(test)]
mod test_support;

pub use error::{Result, SwornError};
