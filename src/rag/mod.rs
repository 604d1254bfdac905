//! RAG (Retrieval-Augmented Generation) pipeline.
//!
//! Retrieval, context assembly and answer generation for one conversation turn.

pub mod context;
mod generator;
mod retriever;

pub use context::{format_context, NO_CONTEXT};
pub use generator::{AnswerGenerator, Generation};
pub use retriever::{collect_sources, KnowledgeRetriever, Retrieval, DEFAULT_TOP_K};
