//! Context assembly for RAG prompts.

use crate::vector_index::RetrievedRecord;

/// Context text used when retrieval produced nothing.
pub const NO_CONTEXT: &str = "No relevant content found in the knowledge base.";

const EDUCATIONAL_HEADER: &str = "Relevant information from educational content:";
const TRANSCRIPT_HEADER: &str = "\nRelevant information from video transcripts:";

/// Format retrieved records into one block of prompt context.
///
/// Educational matches come first, then transcript matches. `None` and empty
/// slices are both treated as "no matches" for that channel. Records missing
/// metadata render with the "Unknown source" / "No content available" defaults.
pub fn format_context(
    transcripts: Option<&[RetrievedRecord]>,
    educational: Option<&[RetrievedRecord]>,
) -> String {
    let mut context: Vec<String> = Vec::new();

    if let Some(records) = educational.filter(|r| !r.is_empty()) {
        context.push(EDUCATIONAL_HEADER.to_string());
        for record in records {
            context.push(format!("\nFrom {}:\n{}", record.source_name(), record.content_text()));
        }
    }

    if let Some(records) = transcripts.filter(|r| !r.is_empty()) {
        context.push(TRANSCRIPT_HEADER.to_string());
        for record in records {
            context.push(format!(
                "\nFrom video {}:\n{}",
                record.source_name(),
                record.content_text()
            ));
        }
    }

    if context.is_empty() {
        return NO_CONTEXT.to_string();
    }

    context.join("\n")
}
