//! Report synthesis
//!
//! Streams a cited, educational report from the synthesis model given the
//! user query and the accumulated search context.

use crate::llm::{LLMClient, TextStream};
use crate::types::Result;
use std::sync::Arc;

const SYNTHESIS_SYSTEM_PROMPT: &str = r#"You are an expert tutor and research agent.
Your goal is to provide a comprehensive, educational answer to the user's query based on the provided context.

Guidelines:
1. **Educational Tone**: Be patient, clear, and informative. Explain complex terms.
2. **Structure**: Use Markdown. Include a clear introduction, main body with headings, and a conclusion.
3. **Citations**: STRICTLY cite your sources. Use [Title](URL) format inline or at the bottom.
4. **Synthesis**: Don't just list results; synthesize them into a coherent narrative.
5. **No Context**: If you found no relevant info, admit it and answer to the best of your foundational knowledge, but note the lack of sources."#;

fn synthesis_prompt(query: &str, context: &str) -> String {
    format!(
        "User Query: {query}\n\nResearch Context:\n{context}\n\nPlease provide your educational response now."
    )
}

/// Streams the final report for a research run.
pub struct Synthesizer {
    llm: Arc<dyn LLMClient>,
}

impl Synthesizer {
    /// Creates a synthesizer over the given model client.
    pub fn new(llm: Arc<dyn LLMClient>) -> Self {
        Self { llm }
    }

    /// Opens a completion stream for the report.
    pub async fn synthesize(&self, query: &str, context: &str) -> Result<TextStream> {
        self.llm
            .stream_with_system(SYNTHESIS_SYSTEM_PROMPT, &synthesis_prompt(query, context))
            .await
    }
}
