//! Research planning
//!
//! Asks the planning model which search tool fits the query and which
//! search queries to run, then parses its constrained plain-text reply.

use crate::llm::LLMClient;
use crate::research::events::SearchStrategy;
use crate::types::{AppError, Result};
use std::sync::Arc;

/// Tool choice plus search queries for one research run.
#[derive(Debug, Clone, PartialEq)]
pub struct ResearchPlan {
    pub strategy: SearchStrategy,
    pub queries: Vec<String>,
}

/// Picks a search strategy for a user query.
pub struct Planner {
    llm: Arc<dyn LLMClient>,
}

impl Planner {
    /// Creates a planner over the given model client.
    pub fn new(llm: Arc<dyn LLMClient>) -> Self {
        Self { llm }
    }

    /// Produces a research plan for the query.
    ///
    /// Fails when the model is unreachable or replies in a shape the
    /// parser cannot read; the caller decides the fallback.
    pub async fn plan(&self, query: &str) -> Result<ResearchPlan> {
        let response = self.llm.generate(&planning_prompt(query)).await?;
        parse_plan(&response)
    }
}

fn planning_prompt(query: &str) -> String {
    format!(
        r#"You are an expert research assistant. Analyze the following user query:
"{query}"

Determine the best tool to answer this query:
- "web": for general knowledge, current events, definitions, broad topics.
- "arxiv": for specific scientific papers, technical deep dives, math/CS/physics research.
- "both": if it requires both general context and specific papers.
- "none": if it's a simple greeting or doesn't need external info.

Also provide 1-3 specific search queries optimized for that tool.

Respond in this format strictly:
Tool: [web/arxiv/both/none]
Queries: [query1, query2, query3]"#
    )
}

/// Parses the planner's reply.
///
/// The `Tool:` line is required; a reply without one is malformed. An
/// unknown tool keyword is an answered-but-useless plan and maps to
/// [`SearchStrategy::None`]. The `Queries:` line is optional, brackets
/// around the list are tolerated, and empty items are dropped.
fn parse_plan(response: &str) -> Result<ResearchPlan> {
    let mut strategy = None;
    let mut queries = Vec::new();

    for line in response.lines() {
        let line = line.trim();
        if let Some(value) = line.strip_prefix("Tool:") {
            let keyword = value.trim().to_lowercase().replace(['[', ']'], "");
            strategy = Some(SearchStrategy::from_keyword(keyword.trim()));
        } else if let Some(value) = line.strip_prefix("Queries:") {
            let mut list = value.trim();
            if list.starts_with('[') && list.ends_with(']') && list.len() >= 2 {
                list = &list[1..list.len() - 1];
            }
            queries = list
                .split(',')
                .map(str::trim)
                .filter(|q| !q.is_empty())
                .map(str::to_string)
                .collect();
        }
    }

    let strategy = strategy
        .ok_or_else(|| AppError::LLM("Malformed plan response: missing Tool line".to_string()))?;

    Ok(ResearchPlan { strategy, queries })
}
