//! Research orchestration
//!
//! Drives one research run end to end: plan, search, synthesize. The
//! orchestrator yields [`AgentEvent`]s as it goes and never touches
//! storage; persistence belongs to the run tracker.

use crate::llm::LLMClient;
use crate::research::events::{AgentEvent, SearchStrategy};
use crate::research::planner::{Planner, ResearchPlan};
use crate::research::synthesizer::Synthesizer;
use crate::tools::SearchToolkit;
use crate::types::Result;
use futures::{Stream, StreamExt};
use std::sync::Arc;

/// Plans, searches, and synthesizes one research query.
pub struct ResearchAgent {
    planner: Planner,
    synthesizer: Synthesizer,
    tools: Arc<SearchToolkit>,
}

impl ResearchAgent {
    /// Assembles an agent from role-specific clients and the search tools.
    pub fn new(
        planning_llm: Arc<dyn LLMClient>,
        synthesis_llm: Arc<dyn LLMClient>,
        tools: Arc<SearchToolkit>,
    ) -> Self {
        Self {
            planner: Planner::new(planning_llm),
            synthesizer: Synthesizer::new(synthesis_llm),
            tools,
        }
    }

    /// Runs the research pipeline, yielding progress events and report
    /// chunks in order. An `Err` item is terminal: the stream ends after it.
    ///
    /// A planning failure is not terminal. It falls back to a web search
    /// for the raw user query, announced by a status event.
    pub fn research(&self, query: &str) -> impl Stream<Item = Result<AgentEvent>> + Send + '_ {
        let query = query.to_string();
        async_stream::stream! {
            yield Ok(AgentEvent::Status {
                message: "Analyzing your query...".to_string(),
            });

            let plan = match self.planner.plan(&query).await {
                Ok(plan) => {
                    yield Ok(AgentEvent::Plan {
                        tool: plan.strategy,
                        queries: plan.queries.clone(),
                    });
                    plan
                }
                Err(e) => {
                    tracing::warn!("planning failed, defaulting to web search: {}", e);
                    yield Ok(AgentEvent::Status {
                        message: format!("Planning failed: {}. Defaulting to web search.", e),
                    });
                    ResearchPlan {
                        strategy: SearchStrategy::Web,
                        queries: vec![query.clone()],
                    }
                }
            };

            let mut context = String::new();

            if plan.strategy.includes_web() {
                for q in &plan.queries {
                    yield Ok(AgentEvent::Status {
                        message: format!("Searching web for: {}...", q),
                    });
                    let results = self.tools.web.search(q).await;
                    context.push_str(&format!(
                        "\n--- Web Search Results for '{}' ---\n{}\n",
                        q, results
                    ));
                }
            }

            if plan.strategy.includes_arxiv() {
                for q in &plan.queries {
                    yield Ok(AgentEvent::Status {
                        message: format!("Searching Arxiv for: {}...", q),
                    });
                    let results = self.tools.arxiv.search(q).await;
                    context.push_str(&format!(
                        "\n--- Arxiv Search Results for '{}' ---\n{}\n",
                        q, results
                    ));
                }
            }

            // A "none" strategy still synthesizes: greetings and chit-chat
            // get an answer from the model's own knowledge.
            yield Ok(AgentEvent::Status {
                message: "Synthesizing answer...".to_string(),
            });

            match self.synthesizer.synthesize(&query, &context).await {
                Ok(mut chunks) => {
                    while let Some(chunk) = chunks.next().await {
                        match chunk {
                            Ok(content) => {
                                if !content.is_empty() {
                                    yield Ok(AgentEvent::ResponseChunk { content });
                                }
                            }
                            Err(e) => {
                                yield Err(e);
                                return;
                            }
                        }
                    }
                }
                Err(e) => {
                    yield Err(e);
                }
            }
        }
    }
}
