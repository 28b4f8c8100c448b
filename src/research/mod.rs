//! Research Pipeline
//!
//! This module implements the plan / search / synthesize pipeline behind
//! every research run, plus the isolated follow-up Q&A helper.
//!
//! # Architecture
//!
//! - [`planner::Planner`] - picks a search strategy and queries for the user query
//! - [`orchestrator::ResearchAgent`] - drives the pipeline and yields [`events::AgentEvent`]s
//! - [`synthesizer::Synthesizer`] - streams the cited final report
//! - [`citations`] - extracts `[Title](URL)` links from finished reports
//! - [`followup`] - answers questions about a completed report
//!
//! # Usage
//!
//! ```ignore
//! use futures::{pin_mut, StreamExt};
//! use socratic::research::ResearchAgent;
//!
//! let agent = ResearchAgent::new(planning_llm, synthesis_llm, tools);
//! let stream = agent.research("What are sparse autoencoders?");
//! pin_mut!(stream);
//! while let Some(event) = stream.next().await {
//!     println!("{:?}", event?);
//! }
//! ```
//!
//! # Research Workflow
//!
//! 1. **Planning** - ask the planning model which tool fits the query
//! 2. **Gathering** - run the planned web and/or Arxiv searches
//! 3. **Synthesis** - stream an educational, cited report
//! 4. **Citation** - extract and classify the report's sources

/// Citation extraction from finished reports.
pub mod citations;
/// Agent event protocol shared by the pipeline and the log feed.
pub mod events;
/// Follow-up Q&A over completed reports.
pub mod followup;
/// Pipeline orchestration.
pub mod orchestrator;
/// Search strategy planning.
pub mod planner;
/// Final report synthesis.
pub mod synthesizer;

pub use citations::{extract_citations, ExtractedCitation};
pub use events::{AgentEvent, SearchStrategy};
pub use followup::ask_follow_up;
pub use orchestrator::ResearchAgent;
pub use planner::{Planner, ResearchPlan};
pub use synthesizer::Synthesizer;
