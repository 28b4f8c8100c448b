//! Search tools that gather research context
//!
//! Tools take a query string and return prompt-ready text. They never
//! return errors: a failed or empty search renders as a short message in
//! the returned text, so a flaky backend degrades the research context
//! instead of aborting the run.
//!
//! # Tools
//!
//! - [`WebSearch`] - DuckDuckGo web search via daedra
//! - [`ArxivSearch`] - Arxiv paper search via the export API Atom feed

use crate::types::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Arxiv paper search over the export API.
pub mod arxiv;
/// Web search powered by daedra.
pub mod web;

pub use arxiv::ArxivSearch;
pub use web::WebSearch;

/// A search backend that renders results as prompt-ready text.
#[async_trait]
pub trait SearchTool: Send + Sync {
    /// Short identifier used in logs.
    fn name(&self) -> &str;

    /// Runs the search and formats the results for the synthesis prompt.
    async fn search(&self, query: &str) -> String;
}

/// The fixed pair of search tools available to research runs.
pub struct SearchToolkit {
    pub web: Arc<dyn SearchTool>,
    pub arxiv: Arc<dyn SearchTool>,
}

impl SearchToolkit {
    /// Builds the production toolkit.
    pub fn new() -> Result<Self> {
        Ok(Self {
            web: Arc::new(WebSearch::new()),
            arxiv: Arc::new(ArxivSearch::new()?),
        })
    }

    /// Builds a toolkit from explicit tool implementations.
    pub fn with_tools(web: Arc<dyn SearchTool>, arxiv: Arc<dyn SearchTool>) -> Self {
        Self { web, arxiv }
    }
}
