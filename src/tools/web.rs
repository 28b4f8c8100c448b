//! Web search tool implementation using daedra
//!
//! Uses DuckDuckGo as the search backend and renders the top hits as a
//! markdown list the synthesis model can cite directly.

use crate::tools::SearchTool;
use async_trait::async_trait;

/// Web search tool powered by daedra.
pub struct WebSearch {
    max_results: usize,
}

impl WebSearch {
    /// Creates the tool with its default result limit.
    pub fn new() -> Self {
        Self { max_results: 5 }
    }
}

impl Default for WebSearch {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SearchTool for WebSearch {
    fn name(&self) -> &str {
        "web"
    }

    async fn search(&self, query: &str) -> String {
        let search_args = daedra::SearchArgs {
            query: query.to_string(),
            options: Some(daedra::SearchOptions {
                num_results: self.max_results,
                ..Default::default()
            }),
        };

        match daedra::tools::search::perform_search(&search_args).await {
            Ok(response) if response.data.is_empty() => "No web results found.".to_string(),
            Ok(response) => {
                let mut results = String::from("Web Search Results:\n\n");
                for (i, result) in response.data.iter().take(self.max_results).enumerate() {
                    results.push_str(&format!(
                        "{}. [{}]({})\n   {}\n\n",
                        i + 1,
                        result.title,
                        result.url,
                        result.description
                    ));
                }
                results
            }
            Err(e) => format!("Error performing web search: {}", e),
        }
    }
}
