//! Mock implementations for testing.
//!
//! Mock LLM clients, a mock client factory, and mock search tools shared
//! across the integration test files. Nothing here touches the network.

use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use socratic::llm::{LLMClient, LLMClientFactory, TextStream};
use socratic::tools::SearchTool;
use socratic::types::{AppError, Result};
use std::sync::{Arc, Mutex};

/// Mock LLM client with a configurable canned response.
///
/// Streaming splits the response into five-character chunks. A client can
/// be configured to fail outright or to fail partway through a stream.
#[derive(Clone)]
pub struct MockLLMClient {
    response: String,
    should_fail: bool,
    fail_after_chunks: Option<usize>,
}

impl MockLLMClient {
    /// Client that returns the given response.
    pub fn new(response: &str) -> Self {
        Self {
            response: response.to_string(),
            should_fail: false,
            fail_after_chunks: None,
        }
    }

    /// Client that always returns an error.
    pub fn failing() -> Self {
        Self {
            response: String::new(),
            should_fail: true,
            fail_after_chunks: None,
        }
    }

    /// Client whose stream yields `chunks` chunks and then an error.
    pub fn failing_after(response: &str, chunks: usize) -> Self {
        Self {
            response: response.to_string(),
            should_fail: false,
            fail_after_chunks: Some(chunks),
        }
    }
}

#[async_trait]
impl LLMClient for MockLLMClient {
    async fn generate(&self, _prompt: &str) -> Result<String> {
        if self.should_fail {
            return Err(AppError::LLM("Mock LLM failure".to_string()));
        }
        Ok(self.response.clone())
    }

    async fn generate_with_history(&self, _messages: &[(String, String)]) -> Result<String> {
        if self.should_fail {
            return Err(AppError::LLM("Mock LLM failure".to_string()));
        }
        Ok(self.response.clone())
    }

    async fn stream_with_system(&self, _system: &str, _prompt: &str) -> Result<TextStream> {
        if self.should_fail {
            return Err(AppError::LLM("Mock LLM failure".to_string()));
        }

        // Split response into chunks for streaming simulation
        let chunks: Vec<String> = self
            .response
            .chars()
            .collect::<Vec<_>>()
            .chunks(5)
            .map(|c| c.iter().collect())
            .collect();

        let mut items: Vec<Result<String>> = chunks.into_iter().map(Ok).collect();
        if let Some(limit) = self.fail_after_chunks {
            items.truncate(limit);
            items.push(Err(AppError::LLM(
                "Stream error: connection reset".to_string(),
            )));
        }

        let stream = stream::iter(items);
        Ok(Box::new(stream.boxed()))
    }

    fn model_name(&self) -> &str {
        "mock-model"
    }
}

/// Mock factory handing out fixed clients regardless of API key.
pub struct MockLLMFactory {
    planner: Arc<dyn LLMClient>,
    synthesizer: Arc<dyn LLMClient>,
    follow_up: Arc<dyn LLMClient>,
}

impl MockLLMFactory {
    pub fn new(
        planner: MockLLMClient,
        synthesizer: MockLLMClient,
        follow_up: MockLLMClient,
    ) -> Self {
        Self {
            planner: Arc::new(planner),
            synthesizer: Arc::new(synthesizer),
            follow_up: Arc::new(follow_up),
        }
    }
}

impl LLMClientFactory for MockLLMFactory {
    fn planner(&self, _api_key: &str) -> Arc<dyn LLMClient> {
        self.planner.clone()
    }

    fn synthesizer(&self, _api_key: &str) -> Arc<dyn LLMClient> {
        self.synthesizer.clone()
    }

    fn follow_up(&self, _api_key: &str) -> Arc<dyn LLMClient> {
        self.follow_up.clone()
    }
}

/// Mock search tool that records every query it receives.
pub struct MockSearchTool {
    name: &'static str,
    results: String,
    queries: Mutex<Vec<String>>,
}

impl MockSearchTool {
    /// Tool that returns `results` for every query.
    pub fn new(name: &'static str, results: &str) -> Self {
        Self {
            name,
            results: results.to_string(),
            queries: Mutex::new(Vec::new()),
        }
    }

    /// Queries seen so far, in call order.
    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl SearchTool for MockSearchTool {
    fn name(&self) -> &str {
        self.name
    }

    async fn search(&self, query: &str) -> String {
        self.queries.lock().unwrap().push(query.to_string());
        self.results.clone()
    }
}
