//! Agent event protocol
//!
//! A research run emits a fixed progression of events: a status line, a
//! plan (or a fallback status when planning fails), per-query search
//! statuses, a synthesis status, then response chunks. Errors terminate
//! the stream. Every event is persisted verbatim to the run's log feed.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Search strategy chosen by the planner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SearchStrategy {
    /// Web search only.
    Web,
    /// Arxiv paper search only.
    Arxiv,
    /// Web and Arxiv.
    Both,
    /// No search; answer from model knowledge.
    None,
}

impl SearchStrategy {
    /// Maps a planner keyword to a strategy. Unknown keywords mean no search.
    pub fn from_keyword(keyword: &str) -> Self {
        match keyword {
            "web" => SearchStrategy::Web,
            "arxiv" => SearchStrategy::Arxiv,
            "both" => SearchStrategy::Both,
            _ => SearchStrategy::None,
        }
    }

    /// Whether this strategy runs web searches.
    pub fn includes_web(&self) -> bool {
        matches!(self, SearchStrategy::Web | SearchStrategy::Both)
    }

    /// Whether this strategy runs Arxiv searches.
    pub fn includes_arxiv(&self) -> bool {
        matches!(self, SearchStrategy::Arxiv | SearchStrategy::Both)
    }
}

/// One event in a research run's feed.
///
/// Serializes with a `type` tag so the log rows and any future SSE layer
/// share one wire shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AgentEvent {
    /// Human-readable progress line.
    Status { message: String },
    /// The planner's tool choice and search queries.
    Plan {
        tool: SearchStrategy,
        queries: Vec<String>,
    },
    /// A fragment of the streamed report.
    ResponseChunk { content: String },
    /// Terminal failure notice.
    Error { message: String },
}

impl AgentEvent {
    /// Stable identifier stored as the log row's action type.
    pub fn kind(&self) -> &'static str {
        match self {
            AgentEvent::Status { .. } => "status",
            AgentEvent::Plan { .. } => "plan",
            AgentEvent::ResponseChunk { .. } => "response_chunk",
            AgentEvent::Error { .. } => "error",
        }
    }
}
