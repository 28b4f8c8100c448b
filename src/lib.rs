//! # Socratic - AI Research Agent Backend
//!
//! A multi-tenant research agent server built in Rust. Each authenticated
//! user submits research queries; a background agent plans the research,
//! searches the web and Arxiv, streams a cited report out of an LLM, and
//! persists everything for later reading and follow-up questions.
//!
//! ## Overview
//!
//! Socratic can be used in two ways:
//!
//! 1. **As a standalone server** - Run the `socratic-server` binary
//! 2. **As a library** - Import components into your own Rust project
//!
//! ## Quick Start (Library Usage)
//!
//! ```rust,ignore
//! use socratic::{api, config::Config, db::Store, AppState};
//! use socratic::auth::AuthService;
//! use socratic::llm::OpenAIClientFactory;
//! use socratic::runs::RunSupervisor;
//! use socratic::tools::SearchToolkit;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env()?;
//!     let store = Store::open(&config.database.path).await?;
//!
//!     let state = AppState {
//!         auth_service: Arc::new(AuthService::new(
//!             config.auth.jwt_secret.clone(),
//!             config.auth.jwt_expiry,
//!         )),
//!         llm: Arc::new(OpenAIClientFactory::new(&config.llm)),
//!         search: Arc::new(SearchToolkit::new()?),
//!         supervisor: Arc::new(RunSupervisor::new()),
//!         store: Arc::new(store),
//!         config: Arc::new(config),
//!     };
//!
//!     let listener = tokio::net::TcpListener::bind("127.0.0.1:5001").await?;
//!     axum::serve(listener, api::create_router(state)).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Modules
//!
//! - [`api`] - REST API handlers and routes
//! - [`auth`] - JWT authentication and middleware
//! - [`config`] - Environment-based configuration
//! - [`db`] - SQLite persistence
//! - [`llm`] - LLM client implementations
//! - [`research`] - Planning, search, synthesis, citations
//! - [`runs`] - Background run execution
//! - [`tools`] - Web and Arxiv search tools
//! - [`types`] - Common types and error handling
//!
//! ## Research Lifecycle
//!
//! A run moves through `QUEUED` -> `IN_PROGRESS` -> `COMPLETED` or
//! `FAILED`. Every agent event along the way lands in an append-only log
//! feed that clients poll to render live progress.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

/// HTTP API handlers and routes.
pub mod api;
/// JWT authentication and middleware.
pub mod auth;
/// Environment-based configuration.
pub mod config;
/// SQLite persistence layer.
pub mod db;
/// LLM provider clients and abstractions.
pub mod llm;
/// The research agent: planning, search, synthesis, citations.
pub mod research;
/// Background execution and supervision of research runs.
pub mod runs;
/// Search tools shared by all runs.
pub mod tools;
/// Core types (requests, responses, errors).
pub mod types;

// Re-export commonly used types
pub use api::create_router;
pub use config::Config;
pub use db::Store;
pub use llm::{LLMClient, LLMClientFactory, OpenAIClientFactory};
pub use research::ResearchAgent;
pub use runs::RunSupervisor;
pub use tools::SearchToolkit;
pub use types::{AppError, Result};

use crate::auth::AuthService;
use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Immutable server configuration
    pub config: Arc<Config>,
    /// SQLite store holding users, runs, logs, citations, and follow-ups
    pub store: Arc<Store>,
    /// Authentication service
    pub auth_service: Arc<AuthService>,
    /// Builds per-run LLM clients from a user's API key
    pub llm: Arc<dyn LLMClientFactory>,
    /// Search tools shared by all runs
    pub search: Arc<SearchToolkit>,
    /// Tracks in-flight run tasks for graceful shutdown
    pub supervisor: Arc<RunSupervisor>,
}
