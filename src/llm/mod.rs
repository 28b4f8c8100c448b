//! LLM Clients and Abstractions
//!
//! A thin abstraction over OpenAI-compatible chat APIs. The core trait is
//! [`LLMClient`]; [`LLMClientFactory`] builds role-specific clients (planner,
//! synthesizer, follow-up) bound to a caller's API key.
//!
//! # Example
//!
//! ```ignore
//! use socratic::llm::{LLMClientFactory, OpenAIClientFactory};
//!
//! let factory = OpenAIClientFactory::new(&config.llm);
//! let planner = factory.planner(&user.api_key);
//! let plan_text = planner.generate("...").await?;
//! ```
//!
//! # Streaming
//!
//! Streaming completions return a [`TextStream`], a boxed
//! `Stream<Item = Result<String>>` of content fragments.

/// Core LLM client trait, streaming types, and the client factory trait.
pub mod client;
/// OpenAI-compatible client and factory (OpenRouter by default).
pub mod openai;

pub use client::{LLMClient, LLMClientFactory, TextStream};
pub use openai::{OpenAIClient, OpenAIClientFactory};
