//! SQLite persistence layer.
//!
//! All durable state lives in a single local libsql database: user
//! accounts, research runs, the append-only agent log feed, extracted
//! citations, and follow-up conversations.

#![allow(missing_docs)]

pub mod store;

pub use store::{AgentLog, Citation, FollowUpMessage, ResearchRun, Store, User};
