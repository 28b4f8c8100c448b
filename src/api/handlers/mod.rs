//! API request handlers.
//!
//! This module contains all HTTP request handlers organized by functionality.

/// Authentication handlers (signup, login).
pub mod auth;
/// Follow-up chat handlers.
pub mod chat;
/// Research run handlers.
pub mod research;
/// Account settings handlers.
pub mod settings;
