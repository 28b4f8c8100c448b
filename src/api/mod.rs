//! HTTP API handlers and routes.
//!
//! The REST layer is built on the Axum web framework.
//!
//! # API Endpoints
//!
//! ## Public
//! - `GET /` - Service banner
//! - `POST /api/signup` - Create an account
//! - `POST /api/login` - Login and receive a JWT
//!
//! ## Research (`/api/research`)
//! - `POST /api/research` - Queue a research run
//! - `GET /api/research` - List the caller's runs, newest first
//! - `GET /api/research/{run_id}` - Run details with citations
//! - `GET /api/research/{run_id}/logs` - Agent log feed, oldest first
//!
//! ## Follow-up chat
//! - `POST /api/research/{run_id}/chat` - Ask about a completed run
//! - `GET /api/research/{run_id}/chat` - Conversation so far
//!
//! ## Settings (`/api/settings`)
//! - `PUT /api/settings/password` - Change password
//! - `PUT /api/settings/api-key` - Replace the stored model API key
//!
//! # Authentication
//!
//! Everything except the banner, signup, and login requires a JWT in the
//! `Authorization` header:
//! ```text
//! Authorization: Bearer <token>
//! ```

/// Request and response handlers for all API endpoints.
pub mod handlers;
/// Router configuration and route definitions.
pub mod routes;

pub use routes::create_router;
