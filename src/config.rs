//! Application configuration loaded from environment variables.
//!
//! Every field has a development default so the server starts with no
//! configuration at all. Set `JWT_SECRET` and real model names before
//! deploying anywhere that matters.

use crate::types::{AppError, Result};
use serde::Deserialize;
use std::env;

/// Top-level application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub llm: LLMConfig,
    pub auth: AuthConfig,
}

/// HTTP listener settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Local database settings.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Path of the SQLite file, or `:memory:` for an ephemeral database.
    pub path: String,
}

/// LLM provider settings.
///
/// The API base defaults to OpenRouter; any OpenAI-compatible endpoint
/// works. Per-user API keys come from the database, not from here.
#[derive(Debug, Clone, Deserialize)]
pub struct LLMConfig {
    pub api_base: String,
    pub planning_model: String,
    pub synthesis_model: String,
    pub followup_model: String,
}

/// Token signing settings.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    pub jwt_secret: String,
    /// Access token lifetime in seconds.
    pub jwt_expiry: i64,
}

const DEFAULT_MODEL: &str = "arcee-ai/trinity-large-preview:free";

impl Config {
    /// Load configuration from environment variables with development defaults.
    pub fn from_env() -> Result<Self> {
        Ok(Config {
            server: ServerConfig {
                host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
                port: env::var("PORT")
                    .unwrap_or_else(|_| "5001".to_string())
                    .parse()
                    .map_err(|e| AppError::Internal(format!("Invalid PORT: {}", e)))?,
            },
            database: DatabaseConfig {
                path: env::var("DATABASE_PATH").unwrap_or_else(|_| "research.db".to_string()),
            },
            llm: LLMConfig {
                api_base: env::var("LLM_API_BASE")
                    .unwrap_or_else(|_| "https://openrouter.ai/api/v1".to_string()),
                planning_model: env::var("PLANNING_MODEL")
                    .unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
                synthesis_model: env::var("SYNTHESIS_MODEL")
                    .unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
                followup_model: env::var("FOLLOWUP_MODEL")
                    .unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
            },
            auth: AuthConfig {
                jwt_secret: env::var("JWT_SECRET").unwrap_or_else(|_| {
                    "research-agent-dev-secret-key-change-in-production".to_string()
                }),
                jwt_expiry: env::var("JWT_EXPIRY")
                    .unwrap_or_else(|_| "86400".to_string())
                    .parse()
                    .map_err(|e| AppError::Internal(format!("Invalid JWT_EXPIRY: {}", e)))?,
            },
        })
    }
}
