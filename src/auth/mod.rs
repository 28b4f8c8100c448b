//! JWT Authentication and Middleware
//!
//! Authentication infrastructure for the Socratic API: password hashing,
//! JWT token generation/validation, and the Axum middleware that guards
//! every `/api` route except signup and login.
//!
//! # Security Features
//!
//! - **Password Hashing**: Uses Argon2id (memory-hard) for secure password storage
//! - **JWT Tokens**: HS256 signed tokens with configurable expiration
//!
//! # Usage
//!
//! ```ignore
//! use socratic::auth::jwt::AuthService;
//!
//! let auth = AuthService::new(config.auth.jwt_secret.clone(), config.auth.jwt_expiry);
//! let token = auth.generate_token(&user.id, &user.username)?;
//! let claims = auth.verify_token(&token)?;
//! ```
//!
//! Handlers behind the middleware extract the caller with
//! [`middleware::AuthUser`]:
//!
//! ```ignore
//! async fn protected_handler(AuthUser(claims): AuthUser) -> impl IntoResponse {
//!     format!("Hello, {}!", claims.username)
//! }
//! ```

/// JWT token generation, validation, and password hashing services.
pub mod jwt;
/// Authentication middleware and extractors for protected routes.
pub mod middleware;

pub use jwt::AuthService;
pub use middleware::{auth_middleware, AuthUser};
