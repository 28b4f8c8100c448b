use crate::AppState;
use axum::{
    middleware,
    routing::{get, post, put},
    Json, Router,
};
use serde_json::json;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Service banner, doubles as a liveness probe.
async fn index() -> Json<serde_json::Value> {
    Json(json!({ "message": "AI Research Agent Backend is running" }))
}

/// Builds the full application router with auth, tracing, and CORS wired.
pub fn create_router(state: AppState) -> Router {
    let public_routes = Router::new()
        // Public routes (no auth required)
        .route("/", get(index))
        .route("/api/signup", post(crate::api::handlers::auth::signup))
        .route("/api/login", post(crate::api::handlers::auth::login));

    let protected_routes = Router::new()
        // Protected routes (auth required)
        .route(
            "/api/research",
            post(crate::api::handlers::research::start_research)
                .get(crate::api::handlers::research::list_runs),
        )
        .route(
            "/api/research/{run_id}",
            get(crate::api::handlers::research::get_run),
        )
        .route(
            "/api/research/{run_id}/logs",
            get(crate::api::handlers::research::list_run_logs),
        )
        .route(
            "/api/research/{run_id}/chat",
            post(crate::api::handlers::chat::send_follow_up)
                .get(crate::api::handlers::chat::list_follow_ups),
        )
        // Settings routes
        .route(
            "/api/settings/password",
            put(crate::api::handlers::settings::change_password),
        )
        .route(
            "/api/settings/api-key",
            put(crate::api::handlers::settings::change_api_key),
        )
        // route_layer keeps unknown paths answering 404 instead of 401
        .route_layer(middleware::from_fn_with_state(
            state.auth_service.clone(),
            crate::auth::middleware::auth_middleware,
        ));

    public_routes
        .merge(protected_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
