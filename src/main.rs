use socratic::auth::AuthService;
use socratic::config::Config;
use socratic::db::Store;
use socratic::llm::OpenAIClientFactory;
use socratic::runs::RunSupervisor;
use socratic::tools::SearchToolkit;
use socratic::{api, AppState};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "info,socratic=debug".into()),
        )
        .init();

    let config = Config::from_env()?;
    let addr = format!("{}:{}", config.server.host, config.server.port);

    let store = Store::open(&config.database.path).await?;
    tracing::info!(path = %config.database.path, "Database ready");

    let state = AppState {
        auth_service: Arc::new(AuthService::new(
            config.auth.jwt_secret.clone(),
            config.auth.jwt_expiry,
        )),
        llm: Arc::new(OpenAIClientFactory::new(&config.llm)),
        search: Arc::new(SearchToolkit::new()?),
        supervisor: Arc::new(RunSupervisor::new()),
        store: Arc::new(store),
        config: Arc::new(config),
    };

    // Keep a handle for the post-serve drain; the router owns the state.
    let supervisor = state.supervisor.clone();
    let router = api::create_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "AI Research Agent Backend listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Let in-flight research runs finish their final writes
    supervisor.shutdown().await;
    tracing::info!("Shutdown complete");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
