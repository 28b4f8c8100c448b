use crate::{
    auth::middleware::AuthUser,
    research::ResearchAgent,
    runs::execute_run,
    types::{
        AppError, LogEntry, ResearchRequest, Result, RunCreatedResponse, RunDetail, RunSummary,
    },
    AppState,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

const MAX_QUERY_CHARS: usize = 2000;

/// Start a research run
#[utoipa::path(
    post,
    path = "/api/research",
    request_body = ResearchRequest,
    responses(
        (status = 201, description = "Run queued", body = RunCreatedResponse),
        (status = 400, description = "Invalid input"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "research",
    security(("bearer" = []))
)]
pub async fn start_research(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Json(payload): Json<ResearchRequest>,
) -> Result<(StatusCode, Json<RunCreatedResponse>)> {
    // Validate input
    let query = payload.query.trim();
    if query.is_empty() {
        return Err(AppError::InvalidInput("Query cannot be empty".to_string()));
    }
    if query.chars().count() > MAX_QUERY_CHARS {
        return Err(AppError::InvalidInput(
            "Query must be 2000 characters or fewer".to_string(),
        ));
    }

    // The run's LLM clients are built from the key stored on the account,
    // so the caller must still exist.
    let user = state
        .store
        .get_user_by_id(&claims.sub)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    let run = state.store.create_run(&user.id, query).await?;

    let agent = ResearchAgent::new(
        state.llm.planner(&user.api_key),
        state.llm.synthesizer(&user.api_key),
        state.search.clone(),
    );

    state
        .supervisor
        .spawn(execute_run(
            state.store.clone(),
            run.id.clone(),
            query.to_string(),
            agent,
        ))
        .await;

    Ok((
        StatusCode::CREATED,
        Json(RunCreatedResponse {
            id: run.id,
            status: run.status,
        }),
    ))
}

/// List the caller's research runs
#[utoipa::path(
    get,
    path = "/api/research",
    responses(
        (status = 200, description = "Runs, newest first", body = [RunSummary]),
        (status = 401, description = "Unauthorized")
    ),
    tag = "research",
    security(("bearer" = []))
)]
pub async fn list_runs(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
) -> Result<Json<Vec<RunSummary>>> {
    let runs = state.store.list_runs_for_user(&claims.sub).await?;

    Ok(Json(runs.iter().map(|r| r.to_summary()).collect()))
}

/// Get one research run with its citations
#[utoipa::path(
    get,
    path = "/api/research/{run_id}",
    params(("run_id" = String, Path, description = "Run identifier")),
    responses(
        (status = 200, description = "Run details", body = RunDetail),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Run not found")
    ),
    tag = "research",
    security(("bearer" = []))
)]
pub async fn get_run(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path(run_id): Path<String>,
) -> Result<Json<RunDetail>> {
    let run = state
        .store
        .get_run_for_user(&run_id, &claims.sub)
        .await?
        .ok_or_else(|| AppError::NotFound("Run not found".to_string()))?;

    let citations = state.store.list_citations(&run_id).await?;

    Ok(Json(
        run.to_detail(citations.iter().map(|c| c.to_entry()).collect()),
    ))
}

/// Get a run's agent log feed
#[utoipa::path(
    get,
    path = "/api/research/{run_id}/logs",
    params(("run_id" = String, Path, description = "Run identifier")),
    responses(
        (status = 200, description = "Log entries, oldest first", body = [LogEntry]),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Run not found")
    ),
    tag = "research",
    security(("bearer" = []))
)]
pub async fn list_run_logs(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path(run_id): Path<String>,
) -> Result<Json<Vec<LogEntry>>> {
    // Ownership check before touching the logs
    state
        .store
        .get_run_for_user(&run_id, &claims.sub)
        .await?
        .ok_or_else(|| AppError::NotFound("Run not found".to_string()))?;

    let logs = state.store.list_logs(&run_id).await?;

    Ok(Json(logs.iter().map(|l| l.to_entry()).collect()))
}
