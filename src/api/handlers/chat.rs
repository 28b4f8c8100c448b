use crate::{
    auth::middleware::AuthUser,
    research::ask_follow_up,
    types::{AppError, FollowUpExchange, FollowUpRequest, Result, RunStatus},
    AppState,
};
use axum::{
    extract::{Path, State},
    Json,
};

/// Ask a follow-up question about a completed run
#[utoipa::path(
    post,
    path = "/api/research/{run_id}/chat",
    params(("run_id" = String, Path, description = "Run identifier")),
    request_body = FollowUpRequest,
    responses(
        (status = 200, description = "Question and answer", body = FollowUpExchange),
        (status = 400, description = "Run not completed or invalid input"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Run not found")
    ),
    tag = "chat",
    security(("bearer" = []))
)]
pub async fn send_follow_up(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path(run_id): Path<String>,
    Json(payload): Json<FollowUpRequest>,
) -> Result<Json<FollowUpExchange>> {
    let run = state
        .store
        .get_run_for_user(&run_id, &claims.sub)
        .await?
        .ok_or_else(|| AppError::NotFound("Run not found".to_string()))?;

    if run.status != RunStatus::Completed {
        return Err(AppError::InvalidInput(
            "Run is not completed yet".to_string(),
        ));
    }
    let report = run.final_report.as_deref().ok_or_else(|| {
        AppError::InvalidInput("No report available for this run".to_string())
    })?;

    let message = payload.message.trim();
    if message.is_empty() {
        return Err(AppError::InvalidInput(
            "Message cannot be empty".to_string(),
        ));
    }

    let user = state
        .store
        .get_user_by_id(&claims.sub)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    // Prior exchanges ground the model before the new question
    let history: Vec<(String, String)> = state
        .store
        .list_follow_ups(&run_id)
        .await?
        .into_iter()
        .map(|m| (m.role, m.content))
        .collect();

    let llm = state.llm.follow_up(&user.api_key);
    let answer = ask_follow_up(&*llm, report, &history, message)
        .await
        .map_err(|e| AppError::Internal(format!("Agent error: {}", e)))?;

    // Persist the exchange only after the agent answered, so a failed
    // question leaves no half-written conversation behind.
    let user_message = state.store.add_follow_up(&run_id, "user", message).await?;
    let agent_message = state.store.add_follow_up(&run_id, "agent", &answer).await?;

    Ok(Json(FollowUpExchange {
        messages: vec![user_message.to_entry(), agent_message.to_entry()],
    }))
}

/// Get the follow-up conversation for a run
#[utoipa::path(
    get,
    path = "/api/research/{run_id}/chat",
    params(("run_id" = String, Path, description = "Run identifier")),
    responses(
        (status = 200, description = "Messages, oldest first", body = FollowUpExchange),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Run not found")
    ),
    tag = "chat",
    security(("bearer" = []))
)]
pub async fn list_follow_ups(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path(run_id): Path<String>,
) -> Result<Json<FollowUpExchange>> {
    state
        .store
        .get_run_for_user(&run_id, &claims.sub)
        .await?
        .ok_or_else(|| AppError::NotFound("Run not found".to_string()))?;

    let messages = state.store.list_follow_ups(&run_id).await?;

    Ok(Json(FollowUpExchange {
        messages: messages.iter().map(|m| m.to_entry()).collect(),
    }))
}
