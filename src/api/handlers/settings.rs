use crate::{
    auth::middleware::AuthUser,
    types::{AppError, ChangeApiKeyRequest, ChangePasswordRequest, MessageResponse, Result},
    AppState,
};
use axum::{extract::State, Json};

/// Change the account password
#[utoipa::path(
    put,
    path = "/api/settings/password",
    request_body = ChangePasswordRequest,
    responses(
        (status = 200, description = "Password updated", body = MessageResponse),
        (status = 400, description = "Invalid input"),
        (status = 401, description = "Current password is incorrect")
    ),
    tag = "settings",
    security(("bearer" = []))
)]
pub async fn change_password(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Json(payload): Json<ChangePasswordRequest>,
) -> Result<Json<MessageResponse>> {
    // Validate input
    if payload.old_password.is_empty()
        || payload.new_password.is_empty()
        || payload.confirm_password.is_empty()
    {
        return Err(AppError::InvalidInput(
            "All password fields are required".to_string(),
        ));
    }
    if payload.new_password.chars().count() < 8 {
        return Err(AppError::InvalidInput(
            "New password must be at least 8 characters".to_string(),
        ));
    }
    if payload.new_password != payload.confirm_password {
        return Err(AppError::InvalidInput(
            "New passwords do not match".to_string(),
        ));
    }

    let user = state
        .store
        .get_user_by_id(&claims.sub)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    // The old password must check out before anything changes
    if !state
        .auth_service
        .verify_password(&payload.old_password, &user.password_hash)?
    {
        return Err(AppError::Auth(
            "Current password is incorrect".to_string(),
        ));
    }

    let password_hash = state.auth_service.hash_password(&payload.new_password)?;
    state
        .store
        .update_user_password(&user.id, &password_hash)
        .await?;

    Ok(Json(MessageResponse {
        message: "Password updated successfully".to_string(),
    }))
}

/// Replace the stored model API key
#[utoipa::path(
    put,
    path = "/api/settings/api-key",
    request_body = ChangeApiKeyRequest,
    responses(
        (status = 200, description = "API key updated", body = MessageResponse),
        (status = 400, description = "Invalid input"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "settings",
    security(("bearer" = []))
)]
pub async fn change_api_key(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Json(payload): Json<ChangeApiKeyRequest>,
) -> Result<Json<MessageResponse>> {
    let api_key = payload.api_key.trim();
    if api_key.is_empty() {
        return Err(AppError::InvalidInput(
            "API key cannot be empty".to_string(),
        ));
    }

    let user = state
        .store
        .get_user_by_id(&claims.sub)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    state.store.update_user_api_key(&user.id, api_key).await?;

    Ok(Json(MessageResponse {
        message: "API key updated successfully".to_string(),
    }))
}
