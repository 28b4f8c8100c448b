use crate::{
    types::{AppError, LoginRequest, LoginResponse, MessageResponse, Result, SignupRequest},
    AppState,
};
use axum::{extract::State, http::StatusCode, Json};

/// Create a new account
#[utoipa::path(
    post,
    path = "/api/signup",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "Account created", body = MessageResponse),
        (status = 400, description = "Invalid input"),
        (status = 409, description = "Username already taken")
    ),
    tag = "auth"
)]
pub async fn signup(
    State(state): State<AppState>,
    Json(payload): Json<SignupRequest>,
) -> Result<(StatusCode, Json<MessageResponse>)> {
    // Validate input
    let username = payload.username.trim();
    if username.chars().count() < 3 {
        return Err(AppError::InvalidInput(
            "Username must be at least 3 characters".to_string(),
        ));
    }
    if username.chars().count() > 80 {
        return Err(AppError::InvalidInput(
            "Username must be 80 characters or fewer".to_string(),
        ));
    }
    if payload.password.chars().count() < 8 {
        return Err(AppError::InvalidInput(
            "Password must be at least 8 characters".to_string(),
        ));
    }
    let api_key = payload.api_key.trim();
    if api_key.is_empty() {
        return Err(AppError::InvalidInput(
            "API key cannot be empty".to_string(),
        ));
    }
    if payload.password != payload.confirm_password {
        return Err(AppError::InvalidInput(
            "Passwords do not match".to_string(),
        ));
    }

    // Check if the username is taken
    if state.store.get_user_by_username(username).await?.is_some() {
        return Err(AppError::Conflict("Username already taken".to_string()));
    }

    // Hash password and create user
    let password_hash = state.auth_service.hash_password(&payload.password)?;
    state
        .store
        .create_user(username, &password_hash, api_key)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: "Account created successfully".to_string(),
        }),
    ))
}

/// Login with username and password
#[utoipa::path(
    post,
    path = "/api/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 400, description = "Invalid input"),
        (status = 401, description = "Invalid credentials")
    ),
    tag = "auth"
)]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>> {
    // Validate input
    let username = payload.username.trim();
    if username.is_empty() {
        return Err(AppError::InvalidInput(
            "Username cannot be empty".to_string(),
        ));
    }
    if payload.password.is_empty() {
        return Err(AppError::InvalidInput(
            "Password cannot be empty".to_string(),
        ));
    }

    // Get user. A missing user and a wrong password produce the same
    // error, so login probes cannot enumerate usernames.
    let user = state
        .store
        .get_user_by_username(username)
        .await?
        .ok_or_else(|| AppError::Auth("Invalid username or password".to_string()))?;

    // Verify password
    if !state
        .auth_service
        .verify_password(&payload.password, &user.password_hash)?
    {
        return Err(AppError::Auth("Invalid username or password".to_string()));
    }

    // Generate token
    let access_token = state.auth_service.generate_token(&user.id, &user.username)?;

    Ok(Json(LoginResponse {
        access_token,
        user: user.to_profile(),
    }))
}
