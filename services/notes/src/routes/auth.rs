//! Registration and login

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use tracing::{debug, error, info, warn};

use crate::{
    AppState,
    error::{ApiError, ApiResult},
    models::{
        AuthResponse, LoginRequest, NewUser, RegisterRequest, RegisterResponse, Role,
        UserResponse,
    },
    password::{hash_password_blocking, verify_password_blocking},
    validation::{
        normalize_email, validate_email, validate_login, validate_name, validate_password,
    },
};

/// User registration endpoint
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> ApiResult<impl IntoResponse> {
    let email = normalize_email(&payload.email);

    validate_name(&payload.name).map_err(ApiError::Validation)?;
    validate_email(&email).map_err(ApiError::Validation)?;
    validate_password(&payload.password).map_err(ApiError::Validation)?;

    debug!("Registration attempt for email: {}", email);

    // Fast path only; the unique index decides races below
    if state.user_repository.find_by_email(&email).await?.is_some() {
        return Err(ApiError::DuplicateEmail);
    }

    let password_hash = hash_password_blocking(payload.password)
        .await
        .map_err(|e| {
            error!("Failed to hash password: {}", e);
            ApiError::InternalServerError
        })?;

    let new_user = NewUser {
        name: payload.name.trim().to_string(),
        email,
        password_hash,
        role: Role::default(),
    };

    let user = state
        .user_repository
        .create(&new_user)
        .await
        .map_err(|e| {
            if e.is_unique_violation() {
                ApiError::DuplicateEmail
            } else {
                ApiError::Database(e)
            }
        })?;

    info!("Registered user {}", user.id);

    let response = RegisterResponse {
        message: "User registered successfully".to_string(),
        user: UserResponse::from(&user),
    };

    Ok((StatusCode::CREATED, Json(response)))
}

/// User login endpoint
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> ApiResult<impl IntoResponse> {
    validate_login(&payload.email, &payload.password).map_err(ApiError::Validation)?;

    let email = normalize_email(&payload.email);
    debug!("Login attempt for email: {}", email);

    let Some(user) = state.user_repository.find_by_email(&email).await? else {
        info!("Login rejected: unknown email");
        return Err(ApiError::InvalidCredentials);
    };

    match verify_password_blocking(payload.password, user.password_hash.clone()).await {
        Ok(true) => {}
        Ok(false) => {
            info!("Login rejected: wrong password for user {}", user.id);
            return Err(ApiError::InvalidCredentials);
        }
        Err(e) => {
            warn!("Password verification failed for user {}: {}", user.id, e);
            return Err(ApiError::InvalidCredentials);
        }
    }

    let issued = state.jwt_service.issue(&user).map_err(|e| {
        error!("Failed to generate access token: {}", e);
        ApiError::InternalServerError
    })?;

    let response = AuthResponse {
        message: "Login successful".to_string(),
        token: issued.token,
        token_type: "Bearer".to_string(),
        expires_in: issued.expires_in,
        user: UserResponse::from(&user),
    };

    Ok((StatusCode::OK, Json(response)))
}
