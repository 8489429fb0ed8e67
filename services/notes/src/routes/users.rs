//! User listing

use axum::{Json, extract::State, response::IntoResponse};

use crate::{AppState, error::ApiResult, models::UserResponse};

/// Every registered user, public fields only
pub async fn list_users(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let users: Vec<UserResponse> = state
        .user_repository
        .list()
        .await?
        .iter()
        .map(UserResponse::from)
        .collect();

    Ok(Json(users))
}
