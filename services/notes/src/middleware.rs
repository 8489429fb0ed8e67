//! Authentication middleware for JWT token validation

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};
use tracing::{debug, warn};

use crate::{error::ApiError, state::AppState};

/// Authenticated user information, taken from verified token claims
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub id: i64,
    pub name: String,
    pub email: String,
}

/// Authentication middleware
///
/// Rejects the request with 401 unless it carries a valid bearer token.
/// On success the caller's identity is available to handlers as
/// `Extension<AuthUser>`.
pub async fn auth_middleware(
    State(state): State<AppState>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let Some(TypedHeader(Authorization(bearer))) = bearer else {
        debug!("Rejected request without bearer token: {}", req.uri());
        return Err(ApiError::Unauthorized);
    };

    let claims = state
        .jwt_service
        .validate_token(bearer.token())
        .map_err(|e| {
            warn!("Failed to validate token: {}", e);
            ApiError::Unauthorized
        })?;

    let id = claims.user_id().ok_or_else(|| {
        warn!("Token subject is not a user id: {}", claims.sub);
        ApiError::Unauthorized
    })?;

    let user = AuthUser {
        id,
        name: claims.name,
        email: claims.email,
    };

    req.extensions_mut().insert(user);

    Ok(next.run(req).await)
}
