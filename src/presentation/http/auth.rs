use super::state::AppState;
use crate::domain::entities::Identity;
use crate::shared::AppError;
use axum::http::header::AUTHORIZATION;
use axum::http::HeaderMap;

/// Resolves the caller from `Authorization: Bearer <token>`.
pub async fn require_identity(state: &AppState, headers: &HeaderMap) -> Result<Identity, AppError> {
    let token = bearer_token(headers)?;
    state.identity.verify(token).await
}

fn bearer_token(headers: &HeaderMap) -> Result<&str, AppError> {
    let header = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("missing token".to_string()))?;
    let token = header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| AppError::Unauthorized("invalid token".to_string()))?;
    Ok(token)
}
