use crate::presentation::dto::PostDto;
use crate::presentation::http::auth::require_identity;
use crate::presentation::http::{ApiResult, AppState};
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;

pub async fn like(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(post_id): Path<String>,
) -> ApiResult<StatusCode> {
    let identity = require_identity(&state, &headers).await?;
    state.interactions.like(&identity, &post_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn unlike(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(post_id): Path<String>,
) -> ApiResult<StatusCode> {
    let identity = require_identity(&state, &headers).await?;
    state.interactions.unlike(&identity, &post_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn retweet(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(post_id): Path<String>,
) -> ApiResult<(StatusCode, Json<PostDto>)> {
    let identity = require_identity(&state, &headers).await?;
    let row = state.interactions.retweet(&identity, &post_id).await?;
    Ok((StatusCode::CREATED, Json(row.into())))
}

pub async fn unretweet(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(post_id): Path<String>,
) -> ApiResult<StatusCode> {
    let identity = require_identity(&state, &headers).await?;
    state.interactions.unretweet(&identity, &post_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn bookmark(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(post_id): Path<String>,
) -> ApiResult<StatusCode> {
    let identity = require_identity(&state, &headers).await?;
    state.interactions.bookmark(&identity, &post_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn unbookmark(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(post_id): Path<String>,
) -> ApiResult<StatusCode> {
    let identity = require_identity(&state, &headers).await?;
    state.interactions.unbookmark(&identity, &post_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn block(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(post_id): Path<String>,
) -> ApiResult<StatusCode> {
    let identity = require_identity(&state, &headers).await?;
    state.interactions.block(&identity, &post_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn unblock(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(post_id): Path<String>,
) -> ApiResult<StatusCode> {
    let identity = require_identity(&state, &headers).await?;
    state.interactions.unblock(&identity, &post_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
