use crate::application::services::PostMetrics;
use crate::presentation::dto::{CreatePostRequest, EditPostRequest, FeedItemDto, PostDto, Validate};
use crate::presentation::http::auth::require_identity;
use crate::presentation::http::{ApiResult, AppState};
use crate::shared::AppError;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;

pub async fn create_post(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<CreatePostRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<PostDto>)> {
    let identity = require_identity(&state, &headers).await?;
    let Json(request) = payload?;
    request.validate().map_err(AppError::ValidationFailed)?;

    let post = state.posts.create_post(&identity, request.into()).await?;
    Ok((StatusCode::CREATED, Json(post.into())))
}

pub async fn get_post(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(post_id): Path<String>,
) -> ApiResult<Json<FeedItemDto>> {
    let identity = require_identity(&state, &headers).await?;
    let post = state.posts.get_post(&identity, &post_id).await?;
    Ok(Json(post.into()))
}

pub async fn edit_post(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(post_id): Path<String>,
    payload: Result<Json<EditPostRequest>, JsonRejection>,
) -> ApiResult<Json<PostDto>> {
    let identity = require_identity(&state, &headers).await?;
    let Json(request) = payload?;
    request.validate().map_err(AppError::ValidationFailed)?;

    let post = state
        .posts
        .edit_post(&identity, &post_id, request.into())
        .await?;
    Ok(Json(post.into()))
}

pub async fn delete_post(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(post_id): Path<String>,
) -> ApiResult<StatusCode> {
    let identity = require_identity(&state, &headers).await?;
    state.posts.delete_post(&identity, &post_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn post_metrics(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(post_id): Path<String>,
) -> ApiResult<Json<PostMetrics>> {
    let identity = require_identity(&state, &headers).await?;
    let metrics = state.posts.post_metrics(&identity, &post_id).await?;
    Ok(Json(metrics))
}
