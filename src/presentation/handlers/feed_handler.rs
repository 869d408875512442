use crate::presentation::dto::{FeedItemDto, FeedQuery, PageEnvelope, PageQuery};
use crate::presentation::http::auth::require_identity;
use crate::presentation::http::{ApiResult, AppState};
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::Json;

pub async fn get_feed(
    State(state): State<AppState>,
    headers: HeaderMap,
    query: Result<Query<FeedQuery>, QueryRejection>,
) -> ApiResult<Json<PageEnvelope<FeedItemDto>>> {
    let identity = require_identity(&state, &headers).await?;
    let Query(query) = query?;
    let request = query.into_request()?;

    let page = state.feeds.get_feed(&identity, request).await?;
    Ok(Json(PageEnvelope::from_page(page)))
}

pub async fn list_bookmarks(
    State(state): State<AppState>,
    headers: HeaderMap,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> ApiResult<Json<PageEnvelope<FeedItemDto>>> {
    let identity = require_identity(&state, &headers).await?;
    let Query(query) = query?;

    let page = state
        .feeds
        .list_bookmarks(&identity, query.skip, query.limit)
        .await?;
    Ok(Json(PageEnvelope::from_page(page)))
}
