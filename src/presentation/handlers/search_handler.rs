use crate::presentation::dto::query_dto::parse_from_time;
use crate::presentation::dto::{FeedItemDto, HashtagQuery, PageEnvelope, WordQuery};
use crate::presentation::http::auth::require_identity;
use crate::presentation::http::{ApiResult, AppState};
use crate::shared::metrics;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::Json;

pub async fn search_hashtags(
    State(state): State<AppState>,
    headers: HeaderMap,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> ApiResult<Json<PageEnvelope<FeedItemDto>>> {
    let identity = require_identity(&state, &headers).await?;
    let Query(pairs) = query?;
    let query = HashtagQuery::from_pairs(pairs)?;
    let from_time = parse_from_time(query.from_time.as_deref())?;

    let page = state
        .search
        .search_hashtags(&identity, query.tags, from_time, query.skip, query.limit)
        .await?;
    metrics::inc_feed_page("search_hashtags");
    Ok(Json(PageEnvelope::from_page(page)))
}

pub async fn search_words(
    State(state): State<AppState>,
    headers: HeaderMap,
    query: Result<Query<WordQuery>, QueryRejection>,
) -> ApiResult<Json<PageEnvelope<FeedItemDto>>> {
    let identity = require_identity(&state, &headers).await?;
    let Query(query) = query?;
    let from_time = parse_from_time(query.from_time.as_deref())?;

    let page = state
        .search
        .search_words(&identity, &query.words, from_time, query.skip, query.limit)
        .await?;
    metrics::inc_feed_page("search_words");
    Ok(Json(PageEnvelope::from_page(page)))
}
