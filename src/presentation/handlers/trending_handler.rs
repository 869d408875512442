use crate::presentation::dto::TrendingResponse;
use crate::presentation::http::auth::require_identity;
use crate::presentation::http::{ApiResult, AppState};
use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;

pub async fn trending_topics(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<TrendingResponse>> {
    require_identity(&state, &headers).await?;
    let ranked = state.trending.trending_topics().await?;
    Ok(Json(ranked.into()))
}
