use super::state::AppState;
use crate::presentation::handlers::{
    feed_handler, health_handler, interaction_handler, post_handler, search_handler,
    trending_handler,
};
use crate::shared::metrics::MetricsLayer;
use axum::http::header::HeaderName;
use axum::routing::{get, post};
use axum::Router;
use std::time::Duration;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultOnResponse, TraceLayer};
use tower_http::LatencyUnit;
use tracing::Level;

pub fn build_router(state: AppState, service_name: &'static str) -> Router {
    let router = Router::new()
        .route("/healthz", get(health_handler::healthz))
        .route("/metrics", get(health_handler::metrics_endpoint))
        .route("/v1/posts", post(post_handler::create_post))
        .route(
            "/v1/posts/:id",
            get(post_handler::get_post)
                .patch(post_handler::edit_post)
                .delete(post_handler::delete_post),
        )
        .route("/v1/posts/:id/metrics", get(post_handler::post_metrics))
        .route(
            "/v1/posts/:id/like",
            post(interaction_handler::like).delete(interaction_handler::unlike),
        )
        .route(
            "/v1/posts/:id/retweet",
            post(interaction_handler::retweet).delete(interaction_handler::unretweet),
        )
        .route(
            "/v1/posts/:id/bookmark",
            post(interaction_handler::bookmark).delete(interaction_handler::unbookmark),
        )
        .route(
            "/v1/posts/:id/block",
            post(interaction_handler::block).delete(interaction_handler::unblock),
        )
        .route("/v1/feed", get(feed_handler::get_feed))
        .route("/v1/bookmarks", get(feed_handler::list_bookmarks))
        .route("/v1/search/hashtags", get(search_handler::search_hashtags))
        .route("/v1/search/words", get(search_handler::search_words))
        .route("/v1/trending", get(trending_handler::trending_topics))
        .with_state(state);

    apply_standard_layers(router, service_name)
}

pub fn apply_standard_layers(router: Router, service_name: &'static str) -> Router {
    let trace = TraceLayer::new_for_http()
        .make_span_with(move |request: &axum::http::Request<_>| {
            let request_id = request
                .headers()
                .get("x-request-id")
                .and_then(|value| value.to_str().ok())
                .unwrap_or("-");
            tracing::info_span!(
                "http.request",
                service = service_name,
                method = %request.method(),
                uri = %request.uri(),
                request_id = %request_id
            )
        })
        .on_response(
            DefaultOnResponse::new()
                .level(Level::INFO)
                .latency_unit(LatencyUnit::Millis),
        );

    let request_id_header = HeaderName::from_static("x-request-id");

    router
        .layer(MetricsLayer::new(service_name))
        .layer(trace)
        .layer(TimeoutLayer::new(Duration::from_secs(30)))
        .layer(RequestBodyLimitLayer::new(256 * 1024))
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        .layer(SetRequestIdLayer::new(request_id_header, MakeRequestUuid))
}
