use axum::extract::MatchedPath;
use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use axum::response::IntoResponse;
use prometheus::core::Collector;
use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounterVec, IntGaugeVec, Opts, Registry, TextEncoder,
};
use std::future::Future;
use std::pin::Pin;
use std::sync::OnceLock;
use std::task::{Context, Poll};
use std::time::{Duration, Instant};
use tower::{Layer, Service};

struct Metrics {
    registry: Registry,
    up: IntGaugeVec,
    http_requests_total: IntCounterVec,
    http_request_duration_seconds: HistogramVec,
    feed_pages_total: IntCounterVec,
    interactions_total: IntCounterVec,
    trending_refresh_total: IntCounterVec,
}

pub const TRENDING_REFRESH_SUCCESS: &str = "success";
pub const TRENDING_REFRESH_ERROR: &str = "error";

static METRICS: OnceLock<Metrics> = OnceLock::new();

const LATENCY_BUCKETS: [f64; 11] = [
    0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
];
const HTTP_LABELS: [&str; 4] = ["service", "route", "method", "status"];

fn register<C>(registry: &Registry, collector: prometheus::Result<C>) -> C
where
    C: Collector + Clone + 'static,
{
    let collector = collector.expect("metric definition is valid");
    registry
        .register(Box::new(collector.clone()))
        .expect("metric names are unique");
    collector
}

fn counter(registry: &Registry, name: &str, help: &str, labels: &[&str]) -> IntCounterVec {
    register(registry, IntCounterVec::new(Opts::new(name, help), labels))
}

fn metrics() -> &'static Metrics {
    METRICS.get_or_init(|| {
        let registry = Registry::new();
        let up = register(
            &registry,
            IntGaugeVec::new(Opts::new("feedline_up", "Service health"), &["service"]),
        );
        let http_request_duration_seconds = register(
            &registry,
            HistogramVec::new(
                HistogramOpts::new(
                    "feedline_http_request_duration_seconds",
                    "HTTP request duration in seconds",
                )
                .buckets(LATENCY_BUCKETS.to_vec()),
                &HTTP_LABELS,
            ),
        );

        Metrics {
            up,
            http_requests_total: counter(
                &registry,
                "feedline_http_requests_total",
                "HTTP request count",
                &HTTP_LABELS,
            ),
            http_request_duration_seconds,
            feed_pages_total: counter(
                &registry,
                "feedline_feed_pages_total",
                "Feed and search pages served",
                &["kind"],
            ),
            interactions_total: counter(
                &registry,
                "feedline_interactions_total",
                "Successful like, retweet, bookmark and block mutations",
                &["action"],
            ),
            trending_refresh_total: counter(
                &registry,
                "feedline_trending_refresh_total",
                "Trending snapshot recomputations",
                &["result"],
            ),
            registry,
        }
    })
}

pub fn init(service_name: &'static str) {
    metrics().up.with_label_values(&[service_name]).set(1);
}

pub fn record_http_request(
    service_name: &'static str,
    method: &str,
    route: &str,
    status: u16,
    duration: Duration,
) {
    let status_str = status.to_string();
    let labels = &[service_name, route, method, status_str.as_str()];
    let metrics = metrics();
    metrics.http_requests_total.with_label_values(labels).inc();
    metrics
        .http_request_duration_seconds
        .with_label_values(labels)
        .observe(duration.as_secs_f64());
}

pub fn inc_feed_page(kind: &str) {
    metrics().feed_pages_total.with_label_values(&[kind]).inc();
}

pub fn inc_interaction(action: &str) {
    metrics()
        .interactions_total
        .with_label_values(&[action])
        .inc();
}

pub fn inc_trending_refresh(result: &str) {
    metrics()
        .trending_refresh_total
        .with_label_values(&[result])
        .inc();
}

pub fn metrics_response(service_name: &'static str) -> impl IntoResponse {
    init(service_name);
    let metric_families = metrics().registry.gather();
    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();
    if encoder.encode(&metric_families, &mut buffer).is_err() {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            HeaderMap::new(),
            "failed to encode metrics".to_string(),
        );
    }

    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/plain; version=0.0.4"),
    );
    (
        StatusCode::OK,
        headers,
        String::from_utf8_lossy(&buffer).to_string(),
    )
}

#[derive(Clone)]
pub struct MetricsLayer {
    service_name: &'static str,
}

impl MetricsLayer {
    pub fn new(service_name: &'static str) -> Self {
        Self { service_name }
    }
}

#[derive(Clone)]
pub struct MetricsService<S> {
    inner: S,
    service_name: &'static str,
}

impl<S> Layer<S> for MetricsLayer {
    type Service = MetricsService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        MetricsService {
            inner,
            service_name: self.service_name,
        }
    }
}

impl<S, ReqBody, ResBody> Service<axum::http::Request<ReqBody>> for MetricsService<S>
where
    S: Service<axum::http::Request<ReqBody>, Response = axum::response::Response<ResBody>>
        + Send
        + 'static,
    S::Future: Send + 'static,
    S::Error: Send + 'static,
    ResBody: Send + 'static,
{
    type Response = axum::response::Response<ResBody>;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: axum::http::Request<ReqBody>) -> Self::Future {
        let service_name = self.service_name;
        let method = request.method().to_string();
        // matched route keeps label cardinality bounded (no raw post ids)
        let route = request
            .extensions()
            .get::<MatchedPath>()
            .map(|path| path.as_str().to_string())
            .unwrap_or_else(|| "unmatched".to_string());
        let start = Instant::now();
        let fut = self.inner.call(request);
        Box::pin(async move {
            let response = fut.await?;
            record_http_request(
                service_name,
                &method,
                &route,
                response.status().as_u16(),
                start.elapsed(),
            );
            Ok(response)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metrics_response_sets_content_type() {
        let response = metrics_response("feedline-test").into_response();
        assert_eq!(response.status(), StatusCode::OK);
        let content_type = response.headers().get(header::CONTENT_TYPE).unwrap();
        assert_eq!(content_type, "text/plain; version=0.0.4");
    }

    #[test]
    fn counters_are_exported() {
        inc_feed_page("following");
        inc_interaction("like");
        let families = metrics().registry.gather();
        let names: Vec<&str> = families.iter().map(|f| f.get_name()).collect();
        assert!(names.contains(&"feedline_feed_pages_total"));
        assert!(names.contains(&"feedline_interactions_total"));
    }
}
