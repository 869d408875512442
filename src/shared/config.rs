use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub feed: FeedConfig,
    pub trending: TrendingConfig,
    pub upstream: UpstreamConfig,
    pub queue: QueueConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub addr: SocketAddr,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FeedConfig {
    pub default_limit: u32,
    pub max_limit: u32,
    pub max_content_chars: usize,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TrendingConfig {
    pub enabled: bool,
    pub top_n: usize,
    pub decay_rate: f64,
    pub refresh_interval_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    pub user_service_url: String,
    #[serde(default)]
    pub notification_service_url: Option<String>,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueConfig {
    #[serde(default)]
    pub amqp_url: Option<String>,
    pub exchange: String,
    pub routing_key: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            },
            database: DatabaseConfig {
                url: "sqlite:data/feedline.db?mode=rwc".to_string(),
                max_connections: 5,
            },
            feed: FeedConfig::default(),
            trending: TrendingConfig::default(),
            upstream: UpstreamConfig {
                user_service_url: "http://localhost:8081".to_string(),
                notification_service_url: None,
                timeout_secs: 10,
            },
            queue: QueueConfig {
                amqp_url: None,
                exchange: "feedline".to_string(),
                routing_key: "content.created".to_string(),
            },
        }
    }
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            default_limit: 10,
            max_limit: 30,
            max_content_chars: 280,
        }
    }
}

impl Default for TrendingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            top_n: 20,
            decay_rate: 0.1,
            refresh_interval_secs: 300, // 5 minutes
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let mut cfg = Self::default();

        if let Some(addr) = env_value("FEEDLINE_ADDR").and_then(|v| v.parse().ok()) {
            cfg.server.addr = addr;
        }

        if let Some(url) = env_value("DATABASE_URL") {
            cfg.database.url = url;
        }
        if let Some(value) = env_value("FEEDLINE_DB_MAX_CONNECTIONS").and_then(|v| parse_u32(&v)) {
            cfg.database.max_connections = value;
        }

        if let Some(value) = env_value("FEEDLINE_FEED_DEFAULT_LIMIT").and_then(|v| parse_u32(&v)) {
            cfg.feed.default_limit = value;
        }
        if let Some(value) = env_value("FEEDLINE_FEED_MAX_LIMIT").and_then(|v| parse_u32(&v)) {
            cfg.feed.max_limit = value;
        }

        if let Some(v) = env_value("FEEDLINE_TRENDING_ENABLED") {
            cfg.trending.enabled = parse_bool(&v, cfg.trending.enabled);
        }
        if let Some(value) = env_value("FEEDLINE_TRENDING_TOP_N").and_then(|v| parse_u64(&v)) {
            cfg.trending.top_n = value as usize;
        }
        if let Some(value) = env_value("FEEDLINE_TRENDING_DECAY_RATE").and_then(|v| parse_f64(&v)) {
            cfg.trending.decay_rate = value;
        }
        if let Some(value) =
            env_value("FEEDLINE_TRENDING_REFRESH_SECS").and_then(|v| parse_u64(&v))
        {
            cfg.trending.refresh_interval_secs = value.max(1);
        }

        if let Some(url) = env_value("FEEDLINE_USER_SERVICE_URL") {
            cfg.upstream.user_service_url = url;
        }
        cfg.upstream.notification_service_url = env_value("FEEDLINE_NOTIFICATION_SERVICE_URL");
        if let Some(value) = env_value("FEEDLINE_UPSTREAM_TIMEOUT_SECS").and_then(|v| parse_u64(&v))
        {
            cfg.upstream.timeout_secs = value.max(1);
        }

        cfg.queue.amqp_url = env_value("FEEDLINE_AMQP_URL");
        if let Some(exchange) = env_value("FEEDLINE_AMQP_EXCHANGE") {
            cfg.queue.exchange = exchange;
        }
        if let Some(key) = env_value("FEEDLINE_AMQP_ROUTING_KEY") {
            cfg.queue.routing_key = key;
        }

        cfg
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.database.max_connections == 0 {
            return Err("Database max_connections must be greater than 0".to_string());
        }
        if self.feed.max_limit == 0 {
            return Err("Feed max_limit must be greater than 0".to_string());
        }
        if self.feed.default_limit == 0 || self.feed.default_limit > self.feed.max_limit {
            return Err("Feed default_limit must be between 1 and max_limit".to_string());
        }
        if self.feed.max_content_chars == 0 {
            return Err("Feed max_content_chars must be greater than 0".to_string());
        }
        if self.trending.top_n == 0 {
            return Err("Trending top_n must be greater than 0".to_string());
        }
        if !self.trending.decay_rate.is_finite() || self.trending.decay_rate < 0.0 {
            return Err("Trending decay_rate must be a non-negative number".to_string());
        }
        if self.upstream.user_service_url.trim().is_empty() {
            return Err("User service url must not be empty".to_string());
        }
        Ok(())
    }
}

fn env_value(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_bool(s: &str, default: bool) -> bool {
    match s.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => true,
        "0" | "false" | "no" | "off" => false,
        _ => default,
    }
}

fn parse_u32(value: &str) -> Option<u32> {
    value.trim().parse::<u32>().ok()
}

fn parse_u64(value: &str) -> Option<u64> {
    value.trim().parse::<u64>().ok()
}

fn parse_f64(value: &str) -> Option<f64> {
    value.trim().parse::<f64>().ok()
}
