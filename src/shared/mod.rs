pub mod config;
pub mod error;
pub mod logging;
pub mod metrics;

pub use config::{AppConfig, FeedConfig, TrendingConfig};
pub use error::{AppError, Result};
