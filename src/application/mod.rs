pub mod ports;
pub mod services;

pub use services::{FeedService, InteractionService, PostService, SearchService, TrendingService};
