pub mod trending_cache;

pub use trending_cache::TrendingCacheService;
