pub mod trending_refresh_job;

pub use trending_refresh_job::TrendingRefreshJob;
