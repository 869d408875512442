pub mod cache;
pub mod event_publisher;
pub mod notifier;
pub mod repositories;
pub mod user_service;

pub use cache::TrendingCache;
pub use event_publisher::{ContentEvent, EventPublisher};
pub use notifier::{Notification, Notifier};
pub use repositories::{BookmarkRepository, InteractionRepository, PostRepository, TrendingSource};
pub use user_service::{FollowGraph, FollowingPage, IdentityVerifier, UserDirectory};
