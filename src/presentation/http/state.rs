use crate::application::ports::IdentityVerifier;
use crate::application::{
    FeedService, InteractionService, PostService, SearchService, TrendingService,
};
use crate::infrastructure::database::SqliteRepository;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub posts: Arc<PostService>,
    pub feeds: Arc<FeedService>,
    pub search: Arc<SearchService>,
    pub trending: Arc<TrendingService>,
    pub interactions: Arc<InteractionService>,
    pub identity: Arc<dyn IdentityVerifier>,
    pub repository: Arc<SqliteRepository>,
}
