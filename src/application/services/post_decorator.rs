use crate::application::ports::repositories::InteractionRepository;
use crate::application::ports::user_service::UserDirectory;
use crate::domain::entities::{AuthorInfo, Post};
use crate::domain::value_objects::Page;
use crate::shared::error::AppError;
use futures::future::try_join_all;
use std::collections::HashMap;
use std::sync::Arc;

/// A post as served to a reader: author display info plus the reader's own
/// like/retweet state.
#[derive(Debug, Clone, PartialEq)]
pub struct DecoratedPost {
    pub post: Post,
    pub author: AuthorInfo,
    pub retweet_author: Option<AuthorInfo>,
    pub liked: bool,
    pub retweeted: bool,
}

pub struct PostDecorator {
    user_directory: Arc<dyn UserDirectory>,
    interactions: Arc<dyn InteractionRepository>,
}

impl PostDecorator {
    pub fn new(
        user_directory: Arc<dyn UserDirectory>,
        interactions: Arc<dyn InteractionRepository>,
    ) -> Self {
        Self {
            user_directory,
            interactions,
        }
    }

    /// Resolves every distinct author once. Any failed lookup fails the whole
    /// batch.
    pub async fn decorate(
        &self,
        asker_id: &str,
        posts: Vec<Post>,
    ) -> Result<Vec<DecoratedPost>, AppError> {
        if posts.is_empty() {
            return Ok(Vec::new());
        }

        let mut user_ids: Vec<&str> = Vec::new();
        for post in &posts {
            for id in std::iter::once(post.author_id.as_str())
                .chain(post.retweet_author_id.as_deref())
            {
                if !user_ids.contains(&id) {
                    user_ids.push(id);
                }
            }
        }
        let infos = try_join_all(
            user_ids
                .iter()
                .map(|id| self.user_directory.author_info(id)),
        )
        .await?;
        let authors: HashMap<&str, AuthorInfo> = user_ids.iter().copied().zip(infos).collect();

        let mut canonical_ids: Vec<String> = posts
            .iter()
            .map(|post| post.canonical_id().to_string())
            .collect();
        canonical_ids.sort();
        canonical_ids.dedup();
        let liked = self
            .interactions
            .liked_post_ids(asker_id, &canonical_ids)
            .await?;
        let retweeted = self
            .interactions
            .retweeted_post_ids(asker_id, &canonical_ids)
            .await?;

        let mut decorated = Vec::with_capacity(posts.len());
        for post in &posts {
            let author = lookup(&authors, &post.author_id)?;
            let retweet_author = match post.retweet_author_id.as_deref() {
                Some(id) => Some(lookup(&authors, id)?),
                None => None,
            };
            decorated.push(DecoratedPost {
                liked: liked.contains(post.canonical_id()),
                retweeted: retweeted.contains(post.canonical_id()),
                post: post.clone(),
                author,
                retweet_author,
            });
        }
        Ok(decorated)
    }

    pub async fn decorate_page(
        &self,
        asker_id: &str,
        page: Page<Post>,
    ) -> Result<Page<DecoratedPost>, AppError> {
        let (items, page) = page.take_items();
        let decorated = self.decorate(asker_id, items).await?;
        Ok(page.map_items(decorated))
    }

    pub async fn decorate_one(&self, asker_id: &str, post: Post) -> Result<DecoratedPost, AppError> {
        self.decorate(asker_id, vec![post])
            .await?
            .pop()
            .ok_or_else(|| AppError::Internal("decoration produced no post".to_string()))
    }
}

fn lookup(authors: &HashMap<&str, AuthorInfo>, id: &str) -> Result<AuthorInfo, AppError> {
    authors
        .get(id)
        .cloned()
        .ok_or_else(|| AppError::Internal(format!("author {id} was not resolved")))
}
