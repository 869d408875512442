use crate::domain::entities::{AuthorInfo, Identity};
use crate::shared::error::AppError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FollowingPage {
    pub ids: Vec<String>,
    #[serde(default)]
    pub next_offset: Option<u32>,
}

#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    /// Resolves a bearer token. Invalid tokens yield [`AppError::Unauthorized`].
    async fn verify(&self, token: &str) -> Result<Identity, AppError>;
}

#[async_trait]
pub trait FollowGraph: Send + Sync {
    async fn following_page(
        &self,
        user_id: &str,
        offset: u32,
        limit: u32,
    ) -> Result<FollowingPage, AppError>;
}

#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn author_info(&self, user_id: &str) -> Result<AuthorInfo, AppError>;
    async fn interest_tags(&self, user_id: &str) -> Result<Vec<String>, AppError>;
}
