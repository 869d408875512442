use crate::application::ports::user_service::{
    FollowGraph, FollowingPage, IdentityVerifier, UserDirectory,
};
use crate::domain::entities::{AuthorInfo, Identity};
use crate::shared::error::AppError;
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Serialize)]
struct VerifyRequest<'a> {
    token: &'a str,
}

#[derive(Deserialize)]
struct VerifyResponse {
    user_id: String,
    #[serde(default)]
    is_admin: bool,
}

#[derive(Deserialize)]
struct InterestsResponse {
    #[serde(default)]
    tags: Vec<String>,
}

/// HTTP client for the user service: token verification, the follow graph and
/// profile lookups.
#[derive(Clone)]
pub struct UserServiceClient {
    client: reqwest::Client,
    base_url: String,
}

impl UserServiceClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, AppError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, AppError> {
        let response = self.client.get(self.url(path)).query(query).send().await?;
        let status = response.status();
        if !status.is_success() {
            tracing::warn!(path, %status, "user service request failed");
            return Err(AppError::UpstreamFailure(format!(
                "user service returned {status} for {path}"
            )));
        }
        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl IdentityVerifier for UserServiceClient {
    async fn verify(&self, token: &str) -> Result<Identity, AppError> {
        let response = self
            .client
            .post(self.url("/v1/auth/verify"))
            .json(&VerifyRequest { token })
            .send()
            .await?;

        match response.status() {
            status if status.is_success() => {
                let body: VerifyResponse = response.json().await?;
                Ok(Identity::new(body.user_id, body.is_admin))
            }
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                Err(AppError::Unauthorized("invalid token".to_string()))
            }
            status => {
                tracing::warn!(%status, "token verification failed");
                Err(AppError::UpstreamFailure(format!(
                    "token verification returned {status}"
                )))
            }
        }
    }
}

#[async_trait]
impl FollowGraph for UserServiceClient {
    async fn following_page(
        &self,
        user_id: &str,
        offset: u32,
        limit: u32,
    ) -> Result<FollowingPage, AppError> {
        self.get_json(
            &format!("/v1/users/{user_id}/following"),
            &[("offset", offset.to_string()), ("limit", limit.to_string())],
        )
        .await
    }
}

#[async_trait]
impl UserDirectory for UserServiceClient {
    async fn author_info(&self, user_id: &str) -> Result<AuthorInfo, AppError> {
        self.get_json(&format!("/v1/users/{user_id}"), &[]).await
    }

    async fn interest_tags(&self, user_id: &str) -> Result<Vec<String>, AppError> {
        let body: InterestsResponse = self
            .get_json(&format!("/v1/users/{user_id}/interests"), &[])
            .await?;
        Ok(body.tags)
    }
}
