use crate::application::ports::notifier::{Notification, Notifier};
use crate::shared::error::AppError;
use async_trait::async_trait;
use std::time::Duration;

pub struct HttpNotifier {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpNotifier {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, AppError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: format!("{}/v1/notifications", base_url.trim_end_matches('/')),
        })
    }
}

#[async_trait]
impl Notifier for HttpNotifier {
    async fn notify(&self, notification: &Notification) -> Result<(), AppError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(notification)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            tracing::warn!(
                recipient_id = %notification.recipient_id,
                %status,
                "notification dispatch failed"
            );
            return Err(AppError::UpstreamFailure(format!(
                "notification service returned {status}"
            )));
        }
        Ok(())
    }
}

/// Used when no notification service is configured.
pub struct NoopNotifier;

#[async_trait]
impl Notifier for NoopNotifier {
    async fn notify(&self, notification: &Notification) -> Result<(), AppError> {
        tracing::debug!(
            recipient_id = %notification.recipient_id,
            "notification service not configured; skipping"
        );
        Ok(())
    }
}
