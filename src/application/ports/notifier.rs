use crate::shared::error::AppError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub recipient_id: String,
    pub sender_id: String,
    pub kind: String,
    pub post_id: String,
}

impl Notification {
    pub fn mention(recipient_id: &str, sender_id: &str, post_id: &str) -> Self {
        Self {
            recipient_id: recipient_id.to_string(),
            sender_id: sender_id.to_string(),
            kind: "mention".to_string(),
            post_id: post_id.to_string(),
        }
    }
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, notification: &Notification) -> Result<(), AppError>;
}
