use crate::application::ports::event_publisher::{ContentEvent, EventPublisher};
use crate::shared::config::QueueConfig;
use crate::shared::error::AppError;
use async_trait::async_trait;
use lapin::options::{BasicPublishOptions, ExchangeDeclareOptions};
use lapin::types::FieldTable;
use lapin::{BasicProperties, Channel, Connection, ConnectionProperties, ExchangeKind};

/// Publishes content events as persistent JSON messages on a topic exchange.
pub struct AmqpEventPublisher {
    // Dropping the connection closes the channel.
    _connection: Connection,
    channel: Channel,
    exchange: String,
    routing_key: String,
}

impl AmqpEventPublisher {
    pub async fn connect(amqp_url: &str, config: &QueueConfig) -> Result<Self, AppError> {
        let connection = Connection::connect(
            amqp_url,
            ConnectionProperties::default().with_connection_name("feedline".into()),
        )
        .await?;
        let channel = connection.create_channel().await?;
        channel
            .exchange_declare(
                &config.exchange,
                ExchangeKind::Topic,
                ExchangeDeclareOptions {
                    durable: true,
                    ..ExchangeDeclareOptions::default()
                },
                FieldTable::default(),
            )
            .await?;

        tracing::info!(exchange = %config.exchange, "connected to message queue");

        Ok(Self {
            _connection: connection,
            channel,
            exchange: config.exchange.clone(),
            routing_key: config.routing_key.clone(),
        })
    }
}

#[async_trait]
impl EventPublisher for AmqpEventPublisher {
    async fn publish(&self, event: &ContentEvent) -> Result<(), AppError> {
        let payload = serde_json::to_vec(event)?;
        self.channel
            .basic_publish(
                &self.exchange,
                &self.routing_key,
                BasicPublishOptions::default(),
                &payload,
                BasicProperties::default()
                    .with_content_type("application/json".into())
                    .with_delivery_mode(2),
            )
            .await?
            .await?;
        Ok(())
    }
}

/// Used when no queue is configured: publishing is skipped.
pub struct NoopEventPublisher;

#[async_trait]
impl EventPublisher for NoopEventPublisher {
    async fn publish(&self, event: &ContentEvent) -> Result<(), AppError> {
        tracing::debug!(event_type = %event.event_type, "message queue not configured; skipping");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn noop_publisher_accepts_every_event() {
        let event = ContentEvent::new("post_created", serde_json::json!({"id": "p1"}));
        NoopEventPublisher.publish(&event).await.unwrap();
    }

    #[test]
    fn envelope_serializes_type_field() {
        let event = ContentEvent::new("post_created", serde_json::json!({"id": "p1"}));
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "post_created");
        assert_eq!(json["payload"]["id"], "p1");
    }
}
