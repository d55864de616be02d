use lapin::{
    options::*, types::FieldTable, BasicProperties, Channel, Connection, ConnectionProperties,
};
use serde::Serialize;

use crate::types::Event;

const EXCHANGE_NAME: &str = "allure.events";

#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    #[error("failed to serialize event: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("broker error: {0}")]
    Broker(#[from] lapin::Error),
}

#[derive(Clone)]
pub struct RabbitMQClient {
    channel: Channel,
}

impl RabbitMQClient {
    pub async fn connect(url: &str) -> Result<Self, lapin::Error> {
        let conn = Connection::connect(url, ConnectionProperties::default()).await?;
        let channel = conn.create_channel().await?;

        channel
            .exchange_declare(
                EXCHANGE_NAME,
                lapin::ExchangeKind::Topic,
                ExchangeDeclareOptions {
                    durable: true,
                    ..Default::default()
                },
                FieldTable::default(),
            )
            .await?;

        tracing::info!(exchange = EXCHANGE_NAME, "connected to RabbitMQ");
        Ok(Self { channel })
    }

    /// Publish an event on the topic exchange and wait for the broker confirm.
    pub async fn publish<T: Serialize>(
        &self,
        routing_key: &str,
        event: &Event<T>,
    ) -> Result<(), PublishError> {
        let payload = serde_json::to_vec(event)?;

        self.channel
            .basic_publish(
                EXCHANGE_NAME,
                routing_key,
                BasicPublishOptions::default(),
                &payload,
                BasicProperties::default()
                    .with_content_type("application/json".into())
                    .with_delivery_mode(2), // persistent
            )
            .await?
            .await?;

        tracing::debug!(
            routing_key = %routing_key,
            event_id = %event.id,
            "event published"
        );

        Ok(())
    }
}
