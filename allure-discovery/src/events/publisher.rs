use uuid::Uuid;

use allure_shared::clients::rabbitmq::RabbitMQClient;
use allure_shared::types::event::{payloads, routing_keys, Event};

use crate::models::SwipeAction;

const SOURCE: &str = "allure-discovery";

pub async fn publish_swipe_recorded(
    rabbitmq: Option<&RabbitMQClient>,
    member_id: Uuid,
    escort_id: Uuid,
    action: SwipeAction,
) {
    let Some(rabbitmq) = rabbitmq else { return };

    let event = Event::new(
        SOURCE,
        routing_keys::MATCHING_SWIPE_RECORDED,
        payloads::SwipeRecorded {
            member_id,
            escort_id,
            action: action.as_str().to_string(),
        },
    )
    .with_user(member_id);

    if let Err(e) = rabbitmq
        .publish(routing_keys::MATCHING_SWIPE_RECORDED, &event)
        .await
    {
        tracing::error!(error = %e, "failed to publish swipe.recorded event");
    }
}

pub async fn publish_preferences_updated(rabbitmq: Option<&RabbitMQClient>, member_id: Uuid) {
    let Some(rabbitmq) = rabbitmq else { return };

    let event = Event::new(
        SOURCE,
        routing_keys::MATCHING_PREFERENCES_UPDATED,
        payloads::PreferencesUpdated { member_id },
    )
    .with_user(member_id);

    if let Err(e) = rabbitmq
        .publish(routing_keys::MATCHING_PREFERENCES_UPDATED, &event)
        .await
    {
        tracing::error!(error = %e, "failed to publish preferences.updated event");
    }
}
