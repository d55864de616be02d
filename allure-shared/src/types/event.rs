use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// RabbitMQ Event envelope wrapping all domain events.
///
/// Routing key format: `allure.{domain}.{entity}.{action}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event<T: Serialize> {
    pub id: Uuid,
    pub source: String,
    pub event_type: String,
    pub timestamp: DateTime<Utc>,
    pub user_id: Option<Uuid>,
    pub data: T,
}

impl<T: Serialize> Event<T> {
    pub fn new(source: impl Into<String>, event_type: impl Into<String>, data: T) -> Self {
        Self {
            id: Uuid::now_v7(),
            source: source.into(),
            event_type: event_type.into(),
            timestamp: Utc::now(),
            user_id: None,
            data,
        }
    }

    pub fn with_user(mut self, user_id: Uuid) -> Self {
        self.user_id = Some(user_id);
        self
    }
}

pub mod routing_keys {
    pub const MATCHING_SWIPE_RECORDED: &str = "allure.matching.swipe.recorded";
    pub const MATCHING_PREFERENCES_UPDATED: &str = "allure.matching.preferences.updated";
}

pub mod payloads {
    use serde::{Deserialize, Serialize};
    use uuid::Uuid;

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct SwipeRecorded {
        pub member_id: Uuid,
        pub escort_id: Uuid,
        pub action: String,
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct PreferencesUpdated {
        pub member_id: Uuid,
    }
}
