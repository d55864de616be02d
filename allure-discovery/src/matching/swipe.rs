use allure_shared::errors::{AppError, AppResult, ErrorCode};
use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::models::{MatchAction, SwipeAction};
use crate::store::{blocking, SharedStore};

/// Sliding-window cap on swipes per member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RateLimitPolicy {
    pub max_actions: i64,
    pub window_secs: i64,
}

impl Default for RateLimitPolicy {
    fn default() -> Self {
        Self {
            max_actions: 40,
            window_secs: 30,
        }
    }
}

impl RateLimitPolicy {
    /// Actions strictly newer than this instant count toward the limit.
    pub fn window_start(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now - Duration::seconds(self.window_secs)
    }

    /// Whether one more action fits, given `recent` actions already in the window.
    pub fn allows(&self, recent: i64) -> bool {
        recent < self.max_actions
    }
}

/// `POST /matching/swipe` body before validation.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SwipeRequest {
    #[validate(required(message = "escortId is required"))]
    pub escort_id: Option<String>,
    #[validate(required(message = "action is required"))]
    pub action: Option<String>,
}

impl SwipeRequest {
    /// Validate presence and syntax of both fields.
    pub fn parse(self) -> AppResult<(Uuid, SwipeAction)> {
        self.validate()
            .map_err(|e| AppError::new(ErrorCode::ValidationError, e.to_string()))?;

        let raw_id = self.escort_id.unwrap_or_default();
        let escort_id = raw_id
            .trim()
            .parse::<Uuid>()
            .map_err(|_| AppError::new(ErrorCode::ValidationError, "escortId must be a valid id"))?;

        let action = self
            .action
            .unwrap_or_default()
            .parse::<SwipeAction>()
            .map_err(|_| AppError::new(ErrorCode::InvalidSwipeAction, "action must be LIKE or PASS"))?;

        Ok((escort_id, action))
    }
}

/// Record (or overwrite) a member's decision on an escort.
///
/// The rate-limit count fails open: a store error there is logged and the swipe
/// proceeds. The write itself fails closed.
pub async fn record_swipe(
    store: &SharedStore,
    policy: RateLimitPolicy,
    member_id: Uuid,
    escort_id: Uuid,
    action: SwipeAction,
    now: DateTime<Utc>,
) -> AppResult<MatchAction> {
    let escort = blocking(store, move |s| s.find_escort(escort_id)).await?;
    if !escort.is_some_and(|c| c.is_discoverable()) {
        return Err(AppError::new(ErrorCode::EscortNotFound, "escort not found"));
    }

    let since = policy.window_start(now);
    match blocking(store, move |s| s.count_actions_since(member_id, since)).await {
        Ok(recent) if !policy.allows(recent) => {
            metrics::counter!("matching_swipes_rate_limited_total").increment(1);
            tracing::info!(member_id = %member_id, recent, "swipe rate limit reached");
            return Err(AppError::with_details(
                ErrorCode::SwipeRateLimited,
                "too many swipes, slow down",
                serde_json::json!({ "retryAfterSecs": policy.window_secs }),
            ));
        }
        Ok(_) => {}
        Err(e) => {
            tracing::warn!(member_id = %member_id, error = %e, "swipe rate-limit check failed, allowing");
        }
    }

    let stored = blocking(store, move |s| s.upsert_match_action(member_id, escort_id, action, now)).await?;

    metrics::counter!("matching_swipes_total", "action" => stored.action.as_str()).increment(1);
    tracing::debug!(
        member_id = %member_id,
        escort_id = %escort_id,
        action = stored.action.as_str(),
        "swipe recorded"
    );

    Ok(stored)
}
