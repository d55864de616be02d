//! Candidate store seam.
//!
//! Store methods are blocking (diesel), so callers run them through
//! [`blocking`]. Implementations report every failure, including a missing
//! auxiliary table; deciding which lookups may degrade to an empty result is
//! the caller's job.

pub mod postgres;

use std::collections::HashSet;
use std::sync::Arc;

use allure_shared::errors::{AppError, AppResult};
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::models::{Candidate, MatchAction, PromotionKey, SwipeAction};
use crate::search::filter::CandidateFilter;

pub use postgres::PgStore;

/// Location narrowing and exclusions for the suggestion candidate pool.
#[derive(Debug, Clone, Default)]
pub struct PoolQuery {
    pub city: Option<String>,
    pub country: Option<String>,
    pub exclude: HashSet<Uuid>,
    pub limit: i64,
}

pub trait DiscoveryStore: Send + Sync + 'static {
    /// Cheap round-trip used by the health endpoint.
    fn ping(&self) -> AppResult<()>;

    /// Every discoverable candidate matching `filter`, newest first.
    fn search_candidates(&self, filter: &CandidateFilter) -> AppResult<Vec<Candidate>>;

    /// Ids among `ids` with at least one APPROVED verification request.
    fn approved_verification_ids(&self, ids: &[Uuid]) -> AppResult<HashSet<Uuid>>;

    /// Ids among `ids` holding an ACTIVE `key` booking whose window contains `now`.
    fn active_promotion_ids(
        &self,
        ids: &[Uuid],
        key: PromotionKey,
        now: DateTime<Utc>,
    ) -> AppResult<HashSet<Uuid>>;

    /// A discoverable candidate by id.
    fn find_escort(&self, id: Uuid) -> AppResult<Option<Candidate>>;

    /// Up to `query.limit` discoverable candidates, newest first.
    fn suggestion_pool(&self, query: &PoolQuery) -> AppResult<Vec<Candidate>>;

    fn load_preferences(&self, member_id: Uuid) -> AppResult<Option<serde_json::Value>>;

    fn upsert_preferences(
        &self,
        member_id: Uuid,
        document: &serde_json::Value,
        now: DateTime<Utc>,
    ) -> AppResult<serde_json::Value>;

    /// Escort ids the member has already liked or passed.
    fn swiped_escort_ids(&self, member_id: Uuid) -> AppResult<HashSet<Uuid>>;

    /// Actions recorded by the member strictly after `since`.
    fn count_actions_since(&self, member_id: Uuid, since: DateTime<Utc>) -> AppResult<i64>;

    /// Atomic insert-or-overwrite keyed on (member, escort).
    fn upsert_match_action(
        &self,
        member_id: Uuid,
        escort_id: Uuid,
        action: SwipeAction,
        now: DateTime<Utc>,
    ) -> AppResult<MatchAction>;
}

pub type SharedStore = Arc<dyn DiscoveryStore>;

/// Run a blocking store call on the blocking thread pool.
pub async fn blocking<T, F>(store: &SharedStore, f: F) -> AppResult<T>
where
    T: Send + 'static,
    F: FnOnce(&dyn DiscoveryStore) -> AppResult<T> + Send + 'static,
{
    let store = Arc::clone(store);
    tokio::task::spawn_blocking(move || f(store.as_ref()))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("store task failed: {e}")))?
}

/// Fallback for optional lookups: log, count, and carry on with the default.
pub fn degrade_to_default<T: Default>(lookup: &'static str, result: AppResult<T>) -> T {
    match result {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(lookup, error = %e, "auxiliary lookup failed, continuing without it");
            metrics::counter!("discovery_degraded_lookups_total", "lookup" => lookup).increment(1);
            T::default()
        }
    }
}
