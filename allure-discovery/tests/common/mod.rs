#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use axum::body::{self, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::{json, Value};
use tower::util::ServiceExt;
use uuid::Uuid;

use allure_discovery::config::AppConfig;
use allure_discovery::models::{
    Candidate, CandidateProfile, MatchAction, PromotionKey, SwipeAction, Visibility,
};
use allure_discovery::search::filter::CandidateFilter;
use allure_discovery::store::{DiscoveryStore, PoolQuery};
use allure_discovery::{router, AppState};
use allure_shared::errors::{AppError, AppResult};
use allure_shared::middleware::DEFAULT_JWT_SECRET;
use allure_shared::types::auth::{AccountRole, Claims};

struct Booking {
    user_id: Uuid,
    key: PromotionKey,
    starts_at: DateTime<Utc>,
    ends_at: DateTime<Utc>,
}

#[derive(Default)]
struct Tables {
    candidates: Vec<Candidate>,
    approved: HashSet<Uuid>,
    bookings: Vec<Booking>,
    preferences: HashMap<Uuid, Value>,
    actions: Vec<MatchAction>,
}

/// In-memory `DiscoveryStore`. Auxiliary tables can be switched to fail the
/// way an unmigrated database would.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
    auxiliary_missing: Mutex<bool>,
    database_down: Mutex<bool>,
}

fn missing(table: &str) -> AppError {
    AppError::Internal(anyhow::anyhow!("relation \"{table}\" does not exist"))
}

fn contains_ci(haystack: Option<&str>, needle: &str) -> bool {
    haystack.is_some_and(|h| h.to_lowercase().contains(&needle.to_lowercase()))
}

impl MemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn add(&self, candidate: Candidate) -> Uuid {
        let id = candidate.id;
        self.tables.lock().unwrap().candidates.push(candidate);
        id
    }

    pub fn approve(&self, id: Uuid) {
        self.tables.lock().unwrap().approved.insert(id);
    }

    /// Book a highlight whose window spans now.
    pub fn promote(&self, id: Uuid, key: PromotionKey) {
        let now = Utc::now();
        self.book(id, key, now - Duration::days(1), now + Duration::days(6));
    }

    pub fn book(&self, id: Uuid, key: PromotionKey, starts_at: DateTime<Utc>, ends_at: DateTime<Utc>) {
        self.tables.lock().unwrap().bookings.push(Booking { user_id: id, key, starts_at, ends_at });
    }

    pub fn set_preferences(&self, member_id: Uuid, document: Value) {
        self.tables.lock().unwrap().preferences.insert(member_id, document);
    }

    /// Seed a stored action directly, bypassing the rate limit.
    pub fn seed_action(&self, member_id: Uuid, escort_id: Uuid, action: SwipeAction, decided_at: DateTime<Utc>) {
        self.tables.lock().unwrap().actions.push(MatchAction {
            id: Uuid::now_v7(),
            member_id,
            escort_id,
            action,
            decided_at,
        });
    }

    pub fn actions_for(&self, member_id: Uuid) -> Vec<MatchAction> {
        self.tables
            .lock()
            .unwrap()
            .actions
            .iter()
            .filter(|a| a.member_id == member_id)
            .cloned()
            .collect()
    }

    pub fn drop_auxiliary_tables(&self) {
        *self.auxiliary_missing.lock().unwrap() = true;
    }

    pub fn fail_database(&self) {
        *self.database_down.lock().unwrap() = true;
    }

    fn auxiliary_missing(&self) -> bool {
        *self.auxiliary_missing.lock().unwrap()
    }

    fn newest_first(mut candidates: Vec<Candidate>) -> Vec<Candidate> {
        candidates.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));
        candidates
    }
}

impl DiscoveryStore for MemoryStore {
    fn ping(&self) -> AppResult<()> {
        if *self.database_down.lock().unwrap() {
            return Err(AppError::Internal(anyhow::anyhow!(
                "connection refused to 10.0.0.5:5432 (user allure_rw)"
            )));
        }
        Ok(())
    }

    fn search_candidates(&self, filter: &CandidateFilter) -> AppResult<Vec<Candidate>> {
        let tables = self.tables.lock().unwrap();
        let hits = tables
            .candidates
            .iter()
            .filter(|c| c.is_discoverable() && filter.matches(c))
            .cloned()
            .collect();
        Ok(Self::newest_first(hits))
    }

    fn approved_verification_ids(&self, ids: &[Uuid]) -> AppResult<HashSet<Uuid>> {
        if self.auxiliary_missing() {
            return Err(missing("verification_requests"));
        }
        let tables = self.tables.lock().unwrap();
        Ok(ids.iter().copied().filter(|id| tables.approved.contains(id)).collect())
    }

    fn active_promotion_ids(
        &self,
        ids: &[Uuid],
        key: PromotionKey,
        now: DateTime<Utc>,
    ) -> AppResult<HashSet<Uuid>> {
        if self.auxiliary_missing() {
            return Err(missing("promotion_bookings"));
        }
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .bookings
            .iter()
            .filter(|b| b.key == key && b.starts_at <= now && b.ends_at > now && ids.contains(&b.user_id))
            .map(|b| b.user_id)
            .collect())
    }

    fn find_escort(&self, id: Uuid) -> AppResult<Option<Candidate>> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .candidates
            .iter()
            .find(|c| c.id == id && c.is_discoverable())
            .cloned())
    }

    fn suggestion_pool(&self, query: &PoolQuery) -> AppResult<Vec<Candidate>> {
        let tables = self.tables.lock().unwrap();
        let pool = tables
            .candidates
            .iter()
            .filter(|c| c.is_discoverable() && !query.exclude.contains(&c.id))
            .filter(|c| query.city.as_deref().map_or(true, |city| contains_ci(c.profile.city.as_deref(), city)))
            .filter(|c| {
                query
                    .country
                    .as_deref()
                    .map_or(true, |country| contains_ci(c.profile.country.as_deref(), country))
            })
            .cloned()
            .collect();
        let mut pool = Self::newest_first(pool);
        pool.truncate(query.limit.max(0) as usize);
        Ok(pool)
    }

    fn load_preferences(&self, member_id: Uuid) -> AppResult<Option<Value>> {
        Ok(self.tables.lock().unwrap().preferences.get(&member_id).cloned())
    }

    fn upsert_preferences(&self, member_id: Uuid, document: &Value, _now: DateTime<Utc>) -> AppResult<Value> {
        self.tables.lock().unwrap().preferences.insert(member_id, document.clone());
        Ok(document.clone())
    }

    fn swiped_escort_ids(&self, member_id: Uuid) -> AppResult<HashSet<Uuid>> {
        if self.auxiliary_missing() {
            return Err(missing("match_actions"));
        }
        Ok(self.actions_for(member_id).into_iter().map(|a| a.escort_id).collect())
    }

    fn count_actions_since(&self, member_id: Uuid, since: DateTime<Utc>) -> AppResult<i64> {
        if self.auxiliary_missing() {
            return Err(missing("match_actions"));
        }
        Ok(self
            .actions_for(member_id)
            .iter()
            .filter(|a| a.decided_at > since)
            .count() as i64)
    }

    fn upsert_match_action(
        &self,
        member_id: Uuid,
        escort_id: Uuid,
        action: SwipeAction,
        now: DateTime<Utc>,
    ) -> AppResult<MatchAction> {
        let mut tables = self.tables.lock().unwrap();
        if let Some(existing) = tables
            .actions
            .iter_mut()
            .find(|a| a.member_id == member_id && a.escort_id == escort_id)
        {
            existing.action = action;
            existing.decided_at = now;
            return Ok(existing.clone());
        }

        let stored = MatchAction {
            id: Uuid::now_v7(),
            member_id,
            escort_id,
            action,
            decided_at: now,
        };
        tables.actions.push(stored.clone());
        Ok(stored)
    }
}

pub fn app(store: Arc<MemoryStore>) -> Router {
    router(Arc::new(AppState {
        store,
        config: AppConfig::default(),
        rabbitmq: None,
        metrics_handle: None,
    }))
}

pub fn token(user_id: Uuid, role: AccountRole) -> String {
    let claims = Claims::new(user_id, role, 300);
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(DEFAULT_JWT_SECRET.as_bytes()),
    )
    .unwrap()
}

/// Active escort with a display name and city, created `age_days` ago.
pub fn escort(name: &str, city: &str, age_days: i64) -> Candidate {
    Candidate {
        id: Uuid::new_v4(),
        email: format!("{}@example.com", name.to_lowercase()),
        role: AccountRole::Escort,
        is_active: true,
        created_at: Utc::now() - Duration::days(age_days),
        profile: CandidateProfile {
            display_name: Some(name.to_string()),
            description: None,
            city: Some(city.to_string()),
            country: None,
            formatted_location: None,
            visibility: Visibility::Public,
            height: None,
            weight: None,
            breast_type: None,
            breast_size: None,
            eye_color: None,
            hair_color: None,
            hair_length: None,
            clothing_style: None,
            clothing_size: None,
            body_type: None,
            avatar_url: None,
            media: json!([]),
            gallery: json!([]),
            services: Vec::new(),
            languages: Vec::new(),
            piercings: Vec::new(),
            tattoos: Vec::new(),
        },
    }
}

pub async fn get(app: Router, uri: &str, bearer: Option<&str>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(token) = bearer {
        builder = builder.header("Authorization", format!("Bearer {token}"));
    }
    send(app, builder.body(Body::empty()).unwrap()).await
}

pub async fn post_json(app: Router, uri: &str, bearer: Option<&str>, body: Value) -> (StatusCode, Value) {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header("Content-Type", "application/json");
    if let Some(token) = bearer {
        builder = builder.header("Authorization", format!("Bearer {token}"));
    }
    send(app, builder.body(Body::from(body.to_string())).unwrap()).await
}

/// POST a body that is sent as-is, valid JSON or not.
pub async fn post_raw(app: Router, uri: &str, bearer: Option<&str>, raw: &str) -> (StatusCode, Value) {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header("Content-Type", "application/json");
    if let Some(token) = bearer {
        builder = builder.header("Authorization", format!("Bearer {token}"));
    }
    send(app, builder.body(Body::from(raw.to_string())).unwrap()).await
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

pub fn names(body: &Value, key: &str) -> Vec<String> {
    body[key]
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["displayName"].as_str().unwrap_or_default().to_string())
        .collect()
}
