use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

use allure_shared::errors::{AppError, AppResult, ErrorCode};
use allure_shared::middleware::{LenientQuery, MemberUser};
use allure_shared::types::auth::AuthUser;

use crate::events::publisher;
use crate::matching::suggestions::{suggest, suggestion_limit, Suggestion, SuggestionSettings};
use crate::matching::swipe::{record_swipe, SwipeRequest};
use crate::models::SwipeAction;
use crate::store::blocking;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct PreferencesResponse {
    pub preferences: Value,
}

/// GET /matching/preferences - the caller's stored document, `{}` when unset
pub async fn get_preferences(
    MemberUser(user): MemberUser,
    State(state): State<Arc<AppState>>,
) -> AppResult<Json<PreferencesResponse>> {
    let member_id = user.id;
    let stored = blocking(&state.store, move |s| s.load_preferences(member_id)).await?;

    Ok(Json(PreferencesResponse {
        preferences: stored.unwrap_or_else(|| Value::Object(Default::default())),
    }))
}

/// POST /matching/preferences - store the body verbatim
pub async fn save_preferences(
    MemberUser(user): MemberUser,
    State(state): State<Arc<AppState>>,
    body: Result<Json<Value>, JsonRejection>,
) -> AppResult<Json<PreferencesResponse>> {
    let Json(document) = body.map_err(|e| AppError::bad_request(e.body_text()))?;
    if !document.is_object() {
        return Err(AppError::new(
            ErrorCode::InvalidPreferences,
            "preferences must be a JSON object",
        ));
    }

    let member_id = user.id;
    let stored = blocking(&state.store, move |s| s.upsert_preferences(member_id, &document, Utc::now())).await?;

    tracing::debug!(member_id = %member_id, "preferences stored");
    publisher::publish_preferences_updated(state.rabbitmq.as_ref(), member_id).await;

    Ok(Json(PreferencesResponse { preferences: stored }))
}

#[derive(Debug, Default, Deserialize)]
pub struct SuggestionsQuery {
    pub limit: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SuggestionsResponse {
    pub suggestions: Vec<Suggestion>,
}

/// GET /matching/suggestions?limit=
pub async fn suggestions(
    MemberUser(user): MemberUser,
    State(state): State<Arc<AppState>>,
    LenientQuery(query): LenientQuery<SuggestionsQuery>,
) -> AppResult<Json<SuggestionsResponse>> {
    let settings = SuggestionSettings {
        weights: state.config.scoring,
        pool_size: state.config.suggestion_pool_size,
        limit: suggestion_limit(query.limit.as_deref()),
    };

    let suggestions = suggest(&state.store, user.id, settings).await?;
    Ok(Json(SuggestionsResponse { suggestions }))
}

#[derive(Debug, Serialize)]
pub struct SwipeResponse {
    pub ok: bool,
    pub action: SwipeAction,
}

/// POST /matching/swipe - record LIKE or PASS, any authenticated role
pub async fn swipe(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    body: Result<Json<SwipeRequest>, JsonRejection>,
) -> AppResult<Json<SwipeResponse>> {
    let Json(req) = body.map_err(|e| AppError::bad_request(e.body_text()))?;
    let (escort_id, action) = req.parse()?;

    let stored = record_swipe(
        &state.store,
        state.config.swipe_rate_limit,
        user.id,
        escort_id,
        action,
        Utc::now(),
    )
    .await?;

    publisher::publish_swipe_recorded(state.rabbitmq.as_ref(), user.id, escort_id, stored.action).await;

    Ok(Json(SwipeResponse {
        ok: true,
        action: stored.action,
    }))
}
