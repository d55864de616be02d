use allure_shared::errors::AppResult;
use serde::Serialize;
use uuid::Uuid;

use super::preferences::PreferenceDocument;
use super::scorer::{rank_candidates, ScoreWeights, ScoredCandidate};
use crate::media::first_gallery_image;
use crate::store::{blocking, degrade_to_default, PoolQuery, SharedStore};

pub const DEFAULT_SUGGESTION_LIMIT: usize = 20;
pub const MIN_SUGGESTION_LIMIT: usize = 5;
pub const MAX_SUGGESTION_LIMIT: usize = 50;

/// Parse `?limit=`, falling back to the default and clamping to [5, 50].
pub fn suggestion_limit(raw: Option<&str>) -> usize {
    raw.and_then(|l| l.trim().parse::<i64>().ok())
        .map(|l| l.clamp(MIN_SUGGESTION_LIMIT as i64, MAX_SUGGESTION_LIMIT as i64) as usize)
        .unwrap_or(DEFAULT_SUGGESTION_LIMIT)
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionAppearance {
    pub body_type: Option<String>,
    pub hair_color: Option<String>,
    pub eye_color: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Suggestion {
    pub id: Uuid,
    pub email: String,
    pub display_name: String,
    pub city: Option<String>,
    pub country: Option<String>,
    pub avatar: Option<String>,
    pub image: Option<String>,
    pub services: Vec<String>,
    pub appearance: SuggestionAppearance,
}

impl From<ScoredCandidate> for Suggestion {
    fn from(scored: ScoredCandidate) -> Self {
        let c = scored.candidate;
        let display_name = c
            .profile
            .display_name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| c.email.split('@').next().unwrap_or_default().to_string());
        let image = first_gallery_image(&c.profile.gallery);
        let profile = c.profile;

        Self {
            id: c.id,
            email: c.email,
            display_name,
            city: profile.city,
            country: profile.country,
            avatar: profile.avatar_url,
            image,
            services: profile.services,
            appearance: SuggestionAppearance {
                body_type: profile.body_type,
                hair_color: profile.hair_color,
                eye_color: profile.eye_color,
            },
        }
    }
}

/// Tunables for one suggestion run.
#[derive(Debug, Clone, Copy)]
pub struct SuggestionSettings {
    pub weights: ScoreWeights,
    pub pool_size: i64,
    pub limit: usize,
}

/// Ranked suggestions for `member_id`, never including escorts the member has
/// already liked or passed.
pub async fn suggest(
    store: &SharedStore,
    member_id: Uuid,
    settings: SuggestionSettings,
) -> AppResult<Vec<Suggestion>> {
    let (raw_doc, swiped) = tokio::join!(
        blocking(store, move |s| s.load_preferences(member_id)),
        blocking(store, move |s| s.swiped_escort_ids(member_id)),
    );

    let doc = match PreferenceDocument::decode(raw_doc?.as_ref()) {
        Ok(doc) => doc,
        Err(e) => {
            tracing::warn!(member_id = %member_id, error = %e, "ignoring malformed preference document");
            PreferenceDocument::default()
        }
    };
    let excluded = degrade_to_default("match_actions", swiped);

    let query = PoolQuery {
        city: doc.city.clone(),
        country: doc.country.clone(),
        exclude: excluded.clone(),
        limit: settings.pool_size,
    };
    let pool = blocking(store, move |s| s.suggestion_pool(&query)).await?;
    let pool: Vec<_> = pool
        .into_iter()
        .filter(|c| c.is_discoverable() && !excluded.contains(&c.id))
        .collect();
    let pool_len = pool.len();

    let ranked = rank_candidates(&doc, pool, &settings.weights, settings.limit);

    tracing::debug!(
        member_id = %member_id,
        pool = pool_len,
        excluded = excluded.len(),
        returned = ranked.len(),
        "suggestions ranked"
    );

    Ok(ranked.into_iter().map(Suggestion::from).collect())
}
