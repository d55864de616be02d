use allure_shared::types::pagination::{Page, SkipTake};
use serde::Serialize;
use uuid::Uuid;

use super::filter::SearchToggles;
use super::resolver::EnrichedCandidate;
use crate::media::primary_image;
use crate::models::Visibility;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Badge {
    EscortOfWeek,
    EscortOfMonth,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EscortSearchItem {
    pub id: Uuid,
    pub display_name: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub image: Option<String>,
    pub visibility: Visibility,
    pub is_verified: bool,
    pub is_age_verified: bool,
    pub is_escort_of_week: bool,
    pub is_escort_of_month: bool,
    pub badges: Vec<Badge>,
}

impl From<EnrichedCandidate> for EscortSearchItem {
    fn from(e: EnrichedCandidate) -> Self {
        let image = primary_image(&e.candidate.profile);
        let mut badges = Vec::new();
        if e.week_highlight {
            badges.push(Badge::EscortOfWeek);
        }
        if e.month_highlight {
            badges.push(Badge::EscortOfMonth);
        }

        let profile = e.candidate.profile;
        Self {
            id: e.candidate.id,
            display_name: profile.display_name,
            city: profile.city,
            country: profile.country,
            image,
            visibility: profile.visibility,
            is_verified: e.is_verified,
            is_age_verified: e.is_age_verified,
            is_escort_of_week: e.week_highlight,
            is_escort_of_month: e.month_highlight,
            badges,
        }
    }
}

/// Apply the verification toggles.
pub fn post_filter(items: Vec<EnrichedCandidate>, toggles: SearchToggles) -> Vec<EnrichedCandidate> {
    items
        .into_iter()
        .filter(|e| !toggles.verified_only || e.is_verified)
        .filter(|e| {
            !toggles.age_verified_only || (e.candidate.role.is_escort_class() && e.is_age_verified)
        })
        .collect()
}

/// Promotion tier descending, then newest first. Stable.
pub fn rank(items: &mut [EnrichedCandidate]) {
    items.sort_by(|a, b| {
        b.promotion_rank()
            .cmp(&a.promotion_rank())
            .then_with(|| b.candidate.created_at.cmp(&a.candidate.created_at))
    });
}

/// Post-filter, rank and slice. `total` counts the filtered set before slicing.
pub fn rank_and_paginate(
    items: Vec<EnrichedCandidate>,
    toggles: SearchToggles,
    window: SkipTake,
) -> Page<EscortSearchItem> {
    let mut filtered = post_filter(items, toggles);
    let total = filtered.len() as u64;
    rank(&mut filtered);

    Page {
        total,
        items: window.apply(filtered).into_iter().map(EscortSearchItem::from).collect(),
    }
}
