//! Escort discovery: filter compilation, verification/highlight resolution,
//! ranking and pagination.

pub mod filter;
pub mod ranking;
pub mod resolver;

use allure_shared::errors::AppResult;
use allure_shared::types::pagination::Page;
use chrono::{DateTime, Utc};

use crate::store::{blocking, SharedStore};
use filter::{CandidateFilter, SearchParams};
use ranking::{rank_and_paginate, EscortSearchItem};
use resolver::HighlightSets;

/// Full search pipeline. Only the primary candidate fetch can fail the call.
pub async fn search_escorts(
    store: &SharedStore,
    params: &SearchParams,
    now: DateTime<Utc>,
) -> AppResult<Page<EscortSearchItem>> {
    let filter = CandidateFilter::compile(params);
    let predicate_count = filter.predicates.len();

    let candidates = blocking(store, move |s| s.search_candidates(&filter)).await?;
    let candidates: Vec<_> = candidates.into_iter().filter(|c| c.is_discoverable()).collect();

    let ids = candidates.iter().map(|c| c.id).collect();
    let sets = HighlightSets::load(store, ids, now).await;
    let enriched = candidates.into_iter().map(|c| sets.enrich(c)).collect();

    let page = rank_and_paginate(enriched, params.toggles(), params.window());

    tracing::debug!(
        predicates = predicate_count,
        total = page.total,
        returned = page.items.len(),
        "escort search completed"
    );

    Ok(page)
}
