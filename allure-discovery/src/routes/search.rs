use axum::extract::State;
use axum::Json;
use chrono::Utc;
use std::sync::Arc;

use allure_shared::errors::AppResult;
use allure_shared::middleware::LenientQuery;
use allure_shared::types::pagination::Page;

use crate::search::filter::SearchParams;
use crate::search::ranking::EscortSearchItem;
use crate::search::search_escorts;
use crate::AppState;

/// GET /escorts/search - public, filtered and ranked escort listing
pub async fn search(
    State(state): State<Arc<AppState>>,
    LenientQuery(params): LenientQuery<SearchParams>,
) -> AppResult<Json<Page<EscortSearchItem>>> {
    let page = search_escorts(&state.store, &params, Utc::now()).await?;
    Ok(Json(page))
}
