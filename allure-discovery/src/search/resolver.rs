use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::models::{Candidate, PromotionKey, Visibility};
use crate::store::{blocking, degrade_to_default, SharedStore};

/// Bulk membership sets for one search call. Never cached.
#[derive(Debug, Clone, Default)]
pub struct HighlightSets {
    pub approved: HashSet<Uuid>,
    pub week: HashSet<Uuid>,
    pub month: HashSet<Uuid>,
}

/// A candidate with its derived verification and highlight flags.
#[derive(Debug, Clone)]
pub struct EnrichedCandidate {
    pub candidate: Candidate,
    pub is_verified: bool,
    pub is_age_verified: bool,
    pub week_highlight: bool,
    pub month_highlight: bool,
}

impl EnrichedCandidate {
    /// MONTH=2, WEEK=1, none=0.
    pub fn promotion_rank(&self) -> u8 {
        if self.month_highlight {
            2
        } else if self.week_highlight {
            1
        } else {
            0
        }
    }
}

impl HighlightSets {
    /// Load the approval and both promotion sets for `ids`.
    ///
    /// The three lookups are independent and run concurrently. Each one
    /// degrades to an empty set on failure (for example before the auxiliary
    /// tables are migrated) so the search itself still answers.
    pub async fn load(store: &SharedStore, ids: Vec<Uuid>, now: DateTime<Utc>) -> Self {
        if ids.is_empty() {
            return Self::default();
        }
        let ids: Arc<[Uuid]> = ids.into();

        let approved_ids = Arc::clone(&ids);
        let week_ids = Arc::clone(&ids);
        let month_ids = ids;

        let (approved, week, month) = tokio::join!(
            blocking(store, move |s| s.approved_verification_ids(&approved_ids)),
            blocking(store, move |s| s.active_promotion_ids(&week_ids, PromotionKey::Week, now)),
            blocking(store, move |s| s.active_promotion_ids(&month_ids, PromotionKey::Month, now)),
        );

        Self {
            approved: degrade_to_default("verification_requests", approved),
            week: degrade_to_default("promotion_bookings_week", week),
            month: degrade_to_default("promotion_bookings_month", month),
        }
    }

    /// Derive the flags for one candidate.
    ///
    /// Business rule: a VERIFIED visibility tier counts as age verification on
    /// its own, so `is_age_verified` is the OR of an approved verification
    /// request and the VERIFIED tier, gated on the candidate being escort-class.
    pub fn enrich(&self, candidate: Candidate) -> EnrichedCandidate {
        let id = candidate.id;
        let is_verified = candidate.profile.visibility == Visibility::Verified;
        let is_age_verified =
            candidate.role.is_escort_class() && (self.approved.contains(&id) || is_verified);

        EnrichedCandidate {
            is_verified,
            is_age_verified,
            week_highlight: self.week.contains(&id),
            month_highlight: self.month.contains(&id),
            candidate,
        }
    }
}
