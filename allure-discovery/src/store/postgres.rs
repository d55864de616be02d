use std::collections::HashSet;

use allure_shared::clients::db::DbPool;
use allure_shared::errors::{AppError, AppResult};
use allure_shared::types::auth::AccountRole;
use chrono::{DateTime, Utc};
use diesel::pg::{Pg, PgConnection};
use diesel::prelude::*;
use diesel::query_builder::QueryFragment;
use diesel::query_dsl::LoadQuery;
use diesel::r2d2::{ConnectionManager, PooledConnection};
use diesel::upsert::excluded;
use uuid::Uuid;

use super::{DiscoveryStore, PoolQuery};
use crate::models::{
    AppearanceField, Candidate, MatchAction, MatchActionRow, NewMatchAction, NewMatchPreference,
    ProfileRow, PromotionKey, SwipeAction, UserRow, BOOKING_STATUS_ACTIVE,
    VERIFICATION_STATUS_APPROVED,
};
use crate::schema::{match_actions, match_preferences, profiles, promotion_bookings, users, verification_requests};
use crate::search::filter::{like_pattern, CandidateFilter, FilterTarget};

type PgPooled = PooledConnection<ConnectionManager<PgConnection>>;
type CandidateQuery<'a> = diesel::dsl::IntoBoxed<'a, diesel::dsl::InnerJoin<users::table, profiles::table>, Pg>;

/// Diesel-backed candidate store.
#[derive(Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn conn(&self) -> AppResult<PgPooled> {
        Ok(self.pool.get()?)
    }
}

/// Active escort-class users with a profile.
fn discoverable<'a>() -> CandidateQuery<'a> {
    users::table
        .inner_join(profiles::table)
        .into_boxed()
        .filter(users::is_active.eq(true))
        .filter(users::role.eq(AccountRole::Escort.as_str()))
}

fn apply_filter<'a>(mut query: CandidateQuery<'a>, filter: &CandidateFilter) -> CandidateQuery<'a> {
    for predicate in &filter.predicates {
        let pattern = predicate.like_pattern();
        query = match predicate.target {
            FilterTarget::Text => query.filter(
                profiles::display_name
                    .ilike(pattern.clone())
                    .or(profiles::description.ilike(pattern)),
            ),
            FilterTarget::Location => query.filter(
                profiles::city
                    .ilike(pattern.clone())
                    .or(profiles::country.ilike(pattern.clone()))
                    .or(profiles::formatted_location.ilike(pattern)),
            ),
            FilterTarget::Appearance(field) => match field {
                AppearanceField::Height => query.filter(profiles::height.ilike(pattern)),
                AppearanceField::Weight => query.filter(profiles::weight.ilike(pattern)),
                AppearanceField::BreastType => query.filter(profiles::breast_type.ilike(pattern)),
                AppearanceField::BreastSize => query.filter(profiles::breast_size.ilike(pattern)),
                AppearanceField::EyeColor => query.filter(profiles::eye_color.ilike(pattern)),
                AppearanceField::HairColor => query.filter(profiles::hair_color.ilike(pattern)),
                AppearanceField::HairLength => query.filter(profiles::hair_length.ilike(pattern)),
                AppearanceField::ClothingStyle => query.filter(profiles::clothing_style.ilike(pattern)),
                AppearanceField::ClothingSize => query.filter(profiles::clothing_size.ilike(pattern)),
                AppearanceField::BodyType => query.filter(profiles::body_type.ilike(pattern)),
            },
        };
    }
    query
}

fn search_query<'a>(filter: &CandidateFilter) -> CandidateQuery<'a> {
    apply_filter(discoverable(), filter)
}

fn pool_query<'a>(query: &PoolQuery) -> CandidateQuery<'a> {
    let mut pool = discoverable();
    if let Some(city) = query.city.as_deref() {
        pool = pool.filter(profiles::city.ilike(like_pattern(city)));
    }
    if let Some(country) = query.country.as_deref() {
        pool = pool.filter(profiles::country.ilike(like_pattern(country)));
    }
    if !query.exclude.is_empty() {
        let excluded: Vec<Uuid> = query.exclude.iter().copied().collect();
        pool = pool.filter(users::id.ne_all(excluded));
    }
    pool.limit(query.limit)
}

/// Booking window is half-open: `starts_at <= now < ends_at`.
fn active_promotions_query<'a>(
    ids: &'a [Uuid],
    key: PromotionKey,
    now: DateTime<Utc>,
) -> impl RunQueryDsl<PgConnection> + LoadQuery<'a, PgConnection, Uuid> + QueryFragment<Pg> + 'a {
    promotion_bookings::table
        .filter(promotion_bookings::user_id.eq_any(ids))
        .filter(promotion_bookings::promotion_key.eq(key.as_str()))
        .filter(promotion_bookings::status.eq(BOOKING_STATUS_ACTIVE))
        .filter(promotion_bookings::starts_at.le(now))
        .filter(promotion_bookings::ends_at.gt(now))
        .select(promotion_bookings::user_id)
        .distinct()
}

fn count_actions_query(
    member_id: Uuid,
    since: DateTime<Utc>,
) -> impl RunQueryDsl<PgConnection> + LoadQuery<'static, PgConnection, i64> + QueryFragment<Pg> {
    match_actions::table
        .filter(match_actions::member_id.eq(member_id))
        .filter(match_actions::decided_at.gt(since))
        .count()
}

fn upsert_preferences_stmt<'a>(
    new: NewMatchPreference<'a>,
) -> impl RunQueryDsl<PgConnection> + LoadQuery<'a, PgConnection, serde_json::Value> + QueryFragment<Pg> + 'a {
    diesel::insert_into(match_preferences::table)
        .values(new)
        .on_conflict(match_preferences::member_id)
        .do_update()
        .set((
            match_preferences::document.eq(excluded(match_preferences::document)),
            match_preferences::updated_at.eq(excluded(match_preferences::updated_at)),
        ))
        .returning(match_preferences::document)
}

// Single INSERT .. ON CONFLICT: concurrent swipes on the same pair
// converge on one row holding the last committed action.
fn upsert_match_action_stmt<'a>(
    new: NewMatchAction<'a>,
) -> impl RunQueryDsl<PgConnection> + LoadQuery<'a, PgConnection, MatchActionRow> + QueryFragment<Pg> + 'a {
    diesel::insert_into(match_actions::table)
        .values(new)
        .on_conflict((match_actions::member_id, match_actions::escort_id))
        .do_update()
        .set((
            match_actions::action.eq(excluded(match_actions::action)),
            match_actions::decided_at.eq(excluded(match_actions::decided_at)),
        ))
        .returning(MatchActionRow::as_returning())
}

fn load_candidates(query: CandidateQuery<'_>, conn: &mut PgConnection) -> AppResult<Vec<Candidate>> {
    let rows = query
        .order((users::created_at.desc(), users::id.asc()))
        .select((UserRow::as_select(), ProfileRow::as_select()))
        .load::<(UserRow, ProfileRow)>(conn)?;

    Ok(rows
        .into_iter()
        .filter_map(|(user, profile)| Candidate::from_rows(user, profile))
        .collect())
}

impl DiscoveryStore for PgStore {
    fn ping(&self) -> AppResult<()> {
        let mut conn = self.conn()?;
        diesel::sql_query("SELECT 1").execute(&mut conn)?;
        Ok(())
    }

    fn search_candidates(&self, filter: &CandidateFilter) -> AppResult<Vec<Candidate>> {
        let mut conn = self.conn()?;
        load_candidates(search_query(filter), &mut conn)
    }

    fn approved_verification_ids(&self, ids: &[Uuid]) -> AppResult<HashSet<Uuid>> {
        if ids.is_empty() {
            return Ok(HashSet::new());
        }
        let mut conn = self.conn()?;

        let approved = verification_requests::table
            .filter(verification_requests::user_id.eq_any(ids))
            .filter(verification_requests::status.eq(VERIFICATION_STATUS_APPROVED))
            .select(verification_requests::user_id)
            .distinct()
            .load::<Uuid>(&mut conn)?;

        Ok(approved.into_iter().collect())
    }

    fn active_promotion_ids(
        &self,
        ids: &[Uuid],
        key: PromotionKey,
        now: DateTime<Utc>,
    ) -> AppResult<HashSet<Uuid>> {
        if ids.is_empty() {
            return Ok(HashSet::new());
        }
        let mut conn = self.conn()?;

        let active = active_promotions_query(ids, key, now).load::<Uuid>(&mut conn)?;

        Ok(active.into_iter().collect())
    }

    fn find_escort(&self, id: Uuid) -> AppResult<Option<Candidate>> {
        let mut conn = self.conn()?;

        let row = discoverable()
            .filter(users::id.eq(id))
            .select((UserRow::as_select(), ProfileRow::as_select()))
            .first::<(UserRow, ProfileRow)>(&mut conn)
            .optional()?;

        Ok(row.and_then(|(user, profile)| Candidate::from_rows(user, profile)))
    }

    fn suggestion_pool(&self, query: &PoolQuery) -> AppResult<Vec<Candidate>> {
        let mut conn = self.conn()?;
        load_candidates(pool_query(query), &mut conn)
    }

    fn load_preferences(&self, member_id: Uuid) -> AppResult<Option<serde_json::Value>> {
        let mut conn = self.conn()?;

        let document = match_preferences::table
            .find(member_id)
            .select(match_preferences::document)
            .first::<serde_json::Value>(&mut conn)
            .optional()?;

        Ok(document)
    }

    fn upsert_preferences(
        &self,
        member_id: Uuid,
        document: &serde_json::Value,
        now: DateTime<Utc>,
    ) -> AppResult<serde_json::Value> {
        let mut conn = self.conn()?;

        let stored = upsert_preferences_stmt(NewMatchPreference {
            member_id,
            document,
            updated_at: now,
        })
        .get_result::<serde_json::Value>(&mut conn)?;

        Ok(stored)
    }

    fn swiped_escort_ids(&self, member_id: Uuid) -> AppResult<HashSet<Uuid>> {
        let mut conn = self.conn()?;

        let ids = match_actions::table
            .filter(match_actions::member_id.eq(member_id))
            .select(match_actions::escort_id)
            .load::<Uuid>(&mut conn)?;

        Ok(ids.into_iter().collect())
    }

    fn count_actions_since(&self, member_id: Uuid, since: DateTime<Utc>) -> AppResult<i64> {
        let mut conn = self.conn()?;

        let count = count_actions_query(member_id, since).get_result::<i64>(&mut conn)?;

        Ok(count)
    }

    fn upsert_match_action(
        &self,
        member_id: Uuid,
        escort_id: Uuid,
        action: SwipeAction,
        now: DateTime<Utc>,
    ) -> AppResult<MatchAction> {
        let mut conn = self.conn()?;

        let row = upsert_match_action_stmt(NewMatchAction {
            id: Uuid::now_v7(),
            member_id,
            escort_id,
            action: action.as_str(),
            decided_at: now,
        })
        .get_result::<MatchActionRow>(&mut conn)?;

        MatchAction::try_from(row).map_err(|e| AppError::Internal(anyhow::anyhow!(e)))
    }
}
