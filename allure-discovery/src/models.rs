use allure_shared::types::auth::AccountRole;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::schema::{match_actions, match_preferences, profiles, users};

// --- Rows ---

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UserRow {
    pub id: Uuid,
    pub email: String,
    pub role: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = profiles)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ProfileRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub display_name: Option<String>,
    pub description: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub formatted_location: Option<String>,
    pub visibility: String,
    pub height: Option<String>,
    pub weight: Option<String>,
    pub breast_type: Option<String>,
    pub breast_size: Option<String>,
    pub eye_color: Option<String>,
    pub hair_color: Option<String>,
    pub hair_length: Option<String>,
    pub clothing_style: Option<String>,
    pub clothing_size: Option<String>,
    pub body_type: Option<String>,
    pub avatar_url: Option<String>,
    pub media: serde_json::Value,
    pub gallery: serde_json::Value,
    pub services: Vec<String>,
    pub languages: Vec<String>,
    pub piercings: Vec<String>,
    pub tattoos: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Queryable, Selectable, Serialize)]
#[diesel(table_name = match_actions)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct MatchActionRow {
    pub id: Uuid,
    pub member_id: Uuid,
    pub escort_id: Uuid,
    pub action: String,
    pub decided_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = match_actions)]
pub struct NewMatchAction<'a> {
    pub id: Uuid,
    pub member_id: Uuid,
    pub escort_id: Uuid,
    pub action: &'a str,
    pub decided_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = match_preferences)]
pub struct NewMatchPreference<'a> {
    pub member_id: Uuid,
    pub document: &'a serde_json::Value,
    pub updated_at: DateTime<Utc>,
}

// --- Domain ---

/// Profile visibility tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Visibility {
    Public,
    Verified,
    Private,
}

impl Visibility {
    /// Unknown tiers are treated as PUBLIC so they never grant a verified badge.
    pub fn from_db(value: &str) -> Self {
        match value.to_ascii_uppercase().as_str() {
            "VERIFIED" => Visibility::Verified,
            "PRIVATE" => Visibility::Private,
            _ => Visibility::Public,
        }
    }
}

/// Paid highlight placement. MONTH outranks WEEK.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromotionKey {
    Week,
    Month,
}

impl PromotionKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            PromotionKey::Week => "WEEK",
            PromotionKey::Month => "MONTH",
        }
    }
}

pub const BOOKING_STATUS_ACTIVE: &str = "ACTIVE";
pub const VERIFICATION_STATUS_APPROVED: &str = "APPROVED";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SwipeAction {
    Like,
    Pass,
}

impl SwipeAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            SwipeAction::Like => "LIKE",
            SwipeAction::Pass => "PASS",
        }
    }
}

impl std::str::FromStr for SwipeAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "LIKE" => Ok(SwipeAction::Like),
            "PASS" => Ok(SwipeAction::Pass),
            other => Err(format!("unknown swipe action: {other}")),
        }
    }
}

/// Appearance and style attributes shared by the search filters and the
/// preference scorer. Keys are the camelCase names used on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AppearanceField {
    Height,
    Weight,
    BreastType,
    BreastSize,
    EyeColor,
    HairColor,
    HairLength,
    ClothingStyle,
    ClothingSize,
    BodyType,
}

impl AppearanceField {
    pub const ALL: [AppearanceField; 10] = [
        AppearanceField::Height,
        AppearanceField::Weight,
        AppearanceField::BreastType,
        AppearanceField::BreastSize,
        AppearanceField::EyeColor,
        AppearanceField::HairColor,
        AppearanceField::HairLength,
        AppearanceField::ClothingStyle,
        AppearanceField::ClothingSize,
        AppearanceField::BodyType,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            AppearanceField::Height => "height",
            AppearanceField::Weight => "weight",
            AppearanceField::BreastType => "breastType",
            AppearanceField::BreastSize => "breastSize",
            AppearanceField::EyeColor => "eyeColor",
            AppearanceField::HairColor => "hairColor",
            AppearanceField::HairLength => "hairLength",
            AppearanceField::ClothingStyle => "clothingStyle",
            AppearanceField::ClothingSize => "clothingSize",
            AppearanceField::BodyType => "bodyType",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.key() == key)
    }
}

/// An escort-class user joined with their profile.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub id: Uuid,
    pub email: String,
    pub role: AccountRole,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub profile: CandidateProfile,
}

#[derive(Debug, Clone)]
pub struct CandidateProfile {
    pub display_name: Option<String>,
    pub description: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub formatted_location: Option<String>,
    pub visibility: Visibility,
    pub height: Option<String>,
    pub weight: Option<String>,
    pub breast_type: Option<String>,
    pub breast_size: Option<String>,
    pub eye_color: Option<String>,
    pub hair_color: Option<String>,
    pub hair_length: Option<String>,
    pub clothing_style: Option<String>,
    pub clothing_size: Option<String>,
    pub body_type: Option<String>,
    pub avatar_url: Option<String>,
    pub media: serde_json::Value,
    pub gallery: serde_json::Value,
    pub services: Vec<String>,
    pub languages: Vec<String>,
    pub piercings: Vec<String>,
    pub tattoos: Vec<String>,
}

impl CandidateProfile {
    pub fn appearance(&self, field: AppearanceField) -> Option<&str> {
        let value = match field {
            AppearanceField::Height => &self.height,
            AppearanceField::Weight => &self.weight,
            AppearanceField::BreastType => &self.breast_type,
            AppearanceField::BreastSize => &self.breast_size,
            AppearanceField::EyeColor => &self.eye_color,
            AppearanceField::HairColor => &self.hair_color,
            AppearanceField::HairLength => &self.hair_length,
            AppearanceField::ClothingStyle => &self.clothing_style,
            AppearanceField::ClothingSize => &self.clothing_size,
            AppearanceField::BodyType => &self.body_type,
        };
        value.as_deref()
    }
}

impl Candidate {
    /// Build a candidate from a joined row pair. Rows with a role the platform
    /// does not know are dropped.
    pub fn from_rows(user: UserRow, profile: ProfileRow) -> Option<Self> {
        let role = match user.role.parse::<AccountRole>() {
            Ok(role) => role,
            Err(e) => {
                tracing::warn!(user_id = %user.id, error = %e, "skipping candidate with unknown role");
                return None;
            }
        };

        Some(Self {
            id: user.id,
            email: user.email,
            role,
            is_active: user.is_active,
            created_at: user.created_at,
            profile: CandidateProfile {
                display_name: profile.display_name,
                description: profile.description,
                city: profile.city,
                country: profile.country,
                formatted_location: profile.formatted_location,
                visibility: Visibility::from_db(&profile.visibility),
                height: profile.height,
                weight: profile.weight,
                breast_type: profile.breast_type,
                breast_size: profile.breast_size,
                eye_color: profile.eye_color,
                hair_color: profile.hair_color,
                hair_length: profile.hair_length,
                clothing_style: profile.clothing_style,
                clothing_size: profile.clothing_size,
                body_type: profile.body_type,
                avatar_url: profile.avatar_url,
                media: profile.media,
                gallery: profile.gallery,
                services: profile.services,
                languages: profile.languages,
                piercings: profile.piercings,
                tattoos: profile.tattoos,
            },
        })
    }

    /// Discoverable means active, escort-class, and carrying a profile (the
    /// latter is guaranteed by construction).
    pub fn is_discoverable(&self) -> bool {
        self.is_active && self.role.is_escort_class()
    }
}

/// Stored swipe decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchAction {
    pub id: Uuid,
    pub member_id: Uuid,
    pub escort_id: Uuid,
    pub action: SwipeAction,
    pub decided_at: DateTime<Utc>,
}

impl TryFrom<MatchActionRow> for MatchAction {
    type Error = String;

    fn try_from(row: MatchActionRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            member_id: row.member_id,
            escort_id: row.escort_id,
            action: row.action.parse()?,
            decided_at: row.decided_at,
        })
    }
}
