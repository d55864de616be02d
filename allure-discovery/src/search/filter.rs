use allure_shared::types::pagination::SkipTake;
use serde::Deserialize;

use crate::models::{AppearanceField, Candidate};

/// Raw `GET /escorts/search` query. Everything is optional and lenient.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    pub q: Option<String>,
    pub location: Option<String>,
    pub take: Option<String>,
    pub skip: Option<String>,
    pub verified_only: Option<String>,
    pub age_verified_only: Option<String>,
    pub height: Option<String>,
    pub weight: Option<String>,
    pub breast_type: Option<String>,
    pub breast_size: Option<String>,
    pub eye_color: Option<String>,
    pub hair_color: Option<String>,
    pub hair_length: Option<String>,
    pub clothing_style: Option<String>,
    pub clothing_size: Option<String>,
}

/// Post-filter toggles applied after verification flags are resolved.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchToggles {
    pub verified_only: bool,
    pub age_verified_only: bool,
}

impl SearchParams {
    pub fn toggles(&self) -> SearchToggles {
        SearchToggles {
            verified_only: flag(self.verified_only.as_deref()),
            age_verified_only: flag(self.age_verified_only.as_deref()),
        }
    }

    pub fn window(&self) -> SkipTake {
        SkipTake::from_query(self.skip.as_deref(), self.take.as_deref())
    }

    fn appearance(&self, field: AppearanceField) -> Option<&str> {
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
            // Not a search filter.
            AppearanceField::BodyType => return None,
        };
        value.as_deref()
    }
}

fn flag(value: Option<&str>) -> bool {
    matches!(value.map(str::trim), Some("true") | Some("1"))
}

/// Substring `ILIKE` pattern with LIKE metacharacters in `needle` escaped.
pub fn like_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for ch in needle.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

/// Which profile columns a predicate looks at. Alternatives inside a target
/// are OR-ed together.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterTarget {
    /// display name OR description
    Text,
    /// city OR country OR formatted location
    Location,
    Appearance(AppearanceField),
}

/// Case-insensitive substring predicate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPredicate {
    pub target: FilterTarget,
    pub needle: String,
}

impl FieldPredicate {
    pub fn like_pattern(&self) -> String {
        like_pattern(&self.needle)
    }

    pub fn matches(&self, candidate: &Candidate) -> bool {
        let profile = &candidate.profile;
        let needle = self.needle.to_lowercase();
        let contains = |value: Option<&str>| {
            value.is_some_and(|v| v.to_lowercase().contains(&needle))
        };

        match self.target {
            FilterTarget::Text => {
                contains(profile.display_name.as_deref()) || contains(profile.description.as_deref())
            }
            FilterTarget::Location => {
                contains(profile.city.as_deref())
                    || contains(profile.country.as_deref())
                    || contains(profile.formatted_location.as_deref())
            }
            FilterTarget::Appearance(field) => contains(profile.appearance(field)),
        }
    }
}

/// Conjunction of field predicates compiled from search parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CandidateFilter {
    pub predicates: Vec<FieldPredicate>,
}

impl CandidateFilter {
    /// Blank and whitespace-only parameters are dropped, never compiled into
    /// match-everything predicates.
    pub fn compile(params: &SearchParams) -> Self {
        let mut predicates = Vec::new();
        let mut push = |target: FilterTarget, raw: Option<&str>| {
            if let Some(needle) = raw.map(str::trim).filter(|s| !s.is_empty()) {
                predicates.push(FieldPredicate {
                    target,
                    needle: needle.to_string(),
                });
            }
        };

        push(FilterTarget::Text, params.q.as_deref());
        push(FilterTarget::Location, params.location.as_deref());
        for field in AppearanceField::ALL {
            push(FilterTarget::Appearance(field), params.appearance(field));
        }

        Self { predicates }
    }

    pub fn matches(&self, candidate: &Candidate) -> bool {
        self.predicates.iter().all(|p| p.matches(candidate))
    }
}
