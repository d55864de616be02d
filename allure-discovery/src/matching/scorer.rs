use serde::Deserialize;

use super::preferences::PreferenceDocument;
use crate::models::{AppearanceField, Candidate};

/// Points awarded per matching preference dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ScoreWeights {
    pub service: u32,
    pub language: u32,
    pub piercing: u32,
    pub tattoo: u32,
    pub appearance: u32,
    pub city: u32,
    pub country: u32,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            service: 5,
            language: 2,
            piercing: 1,
            tattoo: 1,
            appearance: 2,
            city: 1,
            country: 1,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ScoredCandidate {
    pub candidate: Candidate,
    pub score: u32,
}

/// Number of preferred entries the candidate offers. `preferred` is already
/// normalised by the document decoder.
fn overlap(preferred: &[String], offered: &[String]) -> u32 {
    if preferred.is_empty() || offered.is_empty() {
        return 0;
    }
    let offered: Vec<String> = offered.iter().map(|o| o.trim().to_lowercase()).collect();
    preferred.iter().filter(|p| offered.contains(p)).count() as u32
}

/// Substring match in either direction, so "Berlin" and "Berlin, Mitte" agree.
fn loosely_matches(preferred: Option<&str>, actual: Option<&str>) -> bool {
    match (preferred, actual) {
        (Some(p), Some(a)) => {
            let a = a.trim().to_lowercase();
            !a.is_empty() && (a.contains(p) || p.contains(a.as_str()))
        }
        _ => false,
    }
}

/// Weighted similarity between a preference document and one candidate.
/// A dimension contributes nothing when either side is missing.
pub fn score(doc: &PreferenceDocument, candidate: &Candidate, weights: &ScoreWeights) -> u32 {
    let profile = &candidate.profile;
    // Weights come from configuration; saturate instead of overflowing.
    let mut total: u32 = 0;
    let mut add = |points: u32| total = total.saturating_add(points);

    add(weights.service.saturating_mul(overlap(&doc.services, &profile.services)));
    add(weights.language.saturating_mul(overlap(&doc.languages, &profile.languages)));
    add(weights.piercing.saturating_mul(overlap(&doc.piercings, &profile.piercings)));
    add(weights.tattoo.saturating_mul(overlap(&doc.tattoos, &profile.tattoos)));

    for (key, wish) in &doc.appearance {
        let actual = AppearanceField::from_key(key).and_then(|field| profile.appearance(field));
        if actual.is_some_and(|value| wish.accepts(value)) {
            add(weights.appearance);
        }
    }

    if loosely_matches(doc.city.as_deref(), profile.city.as_deref()) {
        add(weights.city);
    }
    if loosely_matches(doc.country.as_deref(), profile.country.as_deref()) {
        add(weights.country);
    }

    total
}

/// Score, order by descending score and keep the best `limit`.
///
/// The sort is stable: candidates with equal scores keep the pool order
/// (newest first as delivered by the store).
pub fn rank_candidates(
    doc: &PreferenceDocument,
    pool: Vec<Candidate>,
    weights: &ScoreWeights,
    limit: usize,
) -> Vec<ScoredCandidate> {
    let mut scored: Vec<ScoredCandidate> = pool
        .into_iter()
        .map(|candidate| ScoredCandidate {
            score: score(doc, &candidate, weights),
            candidate,
        })
        .collect();
    scored.sort_by(|a, b| b.score.cmp(&a.score));
    scored.truncate(limit);
    scored
}
