use allure_shared::types::auth::AccountRole;
use chrono::Utc;
use serde_json::json;
use uuid::Uuid;

use crate::models::{Candidate, CandidateProfile, Visibility};

/// Active public escort with only a display name and a city.
pub fn candidate(name: &str, city: &str) -> Candidate {
    Candidate {
        id: Uuid::new_v4(),
        email: format!("{}@example.com", name.to_lowercase().replace(' ', ".")),
        role: AccountRole::Escort,
        is_active: true,
        created_at: Utc::now(),
        profile: CandidateProfile {
            display_name: Some(name.to_string()),
            description: None,
            city: Some(city.to_string()),
            country: None,
            formatted_location: None,
            visibility: Visibility::Public,
            height: None,
            weight: None,
            breast_type: None,
            breast_size: None,
            eye_color: None,
            hair_color: None,
            hair_length: None,
            clothing_style: None,
            clothing_size: None,
            body_type: None,
            avatar_url: None,
            media: json!([]),
            gallery: json!([]),
            services: Vec::new(),
            languages: Vec::new(),
            piercings: Vec::new(),
            tattoos: Vec::new(),
        },
    }
}
