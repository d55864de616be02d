//! Preference-based suggestions and swipe recording.

pub mod preferences;
pub mod scorer;
pub mod suggestions;
pub mod swipe;
