use serde_json::Value;

use crate::models::CandidateProfile;

/// Avatar, else the first image in the media blob, else the first gallery entry.
pub fn primary_image(profile: &CandidateProfile) -> Option<String> {
    non_blank(profile.avatar_url.as_deref())
        .or_else(|| first_media_image(&profile.media))
        .or_else(|| first_gallery_image(&profile.gallery))
}

/// First media entry typed as an image (`type: "image"` or an `image/*` mime).
pub fn first_media_image(media: &Value) -> Option<String> {
    entries(media).into_iter().find_map(|entry| {
        let kind = entry
            .get("type")
            .or_else(|| entry.get("mimeType"))
            .and_then(Value::as_str)?
            .to_ascii_lowercase();
        if kind == "image" || kind.starts_with("image/") {
            entry_url(&entry)
        } else {
            None
        }
    })
}

/// First usable gallery entry, given either as a bare URL or `{ url }`.
pub fn first_gallery_image(gallery: &Value) -> Option<String> {
    entries(gallery).iter().find_map(entry_url)
}

// Blobs written by older onboarding flows are JSON text rather than JSON.
fn entries(blob: &Value) -> Vec<Value> {
    match blob {
        Value::Array(items) => items.clone(),
        Value::String(text) => match serde_json::from_str::<Value>(text) {
            Ok(Value::Array(items)) => items,
            _ => Vec::new(),
        },
        _ => Vec::new(),
    }
}

fn entry_url(entry: &Value) -> Option<String> {
    match entry {
        Value::String(url) => non_blank(Some(url)),
        Value::Object(map) => non_blank(map.get("url").and_then(Value::as_str)),
        _ => None,
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
