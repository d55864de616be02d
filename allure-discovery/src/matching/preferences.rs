use serde_json::{Map, Value};

/// A member's decoded preference document. List entries and scalar values are
/// trimmed, lower-cased and de-duplicated so every comparison downstream is
/// case-insensitive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreferenceDocument {
    pub services: Vec<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    /// Appearance wishes keyed by wire attribute name (`hairColor`, ...).
    pub appearance: Vec<(String, AppearanceWish)>,
    pub languages: Vec<String>,
    pub piercings: Vec<String>,
    pub tattoos: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppearanceWish {
    One(String),
    AnyOf(Vec<String>),
}

impl AppearanceWish {
    pub fn accepts(&self, value: &str) -> bool {
        let value = value.trim().to_lowercase();
        match self {
            AppearanceWish::One(wanted) => *wanted == value,
            AppearanceWish::AnyOf(wanted) => wanted.contains(&value),
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum PreferenceError {
    #[error("preference document must be a JSON object")]
    NotAnObject,

    #[error("preference field `{0}` has an unexpected type")]
    Malformed(String),
}

impl PreferenceDocument {
    /// Decode a stored document. A missing document (or JSON `null`) is the
    /// empty document; anything structurally wrong is reported as malformed.
    pub fn decode(raw: Option<&Value>) -> Result<Self, PreferenceError> {
        let map = match raw {
            None | Some(Value::Null) => return Ok(Self::default()),
            Some(Value::Object(map)) => map,
            Some(_) => return Err(PreferenceError::NotAnObject),
        };

        Ok(Self {
            services: list(map, "services")?,
            city: scalar(map, "city")?,
            country: scalar(map, "country")?,
            appearance: appearance(map)?,
            languages: list(map, "languages")?,
            piercings: list(map, "piercings")?,
            tattoos: list(map, "tattoos")?,
        })
    }
}

fn normalize(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_lowercase())
}

fn scalar_text(value: &Value) -> Option<Option<String>> {
    match value {
        Value::String(s) => Some(normalize(s)),
        Value::Number(n) => Some(normalize(&n.to_string())),
        Value::Bool(b) => Some(normalize(&b.to_string())),
        Value::Null => Some(None),
        _ => None,
    }
}

fn scalar(map: &Map<String, Value>, key: &str) -> Result<Option<String>, PreferenceError> {
    match map.get(key) {
        None => Ok(None),
        Some(value) => scalar_text(value).ok_or_else(|| PreferenceError::Malformed(key.to_string())),
    }
}

fn collect_list(values: &[Value], key: &str) -> Result<Vec<String>, PreferenceError> {
    let mut out: Vec<String> = Vec::with_capacity(values.len());
    for value in values {
        let item = scalar_text(value).ok_or_else(|| PreferenceError::Malformed(key.to_string()))?;
        if let Some(item) = item {
            if !out.contains(&item) {
                out.push(item);
            }
        }
    }
    Ok(out)
}

fn list(map: &Map<String, Value>, key: &str) -> Result<Vec<String>, PreferenceError> {
    match map.get(key) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(items)) => collect_list(items, key),
        Some(Value::String(s)) => Ok(normalize(s).into_iter().collect()),
        Some(_) => Err(PreferenceError::Malformed(key.to_string())),
    }
}

fn appearance(map: &Map<String, Value>) -> Result<Vec<(String, AppearanceWish)>, PreferenceError> {
    let wishes = match map.get("appearance") {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(Value::Object(wishes)) => wishes,
        Some(_) => return Err(PreferenceError::Malformed("appearance".into())),
    };

    let mut out = Vec::with_capacity(wishes.len());
    for (attribute, value) in wishes {
        let field = format!("appearance.{attribute}");
        let wish = match value {
            Value::Array(items) => {
                let items = collect_list(items, &field)?;
                (!items.is_empty()).then_some(AppearanceWish::AnyOf(items))
            }
            other => scalar_text(other)
                .ok_or(PreferenceError::Malformed(field))?
                .map(AppearanceWish::One),
        };
        if let Some(wish) = wish {
            out.push((attribute.clone(), wish));
        }
    }
    Ok(out)
}
