use std::convert::Infallible;

use axum::extract::{FromRequestParts, Query};
use axum::http::request::Parts;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// Query-string extractor that never rejects.
///
/// Repeated keys keep their first value. If the collected pairs still fail to
/// deserialize into `T`, the request proceeds with `T::default()`.
pub struct LenientQuery<T>(pub T);

#[axum::async_trait]
impl<T, S> FromRequestParts<S> for LenientQuery<T>
where
    T: DeserializeOwned + Default,
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let pairs = Query::<Vec<(String, String)>>::try_from_uri(&parts.uri)
            .map(|Query(pairs)| pairs)
            .unwrap_or_default();

        Ok(Self(from_pairs(pairs)))
    }
}

fn from_pairs<T: DeserializeOwned + Default>(pairs: Vec<(String, String)>) -> T {
    let mut fields = Map::new();
    for (key, value) in pairs {
        fields.entry(key).or_insert(Value::String(value));
    }

    serde_json::from_value(Value::Object(fields)).unwrap_or_else(|e| {
        tracing::debug!(error = %e, "unusable query string, using defaults");
        T::default()
    })
}
