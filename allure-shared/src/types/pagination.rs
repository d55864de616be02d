use serde::Serialize;

pub const DEFAULT_TAKE: u64 = 20;
pub const MAX_TAKE: u64 = 100;

/// Offset-based page window applied after filtering.
///
/// Query values arrive as raw strings; anything that does not parse falls back
/// to the defaults, negative skips floor at zero and takes are capped at 100.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SkipTake {
    pub skip: u64,
    pub take: u64,
}

impl SkipTake {
    pub fn new(skip: u64, take: u64) -> Self {
        Self {
            skip,
            take: take.clamp(1, MAX_TAKE),
        }
    }

    pub fn from_query(skip: Option<&str>, take: Option<&str>) -> Self {
        let skip = skip
            .and_then(|s| s.trim().parse::<i64>().ok())
            .map(|s| s.max(0) as u64)
            .unwrap_or(0);
        let take = take
            .and_then(|t| t.trim().parse::<i64>().ok())
            .filter(|t| *t > 0)
            .map(|t| t as u64)
            .unwrap_or(DEFAULT_TAKE);
        Self::new(skip, take)
    }

    /// Slice `items` to this window.
    pub fn apply<T>(&self, items: Vec<T>) -> Vec<T> {
        items
            .into_iter()
            .skip(self.skip as usize)
            .take(self.take as usize)
            .collect()
    }
}

impl Default for SkipTake {
    fn default() -> Self {
        Self { skip: 0, take: DEFAULT_TAKE }
    }
}

/// `{ total, items }` page where `total` counts the whole filtered set.
#[derive(Debug, Serialize)]
pub struct Page<T: Serialize> {
    pub total: u64,
    pub items: Vec<T>,
}
