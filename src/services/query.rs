use crate::error::AppError;
use crate::models::stream::{CachedPayload, Status, StreamRecord};
use std::collections::HashMap;

/// Status filter as received from a client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusFilter {
    Is(Status),
    /// A value that names no status; matches nothing.
    Unrecognized(String),
}

impl StatusFilter {
    pub fn parse(raw: &str) -> Self {
        match raw.parse() {
            Ok(status) => StatusFilter::Is(status),
            Err(_) => StatusFilter::Unrecognized(raw.to_string()),
        }
    }

    fn matches(&self, status: Status) -> bool {
        matches!(self, StatusFilter::Is(wanted) if *wanted == status)
    }
}

/// Conjunction of the optional list filters. `Default` matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StreamQuery {
    /// Lower-cased substring matched against name, tag or category.
    pub text: Option<String>,
    pub status: Option<StatusFilter>,
    /// Exact, case-sensitive category name.
    pub category: Option<String>,
}

impl StreamQuery {
    /// Builds a query from raw request values. Empty values mean "no filter";
    /// the text filter is trimmed and lower-cased.
    pub fn from_params(q: Option<&str>, status: Option<&str>, category: Option<&str>) -> Self {
        let text = q
            .map(|q| q.trim().to_lowercase())
            .filter(|q| !q.is_empty());
        let status = status.filter(|s| !s.is_empty()).map(StatusFilter::parse);
        let category = category.filter(|c| !c.is_empty()).map(str::to_string);

        Self {
            text,
            status,
            category,
        }
    }

    pub fn matches(&self, record: &StreamRecord) -> bool {
        if let Some(text) = &self.text {
            let needle = text.to_lowercase();
            let fields = [
                record.name.as_deref().unwrap_or(""),
                record.tag.as_deref().unwrap_or(""),
                record.category.as_str(),
            ];
            let hit = fields
                .iter()
                .any(|field| field.to_lowercase().contains(&needle));
            if !hit {
                return false;
            }
        }
        if let Some(status) = &self.status {
            if !status.matches(record.status) {
                return false;
            }
        }
        if let Some(category) = &self.category {
            if record.category != *category {
                return false;
            }
        }
        true
    }
}

/// Records of `payload` passing every filter in `query`, in cached order.
pub fn query(payload: &CachedPayload, query: &StreamQuery) -> Vec<StreamRecord> {
    payload
        .items
        .iter()
        .filter(|record| query.matches(record))
        .cloned()
        .collect()
}

/// Looks up `ids` in the caller's order, keeping duplicates and skipping
/// unknown ids. Fails only when nothing matched at all.
pub fn resolve(payload: &CachedPayload, ids: &[i64]) -> Result<Vec<StreamRecord>, AppError> {
    let mut by_id: HashMap<i64, &StreamRecord> = HashMap::new();
    for record in &payload.items {
        if let Some(id) = record.id {
            // Duplicate ids: the last record wins.
            by_id.insert(id, record);
        }
    }

    let items: Vec<StreamRecord> = ids
        .iter()
        .filter_map(|id| by_id.get(id).map(|record| (*record).clone()))
        .collect();

    if items.is_empty() {
        return Err(AppError::NotFound("No matching streams".to_string()));
    }
    Ok(items)
}

/// Parses a comma-separated id list. Tokens that are not plain non-negative
/// integers are dropped; an empty result is a validation error.
pub fn parse_ids(raw: Option<&str>) -> Result<Vec<i64>, AppError> {
    let raw = raw.map(str::trim).unwrap_or("");
    if raw.is_empty() {
        return Err(AppError::Validation("Missing ids".to_string()));
    }

    let ids: Vec<i64> = raw
        .split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty() && token.bytes().all(|b| b.is_ascii_digit()))
        .filter_map(|token| token.parse().ok())
        .collect();

    if ids.is_empty() {
        return Err(AppError::Validation("Bad ids".to_string()));
    }
    Ok(ids)
}
