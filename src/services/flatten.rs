use crate::models::stream::{CachedPayload, Status, StreamRecord};
use serde_json::Value;

fn str_field(obj: &Value, key: &str) -> Option<String> {
    obj.get(key).and_then(|v| v.as_str()).map(str::to_string)
}

fn int_field(obj: &Value, key: &str) -> Option<i64> {
    obj.get(key).and_then(|v| v.as_i64())
}

fn array_field<'a>(obj: &'a Value, key: &str) -> &'a [Value] {
    obj.get(key)
        .and_then(|v| v.as_array())
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

/// Flattens the upstream `streams -> [category -> streams]` nesting into one
/// ordered list, classifying every record at `now`.
///
/// Missing or mistyped fields are defaulted rather than rejected.
pub fn flatten(data: &Value, now: i64) -> CachedPayload {
    let mut items = Vec::new();

    for category in array_field(data, "streams") {
        let category_name = str_field(category, "category").unwrap_or_default();

        for raw in array_field(category, "streams") {
            let always_live = int_field(raw, "always_live").unwrap_or(0);
            let starts_at = int_field(raw, "starts_at");
            let ends_at = int_field(raw, "ends_at");

            items.push(StreamRecord {
                id: int_field(raw, "id"),
                name: str_field(raw, "name"),
                tag: str_field(raw, "tag"),
                poster: str_field(raw, "poster"),
                uri_name: str_field(raw, "uri_name"),
                starts_at,
                ends_at,
                always_live,
                allow_past_streams: int_field(raw, "allowpaststreams").unwrap_or(0),
                category: category_name.clone(),
                iframe: str_field(raw, "iframe"),
                status: Status::classify(now, always_live, starts_at, ends_at),
            });
        }
    }

    CachedPayload {
        timestamp: data.get("timestamp").filter(|v| !v.is_null()).cloned(),
        performance: data.get("performance").filter(|v| !v.is_null()).cloned(),
        items,
    }
}
