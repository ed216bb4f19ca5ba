//! Pure response classification
//!
//! Expected payload shape:
//!
//! ```json
//! {
//!   "data": [ ... ],
//!   "includes": { ... },
//!   "errors": [ { "title": "...", "type": "..." } ],
//!   "meta": { "result_count": 100, "newest_id": "...", "oldest_id": "...", "next_token": "..." }
//! }
//! ```

use super::types::{ApiProblem, Condition, Decoded, Page};
use crate::http::ApiResponse;
use crate::types::{JsonValue, OptionStringExt};

/// Classify one API response
pub fn decode_response(response: &ApiResponse) -> Decoded {
    if !response.is_success() {
        return Decoded::fault(format!("unexpected HTTP status {}", response.status));
    }

    let body: JsonValue = match serde_json::from_str(&response.body) {
        Ok(body) => body,
        Err(e) => return Decoded::fault(format!("body is not JSON: {e}")),
    };
    let Some(object) = body.as_object() else {
        return Decoded::fault("body is not a JSON object");
    };

    let problems = match object.get("errors") {
        Some(errors) => match serde_json::from_value::<Vec<ApiProblem>>(errors.clone()) {
            Ok(problems) => problems,
            Err(e) => return Decoded::fault(format!("malformed errors array: {e}")),
        },
        None => Vec::new(),
    };

    // Errors without data concern the subject itself
    if !object.contains_key("data") {
        if let Some(condition) = problems.iter().find_map(Condition::classify) {
            return Decoded::Unreachable(condition);
        }
    }

    let Some(meta) = object.get("meta").and_then(JsonValue::as_object) else {
        return Decoded::fault("missing meta object");
    };
    let Some(result_count) = meta.get("result_count").and_then(JsonValue::as_u64) else {
        return Decoded::fault("missing meta.result_count");
    };
    if result_count == 0 {
        return Decoded::Empty;
    }

    let id = |key: &str| {
        meta.get(key)
            .and_then(JsonValue::as_str)
            .map(ToString::to_string)
            .none_if_empty()
    };
    let (Some(newest_id), Some(oldest_id)) = (id("newest_id"), id("oldest_id")) else {
        return Decoded::fault("missing meta.newest_id or meta.oldest_id");
    };

    Decoded::Page(Page {
        newest_id,
        oldest_id,
        next_token: id("next_token"),
        result_count,
        advisories: problems,
        body: response.body.clone(),
    })
}
