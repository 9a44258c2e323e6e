use serde_json::Value;

/// Pulls a JSON object out of raw model output.
///
/// Models frequently wrap JSON in markdown code fences or surround it with
/// prose. Tries, in order: the whole text, a fenced block, and the widest
/// `{..}` slice. Returns `None` when nothing parses to a JSON object.
pub fn extract_json_object(text: &str) -> Option<Value> {
    let trimmed = text.trim();

    if let Some(value) = parse_object(trimmed) {
        return Some(value);
    }

    if let Some(block) = fenced_block(trimmed) {
        if let Some(value) = parse_object(block) {
            return Some(value);
        }
    }

    let start = trimmed.find('{')?;
    let end = trimmed.rfind('}')?;
    if end <= start {
        return None;
    }
    parse_object(&trimmed[start..=end])
}

fn fenced_block(text: &str) -> Option<&str> {
    let opening = text.find("```")?;
    let after_fence = &text[opening + 3..];
    // Skip a language tag like "json" on the fence line.
    let body_start = after_fence.find('\n').map(|idx| idx + 1).unwrap_or(0);
    let body = &after_fence[body_start..];
    let closing = body.rfind("```").unwrap_or(body.len());
    Some(body[..closing].trim())
}

fn parse_object(candidate: &str) -> Option<Value> {
    match serde_json::from_str::<Value>(candidate) {
        Ok(value) if value.is_object() => Some(value),
        _ => None,
    }
}

/// Typed accessors for model-supplied JSON. Shape is never trusted: a field
/// of the wrong type reads the same as an absent one.
pub(crate) fn number_field(value: &Value, key: &str) -> Option<f64> {
    value.get(key).and_then(Value::as_f64)
}

pub(crate) fn string_field(value: &Value, key: &str) -> Option<String> {
    value
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_string)
}

/// Missing or non-array values become an empty list; non-string items are
/// dropped rather than trusted.
pub(crate) fn string_list(value: &Value, key: &str) -> Vec<String> {
    value
        .get(key)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::trim)
                .filter(|text| !text.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}
