use serde_json::Value;

/// Renders a SUCCESS payload for display: pretty-printed JSON when the text
/// parses, the raw text verbatim when it does not.
pub fn format_result_payload(raw: &str) -> String {
    match serde_json::from_str::<Value>(raw) {
        Ok(value) => serde_json::to_string_pretty(&value).unwrap_or_else(|_| raw.to_string()),
        Err(_) => raw.to_string(),
    }
}
